// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use thiserror::Error;

use beam_env::Environment;
use core_resolver::system_resolver::SystemResolver;
use reports_resolver::{ReportsClient, ReportsClientError, ReportsSubsystemResolver};

pub struct SystemLoader;

impl SystemLoader {
    /// Wire the upstream client and the reports subsystem into a system resolver.
    pub fn create_system_resolver(
        env: &dyn Environment,
    ) -> Result<SystemResolver, SystemLoadingError> {
        let client = ReportsClient::from_env(env)?;

        let resolver = ReportsSubsystemResolver {
            id: "reports",
            fetcher: Arc::new(client),
        };

        Ok(SystemResolver::new(Box::new(resolver)))
    }
}

#[derive(Error, Debug)]
pub enum SystemLoadingError {
    #[error("{0}")]
    Client(#[from] ReportsClientError),
}
