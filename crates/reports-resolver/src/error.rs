// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use core_resolver::plugin::SubsystemResolutionError;

use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Error communicating with the reports API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response from the reports API: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String),

    #[error(transparent)]
    Status(#[from] UpstreamStatusError),
}

#[derive(Error, Debug)]
#[error("The reports API returned {status} for {url}")]
pub struct UpstreamStatusError {
    pub status: reqwest::StatusCode,
    pub url: String,
}

impl UpstreamError {
    pub fn user_error_message(&self) -> String {
        match self {
            UpstreamError::Status(e) => {
                error!("Upstream request failed: {}", e);
                format!("The reports API returned {}", e.status)
            }
            // Do not reveal transport details (they may contain the upstream URL and
            // credential-bearing request information).
            _ => {
                error!("Upstream request failed: {:?}", self);
                "Upstream request failed".to_string()
            }
        }
    }
}

impl From<UpstreamError> for SubsystemResolutionError {
    fn from(e: UpstreamError) -> Self {
        SubsystemResolutionError::UserDisplayError(e.user_error_message())
    }
}
