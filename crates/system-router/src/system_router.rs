// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;

use beam_env::Environment;
use common::cors::{CorsConfig, CorsRouter};
use common::env_const::BEAM_CORS_DOMAINS;
use common::http::{RequestPayload, ResponsePayload};
use common::router::{CompositeRouter, Router};
use graphql_router::GraphQLRouter;

/// The server-facing router: every inbound request passes through CORS handling and is
/// then routed to the GraphQL endpoint (or 404s).
pub struct SystemRouter {
    underlying: CorsRouter,
}

impl SystemRouter {
    pub fn new(graphql_router: GraphQLRouter, env: Arc<dyn Environment>) -> Self {
        // The facade is meant to be called from browsers anywhere, so CORS defaults to
        // allowing any origin unless the deployment narrows it down.
        let cors_config =
            CorsConfig::from_env(Some(env.get_or_else(BEAM_CORS_DOMAINS, "*")));

        let underlying = CorsRouter::new(
            Arc::new(CompositeRouter::new(vec![Box::new(graphql_router)])),
            cors_config,
        );

        Self { underlying }
    }
}

#[async_trait]
impl Router for SystemRouter {
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        self.underlying.route(request).await
    }
}
