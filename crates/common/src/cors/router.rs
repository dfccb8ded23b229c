// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use http::{Method, StatusCode};

use crate::{
    cors::{allow::HeaderStringProvider, config::CorsConfig},
    http::{Headers, RequestPayload, ResponseBody, ResponsePayload},
    router::Router,
};

use super::config::CorsResponse;

/// Reference: https://fetch.spec.whatwg.org/#http-requests
pub struct CorsRouter {
    underlying: Arc<dyn Router + Send>,
    config: CorsConfig,
}

impl CorsRouter {
    pub fn new(underlying: Arc<dyn Router + Send>, config: CorsConfig) -> Self {
        Self { underlying, config }
    }
}

#[async_trait::async_trait]
impl Router for CorsRouter {
    /// Route a request applying CORS rules.
    ///
    /// For a denied cross-site request, we return 403 (Forbidden), since there is no
    /// specified standard, but https://github.com/whatwg/fetch/issues/172 makes sense.
    /// It suggests the possibility of adding more details in the body, but also cautions
    /// to not reveal too much information. Therefore, we don't add a body.
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        let origin_header = request.get_head().get_header(http::header::ORIGIN.as_str());

        let add_cors_headers = |response: &mut ResponsePayload, origin: &str| {
            let headers = &mut response.headers;
            headers.insert(
                http::header::ACCESS_CONTROL_ALLOW_ORIGIN.to_string(),
                origin.to_string(),
            );
            if let Some(method_header) = self.config.allow_methods.header_string() {
                headers.insert(
                    http::header::ACCESS_CONTROL_ALLOW_METHODS.to_string(),
                    method_header,
                );
            }
            if let Some(headers_header) = self.config.allow_headers.header_string() {
                headers.insert(
                    http::header::ACCESS_CONTROL_ALLOW_HEADERS.to_string(),
                    headers_header,
                );
            }
            if let Some(max_age_seconds) = self.config.max_age_seconds {
                headers.insert(
                    http::header::ACCESS_CONTROL_MAX_AGE.to_string(),
                    max_age_seconds.to_string(),
                );
            }
            // Currently, we only vary by origin (specifically, we don't vary by
            // "Access-Control-Request-Method" or "Access-Control-Request-Headers")
            headers.insert(http::header::VARY.to_string(), "Origin".to_string());
        };

        let forbidden_response = || ResponsePayload {
            body: ResponseBody::None,
            headers: Headers::new(),
            status_code: StatusCode::FORBIDDEN,
        };

        let cors_response = self
            .config
            .allow_origin(origin_header.as_deref(), &request.get_head().get_method());

        if request.get_head().get_method() == Method::OPTIONS {
            match cors_response {
                CorsResponse::Allow(origin) => {
                    let mut response = ResponsePayload {
                        body: ResponseBody::None,
                        headers: Headers::new(),
                        status_code: StatusCode::OK,
                    };
                    add_cors_headers(&mut response, origin);

                    Some(response)
                }
                CorsResponse::NoCorsHeaders | CorsResponse::Deny => Some(forbidden_response()),
            }
        } else {
            match cors_response {
                CorsResponse::Allow(origin) => {
                    let mut response = self.underlying.route(request).await;

                    if let Some(ref mut response) = response {
                        add_cors_headers(response, origin);
                    }

                    response
                }
                CorsResponse::NoCorsHeaders => self.underlying.route(request).await,
                CorsResponse::Deny => Some(forbidden_response()),
            }
        }
    }
}
