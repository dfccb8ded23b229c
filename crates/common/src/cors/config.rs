// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http::Method;

use super::{CorsAllowHeaders, CorsAllowMethods, CorsAllowOrigin};

/// CORS configuration for a router
///
/// The CORS configuration is used to determine the CORS headers to add to a response
/// given the origin and the method of the request.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allow_origin: CorsAllowOrigin,
    pub allow_methods: CorsAllowMethods,
    pub allow_headers: CorsAllowHeaders,
    pub max_age_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsResponse<'a> {
    Allow(&'a str), // Allow and add CORS headers with the given origin
    NoCorsHeaders,  // Allow but do not add CORS headers
    Deny,           // Deny (and do not add CORS headers)
}

impl CorsConfig {
    /// Create a CorsConfig from a list of domains
    ///
    /// The domains list is a comma-separated list of domains, with special values:
    /// - `*` means all origins are allowed.
    /// - `""` (empty string) means no origins are allowed.
    pub fn from_env(domains_list: Option<String>) -> Self {
        let allow_origin = match domains_list {
            Some(domains) => match domains.trim() {
                "*" => CorsAllowOrigin::All,
                "" => CorsAllowOrigin::None,
                _ => CorsAllowOrigin::Specific(
                    domains
                        .split(',')
                        .map(|domain| domain.trim().to_string())
                        .collect(),
                ),
            },
            None => CorsAllowOrigin::None,
        };

        Self {
            allow_origin,
            allow_methods: CorsAllowMethods::All,
            allow_headers: CorsAllowHeaders::All,
            max_age_seconds: Some(3600),
        }
    }

    /// Determine the CORS response for a given origin and method
    ///
    /// From the CORS spec:
    /// "A CORS request is an HTTP request that includes an `Origin` header.
    /// It cannot be reliably identified as participating in the CORS protocol
    /// as the `Origin` header is also included for all requests whose method
    /// is neither `GET` nor `HEAD`.".
    ///
    /// Therefore, we allow all requests that do not have an `Origin` header, but
    /// indicate that CORS headers should not be added.
    ///
    /// Note that even for same-origin requests, for non-GET/HEAD, the browser sends
    /// an `Origin` header, and we must allow this request (but not add CORS headers).
    pub fn allow_origin<'a>(&self, origin: Option<&'a str>, method: &Method) -> CorsResponse<'a> {
        let deny_response = || match method {
            &Method::OPTIONS => CorsResponse::Deny,
            _ => CorsResponse::NoCorsHeaders,
        };

        match origin {
            Some(origin) => match &self.allow_origin {
                CorsAllowOrigin::All => CorsResponse::Allow(origin),
                CorsAllowOrigin::Specific(allowed_origins) => {
                    if allowed_origins.contains(&origin.to_string()) {
                        CorsResponse::Allow(origin)
                    } else {
                        deny_response()
                    }
                }
                CorsAllowOrigin::None => deny_response(),
            },
            None => CorsResponse::NoCorsHeaders,
        }
    }
}
