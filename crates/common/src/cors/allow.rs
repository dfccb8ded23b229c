// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

/// Computes the value of a CORS response header, if one should be added at all.
pub trait HeaderStringProvider {
    fn header_string(&self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsAllowOrigin {
    All,
    Specific(HashSet<String>),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsAllowMethods {
    All,
    Specific(Vec<String>),
    None,
}

impl HeaderStringProvider for CorsAllowMethods {
    fn header_string(&self) -> Option<String> {
        match self {
            CorsAllowMethods::All => Some("*".to_string()),
            CorsAllowMethods::Specific(methods) => Some(methods.join(", ")),
            CorsAllowMethods::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsAllowHeaders {
    All,
    Specific(Vec<String>),
    None,
}

impl HeaderStringProvider for CorsAllowHeaders {
    fn header_string(&self) -> Option<String> {
        match self {
            CorsAllowHeaders::All => Some("*".to_string()),
            CorsAllowHeaders::Specific(headers) => Some(headers.join(", ")),
            CorsAllowHeaders::None => None,
        }
    }
}
