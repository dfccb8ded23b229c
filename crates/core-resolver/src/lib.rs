// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod field_resolver;
mod query_response;

pub mod plugin;
pub mod schema;
pub mod system_resolver;
pub mod validation;

pub use field_resolver::FieldResolver;
pub use query_response::{QueryResponse, QueryResponseBody};
