// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! GraphQL subsystem over the Chartbeam reports REST API.
//!
//! The reports API speaks a HAL-flavored envelope: a resource carries its own scalar fields
//! plus optional `_embedded` (inlined related resources) and `_links` (URLs to related
//! resources) sections. Related collections are only inlined when the request carries the
//! matching `embed[...]=1` query parameters, so resolution works in three steps: map the
//! requested GraphQL fields to embed directives, fetch, then reshape the envelope into the
//! plain object tree the client asked for.

mod client;
mod embed;
mod entity;
mod envelope;
mod error;
mod resolver;
mod schema;
mod shape;

pub use client::{Fetcher, ReportsClient, ReportsClientError};
pub use embed::EmbedDirective;
pub use error::{UpstreamError, UpstreamStatusError};
pub use resolver::ReportsSubsystemResolver;
