// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! The server code is instrumented with Rust's `tracing` framework.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the value of
//! the `BEAM_LOG` environment variable, which follows the same conventions as `RUST_LOG`. This
//! provides console logging.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

const BEAM_LOG: &str = "BEAM_LOG";

/// Initialize the tracing subscriber.
///
/// Creates a `tracing_subscriber::fmt` layer with an environment-driven filter.
pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(BEAM_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
