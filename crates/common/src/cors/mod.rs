// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod allow;
pub mod config;
pub mod router;

pub use allow::CorsAllowHeaders;
pub use allow::CorsAllowMethods;
pub use allow::CorsAllowOrigin;
pub use config::CorsConfig;
pub use router::CorsRouter;
