// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use beam_env::{EnvError, Environment};
use common::env_const::{
    BEAM_API_BASE_URL, BEAM_API_TOKEN, BEAM_UPSTREAM_TIMEOUT_SECS, DEFAULT_API_BASE_URL,
};

use crate::embed::EmbedDirective;
use crate::error::{UpstreamError, UpstreamStatusError};

const TRK_SOURCE: &str = "graphql";

const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// The outbound seam of the subsystem. Tests substitute a scripted implementation; the
/// production implementation is [`ReportsClient`].
#[async_trait]
pub trait Fetcher {
    /// Fetch a resource envelope. `path` is either a provider-relative path (primary
    /// fetches) or an absolute URL (follow-up links from `_links`).
    async fn fetch(&self, path: &str, embeds: &[EmbedDirective]) -> Result<Value, UpstreamError>;
}

#[derive(Error, Debug)]
pub enum ReportsClientError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Failed to construct the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the reports API.
///
/// The credential is threaded in at construction; there is no per-request auth
/// negotiation or refresh. Every call is a GET with a fixed tracking parameter plus one
/// `<directive>=1` pair per embed directive.
pub struct ReportsClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: String,
}

impl ReportsClient {
    pub fn new(
        base_url: Url,
        api_token: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_token,
        })
    }

    pub fn from_env(env: &dyn Environment) -> Result<Self, ReportsClientError> {
        let api_token = env
            .get(BEAM_API_TOKEN)
            .ok_or(EnvError::NotSet(BEAM_API_TOKEN))?;

        let base_url = env.get_or_else(BEAM_API_BASE_URL, DEFAULT_API_BASE_URL);
        let base_url = Url::parse(&base_url).map_err(|e| EnvError::InvalidValue {
            env_key: BEAM_API_BASE_URL,
            env_value: base_url.clone(),
            message: e.to_string(),
        })?;

        let timeout = match env.get(BEAM_UPSTREAM_TIMEOUT_SECS) {
            Some(value) => {
                let secs = value.parse::<u64>().map_err(|e| EnvError::InvalidValue {
                    env_key: BEAM_UPSTREAM_TIMEOUT_SECS,
                    env_value: value.clone(),
                    message: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        Ok(Self::new(base_url, api_token, timeout)?)
    }

    fn request_url(
        &self,
        path: &str,
        embeds: &[EmbedDirective],
    ) -> Result<Url, UpstreamError> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            Url::parse(path)
        } else {
            self.base_url.join(path)
        }
        .map_err(|_| UpstreamError::InvalidUrl(path.to_string()))?;

        url.query_pairs_mut().append_pair("trk_source", TRK_SOURCE);
        for embed in embeds {
            url.query_pairs_mut().append_pair(embed.as_str(), "1");
        }

        Ok(url)
    }
}

#[async_trait]
impl Fetcher for ReportsClient {
    async fn fetch(
        &self,
        path: &str,
        embeds: &[EmbedDirective],
    ) -> Result<Value, UpstreamError> {
        let url = self.request_url(path, embeds)?;

        debug!(%url, "Fetching from the reports API");

        let response = self
            .http
            .get(url.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.api_token),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamStatusError {
                status,
                url: url.to_string(),
            }
            .into());
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::embed_plan;
    use crate::entity::EntityKind;
    use beam_env::MapEnvironment;

    fn test_client() -> ReportsClient {
        ReportsClient::new(
            Url::parse("https://app.chartbeam.io").unwrap(),
            "secret".to_string(),
            DEFAULT_UPSTREAM_TIMEOUT,
        )
        .unwrap()
    }

    #[test]
    fn request_url_carries_tracking_and_embed_parameters() {
        let client = test_client();
        let plan = embed_plan(EntityKind::Report, &["queries"]);

        let url = client
            .request_url("/api/alice/reports/abc123", &plan.directives)
            .unwrap();

        assert_eq!(url.path(), "/api/alice/reports/abc123");
        let query_pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            query_pairs,
            vec![
                ("trk_source".to_string(), "graphql".to_string()),
                (
                    "embed[queries][queries][charts]".to_string(),
                    "1".to_string()
                ),
                (
                    "embed[queries][queries][tables]".to_string(),
                    "1".to_string()
                ),
            ]
        );
    }

    #[test]
    fn request_url_accepts_absolute_follow_up_links() {
        let client = test_client();

        let url = client
            .request_url("https://app.chartbeam.io/api/alice/reports/abc123/runs/xyz", &[])
            .unwrap();

        assert_eq!(url.path(), "/api/alice/reports/abc123/runs/xyz");
    }

    #[test]
    fn from_env_requires_api_token() {
        let env = MapEnvironment::new();
        assert!(matches!(
            ReportsClient::from_env(&env),
            Err(ReportsClientError::Env(EnvError::NotSet(_)))
        ));
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        let env = MapEnvironment::from([
            ("BEAM_API_TOKEN", "secret"),
            ("BEAM_UPSTREAM_TIMEOUT_SECS", "soon"),
        ]);
        assert!(matches!(
            ReportsClient::from_env(&env),
            Err(ReportsClientError::Env(EnvError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn from_env_with_token_uses_defaults() {
        let env = MapEnvironment::from([("BEAM_API_TOKEN", "secret")]);
        let client = ReportsClient::from_env(&env).unwrap();
        assert_eq!(client.base_url.as_str(), "https://app.chartbeam.io/");
    }
}
