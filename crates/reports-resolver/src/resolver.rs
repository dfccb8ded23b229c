// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_graphql_parser::types::{FieldDefinition, OperationType, TypeDefinition};
use async_graphql_value::ConstValue;
use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use core_resolver::{
    QueryResponse, QueryResponseBody,
    plugin::{SubsystemGraphQLResolver, SubsystemResolutionError},
    validation::field::ValidatedField,
};

use crate::client::Fetcher;
use crate::embed::embed_plan;
use crate::entity::EntityKind;
use crate::envelope::link_href;
use crate::schema;
use crate::shape::shape;

pub struct ReportsSubsystemResolver {
    pub id: &'static str,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

#[async_trait]
impl SubsystemGraphQLResolver for ReportsSubsystemResolver {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn resolve<'a>(
        &'a self,
        field: &'a ValidatedField,
        operation_type: OperationType,
    ) -> Result<Option<QueryResponse>, SubsystemResolutionError> {
        if operation_type != OperationType::Query {
            return Ok(None);
        }

        let response = match field.name.as_str() {
            "account" => Some(self.resolve_account(field).await),
            "report" => Some(self.resolve_report(field).await),
            "report_run" => Some(self.resolve_report_run(field).await),
            _ => None,
        };

        response.transpose()
    }

    fn schema_queries(&self) -> Vec<FieldDefinition> {
        schema::schema_queries()
    }

    fn schema_types(&self) -> Vec<TypeDefinition> {
        schema::schema_types()
    }
}

impl ReportsSubsystemResolver {
    async fn resolve_account(
        &self,
        field: &ValidatedField,
    ) -> Result<QueryResponse, SubsystemResolutionError> {
        let name = string_arg(field, "name")?;

        self.resolve_entity(EntityKind::Account, format!("/api/{name}"), field)
            .await
    }

    async fn resolve_report(
        &self,
        field: &ValidatedField,
    ) -> Result<QueryResponse, SubsystemResolutionError> {
        let username = string_arg(field, "username")?;
        let token = string_arg(field, "token")?;

        self.resolve_entity(
            EntityKind::Report,
            format!("/api/{username}/reports/{token}"),
            field,
        )
        .await
    }

    async fn resolve_report_run(
        &self,
        field: &ValidatedField,
    ) -> Result<QueryResponse, SubsystemResolutionError> {
        let username = string_arg(field, "username")?;
        let report_token = string_arg(field, "reportToken")?;
        let run_token = string_arg(field, "runToken")?;

        self.resolve_entity(
            EntityKind::ReportRun,
            format!("/api/{username}/reports/{report_token}/runs/{run_token}"),
            field,
        )
        .await
    }

    /// One pass per top-level field: map the immediate subfields to an embed plan, fetch
    /// the primary resource, reshape it, then perform any follow-up fetches and merge them
    /// in. Any fetch failure aborts the whole field; there are no partial results.
    #[instrument(
        name = "ReportsSubsystemResolver::resolve_entity"
        skip(self, field)
        )]
    async fn resolve_entity(
        &self,
        kind: EntityKind,
        path: String,
        field: &ValidatedField,
    ) -> Result<QueryResponse, SubsystemResolutionError> {
        let selected_fields: Vec<&str> =
            field.subfields.iter().map(|f| f.name.as_str()).collect();
        let plan = embed_plan(kind, &selected_fields);

        let envelope = self.fetcher.fetch(&path, &plan.directives).await?;

        let mut shaped = shape(kind, &envelope, &field.subfields);

        for follow_up in &plan.follow_ups {
            // The plan was derived from the subfields, so at least one matching field exists;
            // aliases may produce several.
            let requesting: Vec<&ValidatedField> = field
                .subfields
                .iter()
                .filter(|f| f.name.as_str() == follow_up.field)
                .collect();

            // A missing link is absence, not an error: the relation stays null.
            let Some(href) = link_href(&envelope, follow_up.link) else {
                continue;
            };

            let sub_envelope = self.fetcher.fetch(href, &[follow_up.directive]).await?;

            if let Value::Object(map) = &mut shaped {
                for subfield in requesting {
                    map.insert(
                        subfield.output_name(),
                        shape(follow_up.target, &sub_envelope, &subfield.subfields),
                    );
                }
            }
        }

        Ok(QueryResponse {
            body: QueryResponseBody::Json(shaped),
            headers: vec![],
        })
    }
}

fn string_arg<'a>(
    field: &'a ValidatedField,
    name: &str,
) -> Result<&'a str, SubsystemResolutionError> {
    match field.arguments.get(name) {
        Some(ConstValue::String(value)) => Ok(value),
        _ => Err(SubsystemResolutionError::MissingArgument(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use common::operation_payload::OperationsPayload;
    use core_resolver::system_resolver::{SystemResolutionError, SystemResolver};

    use crate::embed::EmbedDirective;
    use crate::error::{UpstreamError, UpstreamStatusError};

    /// Scripted upstream: returns canned envelopes in order and records every request.
    struct StubFetcher {
        responses: Mutex<VecDeque<Result<Value, UpstreamError>>>,
        requests: Mutex<Vec<(String, Vec<&'static str>)>>,
    }

    impl StubFetcher {
        fn new(responses: Vec<Result<Value, UpstreamError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(vec![]),
            })
        }

        fn requests(&self) -> Vec<(String, Vec<&'static str>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(
            &self,
            path: &str,
            embeds: &[EmbedDirective],
        ) -> Result<Value, UpstreamError> {
            self.requests
                .lock()
                .unwrap()
                .push((path.to_string(), embeds.iter().map(|e| e.as_str()).collect()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected upstream fetch")
        }
    }

    async fn resolve(
        fetcher: Arc<StubFetcher>,
        query: &str,
    ) -> Result<Vec<(String, QueryResponse)>, SystemResolutionError> {
        let system_resolver = SystemResolver::new(Box::new(ReportsSubsystemResolver {
            id: "reports",
            fetcher,
        }));

        system_resolver
            .resolve_operations(OperationsPayload {
                operation_name: None,
                query: query.to_string(),
                variables: None,
            })
            .await
    }

    fn body(result: Vec<(String, QueryResponse)>, field: &str) -> Value {
        result
            .into_iter()
            .find(|(name, _)| name == field)
            .map(|(_, response)| response.body.to_json().unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn nested_queries_round_trip() {
        let fetcher = StubFetcher::new(vec![Ok(json!({
            "token": "abc123",
            "name": "Revenue",
            "_embedded": {
                "queries": {
                    "_embedded": {
                        "queries": [
                            {
                                "token": "q1",
                                "_embedded": {
                                    "charts": {
                                        "_embedded": {
                                            "charts": [{
                                                "token": "c1",
                                                "_embedded": {
                                                    "color_palette": { "name": "default" }
                                                }
                                            }]
                                        }
                                    }
                                }
                            },
                            { "token": "q2" }
                        ]
                    }
                }
            }
        }))]);

        let result = resolve(
            fetcher.clone(),
            r#"
            query {
                report(username: "alice", token: "abc123") {
                    name
                    queries {
                        token
                        charts {
                            color_palette {
                                name
                            }
                        }
                    }
                }
            }
            "#,
        )
        .await
        .unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![(
                "/api/alice/reports/abc123".to_string(),
                vec![
                    "embed[queries][queries][charts]",
                    "embed[queries][queries][tables]",
                ]
            )]
        );

        assert_eq!(
            body(result, "report"),
            json!({
                "name": "Revenue",
                "queries": [
                    {
                        "token": "q1",
                        "charts": [{ "color_palette": { "name": "default" } }]
                    },
                    { "token": "q2", "charts": [] }
                ]
            })
        );
    }

    #[tokio::test]
    async fn last_run_takes_exactly_two_fetches() {
        let fetcher = StubFetcher::new(vec![
            Ok(json!({
                "token": "abc123",
                "_links": {
                    "last_run": { "href": "/api/alice/reports/abc123/runs/xyz789" }
                }
            })),
            Ok(json!({
                "token": "xyz789",
                "state": "succeeded",
                "_embedded": {
                    "query_runs": {
                        "_embedded": {
                            "query_runs": [{
                                "token": "qr1",
                                "_embedded": {
                                    "result": {
                                        "row_count": 42,
                                        "_links": {
                                            "csv": { "href": "/api/runs/qr1/results/content.csv" }
                                        }
                                    }
                                }
                            }]
                        }
                    }
                }
            })),
        ]);

        let result = resolve(
            fetcher.clone(),
            r#"
            query {
                report(username: "alice", token: "abc123") {
                    last_run {
                        state
                        query_runs {
                            result {
                                csv_href
                            }
                        }
                    }
                }
            }
            "#,
        )
        .await
        .unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![
                ("/api/alice/reports/abc123".to_string(), vec![]),
                (
                    "/api/alice/reports/abc123/runs/xyz789".to_string(),
                    vec!["embed[query_runs][query_runs][result]"]
                ),
            ]
        );

        assert_eq!(
            body(result, "report"),
            json!({
                "last_run": {
                    "state": "succeeded",
                    "query_runs": [{
                        "result": { "csv_href": "/api/runs/qr1/results/content.csv" }
                    }]
                }
            })
        );
    }

    #[tokio::test]
    async fn missing_last_run_link_resolves_to_null_with_single_fetch() {
        let fetcher = StubFetcher::new(vec![Ok(json!({ "token": "abc123" }))]);

        let result = resolve(
            fetcher.clone(),
            r#"
            query {
                report(username: "alice", token: "abc123") {
                    token
                    last_run {
                        state
                    }
                }
            }
            "#,
        )
        .await
        .unwrap();

        assert_eq!(fetcher.requests().len(), 1);
        assert_eq!(
            body(result, "report"),
            json!({ "token": "abc123", "last_run": null })
        );
    }

    #[tokio::test]
    async fn upstream_status_error_aborts_the_field() {
        let fetcher = StubFetcher::new(vec![Err(UpstreamError::Status(UpstreamStatusError {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            url: "https://app.chartbeam.io/api/alice".to_string(),
        }))]);

        let result = resolve(
            fetcher,
            r#"
            query {
                account(name: "alice") {
                    username
                }
            }
            "#,
        )
        .await;

        match result {
            Err(SystemResolutionError::SubsystemResolutionError(e)) => {
                assert!(e.user_error_message().unwrap().contains("500"));
            }
            other => panic!("Expected a subsystem resolution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn follow_up_failure_aborts_the_whole_field() {
        let fetcher = StubFetcher::new(vec![
            Ok(json!({
                "token": "abc123",
                "_links": { "last_run": { "href": "/api/alice/reports/abc123/runs/xyz789" } }
            })),
            Err(UpstreamError::Status(UpstreamStatusError {
                status: reqwest::StatusCode::BAD_GATEWAY,
                url: "https://app.chartbeam.io/api/alice/reports/abc123/runs/xyz789".to_string(),
            })),
        ]);

        let result = resolve(
            fetcher,
            r#"
            query {
                report(username: "alice", token: "abc123") {
                    token
                    last_run { state }
                }
            }
            "#,
        )
        .await;

        assert!(matches!(
            result,
            Err(SystemResolutionError::SubsystemResolutionError(_))
        ));
    }

    #[tokio::test]
    async fn account_without_data_sources_relation_yields_empty_sequence() {
        let fetcher = StubFetcher::new(vec![Ok(json!({ "username": "alice" }))]);

        let result = resolve(
            fetcher.clone(),
            r#"
            query {
                account(name: "alice") {
                    username
                    data_sources {
                        name
                    }
                }
            }
            "#,
        )
        .await
        .unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![(
                "/api/alice".to_string(),
                vec!["embed[data_sources][data_sources]"]
            )]
        );
        assert_eq!(
            body(result, "account"),
            json!({ "username": "alice", "data_sources": [] })
        );
    }

    #[tokio::test]
    async fn scalar_only_selection_fetches_without_directives() {
        let fetcher = StubFetcher::new(vec![Ok(json!({
            "username": "alice",
            "name": "Alice",
            "plan_code": "standard"
        }))]);

        let result = resolve(
            fetcher.clone(),
            r#"
            query {
                account(name: "alice") {
                    username
                    plan_code
                }
            }
            "#,
        )
        .await
        .unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![("/api/alice".to_string(), vec![])]
        );
        assert_eq!(
            body(result, "account"),
            json!({ "username": "alice", "plan_code": "standard" })
        );
    }
}
