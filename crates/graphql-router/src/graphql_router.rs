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
use common::env_const::get_graphql_http_path;

use common::http::{Headers, RequestHead, RequestPayload, ResponseBody, ResponsePayload};
use common::operation_payload::OperationsPayload;
use common::router::Router;
use core_resolver::QueryResponse;
use http::StatusCode;

use ::tracing::instrument;
use async_graphql_parser::Pos;
use async_stream::try_stream;
use bytes::Bytes;
use core_resolver::QueryResponseBody;
use core_resolver::system_resolver::{RequestError, SystemResolutionError, SystemResolver};

use beam_env::Environment;

pub struct GraphQLRouter {
    system_resolver: SystemResolver,
    graphql_path: String,
}

impl GraphQLRouter {
    pub fn new(system_resolver: SystemResolver, env: Arc<dyn Environment>) -> Self {
        let graphql_path = get_graphql_http_path(env.as_ref());

        Self {
            system_resolver,
            graphql_path,
        }
    }

    fn suitable(&self, request_head: &(dyn RequestHead + Send + Sync)) -> bool {
        request_head.get_path() == self.graphql_path
            && request_head.get_method() == http::Method::POST
    }
}

#[async_trait]
impl Router for GraphQLRouter {
    /// Resolves an incoming query, returning a response stream containing JSON and a set
    /// of HTTP headers. The JSON may be either the data returned by the query, or a list of errors
    /// if something went wrong.
    #[instrument(
        name = "GraphQLRouter::route"
        skip(self, request)
    )]
    async fn route(&self, request: &mut (dyn RequestPayload + Send)) -> Option<ResponsePayload> {
        if !self.suitable(request.get_head()) {
            return None;
        }

        let response = resolve_in_memory(request, &self.system_resolver).await;

        if let Err(SystemResolutionError::RequestError(e)) = response {
            tracing::error!("Error while resolving request: {:?}", e);
            return Some(ResponsePayload {
                body: ResponseBody::None,
                headers: Headers::new(),
                status_code: StatusCode::BAD_REQUEST,
            });
        }

        let mut headers = if let Ok(ref response) = response {
            Headers::from_vec(
                response
                    .iter()
                    .flat_map(|(_, qr)| qr.headers.clone())
                    .collect(),
            )
        } else {
            Headers::new()
        };

        headers.insert("content-type".into(), "application/json".into());

        let stream = try_stream! {
            macro_rules! report_position {
                ($position:expr) => {
                    let p: Pos = $position;

                    yield Bytes::from_static(br#"{"line": "#);
                    yield Bytes::from(p.line.to_string());
                    yield Bytes::from_static(br#", "column": "#);
                    yield Bytes::from(p.column.to_string());
                    yield Bytes::from_static(br#"}"#);
                };
            }

            macro_rules! report_positions {
                ($positions:expr) => {
                    let mut first = true;
                    for p in $positions {
                        if !first {
                            yield Bytes::from_static(b", ");
                        }
                        first = false;
                        report_position!(p);
                    }
                };
            }

            match response {
                Ok(parts) => {
                    let parts_len = parts.len();
                    yield Bytes::from_static(br#"{"data": {"#);
                    for (index, part) in parts.into_iter().enumerate() {
                        yield Bytes::from_static(b"\"");
                        yield Bytes::from(part.0);
                        yield Bytes::from_static(br#"":"#);
                        match part.1.body {
                            QueryResponseBody::Json(value) => yield Bytes::from(value.to_string()),
                            QueryResponseBody::Raw(Some(value)) => yield Bytes::from(value),
                            QueryResponseBody::Raw(None) => yield Bytes::from_static(b"null"),
                        };
                        if index != parts_len - 1 {
                            yield Bytes::from_static(b", ");
                        }
                    };
                    yield Bytes::from_static(b"}}");
                },
                Err(err) => {
                    yield Bytes::from_static(br#"{"errors": [{"message":""#);
                    yield Bytes::from(
                        err.user_error_message().to_string()
                            .replace('\"', "")
                            .replace('\n', "; ")
                    );
                    yield Bytes::from_static(br#"""#);
                    if let SystemResolutionError::Validation(err) = err {
                        yield Bytes::from_static(br#", "locations": ["#);
                        report_positions!(err.positions());
                        yield Bytes::from_static(br#"]"#);
                    };
                    yield Bytes::from_static(br#"}"#);
                    yield Bytes::from_static(b"]}");
                },
            }
        };

        Some(ResponsePayload {
            body: ResponseBody::Stream(Box::pin(stream)),
            headers,
            status_code: StatusCode::OK,
        })
    }
}

#[instrument(
    name = "graphql_router::resolve_in_memory"
    skip(request, system_resolver)
)]
async fn resolve_in_memory(
    request: &mut (dyn RequestPayload + Send),
    system_resolver: &SystemResolver,
) -> Result<Vec<(String, QueryResponse)>, SystemResolutionError> {
    let body = request.take_body();

    let operations_payload = OperationsPayload::from_json(body)
        .map_err(|e| SystemResolutionError::RequestError(RequestError::InvalidBodyJson(e)))?;

    system_resolver.resolve_operations(operations_payload).await
}
