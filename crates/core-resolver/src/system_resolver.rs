// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Pos,
    types::{ExecutableDocument, OperationType},
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, instrument};

use common::operation_payload::OperationsPayload;

use crate::{
    FieldResolver, QueryResponse, QueryResponseBody,
    plugin::{SubsystemGraphQLResolver, SubsystemResolutionError},
    schema::{QUERY_ROOT_TYPENAME, Schema},
    validation::{
        document_validator::DocumentValidator, field::ValidatedField,
        operation::ValidatedOperation, validation_error::ValidationError,
    },
};

const QUERY_DEPTH_LIMIT: usize = 10;

/// The top-level system resolver.
///
/// Parses and validates incoming operations against the static schema, then delegates each
/// top-level field to the subsystem resolver.
pub struct SystemResolver {
    subsystem_resolver: Box<dyn SubsystemGraphQLResolver + Send + Sync>,
    pub schema: Schema,
}

impl SystemResolver {
    pub fn new(subsystem_resolver: Box<dyn SubsystemGraphQLResolver + Send + Sync>) -> Self {
        let schema = Schema::new(
            subsystem_resolver.schema_types(),
            subsystem_resolver.schema_queries(),
        );

        Self {
            subsystem_resolver,
            schema,
        }
    }

    /// Resolve the provided top-level operation (which may contain multiple queries).
    ///
    /// Goes through the FieldResolver for ValidatedOperation (and thus get free support for
    /// `resolve_fields`) so that fragments in top-level queries are supported.
    #[instrument(
        name = "SystemResolver::resolve_operations"
        skip_all
        )]
    pub async fn resolve_operations(
        &self,
        operations_payload: OperationsPayload,
    ) -> Result<Vec<(String, QueryResponse)>, SystemResolutionError> {
        let operation = self.validate_operation(
            &operations_payload.query,
            operations_payload.operation_name,
            operations_payload.variables,
        )?;

        operation.resolve_fields(&operation.fields, self).await
    }

    pub(super) async fn resolve_operation(
        &self,
        operation_type: OperationType,
        operation: &ValidatedField,
    ) -> Result<QueryResponse, SystemResolutionError> {
        // With introspection not being served, the root __typename is the only meta field
        // answered here rather than by the subsystem.
        if operation.name.as_str() == "__typename" {
            return Ok(QueryResponse {
                body: QueryResponseBody::Json(serde_json::Value::String(
                    QUERY_ROOT_TYPENAME.to_string(),
                )),
                headers: vec![],
            });
        }

        self.subsystem_resolver
            .resolve(operation, operation_type)
            .await?
            .ok_or(SystemResolutionError::NoResolverFound)
    }

    #[instrument(skip_all)]
    fn validate_operation(
        &self,
        query: &str,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
    ) -> Result<ValidatedOperation, ValidationError> {
        let document = parse_query(query)?;

        let document_validator = DocumentValidator::new(
            &self.schema,
            operation_name,
            variables,
            QUERY_DEPTH_LIMIT,
        );

        document_validator.validate(document)
    }
}

#[async_trait]
impl FieldResolver<QueryResponse, SystemResolutionError, SystemResolver> for ValidatedOperation {
    async fn resolve_field<'e>(
        &'e self,
        field: &ValidatedField,
        system_resolver: &'e SystemResolver,
    ) -> Result<QueryResponse, SystemResolutionError> {
        system_resolver.resolve_operation(self.typ, field).await
    }
}

#[instrument(name = "system_resolver::parse_query")]
fn parse_query(query: &str) -> Result<ExecutableDocument, ValidationError> {
    async_graphql_parser::parse_query(query).map_err(|error| {
        error!(%error, "Failed to parse query");
        let (message, pos1, pos2) = match error {
            async_graphql_parser::Error::Syntax {
                message,
                start,
                end,
            } => {
                // Error::Syntax's message is formatted with newlines, escape them properly
                let message = message.escape_debug();
                (format!("Syntax error:\\n{message}"), start, end)
            }
            async_graphql_parser::Error::MultipleRoots { root, schema, pos } => {
                (format!("Multiple roots of {root} type"), schema, Some(pos))
            }
            async_graphql_parser::Error::MissingQueryRoot { pos } => {
                ("Missing query root".to_string(), pos, None)
            }
            async_graphql_parser::Error::MultipleOperations {
                anonymous,
                operation,
            } => (
                "Multiple operations".to_string(),
                anonymous,
                Some(operation),
            ),
            async_graphql_parser::Error::OperationDuplicated {
                operation: _,
                first,
                second,
            } => ("Operation duplicated".to_string(), first, Some(second)),
            async_graphql_parser::Error::FragmentDuplicated {
                fragment,
                first,
                second,
            } => (
                format!("Fragment {fragment} duplicated"),
                first,
                Some(second),
            ),
            async_graphql_parser::Error::MissingOperation => {
                ("Missing operation".to_string(), Pos::default(), None)
            }
            _ => ("Unknown error".to_string(), Pos::default(), None),
        };

        ValidationError::QueryParsingFailed(message, pos1, pos2)
    })
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid body JSON {0}")]
    InvalidBodyJson(serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SystemResolutionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No subsystem resolver found")]
    NoResolverFound,

    #[error("{0}")]
    SubsystemResolutionError(#[from] SubsystemResolutionError),

    #[error("Subsystem error: {0}")]
    Generic(String),

    #[error("Invalid request {0}")]
    RequestError(#[from] RequestError),
}

impl SystemResolutionError {
    // Message that should be emitted when the error is returned to the user.
    // This should hide any internal details of the error.
    pub fn user_error_message(&self) -> String {
        self.explicit_message()
            .unwrap_or_else(|| "Internal server error".to_string())
    }

    pub fn explicit_message(&self) -> Option<String> {
        match self {
            SystemResolutionError::Validation(error) => Some(error.to_string()),
            SystemResolutionError::SubsystemResolutionError(error) => error.user_error_message(),
            _ => None,
        }
    }
}
