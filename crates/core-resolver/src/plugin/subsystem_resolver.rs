// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{QueryResponse, validation::field::ValidatedField};
use async_graphql_parser::types::{FieldDefinition, OperationType, TypeDefinition};
use async_trait::async_trait;
use thiserror::Error;

/// Provides resolution of operations for a subsystem.
///
/// A subsystem owns a set of root queries along with the type definitions backing them, and
/// resolves one top-level field per invocation.
#[async_trait]
pub trait SubsystemGraphQLResolver: Sync {
    /// The id of the subsystem (for debugging purposes)
    fn id(&self) -> &'static str;

    /// Resolve an individual operation
    ///
    /// Returns `None` if the operation is not handled by this subsystem
    async fn resolve<'a>(
        &'a self,
        operation: &'a ValidatedField,
        operation_type: OperationType,
    ) -> Result<Option<QueryResponse>, SubsystemResolutionError>;

    // Support for schema creation (and in turn, validation)

    /// Queries supported by this subsystem
    fn schema_queries(&self) -> Vec<FieldDefinition>;

    /// Types supported by this subsystem
    fn schema_types(&self) -> Vec<TypeDefinition>;
}

#[derive(Error, Debug)]
pub enum SubsystemResolutionError {
    #[error("Invalid field {0} for {1}")]
    InvalidField(String, &'static str), // (field name, container type)

    #[error("Missing argument '{0}'")]
    MissingArgument(String),

    #[error("{0}")]
    UserDisplayError(String), // Error message to be displayed to the user (subsystems should hide internal errors through this)
}

impl SubsystemResolutionError {
    pub fn user_error_message(&self) -> Option<String> {
        match self {
            SubsystemResolutionError::InvalidField(field_name, container_type) => {
                Some(format!("Invalid field {field_name} for {container_type}"))
            }
            SubsystemResolutionError::MissingArgument(argument) => {
                Some(format!("Missing argument '{argument}'"))
            }
            SubsystemResolutionError::UserDisplayError(message) => Some(message.to_string()),
        }
    }
}
