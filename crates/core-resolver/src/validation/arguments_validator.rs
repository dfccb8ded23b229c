// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use async_graphql_parser::{
    Pos, Positioned,
    types::{Field, InputValueDefinition},
};
use async_graphql_value::{ConstValue, Name, Number, Value, indexmap::IndexMap};

use crate::validation::validation_error::ValidationError;

use super::underlying_type;

pub struct ArgumentValidator<'a> {
    variables: &'a HashMap<Name, ConstValue>,
    field: &'a Positioned<Field>,
}

impl<'a> ArgumentValidator<'a> {
    #[must_use]
    pub fn new(variables: &'a HashMap<Name, ConstValue>, field: &'a Positioned<Field>) -> Self {
        Self { variables, field }
    }

    /// Validations performed:
    /// - Ensure that all required arguments are provided
    /// - Ensure that there are no stray arguments (arguments that are not defined in the field)
    /// - Ensure that scalar arguments match the declared type (all arguments in this schema
    ///   are scalars)
    pub(super) fn validate(
        &self,
        field_argument_definitions: &[&InputValueDefinition],
    ) -> Result<IndexMap<String, ConstValue>, ValidationError> {
        let field_name = self.field.node.name.node.as_str();

        // Stray arguments tracking: 1. Maintain a map of all the arguments supplied in the query
        let mut field_arguments: IndexMap<_, _> = self
            .field
            .node
            .arguments
            .iter()
            .map(|(name, value)| (&name.node, value))
            .collect();

        let validated_arguments = field_argument_definitions
            .iter()
            .filter_map(|argument_definition| {
                let argument_name = &argument_definition.name.node;
                // Stray arguments tracking: 2. Remove the argument being processed
                let argument_value = field_arguments.shift_remove(argument_name);

                self.validate_argument(argument_definition, argument_value)
                    .map(|argument_value| {
                        argument_value
                            .map(|argument_value| (argument_name.to_string(), argument_value))
                    })
            })
            .collect::<Result<_, _>>()?;

        // Stray arguments tracking: 3. Anything left in the map was not defined in the field
        if !field_arguments.is_empty() {
            let stray_arguments = field_arguments
                .keys()
                .map(|name| name.to_string())
                .collect::<Vec<_>>();

            Err(ValidationError::StrayArguments(
                stray_arguments,
                field_name.to_string(),
                self.field.pos,
            ))
        } else {
            Ok(validated_arguments)
        }
    }

    /// Validate a single argument
    /// Validations performed:
    /// - If the argument is a variable, the variable is defined
    /// - A null value is specified only for a nullable argument
    /// - Scalars match the expected type
    fn validate_argument(
        &self,
        argument_definition: &InputValueDefinition,
        argument_value: Option<&Positioned<Value>>,
    ) -> Option<Result<ConstValue, ValidationError>> {
        match argument_value {
            Some(value) => match &value.node {
                Value::Variable(name) => {
                    let resolved_variable = self.variables.get(name);
                    match resolved_variable {
                        Some(resolved_variable) => self.validate_argument(
                            argument_definition,
                            Some(&Positioned::new(
                                resolved_variable.clone().into_value(),
                                value.pos,
                            )),
                        ),
                        None => Some(Err(ValidationError::VariableNotFound(
                            name.to_string(),
                            self.field.pos,
                        ))),
                    }
                }
                Value::Null => Some(self.validate_null_argument(argument_definition, value.pos)),
                Value::Number(number) => {
                    Some(self.validate_number_argument(argument_definition, number, value.pos))
                }
                Value::String(string) => {
                    Some(self.validate_string_argument(argument_definition, string, value.pos))
                }
                Value::Boolean(boolean) => {
                    Some(self.validate_boolean_argument(argument_definition, boolean, value.pos))
                }
                other => Some(Err(ValidationError::InvalidArgumentType {
                    argument_name: argument_definition.name.node.to_string(),
                    expected_type: underlying_type(&argument_definition.ty.node).to_string(),
                    actual_type: format!("{other}"),
                    pos: value.pos,
                })),
            },
            None => {
                if argument_definition.ty.node.nullable {
                    None
                } else {
                    Some(Err(ValidationError::RequiredArgumentNotFound(
                        argument_definition.name.node.to_string(),
                        self.field.pos,
                    )))
                }
            }
        }
    }

    fn validate_null_argument(
        &self,
        argument_definition: &InputValueDefinition,
        pos: Pos,
    ) -> Result<ConstValue, ValidationError> {
        let ty = &argument_definition.ty.node;

        if ty.nullable {
            Ok(ConstValue::Null)
        } else {
            Err(ValidationError::RequiredArgumentNotFound(
                argument_definition.name.node.to_string(),
                pos,
            ))
        }
    }

    fn validate_number_argument(
        &self,
        argument_definition: &InputValueDefinition,
        number: &Number,
        pos: Pos,
    ) -> Result<ConstValue, ValidationError> {
        self.validate_scalar_argument(
            "Number",
            &["Int", "Float"],
            || ConstValue::Number(number.clone()),
            argument_definition,
            pos,
        )
    }

    fn validate_boolean_argument(
        &self,
        argument_definition: &InputValueDefinition,
        boolean: &bool,
        pos: Pos,
    ) -> Result<ConstValue, ValidationError> {
        self.validate_scalar_argument(
            "Boolean",
            &["Boolean"],
            || ConstValue::Boolean(*boolean),
            argument_definition,
            pos,
        )
    }

    fn validate_string_argument(
        &self,
        argument_definition: &InputValueDefinition,
        string: &str,
        pos: Pos,
    ) -> Result<ConstValue, ValidationError> {
        self.validate_scalar_argument(
            "String",
            &["String"],
            || ConstValue::String(string.to_string()),
            argument_definition,
            pos,
        )
    }

    /// Validate a scalar argument
    /// Check if the argument is compatible with one of the expected destination types
    fn validate_scalar_argument<const N: usize>(
        &self,
        argument_typename: &str,
        acceptable_destination_types: &[&str; N],
        to_value: impl FnOnce() -> ConstValue,
        argument_definition: &InputValueDefinition,
        pos: Pos,
    ) -> Result<ConstValue, ValidationError> {
        let ty = &argument_definition.ty.node;
        let underlying = underlying_type(ty);

        if acceptable_destination_types.contains(&underlying.as_str()) {
            Ok(to_value())
        } else {
            Err(ValidationError::InvalidArgumentType {
                argument_name: argument_definition.name.node.to_string(),
                expected_type: underlying.to_string(),
                actual_type: argument_typename.to_string(),
                pos,
            })
        }
    }
}
