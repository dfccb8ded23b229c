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
    types::{
        Field, FieldDefinition, FragmentDefinition, FragmentSpread, Selection, SelectionSet, Type,
        TypeDefinition, TypeKind,
    },
};
use async_graphql_value::{ConstValue, Name, indexmap::IndexMap};

use crate::schema::Schema;
use crate::validation::field::ValidatedField;
use crate::validation::validation_error::ValidationError;

use super::{arguments_validator::ArgumentValidator, underlying_type};

/// Context for validating a selection set.
#[derive(Debug)]
pub struct SelectionSetValidator<'a> {
    schema: &'a Schema,
    /// The parent type of this field.
    container_type: &'a TypeDefinition,
    variables: &'a HashMap<Name, ConstValue>,
    fragment_definitions: &'a HashMap<Name, Positioned<FragmentDefinition>>,
}

impl<'a> SelectionSetValidator<'a> {
    #[must_use]
    pub fn new(
        schema: &'a Schema,
        container_type: &'a TypeDefinition,
        variables: &'a HashMap<Name, ConstValue>,
        fragment_definitions: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    ) -> Self {
        Self {
            schema,
            container_type,
            variables,
            fragment_definitions,
        }
    }

    /// Validate a selection set.
    ///
    /// Validations performed:
    /// - Each field is defined in the `container_type`
    /// - Each fragment referred is defined
    /// - Arguments to each field are valid (see [ArgumentValidator] for more details)
    ///
    /// # Returns
    ///   A vector of validated fields (any fragment is resolved and inlined, thus
    ///   normalizing the fields)
    pub(super) fn validate(
        &self,
        selection_set: &Positioned<SelectionSet>,
        depth: usize,
        depth_check: &impl Fn(usize, Pos) -> Result<(), ValidationError>,
    ) -> Result<Vec<ValidatedField>, ValidationError> {
        depth_check(depth, selection_set.pos)?;

        selection_set
            .node
            .items
            .iter()
            .map(|selection| self.validate_selection(selection, depth, depth_check))
            .collect::<Result<Vec<_>, _>>()
            .map(|f| f.into_iter().flatten().collect())
    }

    fn validate_selection(
        &self,
        selection: &Positioned<Selection>,
        depth: usize,
        depth_check: &impl Fn(usize, Pos) -> Result<(), ValidationError>,
    ) -> Result<Vec<ValidatedField>, ValidationError> {
        match &selection.node {
            Selection::Field(field) => self
                .validate_field(field, depth, depth_check)
                .map(|field| vec![field]),
            Selection::FragmentSpread(fragment_spread) => {
                self.fragment_definition(fragment_spread)
                    .and_then(|fragment_definition| {
                        self.validate(&fragment_definition.selection_set, depth, depth_check)
                    })
            }
            Selection::InlineFragment(inline_fragment) => Err(
                ValidationError::InlineFragmentNotSupported(inline_fragment.pos),
            ),
        }
    }

    fn validate_field(
        &self,
        field: &Positioned<Field>,
        depth: usize,
        depth_check: &impl Fn(usize, Pos) -> Result<(), ValidationError>,
    ) -> Result<ValidatedField, ValidationError> {
        // Special treatment for the __typename field, since we are not supposed to expose it as
        // a normal field (for example, we should not declare that the "Report" type has a
        // __typename field)
        if field.node.name.node.as_str() == "__typename" {
            if !field.node.arguments.is_empty() {
                Err(ValidationError::StrayArguments(
                    field
                        .node
                        .arguments
                        .iter()
                        .map(|arg| arg.0.node.to_string())
                        .collect(),
                    field.node.name.to_string(),
                    field.pos,
                ))
            } else if !field.node.selection_set.node.items.is_empty() {
                Err(ValidationError::ScalarWithField(
                    field.node.name.to_string(),
                    field.pos,
                ))
            } else {
                Ok(ValidatedField {
                    alias: field.node.alias.as_ref().map(|alias| alias.node.clone()),
                    name: field.node.name.node.clone(),
                    arguments: IndexMap::new(),
                    subfields: vec![],
                })
            }
        } else {
            let field_definition = self.get_field_definition(field)?;

            let subfields = if is_scalar(&field_definition.ty.node, self.schema) {
                if !field.node.selection_set.node.items.is_empty() {
                    return Err(ValidationError::ScalarWithField(
                        field.node.name.to_string(),
                        field.pos,
                    ));
                }
                vec![]
            } else {
                let field_type_definition = self.get_type_definition(&field_definition.ty, field)?;

                let subfield_validator = SelectionSetValidator::new(
                    self.schema,
                    field_type_definition,
                    self.variables,
                    self.fragment_definitions,
                );

                subfield_validator.validate(&field.node.selection_set, depth + 1, depth_check)?
            };

            let field_validator = ArgumentValidator::new(self.variables, field);

            let arguments = field_validator.validate(
                &field_definition
                    .arguments
                    .iter()
                    .map(|d| &d.node)
                    .collect::<Vec<_>>(),
            )?;

            Ok(ValidatedField {
                alias: field.node.alias.as_ref().map(|alias| alias.node.clone()),
                name: field.node.name.node.clone(),
                arguments,
                subfields,
            })
        }
    }

    fn fragment_definition(
        &self,
        fragment: &Positioned<FragmentSpread>,
    ) -> Result<&FragmentDefinition, ValidationError> {
        self.fragment_definitions
            .get(&fragment.node.fragment_name.node)
            .map(|v| &v.node)
            .ok_or_else(|| {
                ValidationError::FragmentDefinitionNotFound(
                    fragment.node.fragment_name.node.as_str().to_string(),
                    fragment.pos,
                )
            })
    }

    fn get_type_definition(
        &self,
        field_type: &Positioned<Type>,
        field: &Positioned<Field>,
    ) -> Result<&TypeDefinition, ValidationError> {
        let field_underlying_type_name = underlying_type(&field_type.node);
        let field_underlying_type = self
            .schema
            .get_type_definition(field_underlying_type_name.as_str());

        match field_underlying_type {
            None => Err(ValidationError::InvalidFieldType(
                field_underlying_type_name.as_str().to_string(),
                field.pos,
            )),
            Some(field_underlying_type) => Ok(field_underlying_type),
        }
    }

    fn get_field_definition(
        &'a self,
        field: &Positioned<Field>,
    ) -> Result<&'a FieldDefinition, ValidationError> {
        let field_definition = match &self.container_type.kind {
            TypeKind::Object(object_type) => object_type
                .fields
                .iter()
                .find(|f| f.node.name.node == field.node.name.node)
                .map(|f| &f.node),
            _ => None,
        };

        match field_definition {
            None => Err(ValidationError::InvalidField(
                field.node.name.node.as_str().to_string(),
                self.container_type.name.node.to_string(),
                field.pos,
            )),
            Some(field_definition) => Ok(field_definition),
        }
    }
}

/// A type is scalar if the schema carries no object definition for it (String, Int, and
/// friends are never declared as objects).
fn is_scalar(typ: &Type, schema: &Schema) -> bool {
    let name = underlying_type(typ);
    match schema.get_type_definition(name.as_str()) {
        Some(td) => !matches!(td.kind, TypeKind::Object(_)),
        None => true,
    }
}
