// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::{
    Pos, Positioned,
    types::{
        BaseType, FieldDefinition, InputValueDefinition, ObjectType, Type, TypeDefinition, TypeKind,
    },
};

use async_graphql_value::Name;

/// The schema served by this server.
///
/// Unlike a general-purpose GraphQL server, the type definitions here are fixed at compile
/// time: the subsystem resolver hands over the types and root queries it supports and we
/// assemble the `Query` root around them. Validation works off this structure.
#[derive(Debug, Clone)]
pub struct Schema {
    pub type_definitions: Vec<TypeDefinition>,
}

pub const QUERY_ROOT_TYPENAME: &str = "Query";

impl Schema {
    pub fn new(type_definitions: Vec<TypeDefinition>, queries: Vec<FieldDefinition>) -> Schema {
        let mut type_definitions = {
            // ensure a stable order regardless of how the resolver assembled its types
            let mut typedefs = type_definitions;
            typedefs.sort_by_key(|td| td.name.node.to_string());
            typedefs
        };

        // GraphQL spec requires a `Query` type to be present in the schema. Per
        // https://spec.graphql.org/June2018/#sec-Root-Operation-Types: "The query root operation
        // type must be provided and must be an Object type."
        type_definitions.push(TypeDefinition {
            extend: false,
            description: None,
            name: default_positioned_name(QUERY_ROOT_TYPENAME),
            directives: vec![],
            kind: TypeKind::Object(ObjectType {
                implements: vec![],
                fields: queries.into_iter().map(default_positioned).collect(),
            }),
        });

        Schema { type_definitions }
    }

    pub fn get_type_definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.type_definitions
            .iter()
            .find(|td| td.name.node.as_str() == type_name)
    }

    pub fn create_field(
        name: &str,
        nullable: bool,
        description: Option<&str>,
        element_type: &str,
        arguments: Vec<Positioned<InputValueDefinition>>,
    ) -> FieldDefinition {
        FieldDefinition {
            description: description.map(|d| default_positioned(d.to_string())),
            name: default_positioned_name(name),
            arguments,
            ty: default_positioned(Type {
                base: BaseType::Named(Name::new(element_type)),
                nullable,
            }),
            directives: vec![],
        }
    }

    pub fn create_list_field(
        name: &str,
        nullable: bool,
        description: Option<&str>,
        element_type: &str,
        arguments: Vec<Positioned<InputValueDefinition>>,
    ) -> FieldDefinition {
        FieldDefinition {
            description: description.map(|d| default_positioned(d.to_string())),
            name: default_positioned_name(name),
            arguments,
            ty: default_positioned(Type {
                base: BaseType::List(Box::new(Type {
                    base: BaseType::Named(Name::new(element_type)),
                    nullable,
                })),
                nullable,
            }),
            directives: vec![],
        }
    }

    pub fn create_arg(name: &str, nullable: bool, arg_type: &str) -> Positioned<InputValueDefinition> {
        default_positioned(InputValueDefinition {
            description: None,
            name: default_positioned_name(name),
            directives: vec![],
            default_value: None,
            ty: default_positioned(Type {
                base: BaseType::Named(Name::new(arg_type)),
                nullable,
            }),
        })
    }
}

pub fn default_positioned<T>(value: T) -> Positioned<T> {
    Positioned::new(value, Pos::default())
}

pub fn default_positioned_name(value: &str) -> Positioned<Name> {
    default_positioned(Name::new(value))
}
