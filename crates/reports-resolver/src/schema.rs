// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_graphql_parser::types::{FieldDefinition, ObjectType, TypeDefinition, TypeKind};

use core_resolver::schema::{Schema, default_positioned, default_positioned_name};

fn object_type(name: &str, fields: Vec<FieldDefinition>) -> TypeDefinition {
    TypeDefinition {
        extend: false,
        description: None,
        name: default_positioned_name(name),
        directives: vec![],
        kind: TypeKind::Object(ObjectType {
            implements: vec![],
            fields: fields.into_iter().map(default_positioned).collect(),
        }),
    }
}

/// The root queries this subsystem serves.
pub fn schema_queries() -> Vec<FieldDefinition> {
    vec![
        Schema::create_field(
            "account",
            true,
            Some("Look up an account by its username."),
            "Account",
            vec![Schema::create_arg("name", false, "String")],
        ),
        Schema::create_field(
            "report",
            true,
            Some("Look up a report by its owner and token."),
            "Report",
            vec![
                Schema::create_arg("username", false, "String"),
                Schema::create_arg("token", false, "String"),
            ],
        ),
        Schema::create_field(
            "report_run",
            true,
            Some("Look up a single run of a report."),
            "ReportRun",
            vec![
                Schema::create_arg("username", false, "String"),
                Schema::create_arg("reportToken", false, "String"),
                Schema::create_arg("runToken", false, "String"),
            ],
        ),
    ]
}

/// The object types backing the root queries. Field sets mirror the provider's envelopes;
/// relation fields correspond to `_embedded`/`_links` entries (see the entity tables).
pub fn schema_types() -> Vec<TypeDefinition> {
    vec![
        object_type(
            "Account",
            vec![
                Schema::create_field("username", true, None, "String", vec![]),
                Schema::create_field("name", true, None, "String", vec![]),
                Schema::create_field("plan_code", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
                Schema::create_list_field("data_sources", true, None, "DataSource", vec![]),
                Schema::create_list_field("reports", true, None, "Report", vec![]),
            ],
        ),
        object_type(
            "DataSource",
            vec![
                Schema::create_field("id", true, None, "Int", vec![]),
                Schema::create_field("name", true, None, "String", vec![]),
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("adapter", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
            ],
        ),
        object_type(
            "Report",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("name", true, None, "String", vec![]),
                Schema::create_field("description", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
                Schema::create_field("updated_at", true, None, "String", vec![]),
                Schema::create_field("archived", true, None, "Boolean", vec![]),
                Schema::create_list_field("queries", true, None, "ReportQuery", vec![]),
                Schema::create_field(
                    "last_run",
                    true,
                    Some("The most recent run of this report."),
                    "ReportRun",
                    vec![],
                ),
            ],
        ),
        object_type(
            "ReportQuery",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("name", true, None, "String", vec![]),
                Schema::create_field("raw_query", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
                Schema::create_list_field("charts", true, None, "Chart", vec![]),
                Schema::create_list_field("tables", true, None, "Table", vec![]),
            ],
        ),
        object_type(
            "Chart",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("chart_type", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
                Schema::create_field("color_palette", true, None, "ColorPalette", vec![]),
            ],
        ),
        object_type(
            "ColorPalette",
            vec![
                Schema::create_field("name", true, None, "String", vec![]),
                Schema::create_field("palette_type", true, None, "String", vec![]),
                Schema::create_list_field("colors", true, None, "String", vec![]),
            ],
        ),
        object_type(
            "Table",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
            ],
        ),
        object_type(
            "ReportRun",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("state", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
                Schema::create_field("completed_at", true, None, "String", vec![]),
                Schema::create_list_field("query_runs", true, None, "QueryRun", vec![]),
            ],
        ),
        object_type(
            "QueryRun",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("state", true, None, "String", vec![]),
                Schema::create_field("created_at", true, None, "String", vec![]),
                Schema::create_field("completed_at", true, None, "String", vec![]),
                Schema::create_field("result", true, None, "QueryRunResult", vec![]),
            ],
        ),
        object_type(
            "QueryRunResult",
            vec![
                Schema::create_field("token", true, None, "String", vec![]),
                Schema::create_field("row_count", true, None, "Int", vec![]),
                Schema::create_field("content_length", true, None, "Int", vec![]),
                Schema::create_field(
                    "csv_href",
                    true,
                    Some("URL of the result's CSV content."),
                    "String",
                    vec![],
                ),
            ],
        ),
    ]
}
