// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::{Map, Value};

use core_resolver::validation::field::ValidatedField;

use crate::entity::{EntityKind, Relation};
use crate::envelope::{embedded_collection, embedded_value, link_href};

/// Reshape a provider envelope into the object tree the client selected.
///
/// Projection is driven by the selection set against the static relation table of the
/// entity kind, so recursion depth is bounded by the schema, never by the response.
/// Envelope conventions (single wrap, double wrap, links) are fully erased here:
/// collections come back as arrays (empty when the provider omitted the relation),
/// singulars as objects or `null`, link-derived scalars as strings or `null`.
///
/// Follow-up relations shape to `null`; the resolver overwrites them after the second
/// fetch.
pub fn shape(kind: EntityKind, envelope: &Value, selection: &[ValidatedField]) -> Value {
    let mut shaped = Map::new();

    for field in selection {
        let name = field.name.as_str();

        let value = match kind.relation(name) {
            Some(Relation::Collection(target)) => Value::Array(
                embedded_collection(envelope, name)
                    .into_iter()
                    .map(|item| shape(target, item, &field.subfields))
                    .collect(),
            ),
            Some(Relation::Single(target)) => match embedded_value(envelope, name) {
                Some(item) => shape(target, item, &field.subfields),
                None => Value::Null,
            },
            Some(Relation::LinkHref(link)) => link_href(envelope, link)
                .map(|href| Value::String(href.to_string()))
                .unwrap_or(Value::Null),
            Some(Relation::FollowUp(_)) => Value::Null,
            None if name == "__typename" => Value::String(kind.type_name().to_string()),
            None => envelope.get(name).cloned().unwrap_or(Value::Null),
        };

        shaped.insert(field.output_name(), value);
    }

    Value::Object(shaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql_value::{Name, indexmap::IndexMap};
    use serde_json::json;

    fn field(name: &str, subfields: Vec<ValidatedField>) -> ValidatedField {
        ValidatedField {
            alias: None,
            name: Name::new(name),
            arguments: IndexMap::new(),
            subfields,
        }
    }

    fn aliased(alias: &str, name: &str, subfields: Vec<ValidatedField>) -> ValidatedField {
        ValidatedField {
            alias: Some(Name::new(alias)),
            name: Name::new(name),
            arguments: IndexMap::new(),
            subfields,
        }
    }

    #[test]
    fn scalars_project_verbatim_and_missing_scalars_are_null() {
        let envelope = json!({ "token": "abc123", "name": "Revenue" });

        let shaped = shape(
            EntityKind::Report,
            &envelope,
            &[
                field("token", vec![]),
                field("name", vec![]),
                field("description", vec![]),
            ],
        );

        assert_eq!(
            shaped,
            json!({ "token": "abc123", "name": "Revenue", "description": null })
        );
    }

    #[test]
    fn unselected_envelope_fields_are_not_emitted() {
        let envelope = json!({ "token": "abc123", "name": "Revenue" });

        let shaped = shape(EntityKind::Report, &envelope, &[field("token", vec![])]);

        assert_eq!(shaped, json!({ "token": "abc123" }));
    }

    #[test]
    fn nested_collections_and_palette_round_trip() {
        // the provider response for /api/alice/reports/abc123 with charts and palettes embedded
        let envelope = json!({
            "token": "abc123",
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
                            {
                                "token": "q2",
                                "_embedded": {
                                    "charts": {
                                        "_embedded": {
                                            "charts": [{
                                                "token": "c2",
                                                "_embedded": {
                                                    "color_palette": { "name": "vivid" }
                                                }
                                            }]
                                        }
                                    }
                                }
                            }
                        ]
                    }
                }
            }
        });

        let selection = vec![field(
            "queries",
            vec![field(
                "charts",
                vec![field("color_palette", vec![field("name", vec![])])],
            )],
        )];

        let shaped = shape(EntityKind::Report, &envelope, &selection);

        assert_eq!(
            shaped,
            json!({
                "queries": [
                    { "charts": [{ "color_palette": { "name": "default" } }] },
                    { "charts": [{ "color_palette": { "name": "vivid" } }] }
                ]
            })
        );
    }

    #[test]
    fn missing_collection_shapes_to_empty_array() {
        let envelope = json!({ "username": "alice" });

        let shaped = shape(
            EntityKind::Account,
            &envelope,
            &[field("username", vec![]), field("data_sources", vec![])],
        );

        assert_eq!(
            shaped,
            json!({ "username": "alice", "data_sources": [] })
        );
    }

    #[test]
    fn missing_single_shapes_to_null() {
        let envelope = json!({ "token": "c1" });

        let shaped = shape(
            EntityKind::Chart,
            &envelope,
            &[field("color_palette", vec![field("name", vec![])])],
        );

        assert_eq!(shaped, json!({ "color_palette": null }));
    }

    #[test]
    fn csv_href_derives_from_links() {
        let envelope = json!({
            "token": "r1",
            "row_count": 42,
            "_links": { "csv": { "href": "/api/runs/r1/results/content.csv" } }
        });

        let shaped = shape(
            EntityKind::QueryRunResult,
            &envelope,
            &[field("row_count", vec![]), field("csv_href", vec![])],
        );

        assert_eq!(
            shaped,
            json!({ "row_count": 42, "csv_href": "/api/runs/r1/results/content.csv" })
        );
    }

    #[test]
    fn follow_up_relation_shapes_to_null_placeholder() {
        let envelope = json!({ "token": "abc123" });

        let shaped = shape(
            EntityKind::Report,
            &envelope,
            &[field("last_run", vec![field("state", vec![])])],
        );

        assert_eq!(shaped, json!({ "last_run": null }));
    }

    #[test]
    fn aliases_and_typename() {
        let envelope = json!({ "token": "abc123" });

        let shaped = shape(
            EntityKind::Report,
            &envelope,
            &[
                aliased("id", "token", vec![]),
                field("__typename", vec![]),
            ],
        );

        assert_eq!(shaped, json!({ "id": "abc123", "__typename": "Report" }));
    }
}
