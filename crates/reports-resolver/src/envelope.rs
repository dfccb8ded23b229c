// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;

/// Accessors for the provider's response envelope.
///
/// The provider wraps a single embedded object once (`_embedded[name]`) but a collection
/// twice (`_embedded[name]._embedded[name]`). The asymmetry is a provider convention;
/// keeping it behind these two accessors keeps the rest of the code from ever treating a
/// collection as a singular (or vice versa).

/// The embedded object for `relation`, verbatim, or `None` when the provider did not
/// include it. Absence is a legitimate outcome, not an error.
pub fn embedded_value<'a>(envelope: &'a Value, relation: &str) -> Option<&'a Value> {
    envelope.get("_embedded").and_then(|e| e.get(relation))
}

/// The embedded collection for `relation`. Returns an empty vector (never absent) when
/// either wrapping level is missing, so downstream mapping stays unconditional.
pub fn embedded_collection<'a>(envelope: &'a Value, relation: &str) -> Vec<&'a Value> {
    embedded_value(envelope, relation)
        .and_then(|outer| outer.get("_embedded"))
        .and_then(|inner| inner.get(relation))
        .and_then(|collection| collection.as_array())
        .map(|items| items.iter().collect())
        .unwrap_or_default()
}

/// The href of the `_links` entry for `relation`, if present.
pub fn link_href<'a>(envelope: &'a Value, relation: &str) -> Option<&'a str> {
    envelope
        .get("_links")
        .and_then(|links| links.get(relation))
        .and_then(|link| link.get("href"))
        .and_then(|href| href.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedded_value_returns_sub_object_verbatim() {
        let envelope = json!({
            "token": "c1",
            "_embedded": {
                "color_palette": { "name": "default", "colors": ["#336699"] }
            }
        });

        assert_eq!(
            embedded_value(&envelope, "color_palette"),
            Some(&json!({ "name": "default", "colors": ["#336699"] }))
        );
    }

    #[test]
    fn embedded_value_absent_relation() {
        let envelope = json!({ "_embedded": { "other": {} } });
        assert_eq!(embedded_value(&envelope, "color_palette"), None);
    }

    #[test]
    fn embedded_value_absent_embedded_section() {
        let envelope = json!({ "token": "c1" });
        assert_eq!(embedded_value(&envelope, "color_palette"), None);
    }

    #[test]
    fn embedded_collection_requires_both_levels() {
        let envelope = json!({
            "_embedded": {
                "queries": {
                    "_embedded": {
                        "queries": [{ "token": "q1" }, { "token": "q2" }]
                    }
                }
            }
        });

        let collection = embedded_collection(&envelope, "queries");
        assert_eq!(collection.len(), 2);
        assert_eq!(collection[0], &json!({ "token": "q1" }));
    }

    #[test]
    fn embedded_collection_empty_when_inner_level_missing() {
        // outer wrapper present, inner `_embedded` missing
        let envelope = json!({ "_embedded": { "queries": { "count": 0 } } });
        assert!(embedded_collection(&envelope, "queries").is_empty());
    }

    #[test]
    fn embedded_collection_empty_when_relation_missing() {
        let envelope = json!({ "username": "alice" });
        assert!(embedded_collection(&envelope, "data_sources").is_empty());
    }

    #[test]
    fn link_href_reads_links_section() {
        let envelope = json!({
            "_links": {
                "last_run": { "href": "/api/alice/reports/abc123/runs/xyz789" }
            }
        });

        assert_eq!(
            link_href(&envelope, "last_run"),
            Some("/api/alice/reports/abc123/runs/xyz789")
        );
        assert_eq!(link_href(&envelope, "csv"), None);
    }
}
