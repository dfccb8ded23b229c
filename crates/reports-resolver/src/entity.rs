// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// The resources served by the reports API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    DataSource,
    Report,
    ReportQuery,
    Chart,
    ColorPalette,
    Table,
    ReportRun,
    QueryRun,
    QueryRunResult,
}

/// How a field of an entity relates to the provider envelope.
///
/// The provider wraps collections twice (`_embedded[name]._embedded[name]`) and single
/// objects once (`_embedded[name]`); `LinkHref` fields are scalars derived from a
/// `_links` entry, and `FollowUp` relations are not embeddable at all and require a
/// second fetch through their link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Collection(EntityKind),
    Single(EntityKind),
    LinkHref(&'static str),
    FollowUp(EntityKind),
}

impl EntityKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityKind::Account => "Account",
            EntityKind::DataSource => "DataSource",
            EntityKind::Report => "Report",
            EntityKind::ReportQuery => "ReportQuery",
            EntityKind::Chart => "Chart",
            EntityKind::ColorPalette => "ColorPalette",
            EntityKind::Table => "Table",
            EntityKind::ReportRun => "ReportRun",
            EntityKind::QueryRun => "QueryRun",
            EntityKind::QueryRunResult => "QueryRunResult",
        }
    }

    pub fn relations(&self) -> &'static [(&'static str, Relation)] {
        match self {
            EntityKind::Account => &[
                ("data_sources", Relation::Collection(EntityKind::DataSource)),
                ("reports", Relation::Collection(EntityKind::Report)),
            ],
            EntityKind::Report => &[
                ("queries", Relation::Collection(EntityKind::ReportQuery)),
                ("last_run", Relation::FollowUp(EntityKind::ReportRun)),
            ],
            EntityKind::ReportQuery => &[
                ("charts", Relation::Collection(EntityKind::Chart)),
                ("tables", Relation::Collection(EntityKind::Table)),
            ],
            EntityKind::Chart => &[(
                "color_palette",
                Relation::Single(EntityKind::ColorPalette),
            )],
            EntityKind::ReportRun => &[(
                "query_runs",
                Relation::Collection(EntityKind::QueryRun),
            )],
            EntityKind::QueryRun => &[(
                "result",
                Relation::Single(EntityKind::QueryRunResult),
            )],
            EntityKind::QueryRunResult => &[("csv_href", Relation::LinkHref("csv"))],
            EntityKind::DataSource
            | EntityKind::ColorPalette
            | EntityKind::Table => &[],
        }
    }

    pub fn relation(&self, field: &str) -> Option<Relation> {
        self.relations()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, relation)| *relation)
    }

    /// Scalar fields present on the base envelope (no embed directive needed).
    pub fn scalar_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Account => &["username", "name", "plan_code", "created_at"],
            EntityKind::DataSource => &["id", "name", "token", "adapter", "created_at"],
            EntityKind::Report => &[
                "token",
                "name",
                "description",
                "created_at",
                "updated_at",
                "archived",
            ],
            EntityKind::ReportQuery => &["token", "name", "raw_query", "created_at"],
            EntityKind::Chart => &["token", "chart_type", "created_at"],
            EntityKind::ColorPalette => &["name", "palette_type", "colors"],
            EntityKind::Table => &["token", "created_at"],
            EntityKind::ReportRun => &["token", "state", "created_at", "completed_at"],
            EntityKind::QueryRun => &["token", "state", "created_at", "completed_at"],
            EntityKind::QueryRunResult => &["token", "row_count", "content_length"],
        }
    }
}
