// Copyright Chartbeam, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing::warn;

use crate::entity::EntityKind;

/// A provider query-string key (sent as `<directive>=1`) instructing the reports API to
/// inline a related resource. The bracket nesting mirrors the envelope nesting: a
/// collection repeats its name once per wrapping level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedDirective(&'static str);

impl EmbedDirective {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// A relation that cannot be embedded on the primary call: the provider models it as a
/// linked resource, so it takes a second fetch through `_links[<link>].href`, with a fixed
/// directive to inline that sub-resource's own tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUp {
    pub field: &'static str,
    pub link: &'static str,
    pub directive: EmbedDirective,
    pub target: EntityKind,
}

/// The outcome of mapping a selection set: the directives for the primary call, plus the
/// relations that need a follow-up fetch.
#[derive(Debug, Default)]
pub struct EmbedPlan {
    pub directives: Vec<EmbedDirective>,
    pub follow_ups: Vec<FollowUp>,
}

type EmbedTable = &'static [(&'static str, &'static [EmbedDirective])];

const ACCOUNT_EMBEDS: EmbedTable = &[
    (
        "data_sources",
        &[EmbedDirective("embed[data_sources][data_sources]")],
    ),
    ("reports", &[EmbedDirective("embed[reports][reports]")]),
];

// A report's queries take two directives: one pulls charts (which carry their color
// palette), the other pulls tables. The provider accepts both on the same call.
const REPORT_EMBEDS: EmbedTable = &[(
    "queries",
    &[
        EmbedDirective("embed[queries][queries][charts]"),
        EmbedDirective("embed[queries][queries][tables]"),
    ],
)];

const REPORT_RUN_EMBEDS: EmbedTable = &[(
    "query_runs",
    &[EmbedDirective("embed[query_runs][query_runs][result]")],
)];

const REPORT_FOLLOW_UPS: &[FollowUp] = &[FollowUp {
    field: "last_run",
    link: "last_run",
    directive: EmbedDirective("embed[query_runs][query_runs][result]"),
    target: EntityKind::ReportRun,
}];

fn embed_table(kind: EntityKind) -> EmbedTable {
    match kind {
        EntityKind::Account => ACCOUNT_EMBEDS,
        EntityKind::Report => REPORT_EMBEDS,
        EntityKind::ReportRun => REPORT_RUN_EMBEDS,
        _ => &[],
    }
}

fn follow_up_table(kind: EntityKind) -> &'static [FollowUp] {
    match kind {
        EntityKind::Report => REPORT_FOLLOW_UPS,
        _ => &[],
    }
}

/// Map the field names selected on a root entity to the embed directives needed to satisfy
/// them in one call, flagging follow-up-only relations separately.
///
/// The tables are scanned in declaration order, so the directive sequence is deterministic
/// regardless of the order the client listed its fields in. Selecting the same field twice
/// (e.g. under two aliases) does not duplicate directives.
pub fn embed_plan(kind: EntityKind, selected_fields: &[&str]) -> EmbedPlan {
    let mut plan = EmbedPlan::default();

    for (field, directives) in embed_table(kind) {
        if selected_fields.contains(field) {
            for directive in directives.iter() {
                if !plan.directives.contains(directive) {
                    plan.directives.push(*directive);
                }
            }
        }
    }

    for follow_up in follow_up_table(kind) {
        if selected_fields.contains(&follow_up.field) {
            plan.follow_ups.push(*follow_up);
        }
    }

    for selected in selected_fields {
        if *selected == "__typename"
            || kind.scalar_fields().contains(selected)
            || embed_table(kind).iter().any(|(field, _)| field == selected)
            || follow_up_table(kind)
                .iter()
                .any(|follow_up| follow_up.field == *selected)
        {
            continue;
        }

        // A relation the schema knows about but the embed table does not: the provider would
        // never inline it, so the client would silently get an empty value back.
        warn!(
            entity = kind.type_name(),
            field = selected,
            "Selected field has no embed mapping; it will not be requested upstream"
        );
    }

    plan
}
