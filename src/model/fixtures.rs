// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::MessageId;
use super::record::{MessageRecord, Party};

pub(crate) fn mid(value: &str) -> MessageId {
    MessageId::new(value).expect("message id")
}

fn record(id: &str, parent: Option<&str>, party: Party, content: &str) -> MessageRecord {
    MessageRecord::new(mid(id), parent.map(mid), party, content)
}

/// Root `1` with children `2` and `3`, flat.
pub(crate) fn three_records_flat() -> Vec<MessageRecord> {
    vec![
        record("1", None, Party::A, "We should talk about the house."),
        record("2", Some("1"), Party::B, "I want to buy you out."),
        record("3", Some("1"), Party::B, "Let's sell it."),
    ]
}

/// A four-level negotiation with one persisted selected branch `1 > 3 > 6 > 8 > 11`, flat and
/// in persistence (id) order.
pub(crate) fn negotiation_flat() -> Vec<MessageRecord> {
    vec![
        record("1", None, Party::System, "Let's begin the legal case discussion.")
            .with_selected(true),
        record("2", Some("1"), Party::A, "I believe the contract was unfair."),
        record("3", Some("1"), Party::A, "The company failed to deliver services.")
            .with_selected(true),
        record("4", Some("1"), Party::A, "I want to settle this out of court."),
        record("5", Some("3"), Party::B, "We'll prepare a claim focusing on contract fairness."),
        record("6", Some("3"), Party::B, "We'll focus on proving service failure.")
            .with_selected(true),
        record("7", Some("3"), Party::B, "Let's evaluate possible settlements first."),
        record("8", Some("6"), Party::A, "That makes sense, please proceed.").with_selected(true),
        record("9", Some("6"), Party::A, "Can we gather more evidence before filing?"),
        record("10", Some("6"), Party::A, "I'm not sure if I have enough proof yet."),
        record("11", Some("8"), Party::B, "We'll start by reviewing all communication records.")
            .with_selected(true),
        record("12", Some("8"), Party::B, "We should obtain all invoices first."),
        record("13", Some("8"), Party::B, "Let's draft the complaint now."),
    ]
}

/// Same negotiation, but the sibling group under `3` has two selected children (`5`, `6`).
pub(crate) fn negotiation_with_conflicting_selection() -> Vec<MessageRecord> {
    negotiation_flat()
        .into_iter()
        .map(|r| {
            if r.id.as_str() == "5" {
                r.with_selected(true)
            } else {
                r
            }
        })
        .collect()
}
