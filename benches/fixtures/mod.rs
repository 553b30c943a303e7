// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic dialogue trees for benchmarks (no RNG).

use parley::model::{MessageId, MessageRecord, Party};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// The usual explorer shape: three continuations per turn, a handful of turns deep.
    Typical,
    /// Wide and shallow: many alternatives per turn.
    Wide,
    /// A long single conversation with one alternative per level.
    Deep,
}

pub fn records(case: Case) -> Vec<MessageRecord> {
    match case {
        Case::Typical => full_tree(3, 6),
        Case::Wide => full_tree(12, 3),
        Case::Deep => caterpillar(400),
    }
}

fn party_for_depth(depth: usize) -> Party {
    match depth {
        0 => Party::System,
        d if d % 2 == 1 => Party::A,
        _ => Party::B,
    }
}

/// Complete `fanout`-ary tree, flat, in breadth-first id order. The first child of every node
/// is selected.
pub fn full_tree(fanout: usize, depth: usize) -> Vec<MessageRecord> {
    let mut records = vec![MessageRecord::new(
        MessageId::from(1),
        None,
        Party::System,
        "Opening statement",
    )
    .with_selected(true)];

    let mut level = vec![1u64];
    let mut next_id = 2u64;
    for d in 1..=depth {
        let mut next_level = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for k in 0..fanout {
                let id = next_id;
                next_id += 1;
                records.push(
                    MessageRecord::new(
                        MessageId::from(id),
                        Some(MessageId::from(parent)),
                        party_for_depth(d),
                        format!("Turn {id} answering {parent}"),
                    )
                    .with_selected(k == 0),
                );
                next_level.push(id);
            }
        }
        level = next_level;
    }
    records
}

/// A spine of `length` turns, each with one extra leaf alternative.
pub fn caterpillar(length: usize) -> Vec<MessageRecord> {
    let mut records = vec![MessageRecord::new(
        MessageId::from(1),
        None,
        Party::System,
        "Opening statement",
    )];
    let mut spine = 1u64;
    let mut next_id = 2u64;
    for d in 1..=length {
        let main = next_id;
        let alternative = next_id + 1;
        next_id += 2;
        for id in [main, alternative] {
            records.push(MessageRecord::new(
                MessageId::from(id),
                Some(MessageId::from(spine)),
                party_for_depth(d),
                format!("Turn {id}"),
            ));
        }
        spine = main;
    }
    records
}

/// Id of the last record, which is always a leaf in these fixtures.
pub fn deepest_id(records: &[MessageRecord]) -> String {
    records
        .last()
        .map(|record| record.id.to_string())
        .unwrap_or_default()
}
