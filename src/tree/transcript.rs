// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::{DialogueNode, Party};

use super::navigate::path_to_node;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub party: Party,
    pub statement: String,
}

/// The conversation leading up to (and including) `id`, oldest turn first.
pub fn transcript(tree: &DialogueNode, id: &str) -> Vec<ConversationTurn> {
    path_to_node(tree, id)
        .into_iter()
        .map(|node| ConversationTurn {
            party: node.party(),
            statement: node.statement().to_owned(),
        })
        .collect()
}

/// Plain-text form, one `Party X: statement` line per turn.
pub fn format_transcript(turns: &[ConversationTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        let _ = writeln!(out, "{}: {}", turn.party, turn.statement);
    }
    out
}
