// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use tracing::debug;

use crate::model::{DialogueNode, MessageId};

use super::navigate::path_to_node;

/// Returns a copy of `tree` where exactly the nodes on the root-to-`target` path are selected.
///
/// An unknown `target` clears every flag. Applying the same target twice is a no-op.
pub fn update_selected_path(tree: &DialogueNode, target: &str) -> DialogueNode {
    let on_path = path_to_node(tree, target)
        .into_iter()
        .map(|node| node.id().as_str())
        .collect::<BTreeSet<_>>();

    if on_path.is_empty() {
        debug!(node_id = target, "selection target not in tree; clearing selection");
    }

    copy_with_selection(tree, &on_path)
}

fn copy_with_selection(node: &DialogueNode, on_path: &BTreeSet<&str>) -> DialogueNode {
    DialogueNode::new(node.id().clone(), node.party(), node.statement())
        .with_selected(on_path.contains(node.id().as_str()))
        .with_children(
            node.children()
                .iter()
                .map(|child| copy_with_selection(child, on_path))
                .collect(),
        )
}

/// Parents that have more than one selected child, in pre-order.
pub fn selection_conflicts(tree: &DialogueNode) -> Vec<&MessageId> {
    tree.iter()
        .filter(|node| node.children().iter().filter(|c| c.selected()).count() > 1)
        .map(DialogueNode::id)
        .collect()
}
