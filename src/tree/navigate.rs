// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::warn;

use crate::model::{DialogueNode, MessageId};

/// Depth-first search for `id`; the first match in pre-order wins.
pub fn locate<'a>(tree: &'a DialogueNode, id: &str) -> Option<&'a DialogueNode> {
    tree.iter().find(|node| node.id().as_str() == id)
}

/// Nodes from the root down to `id` (inclusive), or an empty path when `id` is absent.
pub fn path_to_node<'a>(tree: &'a DialogueNode, id: &str) -> Vec<&'a DialogueNode> {
    let mut path = Vec::new();
    if push_path(tree, id, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn push_path<'a>(node: &'a DialogueNode, id: &str, path: &mut Vec<&'a DialogueNode>) -> bool {
    path.push(node);
    if node.id().as_str() == id {
        return true;
    }
    for child in node.children() {
        if push_path(child, id, path) {
            return true;
        }
    }
    path.pop();
    false
}

/// Follows `selected` children from the root until a leaf or an unselected level.
///
/// When a level has several selected children the first one in child order is followed.
pub fn selected_path(tree: &DialogueNode) -> Vec<&DialogueNode> {
    let mut path = vec![tree];
    let mut current = tree;

    loop {
        let mut selected = current.children().iter().filter(|child| child.selected());
        let Some(next) = selected.next() else {
            break;
        };

        let ignored = selected.count();
        if ignored > 0 {
            warn!(
                parent = %current.id(),
                followed = %next.id(),
                ignored,
                "inconsistent selection: several selected siblings"
            );
        }

        path.push(next);
        current = next;
    }

    path
}

/// Distance from the root to `id`, or `None` when absent.
pub fn depth_of(tree: &DialogueNode, id: &str) -> Option<usize> {
    path_to_node(tree, id).len().checked_sub(1)
}

/// Parent-to-child edges in pre-order.
pub fn tree_edges(tree: &DialogueNode) -> Vec<(MessageId, MessageId)> {
    tree.iter()
        .flat_map(|parent| {
            parent
                .children()
                .iter()
                .map(move |child| (parent.id().clone(), child.id().clone()))
        })
        .collect()
}
