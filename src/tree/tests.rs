// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{
    build_tree, depth_of, locate, nest_records, path_to_node, selected_path,
    update_selected_path,
};
use crate::model::fixtures::negotiation_flat;
use crate::model::DialogueNode;

#[fixture]
fn tree() -> DialogueNode {
    build_tree(&nest_records(negotiation_flat())).expect("tree")
}

fn ids<'a>(nodes: impl IntoIterator<Item = &'a DialogueNode>) -> Vec<&'a str> {
    nodes.into_iter().map(|n| n.id().as_str()).collect()
}

#[rstest]
#[case("1", 0)]
#[case("2", 1)]
#[case("4", 1)]
#[case("7", 2)]
#[case("10", 3)]
#[case("13", 4)]
fn path_starts_at_root_and_ends_at_target(tree: DialogueNode, #[case] id: &str, #[case] depth: usize) {
    let path = path_to_node(&tree, id);

    assert_eq!(path.first().map(|n| n.id()), Some(tree.id()));
    assert_eq!(path.last().map(|n| n.id().as_str()), Some(id));
    assert_eq!(path.len(), depth + 1);
    assert_eq!(depth_of(&tree, id), Some(depth));
}

#[rstest]
fn locate_agrees_with_path_for_every_node(tree: DialogueNode) {
    for node in &tree {
        let id = node.id().as_str();
        let located = locate(&tree, id).expect("present");
        let last = *path_to_node(&tree, id).last().expect("non-empty path");
        assert!(std::ptr::eq(located, last), "mismatch for {id}");
    }
}

#[rstest]
fn selecting_any_node_makes_it_the_selected_path(tree: DialogueNode) {
    for node in &tree {
        let id = node.id().as_str();
        let updated = update_selected_path(&tree, id);

        assert_eq!(ids(selected_path(&updated)), ids(path_to_node(&tree, id)), "for {id}");
        assert_eq!(update_selected_path(&updated, id), updated, "idempotence for {id}");
    }
}

#[rstest]
fn at_most_one_selected_child_per_level_after_update(tree: DialogueNode) {
    for target in &tree {
        let updated = update_selected_path(&tree, target.id().as_str());
        for node in &updated {
            let selected = node.children().iter().filter(|c| c.selected()).count();
            assert!(selected <= 1, "{} has {selected} selected children", node.id());
        }
    }
}
