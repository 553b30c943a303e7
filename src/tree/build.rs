// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{DialogueNode, MessageId, MessageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Convert the record and all of its nested children.
    #[default]
    Nested,
    /// Convert the record only; children are dropped (flat list displays).
    Shallow,
}

/// Builds the dialogue tree from root-level records.
///
/// Returns `None` for an empty slice. Only the first record is converted; any further
/// root-level records are ignored.
pub fn build_tree(records: &[MessageRecord]) -> Option<DialogueNode> {
    build_tree_with(records, BuildMode::Nested)
}

pub fn build_tree_with(records: &[MessageRecord], mode: BuildMode) -> Option<DialogueNode> {
    let (first, rest) = records.split_first()?;
    if !rest.is_empty() {
        debug!(
            root = %first.id,
            ignored = rest.len(),
            "ignoring additional root-level records"
        );
    }
    Some(convert(first, mode))
}

/// Converts every top-level record into a childless node, preserving order.
pub fn shallow_nodes(records: &[MessageRecord]) -> Vec<DialogueNode> {
    records
        .iter()
        .map(|record| convert(record, BuildMode::Shallow))
        .collect()
}

fn convert(record: &MessageRecord, mode: BuildMode) -> DialogueNode {
    let node = DialogueNode::new(record.id.clone(), record.party, record.content.clone())
        .with_selected(record.selected);

    match mode {
        BuildMode::Shallow => node,
        BuildMode::Nested => node.with_children(
            record
                .children
                .iter()
                .map(|child| convert(child, mode))
                .collect(),
        ),
    }
}

/// Nests flat records under their parents.
///
/// Children keep their input order. Records that cannot be reached from a root (missing
/// parent, or a parent cycle) are dropped. Input whose top level already consists of roots
/// only is treated as pre-nested and returned unchanged.
pub fn nest_records(records: Vec<MessageRecord>) -> Vec<MessageRecord> {
    if records.iter().all(MessageRecord::is_root) {
        return records;
    }

    let total = records.len();
    let mut roots = Vec::<MessageRecord>::new();
    let mut by_parent = BTreeMap::<MessageId, Vec<MessageRecord>>::new();
    for record in records {
        match record.parent_id.clone() {
            None => roots.push(record),
            Some(parent_id) => by_parent.entry(parent_id).or_default().push(record),
        }
    }

    let nested = roots
        .into_iter()
        .map(|root| attach_children(root, &mut by_parent))
        .collect::<Vec<_>>();

    let orphans = by_parent.values().map(Vec::len).sum::<usize>();
    if orphans > 0 {
        debug!(orphans, total, "dropping records unreachable from a root");
    }

    nested
}

fn attach_children(
    mut record: MessageRecord,
    by_parent: &mut BTreeMap<MessageId, Vec<MessageRecord>>,
) -> MessageRecord {
    // Each child list is taken exactly once, so a malformed parent cycle cannot recurse forever.
    if let Some(children) = by_parent.remove(&record.id) {
        record.children.extend(
            children
                .into_iter()
                .map(|child| attach_children(child, by_parent)),
        );
    }
    record
}

#[cfg(test)]
mod tests {
    use super::{build_tree, build_tree_with, nest_records, shallow_nodes, BuildMode};
    use crate::model::fixtures::{mid, negotiation_flat, three_records_flat};
    use crate::model::{MessageRecord, Party};

    fn child_ids(node: &crate::model::DialogueNode) -> Vec<&str> {
        node.children().iter().map(|c| c.id().as_str()).collect()
    }

    #[test]
    fn empty_input_yields_no_tree() {
        assert_eq!(build_tree(&[]), None);
        assert_eq!(build_tree_with(&[], BuildMode::Shallow), None);
    }

    #[test]
    fn flat_scenario_builds_root_with_ordered_children() {
        let nested = nest_records(three_records_flat());
        let tree = build_tree(&nested).expect("tree");

        assert_eq!(tree.id().as_str(), "1");
        assert_eq!(child_ids(&tree), vec!["2", "3"]);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn node_count_matches_record_count() {
        let records = negotiation_flat();
        let count = records.len();
        let tree = build_tree(&nest_records(records)).expect("tree");

        assert_eq!(tree.node_count(), count);
        assert_eq!(tree.id().as_str(), "1");
    }

    #[test]
    fn record_fields_are_carried_over() {
        let tree = build_tree(&nest_records(negotiation_flat())).expect("tree");
        let third = &tree.children()[1];

        assert_eq!(third.id().as_str(), "3");
        assert_eq!(third.party(), Party::A);
        assert_eq!(third.statement(), "The company failed to deliver services.");
        assert!(third.selected());
        assert!(!tree.children()[0].selected());
    }

    #[test]
    fn only_first_root_is_converted() {
        let records = vec![
            MessageRecord::new(mid("a"), None, Party::A, "first"),
            MessageRecord::new(mid("b"), None, Party::B, "second"),
        ];
        let tree = build_tree(&records).expect("tree");
        assert_eq!(tree.id().as_str(), "a");
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn shallow_mode_drops_children() {
        let nested = nest_records(three_records_flat());
        let tree = build_tree_with(&nested, BuildMode::Shallow).expect("tree");
        assert!(tree.is_leaf());

        let list = shallow_nodes(&nested[0].children);
        let ids = list.iter().map(|n| n.id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["2", "3"]);
        assert!(list.iter().all(|n| n.is_leaf()));
    }

    #[test]
    fn nesting_keeps_input_order_when_children_precede_parents() {
        let records = vec![
            MessageRecord::new(mid("3"), Some(mid("1")), Party::B, "late sibling"),
            MessageRecord::new(mid("2"), Some(mid("1")), Party::B, "early sibling"),
            MessageRecord::new(mid("1"), None, Party::A, "root"),
        ];
        let tree = build_tree(&nest_records(records)).expect("tree");
        assert_eq!(child_ids(&tree), vec!["3", "2"]);
    }

    #[test]
    fn nesting_drops_orphans_and_parent_cycles() {
        let records = vec![
            MessageRecord::new(mid("1"), None, Party::A, "root"),
            MessageRecord::new(mid("2"), Some(mid("1")), Party::B, "child"),
            MessageRecord::new(mid("3"), Some(mid("missing")), Party::B, "orphan"),
            MessageRecord::new(mid("4"), Some(mid("5")), Party::A, "loop"),
            MessageRecord::new(mid("5"), Some(mid("4")), Party::B, "loop"),
        ];
        let nested = nest_records(records);
        assert_eq!(nested.len(), 1);
        let tree = build_tree(&nested).expect("tree");
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn pre_nested_input_is_returned_unchanged() {
        let nested = nest_records(three_records_flat());
        assert_eq!(nest_records(nested.clone()), nested);
    }
}
