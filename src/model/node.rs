// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::MessageId;
use super::record::Party;

/// One turn of a dialogue tree.
///
/// Children are exclusively owned and kept in insertion order. There is no parent pointer;
/// anything that needs ancestry goes through a root-to-node path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueNode {
    id: MessageId,
    statement: String,
    party: Party,
    selected: bool,
    children: Vec<DialogueNode>,
}

impl DialogueNode {
    pub fn new(id: MessageId, party: Party, statement: impl Into<String>) -> Self {
        Self {
            id,
            statement: statement.into(),
            party,
            selected: false,
            children: Vec::new(),
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_children(mut self, children: Vec<DialogueNode>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn party(&self) -> Party {
        self.party
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn children(&self) -> &[DialogueNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Pre-order traversal of this subtree, children in stored order.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

impl<'a> IntoIterator for &'a DialogueNode {
    type Item = &'a DialogueNode;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    stack: Vec<&'a DialogueNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a DialogueNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
