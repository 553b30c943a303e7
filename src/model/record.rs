// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{BookmarkId, MessageId, SimulationId};

/// The side of the negotiation that produced a turn.
///
/// Older records use chat roles (`user`, `assistant`); they map onto the two parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Party {
    #[serde(rename = "A", alias = "user")]
    A,
    #[serde(rename = "B", alias = "assistant")]
    B,
    #[serde(rename = "system")]
    System,
}

impl Party {
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "Party A",
            Self::B => "Party B",
            Self::System => "System",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted dialogue turn, delivered either flat (`parent_id` set, no `children`) or
/// pre-nested (children inline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<MessageId>,
    #[serde(alias = "role")]
    pub party: Party,
    pub content: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MessageRecord>,
}

impl MessageRecord {
    pub fn new(
        id: MessageId,
        parent_id: Option<MessageId>,
        party: Party,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent_id,
            party,
            content: content.into(),
            selected: false,
            children: Vec::new(),
        }
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_children(mut self, children: Vec<MessageRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A named pointer at one node of a simulation's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: BookmarkId,
    #[serde(alias = "simulationId")]
    pub simulation_id: SimulationId,
    #[serde(alias = "nodeId", alias = "message_id")]
    pub node_id: MessageId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::{MessageRecord, Party};

    #[test]
    fn record_accepts_camel_case_and_role_aliases() {
        let record: MessageRecord = serde_json::from_str(
            r#"{"id": 2, "parentId": 1, "role": "assistant", "content": "Counter offer"}"#,
        )
        .expect("record");

        assert_eq!(record.id.as_str(), "2");
        assert_eq!(record.parent_id.as_ref().map(|id| id.as_str()), Some("1"));
        assert_eq!(record.party, Party::B);
        assert!(!record.selected);
        assert!(record.children.is_empty());
    }

    #[test]
    fn record_decodes_nested_children() {
        let record: MessageRecord = serde_json::from_str(
            r#"{
  "id": "1",
  "party": "A",
  "content": "Opening",
  "selected": true,
  "children": [
    {"id": "2", "party": "B", "content": "Reply"},
    {"id": "3", "party": "B", "content": "Other reply"}
  ]
}"#,
        )
        .expect("record");

        assert!(record.is_root());
        assert!(record.selected);
        let child_ids = record.children.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
        assert_eq!(child_ids, vec!["2", "3"]);
    }

    #[test]
    fn party_labels_follow_negotiation_sides() {
        assert_eq!(Party::A.to_string(), "Party A");
        assert_eq!(Party::B.to_string(), "Party B");
        assert_eq!(Party::System.to_string(), "System");
    }

    #[test]
    fn party_serializes_with_canonical_names() {
        let parties: Vec<Party> =
            serde_json::from_str(r#"["user", "B", "system"]"#).expect("parties");
        assert_eq!(parties, vec![Party::A, Party::B, Party::System]);
        assert_eq!(serde_json::to_string(&parties).expect("json"), r#"["A","B","system"]"#);
    }
}
