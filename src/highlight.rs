// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bookmark path highlighting.
//!
//! Bookmarks point at single nodes; the persistence layer supplies the root-to-node id
//! sequence for each one. Those sequences are unioned into an "on-path" set which, together
//! with the bookmarked ids and the graph roots, decides how every node and edge is styled.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::Serialize;

use crate::layout::GraphLayout;
use crate::model::{BookmarkRecord, MessageId};

/// Style tier of a node. Each node gets exactly one, by precedence
/// `Root > Bookmarked > OnPath > Ordinary`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeTier {
    Root,
    Bookmarked,
    OnPath,
    Ordinary,
}

impl NodeTier {
    /// Root and bookmarked nodes are drawn filled; the rest only outlined.
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Root | Self::Bookmarked)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkHighlight {
    bookmarked: BTreeSet<MessageId>,
    on_path: BTreeSet<MessageId>,
}

impl BookmarkHighlight {
    pub fn new<B, T, P>(bookmarked: B, traversals: T) -> Self
    where
        B: IntoIterator<Item = MessageId>,
        T: IntoIterator<Item = P>,
        P: IntoIterator<Item = MessageId>,
    {
        Self {
            bookmarked: bookmarked.into_iter().collect(),
            on_path: traversals.into_iter().flatten().collect(),
        }
    }

    /// Pairs each bookmark with its traversal, in the same order.
    pub fn from_bookmarks<T>(bookmarks: &[BookmarkRecord], traversals: T) -> Self
    where
        T: IntoIterator<Item = Vec<MessageId>>,
    {
        Self::new(
            bookmarks.iter().map(|bookmark| bookmark.node_id.clone()),
            traversals,
        )
    }

    pub fn bookmarked(&self) -> &BTreeSet<MessageId> {
        &self.bookmarked
    }

    pub fn on_path(&self) -> &BTreeSet<MessageId> {
        &self.on_path
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarked.is_empty() && self.on_path.is_empty()
    }

    pub fn tier(&self, node_id: &str, is_root: bool) -> NodeTier {
        if is_root {
            NodeTier::Root
        } else if self.bookmarked.contains(node_id) {
            NodeTier::Bookmarked
        } else if self.on_path.contains(node_id) {
            NodeTier::OnPath
        } else {
            NodeTier::Ordinary
        }
    }

    /// Edges into a node of any bookmark's path are dashed and animated.
    pub fn highlights_edge_to(&self, target: &str) -> bool {
        self.on_path.contains(target)
    }

    /// Tier of every placed node. Roots are the nodes no edge points to.
    pub fn classify(&self, layout: &GraphLayout) -> BTreeMap<MessageId, NodeTier> {
        let targets = layout
            .edges()
            .iter()
            .map(|(_, target)| target.as_str())
            .collect::<BTreeSet<_>>();

        layout
            .placements()
            .keys()
            .map(|node_id| {
                let is_root = !targets.contains(node_id.as_str());
                (node_id.clone(), self.tier(node_id.as_str(), is_root))
            })
            .collect()
    }
}
