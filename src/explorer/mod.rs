// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive exploration of one simulation's dialogue tree.
//!
//! [`Explorer`] owns the current snapshot (tree, bookmarks, highlight) and drives the
//! collaborators: selecting a leaf asks the generator for continuations, then the tree is
//! reloaded and the selection re-applied. User-authored turns take the same route without
//! the generator. Every transformation in between is a pure function over the snapshot;
//! locks are never held across an `.await`.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Mutex;

use tracing::{debug, info};

use crate::highlight::BookmarkHighlight;
use crate::layout::{LayoutError, LayoutOptions};
use crate::model::{BookmarkRecord, DialogueNode, MessageId, Party, SimulationId};
use crate::render::{render_dialogue, RenderGraph};
use crate::tree::{
    build_tree, locate, nest_records, selected_path, transcript, update_selected_path,
    ConversationTurn,
};

mod boundary;

pub use boundary::{
    DialogueGenerator, ExternalError, ExternalOperation, GenerationRequest, RecordSource,
};

#[derive(Debug)]
pub enum ExplorerError {
    External(ExternalError),
    /// A generation request for this node is still pending.
    GenerationInFlight {
        node_id: MessageId,
    },
    UnknownNode {
        node_id: String,
    },
    Layout(LayoutError),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External(err) => write!(f, "{err}"),
            Self::GenerationInFlight { node_id } => {
                write!(f, "generation for message {node_id} is already in flight")
            }
            Self::UnknownNode { node_id } => write!(f, "message {node_id} is not in the tree"),
            Self::Layout(err) => write!(f, "layout failed: {err}"),
        }
    }
}

impl std::error::Error for ExplorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::External(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::GenerationInFlight { .. } | Self::UnknownNode { .. } => None,
        }
    }
}

impl From<ExternalError> for ExplorerError {
    fn from(value: ExternalError) -> Self {
        Self::External(value)
    }
}

impl From<LayoutError> for ExplorerError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected { leaf: bool },
    /// The id is not in the tree; the selection was cleared.
    NotFound,
}

#[derive(Debug, Default)]
struct Snapshot {
    tree: Option<DialogueNode>,
    bookmarks: Vec<BookmarkRecord>,
    highlight: BookmarkHighlight,
    revision: u64,
}

pub struct Explorer<S> {
    source: S,
    simulation_id: SimulationId,
    layout_options: LayoutOptions,
    snapshot: Mutex<Snapshot>,
    in_flight: Mutex<BTreeSet<MessageId>>,
}

/// Marks a node as having a pending generation request until dropped.
struct InFlightToken<'a> {
    in_flight: &'a Mutex<BTreeSet<MessageId>>,
    node_id: MessageId,
}

impl Drop for InFlightToken<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .expect("in-flight lock poisoned")
            .remove(&self.node_id);
    }
}

impl<S> Explorer<S> {
    pub fn new(source: S, simulation_id: SimulationId) -> Self {
        Self {
            source,
            simulation_id,
            layout_options: LayoutOptions::default(),
            snapshot: Mutex::new(Snapshot::default()),
            in_flight: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn with_layout_options(mut self, layout_options: LayoutOptions) -> Self {
        self.layout_options = layout_options;
        self
    }

    pub fn simulation_id(&self) -> &SimulationId {
        &self.simulation_id
    }

    /// Current tree, if the simulation has any records.
    pub fn tree(&self) -> Option<DialogueNode> {
        self.snapshot().tree.clone()
    }

    /// Bumped by every successful reload.
    pub fn revision(&self) -> u64 {
        self.snapshot().revision
    }

    pub fn bookmarks(&self) -> Vec<BookmarkRecord> {
        self.snapshot().bookmarks.clone()
    }

    pub fn highlight(&self) -> BookmarkHighlight {
        self.snapshot().highlight.clone()
    }

    /// Ids of the currently selected branch, root first.
    pub fn selected_ids(&self) -> Vec<MessageId> {
        let snapshot = self.snapshot();
        snapshot
            .tree
            .as_ref()
            .map(|tree| {
                selected_path(tree)
                    .into_iter()
                    .map(|node| node.id().clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Makes the root-to-`node_id` path the selected branch.
    pub fn select(&self, node_id: &str) -> SelectOutcome {
        let mut snapshot = self.snapshot();
        let Some(tree) = snapshot.tree.as_ref() else {
            return SelectOutcome::NotFound;
        };

        let outcome = match locate(tree, node_id) {
            Some(node) => SelectOutcome::Selected {
                leaf: node.is_leaf(),
            },
            None => SelectOutcome::NotFound,
        };
        let updated = update_selected_path(tree, node_id);
        snapshot.tree = Some(updated);
        debug!(node = node_id, ?outcome, "selection updated");
        outcome
    }

    /// The conversation up to `node_id`, as passed to generation.
    pub fn transcript(&self, node_id: &str) -> Vec<ConversationTurn> {
        self.snapshot()
            .tree
            .as_ref()
            .map(|tree| transcript(tree, node_id))
            .unwrap_or_default()
    }

    /// Lays out and styles the current snapshot. Without a tree the graph is empty.
    pub fn render(&self) -> Result<RenderGraph, ExplorerError> {
        let snapshot = self.snapshot();
        let Some(tree) = snapshot.tree.as_ref() else {
            return Ok(RenderGraph::default());
        };
        Ok(render_dialogue(tree, &snapshot.highlight, &self.layout_options)?)
    }

    fn snapshot(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.snapshot.lock().expect("explorer snapshot lock poisoned")
    }

    fn begin_generation(&self, node_id: &MessageId) -> Result<InFlightToken<'_>, ExplorerError> {
        let mut in_flight = self.in_flight.lock().expect("in-flight lock poisoned");
        if !in_flight.insert(node_id.clone()) {
            return Err(ExplorerError::GenerationInFlight {
                node_id: node_id.clone(),
            });
        }
        Ok(InFlightToken {
            in_flight: &self.in_flight,
            node_id: node_id.clone(),
        })
    }
}

impl<S: RecordSource> Explorer<S> {
    /// Rebuilds the tree from persistence. The current selection is kept when its node
    /// still exists; otherwise the persisted flags win. On error the snapshot is untouched.
    pub async fn reload(&self) -> Result<(), ExplorerError> {
        let records = self.source.load_records(&self.simulation_id).await?;
        let record_count = records.len();
        let rebuilt = build_tree(&nest_records(records));

        let mut snapshot = self.snapshot();
        let previous_target = snapshot
            .tree
            .as_ref()
            .and_then(|tree| {
                selected_path(tree)
                    .last()
                    .filter(|node| node.selected())
                    .map(|node| node.id().clone())
            });

        snapshot.tree = match (rebuilt, previous_target) {
            (Some(tree), Some(target)) if locate(&tree, target.as_str()).is_some() => {
                Some(update_selected_path(&tree, target.as_str()))
            }
            (rebuilt, _) => rebuilt,
        };
        snapshot.revision += 1;

        info!(
            simulation = %self.simulation_id,
            records = record_count,
            nodes = snapshot.tree.as_ref().map_or(0, DialogueNode::node_count),
            revision = snapshot.revision,
            "reloaded dialogue tree"
        );
        Ok(())
    }

    /// Reloads bookmarks of this simulation and their root-to-node paths.
    pub async fn reload_bookmarks(&self) -> Result<(), ExplorerError> {
        let bookmarks = self
            .source
            .load_bookmarks(&self.simulation_id)
            .await?
            .into_iter()
            .filter(|bookmark| bookmark.simulation_id == self.simulation_id)
            .collect::<Vec<_>>();

        let mut traversals = Vec::with_capacity(bookmarks.len());
        for bookmark in &bookmarks {
            traversals.push(
                self.source
                    .traversal(&self.simulation_id, &bookmark.node_id)
                    .await?,
            );
        }

        let highlight = BookmarkHighlight::from_bookmarks(&bookmarks, traversals);
        let mut snapshot = self.snapshot();
        info!(
            simulation = %self.simulation_id,
            bookmarks = bookmarks.len(),
            on_path = highlight.on_path().len(),
            "reloaded bookmarks"
        );
        snapshot.bookmarks = bookmarks;
        snapshot.highlight = highlight;
        Ok(())
    }

    /// Selects `node_id`; when it is a leaf, asks `generator` for continuations and reloads.
    pub async fn advance<G: DialogueGenerator>(
        &self,
        node_id: &str,
        generator: &G,
    ) -> Result<SelectOutcome, ExplorerError> {
        let outcome = self.select(node_id);
        if let SelectOutcome::Selected { leaf: true } = outcome {
            let node_id = self.known_id(node_id)?;
            self.generate(node_id, false, generator).await?;
        }
        Ok(outcome)
    }

    /// Selects `node_id` and replaces its continuations with freshly generated ones.
    pub async fn regenerate<G: DialogueGenerator>(
        &self,
        node_id: &str,
        generator: &G,
    ) -> Result<(), ExplorerError> {
        let node_id = self.known_id(node_id)?;
        self.select(node_id.as_str());
        self.generate(node_id, true, generator).await
    }

    /// Appends a user-authored turn below `parent_id`, reloads, and selects the new turn.
    pub async fn add_turn(
        &self,
        parent_id: &str,
        party: Party,
        content: impl Into<String>,
    ) -> Result<MessageId, ExplorerError> {
        let parent_id = self.known_id(parent_id)?;
        let turn = self
            .source
            .append_turn(&self.simulation_id, &parent_id, party, content.into())
            .await?;

        self.reload().await?;
        let outcome = self.select(turn.id.as_str());
        info!(
            simulation = %self.simulation_id,
            parent = %parent_id,
            turn = %turn.id,
            ?outcome,
            "added custom turn"
        );
        Ok(turn.id)
    }

    fn known_id(&self, node_id: &str) -> Result<MessageId, ExplorerError> {
        self.snapshot()
            .tree
            .as_ref()
            .and_then(|tree| locate(tree, node_id))
            .map(|node| node.id().clone())
            .ok_or_else(|| ExplorerError::UnknownNode {
                node_id: node_id.to_owned(),
            })
    }

    async fn generate<G: DialogueGenerator>(
        &self,
        node_id: MessageId,
        refresh: bool,
        generator: &G,
    ) -> Result<(), ExplorerError> {
        let _token = self.begin_generation(&node_id)?;
        info!(
            simulation = %self.simulation_id,
            node = %node_id,
            refresh,
            "requesting dialogue generation"
        );

        generator
            .generate(GenerationRequest {
                simulation_id: self.simulation_id.clone(),
                last_message_id: node_id,
                refresh,
            })
            .await?;

        self.reload().await
    }
}
