// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::future::Future;

use serde::Serialize;

use crate::model::{BookmarkRecord, MessageId, MessageRecord, Party, SimulationId};

/// Persistence/query collaborator.
pub trait RecordSource {
    /// All records of a simulation, flat or pre-nested.
    fn load_records(
        &self,
        simulation_id: &SimulationId,
    ) -> impl Future<Output = Result<Vec<MessageRecord>, ExternalError>> + Send;

    fn load_bookmarks(
        &self,
        simulation_id: &SimulationId,
    ) -> impl Future<Output = Result<Vec<BookmarkRecord>, ExternalError>> + Send;

    /// Root-to-node id sequence for `node_id`, root first.
    fn traversal(
        &self,
        simulation_id: &SimulationId,
        node_id: &MessageId,
    ) -> impl Future<Output = Result<Vec<MessageId>, ExternalError>> + Send;

    /// Stores a user-authored turn below `parent_id` as the selected continuation and
    /// returns it with its assigned id.
    fn append_turn(
        &self,
        simulation_id: &SimulationId,
        parent_id: &MessageId,
        party: Party,
        content: String,
    ) -> impl Future<Output = Result<MessageRecord, ExternalError>> + Send;
}

/// Dialogue generation collaborator. Generated turns are appended to persistence as children
/// of `last_message_id`; callers reload afterwards.
pub trait DialogueGenerator {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<(), ExternalError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub simulation_id: SimulationId,
    pub last_message_id: MessageId,
    /// Replace the existing children of `last_message_id` instead of adding to them.
    pub refresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOperation {
    LoadRecords,
    LoadBookmarks,
    Traversal,
    AppendTurn,
    Generate,
}

impl fmt::Display for ExternalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LoadRecords => "load records",
            Self::LoadBookmarks => "load bookmarks",
            Self::Traversal => "traversal query",
            Self::AppendTurn => "append turn",
            Self::Generate => "dialogue generation",
        })
    }
}

/// Failure reported by a collaborator, passed through unchanged.
#[derive(Debug)]
pub struct ExternalError {
    operation: ExternalOperation,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl ExternalError {
    pub fn new(
        operation: ExternalOperation,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    pub fn operation(&self) -> ExternalOperation {
        self.operation
    }
}

impl fmt::Display for ExternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.source)
    }
}

impl std::error::Error for ExternalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
