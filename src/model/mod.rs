// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Persisted records (`MessageRecord`, `BookmarkRecord`) as delivered by the persistence layer,
//! and the in-memory `DialogueNode` tree built from them.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod node;
pub mod record;

pub use ids::{BookmarkId, Id, IdError, MessageId, SimulationId};
pub use node::{DialogueNode, PreOrder};
pub use record::{BookmarkRecord, MessageRecord, Party};
