// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dialogue tree operations.
//!
//! Everything here is a pure function over an immutable snapshot: building the tree from
//! records, resolving paths, and producing re-selected copies. Missing ids never fail; they
//! yield `None` or an empty path.

pub mod build;
pub mod navigate;
pub mod select;
pub mod transcript;

#[cfg(test)]
mod tests;

pub use build::{build_tree, build_tree_with, nest_records, shallow_nodes, BuildMode};
pub use navigate::{depth_of, locate, path_to_node, selected_path, tree_edges};
pub use select::{selection_conflicts, update_selected_path};
pub use transcript::{format_transcript, transcript, ConversationTurn};
