// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout of dialogue trees for the graph renderer.
//!
//! Positions are recomputed from scratch on every call; nothing is cached between snapshots.

pub mod layered;

pub use layered::{
    layout_dialogue, layout_forest, layout_graph, EdgeEndpoint, GraphLayout, LayoutError,
    LayoutOptions, NodePlacement, Position,
};
