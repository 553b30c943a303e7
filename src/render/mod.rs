// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Renderer payload.
//!
//! The graph renderer consumes `{nodes: [{id, label, position, style}], edges: [{id, source,
//! target, style, animated}]}`. Drawing, interaction and animation are its business.

pub mod graph;

pub use graph::{
    render_dialogue, render_forest, render_graph_schema, EdgeStyle, Fill, NodeStyle, RenderEdge,
    RenderGraph, RenderNode,
};
