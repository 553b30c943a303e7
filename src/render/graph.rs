// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::{JsonSchema, Schema};
use serde::Serialize;
use tracing::debug;

use crate::highlight::{BookmarkHighlight, NodeTier};
use crate::layout::{layout_forest, GraphLayout, LayoutError, LayoutOptions, Position};
use crate::model::DialogueNode;

/// Styled, positioned graph handed to the visualization renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, JsonSchema)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RenderNode {
    pub id: String,
    /// The statement of the dialogue turn.
    pub label: String,
    pub position: Position,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NodeStyle {
    pub tier: NodeTier,
    pub fill: Fill,
    /// Whether the node is on the currently selected branch.
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    Filled,
    Outline,
}

impl From<NodeTier> for Fill {
    fn from(tier: NodeTier) -> Self {
        if tier.is_filled() {
            Self::Filled
        } else {
            Self::Outline
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: EdgeStyle,
    pub animated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    Solid,
    Dashed,
}

impl RenderGraph {
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&RenderEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }
}

/// `e{source}-{target}`, with `-` and `\` inside either id escaped by a backslash so the
/// first bare `-` always separates the two ids.
fn edge_id(source: &str, target: &str) -> String {
    let mut id = String::with_capacity(source.len() + target.len() + 2);
    id.push('e');
    push_escaped(&mut id, source);
    id.push('-');
    push_escaped(&mut id, target);
    id
}

fn push_escaped(out: &mut String, part: &str) {
    for ch in part.chars() {
        if matches!(ch, '-' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Lays out `tree` and styles it for the renderer.
pub fn render_dialogue(
    tree: &DialogueNode,
    highlight: &BookmarkHighlight,
    options: &LayoutOptions,
) -> Result<RenderGraph, LayoutError> {
    render_forest(std::slice::from_ref(tree), highlight, options)
}

/// Same as [`render_dialogue`] for several independent trees laid out side by side.
pub fn render_forest(
    trees: &[DialogueNode],
    highlight: &BookmarkHighlight,
    options: &LayoutOptions,
) -> Result<RenderGraph, LayoutError> {
    let layout = layout_forest(trees, options)?;
    let graph = style_layout(trees, &layout, highlight);
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        width = layout.width(),
        height = layout.height(),
        "rendered dialogue graph"
    );
    Ok(graph)
}

fn style_layout(
    trees: &[DialogueNode],
    layout: &GraphLayout,
    highlight: &BookmarkHighlight,
) -> RenderGraph {
    let tiers = highlight.classify(layout);

    let nodes = trees
        .iter()
        .flat_map(DialogueNode::iter)
        .filter_map(|node| {
            let placement = layout.placement(node.id().as_str())?;
            let tier = tiers
                .get(node.id().as_str())
                .copied()
                .unwrap_or(NodeTier::Ordinary);
            Some(RenderNode {
                id: node.id().to_string(),
                label: node.statement().to_owned(),
                position: placement.position(),
                style: NodeStyle {
                    tier,
                    fill: Fill::from(tier),
                    selected: node.selected(),
                },
            })
        })
        .collect();

    let edges = layout
        .edges()
        .iter()
        .map(|(source, target)| {
            let highlighted = highlight.highlights_edge_to(target.as_str());
            RenderEdge {
                id: edge_id(source.as_str(), target.as_str()),
                source: source.to_string(),
                target: target.to_string(),
                style: if highlighted {
                    EdgeStyle::Dashed
                } else {
                    EdgeStyle::Solid
                },
                animated: highlighted,
            }
        })
        .collect();

    RenderGraph { nodes, edges }
}

/// JSON schema of the [`RenderGraph`] payload.
pub fn render_graph_schema() -> Schema {
    schemars::schema_for!(RenderGraph)
}
