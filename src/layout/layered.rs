// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{DialogueNode, MessageId};
use crate::tree::tree_edges;

/// Box size and spacing used by [`layout_graph`], in renderer units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub node_width: f64,
    pub node_height: f64,
    /// Vertical gap between the bottom of one rank and the top of the next.
    pub rank_separation: f64,
    /// Horizontal gap between neighbouring boxes (and between forest members).
    pub sibling_separation: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_width: 172.0,
            node_height: 36.0,
            rank_separation: 80.0,
            sibling_separation: 40.0,
        }
    }
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let checks = [
            ("node_width", self.node_width, false),
            ("node_height", self.node_height, false),
            ("rank_separation", self.rank_separation, true),
            ("sibling_separation", self.sibling_separation, true),
        ];
        for (name, value, zero_ok) in checks {
            let valid = value.is_finite() && (value > 0.0 || (zero_ok && value == 0.0));
            if !valid {
                return Err(LayoutError::InvalidOption { name, value });
            }
        }
        Ok(())
    }

    fn rank_step(&self) -> f64 {
        self.node_height + self.rank_separation
    }
}

/// Top-left corner of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePlacement {
    rank: usize,
    index_in_rank: usize,
    component: usize,
    position: Position,
}

impl NodePlacement {
    /// Depth below the root of the node's tree (longest path for shared children).
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Left-to-right index among all nodes of the same rank.
    pub fn index_in_rank(&self) -> usize {
        self.index_in_rank
    }

    /// Index of the forest member (root) the node was laid out under.
    pub fn component(&self) -> usize {
        self.component
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    ranks: Vec<Vec<MessageId>>,
    placements: BTreeMap<MessageId, NodePlacement>,
    edges: Vec<(MessageId, MessageId)>,
    components: usize,
    width: f64,
    height: f64,
}

impl GraphLayout {
    pub fn ranks(&self) -> &[Vec<MessageId>] {
        &self.ranks
    }

    pub fn placements(&self) -> &BTreeMap<MessageId, NodePlacement> {
        &self.placements
    }

    pub fn placement(&self, node_id: &str) -> Option<&NodePlacement> {
        self.placements.get(node_id)
    }

    pub fn position(&self, node_id: &str) -> Option<Position> {
        self.placement(node_id).map(NodePlacement::position)
    }

    /// The input edges, unchanged.
    pub fn edges(&self) -> &[(MessageId, MessageId)] {
        &self.edges
    }

    pub fn component_count(&self) -> usize {
        self.components
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    UnknownNode {
        edge_index: usize,
        endpoint: EdgeEndpoint,
        node_id: MessageId,
    },
    CycleDetected {
        nodes: Vec<MessageId>,
    },
    InvalidOption {
        name: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEndpoint {
    Source,
    Target,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode {
                edge_index,
                endpoint,
                node_id,
            } => {
                let endpoint = match endpoint {
                    EdgeEndpoint::Source => "source",
                    EdgeEndpoint::Target => "target",
                };
                write!(
                    f,
                    "edge #{edge_index} references unknown {endpoint} node {node_id}"
                )
            }
            Self::CycleDetected { nodes } => {
                if nodes.is_empty() {
                    return write!(f, "graph contains a cycle");
                }
                write!(f, "graph contains a cycle involving nodes: ")?;
                for (idx, node_id) in nodes.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{node_id}")?;
                }
                Ok(())
            }
            Self::InvalidOption { name, value } => {
                write!(f, "invalid layout option {name}: {value}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Adjacency over node indices, in input order.
struct IndexedGraph<'a> {
    ids: Vec<&'a MessageId>,
    outgoing: Vec<Vec<usize>>,
    /// Parent through the first edge that reaches the node; the node is placed under it.
    primary_parent: Vec<Option<usize>>,
    indegree: Vec<usize>,
}

impl<'a> IndexedGraph<'a> {
    fn new(
        nodes: &'a [MessageId],
        edges: &[(MessageId, MessageId)],
    ) -> Result<Self, LayoutError> {
        let mut index = BTreeMap::<&MessageId, usize>::new();
        let mut ids = Vec::<&MessageId>::with_capacity(nodes.len());
        for node_id in nodes {
            if !index.contains_key(node_id) {
                index.insert(node_id, ids.len());
                ids.push(node_id);
            }
        }

        let n = ids.len();
        let mut outgoing = vec![Vec::<usize>::new(); n];
        let mut primary_parent = vec![None; n];
        let mut indegree = vec![0usize; n];

        for (edge_index, (source, target)) in edges.iter().enumerate() {
            let from = *index.get(source).ok_or_else(|| LayoutError::UnknownNode {
                edge_index,
                endpoint: EdgeEndpoint::Source,
                node_id: source.clone(),
            })?;
            let to = *index.get(target).ok_or_else(|| LayoutError::UnknownNode {
                edge_index,
                endpoint: EdgeEndpoint::Target,
                node_id: target.clone(),
            })?;

            outgoing[from].push(to);
            indegree[to] += 1;
            if primary_parent[to].is_none() {
                primary_parent[to] = Some(from);
            }
        }

        Ok(Self {
            ids,
            outgoing,
            primary_parent,
            indegree,
        })
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    /// Kahn's algorithm; ready nodes are taken in input order.
    fn topo_order(&self) -> Result<Vec<usize>, LayoutError> {
        let mut indegree = self.indegree.clone();
        let mut ready = (0..self.len())
            .filter(|&idx| indegree[idx] == 0)
            .collect::<VecDeque<_>>();

        let mut topo = Vec::<usize>::with_capacity(self.len());
        while let Some(next) = ready.pop_front() {
            topo.push(next);
            for &to in &self.outgoing[next] {
                indegree[to] = indegree[to].saturating_sub(1);
                if indegree[to] == 0 {
                    ready.push_back(to);
                }
            }
        }

        if topo.len() != self.len() {
            let nodes = indegree
                .iter()
                .enumerate()
                .filter_map(|(idx, degree)| (*degree > 0).then(|| self.ids[idx].clone()))
                .collect();
            return Err(LayoutError::CycleDetected { nodes });
        }

        Ok(topo)
    }

    /// Longest-path layering: every edge points from a lower to a strictly higher rank.
    fn assign_ranks(&self, topo: &[usize]) -> Vec<usize> {
        let mut ranks = vec![0usize; self.len()];
        for &from in topo {
            for &to in &self.outgoing[from] {
                ranks[to] = ranks[to].max(ranks[from] + 1);
            }
        }
        ranks
    }

    /// Children in the placement forest, in edge order.
    fn placement_children(&self) -> Vec<Vec<usize>> {
        let mut children = vec![Vec::<usize>::new(); self.len()];
        let mut attached = vec![false; self.len()];
        for (from, tos) in self.outgoing.iter().enumerate() {
            for &to in tos {
                if self.primary_parent[to] == Some(from) && !attached[to] {
                    attached[to] = true;
                    children[from].push(to);
                }
            }
        }
        children
    }
}

/// Layered top-to-bottom layout of a forest.
///
/// - Ranks come from longest-path layering over a deterministic topological order, so every
///   child sits strictly below each of its parents.
/// - Each node is placed under the parent of the first edge that reaches it. Subtrees occupy
///   disjoint horizontal intervals, children left-to-right in edge order, and a parent is
///   centred over its first and last child.
/// - Forest members (nodes without incoming edges) are laid out one after another, in input
///   order, separated by `sibling_separation`.
///
/// Duplicate entries in `nodes` are ignored after the first.
pub fn layout_graph(
    nodes: &[MessageId],
    edges: &[(MessageId, MessageId)],
    options: &LayoutOptions,
) -> Result<GraphLayout, LayoutError> {
    options.validate()?;

    let graph = IndexedGraph::new(nodes, edges)?;
    let topo = graph.topo_order()?;
    let ranks = graph.assign_ranks(&topo);
    let children = graph.placement_children();
    let n = graph.len();

    // Subtree widths, bottom-up (reverse topological order visits children first).
    let mut widths = vec![0f64; n];
    for &idx in topo.iter().rev() {
        widths[idx] = options.node_width.max(children_span(&children[idx], &widths, options));
    }

    // Subtree intervals, top-down.
    let mut lefts = vec![0f64; n];
    let mut component = vec![0usize; n];
    let mut cursor = 0f64;
    let mut components = 0usize;
    for idx in (0..n).filter(|&idx| graph.primary_parent[idx].is_none()) {
        lefts[idx] = cursor;
        component[idx] = components;
        cursor += widths[idx] + options.sibling_separation;
        components += 1;
    }
    for &idx in &topo {
        let span = children_span(&children[idx], &widths, options);
        let mut left = lefts[idx] + (widths[idx] - span) / 2.0;
        for &child in &children[idx] {
            lefts[child] = left;
            component[child] = component[idx];
            left += widths[child] + options.sibling_separation;
        }
    }

    // Box centres, bottom-up.
    let mut centers = vec![0f64; n];
    for &idx in topo.iter().rev() {
        centers[idx] = match (children[idx].first(), children[idx].last()) {
            (Some(&first), Some(&last)) => (centers[first] + centers[last]) / 2.0,
            _ => lefts[idx] + widths[idx] / 2.0,
        };
    }

    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut rank_buckets = vec![Vec::<usize>::new(); if n == 0 { 0 } else { max_rank + 1 }];
    for idx in 0..n {
        rank_buckets[ranks[idx]].push(idx);
    }
    for bucket in rank_buckets.iter_mut() {
        bucket.sort_by(|a, b| centers[*a].total_cmp(&centers[*b]).then(a.cmp(b)));
    }

    let mut placements = BTreeMap::<MessageId, NodePlacement>::new();
    let mut width = 0f64;
    for bucket in &rank_buckets {
        for (index_in_rank, &idx) in bucket.iter().enumerate() {
            let position = Position {
                x: centers[idx] - options.node_width / 2.0,
                y: ranks[idx] as f64 * options.rank_step(),
            };
            width = width.max(position.x + options.node_width);
            placements.insert(
                graph.ids[idx].clone(),
                NodePlacement {
                    rank: ranks[idx],
                    index_in_rank,
                    component: component[idx],
                    position,
                },
            );
        }
    }

    let height = if n == 0 {
        0.0
    } else {
        max_rank as f64 * options.rank_step() + options.node_height
    };

    let ranks = rank_buckets
        .into_iter()
        .map(|bucket| bucket.into_iter().map(|idx| graph.ids[idx].clone()).collect())
        .collect::<Vec<_>>();

    debug!(
        nodes = n,
        edges = edges.len(),
        ranks = ranks.len(),
        components,
        "computed layered layout"
    );

    Ok(GraphLayout {
        ranks,
        placements,
        edges: edges.to_vec(),
        components,
        width,
        height,
    })
}

fn children_span(children: &[usize], widths: &[f64], options: &LayoutOptions) -> f64 {
    if children.is_empty() {
        return 0.0;
    }
    let gaps = (children.len() - 1) as f64 * options.sibling_separation;
    children.iter().map(|&child| widths[child]).sum::<f64>() + gaps
}

/// Lays out a single dialogue tree using its own parent-to-child edges.
pub fn layout_dialogue(
    tree: &DialogueNode,
    options: &LayoutOptions,
) -> Result<GraphLayout, LayoutError> {
    layout_forest(std::slice::from_ref(tree), options)
}

/// Lays out several independent trees side by side.
pub fn layout_forest(
    trees: &[DialogueNode],
    options: &LayoutOptions,
) -> Result<GraphLayout, LayoutError> {
    let nodes = trees
        .iter()
        .flat_map(|tree| tree.iter().map(|node| node.id().clone()))
        .collect::<Vec<_>>();
    let edges = trees.iter().flat_map(tree_edges).collect::<Vec<_>>();
    layout_graph(&nodes, &edges, options)
}
