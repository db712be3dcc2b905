//! Mini org-chart construction for a selected stakeholder.
//!
//! The graph is intentionally shallow: the two manager references stored on
//! the selected row, the row itself, and every row naming it as first-level
//! manager. No traversal, so a cyclic dataset cannot affect the lookup.

use crate::dataset::{Dataset, StakeholderRow};
use serde::Serialize;
use std::collections::HashSet;

/// Role of a node in the chart; fixes its display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    SecondLevelManager,
    Manager,
    Selected,
    Report,
}

impl NodeRole {
    pub fn color(self) -> &'static str {
        match self {
            NodeRole::SecondLevelManager => "lightgray",
            NodeRole::Manager => "#4A90E2",
            NodeRole::Selected => "#6AA84F",
            NodeRole::Report => "#FFF2CC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
    pub color: &'static str,
    pub shape: &'static str,
}

/// Directed "manages" relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// Layout parameters for the frontend renderer: directed, non-physics,
/// hierarchical top-down.
#[derive(Debug, Clone, Serialize)]
pub struct GraphConfig {
    pub directed: bool,
    pub physics: bool,
    pub hierarchical: bool,
    pub direction: &'static str,
    pub sort_method: &'static str,
    pub node_spacing: u32,
    pub level_separation: u32,
    pub font_size: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            directed: true,
            physics: false,
            hierarchical: true,
            direction: "UD",
            sort_method: "directed",
            node_spacing: 6000,
            level_separation: 600,
            font_size: 25,
        }
    }
}

/// Ephemeral per-selection graph: rebuilt on every selection change, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

struct GraphBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    seen: HashSet<String>,
}

impl GraphBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Adds a node unless the identity is already present. First write wins
    /// for styling, regardless of which step attempted the add.
    fn node(&mut self, identity: &str, role: NodeRole) {
        if self.seen.insert(identity.to_string()) {
            self.nodes.push(GraphNode {
                id: identity.to_string(),
                label: identity.to_string(),
                role,
                color: role.color(),
                shape: "box",
            });
        }
    }

    /// Self-edges are never emitted: a row listing itself as its own manager
    /// collapses to a single node with no loop.
    fn edge(&mut self, source: &str, target: &str) {
        if source != target {
            self.edges.push(GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
            });
        }
    }
}

/// Build the hierarchy graph for `selected` against the full dataset.
///
/// Managers come straight off the selected row (pre-denormalized fields, no
/// walking); reports come from a single scan for rows whose first-level
/// manager equals the selected identity.
pub fn build(selected: &StakeholderRow, dataset: &Dataset) -> HierarchyGraph {
    let client = selected.client_name.as_str();
    let mgr1 = selected.manager1.as_deref();
    let mgr2 = selected.manager2.as_deref();

    let mut builder = GraphBuilder::new();

    if let Some(m2) = mgr2 {
        builder.node(m2, NodeRole::SecondLevelManager);
    }
    if let Some(m1) = mgr1 {
        builder.node(m1, NodeRole::Manager);
    }
    builder.node(client, NodeRole::Selected);

    if let (Some(m2), Some(m1)) = (mgr2, mgr1) {
        builder.edge(m2, m1);
    }
    if let Some(m1) = mgr1 {
        builder.edge(m1, client);
    }

    for report in dataset.direct_reports(client) {
        builder.node(&report.client_name, NodeRole::Report);
        builder.edge(client, &report.client_name);
    }

    tracing::debug!(
        "Built hierarchy for '{}': {} nodes, {} edges",
        client,
        builder.nodes.len(),
        builder.edges.len()
    );

    HierarchyGraph {
        nodes: builder.nodes,
        edges: builder.edges,
    }
}
