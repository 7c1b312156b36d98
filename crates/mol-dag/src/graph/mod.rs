//! Molecule dependency graph.
//!
//! # Overview
//!
//! A [`MoleculeGraph`] is a point-in-time view of one molecule: its root and
//! the root's direct children (steps). It is rebuilt on every query and never
//! cached.
//!
//! ## Pipeline
//!
//! ```text
//! IssueStore::list_children(root)      → step ids + listing status
//!        ↓
//! IssueStore::show_multiple(step ids)  → typed dependency edges
//!        ↓  build::build_graph()
//! MoleculeGraph (petgraph DiGraph, blocking edges only)
//!        ↓  tiers::assign_tiers()             → TierAssignment
//!        ↓  critical_path::find_critical_path() → Vec<step id>
//!        ↓  readiness::evaluate_readiness()     → ready / blocked
//! ```
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **blocks** B": B depends on A. Only `blocks`
//! edges between two steps of the same molecule become graph edges. A
//! `blocks` edge to an issue outside the molecule is kept on the node
//! ([`StepNode::blocked_by`]) so it still gates readiness, but it does not
//! take part in tier assignment or the critical path.

#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod critical_path;
pub mod tiers;

use std::collections::{HashMap, HashSet};

use mol_core::{Dependency, Status};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

pub use build::build_graph;
pub use critical_path::find_critical_path;
pub use tiers::{CycleReport, TierAssignment, assign_tiers};

/// Where a node's dependency data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailSource {
    /// Edges came from a detail fetch.
    Detail,
    /// The detail fetch omitted this step. The node has no known edges and
    /// is treated as free-standing.
    ListingOnly,
}

/// One step of a molecule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNode {
    pub id: String,
    pub title: String,
    /// Status from the listing call, the same snapshot the closed set uses.
    pub status: Status,
    /// Targets of `blocks` edges, in declaration order, without duplicates.
    pub blocked_by: Vec<String>,
    /// Non-blocking edges. Never consulted by any graph algorithm.
    pub informational: Vec<Dependency>,
    /// Steps of this molecule that `blocks`-depend on this one.
    pub dependents: Vec<String>,
    /// Execution tier, set by [`assign_tiers`]. `None` until assigned, and
    /// for steps left over by a cycle.
    pub tier: Option<usize>,
    /// Informational parallelism annotation from the step description.
    pub parallel: bool,
    pub detail: DetailSource,
}

impl StepNode {
    /// A node with no known edges, for steps the detail fetch omitted.
    pub fn listing_only(id: impl Into<String>, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            blocked_by: Vec::new(),
            informational: Vec::new(),
            dependents: Vec::new(),
            tier: None,
            parallel: false,
            detail: DetailSource::ListingOnly,
        }
    }
}

/// Blocking-edge graph over the steps of one molecule.
///
/// Nodes are stored in listing order; `graph` node indices match positions
/// in that order.
#[derive(Debug, Clone)]
pub struct MoleculeGraph {
    root_id: String,
    root_title: String,
    nodes: Vec<StepNode>,
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl MoleculeGraph {
    /// Assemble a graph from nodes in listing order.
    ///
    /// Wires a petgraph edge and a `dependents` entry for every `blocks`
    /// target that is itself a node. Later nodes with an id already seen are
    /// dropped.
    #[must_use]
    pub fn from_nodes(
        root_id: impl Into<String>,
        root_title: impl Into<String>,
        nodes: Vec<StepNode>,
    ) -> Self {
        let mut graph = DiGraph::<String, ()>::with_capacity(nodes.len(), nodes.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(nodes.len());
        let mut kept: Vec<StepNode> = Vec::with_capacity(nodes.len());

        for mut node in nodes {
            if node_map.contains_key(&node.id) {
                continue;
            }
            node.dependents.clear();
            node.tier = None;
            let idx = graph.add_node(node.id.clone());
            node_map.insert(node.id.clone(), idx);
            kept.push(node);
        }

        for position in 0..kept.len() {
            let blocked = NodeIndex::new(position);
            for blocker_pos in 0..kept[position].blocked_by.len() {
                let blocker_id = &kept[position].blocked_by[blocker_pos];
                let Some(&blocker) = node_map.get(blocker_id) else {
                    continue;
                };
                if graph.contains_edge(blocker, blocked) {
                    continue;
                }
                graph.add_edge(blocker, blocked, ());
                let dependent_id = kept[position].id.clone();
                kept[blocker.index()].dependents.push(dependent_id);
            }
        }

        Self {
            root_id: root_id.into(),
            root_title: root_title.into(),
            nodes: kept,
            graph,
            node_map,
        }
    }

    #[must_use]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    #[must_use]
    pub fn root_title(&self) -> &str {
        &self.root_title
    }

    /// Steps in listing order.
    #[must_use]
    pub fn nodes(&self) -> &[StepNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&StepNode> {
        self.node_map.get(id).map(|idx| &self.nodes[idx.index()])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of intra-molecule blocking edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The underlying petgraph graph. Node weights are step ids.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Ids of closed steps.
    #[must_use]
    pub fn closed_set(&self) -> HashSet<&str> {
        self.nodes
            .iter()
            .filter(|node| node.status.is_closed())
            .map(|node| node.id.as_str())
            .collect()
    }

    /// `true` when no step is open, in progress, or in any other non-closed
    /// status.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.nodes.iter().all(|node| node.status.is_closed())
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [StepNode] {
        &mut self.nodes
    }
}
