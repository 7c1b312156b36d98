//! Serializable view of an analyzed molecule.
//!
//! Field names are stable; tooling reads this shape as JSON.
//!
//! ```json
//! {
//!   "root_id": "gt-mol",
//!   "root_title": "Release",
//!   "total_nodes": 2,
//!   "tiers": 2,
//!   "critical_path": ["gt-mol.1", "gt-mol.2"],
//!   "nodes": {
//!     "gt-mol.1": { "id": "gt-mol.1", "title": "Build", "status": "closed", "store_status": "closed", "dependents": ["gt-mol.2"], "tier": 0 },
//!     "gt-mol.2": { "id": "gt-mol.2", "title": "Test", "status": "ready", "store_status": "open", "dependencies": ["gt-mol.1"], "tier": 1 }
//!   },
//!   "tier_groups": [["gt-mol.1"], ["gt-mol.2"]]
//! }
//! ```

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;

use mol_core::{DagConfig, IssueStore, Status};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::DagError;
use crate::graph::{MoleculeGraph, TierAssignment, assign_tiers, build_graph, find_critical_path};
use crate::readiness::{EffectiveStatus, effective_status};

/// One step in a [`DagSummary`].
///
/// `status` is the readiness-refined status; `store_status` is the status
/// the store reported. A store tag such as `blocked` would otherwise read
/// back as the refined `blocked`, so deserialization takes `Other` tags from
/// `store_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NodeSummaryRecord")]
pub struct NodeSummary {
    pub id: String,
    pub title: String,
    pub status: EffectiveStatus,
    pub store_status: Status,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parallel: bool,
    /// `blocks` targets, including ones outside the molecule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<String>,
    pub tier: usize,
}

#[derive(Deserialize)]
struct NodeSummaryRecord {
    id: String,
    title: String,
    status: EffectiveStatus,
    store_status: Status,
    #[serde(default)]
    parallel: bool,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    dependents: Vec<String>,
    tier: usize,
}

impl From<NodeSummaryRecord> for NodeSummary {
    fn from(record: NodeSummaryRecord) -> Self {
        let status = match &record.store_status {
            Status::Other(tag) => EffectiveStatus::Other(tag.clone()),
            _ => record.status,
        };
        Self {
            id: record.id,
            title: record.title,
            status,
            store_status: record.store_status,
            parallel: record.parallel,
            dependencies: record.dependencies,
            dependents: record.dependents,
            tier: record.tier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagSummary {
    pub root_id: String,
    pub root_title: String,
    pub total_nodes: usize,
    pub tiers: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_path: Vec<String>,
    pub nodes: BTreeMap<String, NodeSummary>,
    pub tier_groups: Vec<Vec<String>>,
}

impl DagSummary {
    /// Assemble a summary from a graph whose tiers are fully assigned.
    ///
    /// # Errors
    ///
    /// [`DagError::Cycle`] if `tiers` is partial.
    pub fn from_parts(
        graph: &MoleculeGraph,
        tiers: TierAssignment,
        critical_path: Vec<String>,
    ) -> Result<Self, DagError> {
        let tiers = tiers.into_result()?;
        let closed = graph.closed_set();

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| {
                let summary = NodeSummary {
                    id: node.id.clone(),
                    title: node.title.clone(),
                    status: effective_status(node, &closed),
                    store_status: node.status.clone(),
                    parallel: node.parallel,
                    dependencies: node.blocked_by.clone(),
                    dependents: node.dependents.clone(),
                    tier: node.tier.unwrap_or_default(),
                };
                (node.id.clone(), summary)
            })
            .collect();

        Ok(Self {
            root_id: graph.root_id().to_string(),
            root_title: graph.root_title().to_string(),
            total_nodes: graph.len(),
            tiers: tiers.tier_count,
            critical_path,
            nodes,
            tier_groups: tiers.groups,
        })
    }

    /// Ids with the given effective status, sorted.
    pub fn ids_with_status(&self, status: &EffectiveStatus) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|node| &node.status == status)
            .map(|node| node.id.as_str())
            .collect()
    }
}

/// Build, layer and summarize the molecule rooted at `root_id`.
///
/// # Errors
///
/// Every [`build_graph`] error, plus [`DagError::Cycle`] when the blocking
/// edges contain a cycle.
#[instrument(skip(store, config))]
pub fn analyze<S: IssueStore + ?Sized>(
    store: &S,
    root_id: &str,
    config: &DagConfig,
) -> Result<DagSummary, DagError> {
    let mut graph = build_graph(store, root_id, config)?;
    let tiers = assign_tiers(&mut graph).into_result()?;
    let critical_path = find_critical_path(&graph, config.critical_path_ties);
    DagSummary::from_parts(&graph, tiers, critical_path)
}
