//! Readiness evaluation.
//!
//! An open step is **ready** iff every `blocks` target is in the closed set.
//! Informational edges never take part. Blocked status is never inferred
//! from the absence of edge data: steps built from a listing alone carry no
//! edges and are ready while open.
//!
//! The closed set holds the molecule's closed steps. A `blocks` target
//! outside the molecule is never in it, so such a step stays blocked.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use mol_core::Status;
use serde::{Deserialize, Serialize};

use crate::graph::{MoleculeGraph, StepNode};

/// Readiness of an open step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Blocked,
}

/// Status refined by readiness: open steps become `Ready` or `Blocked`,
/// every other status is mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectiveStatus {
    Ready,
    Blocked,
    InProgress,
    Closed,
    Other(String),
}

impl EffectiveStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "ready",
            Self::Blocked => "blocked",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for EffectiveStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "ready" => Self::Ready,
            "blocked" => Self::Blocked,
            "in_progress" => Self::InProgress,
            "closed" => Self::Closed,
            _ => Self::Other(raw),
        }
    }
}

impl From<EffectiveStatus> for String {
    fn from(status: EffectiveStatus) -> Self {
        match status {
            EffectiveStatus::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `blocks` targets of `node` that are not closed, in declaration order.
#[must_use]
pub fn unresolved_blockers<'a>(node: &'a StepNode, closed: &HashSet<&str>) -> Vec<&'a str> {
    node.blocked_by
        .iter()
        .map(String::as_str)
        .filter(|id| !closed.contains(id))
        .collect()
}

/// Whether every `blocks` target of `node` is closed. Ignores the node's own
/// status.
#[must_use]
pub fn blockers_closed(node: &StepNode, closed: &HashSet<&str>) -> bool {
    node.blocked_by.iter().all(|id| closed.contains(id.as_str()))
}

/// `true` iff `node` is open and all its blockers are closed.
#[must_use]
pub fn is_ready(node: &StepNode, closed: &HashSet<&str>) -> bool {
    node.status.is_open() && blockers_closed(node, closed)
}

#[must_use]
pub fn effective_status(node: &StepNode, closed: &HashSet<&str>) -> EffectiveStatus {
    match &node.status {
        Status::Open if blockers_closed(node, closed) => EffectiveStatus::Ready,
        Status::Open => EffectiveStatus::Blocked,
        Status::InProgress => EffectiveStatus::InProgress,
        Status::Closed => EffectiveStatus::Closed,
        Status::Other(tag) => EffectiveStatus::Other(tag.clone()),
    }
}

/// Readiness of every open step against `closed`.
#[must_use]
pub fn evaluate_readiness(
    graph: &MoleculeGraph,
    closed: &HashSet<&str>,
) -> BTreeMap<String, Readiness> {
    graph
        .nodes()
        .iter()
        .filter(|node| node.status.is_open())
        .map(|node| {
            let readiness = if blockers_closed(node, closed) {
                Readiness::Ready
            } else {
                Readiness::Blocked
            };
            (node.id.clone(), readiness)
        })
        .collect()
}

/// Ready steps in listing order, against the graph's own closed set.
#[must_use]
pub fn ready_steps(graph: &MoleculeGraph) -> Vec<&StepNode> {
    let closed = graph.closed_set();
    graph
        .nodes()
        .iter()
        .filter(|node| is_ready(node, &closed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{graph, step};
    use mol_core::{Dependency, DependencyKind};

    fn ids(steps: &[&StepNode]) -> Vec<String> {
        steps.iter().map(|node| node.id.clone()).collect()
    }

    #[test]
    fn step_without_blockers_is_ready_while_open() {
        let g = graph(vec![
            step("a", Status::Open, &[]),
            step("b", Status::InProgress, &[]),
        ]);
        assert_eq!(ids(&ready_steps(&g)), vec!["a"]);
    }

    #[test]
    fn informational_edges_never_block() {
        let mut node = step("a", Status::Open, &[]);
        node.informational = vec![
            Dependency::new("gt-mol", DependencyKind::parent_child()),
            Dependency::new("b", DependencyKind::parse("related")),
        ];
        let g = graph(vec![node, step("b", Status::Open, &[])]);
        let readiness = evaluate_readiness(&g, &g.closed_set());
        assert_eq!(readiness["a"], Readiness::Ready);
    }

    #[test]
    fn readiness_only_covers_open_steps() {
        let g = graph(vec![
            step("a", Status::Closed, &[]),
            step("b", Status::InProgress, &["a"]),
            step("c", Status::Open, &["b"]),
            step("d", Status::parse("hooked"), &[]),
        ]);
        let readiness = evaluate_readiness(&g, &g.closed_set());
        assert_eq!(readiness.len(), 1);
        assert_eq!(readiness["c"], Readiness::Blocked);
    }

    #[test]
    fn external_blocker_keeps_step_blocked() {
        let g = graph(vec![step("a", Status::Open, &["gt-other.3"])]);
        let closed = g.closed_set();
        let node = g.node("a").expect("a");
        assert!(!is_ready(node, &closed));
        assert_eq!(unresolved_blockers(node, &closed), vec!["gt-other.3"]);
    }

    #[test]
    fn effective_status_refines_open_only() {
        let g = graph(vec![
            step("a", Status::Closed, &[]),
            step("b", Status::Open, &["a"]),
            step("c", Status::Open, &["b"]),
            step("d", Status::InProgress, &[]),
            step("e", Status::parse("hooked"), &[]),
        ]);
        let closed = g.closed_set();
        let status = |id: &str| effective_status(g.node(id).expect("node"), &closed);
        assert_eq!(status("a"), EffectiveStatus::Closed);
        assert_eq!(status("b"), EffectiveStatus::Ready);
        assert_eq!(status("c"), EffectiveStatus::Blocked);
        assert_eq!(status("d"), EffectiveStatus::InProgress);
        assert_eq!(status("e").as_str(), "hooked");
    }

    #[test]
    fn effective_status_serializes_as_plain_tag() {
        let json = serde_json::to_string(&EffectiveStatus::Blocked).expect("serialize");
        assert_eq!(json, "\"blocked\"");
        let back: EffectiveStatus = serde_json::from_str("\"hooked\"").expect("parse");
        assert_eq!(back, EffectiveStatus::Other("hooked".to_string()));
    }
}
