//! Graph construction from the issue store.
//!
//! The listing call enumerates steps and supplies their status; it returns
//! [`IssueSummary`] values, which carry no edges. Every edge in the graph
//! comes from the detail fetch.

use std::collections::HashMap;

use mol_core::{DagConfig, Dependency, Issue, IssueStore, IssueSummary, StatusFilter};
use tracing::{debug, instrument, warn};

use super::{DetailSource, MoleculeGraph, StepNode};
use crate::error::DagError;

/// Build the blocking-edge graph for the molecule rooted at `root_id`.
///
/// Store calls, in order: `show(root)`, `list_children(root)`,
/// `show_multiple(step ids)`.
///
/// # Errors
///
/// - [`DagError::Store`] when any store call fails, including an unknown root.
/// - [`DagError::NotAMolecule`] when the root has no children.
#[instrument(skip(store, config))]
pub fn build_graph<S: IssueStore + ?Sized>(
    store: &S,
    root_id: &str,
    config: &DagConfig,
) -> Result<MoleculeGraph, DagError> {
    let root = store.show(root_id)?;

    let children = store.list_children(root_id, &StatusFilter::All)?;
    if children.is_empty() {
        return Err(DagError::NotAMolecule {
            root_id: root_id.to_string(),
        });
    }

    let ids: Vec<String> = children.iter().map(|child| child.id.clone()).collect();
    let details = store.show_multiple(&ids)?;

    let nodes: Vec<StepNode> = children
        .into_iter()
        .map(|summary| step_node(summary, &details, config))
        .collect();

    let graph = MoleculeGraph::from_nodes(root.id, root.title, nodes);
    debug!(
        steps = graph.len(),
        edges = graph.edge_count(),
        "built molecule graph"
    );
    Ok(graph)
}

fn step_node(
    summary: IssueSummary,
    details: &HashMap<String, Issue>,
    config: &DagConfig,
) -> StepNode {
    let Some(issue) = details.get(&summary.id) else {
        warn!(
            step = %summary.id,
            "step missing from detail fetch; treating it as having no dependencies"
        );
        return StepNode::listing_only(summary.id, summary.title, summary.status);
    };

    let mut blocked_by: Vec<String> = Vec::new();
    let mut informational: Vec<Dependency> = Vec::new();
    for dep in &issue.dependencies {
        if dep.is_blocking() {
            if !blocked_by.contains(&dep.id) {
                blocked_by.push(dep.id.clone());
            }
        } else {
            informational.push(dep.clone());
        }
    }

    let title = if summary.title.is_empty() {
        issue.title.clone()
    } else {
        summary.title
    };

    StepNode {
        id: summary.id,
        title,
        status: summary.status,
        blocked_by,
        informational,
        dependents: Vec::new(),
        tier: None,
        parallel: config.is_parallel(&issue.description),
        detail: DetailSource::Detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mol_core::{DependencyKind, MemoryStore, Status, StoreError};

    fn store() -> MemoryStore {
        MemoryStore::from_issues([
            Issue::new("gt-mol", "Release"),
            Issue::new("gt-mol.1", "Build")
                .with_parent("gt-mol")
                .with_dependency("gt-mol", DependencyKind::parent_child()),
            Issue::new("gt-mol.2", "Test")
                .with_parent("gt-mol")
                .with_description("Run the suite.\nparallel: true")
                .blocked_by("gt-mol.1")
                .blocked_by("gt-mol.1"),
        ])
    }

    #[test]
    fn builds_nodes_in_listing_order_with_detail_edges() {
        let graph = build_graph(&store(), "gt-mol", &DagConfig::default()).expect("build");

        assert_eq!(graph.root_id(), "gt-mol");
        assert_eq!(graph.root_title(), "Release");
        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["gt-mol.1", "gt-mol.2"]);
        assert_eq!(graph.edge_count(), 1);

        let test = graph.node("gt-mol.2").expect("node");
        assert_eq!(test.blocked_by, vec!["gt-mol.1"]);
        assert!(test.parallel);
        assert_eq!(test.detail, DetailSource::Detail);
    }

    #[test]
    fn parent_child_edges_stay_informational() {
        let graph = build_graph(&store(), "gt-mol", &DagConfig::default()).expect("build");
        let build = graph.node("gt-mol.1").expect("node");
        assert!(build.blocked_by.is_empty());
        assert_eq!(build.informational.len(), 1);
        assert!(!build.parallel);
    }

    #[test]
    fn childless_root_is_not_a_molecule() {
        let store = MemoryStore::from_issues([Issue::new("gt-leaf", "Leaf")]);
        let err = build_graph(&store, "gt-leaf", &DagConfig::default()).expect_err("must fail");
        assert!(matches!(err, DagError::NotAMolecule { root_id } if root_id == "gt-leaf"));
    }

    #[test]
    fn unknown_root_is_a_store_error() {
        let err = build_graph(&store(), "gt-nope", &DagConfig::default()).expect_err("must fail");
        assert!(matches!(err, DagError::Store(StoreError::NotFound(id)) if id == "gt-nope"));
    }

    #[test]
    fn custom_parallel_markers_apply() {
        let config = DagConfig {
            parallel_markers: vec!["[fanout]".to_string()],
            ..DagConfig::default()
        };
        let graph = build_graph(&store(), "gt-mol", &config).expect("build");
        assert!(!graph.node("gt-mol.2").expect("node").parallel);
        assert_eq!(
            graph.node("gt-mol.1").expect("node").status,
            Status::Open
        );
    }
}
