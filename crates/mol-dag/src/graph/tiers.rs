//! Execution tiers via Kahn's algorithm.
//!
//! Tier 0 holds every step with no intra-molecule blocker. Each later tier
//! holds the steps whose blockers all sit in earlier tiers, so for every
//! edge `a → b`, `tier(b) > tier(a)`.
//!
//! Ids inside a tier are sorted lexicographically. The order carries no
//! meaning beyond making repeated runs identical.
//!
//! A cycle stops the layering. The steps placed so far keep their tiers, the
//! rest stay `None`, and the result carries a [`CycleReport`]. Callers treat
//! that as a malformed molecule; nothing downstream runs over a partial
//! layering.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::warn;

use super::MoleculeGraph;
use crate::error::DagError;

/// A blocking cycle that stopped tier assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Tiers completed before the layering stalled.
    pub tiers_assigned: usize,
    /// Steps left without a tier, sorted.
    pub unassigned: Vec<String>,
    /// One concrete cycle in blocking order, starting at its smallest id and
    /// repeating it at the end: `["a", "b", "a"]` means a blocks b and b
    /// blocks a.
    pub cycle_path: Vec<String>,
}

impl CycleReport {
    /// Number of distinct steps on [`Self::cycle_path`].
    pub fn cycle_len(&self) -> usize {
        self.cycle_path.len().saturating_sub(1)
    }

    pub fn is_self_loop(&self) -> bool {
        self.cycle_len() == 1
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self_loop() {
            write!(
                f,
                "cycle detected: self-loop on '{}' (step blocks itself)",
                self.cycle_path[0]
            )?;
        } else if self.cycle_len() == 2 {
            write!(
                f,
                "cycle detected: mutual block between '{}' and '{}'",
                self.cycle_path[0], self.cycle_path[1]
            )?;
        } else {
            write!(
                f,
                "cycle detected ({} steps): {}",
                self.cycle_len(),
                self.cycle_path.join(" -> ")
            )?;
        }
        write!(
            f,
            "; {} step(s) unassigned after {} tier(s)",
            self.unassigned.len(),
            self.tiers_assigned
        )
    }
}

/// Output of [`assign_tiers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAssignment {
    /// Number of tiers placed. Equal to `groups.len()`.
    pub tier_count: usize,
    /// Step ids per tier, each group sorted.
    pub groups: Vec<Vec<String>>,
    /// Set when a cycle stopped the layering.
    pub cycle: Option<CycleReport>,
}

impl TierAssignment {
    /// `true` when every step received a tier.
    pub const fn is_complete(&self) -> bool {
        self.cycle.is_none()
    }

    /// Turn a partial assignment into [`DagError::Cycle`].
    ///
    /// # Errors
    ///
    /// Returns [`DagError::Cycle`] when a cycle stopped the layering.
    pub fn into_result(self) -> Result<Self, DagError> {
        match self.cycle {
            Some(report) => Err(DagError::Cycle(report)),
            None => Ok(self),
        }
    }
}

/// Layer the graph's steps and record each step's tier on its node.
///
/// Only intra-molecule `blocks` edges count toward in-degree. Blockers
/// outside the molecule never delay a tier.
pub fn assign_tiers(graph: &mut MoleculeGraph) -> TierAssignment {
    let node_count = graph.len();
    let mut in_degree: Vec<usize> = (0..node_count)
        .map(|i| {
            graph
                .graph()
                .neighbors_directed(NodeIndex::new(i), Direction::Incoming)
                .count()
        })
        .collect();
    let mut placed = vec![false; node_count];
    let mut tiers: Vec<Option<usize>> = vec![None; node_count];
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut frontier: Vec<NodeIndex> = (0..node_count)
        .filter(|&i| in_degree[i] == 0)
        .map(NodeIndex::new)
        .collect();

    while !frontier.is_empty() {
        let tier = groups.len();
        let nodes = graph.nodes();
        frontier.sort_by(|a, b| nodes[a.index()].id.cmp(&nodes[b.index()].id));

        let mut next: Vec<NodeIndex> = Vec::new();
        for &idx in &frontier {
            placed[idx.index()] = true;
            tiers[idx.index()] = Some(tier);
            for dependent in graph.graph().neighbors_directed(idx, Direction::Outgoing) {
                let degree = &mut in_degree[dependent.index()];
                *degree = degree.saturating_sub(1);
                if *degree == 0 && !placed[dependent.index()] {
                    next.push(dependent);
                }
            }
        }

        groups.push(
            frontier
                .iter()
                .map(|idx| nodes[idx.index()].id.clone())
                .collect(),
        );
        frontier = next;
    }

    for (node, tier) in graph.nodes_mut().iter_mut().zip(tiers) {
        node.tier = tier;
    }

    let cycle = if placed.iter().all(|&p| p) {
        None
    } else {
        let report = cycle_report(graph, &placed, groups.len());
        warn!(
            root = graph.root_id(),
            unassigned = report.unassigned.len(),
            "{report}"
        );
        Some(report)
    };

    TierAssignment {
        tier_count: groups.len(),
        groups,
        cycle,
    }
}

fn cycle_report(graph: &MoleculeGraph, placed: &[bool], tiers_assigned: usize) -> CycleReport {
    let nodes = graph.nodes();
    let mut unassigned: Vec<String> = nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| !placed[*i])
        .map(|(_, node)| node.id.clone())
        .collect();
    unassigned.sort();

    CycleReport {
        tiers_assigned,
        cycle_path: find_cycle(graph, placed, &unassigned),
        unassigned,
    }
}

/// Walk blocker edges backwards among unplaced steps until a step repeats.
///
/// Every unplaced step still has an unplaced blocker, so the walk cannot
/// dead-end and must revisit a step.
fn find_cycle(graph: &MoleculeGraph, placed: &[bool], unassigned: &[String]) -> Vec<String> {
    let Some(start) = unassigned.first().and_then(|id| graph.node_index(id)) else {
        return Vec::new();
    };
    let nodes = graph.nodes();

    let mut walk: Vec<NodeIndex> = vec![start];
    let mut current = start;
    loop {
        let blocker = graph
            .graph()
            .neighbors_directed(current, Direction::Incoming)
            .filter(|idx| !placed[idx.index()])
            .min_by(|a, b| nodes[a.index()].id.cmp(&nodes[b.index()].id));
        let Some(blocker) = blocker else {
            return Vec::new();
        };
        if let Some(pos) = walk.iter().position(|&idx| idx == blocker) {
            // walk[pos..] runs dependent → blocker; reverse it into blocking order.
            let mut path: Vec<String> = walk[pos..]
                .iter()
                .rev()
                .map(|idx| nodes[idx.index()].id.clone())
                .collect();
            if let Some(smallest) = path
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.cmp(b.1))
                .map(|(i, _)| i)
            {
                path.rotate_left(smallest);
            }
            if let Some(first) = path.first().cloned() {
                path.push(first);
            }
            return path;
        }
        walk.push(blocker);
        current = blocker;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{graph, step};
    use mol_core::Status;

    #[test]
    fn linear_chain_gets_one_tier_per_step() {
        let mut g = graph(vec![
            step("c", Status::Open, &["b"]),
            step("b", Status::Open, &["a"]),
            step("a", Status::Open, &[]),
        ]);
        let tiers = assign_tiers(&mut g);

        assert!(tiers.is_complete());
        assert_eq!(tiers.tier_count, 3);
        assert_eq!(tiers.groups, vec![vec!["a"], vec!["b"], vec!["c"]]);
        assert_eq!(g.node("c").expect("c").tier, Some(2));
    }

    #[test]
    fn tier_is_one_plus_deepest_blocker() {
        let mut g = graph(vec![
            step("s1", Status::Open, &[]),
            step("s2", Status::Open, &["s1"]),
            step("s3", Status::Open, &["s1", "s2"]),
            step("s4", Status::Open, &[]),
        ]);
        let tiers = assign_tiers(&mut g);

        assert_eq!(tiers.groups, vec![vec!["s1", "s4"], vec!["s2"], vec!["s3"]]);
        assert_eq!(g.node("s3").expect("s3").tier, Some(2));
        assert_eq!(g.node("s4").expect("s4").tier, Some(0));
    }

    #[test]
    fn groups_are_sorted_regardless_of_listing_order() {
        let mut g = graph(vec![
            step("z", Status::Open, &[]),
            step("m", Status::Open, &[]),
            step("a", Status::Open, &[]),
        ]);
        let tiers = assign_tiers(&mut g);
        assert_eq!(tiers.groups, vec![vec!["a", "m", "z"]]);
    }

    #[test]
    fn external_blockers_do_not_delay_tiers() {
        let mut g = graph(vec![step("a", Status::Open, &["gt-other.1"])]);
        let tiers = assign_tiers(&mut g);
        assert_eq!(tiers.groups, vec![vec!["a"]]);
    }

    #[test]
    fn mutual_block_is_reported() {
        let mut g = graph(vec![
            step("root-task", Status::Open, &[]),
            step("a", Status::Open, &["b"]),
            step("b", Status::Open, &["a"]),
        ]);
        let tiers = assign_tiers(&mut g);

        assert!(!tiers.is_complete());
        assert_eq!(tiers.tier_count, 1);
        let report = tiers.cycle.clone().expect("cycle");
        assert_eq!(report.tiers_assigned, 1);
        assert_eq!(report.unassigned, vec!["a", "b"]);
        assert_eq!(report.cycle_len(), 2);
        assert_eq!(report.cycle_path.first(), report.cycle_path.last());
        assert!(report.to_string().contains("mutual block"));
        assert_eq!(g.node("a").expect("a").tier, None);

        assert!(matches!(tiers.into_result(), Err(DagError::Cycle(_))));
    }

    #[test]
    fn self_edge_is_a_one_step_cycle() {
        let mut g = graph(vec![step("a", Status::Open, &["a"])]);
        let report = assign_tiers(&mut g).cycle.expect("cycle");
        assert!(report.is_self_loop());
        assert_eq!(report.cycle_path, vec!["a", "a"]);
        assert_eq!(report.tiers_assigned, 0);
    }

    #[test]
    fn downstream_of_cycle_is_unassigned_but_not_on_path() {
        let mut g = graph(vec![
            step("a", Status::Open, &["c"]),
            step("b", Status::Open, &["a"]),
            step("c", Status::Open, &["b"]),
            step("d", Status::Open, &["c"]),
        ]);
        let report = assign_tiers(&mut g).cycle.expect("cycle");
        assert_eq!(report.unassigned, vec!["a", "b", "c", "d"]);
        assert_eq!(report.cycle_len(), 3);
        assert!(!report.cycle_path.contains(&"d".to_string()));
        assert!(report.to_string().contains("a -> b -> c -> a"));
    }
}
