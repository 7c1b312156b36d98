//! Critical path: the longest chain of intra-molecule `blocks` edges.
//!
//! Memoized DFS over dependents, started from every tier-0 step (no
//! intra-molecule blocker). Each step contributes one unit of length.
//!
//! Several chains can share the maximum length. [`TieBreak`] picks one:
//!
//! | Policy        | Start step                 | Next step at a branch             |
//! |---------------|----------------------------|-----------------------------------|
//! | `SmallestId`  | smallest id                | smallest id                       |
//! | `FirstFound`  | first in listing order     | first in stored dependent order   |
//!
//! The result is "a" longest path. Only `SmallestId` makes it independent
//! of the order the store reports steps and edges.
//!
//! The DFS recurses once per step along a chain, so stack depth grows with
//! the longest chain. Molecules hold tens of steps, not tens of thousands.

#![allow(clippy::module_name_repetitions)]

use std::cmp::Ordering;

use mol_core::TieBreak;
use petgraph::Direction;
use petgraph::graph::NodeIndex;

use super::MoleculeGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnStack,
    Done { len: usize, next: Option<NodeIndex> },
}

/// Compute one longest blocking chain, ordered from its tier-0 start to its
/// end. Empty for an empty graph.
///
/// The DFS cuts a cycle where it re-enters a step already on the stack, so
/// the result for a cyclic graph is finite but not meaningful. A graph that
/// is all cycle yields an empty path.
pub fn find_critical_path(graph: &MoleculeGraph, ties: TieBreak) -> Vec<String> {
    let nodes = graph.nodes();
    let mut starts: Vec<NodeIndex> = (0..nodes.len())
        .map(NodeIndex::new)
        .filter(|&idx| {
            graph
                .graph()
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
        })
        .collect();
    if ties == TieBreak::SmallestId {
        starts.sort_by(|a, b| nodes[a.index()].id.cmp(&nodes[b.index()].id));
    }

    let mut memo = vec![Visit::Unvisited; nodes.len()];
    let mut best: Option<(usize, NodeIndex)> = None;
    for start in starts {
        let len = longest_from(graph, start, ties, &mut memo);
        if best.is_none_or(|(best_len, _)| len > best_len) {
            best = Some((len, start));
        }
    }

    let mut path = Vec::new();
    let mut cursor = best.map(|(_, start)| start);
    while let Some(idx) = cursor {
        path.push(nodes[idx.index()].id.clone());
        cursor = match memo[idx.index()] {
            Visit::Done { next, .. } => next,
            _ => None,
        };
    }
    path
}

fn longest_from(
    graph: &MoleculeGraph,
    idx: NodeIndex,
    ties: TieBreak,
    memo: &mut [Visit],
) -> usize {
    match memo[idx.index()] {
        Visit::Done { len, .. } => return len,
        Visit::OnStack => return 0,
        Visit::Unvisited => {}
    }
    memo[idx.index()] = Visit::OnStack;

    let nodes = graph.nodes();
    let mut best: Option<(usize, NodeIndex)> = None;
    for dependent_id in &nodes[idx.index()].dependents {
        let Some(dependent) = graph.node_index(dependent_id) else {
            continue;
        };
        if memo[dependent.index()] == Visit::OnStack {
            continue;
        }
        let len = longest_from(graph, dependent, ties, memo);
        if len == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_len, best_idx)) => match len.cmp(&best_len) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => {
                    ties == TieBreak::SmallestId
                        && nodes[dependent.index()].id < nodes[best_idx.index()].id
                }
            },
        };
        if better {
            best = Some((len, dependent));
        }
    }

    let len = 1 + best.map_or(0, |(len, _)| len);
    memo[idx.index()] = Visit::Done {
        len,
        next: best.map(|(_, next)| next),
    };
    len
}
