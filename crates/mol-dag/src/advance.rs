//! Step continuation: close a finished step, then find the next one.
//!
//! ```text
//!   advance(root, step)
//!        │ close step (optional, skipped if already closed)
//!        ▼
//!   build_graph(root) ── partition by status
//!        │
//!        ├── nothing open or active ─────────────► Complete
//!        ├── first open step with closed blockers ► Next
//!        └── otherwise ──────────────────────────► NoneReady
//! ```
//!
//! "First" is listing order. Callers get *a* ready step, not a ranked one;
//! the same snapshot always yields the same step.

use mol_core::{EngineConfig, IssueStore, molecule_id_from_step};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::DagError;
use crate::graph::{MoleculeGraph, build_graph};
use crate::readiness::is_ready;

/// Result of a continuation query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepOutcome {
    /// An open step whose blockers are all closed.
    Next { step_id: String, title: String },
    /// No step is open, in progress, or in any other non-closed status.
    Complete,
    /// Work remains but nothing can start yet.
    NoneReady {
        /// Steps in progress or in any other non-open, non-closed status,
        /// in listing order.
        in_progress: Vec<String>,
        /// Open steps with at least one unclosed blocker, in listing order.
        blocked: Vec<String>,
    },
}

impl StepOutcome {
    /// Id of the next step, if there is one.
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::Next { step_id, .. } => Some(step_id),
            _ => None,
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Classify an already-built graph.
pub fn outcome_for(graph: &MoleculeGraph) -> StepOutcome {
    if graph.is_complete() {
        return StepOutcome::Complete;
    }

    let closed = graph.closed_set();
    let mut in_progress = Vec::new();
    let mut blocked = Vec::new();
    for node in graph.nodes() {
        if node.status.is_closed() {
            continue;
        }
        if !node.status.is_open() {
            in_progress.push(node.id.clone());
        } else if is_ready(node, &closed) {
            return StepOutcome::Next {
                step_id: node.id.clone(),
                title: node.title.clone(),
            };
        } else {
            blocked.push(node.id.clone());
        }
    }

    StepOutcome::NoneReady {
        in_progress,
        blocked,
    }
}

/// Find the next ready step of `root_id` without closing anything.
///
/// # Errors
///
/// Propagates every [`build_graph`] error.
#[instrument(skip(store, config))]
pub fn next_step<S: IssueStore + ?Sized>(
    store: &S,
    root_id: &str,
    config: &EngineConfig,
) -> Result<StepOutcome, DagError> {
    let graph = build_graph(store, root_id, &config.dag)?;
    let outcome = outcome_for(&graph);
    match &outcome {
        StepOutcome::Next { step_id, .. } => info!(root = root_id, next = %step_id, "next step ready"),
        StepOutcome::Complete => info!(root = root_id, "molecule complete"),
        StepOutcome::NoneReady {
            in_progress,
            blocked,
        } => info!(
            root = root_id,
            in_progress = in_progress.len(),
            blocked = blocked.len(),
            "no step ready"
        ),
    }
    Ok(outcome)
}

/// Close `step_id` (unless configured not to) and report what comes next
/// in `root_id`.
///
/// A step that is already closed is not closed again. A failed lookup or
/// close returns before the graph is rebuilt, so a next step is never
/// reported after a failed close.
///
/// # Errors
///
/// - [`DagError::Store`] if the step lookup, the close, or the rebuild fails.
/// - [`DagError::NotAMolecule`] if `root_id` has no children.
#[instrument(skip(store, config))]
pub fn advance<S: IssueStore + ?Sized>(
    store: &mut S,
    root_id: &str,
    step_id: &str,
    config: &EngineConfig,
) -> Result<StepOutcome, DagError> {
    if config.advance.close_step {
        let step = store.show(step_id)?;
        if step.parent.as_deref() != Some(root_id) {
            warn!(
                step = step_id,
                root = root_id,
                parent = ?step.parent,
                "advancing a step that is not a child of the molecule"
            );
        }
        if step.status.is_closed() {
            debug!(step = step_id, "step already closed");
        } else {
            store.close(step_id)?;
            info!(step = step_id, "closed step");
        }
    }

    next_step(store, root_id, config)
}

/// [`advance`] with the molecule derived from the step id
/// (`gt-abc.3` → `gt-abc`).
///
/// # Errors
///
/// [`DagError::NotAStep`] if `step_id` has no numeric step suffix, plus every
/// error of [`advance`].
pub fn advance_from_step<S: IssueStore + ?Sized>(
    store: &mut S,
    step_id: &str,
    config: &EngineConfig,
) -> Result<StepOutcome, DagError> {
    let root_id = molecule_id_from_step(step_id).ok_or_else(|| DagError::NotAStep {
        step_id: step_id.to_string(),
    })?;
    advance(store, root_id, step_id, config)
}
