#![forbid(unsafe_code)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]
//! mol-dag library.
//!
//! The molecule dependency engine: builds a molecule's blocking graph from
//! an [`IssueStore`](mol_core::IssueStore), layers it into execution tiers,
//! finds a critical path, evaluates readiness and drives step-by-step
//! continuation.
//!
//! Every query re-reads the store. Results are advisory: another actor may
//! close or claim a step between a query and the caller acting on it.
//!
//! # Conventions
//!
//! - **Errors**: [`DagError`] wraps [`StoreError`](mol_core::StoreError)
//!   verbatim and adds usage and structural errors.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod advance;
pub mod engine;
pub mod error;
pub mod graph;
pub mod readiness;
pub mod summary;

pub use advance::{StepOutcome, advance, advance_from_step, next_step, outcome_for};
pub use engine::MoleculeEngine;
pub use error::DagError;
pub use graph::{
    CycleReport, DetailSource, MoleculeGraph, StepNode, TierAssignment, assign_tiers, build_graph,
    find_critical_path,
};
pub use readiness::{EffectiveStatus, Readiness, evaluate_readiness, is_ready, ready_steps};
pub use summary::{DagSummary, NodeSummary, analyze};
