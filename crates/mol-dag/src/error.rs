//! Error taxonomy for the dependency engine.
//!
//! | Variant        | Class      | Caller should                                  |
//! |----------------|------------|------------------------------------------------|
//! | `NotAMolecule` | usage      | pass a molecule root, not a leaf issue         |
//! | `NotAStep`     | usage      | pass a `<molecule>.<n>` step id                |
//! | `Store`        | store      | inspect the adapter; nothing was retried       |
//! | `Cycle`        | structural | fix the molecule's `blocks` edges              |
//!
//! A root with zero children is never reported as a completed molecule.

use mol_core::{ErrorCode, StoreError};

use crate::graph::tiers::CycleReport;

#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// The root has no children.
    #[error("no steps found for {root_id} (not a molecule root?)")]
    NotAMolecule { root_id: String },

    /// The id has no numeric step suffix, so its molecule cannot be derived.
    #[error("cannot derive molecule from {step_id}: not a step id")]
    NotAStep { step_id: String },

    /// An issue store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Tier assignment could not place every step.
    #[error("{0}")]
    Cycle(CycleReport),
}

impl DagError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotAMolecule { .. } => ErrorCode::NotAMolecule,
            Self::NotAStep { .. } => ErrorCode::NotAStep,
            Self::Store(err) => err.code(),
            Self::Cycle(_) => ErrorCode::CycleDetected,
        }
    }

    /// `true` for errors caused by how the engine was called.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::NotAMolecule { .. } | Self::NotAStep { .. })
    }
}
