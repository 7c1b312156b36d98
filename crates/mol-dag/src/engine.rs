//! Store-bound facade over the engine's free functions.

use std::collections::BTreeMap;

use mol_core::{EngineConfig, IssueStore};

use crate::advance::{StepOutcome, advance, advance_from_step, next_step};
use crate::error::DagError;
use crate::graph::{MoleculeGraph, assign_tiers, build_graph};
use crate::readiness::{self, Readiness};
use crate::summary::{DagSummary, analyze};

/// An issue store paired with engine settings.
///
/// Holds no graph state; every call re-reads the store.
#[derive(Debug, Clone, Default)]
pub struct MoleculeEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: IssueStore> MoleculeEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub const fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Built graph with tiers assigned.
    ///
    /// # Errors
    ///
    /// Build errors, or [`DagError::Cycle`].
    pub fn graph(&self, root_id: &str) -> Result<MoleculeGraph, DagError> {
        let mut graph = build_graph(&self.store, root_id, &self.config.dag)?;
        assign_tiers(&mut graph).into_result()?;
        Ok(graph)
    }

    /// # Errors
    ///
    /// See [`analyze`].
    pub fn summary(&self, root_id: &str) -> Result<DagSummary, DagError> {
        analyze(&self.store, root_id, &self.config.dag)
    }

    /// Readiness of every open step.
    ///
    /// # Errors
    ///
    /// Build errors.
    pub fn readiness(&self, root_id: &str) -> Result<BTreeMap<String, Readiness>, DagError> {
        let graph = build_graph(&self.store, root_id, &self.config.dag)?;
        Ok(readiness::evaluate_readiness(&graph, &graph.closed_set()))
    }

    /// Ids of ready steps in listing order.
    ///
    /// # Errors
    ///
    /// Build errors.
    pub fn ready_steps(&self, root_id: &str) -> Result<Vec<String>, DagError> {
        let graph = build_graph(&self.store, root_id, &self.config.dag)?;
        Ok(readiness::ready_steps(&graph)
            .into_iter()
            .map(|node| node.id.clone())
            .collect())
    }

    /// # Errors
    ///
    /// See [`next_step`].
    pub fn next_step(&self, root_id: &str) -> Result<StepOutcome, DagError> {
        next_step(&self.store, root_id, &self.config)
    }

    /// # Errors
    ///
    /// See [`advance`].
    pub fn advance(&mut self, root_id: &str, step_id: &str) -> Result<StepOutcome, DagError> {
        advance(&mut self.store, root_id, step_id, &self.config)
    }

    /// # Errors
    ///
    /// See [`advance_from_step`].
    pub fn advance_from_step(&mut self, step_id: &str) -> Result<StepOutcome, DagError> {
        advance_from_step(&mut self.store, step_id, &self.config)
    }
}
