#![forbid(unsafe_code)]
//! mol-core library.
//!
//! Issue records, typed dependency edges, and the issue store adapter that
//! the molecule dependency engine (`mol-dag`) reads from.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums at the store boundary ([`StoreError`]);
//!   `anyhow::Result` only where config files are read.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use config::{AdvanceConfig, DagConfig, EngineConfig, TieBreak, load_engine_config};
pub use error::{ErrorCode, StoreError};
pub use model::issue::{
    BLOCKS_TAG, Dependency, DependencyKind, Issue, IssueSummary, IssueUpdate, PARENT_CHILD_TAG,
    Status,
};
pub use model::step_id::molecule_id_from_step;
pub use store::memory::MemoryStore;
pub use store::{IssueStore, StatusFilter};
