//! Issue store adapter boundary.
//!
//! The store is an external collaborator. This module fixes the contract the
//! engine consumes:
//!
//! | Call            | Returns          | Dependency edges           |
//! |-----------------|------------------|----------------------------|
//! | `show`          | [`Issue`]        | populated, typed           |
//! | `show_multiple` | id → [`Issue`]   | populated, typed           |
//! | `list_children` | [`IssueSummary`] | none (not representable)   |
//! | `close`         | `()`             | n/a                        |
//! | `update`        | `()`             | n/a                        |
//!
//! Real stores answer a listing query cheaply and without edges. Because the
//! listing returns [`IssueSummary`], code that only holds a listing cannot
//! build a dependency edge and cannot mistake "no edges loaded" for "no
//! blockers".
//!
//! Implementations own their own timeout and retry policy. Errors are
//! reported as [`StoreError`] and propagated unchanged by callers.

pub mod jsonl;
pub mod memory;

use std::collections::HashMap;

use crate::error::StoreError;
use crate::model::issue::{Issue, IssueSummary, IssueUpdate, Status};

/// Status filter for listing queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(&self, status: &Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Synchronous issue store adapter.
pub trait IssueStore {
    /// Fetch one issue with its dependency edges.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the id is unknown, or any backend failure.
    fn show(&self, id: &str) -> Result<Issue, StoreError>;

    /// Fetch several issues with their dependency edges.
    ///
    /// Ids the store does not know are omitted from the map rather than
    /// reported as errors.
    ///
    /// # Errors
    ///
    /// Any backend failure.
    fn show_multiple(&self, ids: &[String]) -> Result<HashMap<String, Issue>, StoreError>;

    /// List the direct children of `parent_id`, in store listing order.
    ///
    /// # Errors
    ///
    /// Any backend failure.
    fn list_children(
        &self,
        parent_id: &str,
        filter: &StatusFilter,
    ) -> Result<Vec<IssueSummary>, StoreError>;

    /// Mark an issue closed.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the id is unknown, or any backend failure.
    fn close(&mut self, id: &str) -> Result<(), StoreError>;

    /// Apply field changes to an issue.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the id is unknown, or any backend failure.
    fn update(&mut self, id: &str, update: &IssueUpdate) -> Result<(), StoreError>;
}

impl<S: IssueStore + ?Sized> IssueStore for &mut S {
    fn show(&self, id: &str) -> Result<Issue, StoreError> {
        (**self).show(id)
    }

    fn show_multiple(&self, ids: &[String]) -> Result<HashMap<String, Issue>, StoreError> {
        (**self).show_multiple(ids)
    }

    fn list_children(
        &self,
        parent_id: &str,
        filter: &StatusFilter,
    ) -> Result<Vec<IssueSummary>, StoreError> {
        (**self).list_children(parent_id, filter)
    }

    fn close(&mut self, id: &str) -> Result<(), StoreError> {
        (**self).close(id)
    }

    fn update(&mut self, id: &str, update: &IssueUpdate) -> Result<(), StoreError> {
        (**self).update(id, update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_filter_matches_everything() {
        let filter = StatusFilter::All;
        assert!(filter.matches(&Status::Open));
        assert!(filter.matches(&Status::parse("hooked")));
    }

    #[test]
    fn only_filter_matches_exact_status() {
        let filter = StatusFilter::Only(Status::Closed);
        assert!(filter.matches(&Status::Closed));
        assert!(!filter.matches(&Status::Open));
        assert!(!filter.matches(&Status::InProgress));
    }
}
