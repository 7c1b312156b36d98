//! In-memory issue store.
//!
//! Keeps issues in insertion order, which is the listing order reported by
//! [`IssueStore::list_children`]. Like the real store, listings come back as
//! [`IssueSummary`] values without dependency edges; only `show` and
//! `show_multiple` expose edges.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::StoreError;
use crate::model::issue::{Issue, IssueSummary, IssueUpdate, Status};
use crate::store::jsonl::{read_issues_from_path, write_issues_to_path};
use crate::store::{IssueStore, StatusFilter};

/// Issue store backed by a `Vec` plus an id index.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    issues: Vec<Issue>,
    index: HashMap<String, usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from fully-materialized issues.
    ///
    /// Duplicate ids resolve last-write-wins; the surviving record keeps the
    /// listing position of the first occurrence.
    #[must_use]
    pub fn from_issues(issues: impl IntoIterator<Item = Issue>) -> Self {
        let mut store = Self::new();
        for issue in issues {
            store.upsert(issue);
        }
        store
    }

    /// Load a store from a JSONL snapshot.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::Io`] and [`StoreError::Parse`] from the reader.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let issues = read_issues_from_path(path.as_ref())?;
        debug!(path = %path.as_ref().display(), count = issues.len(), "loaded issue snapshot");
        Ok(Self::from_issues(issues))
    }

    /// Persist the store as a JSONL snapshot in listing order.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError::Io`] from the writer.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        write_issues_to_path(path, &self.issues)
    }

    /// Insert or replace an issue by id. Returns the previous record.
    pub fn upsert(&mut self, issue: Issue) -> Option<Issue> {
        if let Some(&pos) = self.index.get(&issue.id) {
            return Some(std::mem::replace(&mut self.issues[pos], issue));
        }
        self.index.insert(issue.id.clone(), self.issues.len());
        self.issues.push(issue);
        None
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.index.get(id).map(|&pos| &self.issues[pos])
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Issue, StoreError> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(&mut self.issues[pos])
    }

    /// All issues in listing order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl IssueStore for MemoryStore {
    fn show(&self, id: &str) -> Result<Issue, StoreError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn show_multiple(&self, ids: &[String]) -> Result<HashMap<String, Issue>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.get(id).map(|issue| (id.clone(), issue.clone())))
            .collect())
    }

    fn list_children(
        &self,
        parent_id: &str,
        filter: &StatusFilter,
    ) -> Result<Vec<IssueSummary>, StoreError> {
        Ok(self
            .issues
            .iter()
            .filter(|issue| issue.parent.as_deref() == Some(parent_id))
            .filter(|issue| filter.matches(&issue.status))
            .map(IssueSummary::from)
            .collect())
    }

    fn close(&mut self, id: &str) -> Result<(), StoreError> {
        self.get_mut(id)?.status = Status::Closed;
        debug!(id, "closed issue");
        Ok(())
    }

    fn update(&mut self, id: &str, update: &IssueUpdate) -> Result<(), StoreError> {
        update.apply_to(self.get_mut(id)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::issue::DependencyKind;

    fn molecule() -> MemoryStore {
        MemoryStore::from_issues([
            Issue::new("gt-mol", "Molecule"),
            Issue::new("gt-mol.1", "Step 1")
                .with_parent("gt-mol")
                .with_status(Status::Closed),
            Issue::new("gt-mol.2", "Step 2")
                .with_parent("gt-mol")
                .blocked_by("gt-mol.1")
                .with_dependency("gt-mol", DependencyKind::parent_child()),
            Issue::new("gt-other.1", "Elsewhere").with_parent("gt-other"),
        ])
    }

    #[test]
    fn list_children_filters_by_parent_in_listing_order() {
        let store = molecule();
        let children = store
            .list_children("gt-mol", &StatusFilter::All)
            .expect("list should succeed");
        let ids: Vec<&str> = children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["gt-mol.1", "gt-mol.2"]);
    }

    #[test]
    fn list_children_honours_status_filter() {
        let store = molecule();
        let open = store
            .list_children("gt-mol", &StatusFilter::Only(Status::Open))
            .expect("list should succeed");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "gt-mol.2");
    }

    #[test]
    fn show_multiple_returns_edges_and_omits_unknown_ids() {
        let store = molecule();
        let ids = vec!["gt-mol.2".to_string(), "gt-missing".to_string()];
        let details = store.show_multiple(&ids).expect("show should succeed");
        assert_eq!(details.len(), 1);
        assert_eq!(details["gt-mol.2"].dependencies.len(), 2);
    }

    #[test]
    fn show_unknown_is_not_found() {
        let store = molecule();
        let err = store.show("gt-missing").expect_err("must fail");
        assert!(matches!(err, StoreError::NotFound(id) if id == "gt-missing"));
    }

    #[test]
    fn close_marks_issue_closed() {
        let mut store = molecule();
        store.close("gt-mol.2").expect("close should succeed");
        assert_eq!(
            store.show("gt-mol.2").expect("exists").status,
            Status::Closed
        );
        assert!(matches!(
            store.close("gt-missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn update_changes_fields() {
        let mut store = molecule();
        store
            .update("gt-mol.2", &IssueUpdate::status(Status::InProgress))
            .expect("update should succeed");
        assert_eq!(store.get("gt-mol.2").expect("exists").status, Status::InProgress);
    }

    #[test]
    fn duplicate_ids_use_last_write_wins_and_keep_position() {
        let store = MemoryStore::from_issues([
            Issue::new("a", "first"),
            Issue::new("b", "b"),
            Issue::new("a", "second"),
        ]);
        assert_eq!(store.len(), 2);
        let titles: Vec<&str> = store.issues().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "b"]);
    }

    #[test]
    fn jsonl_round_trip_keeps_listing_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("issues.jsonl");
        let store = molecule();
        store.save_jsonl(&path).expect("save should succeed");

        let loaded = MemoryStore::load_jsonl(&path).expect("load should succeed");
        let ids: Vec<&str> = loaded.issues().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["gt-mol", "gt-mol.1", "gt-mol.2", "gt-other.1"]);
    }
}
