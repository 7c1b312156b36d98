#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

//! Issue records as seen through the issue store.
//!
//! Two shapes exist on purpose:
//!
//! - [`Issue`]: the full detail record returned by `show`/`show_multiple`.
//!   Only this shape carries [`Dependency`] edges.
//! - [`IssueSummary`]: the listing record returned by `list_children`. It has
//!   no dependency field at all, so nothing built from a listing can ever
//!   claim a step is free of blockers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of the only dependency kind that gates readiness.
pub const BLOCKS_TAG: &str = "blocks";

/// Tag used by the store for structural parent links.
pub const PARENT_CHILD_TAG: &str = "parent-child";

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of an issue.
///
/// Statuses the engine does not know (for example `hooked`) are preserved in
/// [`Status::Other`]. They are neither closed nor open: a step in such a
/// status keeps its molecule incomplete but is never offered as ready work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
    Other(String),
}

impl Status {
    /// Parse a store status tag. Never fails; unknown tags become `Other`.
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "open" => Self::Open,
            "in_progress" | "in-progress" => Self::InProgress,
            "closed" => Self::Closed,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
            Self::Other(tag) => tag,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// `true` for every status that keeps a molecule from being complete.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_closed()
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DependencyKind
// ---------------------------------------------------------------------------

/// Kind of a dependency edge.
///
/// Only [`DependencyKind::Blocks`] participates in readiness, tiers and the
/// critical path. Every other tag, including tags this crate has never seen,
/// is informational. New edge types therefore default to non-blocking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DependencyKind {
    Blocks,
    Informational(String),
}

impl DependencyKind {
    pub fn parse(raw: &str) -> Self {
        if normalize(raw) == BLOCKS_TAG {
            Self::Blocks
        } else {
            Self::Informational(raw.trim().to_string())
        }
    }

    #[must_use]
    pub fn parent_child() -> Self {
        Self::Informational(PARENT_CHILD_TAG.to_string())
    }

    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocks)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Blocks => BLOCKS_TAG,
            Self::Informational(tag) => tag,
        }
    }
}

impl From<String> for DependencyKind {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DependencyKind> for String {
    fn from(kind: DependencyKind) -> Self {
        match kind {
            DependencyKind::Blocks => BLOCKS_TAG.to_string(),
            DependencyKind::Informational(tag) => tag,
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One dependency edge as reported by a detail fetch.
///
/// `id` is the target: the issue this one depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: i32,
    #[serde(rename = "dependency_type", alias = "type")]
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(id: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            status: Status::Open,
            priority: 0,
            kind,
        }
    }

    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }
}

/// Full issue detail, including typed dependency edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
}

impl Issue {
    /// Create an open issue with no parent and no edges.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: Status::Open,
            parent: None,
            priority: 2,
            dependencies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<Status>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, target: impl Into<String>, kind: DependencyKind) -> Self {
        self.dependencies.push(Dependency::new(target, kind));
        self
    }

    /// Shorthand for a `blocks` edge on `target`.
    #[must_use]
    pub fn blocked_by(self, target: impl Into<String>) -> Self {
        self.with_dependency(target, DependencyKind::Blocks)
    }

    /// Edges that gate readiness, in declaration order.
    pub fn blocking_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(|dep| dep.is_blocking())
    }

    #[must_use]
    pub fn summary(&self) -> IssueSummary {
        IssueSummary::from(self)
    }
}

/// Listing record. Carries no dependency information by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl From<&Issue> for IssueSummary {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            title: issue.title.clone(),
            status: issue.status.clone(),
            parent: issue.parent.clone(),
        }
    }
}

/// Field changes accepted by `IssueStore::update`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub status: Option<Status>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl IssueUpdate {
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.title.is_none() && self.description.is_none()
    }

    /// Apply the changes to `issue` in place.
    pub fn apply_to(&self, issue: &mut Issue) {
        if let Some(status) = &self.status {
            issue.status = status.clone();
        }
        if let Some(title) = &self.title {
            issue.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            issue.description.clone_from(description);
        }
    }
}
