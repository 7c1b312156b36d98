use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    StoreUnavailable,
    StoreIo,
    StoreParse,
    IssueNotFound,
    NotAMolecule,
    NotAStep,
    CycleDetected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::StoreUnavailable => "E1001",
            Self::StoreIo => "E1002",
            Self::StoreParse => "E1003",
            Self::IssueNotFound => "E2001",
            Self::NotAMolecule => "E2002",
            Self::NotAStep => "E2003",
            Self::CycleDetected => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::StoreUnavailable => "Issue store unavailable",
            Self::StoreIo => "Issue store file I/O failed",
            Self::StoreParse => "Issue store returned unparsable data",
            Self::IssueNotFound => "Issue not found",
            Self::NotAMolecule => "Issue has no steps (not a molecule root)",
            Self::NotAStep => "Issue id is not a molecule step",
            Self::CycleDetected => "Blocking dependency cycle in molecule",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::StoreUnavailable => Some("Check that the issue store is reachable and retry."),
            Self::StoreIo => Some("Check that the snapshot path exists and is readable."),
            Self::StoreParse => Some("Inspect the reported line; each line must be one JSON issue."),
            Self::IssueNotFound => None,
            Self::NotAMolecule => {
                Some("Pass the molecule root id, not a step id or a plain issue id.")
            }
            Self::NotAStep => Some("Step ids have the form <molecule>.<number>."),
            Self::CycleDetected => {
                Some("Remove one `blocks` edge on the reported cycle to make the molecule acyclic.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by an issue store adapter.
///
/// The engine never retries on these; they reach the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested issue does not exist.
    #[error("issue not found: {0}")]
    NotFound(String),

    /// Reading or writing a snapshot file failed.
    #[error("failed to access issue snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded.
    #[error("invalid issue record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Any other backend failure (process, network, lock).
    #[error("issue store failure: {0}")]
    Backend(String),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::IssueNotFound,
            Self::Io { .. } => ErrorCode::StoreIo,
            Self::Parse { .. } => ErrorCode::StoreParse,
            Self::Backend(_) => ErrorCode::StoreUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, StoreError};
    use std::collections::HashSet;

    const ALL: [ErrorCode; 7] = [
        ErrorCode::StoreUnavailable,
        ErrorCode::StoreIo,
        ErrorCode::StoreParse,
        ErrorCode::IssueNotFound,
        ErrorCode::NotAMolecule,
        ErrorCode::NotAStep,
        ErrorCode::CycleDetected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let rendered = code.to_string();
            assert_eq!(rendered.len(), 5);
            assert!(rendered.starts_with('E'));
            assert!(rendered.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn store_errors_map_to_codes() {
        assert_eq!(
            StoreError::NotFound("gt-x".to_string()).code(),
            ErrorCode::IssueNotFound
        );
        assert_eq!(
            StoreError::Backend("bd exited 1".to_string()).code(),
            ErrorCode::StoreUnavailable
        );
    }

    #[test]
    fn not_found_message_names_the_issue() {
        let err = StoreError::NotFound("gt-mol.4".to_string());
        assert_eq!(err.to_string(), "issue not found: gt-mol.4");
    }
}
