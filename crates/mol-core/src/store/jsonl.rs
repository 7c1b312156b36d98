//! JSONL snapshots: one issue per line.
//!
//! A snapshot is a point-in-time export of the issue store (the same shape
//! `bd show --json` emits per issue). Blank lines and `#` comment lines are
//! skipped. Line numbers in errors are 1-based.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::StoreError;
use crate::model::issue::Issue;

/// Read issues from a JSONL reader.
///
/// # Errors
///
/// [`StoreError::Parse`] on the first undecodable line, or
/// [`StoreError::Backend`] if the reader fails.
pub fn read_issues(reader: impl BufRead) -> Result<Vec<Issue>, StoreError> {
    let mut issues = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| StoreError::Backend(format!("line {line_no}: {e}")))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let issue: Issue = serde_json::from_str(trimmed).map_err(|source| StoreError::Parse {
            line: line_no,
            source,
        })?;
        issues.push(issue);
    }
    Ok(issues)
}

/// Write issues to a JSONL writer, one compact JSON object per line.
///
/// # Errors
///
/// [`StoreError::Backend`] if serialization or the writer fails.
pub fn write_issues(writer: &mut impl Write, issues: &[Issue]) -> Result<(), StoreError> {
    for issue in issues {
        let line = serde_json::to_string(issue)
            .map_err(|e| StoreError::Backend(format!("serialize {}: {e}", issue.id)))?;
        writeln!(writer, "{line}").map_err(|e| StoreError::Backend(e.to_string()))?;
    }
    Ok(())
}

/// Read issues from a JSONL file.
///
/// # Errors
///
/// [`StoreError::Io`] if the file cannot be opened, otherwise as
/// [`read_issues`].
pub fn read_issues_from_path(path: impl AsRef<Path>) -> Result<Vec<Issue>, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_issues(BufReader::new(file))
}

/// Write issues to a JSONL file, creating parent directories as needed.
///
/// # Errors
///
/// [`StoreError::Io`] if the file or its directory cannot be created or
/// flushed, otherwise as [`write_issues`].
pub fn write_issues_to_path(path: impl AsRef<Path>, issues: &[Issue]) -> Result<(), StoreError> {
    let path = path.as_ref();
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_issues(&mut writer, issues)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::issue::{DependencyKind, Status};

    #[test]
    fn reads_issues_and_skips_blank_and_comment_lines() {
        let raw = concat!(
            "# snapshot of gt-mol\n",
            r#"{"id":"gt-mol.1","title":"Step 1","status":"closed","parent":"gt-mol"}"#,
            "\n\n",
            r#"{"id":"gt-mol.2","title":"Step 2","status":"open","parent":"gt-mol","dependencies":[{"id":"gt-mol.1","dependency_type":"blocks"},{"id":"gt-mol","dependency_type":"parent-child"}]}"#,
            "\n",
        );

        let issues = read_issues(raw.as_bytes()).expect("snapshot should parse");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].status, Status::Closed);
        assert_eq!(issues[1].dependencies.len(), 2);
        assert_eq!(issues[1].dependencies[0].kind, DependencyKind::Blocks);
        assert!(!issues[1].dependencies[1].kind.is_blocking());
    }

    #[test]
    fn parse_error_reports_line_number() {
        let raw = "{\"id\":\"a\"}\n\nnot json\n";
        let err = read_issues(raw.as_bytes()).expect_err("bad line must fail");
        assert!(matches!(err, StoreError::Parse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_issues_from_path(dir.path().join("absent.jsonl"))
            .expect_err("missing file must fail");
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn write_then_read_preserves_edges() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/issues.jsonl");
        let issues = vec![
            Issue::new("gt-mol.1", "Step 1").with_parent("gt-mol"),
            Issue::new("gt-mol.2", "Step 2")
                .with_parent("gt-mol")
                .blocked_by("gt-mol.1")
                .with_dependency("gt-mol", DependencyKind::parent_child()),
        ];

        write_issues_to_path(&path, &issues).expect("write should succeed");
        let loaded = read_issues_from_path(&path).expect("read should succeed");
        assert_eq!(loaded, issues);
    }
}
