//! Validation-only pipeline
//!
//! Walks an arbitrary folder and schema-validates every file without
//! building a data store. Per-file failures never abort the walk: each
//! one is funneled through a single channel into one aggregator thread
//! that counts and logs it. The channel is closed when the walk ends and
//! the aggregator is joined before the final tally is reported, so every
//! report is drained before this function returns.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::document::{self, Kind};
use crate::error::{LoadError, Result};
use crate::registry::SchemaRegistry;

/// A per-file validation failure
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Validate every file under `root`, returning the number of failures
///
/// Only a walk-level failure (an unreadable directory) is an error;
/// invalid files are logged, counted, and skipped.
pub fn validate_folder(root: &Path, registry: &SchemaRegistry) -> Result<usize> {
    let (tx, rx) = mpsc::channel::<FileReport>();

    let aggregator = thread::spawn(move || {
        let mut errors = 0usize;
        for report in rx {
            errors += 1;
            tracing::info!(
                path = %report.path.display(),
                error = %report.error,
                "file validity"
            );
        }
        errors
    });

    let mut walk_error = None;
    for path in document::walk(root) {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                walk_error = Some(e);
                break;
            }
        };

        match validate_file(&path, registry) {
            Ok(kind) => {
                tracing::debug!(path = %path.display(), %kind, valid = true, "file validity");
            }
            Err(error) => {
                tracing::debug!(path = %path.display(), valid = false, "file validity");
                tx.send(FileReport { path, error })
                    .expect("report aggregator exited early");
            }
        }
    }

    // Closing the channel is the completion signal for the aggregator.
    drop(tx);
    let errors = aggregator
        .join()
        .expect("report aggregator panicked");

    if let Some(e) = walk_error {
        return Err(e);
    }

    tracing::info!(errors, "errors count");
    Ok(errors)
}

/// Validate a single file against the schema for its kind
fn validate_file(path: &Path, registry: &SchemaRegistry) -> Result<Kind> {
    let doc = document::read(path)?;
    registry.validate(doc.kind, &doc.body)?;
    Ok(doc.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::compile().unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    const VALID_ORGANIZER: &str =
        "kind: organizer.openevents.tech/v1alpha1\nname: Rust Berlin\n";
    const VALID_EVENT: &str = "\
kind: event.openevents.tech/v1alpha1
name: RustConf
url: https://rustconf.example.org
startDate: \"2025-09-10\"
endDate: \"2025-09-12\"
";

    #[test]
    fn test_all_valid_counts_zero() {
        let dir = tempdir().unwrap();
        write(dir.path(), "org.yml", VALID_ORGANIZER);
        write(dir.path(), "event.yml", VALID_EVENT);

        let errors = validate_folder(dir.path(), &registry()).unwrap();
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_walk_continues_past_failures() {
        let dir = tempdir().unwrap();
        // Sorts first, so later files prove the walk kept going.
        write(dir.path(), "a-bad.yml", "kind: unknown.example.org/v1\n");
        write(dir.path(), "b-org.yml", VALID_ORGANIZER);
        write(
            dir.path(),
            "c-invalid.yml",
            "kind: organizer.openevents.tech/v1alpha1\nurl: https://example.org\n",
        );
        write(dir.path(), "d-event.yml", VALID_EVENT);

        let errors = validate_folder(dir.path(), &registry()).unwrap();
        assert_eq!(errors, 2);
    }

    #[test]
    fn test_malformed_yaml_is_counted_not_fatal() {
        let dir = tempdir().unwrap();
        write(dir.path(), "broken.yml", "kind: [unclosed\n");
        write(dir.path(), "org.yml", VALID_ORGANIZER);

        let errors = validate_folder(dir.path(), &registry()).unwrap();
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_schema_violation_is_counted() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "event.yml",
            "kind: event.openevents.tech/v1alpha1\nname: RustConf\n",
        );

        let errors = validate_folder(dir.path(), &registry()).unwrap();
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_nested_folders_are_walked() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        write(&dir.path().join("a/b"), "org.yml", VALID_ORGANIZER);
        write(dir.path(), "bad.yml", "no kind at all: true\n");

        let errors = validate_folder(dir.path(), &registry()).unwrap();
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_unreadable_root_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = validate_folder(&missing, &registry()).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
