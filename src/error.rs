//! Error types for document loading and validation

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::Kind;

/// Result type for load and validation operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors raised while loading, validating, or storing documents
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML in {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("{}: invalid kind {}", .path.display(), .kind.as_deref().unwrap_or("(missing)"))]
    UnknownKind { path: PathBuf, kind: Option<String> },

    #[error("schema {schema} failed to compile: {reason}")]
    SchemaCompile { schema: String, reason: String },

    #[error("document is not valid against {schema}:\n{violations}")]
    SchemaValidation {
        schema: String,
        violations: Violations,
    },

    #[error("{field} is required")]
    RequiredField { field: &'static str },

    #[error("{field} must be a {expected}, got {value}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{value} is an invalid {field}")]
    InvalidEnum { field: &'static str, value: String },

    #[error("{value} is an invalid date")]
    InvalidDate { value: String },

    #[error("{kind} {id} already exists")]
    DuplicateId { kind: Kind, id: String },

    #[error("{id} is an invalid {field}")]
    UnresolvedReference { field: &'static str, id: String },

    #[error("{} is not inside a kind subdirectory", .path.display())]
    InvalidPath { path: PathBuf },
}

/// A single schema violation with structured context
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer to the violating field in the document
    pub instance_path: String,
    /// JSON Pointer within the schema that triggered the error
    pub schema_path: String,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of schema violations for one document
#[derive(Debug, Clone)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display_with_path() {
        let v = Violation {
            instance_path: "/startDate".to_string(),
            schema_path: "/properties/startDate/pattern".to_string(),
            message: r#""April" does not match "^[0-9]{4}-[0-9]{2}-[0-9]{2}$""#.to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/startDate"));
        assert!(display.contains("does not match"));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""name" is a required property"#.to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn test_unresolved_reference_names_the_id() {
        let err = LoadError::UnresolvedReference {
            field: "organizer",
            id: "zzz".to_string(),
        };
        assert_eq!(err.to_string(), "zzz is an invalid organizer");
    }
}
