//! Schema Registry
//!
//! Compiles the embedded JSON Schemas, one per document kind, and holds
//! them for the process lifetime. The registry is an explicitly
//! constructed, immutable object passed by reference to both pipelines.

use std::collections::HashMap;

use include_dir::{include_dir, Dir};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::document::Kind;
use crate::error::{LoadError, Result, Violation, Violations};

/// Schema assets bundled into the binary
static SCHEMAS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// Compiled validators for every document kind
pub struct SchemaRegistry {
    validators: HashMap<Kind, JSONSchema>,
}

impl SchemaRegistry {
    /// Compile every embedded schema
    ///
    /// A missing or malformed schema asset is fatal: no validation can
    /// proceed without a usable registry.
    pub fn compile() -> Result<Self> {
        let mut validators = HashMap::new();
        for kind in Kind::LOAD_ORDER {
            validators.insert(kind, Self::compile_schema(kind)?);
        }
        Ok(Self { validators })
    }

    fn compile_schema(kind: Kind) -> Result<JSONSchema> {
        let name = kind.schema_file();

        let raw = SCHEMAS
            .get_file(name)
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| LoadError::SchemaCompile {
                schema: name.to_string(),
                reason: "embedded schema asset is missing".to_string(),
            })?;

        let value: Value = serde_json::from_str(raw).map_err(|e| LoadError::SchemaCompile {
            schema: name.to_string(),
            reason: e.to_string(),
        })?;

        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&value)
            .map_err(|e| LoadError::SchemaCompile {
                schema: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Validate a document body against the schema for `kind`
    ///
    /// Every violation is reported with the instance JSON Pointer, the
    /// schema JSON Pointer, and a message.
    pub fn validate(&self, kind: Kind, body: &Value) -> Result<()> {
        // compile() populates every kind, so the lookup cannot miss
        let validator = self
            .validators
            .get(&kind)
            .ok_or_else(|| LoadError::SchemaCompile {
                schema: kind.schema_file().to_string(),
                reason: "schema was not compiled".to_string(),
            })?;

        if let Err(errors) = validator.validate(body) {
            let violations: Vec<Violation> = errors
                .map(|e| Violation {
                    instance_path: e.instance_path.to_string(),
                    schema_path: e.schema_path.to_string(),
                    message: e.to_string(),
                })
                .collect();
            return Err(LoadError::SchemaValidation {
                schema: kind.schema_file().to_string(),
                violations: Violations::new(violations),
            });
        }

        Ok(())
    }
}
