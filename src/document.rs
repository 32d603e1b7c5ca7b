//! Document Loading
//!
//! Walks directory trees in lexical order, parses YAML files into a
//! schema-agnostic JSON value tree, and dispatches on the `kind`
//! discriminator field.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{LoadError, Result};

/// Document kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Kind {
    #[serde(rename = "location.openevents.tech/v1alpha1")]
    Location,
    #[serde(rename = "organizer.openevents.tech/v1alpha1")]
    Organizer,
    #[serde(rename = "event.openevents.tech/v1alpha1")]
    Event,
}

impl Kind {
    /// All kinds in load order: referenced kinds come before referencing ones
    pub const LOAD_ORDER: [Kind; 3] = [Kind::Location, Kind::Organizer, Kind::Event];

    /// The `kind` field value identifying this document type
    pub fn discriminator(&self) -> &'static str {
        match self {
            Kind::Location => "location.openevents.tech/v1alpha1",
            Kind::Organizer => "organizer.openevents.tech/v1alpha1",
            Kind::Event => "event.openevents.tech/v1alpha1",
        }
    }

    /// Parse a discriminator string back into a kind
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            "location.openevents.tech/v1alpha1" => Some(Kind::Location),
            "organizer.openevents.tech/v1alpha1" => Some(Kind::Organizer),
            "event.openevents.tech/v1alpha1" => Some(Kind::Event),
            _ => None,
        }
    }

    /// Name of the embedded schema asset for this kind
    pub fn schema_file(&self) -> &'static str {
        match self {
            Kind::Location => "location.v1alpha1.json",
            Kind::Organizer => "organizer.v1alpha1.json",
            Kind::Event => "event.v1alpha1.json",
        }
    }

    /// Subdirectory under a data folder holding documents of this kind
    pub fn dir_name(&self) -> &'static str {
        match self {
            Kind::Location => "locations",
            Kind::Organizer => "organizers",
            Kind::Event => "events",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Location => "location",
            Kind::Organizer => "organizer",
            Kind::Event => "event",
        };
        write!(f, "{name}")
    }
}

/// A parsed document with its kind resolved
#[derive(Debug, Clone)]
pub struct Document {
    /// Kind dispatched from the `kind` field
    pub kind: Kind,
    /// The document body as a generic JSON value tree
    pub body: Value,
}

/// Walk every non-directory file under `root`, recursively, in lexical order
pub fn walk(root: &Path) -> impl Iterator<Item = Result<PathBuf>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() => Some(Ok(e.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(LoadError::Io(e.into()))),
        })
}

/// Read a YAML file into a [`Document`], dispatching on the `kind` field
pub fn read(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let body = yaml_to_json(&yaml).map_err(|reason| LoadError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    let kind_field = body
        .get("kind")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let kind = kind_field
        .as_deref()
        .and_then(Kind::from_discriminator)
        .ok_or_else(|| LoadError::UnknownKind {
            path: path.to_path_buf(),
            kind: kind_field,
        })?;

    Ok(Document { kind, body })
}

/// Derive a document identifier from its path, relative to the kind
/// subdirectory, with the YAML extension stripped
///
/// `<root>/locations/de/berlin.yml` becomes `de/berlin`.
pub fn id_from_path(path: &Path, base: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(base)
        .map_err(|_| LoadError::InvalidPath {
            path: path.to_path_buf(),
        })?;

    let mut id = relative.to_string_lossy().replace('\\', "/");
    for ext in [".yml", ".yaml"] {
        if let Some(stripped) = id.strip_suffix(ext) {
            id = stripped.to_string();
            break;
        }
    }

    if id.is_empty() {
        return Err(LoadError::InvalidPath {
            path: path.to_path_buf(),
        });
    }

    Ok(id)
}

/// Convert a `serde_yaml::Value` into a `serde_json::Value`
///
/// Documents use only the JSON-compatible subset of YAML; anything the
/// JSON tree cannot represent is a parse failure.
fn yaml_to_json(yaml: &serde_yaml::Value) -> std::result::Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: std::result::Result<Vec<Value>, String> =
                seq.iter().map(yaml_to_json).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
