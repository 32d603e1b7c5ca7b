//! Store-building pipeline
//!
//! Walks `locations/`, then `organizers/`, then `events/` under a root
//! folder and assembles a [`DataStore`]. The pass order is load-bearing:
//! events reference the other two kinds, so referenced entities must be
//! in the store before any event is processed.
//!
//! This pipeline runs sequentially and aborts the entire folder walk on
//! the first structural error, unlike the validation-only pipeline in
//! [`crate::validate`], which logs and continues.

use std::path::Path;

use crate::document::{self, Kind};
use crate::error::{LoadError, Result};
use crate::model;
use crate::registry::SchemaRegistry;
use crate::store::DataStore;

/// Load a folder tree into a new [`DataStore`]
///
/// `root` must contain `locations/`, `organizers/`, and `events/`
/// subdirectories. Every file is parsed, schema-validated, decoded, and
/// checked for referential integrity before insertion.
pub fn load_folder(root: &Path, registry: &SchemaRegistry) -> Result<DataStore> {
    let mut store = DataStore::new();
    for kind in Kind::LOAD_ORDER {
        load_pass(root, kind, registry, &mut store)?;
    }
    Ok(store)
}

fn load_pass(
    root: &Path,
    kind: Kind,
    registry: &SchemaRegistry,
    store: &mut DataStore,
) -> Result<()> {
    let base = root.join(kind.dir_name());

    for path in document::walk(&base) {
        let path = path?;

        let doc = document::read(&path)?;
        if doc.kind != kind {
            return Err(LoadError::UnknownKind {
                path,
                kind: Some(doc.kind.discriminator().to_string()),
            });
        }

        registry.validate(kind, &doc.body)?;
        let id = document::id_from_path(&path, &base)?;

        match kind {
            Kind::Location => {
                let item = model::decode_location(&doc.body)?;
                store.insert_location(id.clone(), item)?;
            }
            Kind::Organizer => {
                let item = model::decode_organizer(&doc.body)?;
                store.insert_organizer(id.clone(), item)?;
            }
            Kind::Event => {
                let item = model::decode_event(&doc.body)?;
                if let Some(organizer) = item.organizer.as_deref() {
                    store.resolve_organizer(organizer)?;
                }
                if let Some(location) = item.location.as_deref() {
                    store.resolve_location(location)?;
                }
                store.insert_event(id.clone(), item)?;
            }
        }

        tracing::debug!(path = %path.display(), %kind, id = %id, "document loaded");
    }

    Ok(())
}
