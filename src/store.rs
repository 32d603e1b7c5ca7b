//! Data Store
//!
//! The in-memory relational snapshot of one load: three keyed
//! collections with duplicate-rejecting insertion and foreign-key
//! resolution. Append-only for the duration of a single invocation;
//! there is no update or remove.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::Kind;
use crate::error::{LoadError, Result};
use crate::model::{Event, Location, Organizer};

/// In-memory snapshot of locations, organizers, and events
#[derive(Debug, Default, Serialize)]
pub struct DataStore {
    pub locations: BTreeMap<String, Location>,
    pub organizers: BTreeMap<String, Organizer>,
    pub events: BTreeMap<String, Event>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a location, rejecting a duplicate id without mutating state
    pub fn insert_location(&mut self, id: String, item: Location) -> Result<()> {
        if self.locations.contains_key(&id) {
            return Err(LoadError::DuplicateId {
                kind: Kind::Location,
                id,
            });
        }
        self.locations.insert(id, item);
        Ok(())
    }

    /// Insert an organizer, rejecting a duplicate id without mutating state
    pub fn insert_organizer(&mut self, id: String, item: Organizer) -> Result<()> {
        if self.organizers.contains_key(&id) {
            return Err(LoadError::DuplicateId {
                kind: Kind::Organizer,
                id,
            });
        }
        self.organizers.insert(id, item);
        Ok(())
    }

    /// Insert an event, rejecting a duplicate id without mutating state
    pub fn insert_event(&mut self, id: String, item: Event) -> Result<()> {
        if self.events.contains_key(&id) {
            return Err(LoadError::DuplicateId {
                kind: Kind::Event,
                id,
            });
        }
        self.events.insert(id, item);
        Ok(())
    }

    /// Resolve an organizer reference against the current contents
    ///
    /// Must only be consulted after the organizer pass has completed.
    pub fn resolve_organizer(&self, id: &str) -> Result<&Organizer> {
        self.organizers
            .get(id)
            .ok_or_else(|| LoadError::UnresolvedReference {
                field: "organizer",
                id: id.to_string(),
            })
    }

    /// Resolve a location reference against the current contents
    pub fn resolve_location(&self, id: &str) -> Result<&Location> {
        self.locations
            .get(id)
            .ok_or_else(|| LoadError::UnresolvedReference {
                field: "location",
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{decode_event, decode_organizer};
    use serde_json::json;

    fn organizer(name: &str) -> Organizer {
        decode_organizer(&json!({
            "kind": "organizer.openevents.tech/v1alpha1",
            "name": name
        }))
        .unwrap()
    }

    #[test]
    fn test_duplicate_insertion_keeps_the_first() {
        let mut store = DataStore::new();
        store
            .insert_organizer("berlin".to_string(), organizer("first"))
            .unwrap();

        let err = store
            .insert_organizer("berlin".to_string(), organizer("second"))
            .unwrap_err();
        match err {
            LoadError::DuplicateId { kind, id } => {
                assert_eq!(kind, Kind::Organizer);
                assert_eq!(id, "berlin");
            }
            other => panic!("expected DuplicateId, got {other}"),
        }

        assert_eq!(store.organizers["berlin"].name, "first");
        assert_eq!(store.organizers.len(), 1);
    }

    #[test]
    fn test_same_id_across_kinds_is_allowed() {
        let mut store = DataStore::new();
        store
            .insert_organizer("berlin".to_string(), organizer("Rust Berlin"))
            .unwrap();
        store
            .insert_location(
                "berlin".to_string(),
                Location {
                    name: "bcc".to_string(),
                    country: "DE".to_string(),
                    region: "Berlin".to_string(),
                    postal_code: "10178".to_string(),
                    locality: "Berlin".to_string(),
                    address: "Alexanderstr. 11".to_string(),
                },
            )
            .unwrap();
        assert_eq!(store.organizers.len(), 1);
        assert_eq!(store.locations.len(), 1);
    }

    #[test]
    fn test_resolve_missing_reference_then_retry() {
        let mut store = DataStore::new();

        let err = store.resolve_organizer("zzz").unwrap_err();
        match err {
            LoadError::UnresolvedReference { field, id } => {
                assert_eq!(field, "organizer");
                assert_eq!(id, "zzz");
            }
            other => panic!("expected UnresolvedReference, got {other}"),
        }

        store
            .insert_organizer("zzz".to_string(), organizer("Late Arrival"))
            .unwrap();
        assert_eq!(store.resolve_organizer("zzz").unwrap().name, "Late Arrival");
    }

    #[test]
    fn test_snapshot_serializes_deterministically() {
        let mut store = DataStore::new();
        store
            .insert_organizer("b".to_string(), organizer("Second"))
            .unwrap();
        store
            .insert_organizer("a".to_string(), organizer("First"))
            .unwrap();
        store
            .insert_event(
                "conf".to_string(),
                decode_event(&json!({
                    "kind": "event.openevents.tech/v1alpha1",
                    "name": "RustConf",
                    "url": "https://rustconf.example.org",
                    "startDate": "2025-09-10",
                    "endDate": "2025-09-12",
                    "organizer": "a"
                }))
                .unwrap(),
            )
            .unwrap();

        let json = serde_json::to_value(&store).unwrap();
        let keys: Vec<&str> = json["organizers"]
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(
            json["events"]["conf"]["kind"],
            "event.openevents.tech/v1alpha1"
        );
        assert_eq!(json["events"]["conf"]["format"], "in-person");
    }
}
