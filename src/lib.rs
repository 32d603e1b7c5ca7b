//! OpenEvents Data Loader
//!
//! Ingests a directory tree of declarative YAML documents describing
//! events, locations, and organizers, validates each document against a
//! versioned JSON Schema, cross-references foreign keys, and assembles
//! an in-memory relational snapshot.
//!
//! ## Features
//!
//! - **Schema Validation**: every document is checked against an embedded
//!   JSON Schema for its kind before any field is touched
//! - **Typed Decoding**: explicit field-by-field extraction with hard
//!   errors on type mismatch, never silent defaults
//! - **Referential Integrity**: an event's organizer and location
//!   references must resolve to already-loaded entities
//! - **Two Pipelines**: a sequential store-building pass that fails fast,
//!   and a log-and-continue validation pass over arbitrary folders
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── locations/
//! │   └── de/berlin-bcc.yml
//! ├── organizers/
//! │   └── rust-berlin.yml
//! └── events/
//!     └── 2025/rustconf.yml
//! ```
//!
//! The identifier of each record is its path relative to the kind
//! subdirectory with the YAML extension stripped, so the event above is
//! `2025/rustconf`.

pub mod document;
pub mod error;
pub mod loader;
pub mod model;
pub mod registry;
pub mod store;
pub mod validate;

pub use document::{Document, Kind};
pub use error::{LoadError, Result, Violation, Violations};
pub use loader::load_folder;
pub use model::{CfpWindow, Event, EventFormat, Location, Organizer};
pub use registry::SchemaRegistry;
pub use store::DataStore;
pub use validate::validate_folder;
