#![allow(clippy::doc_markdown)] // Allow technical terms like OrientDB, RID in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Graph ODM
//!
//! Object-document mapping core for graph document stores.
//!
//! ## Overview
//!
//! Records come out of the store as loosely typed JSON objects carrying a
//! class discriminator (`@class`). This crate turns each record into a
//! strongly typed application document: it resolves the discriminator to a
//! registered target type, casts every declared field to its type tag,
//! assigns the results through the type's accessors, and reports the fields
//! that still point at unloaded records in a link manifest.
//!
//! ## Architecture
//!
//! ```text
//! Record ──► Hydrator ──► TypeRegistry   (store class ─► TypeDescriptor)
//!                │──────► MetadataCache  (TypeId ─► TypeMetadata)
//!                │──────► Caster         (tag + raw ─► CastValue, via CastCache)
//!                └──────► LinkTracker    (field ─► LinkRef)
//!                               │
//!                               ▼
//!                  Hydrated { document, links }
//! ```
//!
//! ## Module Organization
//!
//! - [`hydrator`] - Single, batch and parallel hydration
//! - [`registry`] - Scoped, hierarchy-aware type resolution
//! - [`mapping`] - Target type declarations and erased metadata
//! - [`caster`] - Type tag conversion and the cast cache
//! - [`metadata`] - Per-type metadata memoization
//! - [`link_tracker`] - Per-hydration link manifest
//! - [`proxy`] - Lazily loaded linked documents
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_odm::{FieldMapping, Hydrator, Mapped, MismatchPolicy, Record, Rid, TypeMapping};
//! use serde_json::json;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     manager: Option<Rid>,
//! }
//!
//! impl Mapped for Person {
//!     fn mapping() -> TypeMapping<Self> {
//!         TypeMapping::new("Person")
//!             .alias("Person")
//!             .field(FieldMapping::new("name").cast("string"))
//!             .field(FieldMapping::new("manager").cast("link").nullable(true))
//!             .setter("setName", |p: &mut Person, v| p.name = v)
//!             .setter("setManager", |p: &mut Person, v| p.manager = v)
//!     }
//! }
//!
//! # fn main() -> graph_odm::Result<()> {
//! let hydrator = Hydrator::builder().build()?;
//! hydrator.registry().register::<Person>("app");
//!
//! let record = Record::from_json(r##"{"@class": "Person", "name": "Ann", "manager": "#12:1"}"##)?;
//! let hydrated = hydrator.hydrate(&record, MismatchPolicy::Strict)?;
//!
//! assert!(hydrated.links().contains("manager"));
//! let person: Person = hydrated.into_document()?;
//! assert_eq!(person.manager, Some(Rid::new(12, 1)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                                  # Unit, integration and property tests
//! cargo bench --features benchmarks           # Criterion benchmarks
//! ```

pub mod caster;
pub mod config;
pub mod constants;
pub mod error;
pub mod hydrator;
pub mod link_tracker;
pub mod logging;
pub mod mapping;
pub mod metadata;
pub mod proxy;
pub mod record;
pub mod registry;
pub mod rid;

pub use bigdecimal::BigDecimal;
pub use caster::{CastCache, CastContext, CastHandler, CastValue, Caster, Embedded, FromCast};
pub use config::MapperConfig;
pub use error::{CastError, HydrationError, HydrationResult, Result};
pub use hydrator::{Hydrated, Hydrator, HydratorBuilder, MismatchPolicy};
pub use link_tracker::{LinkManifest, LinkRef, LinkTracker};
pub use mapping::{Document, FieldMapping, Mapped, TypeDescriptor, TypeMapping, TypeMetadata};
pub use metadata::MetadataCache;
pub use proxy::{LazyLink, LazyProxy};
pub use record::Record;
pub use registry::{ClassHierarchy, TypeRegistry};
pub use rid::Rid;
