//! # Hydration Engine
//!
//! Turns one store record into one typed document plus a link manifest.
//!
//! ## Flow
//!
//! ```text
//! Record
//!   │ 1. discriminator (@class) present and non-empty
//!   ▼
//! TypeRegistry::resolve ──────────── ClassNotFound
//!   │ 2-3. instantiate target type
//!   ▼
//! MetadataCache::fields_of
//!   │ 4-5. per present field: Caster::cast (nullable / tolerant → Null)
//!   ▼
//! LinkTracker::add (link-like values) + TypeMetadata::assign (setter or public field)
//!   │
//!   ▼
//! Hydrated { document, links }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use graph_odm::hydrator::{Hydrator, MismatchPolicy};
//! use graph_odm::mapping::{FieldMapping, Mapped, TypeMapping};
//! use graph_odm::record::Record;
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Mapped for Person {
//!     fn mapping() -> TypeMapping<Self> {
//!         TypeMapping::new("Person")
//!             .alias("Person")
//!             .field(FieldMapping::new("name").cast("string"))
//!             .field(FieldMapping::new("age").cast("integer"))
//!             .setter("setName", |p: &mut Person, v| p.name = v)
//!             .setter("setAge", |p: &mut Person, v| p.age = v)
//!     }
//! }
//!
//! let hydrator = Hydrator::builder().build().unwrap();
//! hydrator.registry().register::<Person>("app");
//!
//! let record = Record::from_value(json!({"@class": "Person", "name": "Ann", "age": "34"})).unwrap();
//! let (person, links) = hydrator.hydrate_as::<Person>(&record, MismatchPolicy::Strict).unwrap();
//! assert_eq!(person, Person { name: "Ann".into(), age: 34 });
//! assert!(links.is_empty());
//! ```

pub mod batch;
pub mod builder;
pub mod engine;

pub use builder::HydratorBuilder;
pub use engine::Hydrator;

use crate::error::{HydrationError, HydrationResult};
use crate::link_tracker::LinkManifest;
use crate::mapping::{Document, Mapped};

/// What to do with a value-level cast failure on a non-nullable field.
///
/// Nullability is the per-field contract; `Tolerant` is an explicit override
/// that also downgrades non-nullable failures to null. Unsupported cast types
/// are never tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    #[default]
    Strict,
    Tolerant,
}

impl MismatchPolicy {
    pub fn from_tolerance(tolerate: bool) -> Self {
        if tolerate {
            MismatchPolicy::Tolerant
        } else {
            MismatchPolicy::Strict
        }
    }

    pub fn is_tolerant(self) -> bool {
        self == MismatchPolicy::Tolerant
    }
}

/// A hydrated document and the links found while building it.
#[derive(Debug)]
pub struct Hydrated {
    document: Box<dyn Document>,
    links: LinkManifest,
    target_type: String,
}

impl Hydrated {
    pub(crate) fn new(document: Box<dyn Document>, links: LinkManifest, target_type: String) -> Self {
        Self {
            document,
            links,
            target_type,
        }
    }

    pub fn document(&self) -> &dyn Document {
        self.document.as_ref()
    }

    pub fn links(&self) -> &LinkManifest {
        &self.links
    }

    /// Mapping name of the resolved target type.
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn downcast_ref<T: Mapped>(&self) -> Option<&T> {
        self.document.as_any().downcast_ref::<T>()
    }

    /// Take the concrete document out.
    pub fn into_document<T: Mapped>(self) -> HydrationResult<T> {
        self.into_typed::<T>().map(|(document, _)| document)
    }

    pub fn into_typed<T: Mapped>(self) -> HydrationResult<(T, LinkManifest)> {
        let Self {
            document,
            links,
            target_type,
        } = self;
        match document.into_any().downcast::<T>() {
            Ok(document) => Ok((*document, links)),
            Err(_) => Err(HydrationError::UnexpectedDocumentType {
                expected: T::mapping().type_name().to_string(),
                actual: target_type,
            }),
        }
    }

    pub fn into_parts(self) -> (Box<dyn Document>, LinkManifest) {
        (self.document, self.links)
    }
}
