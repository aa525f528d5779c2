//! # Registry Infrastructure
//!
//! Scoped registration of target types and memoized store class resolution.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── TypeRegistry     (scopes of candidate types, resolution memo)
//! └── ClassHierarchy   (store class inheritance for ancestor matching)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use graph_odm::mapping::{FieldMapping, Mapped, TypeMapping};
//! use graph_odm::registry::TypeRegistry;
//!
//! #[derive(Debug, Default)]
//! struct City {
//!     name: String,
//! }
//!
//! impl Mapped for City {
//!     fn mapping() -> TypeMapping<Self> {
//!         TypeMapping::new("City")
//!             .alias("City")
//!             .field(FieldMapping::new("name").cast("string"))
//!             .setter("setName", |c: &mut City, name| c.name = name)
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! registry.register::<City>("geo");
//! assert!(registry.resolve("City").unwrap().is::<City>());
//! ```

pub mod hierarchy;
pub mod type_registry;

pub use hierarchy::ClassHierarchy;
pub use type_registry::{RegistryStats, TypeRegistry};
