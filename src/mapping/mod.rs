//! # Type Mapping Declarations
//!
//! The declaration surface target types use to describe themselves to the
//! mapper: which store classes they match, which fields they carry, how each
//! field is cast, and how cast values are written back.
//!
//! ## Architecture
//!
//! ```text
//! impl Mapped for T
//!   └── TypeMapping<T>           (aliases, FieldMappings, setter/field tables)
//!         ├── TypeDescriptor     (registry entry: identity, aliases, factory)
//!         └── TypeMetadata       (erased fields + writers, built once per type)
//! ```
//!
//! Target types expose an explicit accessor table instead of being probed at
//! runtime: a setter registered under its conventional name (`setFirstName`
//! for `first_name`) wins, a field declared with
//! [`TypeMapping::public_field`] is the fallback, and anything else is
//! inaccessible.

pub mod descriptor;
pub mod field;
pub mod naming;
pub mod type_mapping;

pub use descriptor::TypeDescriptor;
pub use field::{FieldMapping, WriteStrategy};
pub use naming::setter_name;
pub use type_mapping::{TypeMapping, TypeMetadata};

use std::any::Any;
use std::fmt;

/// A target type the mapper can instantiate and populate.
pub trait Mapped: Any + Send + Sync + fmt::Debug + Default {
    fn mapping() -> TypeMapping<Self>;
}

/// Object-safe view of a hydrated document.
pub trait Document: Any + Send + Sync + fmt::Debug {
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Mapped> Document for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn Document {
    pub fn downcast_ref<T: Mapped>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Mapped>(&self) -> bool {
        self.as_any().is::<T>()
    }
}
