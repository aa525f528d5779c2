//! Registry entry describing one target type.

use super::{Document, Mapped, TypeMetadata};
use std::any::TypeId;
use std::fmt;

fn instantiate<T: Mapped>() -> Box<dyn Document> {
    Box::new(T::default())
}

fn introspect<T: Mapped>() -> TypeMetadata {
    T::mapping().into_metadata()
}

/// Identity, store class aliases and construction hooks of a target type.
#[derive(Clone)]
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: String,
    aliases: Vec<String>,
    factory: fn() -> Box<dyn Document>,
    introspect: fn() -> TypeMetadata,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl TypeDescriptor {
    pub fn of<T: Mapped>() -> Self {
        let mapping = T::mapping();
        Self {
            type_id: TypeId::of::<T>(),
            type_name: mapping.type_name().to_string(),
            aliases: mapping.aliases().to_vec(),
            factory: instantiate::<T>,
            introspect: introspect::<T>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Fresh, unpopulated instance of the target type.
    pub fn instantiate(&self) -> Box<dyn Document> {
        (self.factory)()
    }

    /// Build the type's field metadata. Callers should go through
    /// [`crate::metadata::MetadataCache`] instead of calling this per record.
    pub fn introspect(&self) -> TypeMetadata {
        (self.introspect)()
    }

    pub fn is<T: Mapped>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}
