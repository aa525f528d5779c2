//! Per-type mapping declarations and the erased metadata built from them.

use super::field::{FieldMapping, WriteStrategy};
use super::naming::setter_name;
use super::Mapped;
use crate::caster::{CastValue, FromCast};
use crate::error::{HydrationError, HydrationResult};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased assignment of one cast value onto a document.
pub(crate) type Writer =
    Arc<dyn Fn(&mut dyn Any, CastValue) -> Result<(), String> + Send + Sync>;

fn erase<T, V, F>(write: F) -> Writer
where
    T: Mapped,
    V: FromCast,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    Arc::new(move |target: &mut dyn Any, value: CastValue| {
        let target = target
            .downcast_mut::<T>()
            .ok_or_else(|| format!("target is not a {}", std::any::type_name::<T>()))?;
        write(target, V::from_cast(value)?);
        Ok(())
    })
}

/// Declarative mapping for a target type.
///
/// ```rust
/// use graph_odm::mapping::{FieldMapping, Mapped, TypeMapping};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     pub age: Option<i64>,
/// }
///
/// impl Person {
///     fn set_name(&mut self, name: String) {
///         self.name = name;
///     }
/// }
///
/// impl Mapped for Person {
///     fn mapping() -> TypeMapping<Self> {
///         TypeMapping::new("Person")
///             .alias("Person")
///             .field(FieldMapping::new("name").cast("string"))
///             .field(FieldMapping::new("age").cast("integer").nullable(true))
///             .setter("setName", Person::set_name)
///             .public_field("age", |p: &mut Person, age| p.age = age)
///     }
/// }
/// ```
pub struct TypeMapping<T> {
    type_name: String,
    aliases: Vec<String>,
    fields: Vec<FieldMapping>,
    setters: HashMap<String, Writer>,
    public_fields: HashMap<String, Writer>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Mapped> TypeMapping<T> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            aliases: Vec::new(),
            fields: Vec::new(),
            setters: HashMap::new(),
            public_fields: HashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Store class name this type matches. Call repeatedly for several.
    pub fn alias(mut self, store_class: impl Into<String>) -> Self {
        self.aliases.push(store_class.into());
        self
    }

    pub fn field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    /// Expose a setter under its conventional name (`setAge`).
    pub fn setter<V, F>(mut self, name: impl Into<String>, write: F) -> Self
    where
        V: FromCast,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.setters.insert(name.into(), erase(write));
        self
    }

    /// Declare `name` as externally writable.
    pub fn public_field<V, F>(mut self, name: impl Into<String>, write: F) -> Self
    where
        V: FromCast,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.public_fields.insert(name.into(), erase(write));
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Resolve every field's write strategy and erase the accessor tables.
    pub fn into_metadata(self) -> TypeMetadata {
        let fields = self
            .fields
            .into_iter()
            .map(|field| {
                let setter = setter_name(field.name());
                let write = if self.setters.contains_key(&setter) {
                    WriteStrategy::Setter(setter)
                } else if self.public_fields.contains_key(field.name()) {
                    WriteStrategy::Field
                } else {
                    WriteStrategy::Inaccessible
                };
                field.with_write_strategy(write)
            })
            .collect();

        TypeMetadata {
            type_name: self.type_name,
            fields,
            setters: self.setters,
            public_fields: self.public_fields,
        }
    }
}

/// Field metadata of one target type, in declaration order.
pub struct TypeMetadata {
    type_name: String,
    fields: Vec<FieldMapping>,
    setters: HashMap<String, Writer>,
    public_fields: HashMap<String, Writer>,
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl TypeMetadata {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Write `value` onto `target` following the field's write strategy.
    pub fn assign(
        &self,
        target: &mut dyn Any,
        field: &FieldMapping,
        value: CastValue,
    ) -> HydrationResult<()> {
        let writer = match field.write_strategy() {
            WriteStrategy::Setter(name) => self.setters.get(name),
            WriteStrategy::Field => self.public_fields.get(field.name()),
            WriteStrategy::Inaccessible => None,
        };
        let writer = writer.ok_or_else(|| HydrationError::NoAccessibleSetter {
            type_name: self.type_name.clone(),
            field: field.name().to_string(),
        })?;

        writer(target, value).map_err(|reason| HydrationError::AssignmentFailed {
            type_name: self.type_name.clone(),
            field: field.name().to_string(),
            reason,
        })
    }
}
