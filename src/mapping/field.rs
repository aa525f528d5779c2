//! Declarative description of one mapped field.

use crate::constants::METADATA_PREFIX;
use std::collections::BTreeMap;

/// How a cast value reaches the document.
///
/// Computed once when a type's metadata is built, never probed at hydration
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Conventional setter, e.g. `setFirstName` for `first_name`
    Setter(String),
    /// Externally writable field assigned directly
    Field,
    /// Neither a setter nor a writable field exists
    Inaccessible,
}

/// `{ name, store_name, cast, nullable }` for one target field.
///
/// ```rust
/// use graph_odm::mapping::FieldMapping;
///
/// let field = FieldMapping::new("age").cast("integer").nullable(true);
/// assert_eq!(field.store_field(), "age");
/// assert_eq!(field.cast_type(), Some("integer"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    name: String,
    store_name: String,
    cast: Option<String>,
    nullable: bool,
    options: BTreeMap<String, String>,
    write: WriteStrategy,
}

impl FieldMapping {
    /// The store field name defaults to `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            store_name: name.clone(),
            name,
            cast: None,
            nullable: false,
            options: BTreeMap::new(),
            write: WriteStrategy::Inaccessible,
        }
    }

    pub fn store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = store_name.into();
        self
    }

    pub fn cast(mut self, tag: impl Into<String>) -> Self {
        self.cast = Some(tag.into());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Extra parameter for the cast handler, e.g. `("format", "%d/%m/%Y")`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub(crate) fn with_write_strategy(mut self, write: WriteStrategy) -> Self {
        self.write = write;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store_field(&self) -> &str {
        &self.store_name
    }

    pub fn cast_type(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn write_strategy(&self) -> &WriteStrategy {
        &self.write
    }

    /// Fields read from store metadata keys such as `@rid` or `@version`.
    pub fn is_metadata(&self) -> bool {
        self.store_name.starts_with(METADATA_PREFIX)
    }
}
