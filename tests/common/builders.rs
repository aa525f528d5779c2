//! Record and hydrator builders for tests.

use graph_odm::{Hydrator, Record};
use serde_json::{json, Map, Value};

use super::fixtures::{Employee, Invoice, Person, Reading, Sealed, Team};

/// Fluent builder for store records.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    pub fn new(class: &str) -> Self {
        Self::default().field("@class", json!(class))
    }

    /// A record without any discriminator.
    pub fn unclassified() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Record {
        Record::new(self.fields)
    }
}

/// Hydrator with every fixture type registered in the `app` scope.
pub fn fixture_hydrator() -> Hydrator {
    let hydrator = Hydrator::builder()
        .build()
        .expect("default configuration is valid");
    hydrator.registry().register::<Person>("app");
    hydrator.registry().register::<Employee>("app");
    hydrator.registry().register::<Sealed>("app");
    hydrator.registry().register::<Invoice>("app");
    hydrator.registry().register::<Reading>("app");
    hydrator.registry().register::<Team>("app");
    hydrator
}

/// The canonical `Person` record: `{"@class": "Person", "name": "Ann", "age": "34"}`.
pub fn ann() -> Record {
    RecordBuilder::new("Person")
        .field("name", json!("Ann"))
        .field("age", json!("34"))
        .build()
}
