//! Target types shared by the integration tests.

use chrono::NaiveDate;
use graph_odm::{BigDecimal, Embedded, FieldMapping, LazyLink, Mapped, Rid, TypeMapping};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Address {
    pub city: String,
    #[serde(default)]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub rid: Option<Rid>,
    pub name: String,
    pub age: i64,
    pub score: Option<i64>,
    pub manager: Option<Rid>,
    pub friends: Vec<Rid>,
    pub joined: Option<NaiveDate>,
    pub address: Option<Address>,
    pub notes: serde_json::Value,
}

impl Person {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn set_age(&mut self, age: i64) {
        self.age = age;
    }
}

impl Mapped for Person {
    fn mapping() -> TypeMapping<Self> {
        TypeMapping::new("Person")
            .alias("Person")
            .field(FieldMapping::new("rid").store_name("@rid").cast("link"))
            .field(FieldMapping::new("name").cast("string"))
            .field(FieldMapping::new("age").cast("integer"))
            .field(FieldMapping::new("score").cast("integer").nullable(true))
            .field(FieldMapping::new("manager").cast("link").nullable(true))
            .field(FieldMapping::new("friends").cast("linklist"))
            .field(
                FieldMapping::new("joined")
                    .cast("date")
                    .nullable(true)
                    .option("format", "%d/%m/%Y"),
            )
            .field(FieldMapping::new("address").cast("embedded").nullable(true))
            .field(FieldMapping::new("notes"))
            .setter("setRid", |p: &mut Person, rid| p.rid = rid)
            .setter("setName", Person::set_name)
            .setter("setAge", Person::set_age)
            .setter("setScore", |p: &mut Person, score| p.score = score)
            .setter("setManager", |p: &mut Person, manager| p.manager = manager)
            .setter("setFriends", |p: &mut Person, friends| p.friends = friends)
            .setter("setJoined", |p: &mut Person, joined| p.joined = joined)
            .setter(
                "setAddress",
                |p: &mut Person, address: Option<Embedded<Address>>| {
                    p.address = address.map(|Embedded(a)| a);
                },
            )
            .public_field("notes", |p: &mut Person, notes| p.notes = notes)
    }
}

/// Matches the `Employee` store class and everything declared to extend it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Employee {
    pub name: String,
    pub department: Option<String>,
}

impl Mapped for Employee {
    fn mapping() -> TypeMapping<Self> {
        TypeMapping::new("Employee")
            .alias("Employee")
            .field(FieldMapping::new("name").cast("string"))
            .field(FieldMapping::new("department").cast("string").nullable(true))
            .public_field("name", |e: &mut Employee, name| e.name = name)
            .public_field("department", |e: &mut Employee, department| {
                e.department = department;
            })
    }
}

/// Declares a field it offers no way to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sealed {
    pub label: String,
    secret: String,
}

impl Sealed {
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl Mapped for Sealed {
    fn mapping() -> TypeMapping<Self> {
        TypeMapping::new("Sealed")
            .alias("Sealed")
            .field(FieldMapping::new("label").cast("string"))
            .field(FieldMapping::new("secret").cast("string"))
            .setter("setLabel", |s: &mut Sealed, label| s.label = label)
    }
}

/// Uses a type tag no caster knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invoice {
    pub total: String,
}

impl Mapped for Invoice {
    fn mapping() -> TypeMapping<Self> {
        TypeMapping::new("Invoice")
            .alias("Invoice")
            .field(FieldMapping::new("total").cast("money").nullable(true))
            .setter("setTotal", |i: &mut Invoice, total| i.total = total)
    }
}

/// Measurement with a required but `Option`-typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub label: String,
    pub value: Option<i64>,
    pub amount: Option<BigDecimal>,
}

impl Mapped for Reading {
    fn mapping() -> TypeMapping<Self> {
        TypeMapping::new("Reading")
            .alias("Reading")
            .field(FieldMapping::new("label").cast("string"))
            .field(FieldMapping::new("value").cast("integer"))
            .field(FieldMapping::new("amount").cast("decimal").nullable(true))
            .setter("setLabel", |r: &mut Reading, label| r.label = label)
            .setter("setValue", |r: &mut Reading, value| r.value = value)
            .setter("setAmount", |r: &mut Reading, amount| r.amount = amount)
    }
}

/// Holds its lead as a link resolved on demand.
#[derive(Debug, Default)]
pub struct Team {
    pub name: String,
    pub lead: Option<LazyLink<Person>>,
}

impl Mapped for Team {
    fn mapping() -> TypeMapping<Self> {
        TypeMapping::new("Team")
            .alias("Team")
            .field(FieldMapping::new("name").cast("string"))
            .field(FieldMapping::new("lead").cast("link").nullable(true))
            .setter("setName", |t: &mut Team, name| t.name = name)
            .setter("setLead", |t: &mut Team, lead| t.lead = lead)
    }
}
