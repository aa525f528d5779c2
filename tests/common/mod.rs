#![allow(dead_code)]

pub mod builders;
pub mod fixtures;
pub mod strategies;

pub use builders::*;
pub use fixtures::*;
pub use strategies::*;
