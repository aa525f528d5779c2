//! # Store Constants
//!
//! Metadata keys, cast type tags and environment variable names shared across
//! the mapper.

/// Default key naming a record's store class.
pub const DEFAULT_CLASS_KEY: &str = "@class";

/// Prefix of store metadata keys (`@rid`, `@version`, `@class`, ...).
pub const METADATA_PREFIX: char = '@';

/// Record metadata keys
pub mod record_keys {
    pub const RID: &str = "@rid";
    pub const VERSION: &str = "@version";
}

/// Built-in cast type tags. Lookups are case-insensitive.
pub mod cast_types {
    pub const BOOLEAN: &str = "boolean";
    pub const INTEGER: &str = "integer";
    pub const SHORT: &str = "short";
    pub const LONG: &str = "long";
    pub const BYTE: &str = "byte";
    pub const FLOAT: &str = "float";
    pub const DOUBLE: &str = "double";
    pub const DECIMAL: &str = "decimal";
    pub const STRING: &str = "string";
    pub const BINARY: &str = "binary";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
    pub const LINK: &str = "link";
    pub const LINK_LIST: &str = "linklist";
    pub const LINK_SET: &str = "linkset";
    pub const LINK_MAP: &str = "linkmap";
    pub const EMBEDDED: &str = "embedded";
    pub const EMBEDDED_LIST: &str = "embeddedlist";
    pub const EMBEDDED_SET: &str = "embeddedset";
    pub const EMBEDDED_MAP: &str = "embeddedmap";

    pub const ALL: &[&str] = &[
        BOOLEAN,
        INTEGER,
        SHORT,
        LONG,
        BYTE,
        FLOAT,
        DOUBLE,
        DECIMAL,
        STRING,
        BINARY,
        DATE,
        DATETIME,
        LINK,
        LINK_LIST,
        LINK_SET,
        LINK_MAP,
        EMBEDDED,
        EMBEDDED_LIST,
        EMBEDDED_SET,
        EMBEDDED_MAP,
    ];
}

/// Field mapping option keys read by the caster
pub mod cast_options {
    /// chrono format string accepted by `date` and `datetime`
    pub const FORMAT: &str = "format";
}

/// Environment variables
pub mod env {
    pub const PREFIX: &str = "GRAPH_ODM";
    pub const ENVIRONMENT: &str = "GRAPH_ODM_ENV";
    pub const CLASS_KEY: &str = "GRAPH_ODM_CLASS_KEY";
    pub const CAST_CACHE_ENABLED: &str = "GRAPH_ODM_CAST_CACHE_ENABLED";
    pub const CAST_CACHE_MAX_ENTRIES: &str = "GRAPH_ODM_CAST_CACHE_MAX_ENTRIES";
    pub const LOG_LEVEL: &str = "GRAPH_ODM_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "GRAPH_ODM_LOG_FORMAT";
}

/// Default bound on memoized cast results
pub const DEFAULT_CAST_CACHE_MAX_ENTRIES: usize = 10_000;
