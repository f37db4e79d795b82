//! Database introspection
//!
//! This module extracts table metadata from live databases and resolves
//! native column types to canonical identifiers. Each supported database
//! has its own feature-gated submodule.

use crate::prelude::{Schema, SdliftError};

pub mod type_map;

pub use type_map::PostgresTypeMap;

/// Filters to apply during introspection
#[derive(Debug, Default, Clone)]
pub struct TableFilter {
    /// Only include these tables (if Some)
    pub include: Option<Vec<String>>,
    /// Exclude these tables
    pub exclude: Option<Vec<String>>,
}

impl TableFilter {
    /// Check if a table should be included
    pub fn should_include(&self, table_name: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .map_or(true, |include| include.iter().any(|t| t == table_name));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.iter().any(|t| t == table_name));

        included && !excluded
    }

    pub fn is_active(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }
}

/// Trait for database introspection implementations
pub trait Introspector {
    /// Read the tables of `schema_name` with columns, keys, defaults and
    /// foreign keys resolved
    fn introspect(&mut self, schema_name: &str, filter: &TableFilter) -> Result<Schema, SdliftError>;
}

// Feature-gated database implementations
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresIntrospector;
