//! Canonical type identifiers
//!
//! The introspector resolves native database types into these identifiers.
//! The same collaborator also answers capability questions about them, so the
//! renderer never hard-codes knowledge about individual types.

pub const INT: &str = "Int";
pub const FLOAT: &str = "Float";
pub const BOOLEAN: &str = "Boolean";
pub const STRING: &str = "String";
pub const DATE_TIME: &str = "DateTime";
pub const JSON: &str = "Json";

/// Capability lookup for canonical types
pub trait TypeCapabilities {
    /// Whether default literals of this type must be emitted as quoted strings
    fn requires_quoting(&self, type_identifier: &str) -> bool;
}

/// The built-in canonical type table
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalTypes;

impl TypeCapabilities for CanonicalTypes {
    fn requires_quoting(&self, type_identifier: &str) -> bool {
        matches!(type_identifier, STRING | DATE_TIME | JSON)
    }
}
