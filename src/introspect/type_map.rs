//! PostgreSQL type resolution
//!
//! Maps native PostgreSQL types (as printed by `format_type`) to canonical
//! type identifiers and normalises column default expressions.

use crate::inferrer::naming::capitalize_first_letter;
use crate::schema::DefaultValue;
use crate::types::{self, CanonicalTypes, TypeCapabilities};

/// Resolves PostgreSQL types to canonical identifiers
#[derive(Debug, Clone, Default)]
pub struct PostgresTypeMap {
    /// Names of user-defined enum types in the introspected schema
    enums: Vec<String>,
}

impl PostgresTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enums(mut self, enums: Vec<String>) -> Self {
        self.enums = enums;
        self
    }

    /// Canonical identifier for a native type, or `None` when unsupported.
    /// Enum columns resolve to the capitalized enum name, whether or not
    /// `format_type` qualified or quoted it.
    pub fn resolve(&self, native_type: &str) -> Option<String> {
        let lower = native_type.to_lowercase();
        let trimmed = lower.trim();

        // Arrays have no scalar counterpart
        if trimmed.ends_with("[]") {
            return None;
        }

        if trimmed.starts_with("character varying")
            || trimmed.starts_with("varchar")
            || trimmed.starts_with("character(")
            || trimmed.starts_with("char(")
        {
            return Some(types::STRING.to_string());
        }
        if trimmed.starts_with("numeric") || trimmed.starts_with("decimal") {
            return Some(types::FLOAT.to_string());
        }
        if trimmed.starts_with("timestamp") {
            return Some(types::DATE_TIME.to_string());
        }

        let canonical = match trimmed {
            "smallint" | "int2" | "integer" | "int" | "int4" | "bigint" | "int8" => types::INT,
            "real" | "float4" | "double precision" | "float8" => types::FLOAT,
            "boolean" | "bool" => types::BOOLEAN,
            "text" | "character" | "char" | "uuid" | "citext" => types::STRING,
            "date" => types::DATE_TIME,
            "json" | "jsonb" => types::JSON,
            _ => {
                let name = unqualified_type_name(native_type);
                return self
                    .enums
                    .iter()
                    .find(|e| e.as_str() == name)
                    .map(|e| capitalize_first_letter(e));
            }
        };

        Some(canonical.to_string())
    }
}

impl TypeCapabilities for PostgresTypeMap {
    fn requires_quoting(&self, type_identifier: &str) -> bool {
        CanonicalTypes.requires_quoting(type_identifier)
    }
}

/// Bare type name from `format_type` output: drops a `schema.` prefix and
/// the double quotes around mixed-case identifiers
fn unqualified_type_name(native_type: &str) -> &str {
    let name = native_type.trim();
    if let Some(body) = name.strip_suffix('"') {
        if let Some(start) = body.rfind('"') {
            return &body[start + 1..];
        }
    }
    name.rsplit('.').next().unwrap_or(name)
}

/// Normalise a `pg_get_expr` default expression.
///
/// Sequence and identity defaults become [`DefaultValue::AutoIncrement`];
/// casts such as `'active'::character varying` are stripped down to the
/// literal. An explicit `DEFAULT NULL` is no default at all.
pub fn parse_default(expr: Option<&str>, is_identity: bool) -> Option<DefaultValue> {
    if is_identity {
        return Some(DefaultValue::AutoIncrement);
    }

    let expr = expr?.trim();
    if expr.to_lowercase().starts_with("nextval(") {
        return Some(DefaultValue::AutoIncrement);
    }

    literal_value(expr).map(DefaultValue::Literal)
}

/// Strip a trailing `::type` cast, surrounding single quotes and `''`
/// escapes. Returns `None` for an unquoted `NULL`.
fn literal_value(expr: &str) -> Option<String> {
    if expr.starts_with('\'') {
        // Quoted literal: the cast follows the closing quote
        let quoted = match expr.rfind("'::") {
            Some(end) => &expr[..=end],
            None => expr,
        };
        let inner = quoted
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(quoted);
        return Some(inner.replace("''", "'"));
    }

    let bare = match expr.find("::") {
        Some(end) => &expr[..end],
        None => expr,
    };
    if bare.eq_ignore_ascii_case("null") {
        return None;
    }

    Some(bare.to_string())
}
