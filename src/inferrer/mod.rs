//! SDL inference
//!
//! Turns introspected tables into SDL. Two entry points:
//!
//! - [`Inferrer::infer`] builds a structured [`SdlDocument`] with one type
//!   skeleton per entity table.
//! - [`TypeRenderer::print_type`] renders the full declaration of one table,
//!   fields and directives included.
//!
//! Shapes that cannot be expressed yet are never dropped: a column without a
//! canonical type becomes a commented field line, and a table without a
//! primary key becomes a fully commented type block. Each rendering step
//! produces a [`Rendering`] and the comment transform is applied once, at the
//! end.

use tracing::{debug, trace};

use crate::schema::{Column, DefaultValue, Table};
use crate::sdl::{GqlType, SdlDocument};
use crate::types::{CanonicalTypes, TypeCapabilities};

pub mod naming;

use naming::capitalize_first_letter;

/// First line of a type block that was commented out for lacking a primary key
pub const MISSING_PRIMARY_KEY_NOTICE: &str = "// Types without primary key not yet supported";

const BLOCK_COMMENT_MARKER: &str = "// ";
const FIELD_COMMENT_MARKER: &str = "# ";

/// Type slot text for an unresolved column that has no native type either
const UNKNOWN_TYPE: &str = "Unknown";

/// Why a piece of output was rendered inert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// The column's native type has no canonical mapping
    UnsupportedType { column: String, native_type: String },
    /// The table has no primary key
    MissingPrimaryKey { table: String },
}

/// Outcome of a rendering step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    Rendered(String),
    /// Fully composed text that must be emitted commented out
    Suppressed { text: String, reason: SuppressReason },
}

impl Rendering {
    fn guard(text: String, reason: Option<SuppressReason>) -> Self {
        match reason {
            None => Rendering::Rendered(text),
            Some(reason) => Rendering::Suppressed { text, reason },
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Rendering::Suppressed { .. })
    }

    /// Format as a single field line
    pub fn into_field_line(self) -> String {
        match self {
            Rendering::Rendered(text) => text,
            Rendering::Suppressed { text, .. } => format!("{}{}", FIELD_COMMENT_MARKER, text),
        }
    }

    /// Format as a type block. Suppressed blocks get the notice line and every
    /// non-empty line commented; blank lines stay blank.
    pub fn into_type_block(self) -> String {
        match self {
            Rendering::Rendered(text) => text,
            Rendering::Suppressed { text, .. } => {
                let mut out = String::with_capacity(text.len() + MISSING_PRIMARY_KEY_NOTICE.len());
                out.push_str(MISSING_PRIMARY_KEY_NOTICE);
                out.push('\n');
                for line in text.lines() {
                    if !line.is_empty() {
                        out.push_str(BLOCK_COMMENT_MARKER);
                        out.push_str(line);
                    }
                    out.push('\n');
                }
                out
            }
        }
    }
}

/// Per-column rendering policy.
///
/// A field line is composed as
/// `<name>: <type><optional><relation><directives><comment>`. Every part is a
/// separate hook so that implementors can override one policy without
/// touching the others.
pub trait FieldRenderer {
    /// Capability lookup for canonical types
    fn capabilities(&self) -> &dyn TypeCapabilities;

    fn print_field_name(&self, column: &Column) -> String {
        column.name.clone()
    }

    /// Canonical type; unresolved columns show their native type instead
    fn print_field_type(&self, column: &Column) -> String {
        match &column.type_identifier {
            Some(type_identifier) => type_identifier.clone(),
            None if !column.native_type.is_empty() => column.native_type.clone(),
            None => UNKNOWN_TYPE.to_string(),
        }
    }

    /// `!` for NOT NULL columns
    fn print_field_optional(&self, column: &Column) -> &'static str {
        if column.nullable {
            ""
        } else {
            "!"
        }
    }

    /// Relation rendering is disabled; foreign keys render as scalars
    fn print_relation_directive(&self, _column: &Column) -> String {
        String::new()
    }

    /// `@unique`, `@pgColumn` for primary keys not named `id`, then `@default`
    fn print_field_directives(&self, column: &Column) -> String {
        let mut directives = String::new();
        if column.is_unique {
            directives.push_str(" @unique");
        }

        if column.is_primary_key && column.name != "id" {
            directives.push_str(&format!(r#" @pgColumn(name: "{}")"#, column.name));
        }

        directives.push_str(&self.print_default_directive(column));
        directives
    }

    fn print_default_directive(&self, column: &Column) -> String {
        let value = match &column.default_value {
            None | Some(DefaultValue::AutoIncrement) => return String::new(),
            Some(DefaultValue::Literal(value)) => value,
        };

        let quoted = column
            .type_identifier
            .as_deref()
            .is_some_and(|ty| self.capabilities().requires_quoting(ty));

        // Raw values are emitted without escaping
        if quoted {
            format!(r#" @default(value: "{}")"#, value)
        } else {
            format!(" @default(value: {})", value)
        }
    }

    fn print_comment(&self, column: &Column) -> String {
        match &column.comment {
            Some(comment) => format!(" # {}", comment),
            None => String::new(),
        }
    }

    /// Compose the field line; unsupported columns come back suppressed
    fn render_field(&self, column: &Column) -> Rendering {
        let text = format!(
            "{}: {}{}{}{}{}",
            self.print_field_name(column),
            self.print_field_type(column),
            self.print_field_optional(column),
            self.print_relation_directive(column),
            self.print_field_directives(column),
            self.print_comment(column),
        );

        let reason = if column.is_supported() {
            None
        } else {
            debug!(
                column = ?column.name,
                native_type = ?column.native_type,
                "No canonical type for column, commenting out field"
            );
            Some(SuppressReason::UnsupportedType {
                column: column.name.clone(),
                native_type: column.native_type.clone(),
            })
        };

        Rendering::guard(text, reason)
    }

    fn print_field(&self, column: &Column) -> String {
        self.render_field(column).into_field_line()
    }
}

/// Type block rendering on top of any [`FieldRenderer`].
///
/// Blanket-implemented, so a renderer that overrides one field policy gets
/// complete type declarations built with that policy.
pub trait TypeRenderer: FieldRenderer {
    /// Render the full type declaration of `table`.
    ///
    /// `_other_tables` is the complete table set, kept for cross-table
    /// relation fields once those are rendered.
    fn print_type(&self, table: &Table, _other_tables: &[Table]) -> String {
        self.render_type(table).into_type_block()
    }

    /// Compose the type block; tables without a primary key come back suppressed
    fn render_type(&self, table: &Table) -> Rendering {
        let mut text = format!(
            "type {} {} {{\n",
            capitalize_first_letter(&table.name),
            pg_table_directive(&table.name)
        );
        for column in &table.columns {
            text.push_str("  ");
            text.push_str(&self.print_field(column));
            text.push('\n');
        }
        text.push_str("}\n");

        let reason = if table.has_primary_key() {
            None
        } else {
            debug!(table = ?table.name, "Table has no primary key, commenting out type");
            Some(SuppressReason::MissingPrimaryKey {
                table: table.name.clone(),
            })
        };

        Rendering::guard(text, reason)
    }
}

impl<R: FieldRenderer + ?Sized> TypeRenderer for R {}

/// SDL inferrer
pub struct Inferrer {
    capabilities: Box<dyn TypeCapabilities + Send + Sync>,
}

impl Inferrer {
    pub fn new() -> Self {
        Self {
            capabilities: Box::new(CanonicalTypes),
        }
    }

    /// Use a different capability table, typically the one supplied by the
    /// introspector that resolved the type identifiers
    pub fn with_capabilities(
        mut self,
        capabilities: impl TypeCapabilities + Send + Sync + 'static,
    ) -> Self {
        self.capabilities = Box::new(capabilities);
        self
    }

    /// Build the summary document: one empty type per entity table.
    ///
    /// Join tables are left out. Fields are not populated here; use
    /// [`TypeRenderer::print_type`] for the full declaration.
    pub fn infer(&self, tables: &[Table]) -> SdlDocument {
        let (join_tables, entity_tables): (Vec<&Table>, Vec<&Table>) =
            tables.iter().partition(|t| t.is_join_table());

        debug!(
            entity_tables = entity_tables.len(),
            join_tables = join_tables.len(),
            "Inferring SDL document"
        );

        let types = entity_tables
            .into_iter()
            .map(|table| {
                trace!(table = ?table.name, "Inferring type");
                GqlType::new(
                    capitalize_first_letter(&table.name),
                    Vec::new(),
                    vec![pg_table_directive(&table.name)],
                )
            })
            .collect();

        SdlDocument::new(types)
    }
}

impl Default for Inferrer {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRenderer for Inferrer {
    fn capabilities(&self) -> &dyn TypeCapabilities {
        self.capabilities.as_ref()
    }
}

fn pg_table_directive(table_name: &str) -> String {
    format!(r#"@pgTable(name: "{}")"#, table_name)
}
