//! Schema data structures
//!
//! These types describe a relational schema as handed over by introspection
//! and form the contract between the introspector (produces) and the
//! inferrer (consumes). They are read-only snapshots: nothing in the
//! inferrer mutates them.

/// Raw default text used by introspection tooling to mark sequence-backed
/// columns.
pub const AUTO_INCREMENT_SENTINEL: &str = "[AUTO INCREMENT]";

/// A complete introspected database schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

/// Database table
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    /// Columns in ordinal order
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// True when any column takes part in the primary key
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|col| col.is_primary_key)
    }

    /// True for a pure many-to-many linking table: exactly two columns,
    /// each of them a foreign key.
    pub fn is_join_table(&self) -> bool {
        self.columns.len() == 2 && self.columns.iter().all(|col| col.relation.is_some())
    }

    /// Foreign-key relations declared on this table, in column order
    pub fn relations(&self) -> impl Iterator<Item = (&Column, &ColumnRelation)> {
        self.columns
            .iter()
            .filter_map(|col| col.relation.as_ref().map(|rel| (col, rel)))
    }

    /// Get primary key columns in ordinal order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|col| col.is_primary_key).collect()
    }
}

/// A table column
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    /// Canonical type identifier (`Int`, `String`, ...); `None` when no
    /// mapping exists for the native database type
    pub type_identifier: Option<String>,
    /// Native database type as reported by the database (`integer`, `tsvector`, ...)
    pub native_type: String,
    pub nullable: bool,
    pub is_unique: bool,
    pub is_primary_key: bool,
    pub default_value: Option<DefaultValue>,
    pub comment: Option<String>,
    /// Foreign key target, if any
    pub relation: Option<ColumnRelation>,
}

impl Column {
    /// A nullable, non-unique, non-key column without default or comment
    pub fn new(name: impl Into<String>, type_identifier: Option<&str>) -> Self {
        Self {
            name: name.into(),
            type_identifier: type_identifier.map(str::to_string),
            native_type: String::new(),
            nullable: true,
            is_unique: false,
            is_primary_key: false,
            default_value: None,
            comment: None,
            relation: None,
        }
    }

    pub fn with_native_type(mut self, native_type: impl Into<String>) -> Self {
        self.native_type = native_type.into();
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    pub fn with_primary_key(mut self, is_primary_key: bool) -> Self {
        self.is_primary_key = is_primary_key;
        self
    }

    pub fn with_default(mut self, default_value: DefaultValue) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_relation(mut self, relation: ColumnRelation) -> Self {
        self.relation = Some(relation);
        self
    }

    /// Whether a canonical type was found for the native type
    pub fn is_supported(&self) -> bool {
        self.type_identifier.is_some()
    }
}

/// Server-side default of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Sequence or identity generated value
    AutoIncrement,
    /// Literal default, already stripped of casts and quoting
    Literal(String),
}

impl DefaultValue {
    /// Interpret raw default text, recognising the auto-increment sentinel
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw == AUTO_INCREMENT_SENTINEL {
            DefaultValue::AutoIncrement
        } else {
            DefaultValue::Literal(raw)
        }
    }
}

/// Target of a foreign key column. Tables are referenced by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRelation {
    pub table: String,
    pub column: String,
}

impl ColumnRelation {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_column() -> Column {
        Column::new("id", Some("Int"))
            .with_nullable(false)
            .with_primary_key(true)
    }

    #[test]
    fn test_has_primary_key_true() {
        let table = Table::new("users", vec![id_column()]);
        assert!(table.has_primary_key());
    }

    #[test]
    fn test_has_primary_key_false() {
        let table = Table::new("logs", vec![Column::new("message", Some("String"))]);
        assert!(!table.has_primary_key());
    }

    #[test]
    fn test_is_join_table() {
        let table = Table::new(
            "users_groups",
            vec![
                Column::new("user_id", Some("Int")).with_relation(ColumnRelation::new("users", "id")),
                Column::new("group_id", Some("Int"))
                    .with_relation(ColumnRelation::new("groups", "id")),
            ],
        );
        assert!(table.is_join_table());
        assert_eq!(table.relations().count(), 2);
    }

    #[test]
    fn test_is_join_table_with_extra_column() {
        let table = Table::new(
            "memberships",
            vec![
                id_column(),
                Column::new("user_id", Some("Int")).with_relation(ColumnRelation::new("users", "id")),
                Column::new("group_id", Some("Int"))
                    .with_relation(ColumnRelation::new("groups", "id")),
            ],
        );
        assert!(!table.is_join_table());
    }

    #[test]
    fn test_is_join_table_one_foreign_key() {
        let table = Table::new(
            "posts",
            vec![
                id_column(),
                Column::new("author_id", Some("Int"))
                    .with_relation(ColumnRelation::new("users", "id")),
            ],
        );
        assert!(!table.is_join_table());
    }

    #[test]
    fn test_primary_key_columns() {
        let table = Table::new(
            "users",
            vec![id_column(), Column::new("email", Some("String"))],
        );
        let pk: Vec<&str> = table
            .primary_key_columns()
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(pk, vec!["id"]);
    }

    #[test]
    fn test_default_value_from_raw() {
        assert_eq!(DefaultValue::from_raw("[AUTO INCREMENT]"), DefaultValue::AutoIncrement);
        assert_eq!(
            DefaultValue::from_raw("active"),
            DefaultValue::Literal("active".to_string())
        );
    }

    #[test]
    fn test_column_defaults() {
        let col = Column::new("tags", None);
        assert!(col.nullable);
        assert!(!col.is_supported());
        assert!(col.default_value.is_none());
    }
}
