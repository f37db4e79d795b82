use std::collections::{HashMap, HashSet};

use postgres::{Client, NoTls};
use tracing::{debug, error, info, trace};

use super::type_map::{parse_default, PostgresTypeMap};
use super::{Introspector, TableFilter};
use crate::config::DbConfig;
use crate::prelude::SdliftError;
use crate::schema::{Column, ColumnRelation, Schema, Table};

/// PostgreSQL introspector
pub struct PostgresIntrospector<'a> {
    client: &'a mut Client,
    type_map: PostgresTypeMap,
}

impl<'a> PostgresIntrospector<'a> {
    pub fn new(client: &'a mut Client) -> Self {
        Self {
            client,
            type_map: PostgresTypeMap::new(),
        }
    }

    /// Open a client for `config`
    pub fn connect(config: &DbConfig) -> Result<Client, SdliftError> {
        info!(connection = ?config.redacted_connection_string(), "Connecting to PostgreSQL");

        Client::connect(&config.postgres_connection_string(), NoTls).map_err(|e| {
            error!(error = ?e, "Failed to connect to PostgreSQL");
            SdliftError::Connection(format!("{}: {}", config.redacted_connection_string(), e))
        })
    }

    /// Type map used for the last introspection, enums included
    pub fn type_map(&self) -> &PostgresTypeMap {
        &self.type_map
    }
}

impl Introspector for PostgresIntrospector<'_> {
    fn introspect(
        &mut self,
        schema_name: &str,
        filter: &TableFilter,
    ) -> Result<Schema, SdliftError> {
        info!(schema = ?schema_name, "Starting schema introspection");

        let enums = query_enum_names(self.client, schema_name)?;
        debug!(count = ?enums.len(), "Found enum types");
        self.type_map = PostgresTypeMap::new().with_enums(enums);

        let all_table_names = query_tables(self.client, schema_name)?;
        debug!(count = ?all_table_names.len(), "Found all tables");

        let table_names: Vec<String> = all_table_names
            .into_iter()
            .filter(|name| filter.should_include(name))
            .collect();
        debug!(count = ?table_names.len(), "Tables after filtering");

        let mut tables = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            debug!(table = ?table_name, "Introspecting table");

            let primary_key = query_constrained_columns(self.client, schema_name, &table_name, 'p')?;
            let unique = query_constrained_columns(self.client, schema_name, &table_name, 'u')?;
            let relations = query_foreign_keys(self.client, schema_name, &table_name)?;
            trace!(
                table = ?table_name,
                primary_key = ?primary_key,
                unique = ?unique,
                foreign_keys = ?relations.len(),
                "Found constraints"
            );

            let mut columns = query_columns(self.client, schema_name, &table_name, &self.type_map)?;
            for column in &mut columns {
                column.is_primary_key = primary_key.contains(&column.name);
                column.is_unique = unique.contains(&column.name);
                column.relation = relations.get(&column.name).cloned();
            }
            trace!(table = ?table_name, columns = ?columns.len(), "Found columns");

            tables.push(Table::new(table_name, columns));
        }

        info!(
            schema = ?schema_name,
            tables = ?tables.len(),
            "Schema introspection complete"
        );

        Ok(Schema {
            name: schema_name.to_string(),
            tables,
        })
    }
}

fn introspection_error(schema_name: &str, message: String) -> SdliftError {
    SdliftError::Introspection {
        schema: schema_name.to_string(),
        message,
    }
}

/// Query all table names in a schema
fn query_tables(client: &mut Client, schema_name: &str) -> Result<Vec<String>, SdliftError> {
    trace!(schema = ?schema_name, "Querying tables");

    let sql = r#"
        SELECT c.relname AS table_name
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind = 'r'
            AND n.nspname = $1
        ORDER BY c.relname
    "#;

    let rows = client
        .query(sql, &[&schema_name])
        .map_err(|e| introspection_error(schema_name, format!("Failed to query tables: {}", e)))?;

    let tables = rows.iter().map(|row| row.get("table_name")).collect();
    trace!(tables = ?tables, "Tables found");
    Ok(tables)
}

/// Query all columns for a table, resolving their canonical types
fn query_columns(
    client: &mut Client,
    schema_name: &str,
    table_name: &str,
    type_map: &PostgresTypeMap,
) -> Result<Vec<Column>, SdliftError> {
    trace!(schema = ?schema_name, table = ?table_name, "Querying columns");

    let sql = r#"
        SELECT
            a.attname AS column_name,
            format_type(a.atttypid, a.atttypmod) AS data_type,
            NOT a.attnotnull AS is_nullable,
            pg_get_expr(d.adbin, d.adrelid) AS default_value,
            a.attidentity <> '' AS is_identity,
            col_description(c.oid, a.attnum) AS comment
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        LEFT JOIN pg_attrdef d ON d.adrelid = c.oid AND d.adnum = a.attnum
        WHERE c.relname = $1
            AND n.nspname = $2
            AND a.attnum > 0
            AND NOT a.attisdropped
        ORDER BY a.attnum
    "#;

    let rows = client
        .query(sql, &[&table_name, &schema_name])
        .map_err(|e| {
            error!(
                schema = ?schema_name,
                table = ?table_name,
                error = ?e,
                "Failed to query columns"
            );
            introspection_error(
                schema_name,
                format!("Failed to query columns for table '{}': {}", table_name, e),
            )
        })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let column_name: String = row.get("column_name");
        let native_type: String = row.get("data_type");
        let nullable: bool = row.get("is_nullable");
        let default_expr: Option<String> = row.get("default_value");
        let is_identity: bool = row.get("is_identity");
        let comment: Option<String> = row.get("comment");

        let type_identifier = type_map.resolve(&native_type);
        let default_value = parse_default(default_expr.as_deref(), is_identity);

        trace!(
            column = ?column_name,
            native_type = ?native_type,
            type_identifier = ?type_identifier,
            nullable = ?nullable,
            default_value = ?default_value,
            "Parsed column"
        );

        columns.push(Column {
            name: column_name,
            type_identifier,
            native_type,
            nullable,
            is_unique: false,
            is_primary_key: false,
            default_value,
            comment,
            relation: None,
        });
    }

    Ok(columns)
}

/// Query the columns covered by primary key (`'p'`) or single-column unique
/// (`'u'`) constraints
fn query_constrained_columns(
    client: &mut Client,
    schema_name: &str,
    table_name: &str,
    contype: char,
) -> Result<HashSet<String>, SdliftError> {
    trace!(schema = ?schema_name, table = ?table_name, contype = ?contype, "Querying constraint columns");

    // Composite unique constraints do not make any single column unique
    let sql = r#"
        SELECT a.attname AS column_name
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(con.conkey)
        WHERE con.contype = $3::text::"char"
            AND c.relname = $1
            AND n.nspname = $2
            AND (con.contype = 'p' OR array_length(con.conkey, 1) = 1)
    "#;

    let contype = contype.to_string();
    let rows = client
        .query(sql, &[&table_name, &schema_name, &contype])
        .map_err(|e| {
            error!(
                schema = ?schema_name,
                table = ?table_name,
                error = ?e,
                "Failed to query constraints"
            );
            introspection_error(
                schema_name,
                format!(
                    "Failed to query constraints for table '{}': {}",
                    table_name, e
                ),
            )
        })?;

    Ok(rows.iter().map(|row| row.get("column_name")).collect())
}

/// Query single-column foreign keys, keyed by local column name
fn query_foreign_keys(
    client: &mut Client,
    schema_name: &str,
    table_name: &str,
) -> Result<HashMap<String, ColumnRelation>, SdliftError> {
    trace!(schema = ?schema_name, table = ?table_name, "Querying foreign keys");

    let sql = r#"
        SELECT
            a.attname AS column_name,
            fc.relname AS target_table,
            fa.attname AS target_column
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = con.conkey[1]
        JOIN pg_class fc ON fc.oid = con.confrelid
        JOIN pg_attribute fa ON fa.attrelid = fc.oid AND fa.attnum = con.confkey[1]
        WHERE con.contype = 'f'
            AND array_length(con.conkey, 1) = 1
            AND c.relname = $1
            AND n.nspname = $2
    "#;

    let rows = client
        .query(sql, &[&table_name, &schema_name])
        .map_err(|e| {
            error!(
                schema = ?schema_name,
                table = ?table_name,
                error = ?e,
                "Failed to query foreign keys"
            );
            introspection_error(
                schema_name,
                format!(
                    "Failed to query foreign keys for table '{}': {}",
                    table_name, e
                ),
            )
        })?;

    let relations = rows
        .iter()
        .map(|row| {
            let column: String = row.get("column_name");
            let relation = ColumnRelation::new(
                row.get::<_, String>("target_table"),
                row.get::<_, String>("target_column"),
            );
            (column, relation)
        })
        .collect();

    Ok(relations)
}

/// Query the names of all enum types in a schema
fn query_enum_names(client: &mut Client, schema_name: &str) -> Result<Vec<String>, SdliftError> {
    trace!(schema = ?schema_name, "Querying enum types");

    let sql = r#"
        SELECT t.typname AS enum_name
        FROM pg_type t
        JOIN pg_namespace n ON n.oid = t.typnamespace
        WHERE t.typtype = 'e'
            AND n.nspname = $1
        ORDER BY t.typname
    "#;

    let rows = client.query(sql, &[&schema_name]).map_err(|e| {
        error!(schema = ?schema_name, error = ?e, "Failed to query enum types");
        introspection_error(schema_name, format!("Failed to query enums: {}", e))
    })?;

    Ok(rows.iter().map(|row| row.get("enum_name")).collect())
}
