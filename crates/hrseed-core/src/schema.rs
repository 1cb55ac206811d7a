use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{Constraint, ForeignKey};
use crate::types::ColumnType;

/// Top-level catalog describing the database contract.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DatabaseSchema {
    /// Contract version for this catalog format.
    pub catalog_version: String,
    /// Database engine identifier (e.g. `postgres`).
    pub engine: String,
    /// Namespaces holding the tables.
    pub schemas: Vec<Schema>,
}

/// A Postgres namespace containing tables.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub name: String,
    pub tables: Vec<Table>,
}

/// How the fixture run treats a table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// Rows are generated for this table.
    Seeded,
    /// Never generated, but truncated on destructive runs.
    CleanupOnly,
    /// Cleaned with a filtered delete that keeps preserved rows.
    Preserved,
}

/// A table in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    pub role: TableRole,
    pub comment: Option<String>,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

/// Column metadata for a table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
}

impl DatabaseSchema {
    /// Iterate over every table with its qualified `schema.table` key.
    pub fn tables(&self) -> impl Iterator<Item = (String, &Table)> + '_ {
        self.schemas.iter().flat_map(|schema| {
            schema
                .tables
                .iter()
                .map(move |table| (format!("{}.{}", schema.name, table.name), table))
        })
    }

    /// Look up a table by its qualified `schema.table` key.
    pub fn table(&self, key: &str) -> Option<&Table> {
        let (schema_name, table_name) = key.split_once('.')?;
        self.schemas
            .iter()
            .find(|schema| schema.name == schema_name)?
            .tables
            .iter()
            .find(|table| table.name == table_name)
    }
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.constraints.iter().filter_map(|constraint| match constraint {
            Constraint::ForeignKey(fk) => Some(fk),
            _ => None,
        })
    }

    /// Foreign key declared on `column`, if any.
    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys()
            .find(|fk| fk.columns.iter().any(|name| name == column))
    }
}
