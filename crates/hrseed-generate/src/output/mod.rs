//! Emitters: turn a finished fixture into an artifact.

pub mod csv;
pub mod json;
pub mod sql;

use serde::Serialize;
use uuid::Uuid;

use hrseed_core::{DatabaseSchema, is_valid_identifier};
use hrseed_plan::{OutputFormat, WriteMode};

use crate::errors::{GenerationError, Result};
use crate::fixture::FixtureGraph;
use crate::planner::TableOrder;
use crate::value::GeneratedValue;

pub use self::csv::CsvEmitter;
pub use self::json::JsonEmitter;
pub use self::sql::{SqlEmitter, SqlScriptWriter};

/// One parametrized statement. Values never appear in `sql`; they are bound
/// to the `$n` placeholders from `params`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<GeneratedValue>,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Vec<GeneratedValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Everything an emitter needs besides the graph.
#[derive(Debug, Clone)]
pub struct EmitContext<'a> {
    pub catalog: &'a DatabaseSchema,
    pub order: &'a TableOrder,
    pub search_path: &'a [String],
    pub mode: WriteMode,
    pub preserve_user_id: Option<Uuid>,
}

/// Rendered output of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// One document (SQL script or JSON).
    Single(Vec<u8>),
    /// Named files, in write order (CSV).
    Files(Vec<(String, Vec<u8>)>),
}

impl Artifact {
    pub fn len(&self) -> u64 {
        match self {
            Artifact::Single(bytes) => bytes.len() as u64,
            Artifact::Files(files) => files.iter().map(|(_, bytes)| bytes.len() as u64).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serializes a fixture graph.
pub trait Emitter {
    fn format(&self) -> OutputFormat;

    /// Render the artifact and report how many statements it carries.
    fn emit(&self, ctx: &EmitContext<'_>, graph: &FixtureGraph) -> Result<(Artifact, u64)>;
}

pub fn emitter_for(format: OutputFormat) -> Box<dyn Emitter> {
    match format {
        OutputFormat::Sql => Box::new(SqlEmitter),
        OutputFormat::Json => Box::new(JsonEmitter),
        OutputFormat::Csv => Box::new(CsvEmitter),
    }
}

/// Build the statement list: preamble, cleanup (replace mode), inserts.
pub fn build_statements(ctx: &EmitContext<'_>, graph: &FixtureGraph) -> Result<Vec<SqlStatement>> {
    let mut statements = Vec::new();

    if !ctx.search_path.is_empty() {
        for schema in ctx.search_path {
            ensure_identifier(schema)?;
        }
        statements.push(SqlStatement::new(format!(
            "SET search_path TO {}",
            ctx.search_path.join(", ")
        )));
    }

    if ctx.mode == WriteMode::Replace {
        if let Some(user_id) = ctx.preserve_user_id {
            for key in &ctx.order.preserved {
                statements.push(SqlStatement::with_params(
                    format!("DELETE FROM {} WHERE id <> $1", qualified(ctx.catalog, key)?),
                    vec![GeneratedValue::Uuid(user_id)],
                ));
            }
        }
        for key in &ctx.order.truncate {
            statements.push(SqlStatement::new(format!(
                "TRUNCATE TABLE {} CASCADE",
                qualified(ctx.catalog, key)?
            )));
        }
    }

    let mut tables = graph.table_rows();
    for key in &ctx.order.insert {
        let Some(table) = tables.remove(key.as_str()) else {
            continue;
        };
        if table.rows.is_empty() {
            continue;
        }
        let target = qualified(ctx.catalog, key)?;
        let catalog_table = ctx
            .catalog
            .table(key)
            .ok_or_else(|| GenerationError::Catalog(hrseed_core::Error::UnknownTable(key.clone())))?;
        for column in table.columns {
            ensure_identifier(column)?;
            if catalog_table.column(column).is_none() {
                return Err(GenerationError::Configuration(format!(
                    "column '{column}' is not part of {key}"
                )));
            }
        }

        let placeholders = (1..=table.columns.len())
            .map(|idx| format!("${idx}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {target} ({}) VALUES ({placeholders})",
            table.columns.join(", ")
        );
        for row in table.rows {
            statements.push(SqlStatement::with_params(sql.clone(), row));
        }
    }

    if let Some(unplanned) = tables
        .into_iter()
        .find(|(_, table)| !table.rows.is_empty())
        .map(|(key, _)| key)
    {
        return Err(GenerationError::Configuration(format!(
            "table {unplanned} has rows but no insert slot"
        )));
    }

    Ok(statements)
}

/// Validated `schema.table` reference for a catalog key.
fn qualified(catalog: &DatabaseSchema, key: &str) -> Result<String> {
    if catalog.table(key).is_none() {
        return Err(GenerationError::Catalog(hrseed_core::Error::UnknownTable(
            key.to_string(),
        )));
    }
    let (schema, table) = key
        .split_once('.')
        .ok_or_else(|| GenerationError::Configuration(format!("invalid table key '{key}'")))?;
    ensure_identifier(schema)?;
    ensure_identifier(table)?;
    Ok(format!("{schema}.{table}"))
}

fn ensure_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(GenerationError::Configuration(format!(
            "'{name}' is not a valid identifier"
        )))
    }
}
