use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Postgres column type families used by the HR contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Uuid,
    Text,
    Integer,
    Numeric,
    Boolean,
    Date,
    Time,
    Timestamp,
}

impl ColumnType {
    /// Postgres type name used in `PREPARE` signatures and casts.
    pub fn pg_name(&self) -> &'static str {
        match self {
            ColumnType::Uuid => "uuid",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Numeric => "numeric",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Timestamp => "timestamp",
        }
    }
}
