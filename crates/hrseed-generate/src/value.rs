use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Typed value bound to a statement parameter or a CSV cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl GeneratedValue {
    pub fn text(value: impl Into<String>) -> Self {
        GeneratedValue::Text(value.into())
    }

    /// Plain rendering used for CSV cells; NULL becomes an empty cell.
    pub fn to_csv(&self) -> String {
        match self {
            GeneratedValue::Null => String::new(),
            GeneratedValue::Bool(value) => value.to_string(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Text(value) => value.clone(),
            GeneratedValue::Uuid(value) => value.to_string(),
            GeneratedValue::Date(value) => value.format(DATE_FORMAT).to_string(),
            GeneratedValue::Time(value) => value.format(TIME_FORMAT).to_string(),
            GeneratedValue::Timestamp(value) => value.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Postgres literal for this value. Quotes inside text are doubled.
    pub fn sql_literal(&self) -> String {
        match self {
            GeneratedValue::Null => "NULL".to_string(),
            GeneratedValue::Bool(value) => value.to_string(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Text(value) => quote(value),
            other => quote(&other.to_csv()),
        }
    }
}

impl From<Uuid> for GeneratedValue {
    fn from(value: Uuid) -> Self {
        GeneratedValue::Uuid(value)
    }
}

impl From<Option<Uuid>> for GeneratedValue {
    fn from(value: Option<Uuid>) -> Self {
        value.map_or(GeneratedValue::Null, GeneratedValue::Uuid)
    }
}

impl From<bool> for GeneratedValue {
    fn from(value: bool) -> Self {
        GeneratedValue::Bool(value)
    }
}

impl From<i64> for GeneratedValue {
    fn from(value: i64) -> Self {
        GeneratedValue::Int(value)
    }
}

impl From<&str> for GeneratedValue {
    fn from(value: &str) -> Self {
        GeneratedValue::Text(value.to_string())
    }
}

impl From<String> for GeneratedValue {
    fn from(value: String) -> Self {
        GeneratedValue::Text(value)
    }
}

impl From<NaiveDate> for GeneratedValue {
    fn from(value: NaiveDate) -> Self {
        GeneratedValue::Date(value)
    }
}

impl From<NaiveTime> for GeneratedValue {
    fn from(value: NaiveTime) -> Self {
        GeneratedValue::Time(value)
    }
}

impl From<NaiveDateTime> for GeneratedValue {
    fn from(value: NaiveDateTime) -> Self {
        GeneratedValue::Timestamp(value)
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
