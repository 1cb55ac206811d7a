//! Schema catalog contracts for hrseed.
//!
//! This crate describes the fixed HR database contract that fixtures are
//! generated against: tables, columns, keys, and the foreign-key graph used
//! to order inserts and cleanup.

pub mod constraints;
pub mod error;
pub mod graph;
pub mod hr;
pub mod schema;
pub mod types;
pub mod validation;

pub use constraints::{Constraint, FkAction, ForeignKey, PrimaryKey, UniqueConstraint};
pub use error::{Error, Result};
pub use graph::{FkGraphReport, FkGraphSummary, build_fk_graph_report};
pub use hr::hr_schema;
pub use schema::{Column, DatabaseSchema, Schema, Table, TableRole};
pub use types::ColumnType;
pub use validation::{is_valid_identifier, validate_schema};

/// Current contract version for the built-in HR catalog.
pub const CATALOG_VERSION: &str = "0.1";
