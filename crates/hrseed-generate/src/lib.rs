//! Deterministic HR fixture generation.
//!
//! This crate turns a validated seed plan into a `FixtureGraph` of typed rows
//! that respect every foreign key of the HR catalog, then renders the graph as
//! a SQL script, a JSON document of parametrized statements, or CSV files.

pub mod checks;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod fixture;
pub mod foreign;
pub mod model;
pub mod output;
pub mod planner;
pub mod reference;
pub mod rows;
pub mod value;

pub use engine::{GenerationEngine, GenerationResult};
pub use errors::{GenerationError, Result};
pub use fixture::{FixtureGraph, TableRows};
pub use model::{GenerateOptions, GenerationReport, TableReport};
pub use output::{Artifact, Emitter, SqlStatement, emitter_for};
pub use value::GeneratedValue;
