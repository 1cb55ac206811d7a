//! Seed plan contracts, loading and validation for hrseed.
//!
//! A seed plan is the static configuration of a fixture run: the department
//! and position catalogs, name pools, volumes and the optional schedule,
//! vacation and training sections.

pub mod errors;
pub mod loader;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
pub use loader::{DEFAULT_PLAN_TOML, PlanFormat, default_plan, load_plan, load_plan_str};
pub use model::{
    DayOfWeek, DayRange, DepartmentDef, DependentSettings, EmployeeSettings, NamePools,
    OutputFormat, OutputSettings, PositionTemplate, ScheduleSettings, SeedPlan, TenantSettings,
    TimeRecordSettings, TrainingSettings, VacationSettings, WriteMode, designated_manager,
};
pub use schema::plan_json_schema;
pub use validate::{ValidatedPlan, validate_plan, validate_plan_json, validate_plan_value};

/// Current contract version for seed plans.
pub const PLAN_VERSION: &str = "0.1";

/// Position catalog key used when a department has no entry of its own.
pub const DEFAULT_CATALOG_KEY: &str = "DEFAULT";
