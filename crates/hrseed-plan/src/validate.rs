use std::collections::HashSet;
use std::sync::OnceLock;

use hrseed_core::is_valid_identifier;
use jsonschema::JSONSchema;
use regex::Regex;
use serde_json::Value;

use crate::errors::{IssueSeverity, PlanError, ValidationIssue, ValidationReport};
use crate::model::{PositionTemplate, SeedPlan};
use crate::schema::plan_json_schema;
use crate::{DEFAULT_CATALOG_KEY, PLAN_VERSION};

/// Validated plan with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    pub plan: SeedPlan,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a plan JSON document against the seed plan JSON Schema.
pub fn validate_plan_json(plan_json: &Value) -> Result<ValidationReport, PlanError> {
    let plan_schema = serde_json::to_value(plan_json_schema())?;
    let compiled =
        JSONSchema::compile(&plan_schema).map_err(|err| PlanError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(plan_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Validate the plan end-to-end, returning structured issues on failure.
pub fn validate_plan_value(plan_json: &Value) -> Result<ValidatedPlan, ValidationReport> {
    let structural = match validate_plan_json(plan_json) {
        Ok(report) => report,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.error("schema_validation_error", "/", err.to_string(), None);
            return Err(report);
        }
    };

    if !structural.is_ok() {
        return Err(structural);
    }

    let plan: SeedPlan = match serde_json::from_value(plan_json.clone()) {
        Ok(plan) => plan,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.error("invalid_plan_json", "/", err.to_string(), None);
            return Err(report);
        }
    };

    let report = validate_plan(&plan);
    if !report.is_ok() {
        return Err(report);
    }

    Ok(ValidatedPlan {
        plan,
        warnings: report.warnings,
    })
}

/// Check the semantic rules a structurally valid plan must satisfy.
pub fn validate_plan(plan: &SeedPlan) -> ValidationReport {
    let mut report = ValidationReport::default();

    if plan.plan_version != PLAN_VERSION {
        report.error(
            "plan_version_mismatch",
            "/plan_version",
            format!(
                "plan_version '{}' is not supported (expected '{PLAN_VERSION}')",
                plan.plan_version
            ),
            None,
        );
    }

    validate_tenant(plan, &mut report);
    validate_departments(plan, &mut report);
    validate_position_catalogs(plan, &mut report);
    validate_people(plan, &mut report);
    validate_schedule(plan, &mut report);
    validate_subsets(plan, &mut report);

    if let Some(user_id) = &plan.output.preserve_user_id {
        if !uuid_regex().is_match(user_id) {
            report.error(
                "preserve_user_id_invalid",
                "/output/preserve_user_id",
                format!("'{user_id}' is not a UUID"),
                None,
            );
        }
    }

    report
}

fn validate_tenant(plan: &SeedPlan, report: &mut ValidationReport) {
    if !uuid_regex().is_match(&plan.tenant.id) {
        report.error(
            "tenant_id_invalid",
            "/tenant/id",
            format!("'{}' is not a UUID", plan.tenant.id),
            Some("use the tenant UUID from the shared.tenants table"),
        );
    }

    if !domain_regex().is_match(&plan.tenant.email_domain) {
        report.error(
            "email_domain_invalid",
            "/tenant/email_domain",
            format!("'{}' is not a valid e-mail domain", plan.tenant.email_domain),
            None,
        );
    }

    for (idx, schema) in plan.tenant.search_path.iter().enumerate() {
        if !is_valid_identifier(schema) {
            report.error(
                "search_path_invalid",
                format!("/tenant/search_path/{idx}"),
                format!("'{schema}' is not a plain schema identifier"),
                None,
            );
        }
    }
}

fn validate_departments(plan: &SeedPlan, report: &mut ValidationReport) {
    if plan.departments.is_empty() {
        if plan.employees.staff > 0 {
            report.error(
                "departments_empty",
                "/departments",
                "staff employees requested but no departments are defined",
                Some("add at least one department or set employees.staff = 0"),
            );
        } else {
            report.warning(
                "departments_empty",
                "/departments",
                "no departments defined; the run only cleans tables",
                None,
            );
        }
    }

    let mut seen = HashSet::new();
    for (idx, department) in plan.departments.iter().enumerate() {
        let base_path = format!("/departments/{idx}");
        if !department_code_regex().is_match(&department.code) {
            report.error(
                "department_code_invalid",
                format!("{base_path}/code"),
                format!("'{}' is not an uppercase dashed code", department.code),
                Some("codes look like COM-VID or RH-INT"),
            );
        }
        if department.code == DEFAULT_CATALOG_KEY {
            report.error(
                "department_code_reserved",
                format!("{base_path}/code"),
                format!("'{DEFAULT_CATALOG_KEY}' is reserved for the fallback catalog"),
                None,
            );
        }
        if !seen.insert(department.code.as_str()) {
            report.error(
                "department_code_duplicate",
                format!("{base_path}/code"),
                format!("department code '{}' appears more than once", department.code),
                None,
            );
        }
        if department.name.trim().is_empty() {
            report.error(
                "department_name_empty",
                format!("{base_path}/name"),
                "department name must not be empty",
                None,
            );
        }

        match plan.positions_for(&department.code) {
            Some(positions) if !positions.is_empty() => {}
            _ => report.error(
                "positions_empty",
                base_path,
                format!("department '{}' resolves to zero positions", department.code),
                Some("add a catalog for the department or a DEFAULT catalog"),
            ),
        }
    }
}

fn validate_position_catalogs(plan: &SeedPlan, report: &mut ValidationReport) {
    let codes: HashSet<&str> = plan
        .departments
        .iter()
        .map(|department| department.code.as_str())
        .collect();

    for (key, positions) in &plan.position_catalogs {
        let base_path = format!("/position_catalogs/{key}");
        if key != DEFAULT_CATALOG_KEY && !codes.contains(key.as_str()) {
            report.warning(
                "position_catalog_unused",
                base_path.clone(),
                format!("catalog '{key}' matches no department"),
                None,
            );
        }

        for (idx, position) in positions.iter().enumerate() {
            validate_position(position, &format!("{base_path}/{idx}"), report);
        }

        if positions.iter().filter(|position| position.manager).count() > 1 {
            report.warning(
                "manager_position_ambiguous",
                base_path.clone(),
                format!("catalog '{key}' flags more than one manager position; the first is used"),
                None,
            );
        }
        if !positions.is_empty() && !positions.iter().any(|position| position.manager) {
            report.warning(
                "manager_position_implicit",
                base_path,
                format!("catalog '{key}' flags no manager position; the highest salary_max is used"),
                Some("set manager = true on the position held by the department manager"),
            );
        }
    }
}

fn validate_position(position: &PositionTemplate, path: &str, report: &mut ValidationReport) {
    if position.title.trim().is_empty() {
        report.error(
            "position_title_empty",
            format!("{path}/title"),
            "position title must not be empty",
            None,
        );
    }
    if position.salary_min < 0 {
        report.error(
            "salary_negative",
            format!("{path}/salary_min"),
            format!("salary_min {} is negative", position.salary_min),
            None,
        );
    }
    if position.salary_min > position.salary_max {
        report.error(
            "salary_range_inverted",
            path,
            format!(
                "salary_min {} exceeds salary_max {}",
                position.salary_min, position.salary_max
            ),
            None,
        );
    }
}

fn validate_people(plan: &SeedPlan, report: &mut ValidationReport) {
    for (pool, names) in [("first", &plan.names.first), ("last", &plan.names.last)] {
        if names.is_empty() {
            report.error(
                "names_empty",
                format!("/names/{pool}"),
                format!("{pool} name pool is empty"),
                None,
            );
        }
        for (idx, name) in names.iter().enumerate() {
            if !name.chars().any(char::is_alphanumeric) {
                report.error(
                    "name_blank",
                    format!("/names/{pool}/{idx}"),
                    format!("{pool} name {name:?} has no letters"),
                    Some("remove the entry or give it a real name"),
                );
            } else if name.trim() != name {
                report.error(
                    "name_untrimmed",
                    format!("/names/{pool}/{idx}"),
                    format!("{pool} name {name:?} has surrounding whitespace"),
                    None,
                );
            }
        }
    }

    for (field, range) in [
        ("manager_hire_days", plan.employees.manager_hire_days),
        ("staff_hire_days", plan.employees.staff_hire_days),
    ] {
        if range.min > range.max {
            report.error(
                "day_range_inverted",
                format!("/employees/{field}"),
                format!("min {} exceeds max {}", range.min, range.max),
                None,
            );
        }
    }

    let ratio = plan.dependents.child_ratio;
    if !(0.0..=1.0).contains(&ratio) {
        report.error(
            "child_ratio_invalid",
            "/dependents/child_ratio",
            format!("child_ratio {ratio} is outside [0, 1]"),
            None,
        );
    }
    if plan.dependents.count > 0 && plan.total_employees() == 0 {
        report.error(
            "dependents_without_employees",
            "/dependents/count",
            "dependents requested but no employees will be generated",
            None,
        );
    }
}

fn validate_schedule(plan: &SeedPlan, report: &mut ValidationReport) {
    let Some(schedule) = &plan.schedule else {
        if plan.time_records.is_some() {
            report.error(
                "time_records_without_schedule",
                "/time_records",
                "time records require a schedule section",
                Some("add a [schedule] section covering the record dates"),
            );
        }
        return;
    };

    if schedule.days.is_empty() {
        report.error("schedule_days_empty", "/schedule/days", "schedule has no days", None);
    }
    let mut seen = HashSet::new();
    for (idx, day) in schedule.days.iter().enumerate() {
        if !seen.insert(*day) {
            report.error(
                "schedule_day_duplicate",
                format!("/schedule/days/{idx}"),
                format!("{} appears more than once", day.as_str()),
                None,
            );
        }
    }
    if schedule.entry_time >= schedule.exit_time {
        report.error(
            "schedule_times_inverted",
            "/schedule",
            format!(
                "entry_time {} is not before exit_time {}",
                schedule.entry_time, schedule.exit_time
            ),
            None,
        );
    } else if i64::from(schedule.break_minutes) >= schedule.shift_minutes() {
        report.error(
            "schedule_break_too_long",
            "/schedule/break_minutes",
            "break is as long as the whole shift",
            None,
        );
    }

    if let Some(records) = &plan.time_records {
        if records.start > records.end {
            report.error(
                "date_range_inverted",
                "/time_records",
                format!("start {} is after end {}", records.start, records.end),
                None,
            );
        }
        if records.start < schedule.valid_from {
            report.warning(
                "records_before_schedule",
                "/time_records/start",
                format!(
                    "dates before the schedule's valid_from {} produce no records",
                    schedule.valid_from
                ),
                None,
            );
        }
    }
}

fn validate_subsets(plan: &SeedPlan, report: &mut ValidationReport) {
    let total = plan.total_employees();
    let subsets = [
        ("/time_records/employees", plan.time_records.as_ref().map(|s| s.employees)),
        ("/vacations/employees", plan.vacations.as_ref().map(|s| s.employees)),
        ("/training/employees", plan.training.as_ref().map(|s| s.employees)),
    ];
    for (path, requested) in subsets {
        if let Some(requested) = requested {
            if requested as u64 > total {
                report.warning(
                    "subset_clamped",
                    path,
                    format!("{requested} requested but only {total} employees exist"),
                    None,
                );
            }
        }
    }

    if let Some(vacations) = &plan.vacations {
        if vacations.total_days == 0 {
            report.error(
                "vacation_days_zero",
                "/vacations/total_days",
                "total_days must be greater than zero",
                None,
            );
        }
    }

    if let Some(training) = &plan.training {
        if training.category.trim().is_empty() || training.course_title.trim().is_empty() {
            report.error(
                "training_names_empty",
                "/training",
                "category and course_title must not be empty",
                None,
            );
        }
    }
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}

fn uuid_regex() -> &'static Regex {
    static UUID: OnceLock<Regex> = OnceLock::new();
    UUID.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("uuid regex")
    })
}

fn domain_regex() -> &'static Regex {
    static DOMAIN: OnceLock<Regex> = OnceLock::new();
    DOMAIN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$")
            .expect("domain regex")
    })
}

fn department_code_regex() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"^[A-Z0-9]+(-[A-Z0-9]+)*$").expect("department code regex"))
}
