use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::DEFAULT_CATALOG_KEY;

/// Canonical seed plan for a fixture run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SeedPlan {
    /// Contract version for the plan format.
    pub plan_version: String,
    /// Seed for reproducibility; the CLI may override it.
    pub seed: u64,
    /// Tenant every generated row belongs to.
    pub tenant: TenantSettings,
    /// Anchor for relative dates such as hire dates. Never the wall clock.
    pub reference_date: NaiveDate,
    /// Department definitions, in generation order.
    pub departments: Vec<DepartmentDef>,
    /// Position catalogs keyed by department code, plus a `DEFAULT` entry.
    pub position_catalogs: BTreeMap<String, Vec<PositionTemplate>>,
    /// Name pools for people.
    pub names: NamePools,
    pub employees: EmployeeSettings,
    #[serde(default)]
    pub dependents: DependentSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_records: Option<TimeRecordSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacations: Option<VacationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<TrainingSettings>,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Tenant identity and addressing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TenantSettings {
    /// Tenant UUID carried by every row.
    pub id: String,
    /// Domain used for generated e-mail addresses.
    pub email_domain: String,
    /// Schemas placed on the `search_path` before any statement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_path: Vec<String>,
}

/// A department to generate, with its cost center.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DepartmentDef {
    pub code: String,
    pub name: String,
}

/// Catalog entry producing one position per department.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PositionTemplate {
    pub title: String,
    pub salary_min: i64,
    pub salary_max: i64,
    /// Marks the position held by the department manager.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub manager: bool,
}

/// First and last name pools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NamePools {
    pub first: Vec<String>,
    pub last: Vec<String>,
}

/// Inclusive range of days before the reference date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DayRange {
    pub min: u32,
    pub max: u32,
}

/// Employee volumes and fixed attributes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EmployeeSettings {
    /// Staff employees generated in addition to one manager per department.
    pub staff: u64,
    #[serde(default = "default_employee_status")]
    pub status: String,
    #[serde(default = "default_employment_type")]
    pub employment_type: String,
    /// Days before the reference date a manager was hired.
    #[serde(default = "default_manager_hire_days")]
    pub manager_hire_days: DayRange,
    /// Days before the reference date a staff member was hired.
    #[serde(default = "default_staff_hire_days")]
    pub staff_hire_days: DayRange,
}

/// Dependents attached to random employees.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DependentSettings {
    pub count: u64,
    /// Probability that a dependent is a child rather than a spouse.
    #[serde(default = "default_child_ratio")]
    pub child_ratio: f64,
}

impl Default for DependentSettings {
    fn default() -> Self {
        Self {
            count: 0,
            child_ratio: default_child_ratio(),
        }
    }
}

/// Day of week as stored by the schedule tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
            DayOfWeek::Sunday => "SUNDAY",
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Work schedule shared by the employees that receive time records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScheduleSettings {
    pub name: String,
    #[serde(default = "default_schedule_type")]
    pub schedule_type: String,
    pub days: Vec<DayOfWeek>,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
    /// Unpaid break subtracted from each day when computing weekly minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// First date the schedule applies to its employees.
    pub valid_from: NaiveDate,
}

/// Paired ENTRY/EXIT punches for the first `employees` employees.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TimeRecordSettings {
    pub employees: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default = "default_time_record_source")]
    pub source: String,
}

/// Vacation periods for the first `employees` employees.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct VacationSettings {
    pub employees: usize,
    /// Start of the twelve-month acquisition window.
    pub acquisition_start: NaiveDate,
    #[serde(default = "default_vacation_days")]
    pub total_days: u32,
    #[serde(default = "default_vacation_status")]
    pub status: String,
}

/// One category, one course, and enrollments for the first `employees`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TrainingSettings {
    pub employees: usize,
    pub category: String,
    pub course_title: String,
    #[serde(default = "default_course_type")]
    pub course_type: String,
    #[serde(default = "default_course_status")]
    pub course_status: String,
    #[serde(default = "default_enrollment_status")]
    pub enrollment_status: String,
}

/// Serialization target for the generated fixture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Sql,
    Json,
    Csv,
}

/// Whether the run wipes existing rows before inserting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    #[default]
    Replace,
    Append,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub mode: WriteMode,
    /// User id kept when cleaning the users table on replace runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_user_id: Option<String>,
}

impl ScheduleSettings {
    /// Minutes between entry and exit.
    pub fn shift_minutes(&self) -> i64 {
        (self.exit_time - self.entry_time).num_minutes()
    }

    /// Contracted minutes per week: shift minus break, for every scheduled day.
    pub fn weekly_minutes(&self) -> i64 {
        (self.shift_minutes() - i64::from(self.break_minutes)) * self.days.len() as i64
    }

    pub fn covers(&self, weekday: Weekday) -> bool {
        self.days.iter().any(|day| day.weekday() == weekday)
    }
}

impl SeedPlan {
    /// Positions for a department: its own catalog, else the default one.
    pub fn positions_for(&self, department_code: &str) -> Option<&[PositionTemplate]> {
        self.position_catalogs
            .get(department_code)
            .or_else(|| self.position_catalogs.get(DEFAULT_CATALOG_KEY))
            .map(Vec::as_slice)
    }

    /// Managers plus staff.
    pub fn total_employees(&self) -> u64 {
        self.departments.len() as u64 + self.employees.staff
    }
}

/// Index of the position held by the department manager.
///
/// The first entry flagged `manager` wins; without a flag, the entry with the
/// highest `salary_max` (first on ties).
pub fn designated_manager(positions: &[PositionTemplate]) -> Option<usize> {
    if let Some(idx) = positions.iter().position(|position| position.manager) {
        return Some(idx);
    }
    positions
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, i64)>, (idx, position)| match best {
            Some((_, max)) if max >= position.salary_max => best,
            _ => Some((idx, position.salary_max)),
        })
        .map(|(idx, _)| idx)
}

fn default_employee_status() -> String {
    "ACTIVE".to_string()
}

fn default_employment_type() -> String {
    "CLT".to_string()
}

fn default_manager_hire_days() -> DayRange {
    DayRange {
        min: 1000,
        max: 3000,
    }
}

fn default_staff_hire_days() -> DayRange {
    DayRange { min: 30, max: 1000 }
}

fn default_child_ratio() -> f64 {
    0.8
}

fn default_schedule_type() -> String {
    "FIXED".to_string()
}

fn default_time_record_source() -> String {
    "WEB".to_string()
}

fn default_vacation_days() -> u32 {
    30
}

fn default_vacation_status() -> String {
    "OPEN".to_string()
}

fn default_course_type() -> String {
    "ONLINE".to_string()
}

fn default_course_status() -> String {
    "PUBLISHED".to_string()
}

fn default_enrollment_status() -> String {
    "ENROLLED".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(title: &str, max: i64, manager: bool) -> PositionTemplate {
        PositionTemplate {
            title: title.to_string(),
            salary_min: 1000,
            salary_max: max,
            manager,
        }
    }

    #[test]
    fn flagged_manager_wins_over_salary() {
        let positions = vec![
            position("Analista", 9000, false),
            position("Coordenador", 8000, true),
        ];
        assert_eq!(designated_manager(&positions), Some(1));
    }

    #[test]
    fn unflagged_catalog_falls_back_to_highest_salary() {
        let positions = vec![
            position("Assistente", 4000, false),
            position("Gerente", 16000, false),
            position("Diretor", 16000, false),
        ];
        assert_eq!(designated_manager(&positions), Some(1));
        assert_eq!(designated_manager(&[]), None);
    }

    #[test]
    fn day_of_week_round_trips_chrono() {
        for weekday in [Weekday::Mon, Weekday::Sat, Weekday::Sun] {
            assert_eq!(DayOfWeek::from_weekday(weekday).weekday(), weekday);
        }
        assert_eq!(DayOfWeek::Wednesday.as_str(), "WEDNESDAY");
    }
}
