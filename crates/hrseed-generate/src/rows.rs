//! Typed rows for every seeded table of the HR catalog.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use hrseed_core::hr::tables;
use hrseed_plan::DayOfWeek;

use crate::value::GeneratedValue;

/// A typed row of one catalog table.
///
/// `COLUMNS` follows the catalog column order; `values` returns one value per
/// column in that order.
pub trait Row {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<GeneratedValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Child,
    Spouse,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Child => "CHILD",
            Relationship::Spouse => "SPOUSE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Entry,
    Exit,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Entry => "ENTRY",
            RecordType::Exit => "EXIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostCenter {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

impl Row for CostCenter {
    const TABLE: &'static str = tables::COST_CENTERS;
    const COLUMNS: &'static [&'static str] = &["id", "tenant_id", "code", "name", "is_active"];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.code.as_str().into(),
            self.name.as_str().into(),
            self.is_active.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub cost_center_id: Uuid,
    pub is_active: bool,
}

impl Row for Department {
    const TABLE: &'static str = tables::DEPARTMENTS;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "code",
        "name",
        "cost_center_id",
        "is_active",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.code.as_str().into(),
            self.name.as_str().into(),
            self.cost_center_id.into(),
            self.is_active.into(),
        ]
    }
}

/// A position; `is_manager_role` marks the one held by the department
/// manager and is not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub title: String,
    pub department_id: Uuid,
    pub salary_min: i64,
    pub salary_max: i64,
    pub is_manager_role: bool,
    pub is_active: bool,
}

impl Row for Position {
    const TABLE: &'static str = tables::POSITIONS;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "code",
        "title",
        "department_id",
        "salary_range_min",
        "salary_range_max",
        "is_active",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.code.as_str().into(),
            self.title.as_str().into(),
            self.department_id.into(),
            self.salary_min.into(),
            self.salary_max.into(),
            self.is_active.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub full_name: String,
    /// Family name shared with dependents; not persisted.
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    pub department_id: Uuid,
    pub position_id: Uuid,
    pub manager_id: Option<Uuid>,
    pub base_salary: i64,
    pub status: String,
    pub employment_type: String,
    pub gender: Gender,
}

impl Employee {
    pub fn is_manager(&self) -> bool {
        self.manager_id.is_none()
    }
}

impl Row for Employee {
    const TABLE: &'static str = tables::EMPLOYEES;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "full_name",
        "email",
        "cpf",
        "birth_date",
        "hire_date",
        "department_id",
        "position_id",
        "manager_id",
        "base_salary",
        "status",
        "employment_type",
        "gender",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.full_name.as_str().into(),
            self.email.as_str().into(),
            self.national_id.as_str().into(),
            self.birth_date.into(),
            self.hire_date.into(),
            self.department_id.into(),
            self.position_id.into(),
            self.manager_id.into(),
            self.base_salary.into(),
            self.status.as_str().into(),
            self.employment_type.as_str().into(),
            self.gender.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dependent {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub full_name: String,
    pub relationship: Relationship,
    pub birth_date: NaiveDate,
    pub is_active: bool,
}

impl Row for Dependent {
    const TABLE: &'static str = tables::EMPLOYEE_DEPENDENTS;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "employee_id",
        "full_name",
        "relationship",
        "birth_date",
        "is_active",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.employee_id.into(),
            self.full_name.as_str().into(),
            self.relationship.as_str().into(),
            self.birth_date.into(),
            self.is_active.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkSchedule {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub schedule_type: String,
    pub weekly_minutes: i64,
}

impl Row for WorkSchedule {
    const TABLE: &'static str = tables::WORK_SCHEDULES;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "name",
        "schedule_type",
        "weekly_hours_minutes",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.name.as_str().into(),
            self.schedule_type.as_str().into(),
            self.weekly_minutes.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDay {
    pub work_schedule_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub entry_time: NaiveTime,
    pub exit_time: NaiveTime,
}

impl Row for ScheduleDay {
    const TABLE: &'static str = tables::SCHEDULE_DAYS;
    const COLUMNS: &'static [&'static str] =
        &["work_schedule_id", "day_of_week", "entry_time", "exit_time"];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.work_schedule_id.into(),
            self.day_of_week.as_str().into(),
            self.entry_time.into(),
            self.exit_time.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSchedule {
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub work_schedule_id: Uuid,
    pub valid_from: NaiveDate,
}

impl Row for EmployeeSchedule {
    const TABLE: &'static str = tables::EMPLOYEE_SCHEDULES;
    const COLUMNS: &'static [&'static str] =
        &["tenant_id", "employee_id", "work_schedule_id", "valid_from"];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.tenant_id.into(),
            self.employee_id.into(),
            self.work_schedule_id.into(),
            self.valid_from.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeRecord {
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub record_date: NaiveDate,
    pub record_time: NaiveTime,
    pub record_type: RecordType,
    pub source: String,
}

impl Row for TimeRecord {
    const TABLE: &'static str = tables::TIME_RECORDS;
    const COLUMNS: &'static [&'static str] = &[
        "tenant_id",
        "employee_id",
        "record_date",
        "record_time",
        "record_datetime",
        "record_type",
        "source",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.tenant_id.into(),
            self.employee_id.into(),
            self.record_date.into(),
            self.record_time.into(),
            self.record_date.and_time(self.record_time).into(),
            self.record_type.as_str().into(),
            self.source.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VacationPeriod {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub acquisition_start: NaiveDate,
    pub acquisition_end: NaiveDate,
    pub concession_start: NaiveDate,
    pub concession_end: NaiveDate,
    pub total_days: i64,
    pub status: String,
}

impl Row for VacationPeriod {
    const TABLE: &'static str = tables::VACATION_PERIODS;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "employee_id",
        "acquisition_start_date",
        "acquisition_end_date",
        "concession_start_date",
        "concession_end_date",
        "total_days",
        "status",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.employee_id.into(),
            self.acquisition_start.into(),
            self.acquisition_end.into(),
            self.concession_start.into(),
            self.concession_end.into(),
            self.total_days.into(),
            self.status.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCategory {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
}

impl Row for TrainingCategory {
    const TABLE: &'static str = tables::TRAINING_CATEGORIES;
    const COLUMNS: &'static [&'static str] = &["id", "tenant_id", "name"];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.name.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub course_type: String,
    pub status: String,
}

impl Row for Course {
    const TABLE: &'static str = tables::COURSES;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tenant_id",
        "category_id",
        "title",
        "course_type",
        "status",
    ];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.id.into(),
            self.tenant_id.into(),
            self.category_id.into(),
            self.title.as_str().into(),
            self.course_type.as_str().into(),
            self.status.as_str().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub tenant_id: Uuid,
    pub course_id: Uuid,
    pub employee_id: Uuid,
    pub status: String,
}

impl Row for Enrollment {
    const TABLE: &'static str = tables::ENROLLMENTS;
    const COLUMNS: &'static [&'static str] = &["tenant_id", "course_id", "employee_id", "status"];

    fn values(&self) -> Vec<GeneratedValue> {
        vec![
            self.tenant_id.into(),
            self.course_id.into(),
            self.employee_id.into(),
            self.status.as_str().into(),
        ]
    }
}
