use std::collections::BTreeMap;

use crate::rows::{
    CostCenter, Course, Department, Dependent, Employee, EmployeeSchedule, Enrollment, Position,
    Row, ScheduleDay, TimeRecord, TrainingCategory, VacationPeriod, WorkSchedule,
};
use crate::value::GeneratedValue;

/// Finished fixture: every generated entity, in generation order.
#[derive(Debug, Clone, Default)]
pub struct FixtureGraph {
    pub cost_centers: Vec<CostCenter>,
    pub departments: Vec<Department>,
    pub positions: Vec<Position>,
    pub employees: Vec<Employee>,
    pub dependents: Vec<Dependent>,
    pub work_schedules: Vec<WorkSchedule>,
    pub schedule_days: Vec<ScheduleDay>,
    pub employee_schedules: Vec<EmployeeSchedule>,
    pub time_records: Vec<TimeRecord>,
    pub vacation_periods: Vec<VacationPeriod>,
    pub training_categories: Vec<TrainingCategory>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
}

/// Rows of one table flattened to typed values.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRows {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<GeneratedValue>>,
}

impl TableRows {
    fn of<T: Row>(rows: &[T]) -> Self {
        Self {
            table: T::TABLE,
            columns: T::COLUMNS,
            rows: rows.iter().map(Row::values).collect(),
        }
    }
}

impl FixtureGraph {
    /// Rows for every table the graph fills, keyed by qualified table name.
    pub fn table_rows(&self) -> BTreeMap<&'static str, TableRows> {
        [
            TableRows::of(&self.cost_centers),
            TableRows::of(&self.departments),
            TableRows::of(&self.positions),
            TableRows::of(&self.employees),
            TableRows::of(&self.dependents),
            TableRows::of(&self.work_schedules),
            TableRows::of(&self.schedule_days),
            TableRows::of(&self.employee_schedules),
            TableRows::of(&self.time_records),
            TableRows::of(&self.vacation_periods),
            TableRows::of(&self.training_categories),
            TableRows::of(&self.courses),
            TableRows::of(&self.enrollments),
        ]
        .into_iter()
        .map(|rows| (rows.table, rows))
        .collect()
    }

    pub fn row_count(&self) -> usize {
        self.table_rows().values().map(|table| table.rows.len()).sum()
    }

    pub fn managers(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(|employee| employee.is_manager())
    }

    pub fn staff(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter().filter(|employee| !employee.is_manager())
    }
}
