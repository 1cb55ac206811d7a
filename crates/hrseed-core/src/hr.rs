//! Built-in catalog of the multi-tenant HR schema.
//!
//! The table layout is an external contract owned by the HR application;
//! fixtures are generated against it, never the other way around.

use crate::CATALOG_VERSION;
use crate::constraints::{Constraint, FkAction, ForeignKey, PrimaryKey, UniqueConstraint};
use crate::schema::{Column, DatabaseSchema, Schema, Table, TableRole};
use crate::types::ColumnType::{self, *};

pub const SHARED_SCHEMA: &str = "shared";
pub const TENANT_SCHEMA: &str = "tenant_exemplo";

/// Qualified keys of the catalog tables.
pub mod tables {
    pub const USERS: &str = "shared.users";
    pub const COST_CENTERS: &str = "shared.cost_centers";
    pub const DEPARTMENTS: &str = "shared.departments";
    pub const POSITIONS: &str = "shared.positions";
    pub const EMPLOYEES: &str = "shared.employees";
    pub const EMPLOYEE_DEPENDENTS: &str = "shared.employee_dependents";
    pub const EMPLOYEE_CONTRACTS: &str = "shared.employee_contracts";
    pub const EMPLOYEE_DOCUMENTS: &str = "shared.employee_documents";
    pub const EMPLOYEE_HISTORY: &str = "shared.employee_history";
    pub const WORK_SCHEDULES: &str = "shared.work_schedules";
    pub const SCHEDULE_DAYS: &str = "shared.schedule_days";
    pub const EMPLOYEE_SCHEDULES: &str = "shared.employee_schedules";
    pub const TIME_RECORDS: &str = "shared.time_records";
    pub const DAILY_SUMMARIES: &str = "shared.daily_summaries";
    pub const VACATION_PERIODS: &str = "tenant_exemplo.vacation_periods";
    pub const VACATION_REQUESTS: &str = "tenant_exemplo.vacation_requests";
    pub const VACATION_HISTORY: &str = "tenant_exemplo.vacation_history";
    pub const TRAINING_CATEGORIES: &str = "shared.training_categories";
    pub const COURSES: &str = "shared.courses";
    pub const ENROLLMENTS: &str = "shared.enrollments";
}

/// Build the HR catalog.
pub fn hr_schema() -> DatabaseSchema {
    let shared = Schema {
        name: SHARED_SCHEMA.to_string(),
        tables: vec![
            TableBuilder::new("users", TableRole::Preserved)
                .comment("authentication users; only the admin account survives cleanup")
                .column("id", Uuid)
                .primary_key(&["id"])
                .build(),
            TableBuilder::new("cost_centers", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("code", Text)
                .column("name", Text)
                .column("is_active", Boolean)
                .primary_key(&["id"])
                .unique("uq_cost_centers_tenant_code", &["tenant_id", "code"])
                .build(),
            TableBuilder::new("departments", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("code", Text)
                .column("name", Text)
                .column("cost_center_id", Uuid)
                .column("is_active", Boolean)
                .primary_key(&["id"])
                .unique("uq_departments_tenant_code", &["tenant_id", "code"])
                .references("cost_center_id", SHARED_SCHEMA, "cost_centers")
                .build(),
            TableBuilder::new("positions", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("code", Text)
                .column("title", Text)
                .column("department_id", Uuid)
                .column("salary_range_min", Numeric)
                .column("salary_range_max", Numeric)
                .column("is_active", Boolean)
                .primary_key(&["id"])
                .references("department_id", SHARED_SCHEMA, "departments")
                .build(),
            TableBuilder::new("employees", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("full_name", Text)
                .column("email", Text)
                .column("cpf", Text)
                .column("birth_date", Date)
                .column("hire_date", Date)
                .column("department_id", Uuid)
                .column("position_id", Uuid)
                .nullable_column("manager_id", Uuid)
                .column("base_salary", Numeric)
                .column("status", Text)
                .column("employment_type", Text)
                .column("gender", Text)
                .primary_key(&["id"])
                .unique("uq_employees_tenant_email", &["tenant_id", "email"])
                .unique("uq_employees_tenant_cpf", &["tenant_id", "cpf"])
                .references("department_id", SHARED_SCHEMA, "departments")
                .references("position_id", SHARED_SCHEMA, "positions")
                .references("manager_id", SHARED_SCHEMA, "employees")
                .build(),
            TableBuilder::new("employee_dependents", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("employee_id", Uuid)
                .column("full_name", Text)
                .column("relationship", Text)
                .column("birth_date", Date)
                .column("is_active", Boolean)
                .primary_key(&["id"])
                .references("employee_id", SHARED_SCHEMA, "employees")
                .build(),
            employee_child("employee_contracts"),
            employee_child("employee_documents"),
            employee_child("employee_history"),
            TableBuilder::new("work_schedules", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("name", Text)
                .column("schedule_type", Text)
                .column("weekly_hours_minutes", Integer)
                .primary_key(&["id"])
                .build(),
            TableBuilder::new("schedule_days", TableRole::Seeded)
                .column("work_schedule_id", Uuid)
                .column("day_of_week", Text)
                .column("entry_time", Time)
                .column("exit_time", Time)
                .unique("uq_schedule_days_day", &["work_schedule_id", "day_of_week"])
                .references("work_schedule_id", SHARED_SCHEMA, "work_schedules")
                .build(),
            TableBuilder::new("employee_schedules", TableRole::Seeded)
                .column("tenant_id", Uuid)
                .column("employee_id", Uuid)
                .column("work_schedule_id", Uuid)
                .column("valid_from", Date)
                .references("employee_id", SHARED_SCHEMA, "employees")
                .references("work_schedule_id", SHARED_SCHEMA, "work_schedules")
                .build(),
            TableBuilder::new("time_records", TableRole::Seeded)
                .column("tenant_id", Uuid)
                .column("employee_id", Uuid)
                .column("record_date", Date)
                .column("record_time", Time)
                .column("record_datetime", Timestamp)
                .column("record_type", Text)
                .column("source", Text)
                .references("employee_id", SHARED_SCHEMA, "employees")
                .build(),
            employee_child("daily_summaries"),
            TableBuilder::new("training_categories", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("name", Text)
                .primary_key(&["id"])
                .build(),
            TableBuilder::new("courses", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("category_id", Uuid)
                .column("title", Text)
                .column("course_type", Text)
                .column("status", Text)
                .primary_key(&["id"])
                .references("category_id", SHARED_SCHEMA, "training_categories")
                .build(),
            TableBuilder::new("enrollments", TableRole::Seeded)
                .column("tenant_id", Uuid)
                .column("course_id", Uuid)
                .column("employee_id", Uuid)
                .column("status", Text)
                .unique("uq_enrollments_course_employee", &["course_id", "employee_id"])
                .references("course_id", SHARED_SCHEMA, "courses")
                .references("employee_id", SHARED_SCHEMA, "employees")
                .build(),
        ],
    };

    let tenant = Schema {
        name: TENANT_SCHEMA.to_string(),
        tables: vec![
            TableBuilder::new("vacation_periods", TableRole::Seeded)
                .column("id", Uuid)
                .column("tenant_id", Uuid)
                .column("employee_id", Uuid)
                .column("acquisition_start_date", Date)
                .column("acquisition_end_date", Date)
                .column("concession_start_date", Date)
                .column("concession_end_date", Date)
                .column("total_days", Integer)
                .column("status", Text)
                .primary_key(&["id"])
                .references("employee_id", SHARED_SCHEMA, "employees")
                .build(),
            TableBuilder::new("vacation_requests", TableRole::CleanupOnly)
                .column("id", Uuid)
                .column("vacation_period_id", Uuid)
                .primary_key(&["id"])
                .references("vacation_period_id", TENANT_SCHEMA, "vacation_periods")
                .build(),
            TableBuilder::new("vacation_history", TableRole::CleanupOnly)
                .column("id", Uuid)
                .column("vacation_request_id", Uuid)
                .primary_key(&["id"])
                .references("vacation_request_id", TENANT_SCHEMA, "vacation_requests")
                .build(),
        ],
    };

    DatabaseSchema {
        catalog_version: CATALOG_VERSION.to_string(),
        engine: "postgres".to_string(),
        schemas: vec![shared, tenant],
    }
}

/// Tables the generator never fills but which hang off employees.
fn employee_child(name: &str) -> Table {
    TableBuilder::new(name, TableRole::CleanupOnly)
        .column("id", Uuid)
        .column("employee_id", Uuid)
        .primary_key(&["id"])
        .references("employee_id", SHARED_SCHEMA, "employees")
        .build()
}

struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    fn new(name: &str, role: TableRole) -> Self {
        Self {
            table: Table {
                name: name.to_string(),
                role,
                comment: None,
                columns: Vec::new(),
                constraints: Vec::new(),
            },
        }
    }

    fn comment(mut self, comment: &str) -> Self {
        self.table.comment = Some(comment.to_string());
        self
    }

    fn column(self, name: &str, column_type: ColumnType) -> Self {
        self.push_column(name, column_type, false)
    }

    fn nullable_column(self, name: &str, column_type: ColumnType) -> Self {
        self.push_column(name, column_type, true)
    }

    fn push_column(mut self, name: &str, column_type: ColumnType, is_nullable: bool) -> Self {
        self.table.columns.push(Column {
            name: name.to_string(),
            column_type,
            is_nullable,
        });
        self
    }

    fn primary_key(mut self, columns: &[&str]) -> Self {
        self.table.constraints.push(Constraint::PrimaryKey(PrimaryKey {
            columns: to_strings(columns),
        }));
        self
    }

    fn unique(mut self, name: &str, columns: &[&str]) -> Self {
        self.table.constraints.push(Constraint::Unique(UniqueConstraint {
            name: Some(name.to_string()),
            columns: to_strings(columns),
        }));
        self
    }

    fn references(mut self, column: &str, schema: &str, table: &str) -> Self {
        let name = format!("fk_{}_{}", self.table.name, column);
        self.table.constraints.push(Constraint::ForeignKey(ForeignKey {
            name: Some(name),
            columns: vec![column.to_string()],
            referenced_schema: schema.to_string(),
            referenced_table: table.to_string(),
            referenced_columns: vec!["id".to_string()],
            on_delete: FkAction::Cascade,
        }));
        self
    }

    fn build(self) -> Table {
        self.table
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
