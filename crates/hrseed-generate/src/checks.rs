//! Invariant checks over a finished fixture graph.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use hrseed_core::hr::tables;
use hrseed_plan::DayOfWeek;

use crate::errors::{GenerationError, Result};
use crate::fixture::FixtureGraph;
use crate::reference::is_valid_cpf;
use crate::rows::RecordType;

/// Check every relational and business invariant of the graph.
pub fn verify_graph(graph: &FixtureGraph) -> Result<()> {
    check_references(graph)?;
    check_organization(graph)?;
    check_people(graph)?;
    check_time_records(graph)?;
    check_vacations(graph)?;
    Ok(())
}

fn check_references(graph: &FixtureGraph) -> Result<()> {
    let cost_centers = ids(graph.cost_centers.iter().map(|row| row.id));
    let departments = ids(graph.departments.iter().map(|row| row.id));
    let positions = ids(graph.positions.iter().map(|row| row.id));
    let employees = ids(graph.employees.iter().map(|row| row.id));
    let schedules = ids(graph.work_schedules.iter().map(|row| row.id));
    let categories = ids(graph.training_categories.iter().map(|row| row.id));
    let courses = ids(graph.courses.iter().map(|row| row.id));

    for row in &graph.departments {
        resolve(&cost_centers, tables::DEPARTMENTS, "cost_center_id", row.cost_center_id)?;
    }
    for row in &graph.positions {
        resolve(&departments, tables::POSITIONS, "department_id", row.department_id)?;
    }
    for row in &graph.employees {
        resolve(&departments, tables::EMPLOYEES, "department_id", row.department_id)?;
        resolve(&positions, tables::EMPLOYEES, "position_id", row.position_id)?;
        if let Some(manager_id) = row.manager_id {
            resolve(&employees, tables::EMPLOYEES, "manager_id", manager_id)?;
        }
    }
    for row in &graph.dependents {
        resolve(&employees, tables::EMPLOYEE_DEPENDENTS, "employee_id", row.employee_id)?;
    }
    for row in &graph.schedule_days {
        resolve(&schedules, tables::SCHEDULE_DAYS, "work_schedule_id", row.work_schedule_id)?;
    }
    for row in &graph.employee_schedules {
        resolve(&employees, tables::EMPLOYEE_SCHEDULES, "employee_id", row.employee_id)?;
        resolve(&schedules, tables::EMPLOYEE_SCHEDULES, "work_schedule_id", row.work_schedule_id)?;
    }
    for row in &graph.time_records {
        resolve(&employees, tables::TIME_RECORDS, "employee_id", row.employee_id)?;
    }
    for row in &graph.vacation_periods {
        resolve(&employees, tables::VACATION_PERIODS, "employee_id", row.employee_id)?;
    }
    for row in &graph.courses {
        resolve(&categories, tables::COURSES, "category_id", row.category_id)?;
    }
    for row in &graph.enrollments {
        resolve(&courses, tables::ENROLLMENTS, "course_id", row.course_id)?;
        resolve(&employees, tables::ENROLLMENTS, "employee_id", row.employee_id)?;
    }
    Ok(())
}

fn check_organization(graph: &FixtureGraph) -> Result<()> {
    let mut codes = HashSet::new();
    for department in &graph.departments {
        if !codes.insert(department.code.as_str()) {
            return invariant(format!("department code {} repeats", department.code));
        }
    }
    for position in &graph.positions {
        if position.salary_min > position.salary_max {
            return invariant(format!("position {} has an inverted salary range", position.code));
        }
    }
    Ok(())
}

fn check_people(graph: &FixtureGraph) -> Result<()> {
    let positions: HashMap<Uuid, _> = graph
        .positions
        .iter()
        .map(|position| (position.id, position))
        .collect();
    let employees: HashMap<Uuid, _> = graph
        .employees
        .iter()
        .map(|employee| (employee.id, employee))
        .collect();

    let mut managers_per_department: HashMap<Uuid, usize> = HashMap::new();
    let mut seen_staff = false;
    let mut emails = HashSet::new();
    let mut documents = HashSet::new();

    for employee in &graph.employees {
        let Some(position) = positions.get(&employee.position_id) else {
            return invariant(format!("employee {} has no position", employee.id));
        };
        if position.department_id != employee.department_id {
            return invariant(format!(
                "employee {} holds a position of another department",
                employee.id
            ));
        }
        if !(position.salary_min..=position.salary_max).contains(&employee.base_salary) {
            return invariant(format!(
                "employee {} earns {} outside {}..={}",
                employee.id, employee.base_salary, position.salary_min, position.salary_max
            ));
        }

        match employee.manager_id {
            None => {
                if seen_staff {
                    return invariant(format!("manager {} generated after staff", employee.id));
                }
                *managers_per_department.entry(employee.department_id).or_default() += 1;
            }
            Some(manager_id) => {
                seen_staff = true;
                let manager = employees.get(&manager_id).ok_or_else(|| {
                    GenerationError::ReferentialIntegrity {
                        table: tables::EMPLOYEES.to_string(),
                        column: "manager_id".to_string(),
                        id: manager_id.to_string(),
                    }
                })?;
                if manager.manager_id.is_some() || manager.department_id != employee.department_id
                {
                    return invariant(format!(
                        "employee {} reports to {} who is not their department manager",
                        employee.id, manager_id
                    ));
                }
            }
        }

        if !emails.insert(employee.email.as_str()) {
            return invariant(format!("e-mail {} repeats", employee.email));
        }
        if !is_valid_cpf(&employee.national_id) {
            return invariant(format!("CPF {} fails its check digits", employee.national_id));
        }
        if !documents.insert(employee.national_id.as_str()) {
            return invariant(format!("CPF {} repeats", employee.national_id));
        }
    }

    for department in &graph.departments {
        let managers = managers_per_department.get(&department.id).copied().unwrap_or(0);
        if managers != 1 {
            return invariant(format!(
                "department {} has {managers} managers",
                department.code
            ));
        }
    }
    Ok(())
}

fn check_time_records(graph: &FixtureGraph) -> Result<()> {
    let schedule_days: HashMap<Uuid, Vec<DayOfWeek>> =
        graph
            .schedule_days
            .iter()
            .fold(HashMap::new(), |mut days, day| {
                days.entry(day.work_schedule_id)
                    .or_insert_with(Vec::new)
                    .push(day.day_of_week);
                days
            });

    let mut pairs: BTreeMap<(Uuid, NaiveDate), (usize, usize)> = BTreeMap::new();
    for record in &graph.time_records {
        let scheduled = graph.employee_schedules.iter().any(|assignment| {
            assignment.employee_id == record.employee_id
                && assignment.valid_from <= record.record_date
                && schedule_days
                    .get(&assignment.work_schedule_id)
                    .is_some_and(|days| {
                        days.contains(&DayOfWeek::from_weekday(record.record_date.weekday()))
                    })
        });
        if !scheduled {
            return invariant(format!(
                "time record of {} on {} has no schedule",
                record.employee_id, record.record_date
            ));
        }
        let counts = pairs
            .entry((record.employee_id, record.record_date))
            .or_default();
        match record.record_type {
            RecordType::Entry => counts.0 += 1,
            RecordType::Exit => counts.1 += 1,
        }
    }

    if let Some(((employee_id, date), _)) = pairs.iter().find(|(_, counts)| **counts != (1, 1)) {
        return invariant(format!(
            "time records of {employee_id} on {date} are not one ENTRY/EXIT pair"
        ));
    }
    Ok(())
}

fn check_vacations(graph: &FixtureGraph) -> Result<()> {
    for period in &graph.vacation_periods {
        if period.total_days <= 0
            || period.acquisition_start > period.acquisition_end
            || period.acquisition_end >= period.concession_start
            || period.concession_start > period.concession_end
        {
            return invariant(format!("vacation period {} has broken windows", period.id));
        }
    }
    Ok(())
}

fn ids(values: impl Iterator<Item = Uuid>) -> HashSet<Uuid> {
    values.collect()
}

fn resolve(pool: &HashSet<Uuid>, table: &str, column: &str, id: Uuid) -> Result<()> {
    if pool.contains(&id) {
        Ok(())
    } else {
        Err(GenerationError::ReferentialIntegrity {
            table: table.to_string(),
            column: column.to_string(),
            id: id.to_string(),
        })
    }
}

fn invariant(message: String) -> Result<()> {
    Err(GenerationError::Invariant(message))
}
