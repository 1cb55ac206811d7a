//! Entity generator: builds one typed row at a time and registers its id.

use std::collections::HashSet;

use chrono::{Days, Months, NaiveDate};
use rand::Rng;
use uuid::Uuid;

use hrseed_core::hr::tables;
use hrseed_plan::{
    DayRange, DepartmentDef, ScheduleSettings, SeedPlan, TimeRecordSettings, TrainingSettings,
    VacationSettings,
};

use crate::errors::{GenerationError, Result};
use crate::foreign::IdPools;
use crate::reference::{ReferenceData, date_in_years, random_uuid};
use crate::rows::{
    CostCenter, Course, Department, Dependent, Employee, EmployeeSchedule, Enrollment, Gender,
    Position, RecordType, Relationship, ScheduleDay, TimeRecord, TrainingCategory, VacationPeriod,
    WorkSchedule,
};

const MANAGER_BIRTH_YEARS: (i32, i32) = (1965, 1985);
const STAFF_BIRTH_YEARS: (i32, i32) = (1980, 2002);
const CHILD_BIRTH_YEARS: (i32, i32) = (2005, 2022);
const SPOUSE_BIRTH_YEARS: (i32, i32) = (1970, 1995);

/// What distinguishes a manager from a staff hire.
#[derive(Debug, Clone, Copy)]
pub struct Hire<'p> {
    pub position: &'p Position,
    pub manager_id: Option<Uuid>,
}

/// Stateful row factory shared by every builder stage.
#[derive(Debug)]
pub struct EntityGenerator<'a> {
    plan: &'a SeedPlan,
    reference: ReferenceData<'a>,
    tenant_id: Uuid,
    max_attempts: u32,
    pools: IdPools,
    emails: HashSet<String>,
    documents: HashSet<String>,
}

impl<'a> EntityGenerator<'a> {
    pub fn new(plan: &'a SeedPlan, max_attempts: u32) -> Result<Self> {
        let tenant_id = Uuid::parse_str(&plan.tenant.id).map_err(|err| {
            GenerationError::Configuration(format!("tenant id '{}': {err}", plan.tenant.id))
        })?;
        Ok(Self {
            plan,
            reference: ReferenceData::new(plan)?,
            tenant_id,
            max_attempts: max_attempts.max(1),
            pools: IdPools::new(),
            emails: HashSet::new(),
            documents: HashSet::new(),
        })
    }

    /// `CC-<code>` cost center owning a department.
    pub fn cost_center<R: Rng>(&mut self, rng: &mut R, def: &DepartmentDef) -> CostCenter {
        let row = CostCenter {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            code: format!("CC-{}", def.code),
            name: format!("Custo {}", def.name),
            is_active: true,
        };
        self.pools.register(tables::COST_CENTERS, row.id);
        row
    }

    pub fn department<R: Rng>(
        &mut self,
        rng: &mut R,
        def: &DepartmentDef,
        cost_center_id: Uuid,
    ) -> Result<Department> {
        let row = Department {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            code: def.code.clone(),
            name: def.name.clone(),
            cost_center_id: self.pools.require(
                tables::DEPARTMENTS,
                "cost_center_id",
                tables::COST_CENTERS,
                cost_center_id,
            )?,
            is_active: true,
        };
        self.pools.register(tables::DEPARTMENTS, row.id);
        Ok(row)
    }

    /// Positions of one department, in catalog order. The designated manager
    /// position carries `is_manager_role`.
    pub fn positions<R: Rng>(
        &mut self,
        rng: &mut R,
        department: &Department,
    ) -> Result<Vec<Position>> {
        let templates = self.reference.position_catalog(&department.code)?;
        let manager_idx = hrseed_plan::designated_manager(templates).unwrap_or(0);

        let mut rows = Vec::with_capacity(templates.len());
        for (idx, template) in templates.iter().enumerate() {
            if template.salary_min > template.salary_max {
                return Err(GenerationError::Configuration(format!(
                    "position '{}' in {} has salary_min {} above salary_max {}",
                    template.title, department.code, template.salary_min, template.salary_max
                )));
            }
            let id = random_uuid(rng);
            let row = Position {
                id,
                tenant_id: self.tenant_id,
                code: format!("POS-{}", &id.simple().to_string()[..8]),
                title: template.title.clone(),
                department_id: self.pools.require(
                    tables::POSITIONS,
                    "department_id",
                    tables::DEPARTMENTS,
                    department.id,
                )?,
                salary_min: template.salary_min,
                salary_max: template.salary_max,
                is_manager_role: idx == manager_idx,
                is_active: true,
            };
            self.pools.register(tables::POSITIONS, row.id);
            rows.push(row);
        }
        Ok(rows)
    }

    /// One employee. A hire without `manager_id` is a department manager.
    pub fn employee<R: Rng>(&mut self, rng: &mut R, hire: Hire<'_>) -> Result<Employee> {
        let (first, last) = self.reference.next_name(rng);
        let email = self.unique_email(first, last)?;
        let national_id = self.unique_document(rng)?;

        let is_manager = hire.manager_id.is_none();
        let (hire_days, birth_years) = if is_manager {
            (self.plan.employees.manager_hire_days, MANAGER_BIRTH_YEARS)
        } else {
            (self.plan.employees.staff_hire_days, STAFF_BIRTH_YEARS)
        };

        let position = hire.position;
        let row = Employee {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            full_name: format!("{first} {last}"),
            last_name: last.to_string(),
            email,
            national_id,
            birth_date: date_in_years(rng, birth_years.0, birth_years.1),
            hire_date: self.hire_date(rng, hire_days)?,
            department_id: self.pools.require(
                tables::EMPLOYEES,
                "department_id",
                tables::DEPARTMENTS,
                position.department_id,
            )?,
            position_id: self.pools.require(
                tables::EMPLOYEES,
                "position_id",
                tables::POSITIONS,
                position.id,
            )?,
            manager_id: self.pools.require_optional(
                tables::EMPLOYEES,
                "manager_id",
                tables::EMPLOYEES,
                hire.manager_id,
            )?,
            base_salary: rng.random_range(position.salary_min..=position.salary_max),
            status: self.plan.employees.status.clone(),
            employment_type: self.plan.employees.employment_type.clone(),
            gender: if rng.random_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            },
        };
        self.pools.register(tables::EMPLOYEES, row.id);
        Ok(row)
    }

    /// A dependent of `employee`, sharing the employee's last name.
    pub fn dependent<R: Rng>(&mut self, rng: &mut R, employee: &Employee) -> Result<Dependent> {
        let child_ratio = self.plan.dependents.child_ratio;
        if !(0.0..=1.0).contains(&child_ratio) {
            return Err(GenerationError::Configuration(format!(
                "child_ratio {child_ratio} is outside [0, 1]"
            )));
        }
        let relationship = if rng.random_bool(child_ratio) {
            Relationship::Child
        } else {
            Relationship::Spouse
        };
        let (from, to) = match relationship {
            Relationship::Child => CHILD_BIRTH_YEARS,
            Relationship::Spouse => SPOUSE_BIRTH_YEARS,
        };
        let first = self.reference.next_first_name(rng);
        let last = employee.last_name.as_str();

        let row = Dependent {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            employee_id: self.pools.require(
                tables::EMPLOYEE_DEPENDENTS,
                "employee_id",
                tables::EMPLOYEES,
                employee.id,
            )?,
            full_name: format!("{first} {last}"),
            relationship,
            birth_date: date_in_years(rng, from, to),
            is_active: true,
        };
        self.pools.register(tables::EMPLOYEE_DEPENDENTS, row.id);
        Ok(row)
    }

    /// The work schedule and one day row per scheduled weekday.
    pub fn work_schedule<R: Rng>(
        &mut self,
        rng: &mut R,
        settings: &ScheduleSettings,
    ) -> Result<(WorkSchedule, Vec<ScheduleDay>)> {
        if settings.entry_time >= settings.exit_time {
            return Err(GenerationError::Configuration(format!(
                "schedule '{}' enters at {} but exits at {}",
                settings.name, settings.entry_time, settings.exit_time
            )));
        }
        let schedule = WorkSchedule {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            name: settings.name.clone(),
            schedule_type: settings.schedule_type.clone(),
            weekly_minutes: settings.weekly_minutes(),
        };
        self.pools.register(tables::WORK_SCHEDULES, schedule.id);

        let mut days = Vec::with_capacity(settings.days.len());
        for day in &settings.days {
            days.push(ScheduleDay {
                work_schedule_id: self.pools.require(
                    tables::SCHEDULE_DAYS,
                    "work_schedule_id",
                    tables::WORK_SCHEDULES,
                    schedule.id,
                )?,
                day_of_week: *day,
                entry_time: settings.entry_time,
                exit_time: settings.exit_time,
            });
        }
        Ok((schedule, days))
    }

    pub fn employee_schedule(
        &self,
        employee_id: Uuid,
        schedule: &WorkSchedule,
        valid_from: NaiveDate,
    ) -> Result<EmployeeSchedule> {
        Ok(EmployeeSchedule {
            tenant_id: self.tenant_id,
            employee_id: self.pools.require(
                tables::EMPLOYEE_SCHEDULES,
                "employee_id",
                tables::EMPLOYEES,
                employee_id,
            )?,
            work_schedule_id: self.pools.require(
                tables::EMPLOYEE_SCHEDULES,
                "work_schedule_id",
                tables::WORK_SCHEDULES,
                schedule.id,
            )?,
            valid_from,
        })
    }

    /// ENTRY/EXIT pairs for every scheduled day in the window on or after
    /// `valid_from`.
    pub fn time_records(
        &self,
        employee_id: Uuid,
        schedule: &ScheduleSettings,
        window: &TimeRecordSettings,
    ) -> Result<Vec<TimeRecord>> {
        if window.start > window.end {
            return Err(GenerationError::Configuration(format!(
                "time record window starts {} after it ends {}",
                window.start, window.end
            )));
        }
        let employee_id = self.pools.require(
            tables::TIME_RECORDS,
            "employee_id",
            tables::EMPLOYEES,
            employee_id,
        )?;

        let mut records = Vec::new();
        for date in window.start.iter_days().take_while(|date| *date <= window.end) {
            if date < schedule.valid_from || !schedule.covers(chrono::Datelike::weekday(&date)) {
                continue;
            }
            for (record_type, record_time) in [
                (RecordType::Entry, schedule.entry_time),
                (RecordType::Exit, schedule.exit_time),
            ] {
                records.push(TimeRecord {
                    tenant_id: self.tenant_id,
                    employee_id,
                    record_date: date,
                    record_time,
                    record_type,
                    source: window.source.clone(),
                });
            }
        }
        Ok(records)
    }

    /// Twelve-month acquisition window followed by a twelve-month concession
    /// window.
    pub fn vacation_period<R: Rng>(
        &mut self,
        rng: &mut R,
        employee_id: Uuid,
        settings: &VacationSettings,
    ) -> Result<VacationPeriod> {
        if settings.total_days == 0 {
            return Err(GenerationError::Configuration(
                "vacation total_days must be positive".to_string(),
            ));
        }
        let acquisition_start = settings.acquisition_start;
        let acquisition_end = year_end(acquisition_start)?;
        let concession_start = next_day(acquisition_end)?;
        let concession_end = year_end(concession_start)?;

        let row = VacationPeriod {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            employee_id: self.pools.require(
                tables::VACATION_PERIODS,
                "employee_id",
                tables::EMPLOYEES,
                employee_id,
            )?,
            acquisition_start,
            acquisition_end,
            concession_start,
            concession_end,
            total_days: i64::from(settings.total_days),
            status: settings.status.clone(),
        };
        self.pools.register(tables::VACATION_PERIODS, row.id);
        Ok(row)
    }

    pub fn training<R: Rng>(
        &mut self,
        rng: &mut R,
        settings: &TrainingSettings,
    ) -> Result<(TrainingCategory, Course)> {
        let category = TrainingCategory {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            name: settings.category.clone(),
        };
        self.pools.register(tables::TRAINING_CATEGORIES, category.id);

        let course = Course {
            id: random_uuid(rng),
            tenant_id: self.tenant_id,
            category_id: self.pools.require(
                tables::COURSES,
                "category_id",
                tables::TRAINING_CATEGORIES,
                category.id,
            )?,
            title: settings.course_title.clone(),
            course_type: settings.course_type.clone(),
            status: settings.course_status.clone(),
        };
        self.pools.register(tables::COURSES, course.id);
        Ok((category, course))
    }

    pub fn enrollment(
        &self,
        course: &Course,
        employee_id: Uuid,
        settings: &TrainingSettings,
    ) -> Result<Enrollment> {
        Ok(Enrollment {
            tenant_id: self.tenant_id,
            course_id: self
                .pools
                .require(tables::ENROLLMENTS, "course_id", tables::COURSES, course.id)?,
            employee_id: self.pools.require(
                tables::ENROLLMENTS,
                "employee_id",
                tables::EMPLOYEES,
                employee_id,
            )?,
            status: settings.enrollment_status.clone(),
        })
    }

    fn hire_date<R: Rng>(&self, rng: &mut R, range: DayRange) -> Result<NaiveDate> {
        if range.min > range.max {
            return Err(GenerationError::Configuration(format!(
                "hire day range {}..{} is inverted",
                range.min, range.max
            )));
        }
        let days = rng.random_range(range.min..=range.max);
        self.plan
            .reference_date
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                GenerationError::Configuration(format!(
                    "hire date {days} days before {} is out of range",
                    self.plan.reference_date
                ))
            })
    }

    fn unique_email(&mut self, first: &str, last: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            let email = self.reference.email_for(first, last, attempt);
            if self.emails.insert(email.clone()) {
                return Ok(email);
            }
            attempt += 1;
            if attempt > self.emails.len() as u32 {
                return Err(GenerationError::Invariant(format!(
                    "no free e-mail address for {first} {last}"
                )));
            }
        }
    }

    fn unique_document<R: Rng>(&mut self, rng: &mut R) -> Result<String> {
        for _ in 0..self.max_attempts {
            let document = self.reference.next_document_id(rng);
            if self.documents.insert(document.clone()) {
                return Ok(document);
            }
        }
        Err(GenerationError::Invariant(format!(
            "no unique CPF after {} attempts",
            self.max_attempts
        )))
    }
}

fn year_end(start: NaiveDate) -> Result<NaiveDate> {
    start
        .checked_add_months(Months::new(12))
        .and_then(|date| date.pred_opt())
        .ok_or_else(|| GenerationError::Configuration(format!("date {start} is out of range")))
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| GenerationError::Configuration(format!("date {date} is out of range")))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn plan() -> SeedPlan {
        hrseed_plan::default_plan().expect("default plan").plan
    }

    #[test]
    fn vacation_windows_follow_each_other() {
        let plan = plan();
        let mut generator = EntityGenerator::new(&plan, 10).expect("generator");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let settings = plan.vacations.clone().expect("vacations");

        let employee_id = Uuid::from_u128(42);
        let err = generator
            .vacation_period(&mut rng, employee_id, &settings)
            .expect_err("unregistered employee");
        assert!(matches!(err, GenerationError::ReferentialIntegrity { .. }));

        generator.pools.register(tables::EMPLOYEES, employee_id);
        let period = generator
            .vacation_period(&mut rng, employee_id, &settings)
            .expect("vacation period");
        assert_eq!(period.acquisition_start.to_string(), "2024-01-01");
        assert_eq!(period.acquisition_end.to_string(), "2024-12-31");
        assert_eq!(period.concession_start.to_string(), "2025-01-01");
        assert_eq!(period.concession_end.to_string(), "2025-12-31");
    }

    #[test]
    fn time_records_skip_weekends() {
        let plan = plan();
        let mut generator = EntityGenerator::new(&plan, 10).expect("generator");
        let employee_id = Uuid::from_u128(7);
        generator.pools.register(tables::EMPLOYEES, employee_id);

        let schedule = plan.schedule.clone().expect("schedule");
        let mut window = plan.time_records.clone().expect("time records");
        window.start = NaiveDate::from_ymd_opt(2026, 1, 17).expect("saturday");
        window.end = NaiveDate::from_ymd_opt(2026, 1, 20).expect("tuesday");

        let records = generator
            .time_records(employee_id, &schedule, &window)
            .expect("records");
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].record_type, RecordType::Entry);
        assert_eq!(records[1].record_type, RecordType::Exit);
        assert_eq!(records[0].record_date.to_string(), "2026-01-19");
    }

    #[test]
    fn tenant_id_must_parse() {
        let mut plan = plan();
        plan.tenant.id = "tenant".to_string();
        let err = EntityGenerator::new(&plan, 10).expect_err("bad tenant");
        assert!(matches!(err, GenerationError::Configuration(_)));
    }
}
