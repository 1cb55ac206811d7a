use std::collections::{HashMap, HashSet};

use hrseed_generate::reference::is_valid_cpf;
use hrseed_generate::{GenerateOptions, GenerationEngine, GenerationError, checks::verify_graph};
use hrseed_plan::{DepartmentDef, PositionTemplate, SeedPlan, default_plan};

fn plan() -> SeedPlan {
    default_plan().expect("default plan").plan
}

fn engine() -> GenerationEngine {
    GenerationEngine::new(GenerateOptions::default())
}

#[test]
fn default_plan_produces_expected_volumes() {
    let plan = plan();
    let graph = engine().build(&plan).expect("build graph");

    assert_eq!(graph.cost_centers.len(), 17);
    assert_eq!(graph.departments.len(), 17);
    assert_eq!(graph.employees.len(), 17 + 103);
    assert_eq!(graph.managers().count(), 17);
    assert_eq!(graph.dependents.len(), 40);
    assert_eq!(graph.work_schedules.len(), 1);
    assert_eq!(graph.schedule_days.len(), 5);
    assert_eq!(graph.work_schedules[0].weekly_minutes, 2640);
    assert_eq!(graph.employee_schedules.len(), 30);
    assert_eq!(graph.time_records.len(), 30 * 5 * 2);
    assert_eq!(graph.vacation_periods.len(), 15);
    assert_eq!(graph.enrollments.len(), 10);

    let expected_positions: usize = plan
        .departments
        .iter()
        .map(|dept| plan.positions_for(&dept.code).map_or(0, <[PositionTemplate]>::len))
        .sum();
    assert_eq!(graph.positions.len(), expected_positions);

    verify_graph(&graph).expect("graph invariants");
}

#[test]
fn cost_centers_mirror_departments() {
    let graph = engine().build(&plan()).expect("build graph");
    let cost_centers: HashMap<_, _> = graph
        .cost_centers
        .iter()
        .map(|cost_center| (cost_center.id, cost_center))
        .collect();

    for department in &graph.departments {
        let cost_center = cost_centers
            .get(&department.cost_center_id)
            .expect("cost center exists");
        assert_eq!(cost_center.code, format!("CC-{}", department.code));
        assert_eq!(cost_center.name, format!("Custo {}", department.name));
    }
}

#[test]
fn managers_hold_the_flagged_position_and_lead_their_staff() {
    let plan = plan();
    let graph = engine().build(&plan).expect("build graph");
    let positions: HashMap<_, _> = graph.positions.iter().map(|p| (p.id, p)).collect();
    let departments: HashMap<_, _> = graph.departments.iter().map(|d| (d.id, d)).collect();
    let employees: HashMap<_, _> = graph.employees.iter().map(|e| (e.id, e)).collect();

    let first_staff = graph
        .employees
        .iter()
        .position(|employee| employee.manager_id.is_some())
        .expect("staff exists");
    assert!(graph.employees[..first_staff].iter().all(|e| e.manager_id.is_none()));
    assert!(graph.employees[first_staff..].iter().all(|e| e.manager_id.is_some()));

    for manager in graph.managers() {
        let position = positions[&manager.position_id];
        let department = departments[&manager.department_id];
        let catalog = plan.positions_for(&department.code).expect("catalog");
        let flagged = hrseed_plan::designated_manager(catalog).expect("manager position");
        assert_eq!(position.title, catalog[flagged].title);
        assert!(position.is_manager_role);
    }

    for employee in graph.staff() {
        let manager = employees[&employee.manager_id.expect("staff has manager")];
        assert!(manager.manager_id.is_none());
        assert_eq!(manager.department_id, employee.department_id);
        assert!(!positions[&employee.position_id].is_manager_role);
    }
}

#[test]
fn salaries_and_dates_stay_in_range() {
    let plan = plan();
    let graph = engine().build(&plan).expect("build graph");
    let positions: HashMap<_, _> = graph.positions.iter().map(|p| (p.id, p)).collect();

    for employee in &graph.employees {
        let position = positions[&employee.position_id];
        assert!(employee.base_salary >= position.salary_min);
        assert!(employee.base_salary <= position.salary_max);

        let days = (plan.reference_date - employee.hire_date).num_days();
        let range = if employee.is_manager() {
            plan.employees.manager_hire_days
        } else {
            plan.employees.staff_hire_days
        };
        assert!(days >= i64::from(range.min) && days <= i64::from(range.max));
        assert!(employee.birth_date < employee.hire_date);
    }
}

#[test]
fn emails_and_documents_are_unique() {
    let graph = engine().build(&plan()).expect("build graph");
    let emails: HashSet<_> = graph.employees.iter().map(|e| e.email.as_str()).collect();
    let documents: HashSet<_> = graph.employees.iter().map(|e| e.national_id.as_str()).collect();

    assert_eq!(emails.len(), graph.employees.len());
    assert_eq!(documents.len(), graph.employees.len());
    assert!(graph.employees.iter().all(|e| is_valid_cpf(&e.national_id)));
    assert!(graph.employees.iter().all(|e| e.email.ends_with("@axonrh.com.br")));
}

#[test]
fn same_seed_builds_the_same_graph() {
    let plan = plan();
    let a = engine().build(&plan).expect("graph a");
    let b = engine().build(&plan).expect("graph b");
    assert_eq!(a.table_rows(), b.table_rows());

    let other = GenerationEngine::new(GenerateOptions {
        seed: Some(plan.seed + 1),
        ..GenerateOptions::default()
    })
    .build(&plan)
    .expect("graph c");
    assert_ne!(a.employees, other.employees);
}

#[test]
fn later_stages_do_not_reshuffle_earlier_ones() {
    let plan = plan();
    let mut without_training = plan.clone();
    without_training.training = None;

    let full = engine().build(&plan).expect("full graph");
    let trimmed = engine().build(&without_training).expect("trimmed graph");
    assert_eq!(full.employees, trimmed.employees);
    assert_eq!(full.dependents, trimmed.dependents);
    assert!(trimmed.enrollments.is_empty());
}

#[test]
fn single_position_department_shares_it_with_the_manager() {
    let mut plan = plan();
    plan.departments = vec![DepartmentDef {
        code: "RH-INT".to_string(),
        name: "Recursos Humanos".to_string(),
    }];
    plan.position_catalogs.clear();
    plan.position_catalogs.insert(
        "DEFAULT".to_string(),
        vec![PositionTemplate {
            title: "Analista".to_string(),
            salary_min: 3000,
            salary_max: 3000,
            manager: false,
        }],
    );
    plan.employees.staff = 5;

    let graph = engine().build(&plan).expect("build graph");
    assert_eq!(graph.positions.len(), 1);
    assert_eq!(graph.employees.len(), 6);
    let position_id = graph.positions[0].id;
    assert!(graph.employees.iter().all(|e| e.position_id == position_id));
    assert!(graph.employees.iter().all(|e| e.base_salary == 3000));
    verify_graph(&graph).expect("graph invariants");
}

#[test]
fn department_without_positions_is_a_configuration_error() {
    let mut plan = plan();
    plan.position_catalogs.clear();
    let err = engine().build(&plan).expect_err("no positions");
    assert!(matches!(err, GenerationError::Configuration(_)), "{err}");
}

#[test]
fn staff_without_departments_is_a_configuration_error() {
    let mut plan = plan();
    plan.departments.clear();
    let err = engine().build(&plan).expect_err("no departments");
    assert!(matches!(err, GenerationError::Configuration(_)), "{err}");
}

#[test]
fn inverted_salary_range_is_a_configuration_error() {
    let mut plan = plan();
    for positions in plan.position_catalogs.values_mut() {
        for position in positions.iter_mut() {
            position.salary_min = position.salary_max + 1;
        }
    }
    let err = engine().build(&plan).expect_err("inverted salary");
    assert!(matches!(err, GenerationError::Configuration(_)), "{err}");
}

#[test]
fn empty_plan_builds_an_empty_graph() {
    let mut plan = plan();
    plan.departments.clear();
    plan.employees.staff = 0;
    plan.dependents.count = 0;
    plan.time_records = None;
    plan.vacations = None;
    plan.training = None;

    let graph = engine().build(&plan).expect("build graph");
    assert!(graph.employees.is_empty());
    assert_eq!(graph.work_schedules.len(), 1);
    verify_graph(&graph).expect("graph invariants");
}

#[test]
fn time_records_come_in_pairs_on_scheduled_days() {
    let graph = engine().build(&plan()).expect("build graph");
    let scheduled: HashSet<_> = graph.employee_schedules.iter().map(|s| s.employee_id).collect();
    let mut per_day: HashMap<_, Vec<_>> = HashMap::new();
    for record in &graph.time_records {
        assert!(scheduled.contains(&record.employee_id));
        per_day
            .entry((record.employee_id, record.record_date))
            .or_default()
            .push(record.record_type.as_str());
    }
    for records in per_day.values() {
        assert_eq!(records, &vec!["ENTRY", "EXIT"]);
    }
}

#[test]
fn vacation_acquisition_precedes_concession() {
    let graph = engine().build(&plan()).expect("build graph");
    for period in &graph.vacation_periods {
        assert!(period.acquisition_end < period.concession_start);
        assert_eq!(period.total_days, 30);
        assert_eq!(period.status, "OPEN");
    }
}

#[test]
fn dependents_keep_compound_family_names() {
    let mut plan = plan();
    plan.names.last = vec!["da Silva".to_string(), "de Souza Lima".to_string()];
    let graph = engine().build(&plan).expect("build graph");

    let employees: HashMap<_, _> = graph.employees.iter().map(|e| (e.id, e)).collect();
    assert!(!graph.dependents.is_empty());
    for dependent in &graph.dependents {
        let employee = employees[&dependent.employee_id];
        assert!(
            dependent.full_name.ends_with(&format!(" {}", employee.last_name)),
            "{} / {}",
            dependent.full_name,
            employee.full_name
        );
    }
    for employee in &graph.employees {
        let (local, _) = employee.email.split_once('@').expect("email domain");
        assert!(!local.starts_with('.') && !local.ends_with('.'), "{}", employee.email);
    }
}

#[test]
fn blank_name_entries_are_a_configuration_error() {
    let mut plan = plan();
    plan.names.first = vec![String::new(), " ".to_string(), "Ana".to_string()];
    let err = engine().build(&plan).expect_err("blank first names");
    assert!(matches!(err, GenerationError::Configuration(_)), "{err:?}");
}
