use hrseed_core::hr::tables;
use hrseed_core::{TableRole, build_fk_graph_report, hr_schema, validate_schema};

fn position(order: &[String], key: &str) -> usize {
    order
        .iter()
        .position(|item| item == key)
        .unwrap_or_else(|| panic!("{key} missing from topo order"))
}

#[test]
fn hr_catalog_is_valid() {
    validate_schema(&hr_schema()).expect("built-in catalog should validate");
}

#[test]
fn hr_catalog_orders_parents_first() {
    let report = build_fk_graph_report(&hr_schema());
    assert_eq!(report.self_referencing, vec![tables::EMPLOYEES.to_string()]);
    let order = report.into_order().expect("acyclic catalog");

    let chain = [
        tables::COST_CENTERS,
        tables::DEPARTMENTS,
        tables::POSITIONS,
        tables::EMPLOYEES,
        tables::VACATION_PERIODS,
        tables::VACATION_REQUESTS,
        tables::VACATION_HISTORY,
    ];
    for pair in chain.windows(2) {
        assert!(
            position(&order, pair[0]) < position(&order, pair[1]),
            "{} should precede {}",
            pair[0],
            pair[1]
        );
    }

    for child in [
        tables::EMPLOYEE_DEPENDENTS,
        tables::EMPLOYEE_SCHEDULES,
        tables::TIME_RECORDS,
        tables::ENROLLMENTS,
    ] {
        assert!(position(&order, tables::EMPLOYEES) < position(&order, child));
    }
    assert!(position(&order, tables::WORK_SCHEDULES) < position(&order, tables::SCHEDULE_DAYS));
    assert!(position(&order, tables::COURSES) < position(&order, tables::ENROLLMENTS));
}

#[test]
fn table_lookup_uses_qualified_keys() {
    let schema = hr_schema();
    let employees = schema.table(tables::EMPLOYEES).expect("employees table");
    assert_eq!(employees.role, TableRole::Seeded);
    assert!(employees.column("manager_id").expect("manager_id").is_nullable);
    assert_eq!(
        employees
            .foreign_key_for("position_id")
            .map(|fk| fk.referenced_key()),
        Some(tables::POSITIONS.to_string())
    );

    let users = schema.table(tables::USERS).expect("users table");
    assert_eq!(users.role, TableRole::Preserved);
    assert!(schema.table("shared.missing").is_none());
    assert!(schema.table("no_dot").is_none());
}
