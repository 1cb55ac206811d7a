use hrseed_core::hr::tables;
use hrseed_generate::{Artifact, GenerateOptions, GenerationEngine};
use hrseed_plan::{OutputFormat, SeedPlan, WriteMode, default_plan};
use serde_json::Value;

fn plan() -> SeedPlan {
    default_plan().expect("default plan").plan
}

fn run(plan: &SeedPlan, format: OutputFormat) -> hrseed_generate::GenerationResult {
    GenerationEngine::new(GenerateOptions {
        format: Some(format),
        ..GenerateOptions::default()
    })
    .run(plan)
    .expect("generation run")
}

fn script(result: &hrseed_generate::GenerationResult) -> String {
    match &result.artifact {
        Artifact::Single(bytes) => String::from_utf8(bytes.clone()).expect("utf8 script"),
        Artifact::Files(_) => panic!("expected a single artifact"),
    }
}

#[test]
fn sql_output_is_byte_identical_for_a_seed() {
    let plan = plan();
    let a = run(&plan, OutputFormat::Sql);
    let b = run(&plan, OutputFormat::Sql);

    assert_eq!(a.artifact, b.artifact);
    assert_eq!(a.report.sha256, b.report.sha256);
    assert_ne!(a.report.run_id, b.report.run_id);
}

#[test]
fn cleanup_runs_before_any_insert() {
    let script = script(&run(&plan(), OutputFormat::Sql));
    let lines: Vec<&str> = script.lines().collect();

    assert_eq!(lines[0], "SET search_path TO shared, public, tenant_exemplo;");
    assert_eq!(
        lines[1],
        "DELETE FROM shared.users WHERE id <> 'd1111111-1111-1111-1111-111111111111';"
    );

    let last_truncate = lines
        .iter()
        .rposition(|line| line.starts_with("TRUNCATE TABLE"))
        .expect("truncates");
    let first_insert = lines
        .iter()
        .position(|line| line.starts_with("INSERT INTO"))
        .expect("inserts");
    assert!(last_truncate < first_insert);

    let truncate_of = |table: &str| {
        lines
            .iter()
            .position(|line| *line == format!("TRUNCATE TABLE {table} CASCADE;"))
            .unwrap_or_else(|| panic!("no truncate for {table}"))
    };
    assert!(truncate_of(tables::EMPLOYEES) < truncate_of(tables::DEPARTMENTS));
    assert!(truncate_of(tables::VACATION_HISTORY) < truncate_of(tables::VACATION_PERIODS));
    assert!(truncate_of(tables::EMPLOYEE_CONTRACTS) < truncate_of(tables::EMPLOYEES));
}

#[test]
fn inserts_follow_parent_order() {
    let script = script(&run(&plan(), OutputFormat::Sql));
    let first_insert_into = |table: &str| {
        script
            .lines()
            .position(|line| line.starts_with(&format!("INSERT INTO {table} (")))
            .unwrap_or_else(|| panic!("no insert for {table}"))
    };

    assert!(first_insert_into(tables::COST_CENTERS) < first_insert_into(tables::DEPARTMENTS));
    assert!(first_insert_into(tables::DEPARTMENTS) < first_insert_into(tables::POSITIONS));
    assert!(first_insert_into(tables::POSITIONS) < first_insert_into(tables::EMPLOYEES));
    assert!(first_insert_into(tables::EMPLOYEES) < first_insert_into(tables::TIME_RECORDS));
    assert!(first_insert_into(tables::COURSES) < first_insert_into(tables::ENROLLMENTS));
    assert!(!script.contains("INSERT INTO shared.users"));
}

#[test]
fn quotes_in_plan_values_are_escaped() {
    let mut plan = plan();
    if let Some(training) = plan.training.as_mut() {
        training.course_title = "Curso d'Água'); DROP TABLE shared.users; --".to_string();
    }
    let script = script(&run(&plan, OutputFormat::Sql));
    assert!(script.contains("'Curso d''Água''); DROP TABLE shared.users; --'"));
    assert!(!script.contains("d'Água'"));
}

#[test]
fn append_mode_skips_cleanup() {
    let mut plan = plan();
    plan.output.mode = WriteMode::Append;
    let script = script(&run(&plan, OutputFormat::Sql));
    assert!(!script.contains("TRUNCATE"));
    assert!(!script.contains("DELETE FROM"));
    assert!(script.lines().nth(1).is_some_and(|line| line.starts_with("INSERT INTO")));
}

#[test]
fn json_output_keeps_values_out_of_sql() {
    let result = run(&plan(), OutputFormat::Json);
    let document: Value = match &result.artifact {
        Artifact::Single(bytes) => serde_json::from_slice(bytes).expect("json document"),
        Artifact::Files(_) => panic!("expected a single artifact"),
    };
    let statements = document["statements"].as_array().expect("statements");
    assert_eq!(statements.len() as u64, result.report.statements);

    let employee_insert = statements
        .iter()
        .find(|statement| {
            statement["sql"]
                .as_str()
                .is_some_and(|sql| sql.starts_with("INSERT INTO shared.employees"))
        })
        .expect("employee insert");
    let sql = employee_insert["sql"].as_str().expect("sql");
    assert!(sql.ends_with("VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"));
    assert!(!sql.contains('\''));
    assert_eq!(employee_insert["params"].as_array().map(Vec::len), Some(14));
}

#[test]
fn csv_output_writes_one_file_per_table() {
    let result = run(&plan(), OutputFormat::Csv);
    let Artifact::Files(files) = &result.artifact else {
        panic!("expected csv files");
    };

    let employees = files
        .iter()
        .find(|(name, _)| name == "shared.employees.csv")
        .map(|(_, bytes)| String::from_utf8(bytes.clone()).expect("utf8"))
        .expect("employees file");
    let mut lines = employees.lines();
    assert_eq!(
        lines.next(),
        Some("id,tenant_id,full_name,email,cpf,birth_date,hire_date,department_id,position_id,manager_id,base_salary,status,employment_type,gender")
    );
    assert_eq!(lines.count(), 120);
    assert!(files.iter().all(|(name, _)| name != "shared.users.csv"));
    assert_eq!(result.report.rows_for(tables::EMPLOYEES), Some(120));
    assert_eq!(result.report.format, OutputFormat::Csv);
}

#[test]
fn report_counts_rows_per_table() {
    let result = run(&plan(), OutputFormat::Sql);
    let report = &result.report;

    assert_eq!(report.rows_for(tables::DEPARTMENTS), Some(17));
    assert_eq!(report.rows_for(tables::EMPLOYEE_DEPENDENTS), Some(40));
    assert_eq!(report.rows_for(tables::TIME_RECORDS), Some(300));
    assert_eq!(report.rows_total, result.graph.row_count() as u64);
    assert_eq!(report.sha256.len(), 64);
    assert_eq!(report.bytes_written, result.artifact.len());
}
