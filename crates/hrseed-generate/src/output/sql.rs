
use hrseed_plan::OutputFormat;

use crate::errors::{GenerationError, Result};
use crate::fixture::FixtureGraph;
use crate::output::{Artifact, EmitContext, Emitter, SqlStatement, build_statements};

/// Runnable `psql` script.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlEmitter;

impl Emitter for SqlEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Sql
    }

    fn emit(&self, ctx: &EmitContext<'_>, graph: &FixtureGraph) -> Result<(Artifact, u64)> {
        let statements = build_statements(ctx, graph)?;
        let script = SqlScriptWriter::render(&statements)?;
        Ok((Artifact::Single(script.into_bytes()), statements.len() as u64))
    }
}

/// Renders parametrized statements as a plain script by binding every
/// parameter as a quoted literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlScriptWriter;

impl SqlScriptWriter {
    pub fn render(statements: &[SqlStatement]) -> Result<String> {
        let mut script = String::new();
        for statement in statements {
            script.push_str(&Self::bind(statement)?);
            script.push_str(";\n");
        }
        Ok(script)
    }

    /// Replace `$n` placeholders with the literal of parameter `n`.
    pub fn bind(statement: &SqlStatement) -> Result<String> {
        let sql = statement.sql.as_str();
        let mut out = String::with_capacity(sql.len() + statement.params.len() * 16);
        let mut chars = sql.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '$' {
                out.push(ch);
                continue;
            }
            let mut digits = String::new();
            while let Some(next) = chars.peek() {
                if next.is_ascii_digit() {
                    digits.push(*next);
                    chars.next();
                } else {
                    break;
                }
            }
            if digits.is_empty() {
                out.push('$');
                continue;
            }
            let index: usize = digits.parse().map_err(|_| placeholder_error(statement, &digits))?;
            let value = index
                .checked_sub(1)
                .and_then(|idx| statement.params.get(idx))
                .ok_or_else(|| placeholder_error(statement, &digits))?;
            out.push_str(&value.sql_literal());
        }
        Ok(out)
    }
}

fn placeholder_error(statement: &SqlStatement, digits: &str) -> GenerationError {
    GenerationError::Configuration(format!(
        "placeholder ${digits} has no parameter in `{}` ({} params)",
        statement.sql,
        statement.params.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::GeneratedValue;

    #[test]
    fn binds_quoted_literals() {
        let statement = SqlStatement::with_params(
            "INSERT INTO shared.employees (full_name, manager_id, base_salary) VALUES ($1, $2, $3)",
            vec![
                GeneratedValue::text("Ana D'Ávila"),
                GeneratedValue::Null,
                GeneratedValue::Int(5400),
            ],
        );
        assert_eq!(
            SqlScriptWriter::bind(&statement).expect("bind"),
            "INSERT INTO shared.employees (full_name, manager_id, base_salary) VALUES ('Ana D''Ávila', NULL, 5400)"
        );
    }

    #[test]
    fn multi_digit_placeholders_are_not_split() {
        let params = (1..=11).map(GeneratedValue::Int).collect::<Vec<_>>();
        let statement = SqlStatement::with_params("SELECT $1, $10, $11", params);
        assert_eq!(
            SqlScriptWriter::bind(&statement).expect("bind"),
            "SELECT 1, 10, 11"
        );
    }

    #[test]
    fn injected_placeholders_in_values_stay_literal() {
        let statement = SqlStatement::with_params(
            "SELECT $1, $2",
            vec![GeneratedValue::text("$2'; DROP TABLE x; --"), GeneratedValue::Int(1)],
        );
        assert_eq!(
            SqlScriptWriter::bind(&statement).expect("bind"),
            "SELECT '$2''; DROP TABLE x; --', 1"
        );
    }

    #[test]
    fn missing_parameter_is_an_error() {
        let statement = SqlStatement::with_params("SELECT $2", vec![GeneratedValue::Int(1)]);
        assert!(SqlScriptWriter::bind(&statement).is_err());
        let zero = SqlStatement::new("SELECT $0");
        assert!(SqlScriptWriter::bind(&zero).is_err());
    }

    #[test]
    fn script_terminates_statements() {
        let script = SqlScriptWriter::render(&[
            SqlStatement::new("SET search_path TO shared"),
            SqlStatement::new("TRUNCATE TABLE shared.positions CASCADE"),
        ])
        .expect("render");
        assert_eq!(
            script,
            "SET search_path TO shared;\nTRUNCATE TABLE shared.positions CASCADE;\n"
        );
    }
}
