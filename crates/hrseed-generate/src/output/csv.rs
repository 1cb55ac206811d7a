use hrseed_plan::OutputFormat;

use crate::errors::{GenerationError, Result};
use crate::fixture::{FixtureGraph, TableRows};
use crate::output::{Artifact, EmitContext, Emitter};

/// One `<schema>.<table>.csv` per seeded table, with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvEmitter;

impl Emitter for CsvEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn emit(&self, ctx: &EmitContext<'_>, graph: &FixtureGraph) -> Result<(Artifact, u64)> {
        let mut tables = graph.table_rows();
        let mut files = Vec::new();
        for key in &ctx.order.insert {
            let Some(table) = tables.remove(key.as_str()) else {
                continue;
            };
            files.push((format!("{key}.csv"), write_table_csv(&table)?));
        }
        if let Some(key) = tables.keys().next() {
            return Err(GenerationError::Configuration(format!(
                "table {key} is missing from the insert order"
            )));
        }
        Ok((Artifact::Files(files), 0))
    }
}

/// Write a table as CSV with catalog column ordering.
pub fn write_table_csv(table: &TableRows) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|value| value.to_csv()))?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| GenerationError::Io(err.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::GeneratedValue;

    #[test]
    fn writes_header_and_quotes_when_needed() {
        let table = TableRows {
            table: "shared.training_categories",
            columns: &["id", "name"],
            rows: vec![
                vec![GeneratedValue::Int(1), GeneratedValue::text("Seguros, Saúde")],
                vec![GeneratedValue::Int(2), GeneratedValue::Null],
            ],
        };
        let bytes = write_table_csv(&table).expect("csv");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "id,name\n1,\"Seguros, Saúde\"\n2,\n"
        );
    }
}
