use serde::{Deserialize, Serialize};

use hrseed_plan::OutputFormat;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Overrides the plan seed.
    pub seed: Option<u64>,
    /// Overrides the plan output format.
    pub format: Option<OutputFormat>,
    /// Maximum draws for a value that must be unique within the run.
    pub max_attempts_row: u32,
    /// Re-check the finished graph before emitting it.
    pub verify: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            format: None,
            max_attempts_row: 50,
            verify: true,
        }
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub rows: u64,
}

/// Report for a generation run.
///
/// `run_id` and `duration_ms` change between runs; everything else is a
/// function of the plan and the seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub format: OutputFormat,
    pub tables: Vec<TableReport>,
    pub rows_total: u64,
    pub statements: u64,
    pub bytes_written: u64,
    pub sha256: String,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, format: OutputFormat) -> Self {
        Self {
            run_id,
            seed,
            format,
            tables: Vec::new(),
            rows_total: 0,
            statements: 0,
            bytes_written: 0,
            sha256: String::new(),
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, table: &str, rows: u64) {
        self.rows_total += rows;
        self.tables.push(TableReport {
            table: table.to_string(),
            rows,
        });
    }

    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|report| report.table == table)
            .map(|report| report.rows)
    }
}
