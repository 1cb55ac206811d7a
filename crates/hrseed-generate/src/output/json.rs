use serde::Serialize;

use hrseed_plan::OutputFormat;

use crate::errors::Result;
use crate::fixture::FixtureGraph;
use crate::output::{Artifact, EmitContext, Emitter, SqlStatement, build_statements};

/// Version of the JSON statement document.
pub const STATEMENTS_FORMAT_VERSION: &str = "0.1";

/// Parametrized statements for API consumers that bind values themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

#[derive(Debug, Serialize)]
struct StatementDocument<'a> {
    format_version: &'static str,
    statements: &'a [SqlStatement],
}

impl Emitter for JsonEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn emit(&self, ctx: &EmitContext<'_>, graph: &FixtureGraph) -> Result<(Artifact, u64)> {
        let statements = build_statements(ctx, graph)?;
        let document = StatementDocument {
            format_version: STATEMENTS_FORMAT_VERSION,
            statements: &statements,
        };
        let mut bytes = serde_json::to_vec_pretty(&document)?;
        bytes.push(b'\n');
        Ok((Artifact::Single(bytes), statements.len() as u64))
    }
}
