use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::constraints::Constraint;
use crate::error::{Error, Result};
use crate::graph::build_fk_graph_report;
use crate::schema::{DatabaseSchema, TableRole};

/// Returns true when `name` is a plain lowercase SQL identifier that can be
/// emitted without quoting.
pub fn is_valid_identifier(name: &str) -> bool {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT
        .get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier regex"))
        .is_match(name)
}

/// Validate internal consistency of a catalog.
///
/// This checks:
/// - schema, table and column names are plain identifiers
/// - duplicate schemas/tables/columns
/// - key columns exist
/// - foreign key columns and referenced targets exist
/// - preserved tables expose an `id` column
/// - the foreign-key graph is acyclic
pub fn validate_schema(schema: &DatabaseSchema) -> Result<()> {
    let mut catalog: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();

    for db_schema in &schema.schemas {
        check_identifier(&db_schema.name)?;
        if catalog.contains_key(&db_schema.name) {
            return Err(Error::InvalidSchema(format!(
                "duplicate schema name: {}",
                db_schema.name
            )));
        }

        let mut tables = BTreeMap::new();
        for table in &db_schema.tables {
            check_identifier(&table.name)?;
            if tables.contains_key(&table.name) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate table name: {}.{}",
                    db_schema.name, table.name
                )));
            }

            let mut columns = BTreeSet::new();
            for column in &table.columns {
                check_identifier(&column.name)?;
                if !columns.insert(column.name.clone()) {
                    return Err(Error::InvalidSchema(format!(
                        "duplicate column name: {}.{}.{}",
                        db_schema.name, table.name, column.name
                    )));
                }
            }

            if table.role == TableRole::Preserved && !columns.contains("id") {
                return Err(Error::InvalidSchema(format!(
                    "preserved table without id column: {}.{}",
                    db_schema.name, table.name
                )));
            }

            tables.insert(table.name.clone(), columns);
        }

        catalog.insert(db_schema.name.clone(), tables);
    }

    for db_schema in &schema.schemas {
        for table in &db_schema.tables {
            let columns = catalog
                .get(&db_schema.name)
                .and_then(|tables| tables.get(&table.name))
                .ok_or_else(|| {
                    Error::InvalidSchema(format!(
                        "missing table in catalog: {}.{}",
                        db_schema.name, table.name
                    ))
                })?;

            for constraint in &table.constraints {
                let (kind, key_columns) = match constraint {
                    Constraint::PrimaryKey(pk) => ("primary key", &pk.columns),
                    Constraint::Unique(unique) => ("unique", &unique.columns),
                    Constraint::ForeignKey(fk) => ("foreign key", &fk.columns),
                };
                for column in key_columns {
                    if !columns.contains(column) {
                        return Err(Error::InvalidSchema(format!(
                            "{kind} column not found: {}.{}.{}",
                            db_schema.name, table.name, column
                        )));
                    }
                }

                if let Constraint::ForeignKey(fk) = constraint {
                    let ref_columns = catalog
                        .get(&fk.referenced_schema)
                        .and_then(|tables| tables.get(&fk.referenced_table))
                        .ok_or_else(|| {
                            Error::InvalidSchema(format!(
                                "referenced table not found: {}.{}",
                                fk.referenced_schema, fk.referenced_table
                            ))
                        })?;

                    for column in &fk.referenced_columns {
                        if !ref_columns.contains(column) {
                            return Err(Error::InvalidSchema(format!(
                                "referenced column not found: {}.{}.{}",
                                fk.referenced_schema, fk.referenced_table, column
                            )));
                        }
                    }
                }
            }
        }
    }

    build_fk_graph_report(schema).into_order().map(|_| ())
}

fn check_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidSchema(format!("invalid identifier: {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_reject_quotes_and_uppercase() {
        assert!(is_valid_identifier("employee_dependents"));
        assert!(!is_valid_identifier("Employees"));
        assert!(!is_valid_identifier("users; drop table x"));
        assert!(!is_valid_identifier("9lives"));
        assert!(!is_valid_identifier(""));
    }
}
