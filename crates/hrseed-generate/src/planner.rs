use hrseed_core::{DatabaseSchema, TableRole, build_fk_graph_report};

use crate::errors::{GenerationError, Result};

/// Statement order for a run, derived from the catalog FK graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOrder {
    /// Seeded tables, parents before children.
    pub insert: Vec<String>,
    /// Seeded and cleanup-only tables, children before parents.
    pub truncate: Vec<String>,
    /// Tables cleaned with a filtered delete instead of a truncate.
    pub preserved: Vec<String>,
}

/// Build the insert and cleanup order for a catalog.
pub fn plan_tables(schema: &DatabaseSchema) -> Result<TableOrder> {
    let order = build_fk_graph_report(schema).into_order()?;

    let mut insert = Vec::new();
    let mut truncate = Vec::new();
    let mut preserved = Vec::new();
    for key in order {
        let table = schema
            .table(&key)
            .ok_or_else(|| GenerationError::Catalog(hrseed_core::Error::UnknownTable(key.clone())))?;
        match table.role {
            TableRole::Seeded => {
                insert.push(key.clone());
                truncate.push(key);
            }
            TableRole::CleanupOnly => truncate.push(key),
            TableRole::Preserved => preserved.push(key),
        }
    }
    truncate.reverse();

    Ok(TableOrder {
        insert,
        truncate,
        preserved,
    })
}

#[cfg(test)]
mod tests {
    use hrseed_core::hr::tables;
    use hrseed_core::hr_schema;

    use super::*;

    fn position(order: &[String], key: &str) -> usize {
        order
            .iter()
            .position(|candidate| candidate == key)
            .unwrap_or_else(|| panic!("{key} missing"))
    }

    #[test]
    fn inserts_parents_first_and_truncates_children_first() {
        let order = plan_tables(&hr_schema()).expect("table order");

        assert!(
            position(&order.insert, tables::COST_CENTERS)
                < position(&order.insert, tables::DEPARTMENTS)
        );
        assert!(
            position(&order.insert, tables::EMPLOYEES)
                < position(&order.insert, tables::VACATION_PERIODS)
        );
        assert!(
            position(&order.truncate, tables::VACATION_HISTORY)
                < position(&order.truncate, tables::VACATION_REQUESTS)
        );
        assert!(
            position(&order.truncate, tables::EMPLOYEES)
                < position(&order.truncate, tables::COST_CENTERS)
        );
        assert!(!order.insert.iter().any(|key| key == tables::DAILY_SUMMARIES));
        assert_eq!(order.preserved, vec![tables::USERS.to_string()]);
    }
}
