use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::DatabaseSchema;

/// Summary of FK graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for FK dependency ordering.
///
/// Self-referencing tables (e.g. an employee's manager) do not constrain the
/// order between tables; they are listed separately so callers can order
/// rows within the table instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphReport {
    pub summary: FkGraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
    pub self_referencing: Vec<String>,
}

impl FkGraphReport {
    /// Parents-before-children order, or the tables caught in a cycle.
    pub fn into_order(self) -> Result<Vec<String>> {
        match (self.topo_order, self.cycle) {
            (Some(order), _) => Ok(order),
            (None, Some(cycle)) => Err(Error::Cycle(cycle)),
            (None, None) => Err(Error::Cycle(Vec::new())),
        }
    }
}

/// Build a deterministic FK dependency report for a catalog.
pub fn build_fk_graph_report(schema: &DatabaseSchema) -> FkGraphReport {
    let (graph, self_referencing) = build_adjacency(schema);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = FkGraphSummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => FkGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
            self_referencing,
        },
        Err(cycle) => FkGraphReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
            self_referencing,
        },
    }
}

fn build_adjacency(schema: &DatabaseSchema) -> (BTreeMap<String, BTreeSet<String>>, Vec<String>) {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut self_referencing = BTreeSet::new();

    for (table_key, table) in schema.tables() {
        graph.entry(table_key.clone()).or_default();

        for fk in table.foreign_keys() {
            let referenced = fk.referenced_key();
            if referenced == table_key {
                self_referencing.insert(table_key.clone());
                continue;
            }
            graph
                .entry(referenced)
                .or_default()
                .insert(table_key.clone());
        }
    }

    (graph, self_referencing.into_iter().collect())
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> std::result::Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();

    for node in graph.keys() {
        indegree.entry(node.clone()).or_insert(0);
    }

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| (*count == 0).then(|| node.clone()))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node.clone());

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| (count > 0).then_some(node))
            .collect();
        Err(cycle_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Constraint, FkAction, ForeignKey};
    use crate::schema::{Column, DatabaseSchema, Schema, Table, TableRole};
    use crate::types::ColumnType;

    fn column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            column_type: ColumnType::Uuid,
            is_nullable: false,
        }
    }

    fn fk(column: &str, table: &str) -> Constraint {
        Constraint::ForeignKey(ForeignKey {
            name: None,
            columns: vec![column.to_string()],
            referenced_schema: "public".to_string(),
            referenced_table: table.to_string(),
            referenced_columns: vec!["id".to_string()],
            on_delete: FkAction::NoAction,
        })
    }

    fn table(name: &str, columns: &[&str], constraints: Vec<Constraint>) -> Table {
        Table {
            name: name.to_string(),
            role: TableRole::Seeded,
            comment: None,
            columns: columns.iter().map(|name| column(name)).collect(),
            constraints,
        }
    }

    fn catalog(tables: Vec<Table>) -> DatabaseSchema {
        DatabaseSchema {
            catalog_version: "0.1".to_string(),
            engine: "postgres".to_string(),
            schemas: vec![Schema {
                name: "public".to_string(),
                tables,
            }],
        }
    }

    #[test]
    fn toposort_reports_cycle() {
        let schema = catalog(vec![
            table("a", &["id", "b_id"], vec![fk("b_id", "b")]),
            table("b", &["id", "a_id"], vec![fk("a_id", "a")]),
        ]);

        let report = build_fk_graph_report(&schema);
        assert!(report.topo_order.is_none());
        let cycle = report.cycle.clone().expect("cycle nodes");
        assert!(cycle.contains(&"public.a".to_string()));
        assert!(cycle.contains(&"public.b".to_string()));
        assert!(matches!(report.into_order(), Err(Error::Cycle(_))));
    }

    #[test]
    fn self_reference_is_not_a_cycle() {
        let schema = catalog(vec![table(
            "employees",
            &["id", "manager_id"],
            vec![fk("manager_id", "employees")],
        )]);

        let report = build_fk_graph_report(&schema);
        assert_eq!(report.self_referencing, vec!["public.employees".to_string()]);
        assert_eq!(
            report.into_order().expect("order"),
            vec!["public.employees".to_string()]
        );
    }

    #[test]
    fn toposort_orders_dependencies() {
        let schema = catalog(vec![
            table("orders", &["id", "user_id"], vec![fk("user_id", "users")]),
            table("users", &["id"], Vec::new()),
        ]);

        let order = build_fk_graph_report(&schema)
            .into_order()
            .expect("expected toposort");
        let users_idx = order.iter().position(|item| item == "public.users").unwrap();
        let orders_idx = order.iter().position(|item| item == "public.orders").unwrap();
        assert!(users_idx < orders_idx);
    }
}
