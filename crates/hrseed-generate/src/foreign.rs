use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::errors::{GenerationError, Result};

/// Ids produced so far, per qualified table key.
///
/// Every reference a generated row makes goes through [`IdPools::require`],
/// so a row can only point at a parent that already exists in the graph.
#[derive(Debug, Default)]
pub struct IdPools {
    ids: BTreeMap<&'static str, Vec<Uuid>>,
    known: HashSet<(&'static str, Uuid)>,
}

impl IdPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, table: &'static str, id: Uuid) {
        if self.known.insert((table, id)) {
            self.ids.entry(table).or_default().push(id);
        }
    }

    pub fn contains(&self, table: &'static str, id: Uuid) -> bool {
        self.known.contains(&(table, id))
    }

    /// Assert that `id` was registered for `parent`, on behalf of
    /// `child.column`.
    pub fn require(
        &self,
        child: &str,
        column: &str,
        parent: &'static str,
        id: Uuid,
    ) -> Result<Uuid> {
        if self.contains(parent, id) {
            Ok(id)
        } else {
            Err(GenerationError::ReferentialIntegrity {
                table: child.to_string(),
                column: column.to_string(),
                id: id.to_string(),
            })
        }
    }

    /// Same as [`IdPools::require`] for nullable references.
    pub fn require_optional(
        &self,
        child: &str,
        column: &str,
        parent: &'static str,
        id: Option<Uuid>,
    ) -> Result<Option<Uuid>> {
        id.map(|id| self.require(child, column, parent, id))
            .transpose()
    }

    pub fn ids(&self, table: &'static str) -> &[Uuid] {
        self.ids.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self, table: &'static str) -> usize {
        self.ids(table).len()
    }

    pub fn is_empty(&self, table: &'static str) -> bool {
        self.ids(table).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENTS: &str = "shared.departments";

    #[test]
    fn unknown_parent_is_a_referential_error() {
        let mut pools = IdPools::new();
        let known = Uuid::from_u128(1);
        pools.register(PARENTS, known);

        assert_eq!(
            pools
                .require("shared.positions", "department_id", PARENTS, known)
                .expect("known id"),
            known
        );

        let missing = Uuid::from_u128(2);
        match pools.require("shared.positions", "department_id", PARENTS, missing) {
            Err(GenerationError::ReferentialIntegrity { table, column, id }) => {
                assert_eq!(table, "shared.positions");
                assert_eq!(column, "department_id");
                assert_eq!(id, missing.to_string());
            }
            other => panic!("expected referential error, got {other:?}"),
        }
    }

    #[test]
    fn registering_twice_keeps_one_entry() {
        let mut pools = IdPools::new();
        pools.register(PARENTS, Uuid::from_u128(9));
        pools.register(PARENTS, Uuid::from_u128(9));
        assert_eq!(pools.len(PARENTS), 1);
        assert!(pools.is_empty("shared.employees"));
        assert_eq!(
            pools
                .require_optional("shared.employees", "manager_id", PARENTS, None)
                .expect("null reference"),
            None
        );
    }
}
