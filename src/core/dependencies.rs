use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::core::entities::EntityRegistry;
use crate::core::types::{DependencyId, EntityId, Internality, LocalId, ToolId};

/// One side of a dependency as a tool reports it.
#[derive(Clone, Copy, Debug)]
pub struct Endpoint<'a> {
    pub name: &'a str,
    pub internality: Internality,
    pub local_id: LocalId,
}

impl<'a> Endpoint<'a> {
    pub fn new(name: &'a str, internality: Internality, local_id: LocalId) -> Self {
        Self {
            name,
            internality,
            local_id,
        }
    }
}

/// Directed edge between two canonical entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Dependency {
    pub id: DependencyId,
    pub from: EntityId,
    pub to: EntityId,
    /// Edge multiplicity when the reporting tool counts references.
    pub amount: Option<u64>,
    pub found_by: BTreeSet<ToolId>,
}

impl Dependency {
    pub fn was_found_by(&self, tool: ToolId) -> bool {
        self.found_by.contains(&tool)
    }
}

/// At most one dependency per ordered (from, to) pair.
#[derive(Debug, Default)]
pub struct DependencyRegistry {
    edges: Vec<Dependency>,
    by_endpoints: HashMap<(EntityId, EntityId), DependencyId>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve both endpoints through `entities` (creating them when unseen)
    /// and record the edge. The amount of the first observation sticks.
    pub fn record_dependency(
        &mut self,
        entities: &mut EntityRegistry,
        from: Endpoint<'_>,
        to: Endpoint<'_>,
        tool: ToolId,
        amount: Option<u64>,
    ) -> DependencyId {
        let from_id = entities.record_entity(from.name, tool, from.internality, from.local_id);
        let to_id = entities.record_entity(to.name, tool, to.internality, to.local_id);
        self.record_resolved(from_id, to_id, tool, amount)
    }

    pub(crate) fn record_resolved(
        &mut self,
        from: EntityId,
        to: EntityId,
        tool: ToolId,
        amount: Option<u64>,
    ) -> DependencyId {
        // reuse if this ordered pair was already seen
        if let Some(&id) = self.by_endpoints.get(&(from, to)) {
            self.edges[id].found_by.insert(tool);
            return id;
        }

        let id = self.edges.len();
        self.edges.push(Dependency {
            id,
            from,
            to,
            amount,
            found_by: BTreeSet::from([tool, ToolId::IDEAL]),
        });
        self.by_endpoints.insert((from, to), id);
        debug!(id, from, to, %tool, "new dependency");
        id
    }

    pub fn get(&self, id: DependencyId) -> Option<&Dependency> {
        self.edges.get(id)
    }

    pub fn find(&self, from: EntityId, to: EntityId) -> Option<&Dependency> {
        self.by_endpoints.get(&(from, to)).map(|&id| &self.edges[id])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> + '_ {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
