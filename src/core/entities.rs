// canonical entity set + cross-tool identity merging
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::ids::IdAllocator;
use crate::core::matcher::NameMatcher;
use crate::core::types::{EntityId, Internality, LocalId, NamingConvention, ToolId};

/// A package or class, reconciled across every tool that reported it.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// The first name this entity was observed under.
    pub name: String,
    pub internality: Internality,
    /// Tool whose spelling `name` is in.
    pub origin: ToolId,
    pub local_ids: BTreeMap<ToolId, LocalId>,
    pub found_by: BTreeSet<ToolId>,
}

impl Entity {
    pub fn was_found_by(&self, tool: ToolId) -> bool {
        self.found_by.contains(&tool)
    }

    pub fn local_id(&self, tool: ToolId) -> Option<LocalId> {
        self.local_ids.get(&tool).copied()
    }
}

/// A later observation disagreed with an already known classification.
/// The first known value is kept, the rejected one is recorded here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InternalityConflict {
    pub entity: EntityId,
    pub tool: ToolId,
    pub kept: Internality,
    pub rejected: Internality,
}

#[derive(Debug)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_name: HashMap<String, EntityId>,
    //spellings each tool used for entities stored under another name
    aliases: HashMap<(ToolId, String), EntityId>,
    ids: IdAllocator,
    matcher: NameMatcher,
    conventions: Vec<NamingConvention>,
    conflicts: Vec<InternalityConflict>,
}

impl EntityRegistry {
    /// `conventions` is indexed by `ToolId`.
    pub fn new(matcher: NameMatcher, conventions: Vec<NamingConvention>) -> Self {
        Self {
            entities: Vec::new(),
            by_name: HashMap::new(),
            aliases: HashMap::new(),
            ids: IdAllocator::new(),
            matcher,
            conventions,
            conflicts: Vec::new(),
        }
    }

    //resolve `name` as reported by `tool` to a canonical entity, creating one if needed:
    //1. exact hit (a spelling `tool` already used, else a canonical name) -> merge
    //2. equivalent name on an entity no observation of `tool` has touched yet -> merge
    //3. otherwise a new entity
    pub fn record_entity(
        &mut self,
        name: &str,
        tool: ToolId,
        internality: Internality,
        local_id: LocalId,
    ) -> EntityId {
        debug_assert!(!tool.is_ideal(), "the ideal tool never observes entities");

        //a spelling this tool already used wins over a later canonical entity of the same name
        let exact = self
            .aliases
            .get(&(tool, name.to_string()))
            .or_else(|| self.by_name.get(name))
            .copied();
        if let Some(id) = exact {
            self.merge(id, tool, internality, local_id);
            return id;
        }

        if let Some(id) = self.find_equivalent(name, tool) {
            debug!(
                incoming = name,
                canonical = %self.entities[id as usize].name,
                %tool,
                "merged cross-tool name"
            );
            self.aliases.insert((tool, name.to_string()), id);
            self.merge(id, tool, internality, local_id);
            return id;
        }

        self.insert_new(name, tool, internality, local_id)
    }

    //first match in id order wins; same-tool entities are never merged with each other
    fn find_equivalent(&self, name: &str, tool: ToolId) -> Option<EntityId> {
        let incoming_conv = self.convention(tool);
        self.entities
            .iter()
            .filter(|e| !e.was_found_by(tool))
            .find(|e| {
                self.matcher
                    .equivalent(&e.name, self.convention(e.origin), name, incoming_conv)
            })
            .map(|e| e.id)
    }

    fn convention(&self, tool: ToolId) -> NamingConvention {
        self.conventions
            .get(tool.index())
            .copied()
            .unwrap_or_default()
    }

    fn merge(&mut self, id: EntityId, tool: ToolId, internality: Internality, local_id: LocalId) {
        let entity = &mut self.entities[id as usize];
        entity.found_by.insert(tool);
        entity.local_ids.insert(tool, local_id);

        match (entity.internality, internality) {
            (_, Internality::Unknown) => {}
            (Internality::Unknown, known) => entity.internality = known,
            (kept, rejected) if kept != rejected => {
                warn!(
                    entity = %entity.name,
                    %tool,
                    %kept,
                    %rejected,
                    "conflicting internality, keeping first known value"
                );
                self.conflicts.push(InternalityConflict {
                    entity: id,
                    tool,
                    kept,
                    rejected,
                });
            }
            _ => {}
        }
    }

    fn insert_new(
        &mut self,
        name: &str,
        tool: ToolId,
        internality: Internality,
        local_id: LocalId,
    ) -> EntityId {
        let id = self.ids.next_id();
        debug_assert_eq!(id as usize, self.entities.len(), "canonical ids must be dense");

        let entity = Entity {
            id,
            name: name.to_string(),
            internality,
            origin: tool,
            local_ids: BTreeMap::from([(tool, local_id), (ToolId::IDEAL, LocalId::from(id))]),
            found_by: BTreeSet::from([tool, ToolId::IDEAL]),
        };
        debug!(id, name, %tool, %internality, "new entity");

        self.entities.push(entity);
        let previous = self.by_name.insert(name.to_string(), id);
        debug_assert!(previous.is_none(), "duplicate canonical name {name}");
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id as usize)
    }

    /// Exact lookup by canonical name.
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Resolve a tool's own identifier back to the canonical entity.
    pub fn find_by_local_id(&self, tool: ToolId, local_id: LocalId) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.local_id(tool) == Some(local_id))
    }

    /// Entities in canonical id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn conflicts(&self) -> &[InternalityConflict] {
        &self.conflicts
    }
}
