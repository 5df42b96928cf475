use std::collections::BTreeSet;

use crate::core::entities::{Entity, EntityRegistry};
use crate::core::tools::ToolSet;
use crate::core::types::{Internality, ToolId};

/// Names of the entities one tool hit, bucketed by internality.
/// Unknown entities are kept apart: they never count towards `hit_count`.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolPerformance {
    pub tool: ToolId,
    pub internal_hits: BTreeSet<String>,
    pub external_hits: BTreeSet<String>,
    pub unknown_hits: BTreeSet<String>,
}

impl ToolPerformance {
    pub fn new(tool: ToolId) -> Self {
        Self {
            tool,
            internal_hits: BTreeSet::new(),
            external_hits: BTreeSet::new(),
            unknown_hits: BTreeSet::new(),
        }
    }

    pub fn add_entity(&mut self, entity: &Entity) {
        let bucket = match entity.internality {
            Internality::Internal => &mut self.internal_hits,
            Internality::External => &mut self.external_hits,
            Internality::Unknown => &mut self.unknown_hits,
        };
        bucket.insert(entity.name.clone());
    }

    pub fn hit_count(&self) -> usize {
        self.internal_hits.len() + self.external_hits.len()
    }

    pub fn internal_hit_count(&self) -> usize {
        self.internal_hits.len()
    }

    pub fn external_hit_count(&self) -> usize {
        self.external_hits.len()
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown_hits.len()
    }
}

//rebuilt from the final registry state: an entity classified after a tool saw it
//still lands in the right bucket for that tool
pub fn collect(entities: &EntityRegistry, tools: &ToolSet) -> Vec<ToolPerformance> {
    let mut perf: Vec<ToolPerformance> = tools.all().map(ToolPerformance::new).collect();

    for entity in entities.iter() {
        for tool in &entity.found_by {
            perf[tool.index()].add_entity(entity);
        }
    }
    perf
}
