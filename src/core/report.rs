// found/missed aggregation against the ideal (union) tool
use std::collections::BTreeSet;

use tracing::info;

use crate::core::dependencies::DependencyRegistry;
use crate::core::entities::{EntityRegistry, InternalityConflict};
use crate::core::performance::ToolPerformance;
use crate::core::tools::ToolSet;
use crate::core::types::{DependencyId, EntityId, Granularity, Internality, ToolId};

/// Canonical entity ids split by internality, each list ascending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategorySplit {
    pub internal: Vec<EntityId>,
    pub external: Vec<EntityId>,
    pub unknown: Vec<EntityId>,
}

impl CategorySplit {
    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every id in the split with its bucket.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, Internality)> + '_ {
        let internal = self.internal.iter().map(|&id| (id, Internality::Internal));
        let external = self.external.iter().map(|&id| (id, Internality::External));
        let unknown = self.unknown.iter().map(|&id| (id, Internality::Unknown));
        internal.chain(external).chain(unknown)
    }
}

/// Missing share of each category, in percent. An empty category is 0% missing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MissingPercentages {
    pub internal: f64,
    pub external: f64,
    pub unknown: f64,
    /// Internal and external misses over the ideal hit count.
    pub total: f64,
    pub dependencies: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToolReport {
    pub tool: ToolId,
    pub name: String,
    pub found: CategorySplit,
    pub missed: CategorySplit,
    pub found_dependencies: Vec<DependencyId>,
    pub missed_dependencies: Vec<DependencyId>,
    pub missing: MissingPercentages,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityTotals {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    pub unknown: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub granularity: Granularity,
    pub entities: EntityTotals,
    pub dependency_count: usize,
    /// One entry per real tool, in configuration order.
    pub tools: Vec<ToolReport>,
    pub conflicts: Vec<InternalityConflict>,
}

impl Report {
    pub fn tool(&self, name: &str) -> Option<&ToolReport> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// `part / whole * 100`, with an empty whole defined as 0%.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Single read-only pass over the final registry state.
///
/// `performances` is indexed by `ToolId` and must contain the Ideal entry.
pub fn compute(
    granularity: Granularity,
    entities: &EntityRegistry,
    dependencies: &DependencyRegistry,
    tools: &ToolSet,
    performances: &[ToolPerformance],
) -> Report {
    let ideal = &performances[ToolId::IDEAL.index()];

    let totals = count_entities(entities);
    let tool_reports = tools
        .real()
        .map(|tool| {
            tool_report(
                tool,
                tools.name(tool),
                ideal,
                &performances[tool.index()],
                entities,
                dependencies,
            )
        })
        .collect();

    info!(
        entities = totals.total,
        dependencies = dependencies.len(),
        tools = tools.len() - 1,
        "aggregated report"
    );

    Report {
        granularity,
        entities: totals,
        dependency_count: dependencies.len(),
        tools: tool_reports,
        conflicts: entities.conflicts().to_vec(),
    }
}

fn count_entities(entities: &EntityRegistry) -> EntityTotals {
    let mut totals = EntityTotals {
        total: entities.len(),
        ..EntityTotals::default()
    };
    for e in entities.iter() {
        match e.internality {
            Internality::Internal => totals.internal += 1,
            Internality::External => totals.external += 1,
            Internality::Unknown => totals.unknown += 1,
        }
    }
    totals
}

fn tool_report(
    tool: ToolId,
    name: &str,
    ideal: &ToolPerformance,
    perf: &ToolPerformance,
    entities: &EntityRegistry,
    dependencies: &DependencyRegistry,
) -> ToolReport {
    let found = CategorySplit {
        internal: resolve(entities, perf.internal_hits.iter()),
        external: resolve(entities, perf.external_hits.iter()),
        unknown: resolve(entities, perf.unknown_hits.iter()),
    };
    let missed = CategorySplit {
        internal: resolve(entities, missing(&ideal.internal_hits, &perf.internal_hits)),
        external: resolve(entities, missing(&ideal.external_hits, &perf.external_hits)),
        unknown: resolve(entities, missing(&ideal.unknown_hits, &perf.unknown_hits)),
    };

    let mut found_dependencies = Vec::new();
    let mut missed_dependencies = Vec::new();
    for d in dependencies.iter() {
        if d.was_found_by(tool) {
            found_dependencies.push(d.id);
        } else {
            missed_dependencies.push(d.id);
        }
    }

    let missing = MissingPercentages {
        internal: percentage(missed.internal.len(), ideal.internal_hit_count()),
        external: percentage(missed.external.len(), ideal.external_hit_count()),
        unknown: percentage(missed.unknown.len(), ideal.unknown_count()),
        total: percentage(
            missed.internal.len() + missed.external.len(),
            ideal.hit_count(),
        ),
        dependencies: percentage(missed_dependencies.len(), dependencies.len()),
    };

    ToolReport {
        tool,
        name: name.to_string(),
        found,
        missed,
        found_dependencies,
        missed_dependencies,
        missing,
    }
}

fn missing<'a>(
    ideal: &'a BTreeSet<String>,
    hits: &'a BTreeSet<String>,
) -> impl Iterator<Item = &'a String> + 'a {
    ideal.difference(hits)
}

fn resolve<'a>(entities: &EntityRegistry, names: impl Iterator<Item = &'a String>) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = names
        .map(|name| match entities.find(name) {
            Some(e) => e.id,
            None => unreachable!("hit `{name}` has no canonical entity"),
        })
        .collect();
    ids.sort_unstable();
    ids
}
