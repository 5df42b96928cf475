// one reconciliation run: owns every entity and dependency until the report is built
use tracing::info;

use crate::config::SessionConfig;
use crate::core::dependencies::{DependencyRegistry, Endpoint};
use crate::core::entities::EntityRegistry;
use crate::core::error::ReconcileError;
use crate::core::matcher::NameMatcher;
use crate::core::performance::{self, ToolPerformance};
use crate::core::report::{self, Report};
use crate::core::tools::ToolSet;
use crate::core::types::{DependencyId, EntityId, Granularity, Internality, LocalId, ToolId};
use crate::ingest::{Observation, ObservationSource};

/// Counts of what a single source contributed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub entities: usize,
    pub dependencies: usize,
}

/// Ingestion is sequential: every adapter drains into the session one after
/// another, then `compute` runs once over the final state.
#[derive(Debug)]
pub struct Session {
    granularity: Granularity,
    tools: ToolSet,
    matcher: NameMatcher,
    entities: EntityRegistry,
    dependencies: DependencyRegistry,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Result<Self, ReconcileError> {
        let tools = ToolSet::from_config(config)?;
        let matcher = NameMatcher::new(
            config.granularity,
            &config.package_separator,
            &config.unknown_marker,
        );
        let entities = EntityRegistry::new(matcher.clone(), tools.conventions());

        Ok(Self {
            granularity: config.granularity,
            tools,
            matcher,
            entities,
            dependencies: DependencyRegistry::new(),
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Result<ToolId, ReconcileError> {
        self.tools.resolve(name)
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn dependencies(&self) -> &DependencyRegistry {
        &self.dependencies
    }

    pub fn record_entity(
        &mut self,
        name: &str,
        tool: ToolId,
        internality: Internality,
        local_id: LocalId,
    ) -> EntityId {
        assert!(self.tools.contains(tool), "{tool} is not part of this session");
        let name = self.matcher.strip_root(name, self.tools.strip_prefixes(tool));
        self.entities.record_entity(name, tool, internality, local_id)
    }

    pub fn record_dependency(
        &mut self,
        from: Endpoint<'_>,
        to: Endpoint<'_>,
        tool: ToolId,
        amount: Option<u64>,
    ) -> DependencyId {
        assert!(self.tools.contains(tool), "{tool} is not part of this session");
        let prefixes = self.tools.strip_prefixes(tool);
        let from = Endpoint {
            name: self.matcher.strip_root(from.name, prefixes),
            ..from
        };
        let to = Endpoint {
            name: self.matcher.strip_root(to.name, prefixes),
            ..to
        };
        self.dependencies
            .record_dependency(&mut self.entities, from, to, tool, amount)
    }

    pub fn apply(&mut self, tool: ToolId, observation: &Observation) {
        match observation {
            Observation::Entity {
                name,
                internality,
                local_id,
            } => {
                self.record_entity(name, tool, *internality, *local_id);
            }
            Observation::Dependency {
                from,
                from_internality,
                from_local_id,
                to,
                to_internality,
                to_local_id,
                amount,
            } => {
                self.record_dependency(
                    Endpoint::new(from, *from_internality, *from_local_id),
                    Endpoint::new(to, *to_internality, *to_local_id),
                    tool,
                    *amount,
                );
            }
        }
    }

    /// Drain one adapter into the session.
    pub fn ingest(&mut self, source: &dyn ObservationSource) -> Result<IngestStats, ReconcileError> {
        let tool = self.tool(source.tool_name())?;
        let observations = source.observations()?;

        let mut stats = IngestStats::default();
        for observation in &observations {
            self.apply(tool, observation);
            match observation {
                Observation::Entity { .. } => stats.entities += 1,
                Observation::Dependency { .. } => stats.dependencies += 1,
            }
        }

        info!(
            tool = source.tool_name(),
            entities = stats.entities,
            dependencies = stats.dependencies,
            "ingested observations"
        );
        Ok(stats)
    }

    pub fn performances(&self) -> Vec<ToolPerformance> {
        performance::collect(&self.entities, &self.tools)
    }

    pub fn compute(&self) -> Report {
        let performances = self.performances();
        report::compute(
            self.granularity,
            &self.entities,
            &self.dependencies,
            &self.tools,
            &performances,
        )
    }
}
