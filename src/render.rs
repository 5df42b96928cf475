//! Turns a [`Report`] plus the session's registries into a document.
//!
//! The shape follows the comparison results: a listing of every entity and
//! every dependency, then one block per tool with found/missed entities
//! (split by internality) and found/missed dependencies.
use serde::Serialize;

use crate::core::dependencies::Dependency;
use crate::core::entities::Entity;
use crate::core::error::ReconcileError;
use crate::core::report::{percentage, CategorySplit, Report, ToolReport};
use crate::core::session::Session;
use crate::core::types::{DependencyId, EntityId, Granularity, Internality};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputDetail {
    /// Entities with names and provenance, dependencies as id pairs.
    #[default]
    Normal,
    /// Dependencies also carry endpoint names and internality.
    HumanReadable,
    /// Per-tool listings carry ids only.
    Compact,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Toon,
}

#[derive(Serialize)]
struct Document {
    granularity: Granularity,
    entities: EntityListing,
    dependencies: DependencyListing,
    tools: Vec<ToolBlock>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    conflicts: Vec<ConflictItem>,
}

#[derive(Serialize)]
struct EntityListing {
    count: usize,
    internal: usize,
    external: usize,
    unknown: usize,
    items: Vec<EntityItem>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EntityItem {
    Full {
        id: EntityId,
        name: String,
        internality: Internality,
        found_by: Vec<String>,
    },
    Compact {
        id: EntityId,
    },
}

#[derive(Serialize)]
struct DependencyListing {
    count: usize,
    items: Vec<DependencyItem>,
}

#[derive(Serialize)]
struct DependencyItem {
    from: EntityId,
    to: EntityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_internality: Option<Internality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to_internality: Option<Internality>,
}

#[derive(Serialize)]
struct ToolBlock {
    name: String,
    found: EntityBlock,
    missed: EntityBlock,
    found_dependencies: DependencyBlock,
    missed_dependencies: DependencyBlock,
}

#[derive(Serialize)]
struct EntityBlock {
    count: usize,
    internal: usize,
    external: usize,
    unknown: usize,
    percentage_total: f64,
    percentage_internal: f64,
    percentage_external: f64,
    percentage_unknown: f64,
    items: Vec<EntityItem>,
}

#[derive(Serialize)]
struct DependencyBlock {
    count: usize,
    percentage_total: f64,
    items: Vec<DependencyItem>,
}

#[derive(Serialize)]
struct ConflictItem {
    entity: EntityId,
    name: String,
    tool: String,
    kept: Internality,
    rejected: Internality,
}

#[derive(Clone, Copy)]
struct Shares {
    total: f64,
    internal: f64,
    external: f64,
    unknown: f64,
}

struct Renderer<'a> {
    report: &'a Report,
    session: &'a Session,
    detail: OutputDetail,
}

impl Renderer<'_> {
    fn entity(&self, id: EntityId) -> &Entity {
        match self.session.entities().get(id) {
            Some(e) => e,
            None => unreachable!("report references unknown entity {id}"),
        }
    }

    fn dependency(&self, id: DependencyId) -> &Dependency {
        match self.session.dependencies().get(id) {
            Some(d) => d,
            None => unreachable!("report references unknown dependency {id}"),
        }
    }

    fn full_entity(&self, e: &Entity) -> EntityItem {
        EntityItem::Full {
            id: e.id,
            name: e.name.clone(),
            internality: e.internality,
            found_by: e
                .found_by
                .iter()
                .map(|&t| self.session.tools().name(t).to_string())
                .collect(),
        }
    }

    fn listed_entity(&self, id: EntityId) -> EntityItem {
        match self.detail {
            OutputDetail::Compact => EntityItem::Compact { id },
            _ => self.full_entity(self.entity(id)),
        }
    }

    fn dependency_item(&self, d: &Dependency) -> DependencyItem {
        let mut item = DependencyItem {
            from: d.from,
            to: d.to,
            amount: d.amount,
            from_name: None,
            from_internality: None,
            to_name: None,
            to_internality: None,
        };
        if self.detail == OutputDetail::HumanReadable {
            let (from, to) = (self.entity(d.from), self.entity(d.to));
            item.from_name = Some(from.name.clone());
            item.from_internality = Some(from.internality);
            item.to_name = Some(to.name.clone());
            item.to_internality = Some(to.internality);
        }
        item
    }

    fn entity_block(&self, split: &CategorySplit, shares: Shares) -> EntityBlock {
        EntityBlock {
            count: split.len(),
            internal: split.internal.len(),
            external: split.external.len(),
            unknown: split.unknown.len(),
            percentage_total: shares.total,
            percentage_internal: shares.internal,
            percentage_external: shares.external,
            percentage_unknown: shares.unknown,
            items: split.iter().map(|(id, _)| self.listed_entity(id)).collect(),
        }
    }

    fn dependency_block(&self, ids: &[DependencyId], percentage_total: f64) -> DependencyBlock {
        DependencyBlock {
            count: ids.len(),
            percentage_total,
            items: ids
                .iter()
                .map(|&id| self.dependency_item(self.dependency(id)))
                .collect(),
        }
    }

    //missed figures come straight from the report, found figures use the same denominators
    fn tool_block(&self, tool: &ToolReport) -> ToolBlock {
        let totals = &self.report.entities;
        let found = Shares {
            total: percentage(
                tool.found.internal.len() + tool.found.external.len(),
                totals.internal + totals.external,
            ),
            internal: percentage(tool.found.internal.len(), totals.internal),
            external: percentage(tool.found.external.len(), totals.external),
            unknown: percentage(tool.found.unknown.len(), totals.unknown),
        };
        let missed = Shares {
            total: tool.missing.total,
            internal: tool.missing.internal,
            external: tool.missing.external,
            unknown: tool.missing.unknown,
        };

        ToolBlock {
            name: tool.name.clone(),
            found: self.entity_block(&tool.found, found),
            missed: self.entity_block(&tool.missed, missed),
            found_dependencies: self.dependency_block(
                &tool.found_dependencies,
                percentage(tool.found_dependencies.len(), self.report.dependency_count),
            ),
            missed_dependencies: self
                .dependency_block(&tool.missed_dependencies, tool.missing.dependencies),
        }
    }

    fn document(&self) -> Document {
        let totals = &self.report.entities;
        Document {
            granularity: self.report.granularity,
            entities: EntityListing {
                count: totals.total,
                internal: totals.internal,
                external: totals.external,
                unknown: totals.unknown,
                // the full listing always carries names, whatever the detail level
                items: self
                    .session
                    .entities()
                    .iter()
                    .map(|e| self.full_entity(e))
                    .collect(),
            },
            dependencies: DependencyListing {
                count: self.report.dependency_count,
                items: self
                    .session
                    .dependencies()
                    .iter()
                    .map(|d| self.dependency_item(d))
                    .collect(),
            },
            tools: self.report.tools.iter().map(|t| self.tool_block(t)).collect(),
            conflicts: self
                .report
                .conflicts
                .iter()
                .map(|c| ConflictItem {
                    entity: c.entity,
                    name: self.entity(c.entity).name.clone(),
                    tool: self.session.tools().name(c.tool).to_string(),
                    kept: c.kept,
                    rejected: c.rejected,
                })
                .collect(),
        }
    }
}

/// Render `report` (computed from `session`) at the requested detail level.
pub fn render(
    report: &Report,
    session: &Session,
    detail: OutputDetail,
    format: OutputFormat,
) -> Result<String, ReconcileError> {
    let document = Renderer {
        report,
        session,
        detail,
    }
    .document();

    let value = serde_json::to_value(&document).map_err(|e| ReconcileError::Render(e.to_string()))?;
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&value).map_err(|e| ReconcileError::Render(e.to_string()))
        }
        OutputFormat::Toon => {
            toon_format::encode_default(&value).map_err(|e| ReconcileError::Render(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::config::{SessionConfig, ToolConfig};
    use crate::core::dependencies::Endpoint;

    fn mk_session() -> Session {
        let mut s = Session::new(&SessionConfig::new(
            Granularity::Package,
            [ToolConfig::new("m"), ToolConfig::new("g")],
        ))
        .unwrap();
        let (m, g) = (s.tool("m").unwrap(), s.tool("g").unwrap());

        s.record_dependency(
            Endpoint::new("proj.app", Internality::Internal, 0),
            Endpoint::new("proj.util", Internality::Internal, 1),
            m,
            Some(3),
        );
        s.record_entity("util", g, Internality::Internal, 10);
        s.record_entity("serde", g, Internality::External, 11);
        s
    }

    fn render_json(s: &Session, detail: OutputDetail) -> Value {
        let report = s.compute();
        let text = render(&report, s, detail, OutputFormat::Json).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn normal_output_lists_entities_and_per_tool_blocks() {
        let s = mk_session();
        let doc = render_json(&s, OutputDetail::Normal);

        assert_eq!(doc["granularity"], "package");
        assert_eq!(doc["entities"]["count"], 3);
        assert_eq!(doc["entities"]["items"][1]["name"], "proj.util");
        assert_eq!(doc["entities"]["items"][1]["found_by"], serde_json::json!(["ideal", "m", "g"]));
        assert_eq!(doc["dependencies"]["items"][0]["amount"], 3);
        assert!(doc["dependencies"]["items"][0].get("from_name").is_none());

        let tools = doc["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1]["name"], "g");
        assert_eq!(tools[1]["missed"]["count"], 1);
        assert_eq!(tools[1]["missed"]["items"][0]["name"], "proj.app");
        assert_eq!(tools[1]["missed_dependencies"]["percentage_total"], 100.0);
        assert!(doc.get("conflicts").is_none());
    }

    #[test]
    fn per_tool_percentages_match_report_with_unknowns_present() {
        let mut s = Session::new(&SessionConfig::new(
            Granularity::Package,
            [ToolConfig::new("a"), ToolConfig::new("b")],
        ))
        .unwrap();
        let (a, b) = (s.tool("a").unwrap(), s.tool("b").unwrap());
        s.record_entity("core", a, Internality::Internal, 0);
        s.record_entity("util", a, Internality::Internal, 1);
        s.record_entity("mystery", a, Internality::Unknown, 2);
        s.record_entity("core", b, Internality::Internal, 0);
        s.record_dependency(
            Endpoint::new("core", Internality::Internal, 0),
            Endpoint::new("util", Internality::Internal, 1),
            a,
            None,
        );

        let report = s.compute();
        let text = render(&report, &s, OutputDetail::Normal, OutputFormat::Json).unwrap();
        let doc: Value = serde_json::from_str(&text).unwrap();

        let missing = report.tool("b").unwrap().missing;
        assert_eq!(missing.total, 50.0);
        let missed = &doc["tools"][1]["missed"];
        assert_eq!(missed["count"], 2);
        assert_eq!(missed["percentage_total"], missing.total);
        assert_eq!(missed["percentage_internal"], missing.internal);
        assert_eq!(missed["percentage_external"], missing.external);
        assert_eq!(missed["percentage_unknown"], missing.unknown);
        assert_eq!(doc["tools"][1]["missed_dependencies"]["percentage_total"], missing.dependencies);

        let found = &doc["tools"][1]["found"];
        assert_eq!(found["percentage_total"], 50.0);
        assert_eq!(found["percentage_unknown"], 0.0);
        assert_eq!(doc["tools"][1]["found_dependencies"]["percentage_total"], 0.0);
    }

    #[test]
    fn human_readable_output_names_dependency_endpoints() {
        let s = mk_session();
        let doc = render_json(&s, OutputDetail::HumanReadable);

        let dep = &doc["dependencies"]["items"][0];
        assert_eq!(dep["from_name"], "proj.app");
        assert_eq!(dep["to_name"], "proj.util");
        assert_eq!(dep["to_internality"], "internal");
    }

    #[test]
    fn compact_output_lists_ids_only_inside_tools() {
        let s = mk_session();
        let doc = render_json(&s, OutputDetail::Compact);

        let found = &doc["tools"][0]["found"]["items"][0];
        assert!(found.get("id").is_some());
        assert!(found.get("name").is_none());
        assert!(doc["entities"]["items"][0].get("name").is_some());
    }

    #[test]
    fn conflicts_are_rendered_with_names() {
        let mut s = mk_session();
        let g = s.tool("g").unwrap();
        s.record_entity("proj.app", g, Internality::External, 12);

        let doc = render_json(&s, OutputDetail::Normal);
        let conflict = &doc["conflicts"][0];
        assert_eq!(conflict["name"], "proj.app");
        assert_eq!(conflict["tool"], "g");
        assert_eq!(conflict["kept"], "internal");
        assert_eq!(conflict["rejected"], "external");
    }

    #[test]
    fn toon_output_is_produced() {
        let s = mk_session();
        let report = s.compute();
        let text = render(&report, &s, OutputDetail::Compact, OutputFormat::Toon).unwrap();
        assert!(text.contains("granularity"));
        assert!(text.contains("package"));
    }
}
