// tool identity: Ideal + the configured real tools
use crate::config::{SessionConfig, ToolConfig};
use crate::core::error::ReconcileError;
use crate::core::types::{NamingConvention, ToolId};

pub const IDEAL_NAME: &str = "ideal";

#[derive(Clone, Debug)]
struct ToolSlot {
    name: String,
    convention: NamingConvention,
    strip_prefixes: Vec<String>,
}

/// Ordered set of tools taking part in a session. Slot 0 is always Ideal,
/// real tools follow in configuration order.
#[derive(Clone, Debug)]
pub struct ToolSet {
    slots: Vec<ToolSlot>,
}

impl ToolSet {
    pub fn from_config(config: &SessionConfig) -> Result<Self, ReconcileError> {
        config.validate()?;
        Ok(Self::from_tools(&config.tools))
    }

    pub(crate) fn from_tools(tools: &[ToolConfig]) -> Self {
        let mut slots = Vec::with_capacity(tools.len() + 1);
        slots.push(ToolSlot {
            name: IDEAL_NAME.to_string(),
            convention: NamingConvention::Dotted,
            strip_prefixes: Vec::new(),
        });
        slots.extend(tools.iter().map(|t| ToolSlot {
            name: t.name.clone(),
            convention: t.convention,
            strip_prefixes: t.strip_prefixes.clone(),
        }));
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<ToolId> {
        self.slots
            .iter()
            .position(|s| s.name == name)
            .filter(|&i| i != 0)
            .map(|i| ToolId(i as u16))
    }

    pub fn resolve(&self, name: &str) -> Result<ToolId, ReconcileError> {
        self.lookup(name)
            .ok_or_else(|| ReconcileError::UnknownTool(name.to_string()))
    }

    pub fn name(&self, tool: ToolId) -> &str {
        &self.slots[tool.index()].name
    }

    pub fn convention(&self, tool: ToolId) -> NamingConvention {
        self.slots[tool.index()].convention
    }

    pub fn strip_prefixes(&self, tool: ToolId) -> &[String] {
        &self.slots[tool.index()].strip_prefixes
    }

    pub fn conventions(&self) -> Vec<NamingConvention> {
        self.slots.iter().map(|s| s.convention).collect()
    }

    pub fn contains(&self, tool: ToolId) -> bool {
        tool.index() < self.slots.len()
    }

    /// Real tools only, in configuration order.
    pub fn real(&self) -> impl Iterator<Item = ToolId> + '_ {
        (1..self.slots.len()).map(|i| ToolId(i as u16))
    }

    /// Ideal followed by every real tool.
    pub fn all(&self) -> impl Iterator<Item = ToolId> + '_ {
        (0..self.slots.len()).map(|i| ToolId(i as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;

    fn mk_tools() -> ToolSet {
        ToolSet::from_tools(&[
            ToolConfig::new("structure101").with_convention(NamingConvention::Underscored),
            ToolConfig::new("pyne"),
        ])
    }

    #[test]
    fn ideal_occupies_slot_zero_and_real_tools_follow() {
        let tools = mk_tools();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools.name(ToolId::IDEAL), IDEAL_NAME);
        assert_eq!(tools.lookup("structure101"), Some(ToolId(1)));
        assert_eq!(tools.lookup("pyne"), Some(ToolId(2)));
        assert_eq!(tools.real().collect::<Vec<_>>(), vec![ToolId(1), ToolId(2)]);
        assert_eq!(tools.all().count(), 3);
    }

    #[test]
    fn ideal_is_not_resolvable_by_name() {
        let tools = mk_tools();
        assert_eq!(tools.lookup(IDEAL_NAME), None);
        assert!(matches!(tools.resolve("ideal"), Err(ReconcileError::UnknownTool(_))));
        assert!(matches!(tools.resolve("sonar"), Err(ReconcileError::UnknownTool(n)) if n == "sonar"));
    }

    #[test]
    fn per_tool_settings_are_kept() {
        let tools = mk_tools();
        assert_eq!(tools.convention(ToolId(1)), NamingConvention::Underscored);
        assert_eq!(tools.convention(ToolId(2)), NamingConvention::Dotted);
        assert!(tools.strip_prefixes(ToolId(2)).is_empty());
    }
}
