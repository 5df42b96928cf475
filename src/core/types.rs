// shared identifiers and classification enums
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical entity id, issued by the session's `IdAllocator`.
pub type EntityId = u32;

/// Index of a dependency inside the `DependencyRegistry`.
pub type DependencyId = usize;

/// Identifier a tool uses internally for an entity (row index, vertex id, ...).
pub type LocalId = i64;

/// Position of a tool inside the session's `ToolSet`. Slot 0 is always the
/// synthetic Ideal tool, the union of everything the real tools observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ToolId(pub(crate) u16);

impl ToolId {
    pub const IDEAL: ToolId = ToolId(0);

    pub fn is_ideal(self) -> bool {
        self == Self::IDEAL
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Internality {
    Internal,
    External,
    #[default]
    Unknown,
}

impl Internality {
    pub fn is_known(self) -> bool {
        !matches!(self, Internality::Unknown)
    }

    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Internality::Internal,
            Some(false) => Internality::External,
            None => Internality::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Internality::Internal => "internal",
            Internality::External => "external",
            Internality::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Internality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural unit the whole run compares at. Chosen once per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Package,
    Class,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Package => "package",
            Granularity::Class => "class",
        }
    }
}

/// How a tool spells class names.
/// `Dotted` is `com.foo.Outer.Inner`, `Underscored` is `Outer_Inner` with the
/// enclosing packages flattened or dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    #[default]
    Dotted,
    Underscored,
}
