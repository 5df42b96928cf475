//! Boundary between tool-specific adapters and the reconciliation core.
//!
//! An adapter turns one tool's on-disk output (a dependency matrix, a graph
//! export, ...) into a flat list of [`Observation`]s. The core never sees the
//! tool's own format. Records an adapter cannot classify should be dropped
//! before they get here.
//!
//! [`FileSource`] reads observations that were already extracted to disk:
//! `.toon` files are decoded as TOON, anything else as a JSON array.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::ReconcileError;
use crate::core::types::{Internality, LocalId};

/// One thing a tool reported. The reporting tool is implied by the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    Entity {
        name: String,
        #[serde(default)]
        internality: Internality,
        local_id: LocalId,
    },
    Dependency {
        from: String,
        #[serde(default)]
        from_internality: Internality,
        from_local_id: LocalId,
        to: String,
        #[serde(default)]
        to_internality: Internality,
        to_local_id: LocalId,
        /// Absent when the tool does not weigh its edges.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<u64>,
    },
}

/// Extension point for per-tool adapters.
pub trait ObservationSource {
    /// Name of the tool as configured for the session.
    fn tool_name(&self) -> &str;

    fn observations(&self) -> Result<Vec<Observation>, ReconcileError>;
}

/// Observations held in memory, mostly for adapters that parse eagerly.
#[derive(Clone, Debug)]
pub struct MemorySource {
    tool: String,
    observations: Vec<Observation>,
}

impl MemorySource {
    pub fn new(tool: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            tool: tool.into(),
            observations,
        }
    }
}

impl ObservationSource for MemorySource {
    fn tool_name(&self) -> &str {
        &self.tool
    }

    fn observations(&self) -> Result<Vec<Observation>, ReconcileError> {
        Ok(self.observations.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSource {
    tool: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            path: path.into(),
        }
    }

    /// Parse a `TOOL=PATH` command-line spec.
    pub fn parse_spec(spec: &str) -> Result<Self, ReconcileError> {
        match spec.split_once('=') {
            Some((tool, path)) if !tool.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self::new(tool.trim(), path.trim()))
            }
            _ => Err(ReconcileError::InputSpec(spec.to_string())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObservationSource for FileSource {
    fn tool_name(&self) -> &str {
        &self.tool
    }

    fn observations(&self) -> Result<Vec<Observation>, ReconcileError> {
        let text = fs::read_to_string(&self.path).map_err(|source| ReconcileError::Io {
            path: self.path.clone(),
            source,
        })?;
        decode(&text, &self.path)
    }
}

fn is_toon(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toon"))
}

/// Decode an observation list, picking the format from `path`'s extension.
pub fn decode(text: &str, path: &Path) -> Result<Vec<Observation>, ReconcileError> {
    let decode_err = |message: String| ReconcileError::Decode {
        path: path.to_path_buf(),
        message,
    };

    if is_toon(path) {
        let value: serde_json::Value =
            toon_format::decode_default(text).map_err(|e| decode_err(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| decode_err(e.to_string()))
    } else {
        serde_json::from_str(text).map_err(|e| decode_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spec_splits_tool_and_path() {
        let src = FileSource::parse_spec("pyne=out/pyne.json").unwrap();
        assert_eq!(src.tool_name(), "pyne");
        assert_eq!(src.path(), Path::new("out/pyne.json"));

        assert!(matches!(FileSource::parse_spec("pyne"), Err(ReconcileError::InputSpec(_))));
        assert!(matches!(FileSource::parse_spec("=x.json"), Err(ReconcileError::InputSpec(_))));
    }

    #[test]
    fn decodes_json_with_optional_fields() {
        let text = r#"[
            {"kind": "entity", "name": "proj.util", "internality": "internal", "local_id": 1},
            {"kind": "entity", "name": "(unknown)_X", "local_id": 2},
            {"kind": "dependency", "from": "a", "from_local_id": 1,
             "to": "b", "to_internality": "external", "to_local_id": 2, "amount": 5}
        ]"#;

        let obs = decode(text, Path::new("s101.json")).unwrap();
        assert_eq!(obs.len(), 3);
        assert!(matches!(
            &obs[1],
            Observation::Entity { internality: Internality::Unknown, local_id: 2, .. }
        ));
        assert!(matches!(
            &obs[2],
            Observation::Dependency {
                from_internality: Internality::Unknown,
                to_internality: Internality::External,
                amount: Some(5),
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode("[{\"kind\": \"edge\"}]", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, ReconcileError::Decode { .. }));
    }

    #[test]
    fn toon_encoded_observations_decode_back() {
        let observations = vec![
            Observation::Entity {
                name: "proj.util".into(),
                internality: Internality::Internal,
                local_id: 1,
            },
            Observation::Dependency {
                from: "proj.app".into(),
                from_internality: Internality::Internal,
                from_local_id: 2,
                to: "proj.util".into(),
                to_internality: Internality::Internal,
                to_local_id: 1,
                amount: Some(3),
            },
        ];

        let text = toon_format::encode_default(&observations).unwrap();
        let decoded = decode(&text, Path::new("pyne.toon")).unwrap();
        assert_eq!(decoded, observations);
    }

    #[test]
    fn toon_of_the_wrong_shape_is_a_decode_error() {
        let err = decode("kind: edge\nname: proj.util", Path::new("bad.TOON")).unwrap_err();
        assert!(matches!(err, ReconcileError::Decode { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let src = FileSource::new("pyne", "/definitely/not/here.json");
        assert!(matches!(src.observations(), Err(ReconcileError::Io { .. })));
    }
}
