//! Reconciles dependency extraction results from several source-analysis
//! tools into one inventory of packages or classes and the edges between
//! them, annotated with which tools saw what, plus per-tool recall figures.
pub mod config;
pub mod core;
pub mod ingest;
pub mod render;

pub use crate::config::{SessionConfig, ToolConfig};
pub use crate::core::dependencies::{Dependency, Endpoint};
pub use crate::core::entities::{Entity, InternalityConflict};
pub use crate::core::error::ReconcileError;
pub use crate::core::report::{Report, ToolReport};
pub use crate::core::session::{IngestStats, Session};
pub use crate::core::types::{EntityId, Granularity, Internality, NamingConvention, ToolId};
pub use crate::ingest::{FileSource, MemorySource, Observation, ObservationSource};
pub use crate::render::{render, OutputDetail, OutputFormat};
