pub mod dependencies;
pub mod entities;
pub mod error;
pub mod ids;
pub mod matcher;
pub mod performance;
pub mod report;
pub mod session;
pub mod tools;
pub mod types;
