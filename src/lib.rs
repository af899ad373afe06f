//! Campaign Forge: multi-channel marketing copy from a single brief.

pub mod agents;
pub mod campaign;
pub mod config;
pub mod context;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod store;
