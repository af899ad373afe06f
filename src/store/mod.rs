//! Persistence and publishing: campaign log, CSV export, document store.

pub mod campaign_log;
pub mod csv_export;
pub mod documents;

pub use campaign_log::CampaignLog;
pub use csv_export::CsvPublisher;
pub use documents::{DocumentStore, InMemoryDocumentStore, StoredDocument};
