//! Campaign pipeline.
//!
//! A brief flows strictly forward through:
//! 1. `ContentAgents`: persona, email, SMS and social drafts
//! 2. Compliance check, with a single rewrite when it fails
//! 3. Variant generation and independent scoring
//! 4. `ranking`: stable ordering by quality metric
//! 5. `ApprovalGate`: optional human review before anything is persisted

pub mod approval;
pub mod orchestrator;
pub mod ranking;

pub use approval::{ApprovalDecision, ApprovalGate, AutoApprove, PromptApproval};
pub use orchestrator::{CampaignOrchestrator, CampaignOutcome, RunOptions};
