//! Human approval gate.
//!
//! When a run requires approval the pipeline suspends on the gate after the
//! result is assembled and resumes with the reviewer's decision. Nothing is
//! persisted unless the decision is `Approved`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::campaign::CampaignResult;
use crate::error::PipelineError;

/// The reviewer's verdict on a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected { reason: String },
}

impl ApprovalDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Something that can approve or reject an assembled campaign.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    /// Block until a decision is available.
    async fn review(&self, candidate: &CampaignResult) -> Result<ApprovalDecision, PipelineError>;
}

/// Approves everything. Used when a run does not require review.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

#[async_trait]
impl ApprovalGate for AutoApprove {
    async fn review(&self, _candidate: &CampaignResult) -> Result<ApprovalDecision, PipelineError> {
        Ok(ApprovalDecision::Approved)
    }
}

/// Interactive gate: shows the final choice and reads `yes`/`no`.
///
/// Generic over its streams so tests can script the reviewer.
pub struct PromptApproval<R, W> {
    io: Mutex<(R, W)>,
}

impl PromptApproval<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Gate reading stdin and prompting on stderr.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> PromptApproval<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }
}

#[async_trait]
impl<R, W> ApprovalGate for PromptApproval<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn review(&self, candidate: &CampaignResult) -> Result<ApprovalDecision, PipelineError> {
        let mut guard = self.io.lock().await;
        let (reader, writer) = &mut *guard;

        let summary = format!(
            "\nCampaign {} for {} awaits approval.\n\nFinal choice:\n{}\n\nCompliance: {}\n",
            candidate.id,
            candidate.brief.brand_name,
            candidate.final_choice.variant,
            if candidate.compliance.approved {
                "approved"
            } else {
                "NOT approved"
            },
        );
        write_all(writer, &summary).await?;

        loop {
            write_all(writer, "Approve this campaign? [yes/no]: ").await?;

            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .await
                .map_err(|e| PipelineError::Approval(format!("reading decision: {e}")))?;
            if read == 0 {
                return Ok(ApprovalDecision::Rejected {
                    reason: "input closed before a decision".to_string(),
                });
            }

            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(ApprovalDecision::Approved),
                "n" | "no" => {
                    write_all(writer, "Reason (optional): ").await?;
                    let mut reason = String::new();
                    reader
                        .read_line(&mut reason)
                        .await
                        .map_err(|e| PipelineError::Approval(format!("reading reason: {e}")))?;
                    let reason = reason.trim();
                    return Ok(ApprovalDecision::Rejected {
                        reason: if reason.is_empty() {
                            "rejected by reviewer".to_string()
                        } else {
                            reason.to_string()
                        },
                    });
                }
                _ => continue,
            }
        }
    }
}

async fn write_all<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<(), PipelineError> {
    writer
        .write_all(text.as_bytes())
        .await
        .map_err(|e| PipelineError::Approval(format!("writing prompt: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| PipelineError::Approval(format!("writing prompt: {e}")))
}
