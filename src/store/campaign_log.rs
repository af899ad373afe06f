//! Append-only JSON-lines log of approved campaigns.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::campaign::CampaignResult;
use crate::error::StoreError;

/// One JSON object per line; no header, no schema version.
#[derive(Debug, Clone)]
pub struct CampaignLog {
    path: PathBuf,
}

impl CampaignLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Append one result as a single line. The file is opened and closed per call.
    pub async fn append(&self, result: &CampaignResult) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(result)?;
        line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        info!(id = %result.id, path = %self.path.display(), "Campaign appended to log");
        Ok(())
    }

    /// Read every logged result. A missing file reads as empty.
    ///
    /// Any malformed line aborts the whole read. Blank lines are skipped.
    pub async fn read_all(&self) -> Result<Vec<CampaignResult>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut results = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let result =
                serde_json::from_str(line).map_err(|source| StoreError::MalformedLine {
                    path: self.path.display().to_string(),
                    line: index + 1,
                    source,
                })?;
            results.push(result);
        }

        debug!(count = results.len(), path = %self.path.display(), "Read campaign log");
        Ok(results)
    }

    /// The most recently appended result, if any.
    pub async fn latest(&self) -> Result<Option<CampaignResult>, StoreError> {
        Ok(self.read_all().await?.pop())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;
    use crate::campaign::{
        CampaignBrief, Channel, ComplianceResult, ContentBundle, EmailDraft, MessageDraft,
        Persona, QualityScore, ScoredVariant,
    };
    use crate::context::{AgentKind, RunUsage};

    fn sample(body: &str) -> CampaignResult {
        let mut content = ContentBundle {
            email: EmailDraft {
                subject_lines: vec!["One".into(), "Two".into(), "Three".into()],
                preheader: "pre".into(),
                email_body: body.into(),
                raw: None,
            },
            email_rewrite: None,
            sms: MessageDraft {
                messages: vec!["Text STOP to opt out".into()],
                raw: None,
            },
            social: Default::default(),
        };
        content.social.insert(
            Channel::Twitter,
            MessageDraft {
                messages: vec![],
                raw: Some("unparsed".into()),
            },
        );

        let best = ScoredVariant {
            variant: format!("{body} (short)"),
            score: QualityScore {
                readability: Some(8),
                spamminess: Some(2),
                cta_strength: Some(7),
                pass: Some(true),
                raw: None,
            },
        };
        let mut usage = RunUsage {
            model: "gpt-4o-mini".into(),
            input_tokens: 1200,
            output_tokens: 800,
            estimated_cost: dec!(0.00066),
            calls: Default::default(),
        };
        usage.calls.insert(AgentKind::Email, 1);

        CampaignResult {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            brief: CampaignBrief::new("Acme", "Launch X")
                .with_channels([Channel::Email, Channel::Twitter])
                .with_required_phrases("10% off")
                .with_rules(vec!["include unsubscribe link".into()]),
            persona: Persona::default(),
            content,
            compliance: ComplianceResult {
                approved: true,
                ..Default::default()
            },
            variants_scored: vec![best.clone()],
            final_choice: best,
            human_approved: true,
            usage,
        }
    }

    #[tokio::test]
    async fn round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let log = CampaignLog::new(dir.path().join("campaigns.jsonl"));
        let first = sample("First body");
        let second = sample("Second body");

        log.append(&first).await.unwrap();
        log.append(&second).await.unwrap();

        let read = log.read_all().await.unwrap();
        assert_eq!(read, vec![first, second.clone()]);
        assert_eq!(log.latest().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn one_line_per_result() {
        let dir = tempfile::tempdir().unwrap();
        let log = CampaignLog::new(dir.path().join("campaigns.jsonl"));
        log.append(&sample("a")).await.unwrap();
        log.append(&sample("b")).await.unwrap();

        let raw = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = CampaignLog::new(dir.path().join("absent.jsonl"));
        assert!(log.read_all().await.unwrap().is_empty());
        assert!(log.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let log = CampaignLog::new(dir.path().join("nested/deeper/log.jsonl"));
        log.append(&sample("x")).await.unwrap();
        assert_eq!(log.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_line_aborts_read() {
        let dir = tempfile::tempdir().unwrap();
        let log = CampaignLog::new(dir.path().join("campaigns.jsonl"));
        log.append(&sample("good")).await.unwrap();
        let mut raw = std::fs::read_to_string(log.path()).unwrap();
        raw.push_str("{not json}\n");
        std::fs::write(log.path(), raw).unwrap();

        let err = log.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::MalformedLine { line: 2, .. }));
    }
}
