//! End-to-end runs against the offline stand-in backend.

use std::sync::Arc;

use campaign_forge::agents::ContentAgents;
use campaign_forge::campaign::{CampaignBrief, Channel};
use campaign_forge::context::AgentKind;
use campaign_forge::llm::canned::{DEMO_EMAIL_BODY, DEMO_VARIANTS};
use campaign_forge::llm::{LlmBackend, LlmConfig, select_provider};
use campaign_forge::pipeline::{CampaignOrchestrator, RunOptions};
use campaign_forge::report::render_campaign;
use campaign_forge::store::{CampaignLog, CsvPublisher};

fn acme_brief() -> CampaignBrief {
    CampaignBrief::new("Acme", "Launch X")
        .with_channels([Channel::Email])
        .with_required_phrases("10% off")
        .with_rules(vec!["include unsubscribe link".into()])
}

fn stand_in_orchestrator(log: CampaignLog) -> CampaignOrchestrator {
    let config = LlmConfig {
        backend: LlmBackend::OpenAi,
        api_key: None,
        model: "gpt-4o-mini".to_string(),
    };
    let llm = select_provider(&config).unwrap();
    CampaignOrchestrator::new(ContentAgents::new(llm, 0.0), log)
}

#[tokio::test]
async fn acme_brief_with_stand_in() {
    let dir = tempfile::tempdir().unwrap();
    let log = CampaignLog::new(dir.path().join("memory_store.jsonl"));
    let outcome = stand_in_orchestrator(log.clone())
        .run(&acme_brief(), RunOptions::default())
        .await
        .unwrap();
    let result = &outcome.result;

    assert_eq!(result.content.email.email_body, DEMO_EMAIL_BODY);
    assert!(result.compliance.approved);
    assert!(result.content.email_rewrite.is_none());
    assert_eq!(result.usage.calls[&AgentKind::Email], 1);

    assert_eq!(result.variants_scored.len(), 5);
    assert!(result.variants_scored.iter().all(|v| v.score.is_empty()));
    let order: Vec<_> = result
        .variants_scored
        .iter()
        .map(|v| v.variant.as_str())
        .collect();
    assert_eq!(order, DEMO_VARIANTS);
    assert_eq!(result.final_choice.variant, DEMO_VARIANTS[0]);

    assert!(result.human_approved);
    assert!(outcome.logged);
    assert_eq!(result.usage.model, "canned-demo");
    assert_eq!(result.usage.total_tokens(), 0);
}

#[tokio::test]
async fn logged_result_reads_back_equal() {
    let dir = tempfile::tempdir().unwrap();
    let log = CampaignLog::new(dir.path().join("memory_store.jsonl"));
    let orchestrator = stand_in_orchestrator(log.clone());

    let first = orchestrator
        .run(&acme_brief(), RunOptions::default())
        .await
        .unwrap()
        .result;
    let second = orchestrator
        .run(
            &acme_brief().with_channels([Channel::Twitter, Channel::Linkedin]),
            RunOptions::default(),
        )
        .await
        .unwrap()
        .result;

    let read = log.read_all().await.unwrap();
    assert_eq!(read, vec![first, second.clone()]);
    assert_eq!(log.latest().await.unwrap(), Some(second));
}

#[tokio::test]
async fn fewer_variants_requested() {
    let dir = tempfile::tempdir().unwrap();
    let log = CampaignLog::new(dir.path().join("memory_store.jsonl"));
    let outcome = stand_in_orchestrator(log)
        .run(
            &acme_brief(),
            RunOptions {
                variant_count: 2,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(outcome.result.variants_scored.len(), 2);
    assert_eq!(outcome.result.usage.calls[&AgentKind::Scorer], 2);
}

#[tokio::test]
async fn latest_final_choice_publishes_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let log = CampaignLog::new(dir.path().join("memory_store.jsonl"));
    stand_in_orchestrator(log.clone())
        .run(&acme_brief(), RunOptions::default())
        .await
        .unwrap();

    let latest = log.latest().await.unwrap().unwrap();
    let publisher = CsvPublisher::new(dir.path().join("outgoing_campaign.csv"));
    publisher.publish(&latest.final_choice.variant).unwrap();

    let csv = std::fs::read_to_string(publisher.path()).unwrap();
    assert!(csv.contains(DEMO_VARIANTS[0]));
    assert!(render_campaign(&latest).contains(DEMO_VARIANTS[0]));
}
