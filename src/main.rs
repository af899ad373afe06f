use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use campaign_forge::agents::ContentAgents;
use campaign_forge::campaign::{CampaignBrief, Channel};
use campaign_forge::config::{AppConfig, read_rules_file};
use campaign_forge::error::Result;
use campaign_forge::llm::select_provider;
use campaign_forge::pipeline::{
    ApprovalDecision, ApprovalGate, AutoApprove, CampaignOrchestrator, PromptApproval, RunOptions,
};
use campaign_forge::report::{render_campaign, render_history_line};
use campaign_forge::store::{CampaignLog, CsvPublisher};

const DEFAULT_RULES: [&str; 2] = ["include unsubscribe link", "no unverified medical claims"];

#[derive(Debug, Parser)]
#[command(name = "campaign-forge", version, about = "Generate marketing campaign copy from a brief")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full pipeline for one brief
    Generate(GenerateArgs),
    /// List logged campaigns, newest last
    History {
        /// Show only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Append the latest logged final choice to the CSV export
    Publish {
        /// CSV file to append to (overrides CAMPAIGN_CSV_PATH)
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Brand name
    #[arg(long)]
    brand: String,

    /// Campaign goal
    #[arg(long)]
    goal: String,

    /// Target channel (repeatable)
    #[arg(long = "channel", value_name = "CHANNEL", default_values_t = [Channel::Email, Channel::Twitter])]
    channels: Vec<Channel>,

    /// Phrases the copy must contain
    #[arg(long, default_value = "")]
    required_phrases: String,

    /// Compliance rule (repeatable)
    #[arg(long = "rule", value_name = "RULE")]
    rules: Vec<String>,

    /// File with one compliance rule per line
    #[arg(long)]
    rules_file: Option<PathBuf>,

    /// Number of variants (overrides CAMPAIGN_VARIANTS)
    #[arg(long)]
    variants: Option<usize>,

    /// Ask for approval before anything is persisted
    #[arg(long)]
    require_approval: bool,
}

/// Stderr logging, plus daily-rolling files when a trace directory is set.
fn init_tracing(trace_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    match trace_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "campaign-forge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let _guard = init_tracing(config.trace_dir.as_ref());

    match cli.command {
        Command::Generate(args) => generate(&config, args).await?,
        Command::History { limit } => history(&config, limit).await?,
        Command::Publish { csv } => publish(&config, csv).await?,
    }
    Ok(())
}

async fn generate(config: &AppConfig, args: GenerateArgs) -> Result<()> {
    let mut rules = args.rules;
    if let Some(path) = &args.rules_file {
        rules.extend(read_rules_file(path).await?);
    }
    if rules.is_empty() {
        rules = DEFAULT_RULES.iter().map(|r| r.to_string()).collect();
    }

    let brief = CampaignBrief::new(args.brand, args.goal)
        .with_channels(args.channels)
        .with_required_phrases(args.required_phrases)
        .with_rules(rules);

    let llm = select_provider(&config.llm)?;

    eprintln!("📣 Campaign Forge v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", llm.model_name());
    eprintln!("   Brand: {}", brief.brand_name);
    let channels: Vec<_> = brief.channels.iter().map(Channel::as_str).collect();
    eprintln!("   Channels: {}", channels.join(", "));
    eprintln!("   Log: {}\n", config.log_path.display());

    let approval: Arc<dyn ApprovalGate> = if args.require_approval {
        Arc::new(PromptApproval::stdio())
    } else {
        Arc::new(AutoApprove)
    };

    let orchestrator = CampaignOrchestrator::new(
        ContentAgents::new(llm, config.temperature),
        CampaignLog::new(&config.log_path),
    )
    .with_approval_gate(approval);

    let options = RunOptions {
        require_human_approval: args.require_approval,
        variant_count: args.variants.unwrap_or(config.variant_count),
    };
    let outcome = orchestrator.run(&brief, options).await?;

    println!("{}", render_campaign(&outcome.result));
    match outcome.decision {
        ApprovalDecision::Approved => {
            eprintln!("Saved to {}", config.log_path.display());
        }
        ApprovalDecision::Rejected { reason } => {
            eprintln!("Rejected ({}); nothing saved", reason);
        }
    }
    Ok(())
}

async fn history(config: &AppConfig, limit: Option<usize>) -> Result<()> {
    let log = CampaignLog::new(&config.log_path);
    let results = log.read_all().await?;
    if results.is_empty() {
        eprintln!("No campaigns logged in {}", log.path().display());
        return Ok(());
    }

    let skip = limit.map_or(0, |n| results.len().saturating_sub(n));
    for result in &results[skip..] {
        println!("{}", render_history_line(result));
    }
    Ok(())
}

async fn publish(config: &AppConfig, csv: Option<PathBuf>) -> Result<()> {
    let log = CampaignLog::new(&config.log_path);
    let Some(latest) = log.latest().await? else {
        eprintln!("No campaigns logged in {}; nothing to publish", log.path().display());
        return Ok(());
    };

    let publisher = CsvPublisher::new(csv.unwrap_or_else(|| config.csv_path.clone()));
    publisher.publish(&latest.final_choice.variant)?;
    eprintln!(
        "Published campaign {} to {}",
        latest.id,
        publisher.path().display()
    );
    Ok(())
}
