//! clearclaim - multi-agent auto insurance claim processing CLI
//!
//! ## Commands
//!
//! - `process`: Run one claim through the full agent pipeline
//! - `providers`: List the supported reasoning-engine providers
//! - `agents`: Show the agent roster and tool grants

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use clearclaim_core::{
    AgentKind, ClaimFacts, ClaimRun, ClaimWorkflow, Provider, Roster, Settings, VerdictStatus,
};

#[derive(Parser)]
#[command(name = "clearclaim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-agent auto insurance claim processing", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one claim through all nine specialists and the decider
    Process {
        /// Path to the claim facts file (JSON)
        claim: PathBuf,

        /// Reasoning-engine provider (openai, anthropic, google, groq)
        #[arg(short, long, env = "CLEARCLAIM_PROVIDER")]
        provider: Option<Provider>,

        /// Model override (default: the provider's default model)
        #[arg(short, long)]
        model: Option<String>,

        /// Run all specialists concurrently instead of paced-sequentially
        #[arg(long)]
        concurrent: bool,

        /// Decide via the deterministic hierarchy only, skipping the
        /// ClaimDecider reasoning call
        #[arg(long)]
        no_reasoned_decision: bool,

        /// Emit the full run record as JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },

    /// List supported providers, their default models, and pacing
    Providers,

    /// Show the agent roster, role summaries, and tool grants
    Agents,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    clearclaim_core::init_tracing(cli.json_logs, level);

    match cli.command {
        Commands::Process {
            claim,
            provider,
            model,
            concurrent,
            no_reasoned_decision,
            json,
        } => {
            cmd_process(
                &claim,
                provider,
                model,
                concurrent,
                no_reasoned_decision,
                json,
            )
            .await
        }
        Commands::Providers => cmd_providers(),
        Commands::Agents => cmd_agents(),
    }
}

/// Run one claim end to end and print the outcome.
async fn cmd_process(
    claim_path: &PathBuf,
    provider: Option<Provider>,
    model: Option<String>,
    concurrent: bool,
    no_reasoned_decision: bool,
    json: bool,
) -> Result<()> {
    let facts = read_claim(claim_path)?;

    let mut settings = Settings::from_env();
    if let Some(provider) = provider {
        settings.provider = provider;
    }
    if model.is_some() {
        settings.model = model;
    }
    if concurrent {
        settings.execution = Settings::execution_mode(settings.provider, true, None);
    }
    if no_reasoned_decision {
        settings.skip_reasoned_decision = true;
    }

    info!(
        claim_id = %facts.claim_id,
        provider = %settings.provider,
        model = settings.resolved_model(),
        "processing claim"
    );

    let workflow = ClaimWorkflow::with_http_engine(settings)
        .context("failed to build the reasoning engine")?;
    let run = workflow
        .run(facts)
        .await
        .context("claim processing failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        println!("{}", render_run_text(&run));
    }

    // Non-approved dispositions are still a successful exit: the pipeline
    // completed and rendered a decision.
    Ok(())
}

fn read_claim(path: &PathBuf) -> Result<ClaimFacts> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read claim file: {:?}", path))?;
    let facts: ClaimFacts =
        serde_json::from_str(&content).with_context(|| format!("Invalid claim JSON in {:?}", path))?;
    facts
        .validate()
        .with_context(|| format!("Claim in {:?} failed validation", path))?;
    Ok(facts)
}

fn status_marker(status: VerdictStatus) -> &'static str {
    match status {
        VerdictStatus::Approved => "✓",
        VerdictStatus::Rejected => "✗",
        VerdictStatus::Partial => "◐",
        VerdictStatus::Escalate => "!",
    }
}

fn render_run_text(run: &ClaimRun) -> String {
    let mut out = String::new();
    out.push_str(&format!("Claim: {}\n", run.claim_facts.claim_id));
    out.push_str(&format!("Run:   {}\n", run.run_id));
    out.push_str(&format!("Facts digest: {}\n", run.facts_digest));
    out.push('\n');

    for verdict in &run.verdict_sequence {
        out.push_str(&format!(
            "  {} {:<24} {:<9} {}\n",
            status_marker(verdict.status),
            verdict.agent,
            verdict.status,
            verdict.reason
        ));
    }

    if let Some(decision) = &run.final_decision {
        out.push('\n');
        out.push_str(&format!(
            "Decision: {} ({})\n",
            decision.status, decision.reason
        ));
        out.push_str(&format!("  {}\n", decision.explanation));
    }

    out.push_str(&format!("Completed in {}ms", run.duration_ms));
    out
}

/// List supported providers
fn cmd_providers() -> Result<()> {
    println!("{}", render_providers());
    Ok(())
}

fn render_providers() -> String {
    let mut out = String::new();
    out.push_str("Supported Providers\n");
    out.push_str("===================\n");

    for provider in Provider::ALL {
        let credential = std::env::var(provider.credential_env()).is_ok();
        out.push_str(&format!(
            "\n{} ({})\n",
            provider.display_name(),
            provider
        ));
        out.push_str(&format!("  default model: {}\n", provider.default_model()));
        out.push_str(&format!(
            "  pacing delay:  {}ms\n",
            provider.inter_call_delay().as_millis()
        ));
        out.push_str(&format!(
            "  credential:    {} ({})\n",
            provider.credential_env(),
            if credential { "set" } else { "not set" }
        ));
    }

    out.trim_end().to_string()
}

/// Show the agent roster
fn cmd_agents() -> Result<()> {
    println!("{}", render_agents(&Roster::load(None)));
    Ok(())
}

fn render_agents(roster: &Roster) -> String {
    let mut out = String::new();
    out.push_str("Agent Roster\n");
    out.push_str("============\n");

    for (index, contract) in roster.specialists.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n",
            index + 1,
            contract.kind.name()
        ));
        out.push_str(&format!("   {}\n", contract.kind.role_summary()));
        if contract.tools.is_empty() {
            out.push_str("   tools: (none)\n");
        } else {
            let names: Vec<&str> = contract.tools.iter().map(|t| t.name()).collect();
            out.push_str(&format!("   tools: {}\n", names.join(", ")));
        }
    }

    out.push_str(&format!("\nDecider: {}\n", roster.decider.kind.name()));
    out.push_str(&format!("   {}\n", roster.decider.kind.role_summary()));
    out.push_str("   Applies REJECTED > ESCALATE > PARTIAL > APPROVED over all verdicts");
    out
}
