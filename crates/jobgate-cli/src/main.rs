//! jobgate CLI
//!
//! Gates a CI pipeline on a group of sibling jobs in one workflow run. The
//! group is every job whose name matches `--pattern`; the gate passes as soon
//! as any of them succeeds and fails once all of them have failed.
//!
//! Exit codes: `0` when the group succeeded, `1` for every other outcome.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};

use jobgate_core::{GateConfig, GateError, GateInputs, GateOutcome, Verdict, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(name = "jobgate")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "OR gate over a group of jobs in a CI workflow run", long_about = None)]
struct Cli {
    /// Regular expression selecting the gated jobs by name (unanchored)
    #[arg(short, long, env = "JOBGATE_PATTERN", default_value = "")]
    pattern: String,

    /// Root URL of the jobs API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Repository owner
    #[arg(long, env = "JOBGATE_OWNER", default_value = "")]
    owner: String,

    /// Repository name
    #[arg(long, env = "JOBGATE_REPO", default_value = "")]
    repo: String,

    /// Workflow run whose jobs are gated
    #[arg(long, env = "GITHUB_RUN_ID", default_value = "")]
    run_id: String,

    /// API token sent as a bearer credential
    #[arg(long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Evaluations allowed while matched jobs are still pending
    #[arg(long, env = "JOBGATE_OUTER_RETRY_LIMIT", default_value = "60")]
    outer_retry_limit: String,

    /// Seconds between evaluations
    #[arg(long, env = "JOBGATE_OUTER_RETRY_DELAY", default_value = "300")]
    outer_retry_delay: String,

    /// Fetch attempts allowed while no job matches the pattern
    #[arg(long, env = "JOBGATE_INNER_RETRY_LIMIT", default_value = "12")]
    inner_retry_limit: String,

    /// Seconds between fetch attempts
    #[arg(long, env = "JOBGATE_INNER_RETRY_DELAY", default_value = "300")]
    inner_retry_delay: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn inputs(&self) -> GateInputs {
        GateInputs {
            pattern: self.pattern.clone(),
            base_url: self.base_url.clone(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            run_id: self.run_id.clone(),
            auth_token: self.token.clone(),
            outer_retry_limit: self.outer_retry_limit.clone(),
            outer_retry_delay_secs: self.outer_retry_delay.clone(),
            inner_retry_limit: self.inner_retry_limit.clone(),
            inner_retry_delay_secs: self.inner_retry_delay.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    if let Err(e) = jobgate_core::init_tracing(cli.json, level, cli.log_file.as_deref()) {
        eprintln!("jobgate: failed to open log file: {e}");
        return ExitCode::FAILURE;
    }

    match cmd_gate(&cli).await {
        Ok(outcome) => {
            report(&outcome);
            ExitCode::from(outcome.exit_code() as u8)
        }
        Err(err) => {
            let stage = err
                .downcast_ref::<GateError>()
                .map(GateError::stage)
                .unwrap_or("startup");
            error!(stage, "{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Validate the configuration and run the gate until a terminal verdict.
async fn cmd_gate(cli: &Cli) -> Result<GateOutcome> {
    let config = GateConfig::from_inputs(&cli.inputs()).context("Invalid configuration")?;

    info!(
        owner = %config.identity.owner,
        repo = %config.identity.repo,
        run_id = %config.identity.run_id,
        pattern = %config.pattern,
        "Gating workflow run"
    );

    let scheduler = config
        .into_scheduler()
        .context("Failed to create jobs API client")?;

    tokio::select! {
        result = scheduler.run() => Ok(result?),
        _ = tokio::signal::ctrl_c() => Err(GateError::Interrupted.into()),
    }
}

fn report(outcome: &GateOutcome) {
    for job in &outcome.matched {
        info!(job = %job.name, state = %job.state_label(), "Matched job");
    }
    match outcome.verdict {
        Verdict::Success => info!(
            attempts = outcome.outer_attempts,
            "Gate passed: {}", outcome.classification
        ),
        _ => error!(
            attempts = outcome.outer_attempts,
            "Gate failed: {}", outcome.classification
        ),
    }
}
