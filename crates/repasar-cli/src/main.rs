//! Repasador: command-line entry point for the quiz-app UI walkthrough.
//!
//! ## Usage
//!
//! ```bash
//! repasador                              # walk http://localhost:3002, write ./verification
//! repasador --url http://localhost:3000  # different target
//! repasador --report report.json         # also write the run report as JSON
//! ```
//!
//! The defaults reproduce the canonical verification run; flags exist for
//! pointing the runner at a different instance or output location. Skipped
//! milestones do not fail the process; only an unlaunchable browser or an
//! unreachable target does.

use clap::Parser;
use console::style;
use repasar::{
    default_questions, Browser, BrowserConfig, RepasarResult, RunReport, StepStatus, WaitOptions,
    Walkthrough, WalkthroughConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Walk a running quiz web app and capture milestone screenshots
#[derive(Debug, Parser)]
#[command(name = "repasador", version, about)]
struct Cli {
    /// Target application URL
    #[arg(long, default_value = "http://localhost:3002")]
    url: String,

    /// Directory receiving the screenshot artifacts
    #[arg(long, default_value = "verification")]
    out_dir: PathBuf,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Path to a chromium binary (auto-detected when omitted)
    #[arg(long)]
    chromium: Option<String>,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    no_sandbox: bool,

    /// Element readiness timeout in milliseconds
    #[arg(long, default_value_t = 5_000)]
    timeout_ms: u64,

    /// Also write the run report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logs below error
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(report) => {
            render_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> RepasarResult<RunReport> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(execute(cli))
}

async fn execute(cli: Cli) -> RepasarResult<RunReport> {
    let mut browser_config = BrowserConfig::default().with_headless(!cli.headed);
    if let Some(ref path) = cli.chromium {
        browser_config = browser_config.with_chromium_path(path);
    }
    if cli.no_sandbox {
        browser_config = browser_config.with_no_sandbox();
    }

    let walkthrough = Walkthrough::new(WalkthroughConfig {
        base_url: cli.url,
        output_dir: cli.out_dir,
        wait: WaitOptions::new().with_timeout(cli.timeout_ms),
        questions: default_questions(),
    });

    let browser = Browser::launch(browser_config).await?;
    let mut page = match browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            let _ = browser.close().await;
            return Err(e);
        }
    };

    let result = walkthrough.run(&mut page).await;

    // The browser is released whether or not the walkthrough survived.
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "browser close failed");
    }
    let report = result?;

    if let Some(ref path) = cli.report {
        std::fs::write(path, serde_json::to_vec_pretty(&report)?)?;
        tracing::info!(report = %path.display(), "run report written");
    }

    Ok(report)
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn render_report(report: &RunReport) {
    for step in &report.steps {
        let tag = match step.status {
            StepStatus::Captured => style("captured").green(),
            StepStatus::Skipped => style("skipped ").yellow(),
            StepStatus::Failed => style("failed  ").red(),
        };
        let detail = step
            .detail
            .as_ref()
            .map(|d| format!(" - {d}"))
            .unwrap_or_default();
        println!(
            "{:<22} {} {} artifact(s){}",
            step.name,
            tag,
            step.artifacts.len(),
            detail
        );
    }
    println!(
        "\n{} captured, {} skipped, {} failed, {} artifact(s)",
        report.captured(),
        report.skipped(),
        report.failed(),
        report.artifacts().len()
    );
}
