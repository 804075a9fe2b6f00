mod commands;
mod config;
mod display;
mod error;
mod github;

use clap::Parser;
use commands::RunSummary;
use config::{load_file_config, merge_config, EnvConfig, FlagConfig};
use error::{GithubVulError, Result};
use github::GithubClient;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "github-vul",
    version,
    about = "Enable or disable vulnerability alerts and automated security fixes across a GitHub org",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    flags: FlagConfig,

    /// Output the summary as JSON
    #[arg(long)]
    json: bool,

    /// Show verbose output (every API request)
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let result = execute(&cli).await;
    report_outcome(result, cli.json, |e| {
        display::error(&e.to_string());
        std::process::exit(1);
    });
}

async fn execute(cli: &Cli) -> Result<RunSummary> {
    let file = load_file_config()?;
    let config = merge_config(&cli.flags, &EnvConfig::from_env(), &file);

    if config.token.is_none() {
        display::warn("No GitHub token configured; requests are unauthenticated.");
    }

    let client = GithubClient::new(config.token.as_deref(), &config.api_url, config.dry)?;
    commands::run(&client, &config).await
}

/// Renders a successful run, or hands the error to `on_failure`.
fn report_outcome(
    result: Result<RunSummary>,
    json: bool,
    on_failure: impl FnOnce(&GithubVulError),
) {
    match result {
        Ok(summary) => display::output(json, &summary, render_summary),
        Err(e) => {
            if let Some(updated) = e.partial_count() {
                tracing::warn!(updated, "aborted after updating some repositories");
            }
            on_failure(&e);
        }
    }
}

fn render_summary(summary: &RunSummary) {
    let title = if summary.dry_run {
        "Summary (dry run)"
    } else {
        "Summary"
    };
    display::section_header(title);

    let table = display::summary_table(
        &["Org", "Repositories", "Alerts updated", "Fixes updated"],
        vec![
            summary.org.clone(),
            summary.repositories.to_string(),
            summary.alerts_updated.to_string(),
            summary.fixes_updated.to_string(),
        ],
    );
    println!("{table}");
}
