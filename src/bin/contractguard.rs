//! CLI binary for contractguard.
//!
//! A thin shim over the library crate: `serve` runs the HTTP service,
//! `analyze` runs the same pipeline on a local file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contractguard::{render_text_report, serve, Analyzer, AnalyzerConfig, UploadedArtifact};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the HTTP service (POST/GET /api/analyze)
  contractguard serve --bind 127.0.0.1:3000

  # Analyse a local contract and print a text report
  contractguard analyze subcontract.txt

  # Same, as JSON written to a file
  contractguard analyze subcontract.txt --json -o analysis.json

  # Upload through the running service
  curl -F contract=@subcontract.txt;type=text/plain http://127.0.0.1:3000/api/analyze

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY             Completion service credential (required per request)
  CONTRACTGUARD_MODEL        Model ID (default: gpt-4o-mini)
  CONTRACTGUARD_API_BASE     OpenAI-compatible base URL (default: https://api.openai.com/v1)
  CONTRACTGUARD_API_TIMEOUT  Completion timeout in seconds (default: 60)
  CONTRACTGUARD_BIND         Server bind address (default: 0.0.0.0:3000)

A .env file in the working directory is read first if present.
"#;

/// Analyse contracts for risk with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "contractguard",
    version,
    about = "Analyse plain-text contracts for risk using an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CONTRACTGUARD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CONTRACTGUARD_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP analysis service.
    Serve {
        /// Address to bind, overriding CONTRACTGUARD_BIND.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Analyse a local plain-text contract.
    Analyze {
        /// Path to a .txt contract.
        file: PathBuf,

        /// Print the analysis object as JSON instead of a text report.
        #[arg(long)]
        json: bool,

        /// Write output to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        match cli.command {
            // The spinner covers progress for one-shot analysis.
            Command::Analyze { .. } => "warn",
            Command::Serve { .. } => "info",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = AnalyzerConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind_addr);
            if config.api_key.is_none() {
                tracing::warn!("OPENAI_API_KEY is not set; every analysis will fail with 500");
            }
            let analyzer = Analyzer::new(config).context("Failed to build analyzer")?;
            serve(analyzer, addr).await.context("Server error")?;
        }
        Command::Analyze { file, json, output } => {
            let upload = read_upload(&file).await?;
            let analyzer = Analyzer::new(config).context("Failed to build analyzer")?;

            let spinner = (!cli.quiet && !json).then(|| start_spinner(&file));
            let outcome = analyzer.analyze(Some(upload)).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            let result = outcome.map_err(|e| {
                anyhow::anyhow!("{} ({})", e.user_message(), e)
            })?;

            let rendered = if json {
                serde_json::to_string_pretty(&result).context("Failed to serialise result")?
            } else {
                render_text_report(&result)
            };

            match output {
                Some(path) => tokio::fs::write(&path, rendered.as_bytes())
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(rendered.as_bytes())?;
                    if !rendered.ends_with('\n') {
                        stdout.write_all(b"\n")?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Read a local file as an upload, declaring `text/plain` only for `.txt`.
async fn read_upload(path: &Path) -> Result<UploadedArtifact> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadedArtifact::new(filename, media_type_for(path), bytes))
}

fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn start_spinner(file: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    spinner.set_message(format!("Analysing {}…", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
