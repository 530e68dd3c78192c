//! Command-line front end (`sip`).

use crate::config::Settings;
use crate::error::SearchError;
use crate::report;
use crate::services::{BackendId, BackendRegistry, SearchOrchestrator};
use crate::types::{CaseSensitivity, Query, ResultSet, SearchOptions};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// sip - search in project with grep, ack, ag, pt, rg, git grep or findstr
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Search query
    #[arg(required_unless_present = "backends")]
    pub query: Option<String>,

    /// Directories to search (defaults to the current directory)
    pub roots: Vec<PathBuf>,

    /// Backend: grep, ack, ag, pt, rg, git_grep or findstr (defaults to the best available)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Case-insensitive search
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Case-insensitive unless the query has an uppercase letter
    #[arg(short = 'S', long, conflicts_with = "ignore_case")]
    pub smart_case: bool,

    /// Treat the query as a regular expression
    #[arg(short = 'e', long)]
    pub regex: bool,

    /// Match whole words only
    #[arg(short = 'w', long)]
    pub word: bool,

    /// Path to the backend executable
    #[arg(long, requires = "backend")]
    pub executable: Option<PathBuf>,

    /// Extra argument for the backend (repeatable)
    #[arg(long = "backend-arg", requires = "backend", allow_hyphen_values = true)]
    pub backend_args: Vec<String>,

    /// Maximum characters of line text kept per match
    #[arg(long, conflicts_with = "no_truncate")]
    pub max_text_len: Option<usize>,

    /// Keep full line text
    #[arg(long)]
    pub no_truncate: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Show available search backends information
    #[arg(long)]
    pub backends: bool,
}

impl Cli {
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(name) = &self.backend {
            let id = name.parse::<BackendId>()?;
            settings.backend = Some(id);

            let backend = settings.backend_settings_mut(id);
            backend.executable = self.executable.clone();
            backend.extra_args = self.backend_args.clone();
        }

        if self.no_truncate {
            settings.max_text_len = None;
        } else if let Some(max) = self.max_text_len {
            settings.max_text_len = Some(max);
        }

        Ok(settings)
    }

    pub fn search_query(&self) -> Option<Query> {
        let case = if self.ignore_case {
            CaseSensitivity::Insensitive
        } else if self.smart_case {
            CaseSensitivity::Smart
        } else {
            CaseSensitivity::Sensitive
        };

        self.query
            .as_ref()
            .map(|text| Query::new(text.clone()).with_case(case).with_regex(self.regex))
    }

    fn resolve_roots(&self) -> Result<Vec<PathBuf>> {
        if self.roots.is_empty() {
            let cwd = env::current_dir().context("Failed to determine current directory")?;
            return Ok(vec![cwd]);
        }

        self.roots
            .iter()
            .map(|root| {
                root.canonicalize()
                    .with_context(|| format!("Cannot access search root {}", root.display()))
            })
            .collect()
    }
}

/// CLI実行エントリーポイント
pub async fn run_cli() -> Result<ExitCode> {
    run(Cli::parse()).await
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = cli.settings()?;
    let registry = BackendRegistry::from_settings(&settings);

    // バックエンド情報表示モードの確認
    if cli.backends {
        for (id, available) in registry.availability() {
            println!(
                "{:<8} {:<10} {}",
                id.name(),
                if available { "available" } else { "missing" },
                id.description()
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(query) = cli.search_query() else {
        bail!("a search query is required");
    };
    let roots = cli.resolve_roots()?;
    log::debug!("Search roots: {:?}", roots);

    let backend = match settings.backend {
        Some(id) => id,
        None => match registry.detect_best() {
            Some(id) => id,
            None => bail!("No search backend found; install one of grep, ack, ag, pt, rg or git"),
        },
    };
    let options = settings.search_options(cli.word);

    let orchestrator = SearchOrchestrator::new(registry);

    // Ctrl-C cancels the search in flight
    let interrupted = CancellationToken::new();
    let ctrl_c = {
        let interrupted = interrupted.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.cancel();
            }
        })
    };

    let outcome = search_until_interrupted(
        &orchestrator,
        &query,
        &roots,
        backend,
        &options,
        &interrupted,
    )
    .await;
    ctrl_c.abort();

    let results = outcome.with_context(|| format!("{} search failed", backend))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&results).context("Failed to encode results")?;
        println!("{}", json);
    } else {
        print!("{}", report::render(query.text(), &results));
    }

    Ok(if results.is_empty() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

/// Runs the search, cancelling it once `interrupted` fires.
///
/// The terminal delivers SIGINT to the backend too, so a run that fails after
/// an interrupt is reported as `Cancelled` whatever the tool's exit looked like.
async fn search_until_interrupted(
    orchestrator: &SearchOrchestrator,
    query: &Query,
    roots: &[PathBuf],
    backend: BackendId,
    options: &SearchOptions,
    interrupted: &CancellationToken,
) -> std::result::Result<ResultSet, SearchError> {
    let run = orchestrator.run(query, roots, backend, options);
    tokio::pin!(run);

    // `run` is polled first, so its cancellation token is registered before
    // the interrupt branch can call `cancel()`
    let outcome = tokio::select! {
        biased;
        outcome = &mut run => outcome,
        _ = interrupted.cancelled() => {
            orchestrator.cancel();
            run.await
        }
    };
    settle_interrupted(outcome, interrupted.is_cancelled())
}

fn settle_interrupted(
    outcome: std::result::Result<ResultSet, SearchError>,
    interrupted: bool,
) -> std::result::Result<ResultSet, SearchError> {
    match outcome {
        Err(e) if interrupted && !e.is_cancelled() => {
            log::info!("Search interrupted: {}", e);
            Err(SearchError::Cancelled)
        }
        other => other,
    }
}
