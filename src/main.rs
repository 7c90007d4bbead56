use anyhow::Context;
use clap::Parser;
use docsearch::cli::{Cli, Commands};
use docsearch::config::EngineConfig;
use docsearch::item::ItemKind;
use docsearch::search::SearchOptions;
use docsearch::server::SearchServer;
use docsearch::state::SearchState;
use docsearch::tools::format_search_results;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line payloads win; otherwise fall back to the config's list.
fn payload_paths(cli_paths: Vec<PathBuf>, config: &EngineConfig) -> Vec<PathBuf> {
    if cli_paths.is_empty() {
        config.payloads.clone()
    } else {
        cli_paths
    }
}

fn run_query(
    state: &SearchState,
    text: &str,
    limit: Option<usize>,
    package: Option<&str>,
    kinds: &[ItemKind],
    json: bool,
) -> anyhow::Result<()> {
    let corpus = state.handle().current()?;
    let mut options = SearchOptions::new(text, state.config().limit(limit)).of_kinds(kinds);
    if let Some(package) = package {
        options = options.in_package(package);
    }

    let hits = corpus.search(&options);
    if json {
        for hit in &hits {
            println!("{}", serde_json::to_string(hit).context("Failed to serialize hit")?);
        }
    } else if hits.is_empty() {
        println!("No results found for '{}'", text);
    } else {
        print!("{}", format_search_results(&hits, text, package));
    }
    Ok(())
}

async fn serve(state: Arc<SearchState>) -> anyhow::Result<()> {
    tracing::info!("Starting docsearch MCP server");

    let server = SearchServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsearch::tracing::init(cli.log_format);

    let config = EngineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Query {
            text,
            payloads,
            limit,
            package,
            kinds,
            json,
        } => {
            let paths = payload_paths(payloads.payloads, &config);
            anyhow::ensure!(
                !paths.is_empty(),
                "No payload files given and none configured"
            );

            let state = SearchState::new(config);
            let report = state.load(paths).await?;
            if !report.is_clean() {
                eprint!("{report}");
            }
            run_query(&state, &text, limit, package.as_deref(), &kinds, json)
        }
        Commands::Serve { payloads } => {
            let paths = payload_paths(payloads.payloads, &config);
            let state = Arc::new(SearchState::new(config));

            if paths.is_empty() {
                tracing::warn!("No payload files configured; use the reload tool to load some");
            } else {
                let report = state.load(paths).await?;
                tracing::info!("{}", report.to_string().trim_end());
            }
            serve(state).await
        }
    }
}
