//! forum-participation CLI binary
//!
//! Runs the forum participation page outside a browser: fetch the report
//! from a Survey Tool server and print the container that would be swapped
//! into the page, render a saved payload offline, or show the request URL.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use forum_participation::config::{
    CliOptions, DEFAULT_CONFIG_PATH, expand_path, load_config, parse_text_override,
    resolve_params,
};
use forum_participation::{
    FixedSession, ParticipationReport, ResolvedParams, fetch_participation_page,
    forum_participation_url, make_html_from_json,
};

/// Survey Tool forum participation report: fetch, render, swap.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct RootCli {
    #[command(subcommand)]
    command: Option<CliCommand>,
    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Fetch the report from the server and print the swapped-in container (default).
    Load(LoadArgs),
    /// Render a saved report payload to an HTML fragment.
    Render(RenderArgs),
    /// Print the request URL a load would issue.
    Url,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Config file (default ~/.config/forum-participation/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Survey Tool application root, e.g. `https://st.example.org/cldr-apps/`.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Session id sent as `s=`.
    #[arg(long, global = true)]
    session: Option<String>,
    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Text override as KEY=VALUE (repeatable).
    #[arg(long = "text", global = true, value_parser = parse_text_arg)]
    texts: Vec<(String, String)>,
}

#[derive(Args, Debug, Clone, Default)]
struct LoadArgs {
    /// Write the container to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct RenderArgs {
    /// Report JSON file, or `-` for stdin.
    #[arg(short, long)]
    input: PathBuf,
}

fn parse_text_arg(raw: &str) -> Result<(String, String), String> {
    parse_text_override(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = RootCli::parse();

    let config_path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(|| expand_path(DEFAULT_CONFIG_PATH));
    let config = load_config(&config_path)?;
    let params = resolve_params(&cli.global, config.as_ref())?;

    let level = params
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow!("invalid log level: {}", params.log_level))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Render(args)) => run_render(&params, &args),
        Some(CliCommand::Url) => {
            println!("{}", forum_participation_url(&FixedSession::new(params.session.clone())));
            Ok(())
        }
        Some(CliCommand::Load(args)) => run_load(&params, &args).await,
        None => run_load(&params, &LoadArgs::default()).await,
    }
}

async fn run_load(params: &ResolvedParams, args: &LoadArgs) -> Result<()> {
    tracing::info!(
        base_url = %params.base_url,
        has_session = params.session.is_some(),
        timeout_ms = params.request_timeout.as_millis() as u64,
        "forum participation starting"
    );

    let div = fetch_participation_page(params).await?;
    let html = div.outer_html();

    match &args.output {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = html.len(), "report written");
        }
        None => println!("{html}"),
    }
    Ok(())
}

fn run_render(params: &ResolvedParams, args: &RenderArgs) -> Result<()> {
    let raw = if args.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read report from stdin")?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?
    };

    let report = ParticipationReport::from_json_str(&raw)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    if let Some(err) = report.error_message() {
        return Err(anyhow!("payload carries a server error: {err}"));
    }

    println!("{}", make_html_from_json(&report, &params.text_catalog()));
    Ok(())
}

impl CliOptions for GlobalArgs {
    fn base_url(&self) -> Option<String> {
        self.base_url.clone()
    }
    fn session(&self) -> Option<String> {
        self.session.clone()
    }
    fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }
    fn log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
    fn texts(&self) -> Vec<(String, String)> {
        self.texts.clone()
    }
}
