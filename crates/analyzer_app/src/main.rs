mod cli;
mod config;
mod effects;
mod render;
mod session;

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use analyzer_core::{AnalysisKind, Msg, PanelStatus, PipelineState};
use analyzer_engine::{GeminiClient, HttpTabs, InMemoryTabs, ReqwestFetcher};
use analyzer_logging::{analyzer_error, analyzer_info, level_for_verbosity};
use anyhow::Context;
use clap::Parser;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::effects::{EffectRunner, PageTabs};
use crate::session::Session;

fn main() -> ExitCode {
    let cli = Cli::parse();
    analyzer_logging::initialize(&cli.log_destination(), level_for_verbosity(cli.verbose));

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            analyzer_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(&cli.config)?;
    let api_key = cli
        .api_key
        .clone()
        .context("no API key: set GEMINI_API_KEY or pass --api-key")?;

    let request = first_request(cli, &config)?;
    let tabs = open_page(cli, &config)?;
    let client = GeminiClient::new(config.gemini_settings(api_key))?;
    let runner = EffectRunner::new(
        tabs,
        Arc::new(client),
        config.pipeline_settings(cli.timeout_ms),
    )
    .context("starting analysis engine")?;

    let interactive = !cli.json && io::stdin().is_terminal();
    let mut session = Session::new(runner);
    session.dispatch(request);

    let code = loop {
        let json = cli.json;
        let failed = match session.settle(|view| {
            if !json && view.status != PanelStatus::Success {
                eprint!("{}", render::render_text(view));
            }
        }) {
            PipelineState::Success(_) | PipelineState::Answered(_) => break ExitCode::SUCCESS,
            PipelineState::Error(_) => true,
            PipelineState::Idle | PipelineState::Loading => false,
        };

        if failed && interactive && ask_retry()? {
            session.dispatch(Msg::RetryClicked);
        } else {
            break ExitCode::FAILURE;
        }
    };

    if cli.json {
        let value = render::render_json(session.state().pipeline(), chrono::Utc::now());
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if matches!(
        session.state().pipeline(),
        PipelineState::Success(_) | PipelineState::Answered(_)
    ) {
        print!("{}", render::render_text(&session.state().view()));
    }
    session.shutdown();
    Ok(code)
}

fn first_request(cli: &Cli, config: &AppConfig) -> anyhow::Result<Msg> {
    match &cli.ask {
        Some(question) if question.trim().is_empty() => {
            anyhow::bail!("--ask needs a non-empty question")
        }
        Some(question) => Ok(Msg::QuestionAsked(question.clone())),
        None => {
            let kind: AnalysisKind = cli.kind.unwrap_or(config.default_kind).into();
            Ok(Msg::AnalyzeRequested(kind))
        }
    }
}

fn open_page(cli: &Cli, config: &AppConfig) -> anyhow::Result<PageTabs> {
    if let Some(path) = &cli.file {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let url = std::fs::canonicalize(path)
            .map(|full| format!("file://{}", full.display()))
            .unwrap_or_else(|_| path.display().to_string());
        let tabs = InMemoryTabs::new();
        tabs.open(url, html);
        analyzer_info!("Opened local page {:?}", path);
        return Ok(PageTabs::Local(tabs));
    }

    let url = cli.url.as_deref().context("no page to analyze")?;
    let fetcher = ReqwestFetcher::new(config.fetch_settings())?;
    let tabs = HttpTabs::new(fetcher);
    tabs.open(url)?;
    analyzer_info!("Opened {}", url);
    Ok(PageTabs::Http(tabs))
}

fn ask_retry() -> anyhow::Result<bool> {
    eprint!("Retry? [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
