use std::path::PathBuf;

use analyzer_core::AnalysisKind;
use analyzer_logging::LogDestination;
use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "analyzer.ron";
pub const DEFAULT_LOG_PATH: &str = "analyzer.log";

#[derive(Parser, Debug)]
#[command(
    name = "page-analyzer",
    version,
    about = "Analyze a web page with a generative model"
)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
pub struct Cli {
    #[arg(help = "Page to analyze (http or https)")]
    pub url: Option<String>,
    #[arg(long, help = "Analyze a local HTML file instead of a URL")]
    pub file: Option<PathBuf>,
    #[arg(long, value_enum, help = "Analysis to run (defaults to the configured kind)")]
    pub kind: Option<KindArg>,
    #[arg(
        long,
        value_name = "QUESTION",
        conflicts_with = "kind",
        help = "Ask a question about the page instead of running an analysis"
    )]
    pub ask: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, help = "RON configuration file")]
    pub config: PathBuf,
    #[arg(long, help = "Override the page content timeout in milliseconds")]
    pub timeout_ms: Option<u64>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
    #[arg(short, long, action = ArgAction::Count, help = "Raise log verbosity (repeatable)")]
    pub verbose: u8,
    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(PathBuf::from(DEFAULT_LOG_PATH)),
            LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }
}

/// Analysis kind as spelled on the command line and in the config file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum KindArg {
    Conflict,
    FactCheck,
    PeaceImpact,
}

impl From<KindArg> for AnalysisKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Conflict => AnalysisKind::Conflict,
            KindArg::FactCheck => AnalysisKind::FactCheck,
            KindArg::PeaceImpact => AnalysisKind::PeaceImpact,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}
