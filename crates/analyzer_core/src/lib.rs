//! Analyzer core: data model and the pure analysis state machine.
//!
//! The machine drives two kinds of run over the same lifecycle: a typed
//! analysis and a free-form question about the page.
mod effect;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    AnalysisFailure, AnalysisKind, AnalysisReport, AnalysisResult, ConflictAnalysis, ErrorKind,
    FactCheckResult, PageAnswer, PageContent, PeaceImpactResult,
};
pub use msg::{AnalysisOutcome, AnswerOutcome, Msg};
pub use state::{AppState, Generation, PipelineState};
pub use update::update;
pub use view_model::{PanelStatus, PanelView};
