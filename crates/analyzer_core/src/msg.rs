use crate::{AnalysisFailure, AnalysisKind, AnalysisReport, Generation, PageAnswer};

pub type AnalysisOutcome = Result<AnalysisReport, AnalysisFailure>;
pub type AnswerOutcome = Result<PageAnswer, AnalysisFailure>;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked for an analysis of the active tab.
    AnalyzeRequested(AnalysisKind),
    /// User asked a question about the active tab.
    QuestionAsked(String),
    /// User clicked Retry on the error panel.
    RetryClicked,
    /// Engine finished a pipeline run.
    AnalysisFinished {
        generation: Generation,
        outcome: AnalysisOutcome,
    },
    /// Engine answered a question.
    AnswerFinished {
        generation: Generation,
        outcome: AnswerOutcome,
    },
    /// The engine went away; the current run can never finish.
    RunAborted(AnalysisFailure),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
