use crate::view_model::{self, PanelView};
use crate::{
    AnalysisFailure, AnalysisKind, AnalysisOutcome, AnalysisReport, AnswerOutcome, PageAnswer,
};

/// Monotonic token identifying one pipeline run.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Success(AnalysisReport),
    Answered(PageAnswer),
    Error(AnalysisFailure),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pipeline: PipelineState,
    generation: Generation,
    kind: Option<AnalysisKind>,
    question: Option<String>,
    rejected_requests: u32,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelView {
        view_model::build(self)
    }

    pub fn pipeline(&self) -> &PipelineState {
        &self.pipeline
    }

    /// Generation of the most recent run; 0 before the first one.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn kind(&self) -> Option<AnalysisKind> {
        self.kind
    }

    /// The question behind the current or last run, if it was one.
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn rejected_requests(&self) -> u32 {
        self.rejected_requests
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self.pipeline, PipelineState::Loading)
    }

    pub(crate) fn begin_loading(&mut self, kind: AnalysisKind) -> Generation {
        self.kind = Some(kind);
        self.question = None;
        self.enter_loading()
    }

    pub(crate) fn begin_asking(&mut self, question: String) -> Generation {
        self.kind = None;
        self.question = Some(question);
        self.enter_loading()
    }

    fn enter_loading(&mut self) -> Generation {
        self.generation += 1;
        self.pipeline = PipelineState::Loading;
        self.dirty = true;
        self.generation
    }

    /// Applies a finished run. Returns false when the outcome is stale.
    pub(crate) fn finish(&mut self, generation: Generation, outcome: AnalysisOutcome) -> bool {
        let next = match outcome {
            Ok(report) => PipelineState::Success(report),
            Err(failure) => PipelineState::Error(failure),
        };
        self.settle(generation, next)
    }

    pub(crate) fn finish_answer(&mut self, generation: Generation, outcome: AnswerOutcome) -> bool {
        let next = match outcome {
            Ok(answer) => PipelineState::Answered(answer),
            Err(failure) => PipelineState::Error(failure),
        };
        self.settle(generation, next)
    }

    /// Fails the current run, whatever its generation.
    pub(crate) fn abort(&mut self, failure: AnalysisFailure) -> bool {
        self.settle(self.generation, PipelineState::Error(failure))
    }

    fn settle(&mut self, generation: Generation, next: PipelineState) -> bool {
        if generation != self.generation || !self.is_loading() {
            return false;
        }
        self.pipeline = next;
        self.dirty = true;
        true
    }

    pub(crate) fn reject_request(&mut self) {
        self.rejected_requests += 1;
        self.dirty = true;
    }
}
