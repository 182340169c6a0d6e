use crate::{AnalysisKind, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the full pipeline, from extraction to validation, tagged with `generation`.
    RunAnalysis {
        generation: Generation,
        kind: AnalysisKind,
    },
    /// Extract the page and put `question` to the model.
    AnswerQuestion {
        generation: Generation,
        question: String,
    },
}
