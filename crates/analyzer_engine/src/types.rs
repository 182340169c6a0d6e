use analyzer_core::{AnalysisOutcome, AnswerOutcome, Generation};

pub type TabId = u32;

/// Raw document of one tab, as the privileged context sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDocument {
    pub url: String,
    pub html: String,
}

/// Visible text and metadata read out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub text: String,
    pub url: String,
    pub title: String,
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    AnalysisCompleted {
        generation: Generation,
        outcome: AnalysisOutcome,
    },
    QuestionAnswered {
        generation: Generation,
        outcome: AnswerOutcome,
    },
}
