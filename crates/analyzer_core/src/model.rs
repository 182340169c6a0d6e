use std::fmt;

use serde::{Deserialize, Serialize};

/// Text and metadata of one page, as acquired from the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    #[default]
    Conflict,
    FactCheck,
    PeaceImpact,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::Conflict,
        AnalysisKind::FactCheck,
        AnalysisKind::PeaceImpact,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::Conflict => "Conflict analysis",
            AnalysisKind::FactCheck => "Fact check",
            AnalysisKind::PeaceImpact => "Peace impact",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictAnalysis {
    pub conflict_presence: bool,
    pub key_points: Vec<String>,
    /// Source credibility, 0..=10.
    pub credibility: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckResult {
    /// 0..=100.
    pub credibility_score: f64,
    pub claims: Vec<String>,
    pub sources: Vec<String>,
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeaceImpactResult {
    /// 0..=100, higher is more constructive.
    pub peace_impact_score: f64,
    /// 0..=100.
    pub escalation_risk: f64,
    pub constructive_elements: Vec<String>,
    pub divisive_elements: Vec<String>,
    pub summary: String,
}

/// Validated model output, tagged by the analysis kind that requested it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "kebab-case")]
pub enum AnalysisResult {
    Conflict(ConflictAnalysis),
    FactCheck(FactCheckResult),
    PeaceImpact(PeaceImpactResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Conflict(_) => AnalysisKind::Conflict,
            AnalysisResult::FactCheck(_) => AnalysisKind::FactCheck,
            AnalysisResult::PeaceImpact(_) => AnalysisKind::PeaceImpact,
        }
    }
}

/// A successful pipeline run: the validated result and the page it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub page: PageContent,
}

/// A free-form question about the page and the model's plain-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageAnswer {
    pub question: String,
    pub answer: String,
    pub page: PageContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Extraction,
    Relay,
    Timeout,
    EmptyResponse,
    EmptyContent,
    InvalidFormat,
    SchemaViolation,
    Api,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Extraction => "page content could not be extracted",
            ErrorKind::Relay => "relay unavailable",
            ErrorKind::Timeout => "timed out",
            ErrorKind::EmptyResponse => "empty relay response",
            ErrorKind::EmptyContent => "not enough content to analyze",
            ErrorKind::InvalidFormat => "invalid page content format",
            ErrorKind::SchemaViolation => "malformed model response",
            ErrorKind::Api => "model request failed",
        };
        f.write_str(text)
    }
}

/// A failed pipeline run as the state machine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl AnalysisFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
