use analyzer_core::{AnalysisFailure, ErrorKind};
use thiserror::Error;

use crate::TabId;

/// The page could not be read inside its tab.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("no active tab")]
    NoActiveTab,
    #[error("tab {0} is closed")]
    TabClosed(TabId),
    #[error("document has no accessible body")]
    NoDocument,
    #[error("failed to load {url}: {reason}")]
    LoadFailed { url: String, reason: String },
}

/// Transport-level failure of the message channel itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("no relay is listening")]
    Closed,
    #[error("relay dropped the reply before answering")]
    Dropped,
    #[error("message rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    #[error("no relay response within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("relay error: {0}")]
    Relay(#[from] ChannelError),
    #[error("relay returned no value")]
    EmptyResponse,
    #[error("content extraction failed: {0}")]
    Extraction(String),
    #[error("invalid page content: {0}")]
    InvalidFormat(String),
    #[error("page content too short to analyze ({length} characters)")]
    EmptyContent { length: usize },
}

/// Model output that does not match the contracted result shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("response is not valid JSON: {0}")]
    Parse(String),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `{field}` is {value}, outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("response does not decode: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model request timed out")]
    Timeout,
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model response is malformed: {0}")]
    Malformed(String),
    #[error("model response has no text")]
    MissingText,
}

/// The engine thread has exited; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("analysis engine stopped")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Acquisition(err) => match err {
                AcquisitionError::Timeout { .. } => ErrorKind::Timeout,
                AcquisitionError::Relay(_) => ErrorKind::Relay,
                AcquisitionError::EmptyResponse => ErrorKind::EmptyResponse,
                AcquisitionError::Extraction(_) => ErrorKind::Extraction,
                AcquisitionError::InvalidFormat(_) => ErrorKind::InvalidFormat,
                AcquisitionError::EmptyContent { .. } => ErrorKind::EmptyContent,
            },
            PipelineError::Schema(_) => ErrorKind::SchemaViolation,
            PipelineError::Api(_) => ErrorKind::Api,
        }
    }
}

impl From<PipelineError> for AnalysisFailure {
    fn from(err: PipelineError) -> Self {
        AnalysisFailure::new(err.kind(), err.to_string())
    }
}
