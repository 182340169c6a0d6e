//! Analyzer engine: content acquisition, prompting, model calls and validation.
mod channel;
mod client;
mod decode;
mod engine;
mod error;
mod extract;
mod fetch;
mod orchestrator;
mod pipeline;
mod prompt;
mod relay;
mod sanitize;
mod schema;
mod tabs;
mod types;

pub use channel::{MessageChannel, RelayChannel};
pub use client::{AnalysisClient, GeminiClient, GeminiSettings};
pub use decode::decode_document;
pub use engine::EngineHandle;
pub use error::{
    AcquisitionError, ApiError, ChannelError, EngineStopped, ExtractionFailure, PipelineError,
    SchemaViolation,
};
pub use extract::{ContentExtractor, DocumentExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use orchestrator::{fetch_page_content, DEFAULT_CONTENT_TIMEOUT, MIN_CONTENT_CHARS};
pub use pipeline::{AnalysisPipeline, PipelineSettings};
pub use prompt::{
    build_prompt, build_question_prompt, content_limit, render_contract, truncate_chars,
    QUESTION_CONTENT_LIMIT,
};
pub use relay::{error_reply, AnalyzeReply, PageMetadata, Relay, RelayAction, RelayRequest};
pub use sanitize::{sanitize, validate};
pub use schema::{schema_for, FieldSpec, FieldType};
pub use tabs::{HttpTabs, InMemoryTabs, TabProvider};
pub use types::{EngineEvent, ExtractedPage, TabDocument, TabId};
