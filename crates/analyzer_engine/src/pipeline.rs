use std::sync::Arc;
use std::time::Duration;

use analyzer_core::{AnalysisKind, AnalysisReport, PageAnswer};
use analyzer_logging::{analyzer_debug, analyzer_info, analyzer_warn};

use crate::channel::MessageChannel;
use crate::client::AnalysisClient;
use crate::orchestrator::{fetch_page_content, DEFAULT_CONTENT_TIMEOUT};
use crate::prompt::{build_prompt, build_question_prompt};
use crate::relay::RelayRequest;
use crate::sanitize::{sanitize, validate};
use crate::{ApiError, PipelineError};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub content_timeout: Duration,
    pub request: RelayRequest,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            content_timeout: DEFAULT_CONTENT_TIMEOUT,
            request: RelayRequest::get_page_content(),
        }
    }
}

/// Acquisition, prompting, model call and validation for one analysis.
#[derive(Clone)]
pub struct AnalysisPipeline {
    channel: Arc<dyn MessageChannel>,
    client: Arc<dyn AnalysisClient>,
    settings: PipelineSettings,
}

impl AnalysisPipeline {
    pub fn new(
        channel: Arc<dyn MessageChannel>,
        client: Arc<dyn AnalysisClient>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            channel,
            client,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs every stage once. No stage is retried.
    pub async fn run(&self, kind: AnalysisKind) -> Result<AnalysisReport, PipelineError> {
        let outcome = self.run_stages(kind).await;
        match &outcome {
            Ok(report) => analyzer_info!("{} of {} succeeded", kind, report.page.url),
            Err(err) => analyzer_warn!("{} failed ({:?}): {}", kind, err.kind(), err),
        }
        outcome
    }

    async fn run_stages(&self, kind: AnalysisKind) -> Result<AnalysisReport, PipelineError> {
        let page = fetch_page_content(
            self.channel.as_ref(),
            &self.settings.request,
            self.settings.content_timeout,
        )
        .await?;

        let prompt = build_prompt(&page, kind);
        analyzer_debug!(
            "Built {} prompt ({} chars) for {}",
            kind,
            prompt.chars().count(),
            page.url
        );

        let raw = self.client.generate_content(&prompt).await?;
        let json = sanitize(&raw);
        let result = validate(&json, kind)?;

        Ok(AnalysisReport { result, page })
    }

    /// Acquires the page and asks the model `question` about it. The answer
    /// is free text and is only trimmed, never validated.
    pub async fn ask(&self, question: &str) -> Result<PageAnswer, PipelineError> {
        let outcome = self.ask_stages(question).await;
        match &outcome {
            Ok(answer) => analyzer_info!("Question about {} answered", answer.page.url),
            Err(err) => analyzer_warn!("Question failed ({:?}): {}", err.kind(), err),
        }
        outcome
    }

    async fn ask_stages(&self, question: &str) -> Result<PageAnswer, PipelineError> {
        let page = fetch_page_content(
            self.channel.as_ref(),
            &self.settings.request,
            self.settings.content_timeout,
        )
        .await?;

        let prompt = build_question_prompt(&page, question);
        analyzer_debug!(
            "Built question prompt ({} chars) for {}",
            prompt.chars().count(),
            page.url
        );

        let raw = self.client.generate_content(&prompt).await?;
        let answer = raw.trim();
        if answer.is_empty() {
            return Err(ApiError::MissingText.into());
        }

        Ok(PageAnswer {
            question: question.to_string(),
            answer: answer.to_string(),
            page,
        })
    }
}
