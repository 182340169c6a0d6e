use analyzer_core::PageContent;
use analyzer_logging::{analyzer_debug, analyzer_warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::extract::{ContentExtractor, DocumentExtractor};
use crate::tabs::TabProvider;
use crate::{ExtractedPage, ExtractionFailure, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelayAction {
    GetPageContent,
    AnalyzePageContent,
}

/// `{ "action": "getPageContent" | "analyzePageContent", "tabId"?: n }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub action: RelayAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
}

impl RelayRequest {
    pub fn get_page_content() -> Self {
        Self {
            action: RelayAction::GetPageContent,
            tab_id: None,
        }
    }

    pub fn analyze_page_content(tab_id: Option<TabId>) -> Self {
        Self {
            action: RelayAction::AnalyzePageContent,
            tab_id,
        }
    }

    pub fn to_message(&self) -> Value {
        let mut message = json!({ "action": self.action });
        if let Some(tab_id) = self.tab_id {
            message["tabId"] = json!(tab_id);
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
    pub keywords: String,
}

/// Reply to `analyzePageContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReply {
    pub text_content: String,
    pub metadata: PageMetadata,
}

pub fn error_reply(message: impl Into<String>) -> Value {
    serde_json::json!({ "error": message.into() })
}

/// Privileged side of the message protocol: resolves the tab, runs the
/// extractor in it and answers with page content or `{ error }`.
pub struct Relay<T, E = DocumentExtractor> {
    tabs: T,
    extractor: E,
}

impl<T: TabProvider> Relay<T> {
    pub fn with_document_extractor(tabs: T) -> Self {
        Self::new(tabs, DocumentExtractor)
    }
}

impl<T: TabProvider, E: ContentExtractor> Relay<T, E> {
    pub fn new(tabs: T, extractor: E) -> Self {
        Self { tabs, extractor }
    }

    pub fn tabs(&self) -> &T {
        &self.tabs
    }

    /// Handles one message. Never fails: extraction problems become `{ error }`.
    pub async fn handle(&self, message: Value) -> Value {
        let request: RelayRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(err) => {
                analyzer_warn!("Relay received malformed request: {}", err);
                return error_reply(format!("malformed request: {err}"));
            }
        };

        let page = match self.extract(request.tab_id).await {
            Ok(page) => page,
            Err(failure) => {
                analyzer_warn!("Relay extraction failed: {}", failure);
                return error_reply(failure.to_string());
            }
        };
        analyzer_debug!(
            "Relay extracted {} chars from {} for {:?}",
            page.text.chars().count(),
            page.url,
            request.action
        );

        match request.action {
            RelayAction::GetPageContent => {
                let content = PageContent {
                    url: page.url,
                    title: page.title,
                    content: page.text,
                    keywords: (!page.keywords.is_empty()).then_some(page.keywords),
                };
                serde_json::to_value(content).unwrap_or_else(|err| error_reply(err.to_string()))
            }
            RelayAction::AnalyzePageContent => {
                let reply = AnalyzeReply {
                    text_content: page.text,
                    metadata: PageMetadata {
                        url: page.url,
                        title: page.title,
                        keywords: page.keywords,
                    },
                };
                serde_json::to_value(reply).unwrap_or_else(|err| error_reply(err.to_string()))
            }
        }
    }

    async fn extract(&self, tab_id: Option<TabId>) -> Result<ExtractedPage, ExtractionFailure> {
        let tab_id = match tab_id {
            Some(id) => id,
            None => self
                .tabs
                .active_tab()
                .await
                .ok_or(ExtractionFailure::NoActiveTab)?,
        };
        let document = self.tabs.load(tab_id).await?;
        self.extractor.extract(&document)
    }
}
