#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use analyzer_engine::{AnalysisClient, ApiError, ChannelError, MessageChannel};
use serde_json::Value;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(analyzer_logging::initialize_for_tests);
}

/// Answers every message with the same canned result.
pub struct FixedChannel {
    reply: Result<Option<Value>, ChannelError>,
    pub sent: Mutex<Vec<Value>>,
}

impl FixedChannel {
    pub fn replying(reply: Value) -> Self {
        Self {
            reply: Ok(Some(reply)),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            reply: Ok(None),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ChannelError) -> Self {
        Self {
            reply: Err(err),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MessageChannel for FixedChannel {
    async fn send(&self, message: Value) -> Result<Option<Value>, ChannelError> {
        self.sent.lock().unwrap().push(message);
        self.reply.clone()
    }
}

/// Never answers.
pub struct SilentChannel;

#[async_trait::async_trait]
impl MessageChannel for SilentChannel {
    async fn send(&self, _message: Value) -> Result<Option<Value>, ChannelError> {
        std::future::pending().await
    }
}

/// Model stand-in that replays scripted answers and records prompts.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    answers: Arc<Mutex<VecDeque<Result<String, ApiError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    pub fn answering(answers: Vec<Result<String, ApiError>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AnalysisClient for ScriptedClient {
    async fn generate_content(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::MissingText))
    }
}

pub const FACT_CHECK_ANSWER: &str = "```json\n{\"credibilityScore\":85,\"claims\":[\"Water boils at 100C at sea level\"],\"sources\":[\"nist.gov\"],\"analysis\":\"Accurate overall.\"}\n```";
