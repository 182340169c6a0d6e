use std::io;
use std::sync::Arc;
use std::time::Duration;

use analyzer_core::{Effect, Msg};
use analyzer_engine::{
    AnalysisClient, AnalysisPipeline, EngineEvent, EngineHandle, EngineStopped, HttpTabs,
    InMemoryTabs, PipelineSettings, Relay, RelayChannel, ReqwestFetcher,
};
use analyzer_logging::{analyzer_info, analyzer_warn};

/// Where the analyzed page lives.
pub enum PageTabs {
    Http(HttpTabs<ReqwestFetcher>),
    Local(InMemoryTabs),
}

/// Turns core effects into engine work and engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        tabs: PageTabs,
        client: Arc<dyn AnalysisClient>,
        settings: PipelineSettings,
    ) -> io::Result<Self> {
        let engine = EngineHandle::new(move || {
            // The relay listener has to be spawned inside the engine runtime.
            let channel = match tabs {
                PageTabs::Http(tabs) => RelayChannel::spawn(Relay::with_document_extractor(tabs)),
                PageTabs::Local(tabs) => RelayChannel::spawn(Relay::with_document_extractor(tabs)),
            };
            AnalysisPipeline::new(Arc::new(channel), client, settings)
        })?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RunAnalysis { generation, kind } => {
                    analyzer_info!("RunAnalysis generation={} kind={}", generation, kind);
                    self.engine.start(generation, kind);
                }
                Effect::AnswerQuestion {
                    generation,
                    question,
                } => {
                    analyzer_info!("AnswerQuestion generation={}", generation);
                    self.engine.ask(generation, question);
                }
            }
        }
    }

    /// Next engine completion as a message, or `Msg::Tick` after `wait`.
    pub fn next_msg(&self, wait: Duration) -> Result<Msg, EngineStopped> {
        let msg = match self.engine.recv_timeout(wait)? {
            Some(EngineEvent::AnalysisCompleted {
                generation,
                outcome,
            }) => {
                if let Err(failure) = &outcome {
                    analyzer_warn!("Analysis generation={} failed: {}", generation, failure);
                }
                Msg::AnalysisFinished {
                    generation,
                    outcome,
                }
            }
            Some(EngineEvent::QuestionAnswered {
                generation,
                outcome,
            }) => {
                if let Err(failure) = &outcome {
                    analyzer_warn!("Question generation={} failed: {}", generation, failure);
                }
                Msg::AnswerFinished {
                    generation,
                    outcome,
                }
            }
            None => Msg::Tick,
        };
        Ok(msg)
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}
