use std::time::Duration;

use analyzer_core::{update, AnalysisFailure, AppState, ErrorKind, Msg, PanelView, PipelineState};
use analyzer_logging::analyzer_error;

use crate::effects::EffectRunner;

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// One panel session: the state machine plus the runner executing its effects.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Pumps engine messages until the pipeline leaves `Loading`, calling
    /// `on_change` with each dirty view.
    pub fn settle(&mut self, mut on_change: impl FnMut(&PanelView)) -> &PipelineState {
        self.flush(&mut on_change);
        while matches!(self.state.pipeline(), PipelineState::Loading) {
            let msg = match self.runner.next_msg(TICK_INTERVAL) {
                Ok(msg) => msg,
                Err(stopped) => {
                    analyzer_error!("{}", stopped);
                    Msg::RunAborted(AnalysisFailure::new(ErrorKind::Relay, stopped.to_string()))
                }
            };
            self.dispatch(msg);
            self.flush(&mut on_change);
        }
        self.state.pipeline()
    }

    pub fn shutdown(&self) {
        self.runner.shutdown();
    }

    fn flush(&mut self, on_change: &mut impl FnMut(&PanelView)) {
        let view = self.state.view();
        if self.state.consume_dirty() {
            on_change(&view);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use analyzer_core::{AnalysisKind, ErrorKind, Msg, PanelStatus, PipelineState};
    use analyzer_engine::{AnalysisClient, ApiError, InMemoryTabs, PipelineSettings};

    use super::Session;
    use crate::effects::{EffectRunner, PageTabs};

    struct ScriptedClient {
        answers: Mutex<VecDeque<Result<String, ApiError>>>,
    }

    #[async_trait::async_trait]
    impl AnalysisClient for ScriptedClient {
        async fn generate_content(&self, _prompt: &str) -> Result<String, ApiError> {
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ApiError::MissingText))
        }
    }

    fn session(answers: Vec<Result<String, ApiError>>) -> Session {
        let tabs = InMemoryTabs::new();
        tabs.open(
            "https://news.example/summit",
            "<html><head><title>Summit</title></head>\
             <body><p>Leaders agreed to resume talks next month.</p></body></html>",
        );
        let client = Arc::new(ScriptedClient {
            answers: Mutex::new(answers.into()),
        });
        let runner = EffectRunner::new(PageTabs::Local(tabs), client, PipelineSettings::default())
            .expect("runner");
        Session::new(runner)
    }

    #[test]
    fn request_runs_to_success_and_reports_views() {
        let mut session = session(vec![Ok(
            "```json\n{\"peaceImpactScore\":72,\"escalationRisk\":15,\
             \"constructiveElements\":[\"Dialogue\"],\"divisiveElements\":[],\"summary\":\"Calm.\"}\n```"
                .to_string(),
        )]);

        session.dispatch(Msg::AnalyzeRequested(AnalysisKind::PeaceImpact));
        let mut statuses = Vec::new();
        let settled = session.settle(|view| statuses.push(view.status));

        assert!(matches!(settled, PipelineState::Success(_)));
        assert_eq!(statuses, vec![PanelStatus::Loading, PanelStatus::Success]);
        assert_eq!(
            session.state().view().headline.as_deref(),
            Some("Peace impact score: 72/100")
        );
    }

    #[test]
    fn failure_can_be_retried() {
        let mut session = session(vec![
            Err(ApiError::Timeout),
            Ok("{\"conflictPresence\":false,\"keyPoints\":[],\"credibility\":8,\"summary\":\"\"}"
                .to_string()),
        ]);

        session.dispatch(Msg::AnalyzeRequested(AnalysisKind::Conflict));
        session.settle(|_| {});
        let view = session.state().view();
        assert_eq!(view.error_kind, Some(ErrorKind::Api));
        assert!(view.can_retry);

        session.dispatch(Msg::RetryClicked);
        assert!(matches!(
            session.settle(|_| {}),
            PipelineState::Success(_)
        ));
        assert_eq!(session.state().generation(), 2);
        session.shutdown();
    }

    #[test]
    fn question_settles_as_answered() {
        let mut session = session(vec![Ok("Next month.\n".to_string())]);

        session.dispatch(Msg::QuestionAsked("When do talks resume?".to_string()));
        match session.settle(|_| {}) {
            PipelineState::Answered(answer) => {
                assert_eq!(answer.answer, "Next month.");
                assert_eq!(answer.page.title, "Summit");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn stopped_engine_fails_the_run() {
        let mut session = session(Vec::new());
        session.shutdown();

        session.dispatch(Msg::AnalyzeRequested(AnalysisKind::FactCheck));
        match session.settle(|_| {}) {
            PipelineState::Error(failure) => {
                assert_eq!(failure.kind, ErrorKind::Relay);
                assert_eq!(failure.message, "analysis engine stopped");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }
}
