use crate::{AppState, Effect, Msg, PipelineState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AnalyzeRequested(kind) => {
            // One pipeline per panel: a second trigger while loading is rejected,
            // never queued.
            if state.is_loading() {
                state.reject_request();
                return (state, Vec::new());
            }
            let generation = state.begin_loading(kind);
            vec![Effect::RunAnalysis { generation, kind }]
        }
        Msg::QuestionAsked(question) => {
            let question = question.trim();
            if question.is_empty() {
                return (state, Vec::new());
            }
            if state.is_loading() {
                state.reject_request();
                return (state, Vec::new());
            }
            let generation = state.begin_asking(question.to_string());
            vec![Effect::AnswerQuestion {
                generation,
                question: question.to_string(),
            }]
        }
        Msg::RetryClicked => {
            if !matches!(state.pipeline(), PipelineState::Error(_)) {
                return (state, Vec::new());
            }
            match (state.kind(), state.question().map(str::to_string)) {
                (Some(kind), _) => {
                    let generation = state.begin_loading(kind);
                    vec![Effect::RunAnalysis { generation, kind }]
                }
                (None, Some(question)) => {
                    let generation = state.begin_asking(question.clone());
                    vec![Effect::AnswerQuestion {
                        generation,
                        question,
                    }]
                }
                (None, None) => Vec::new(),
            }
        }
        Msg::AnalysisFinished {
            generation,
            outcome,
        } => {
            state.finish(generation, outcome);
            Vec::new()
        }
        Msg::AnswerFinished {
            generation,
            outcome,
        } => {
            state.finish_answer(generation, outcome);
            Vec::new()
        }
        Msg::RunAborted(failure) => {
            state.abort(failure);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };
    (state, effects)
}
