mod common;

use std::sync::Arc;

use analyzer_core::{
    update, AnalysisFailure, AnalysisKind, AnalysisResult, AppState, Effect, ErrorKind, Msg,
    PipelineState,
};
use analyzer_engine::{
    content_limit, AnalysisPipeline, ApiError, ChannelError, PipelineError, PipelineSettings,
    QUESTION_CONTENT_LIMIT,
};
use common::{FixedChannel, ScriptedClient, FACT_CHECK_ANSWER};
use pretty_assertions::assert_eq;
use serde_json::json;

fn pipeline(channel: FixedChannel, client: ScriptedClient) -> AnalysisPipeline {
    AnalysisPipeline::new(
        Arc::new(channel),
        Arc::new(client),
        PipelineSettings::default(),
    )
}

/// Drives one effect through the pipeline and feeds the outcome back.
async fn run_effect(
    pipeline: &AnalysisPipeline,
    state: AppState,
    effects: Vec<Effect>,
) -> AppState {
    let mut state = state;
    for effect in effects {
        let msg = match effect {
            Effect::RunAnalysis { generation, kind } => Msg::AnalysisFinished {
                generation,
                outcome: pipeline.run(kind).await.map_err(AnalysisFailure::from),
            },
            Effect::AnswerQuestion {
                generation,
                question,
            } => Msg::AnswerFinished {
                generation,
                outcome: pipeline.ask(&question).await.map_err(AnalysisFailure::from),
            },
        };
        let (next, _) = update(state, msg);
        state = next;
    }
    state
}

#[tokio::test]
async fn short_page_fails_before_prompting() {
    common::init_logging();
    let client = ScriptedClient::answering(vec![Ok(FACT_CHECK_ANSWER.to_string())]);
    let pipeline = pipeline(
        FixedChannel::replying(json!({ "url": "https://x.com", "title": "T", "content": "short" })),
        client.clone(),
    );

    let (state, effects) = update(AppState::new(), Msg::AnalyzeRequested(AnalysisKind::FactCheck));
    let state = run_effect(&pipeline, state, effects).await;

    assert!(client.prompts().is_empty());
    match state.pipeline() {
        PipelineState::Error(failure) => assert_eq!(failure.kind, ErrorKind::EmptyContent),
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn long_page_is_truncated_and_fenced_answer_accepted() {
    common::init_logging();
    let head = "h".repeat(content_limit(AnalysisKind::FactCheck));
    let content = format!("{head}{}", "t".repeat(20_000 - head.len()));
    assert_eq!(content.len(), 20_000);

    let client = ScriptedClient::answering(vec![Ok(FACT_CHECK_ANSWER.to_string())]);
    let pipeline = pipeline(
        FixedChannel::replying(json!({
            "url": "https://x.com",
            "title": "T",
            "content": content,
        })),
        client.clone(),
    );

    let (state, effects) = update(AppState::new(), Msg::AnalyzeRequested(AnalysisKind::FactCheck));
    let state = run_effect(&pipeline, state, effects).await;

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(&format!("CONTENT:\n{head}\n\nJSON OUTPUT:")));

    match state.pipeline() {
        PipelineState::Success(report) => {
            assert_eq!(report.page.content.len(), 20_000);
            match &report.result {
                AnalysisResult::FactCheck(check) => assert_eq!(check.credibility_score, 85.0),
                other => panic!("unexpected result {other:?}"),
            }
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn rejected_relay_errors_and_retry_repeats_the_flow() {
    common::init_logging();
    let channel = Arc::new(FixedChannel::failing(ChannelError::Rejected(
        "permission denied".to_string(),
    )));
    let client = ScriptedClient::default();
    let pipeline = AnalysisPipeline::new(
        channel.clone(),
        Arc::new(client.clone()),
        PipelineSettings::default(),
    );

    let (state, effects) = update(AppState::new(), Msg::AnalyzeRequested(AnalysisKind::Conflict));
    let state = run_effect(&pipeline, state, effects).await;
    assert_eq!(state.view().error_kind, Some(ErrorKind::Relay));

    let (state, effects) = update(state, Msg::RetryClicked);
    assert_eq!(state.pipeline(), &PipelineState::Loading);
    let state = run_effect(&pipeline, state, effects).await;

    assert_eq!(state.view().error_kind, Some(ErrorKind::Relay));
    assert_eq!(channel.sent_count(), 2);
    assert!(client.prompts().is_empty());
}

#[tokio::test]
async fn model_failures_map_to_api_and_schema_errors() {
    common::init_logging();
    let page = json!({
        "url": "https://x.com",
        "title": "T",
        "content": "A long enough page about a regional summit.",
    });
    let client = ScriptedClient::answering(vec![
        Err(ApiError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }),
        Ok("```json\n{\"credibilityScore\":150,\"claims\":[],\"sources\":[],\"analysis\":\"\"}\n```"
            .to_string()),
    ]);
    let pipeline = pipeline(FixedChannel::replying(page), client);

    let err = pipeline.run(AnalysisKind::FactCheck).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);

    let err = pipeline.run(AnalysisKind::FactCheck).await.unwrap_err();
    assert!(matches!(err, PipelineError::Schema(_)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::SchemaViolation);
}

#[tokio::test]
async fn question_is_answered_from_truncated_page() {
    common::init_logging();
    let head = "h".repeat(QUESTION_CONTENT_LIMIT);
    let content = format!("{head}{}", "t".repeat(5_000));
    let client = ScriptedClient::answering(vec![Ok(
        "\n1. The talks resume on Monday.\n2. \"Delegations met.\"\n\n".to_string(),
    )]);
    let pipeline = pipeline(
        FixedChannel::replying(json!({
            "url": "https://x.com/talks",
            "title": "Talks",
            "content": content,
        })),
        client.clone(),
    );

    let (state, effects) = update(
        AppState::new(),
        Msg::QuestionAsked("When do talks resume?".to_string()),
    );
    let state = run_effect(&pipeline, state, effects).await;

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(&format!("CONTENT:\n{head}\n\nQUESTION:")));
    assert!(prompts[0].contains("When do talks resume?"));

    match state.pipeline() {
        PipelineState::Answered(answer) => {
            assert_eq!(answer.question, "When do talks resume?");
            assert_eq!(
                answer.answer,
                "1. The talks resume on Monday.\n2. \"Delegations met.\""
            );
            assert_eq!(answer.page.url, "https://x.com/talks");
            assert_eq!(answer.page.content.len(), QUESTION_CONTENT_LIMIT + 5_000);
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn question_on_short_page_fails_before_prompting() {
    common::init_logging();
    let client = ScriptedClient::answering(vec![Ok("unused".to_string())]);
    let pipeline = pipeline(
        FixedChannel::replying(json!({ "url": "https://x.com", "title": "T", "content": "short" })),
        client.clone(),
    );

    let err = pipeline.ask("Who met?").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyContent);
    assert!(client.prompts().is_empty());
}

#[tokio::test]
async fn blank_answer_is_an_api_failure() {
    common::init_logging();
    let page = json!({
        "url": "https://x.com",
        "title": "T",
        "content": "A long enough page about a regional summit.",
    });
    let client = ScriptedClient::answering(vec![Ok(" \n\t ".to_string())]);
    let pipeline = pipeline(FixedChannel::replying(page), client);

    let err = pipeline.ask("Who met?").await.unwrap_err();

    assert!(matches!(err, PipelineError::Api(ApiError::MissingText)), "{err:?}");
}
