use std::fmt::Write as _;

use analyzer_core::{PanelStatus, PanelView, PipelineState};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Plain-text panel: one status line, then the result or the error.
pub fn render_text(view: &PanelView) -> String {
    let kind = match (view.kind, &view.question) {
        (Some(kind), _) => kind.label(),
        (None, Some(_)) => "Page question",
        (None, None) => "Analysis",
    };
    let mut out = String::new();
    match view.status {
        PanelStatus::Idle => {
            let _ = writeln!(out, "Ready.");
        }
        PanelStatus::Loading => {
            let _ = writeln!(out, "{kind}: analyzing...");
        }
        PanelStatus::Success => {
            let title = view.page_title.as_deref().unwrap_or("");
            let _ = writeln!(out, "{kind}: {title}");
            if let Some(url) = &view.page_url {
                let _ = writeln!(out, "{url}");
            }
            if let Some(headline) = &view.headline {
                let _ = writeln!(out, "\n{headline}");
            }
            for line in &view.details {
                let _ = writeln!(out, "  {line}");
            }
        }
        PanelStatus::Error => {
            let error = view.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "{kind} failed: {error}");
        }
    }
    if view.rejected_requests > 0 {
        let _ = writeln!(
            out,
            "({} request(s) ignored while busy)",
            view.rejected_requests
        );
    }
    out
}

/// Final outcome as a JSON document. Page text is left out.
pub fn render_json(pipeline: &PipelineState, analyzed_at: DateTime<Utc>) -> Value {
    match pipeline {
        PipelineState::Success(report) => json!({
            "status": "success",
            "analyzedAt": analyzed_at.to_rfc3339(),
            "page": {
                "url": report.page.url,
                "title": report.page.title,
                "keywords": report.page.keywords,
            },
            "analysis": report.result,
        }),
        PipelineState::Answered(answer) => json!({
            "status": "success",
            "analyzedAt": analyzed_at.to_rfc3339(),
            "page": {
                "url": answer.page.url,
                "title": answer.page.title,
                "keywords": answer.page.keywords,
            },
            "question": answer.question,
            "answer": answer.answer,
        }),
        PipelineState::Error(failure) => json!({
            "status": "error",
            "analyzedAt": analyzed_at.to_rfc3339(),
            "error": failure,
        }),
        PipelineState::Idle => json!({ "status": "idle" }),
        PipelineState::Loading => json!({ "status": "loading" }),
    }
}
