use crate::{AnalysisKind, AnalysisResult, AppState, ErrorKind, PipelineState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything the presentation layer needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelView {
    pub status: PanelStatus,
    pub kind: Option<AnalysisKind>,
    pub question: Option<String>,
    pub page_title: Option<String>,
    pub page_url: Option<String>,
    pub headline: Option<String>,
    pub details: Vec<String>,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
    pub can_retry: bool,
    pub rejected_requests: u32,
    pub dirty: bool,
}

pub(crate) fn build(state: &AppState) -> PanelView {
    let mut view = PanelView {
        kind: state.kind(),
        question: state.question().map(str::to_string),
        rejected_requests: state.rejected_requests(),
        dirty: state.is_dirty(),
        ..PanelView::default()
    };

    match state.pipeline() {
        PipelineState::Idle => {}
        PipelineState::Loading => view.status = PanelStatus::Loading,
        PipelineState::Success(report) => {
            view.status = PanelStatus::Success;
            view.page_title = Some(report.page.title.clone());
            view.page_url = Some(report.page.url.clone());
            let (headline, details) = summarize(&report.result);
            view.headline = Some(headline);
            view.details = details;
        }
        PipelineState::Answered(answer) => {
            view.status = PanelStatus::Success;
            view.page_title = Some(answer.page.title.clone());
            view.page_url = Some(answer.page.url.clone());
            view.headline = Some(format!("Q: {}", answer.question));
            view.details = answer
                .answer
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect();
        }
        PipelineState::Error(failure) => {
            view.status = PanelStatus::Error;
            view.error_kind = Some(failure.kind);
            view.error = Some(failure.to_string());
            view.can_retry = true;
        }
    }
    view
}

fn summarize(result: &AnalysisResult) -> (String, Vec<String>) {
    match result {
        AnalysisResult::Conflict(conflict) => {
            let detected = if conflict.conflict_presence { "Yes" } else { "No" };
            let mut details = vec![format!("Conflict detected: {detected}")];
            details.extend(conflict.key_points.iter().map(|p| format!("- {p}")));
            if !conflict.summary.is_empty() {
                details.push(conflict.summary.clone());
            }
            (
                format!("Credibility: {}/10", format_score(conflict.credibility)),
                details,
            )
        }
        AnalysisResult::FactCheck(check) => {
            let mut details = Vec::new();
            details.extend(check.claims.iter().map(|c| format!("Claim: {c}")));
            details.extend(check.sources.iter().map(|s| format!("Source: {s}")));
            if !check.analysis.is_empty() {
                details.push(check.analysis.clone());
            }
            (
                format!(
                    "Credibility score: {}/100",
                    format_score(check.credibility_score)
                ),
                details,
            )
        }
        AnalysisResult::PeaceImpact(impact) => {
            let mut details = vec![format!(
                "Escalation risk: {}/100",
                format_score(impact.escalation_risk)
            )];
            details.extend(
                impact
                    .constructive_elements
                    .iter()
                    .map(|e| format!("+ {e}")),
            );
            details.extend(impact.divisive_elements.iter().map(|e| format!("! {e}")));
            if !impact.summary.is_empty() {
                details.push(impact.summary.clone());
            }
            (
                format!(
                    "Peace impact score: {}/100",
                    format_score(impact.peace_impact_score)
                ),
                details,
            )
        }
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
