use analyzer_core::{AnalysisKind, PageContent};

use crate::schema::{schema_for, FieldType};

/// Maximum number of content characters embedded for `kind`.
pub fn content_limit(kind: AnalysisKind) -> usize {
    match kind {
        AnalysisKind::FactCheck => 15_000,
        AnalysisKind::PeaceImpact => 20_000,
        AnalysisKind::Conflict => 30_000,
    }
}

/// Content characters embedded when answering a question about the page.
pub const QUESTION_CONTENT_LIMIT: usize = 15_000;

/// Prefix of `content` holding at most `max_chars` characters.
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => &content[..end],
        None => content,
    }
}

fn task(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::Conflict => {
            "Analyze this web page content for conflict-related information. Decide whether a \
             conflict is present, list the key points if one is, and assess the credibility of \
             the source."
        }
        AnalysisKind::FactCheck => {
            "Analyze this web page content for factual accuracy. Identify its main claims, name \
             sources that can verify them, and rate the page's overall credibility."
        }
        AnalysisKind::PeaceImpact => {
            "Assess the likely impact of this web page content on peace. Rate how constructive \
             it is, estimate the risk that it escalates tension, and list the constructive and \
             divisive elements you find."
        }
    }
}

/// The JSON shape and field rules the model must follow for `kind`.
pub fn render_contract(kind: AnalysisKind) -> String {
    let fields = schema_for(kind);

    let shape = fields
        .iter()
        .map(|field| {
            let placeholder = match field.field_type {
                FieldType::Boolean => "true | false".to_string(),
                FieldType::Text => "\"string\"".to_string(),
                FieldType::TextList => "[\"string\", ...]".to_string(),
                FieldType::Number { min, max } => format!("number from {min} to {max}"),
            };
            format!("  \"{}\": {}", field.name, placeholder)
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let rules = fields
        .iter()
        .map(|field| match field.field_type {
            FieldType::Number { min, max } => format!(
                "- {} ({}, {min} to {max} inclusive): {}",
                field.name,
                field.field_type.expected(),
                field.description
            ),
            other => format!(
                "- {} ({}): {}",
                field.name,
                other.expected(),
                field.description
            ),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{{\n{shape}\n}}\n\nFIELDS:\n{rules}")
}

/// Build the instruction sent to the model. Deterministic for equal inputs.
pub fn build_prompt(page: &PageContent, kind: AnalysisKind) -> String {
    let content = truncate_chars(&page.content, content_limit(kind));
    let keywords = page.keywords.as_deref().unwrap_or("none");

    format!(
        r#"{task}

Respond with a single JSON object that matches this schema exactly:
{contract}

RULES:
- Every field is required.
- Numbers must be plain JSON numbers inside the stated range.
- Output ONLY the JSON object, no markdown, no explanations.

PAGE:
Title: {title}
URL: {url}
Keywords: {keywords}

CONTENT:
{content}

JSON OUTPUT:"#,
        task = task(kind),
        contract = render_contract(kind),
        title = page.title,
        url = page.url,
    )
}

/// Instruction for a free-form question about the page. The answer is plain text.
pub fn build_question_prompt(page: &PageContent, question: &str) -> String {
    let content = truncate_chars(&page.content, QUESTION_CONTENT_LIMIT);

    format!(
        r#"Answer the user's question about this web page, paying attention to any conflict-related information it contains.

PAGE:
Title: {title}
URL: {url}

CONTENT:
{content}

QUESTION:
{question}

Provide:
1. A direct answer to the question
2. Relevant quotes from the page
3. A credibility assessment
4. Additional context

Answer in plain text."#,
        title = page.title,
        url = page.url,
    )
}

#[cfg(test)]
mod tests {
    use super::{
        build_prompt, build_question_prompt, content_limit, render_contract, truncate_chars,
        QUESTION_CONTENT_LIMIT,
    };
    use analyzer_core::{AnalysisKind, PageContent};

    fn page(content: String) -> PageContent {
        PageContent {
            url: "https://x.com".to_string(),
            title: "T".to_string(),
            content,
            keywords: Some("news, world".to_string()),
        }
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn content_is_cut_to_kind_limit() {
        let limit = content_limit(AnalysisKind::FactCheck);
        let body = format!("{}{}", "a".repeat(limit), "TAIL");
        let prompt = build_prompt(&page(body), AnalysisKind::FactCheck);

        assert!(prompt.contains(&"a".repeat(limit)));
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn prompt_embeds_contract_and_metadata() {
        let prompt = build_prompt(&page("body text".to_string()), AnalysisKind::Conflict);

        assert!(prompt.contains(&render_contract(AnalysisKind::Conflict)));
        assert!(prompt.contains("\"conflictPresence\": true | false"));
        assert!(prompt.contains("credibility (a number, 0 to 10 inclusive)"));
        assert!(prompt.contains("Keywords: news, world"));
        assert!(prompt.contains("URL: https://x.com"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt(&page("same".to_string()), AnalysisKind::PeaceImpact);
        let b = build_prompt(&page("same".to_string()), AnalysisKind::PeaceImpact);
        assert_eq!(a, b);
    }

    #[test]
    fn question_prompt_cuts_content_and_carries_question() {
        let body = format!("{}{}", "q".repeat(QUESTION_CONTENT_LIMIT), "TAIL");
        let prompt = build_question_prompt(&page(body), "Who signed the accord?");

        let kept = "q".repeat(QUESTION_CONTENT_LIMIT);
        assert!(prompt.contains(&format!("CONTENT:\n{kept}\n\nQUESTION:")));
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains("QUESTION:\nWho signed the accord?\n"));
        assert!(prompt.contains("2. Relevant quotes from the page"));
        assert!(!prompt.contains("JSON"));
    }
}
