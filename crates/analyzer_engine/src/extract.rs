use scraper::{ElementRef, Html, Node, Selector};

use crate::{ExtractedPage, ExtractionFailure, TabDocument};

/// Reads visible text and metadata out of a tab's document.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, document: &TabDocument) -> Result<ExtractedPage, ExtractionFailure>;
}

/// `innerText`-like extractor:
/// - text of `<body>`, skipping script/style/noscript/template and `hidden` subtrees
/// - block elements start a new line; whitespace runs collapse; blank lines drop
/// - `<title>` text, empty when absent
/// - every `<meta name="keywords">` content as written (name matched exactly), joined with ", "
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

impl ContentExtractor for DocumentExtractor {
    fn extract(&self, document: &TabDocument) -> Result<ExtractedPage, ExtractionFailure> {
        let doc = Html::parse_document(&document.html);
        let body_sel = Selector::parse("body").ok();
        let title_sel = Selector::parse("title").ok();
        let meta_sel = Selector::parse(r#"meta[name="keywords"]"#).ok();

        let body = body_sel
            .as_ref()
            .and_then(|sel| doc.select(sel).next())
            .ok_or(ExtractionFailure::NoDocument)?;

        let title = title_sel
            .as_ref()
            .and_then(|sel| doc.select(sel).next())
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let keywords = meta_sel
            .as_ref()
            .map(|sel| {
                doc.select(sel)
                    .map(|meta| meta.value().attr("content").unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Ok(ExtractedPage {
            text: visible_text(body),
            url: document.url.clone(),
            title,
            keywords,
        })
    }
}

fn visible_text(body: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in body.descendants() {
        match node.value() {
            Node::Element(element) if BLOCKS.contains(&element.name()) => raw.push('\n'),
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor.value().as_element().is_some_and(|element| {
                        SKIPPED.contains(&element.name()) || element.attr("hidden").is_some()
                    })
                });
                if !hidden {
                    raw.push_str(text);
                }
            }
            _ => {}
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
