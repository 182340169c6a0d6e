use std::time::Duration;

use analyzer_core::PageContent;
use analyzer_logging::{analyzer_debug, analyzer_warn};
use serde_json::{Map, Value};

use crate::channel::MessageChannel;
use crate::relay::{AnalyzeReply, RelayRequest};
use crate::AcquisitionError;

pub const DEFAULT_CONTENT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Pages with fewer trimmed characters than this are not analyzed.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Issues one relay request and turns the reply into [`PageContent`].
///
/// The relay round-trip races a timer; whichever settles first wins and the
/// other future is dropped.
pub async fn fetch_page_content(
    channel: &dyn MessageChannel,
    request: &RelayRequest,
    timeout: Duration,
) -> Result<PageContent, AcquisitionError> {
    let message = request.to_message();
    analyzer_debug!("Requesting page content: {}", message);

    let reply = tokio::select! {
        biased;
        reply = channel.send(message) => reply?,
        _ = tokio::time::sleep(timeout) => {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            analyzer_warn!("Relay did not answer within {} ms", timeout_ms);
            return Err(AcquisitionError::Timeout { timeout_ms });
        }
    };

    let reply = match reply {
        None | Some(Value::Null) => return Err(AcquisitionError::EmptyResponse),
        Some(reply) => reply,
    };
    let page = parse_reply(reply)?;

    let length = page.content.trim().chars().count();
    if length < MIN_CONTENT_CHARS {
        return Err(AcquisitionError::EmptyContent { length });
    }
    Ok(page)
}

fn parse_reply(reply: Value) -> Result<PageContent, AcquisitionError> {
    let Value::Object(map) = reply else {
        return Err(AcquisitionError::InvalidFormat(
            "reply is not an object".to_string(),
        ));
    };

    if let Some(error) = map.get("error") {
        let message = match error {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Err(AcquisitionError::Extraction(message));
    }

    if map.contains_key("textContent") {
        let reply: AnalyzeReply = serde_json::from_value(Value::Object(map))
            .map_err(|err| AcquisitionError::InvalidFormat(err.to_string()))?;
        return Ok(PageContent {
            url: reply.metadata.url,
            title: reply.metadata.title,
            content: reply.text_content,
            keywords: non_empty(reply.metadata.keywords),
        });
    }

    Ok(PageContent {
        url: string_field(&map, "url")?,
        title: string_field(&map, "title")?,
        content: string_field(&map, "content")?,
        keywords: map
            .get("keywords")
            .and_then(Value::as_str)
            .map(str::to_string)
            .and_then(non_empty),
    })
}

fn string_field(map: &Map<String, Value>, name: &str) -> Result<String, AcquisitionError> {
    match map.get(name) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(AcquisitionError::InvalidFormat(format!(
            "`{name}` is not a string"
        ))),
        None => Err(AcquisitionError::InvalidFormat(format!("missing `{name}`"))),
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}
