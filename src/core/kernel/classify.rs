use crate::core::errors::{BfxError, BfxResult, NONCE_TOO_SMALL_CODE, NONCE_TOO_SMALL_HINT};
use crate::core::types::{ApiVersion, RawResponse};
use serde_json::Value;
use tracing::warn;

const V1_NONCE_TOO_SMALL: &str = "Nonce is too small";

/// Code and message pulled out of an error envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: Option<i64>,
    pub message: Option<String>,
}

/// Recognise `["error", code, msg]` and `[ts, "error", code, msg]` bodies
pub fn parse_error_envelope(value: &Value) -> Option<ErrorEnvelope> {
    let items = value.as_array()?;
    let marker = items.iter().take(2).position(|item| item == "error")?;
    let code = items.get(marker + 1).and_then(Value::as_i64);
    let message = items.get(marker + 2).map(|item| match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    });

    Some(ErrorEnvelope { code, message })
}

/// Turn one HTTP exchange into parsed JSON or a typed error
pub fn classify(version: ApiVersion, raw: RawResponse) -> BfxResult<Value> {
    if !version.accepts(raw.status) {
        return Err(api_failure(&raw));
    }

    let parsed: Value = serde_json::from_str(&raw.body).map_err(|e| {
        BfxError::MalformedResponse(format!(
            "HTTP {} body is not valid JSON ({}): {}",
            raw.status,
            e,
            truncate(&raw.body)
        ))
    })?;

    match version {
        ApiVersion::V2 => match parse_error_envelope(&parsed) {
            Some(envelope) => Err(envelope_failure(&raw, envelope)),
            None => Ok(parsed),
        },
        ApiVersion::V1 => match parsed.get("message").and_then(Value::as_str) {
            Some(message) => Err(v1_message_failure(&raw, message)),
            None => Ok(parsed),
        },
    }
}

fn api_failure(raw: &RawResponse) -> BfxError {
    let envelope = serde_json::from_str::<Value>(&raw.body)
        .ok()
        .and_then(|value| {
            parse_error_envelope(&value).or_else(|| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(|message| ErrorEnvelope {
                        code: None,
                        message: Some(message.to_string()),
                    })
            })
        });

    match envelope {
        Some(envelope) => envelope_failure(raw, envelope),
        None => build_failure(raw, None, Some(raw.body.clone())),
    }
}

fn envelope_failure(raw: &RawResponse, envelope: ErrorEnvelope) -> BfxError {
    build_failure(raw, envelope.code, envelope.message)
}

fn v1_message_failure(raw: &RawResponse, message: &str) -> BfxError {
    build_failure(raw, None, Some(message.to_string()))
}

fn build_failure(raw: &RawResponse, code: Option<i64>, response: Option<String>) -> BfxError {
    let mut message = format!("HTTP code {} {}", raw.status, raw.status_text)
        .trim_end()
        .to_string();

    if let Some(text) = response.as_deref().filter(|text| !text.is_empty()) {
        message.push_str(": ");
        message.push_str(text);
    }

    let stale_nonce = code == Some(NONCE_TOO_SMALL_CODE)
        || response
            .as_deref()
            .is_some_and(|text| text.contains(V1_NONCE_TOO_SMALL));
    if stale_nonce {
        message.push(' ');
        message.push_str(NONCE_TOO_SMALL_HINT);
    }

    warn!(status = raw.status, code = ?code, "API failure: {}", message);

    BfxError::ApiFailure {
        status: raw.status,
        status_text: raw.status_text.clone(),
        code,
        response,
        message,
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}
