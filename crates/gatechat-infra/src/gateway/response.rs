//! Mapping of HTTP outcomes onto [`SessionError`].

use reqwest::StatusCode;

use gatechat_types::error::SessionError;
use gatechat_types::protocol::ChatCompletionResponse;

/// Longest slice of an error body carried in [`SessionError::HttpFailure`].
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Pass a 200 response through; turn anything else into an error.
///
/// 401 is an authentication failure. Every other status becomes an HTTP
/// failure carrying the (truncated) body, or the canonical reason when the
/// body is empty.
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SessionError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!(status = status.as_u16(), "gateway rejected credentials");
        return Err(SessionError::AuthenticationFailure);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "gateway error response");
    Err(SessionError::HttpFailure {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status.canonical_reason().unwrap_or_default().to_string();
    }
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Connection, timeout and body-read errors.
pub fn transport_error(err: reqwest::Error) -> SessionError {
    let detail = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("could not connect: {err}")
    } else {
        err.to_string()
    };
    SessionError::TransportFailure(detail)
}

/// Decode a buffered completion body into the first choice's text.
///
/// A body that is not JSON at all is malformed; JSON of the wrong shape is a
/// decode failure. A response without choices or content yields `""`.
pub fn decode_completion(body: &str) -> Result<String, SessionError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SessionError::MalformedResponse(format!("response is not JSON: {e}")))?;
    let response: ChatCompletionResponse =
        serde_json::from_value(value).map_err(|e| SessionError::DecodeFailure(e.to_string()))?;
    Ok(response.first_content().unwrap_or_default().to_string())
}
