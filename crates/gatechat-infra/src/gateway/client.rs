//! GatewayClient -- concrete [`ChatTransport`] for an OpenAI-compatible
//! agent gateway.
//!
//! The bearer token is wrapped in [`secrecy::SecretString`] and is only
//! exposed while building the `Authorization` header.

use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span};

use gatechat_core::transport::{ChatTransport, DeltaStream};
use gatechat_observe::genai_attrs::OP_CHAT;
use gatechat_types::config::{GatewayConfig, HEALTH_CHECK_TIMEOUT, USER_AGENT};
use gatechat_types::error::SessionError;
use gatechat_types::protocol::{ChatRequest, WireMessage};

use super::response::{check_status, decode_completion, transport_error};
use super::streaming::{StreamInSpan, create_gateway_stream};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const HEALTH_PATH: &str = "/health";

/// HTTP client for one gateway.
///
/// Never retries: each call is exactly one request. Does not derive `Debug`
/// so the token cannot end up in log output.
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<SecretString>,
    model: String,
    request_timeout: Duration,
    stream_timeout: Duration,
    health_timeout: Duration,
}

impl GatewayClient {
    /// Build a client from `config`.
    ///
    /// The base URL is checked per call, so a bad one surfaces as
    /// [`SessionError::InvalidConfiguration`] from the operation that used it.
    pub fn new(config: &GatewayConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                SessionError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone().map(SecretString::from),
            model: config.model.clone(),
            request_timeout: config.request_timeout(),
            stream_timeout: config.stream_timeout(),
            health_timeout: HEALTH_CHECK_TIMEOUT,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[cfg(test)]
    fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// `{base}{path}`, accepted only as an absolute http(s) URL.
    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        let base = self.base_url.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{path}")).map_err(|e| {
            SessionError::InvalidConfiguration(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SessionError::InvalidConfiguration(format!(
                "unsupported URL scheme '{other}'"
            ))),
        }
    }

    fn request(&self, method: Method, url: Url, timeout: Duration) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url).timeout(timeout);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    fn chat_request(&self, messages: Vec<WireMessage>, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            stream,
        }
    }
}

impl ChatTransport for GatewayClient {
    fn stream_chat(&self, messages: Vec<WireMessage>, cancel: CancellationToken) -> DeltaStream {
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = OP_CHAT,
            gen_ai.request.model = %self.model,
            gen_ai.request.stream = true,
            message_count = messages.len(),
        );

        let body = self.chat_request(messages, true);
        let request = self
            .endpoint(CHAT_COMPLETIONS_PATH)
            .map(|url| self.request(Method::POST, url, self.stream_timeout).json(&body));

        Box::pin(StreamInSpan::new(create_gateway_stream(request, cancel), span))
    }

    async fn send_chat(&self, messages: Vec<WireMessage>) -> Result<String, SessionError> {
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = OP_CHAT,
            gen_ai.request.model = %self.model,
            gen_ai.request.stream = false,
            message_count = messages.len(),
        );

        async {
            let url = self.endpoint(CHAT_COMPLETIONS_PATH)?;
            let response = self
                .request(Method::POST, url, self.request_timeout)
                .json(&self.chat_request(messages, false))
                .send()
                .await
                .map_err(transport_error)?;
            let response = check_status(response).await?;
            let body = response.text().await.map_err(transport_error)?;
            decode_completion(&body)
        }
        .instrument(span)
        .await
    }

    async fn ping_gateway(&self) -> bool {
        let url = match self.endpoint(HEALTH_PATH) {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "health check skipped");
                return false;
            }
        };

        match self
            .request(Method::GET, url, self.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                debug!(status = response.status().as_u16(), "health check failed");
                false
            }
            Err(e) => {
                debug!(error = %e, "health check failed");
                false
            }
        }
    }
}
