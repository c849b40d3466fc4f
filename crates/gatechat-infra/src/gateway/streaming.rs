//! Streaming chat completion to [`DeltaStream`] adapter.
//!
//! The response body is read with `bytes_stream()`, reassembled into lines
//! and fed through the core `FrameParser`. The cancellation token is raced
//! against the request and every body read; when it fires the stream ends
//! without an error and the response (with its connection) is dropped.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use gatechat_core::parser::{FrameParser, LineSplitter};
use gatechat_core::transport::DeltaStream;
use gatechat_types::error::SessionError;

use super::response::{check_status, transport_error};

/// Send `request` and stream the text deltas of its SSE response.
///
/// An error in `request` (e.g. an unusable base URL) is yielded as the only
/// item. Status failures are yielded before any delta.
pub fn create_gateway_stream(
    request: Result<reqwest::RequestBuilder, SessionError>,
    cancel: CancellationToken,
) -> DeltaStream {
    Box::pin(async_stream::try_stream! {
        let request = request?;

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = request.send() => Some(result),
        };

        if let Some(result) = sent {
            let response = check_status(result.map_err(transport_error)?).await?;

            let mut body = response.bytes_stream();
            let mut splitter = LineSplitter::new();
            let mut parser = FrameParser::new();

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    chunk = body.next() => chunk,
                };
                let Some(chunk) = next else { break };
                let chunk = chunk.map_err(transport_error)?;

                for line in splitter.push(&chunk) {
                    if let Some(delta) = parser.parse_line(&line).and_then(|c| c.delta) {
                        yield delta;
                    }
                }
                if parser.is_terminated() {
                    break;
                }
            }

            if cancel.is_cancelled() {
                tracing::debug!("stream cancelled");
            } else if let Some(delta) = splitter
                .finish()
                .and_then(|line| parser.parse_line(&line))
                .and_then(|c| c.delta)
            {
                yield delta;
            }
        } else {
            tracing::debug!("stream cancelled before the gateway answered");
        }
    })
}

/// Keeps a tracing span entered while the inner stream is polled.
pub struct StreamInSpan {
    inner: DeltaStream,
    span: tracing::Span,
}

impl StreamInSpan {
    pub fn new(inner: DeltaStream, span: tracing::Span) -> Self {
        Self { inner, span }
    }
}

impl Stream for StreamInSpan {
    type Item = Result<String, SessionError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let _enter = this.span.enter();
        this.inner.as_mut().poll_next(cx)
    }
}
