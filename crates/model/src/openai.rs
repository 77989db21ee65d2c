//! OpenAI-compatible LLM provider.
//!
//! Covers OpenAI itself plus Fireworks and Google Gemini, both of which
//! expose the chat completions API through compatibility endpoints.

use crate::Request;
use anyhow::Result;
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{LLM, Message, Response, StreamChunk};
use reqwest::{
    Client, Method,
    header::{self, HeaderMap},
};

/// OpenAI-compatible endpoint URLs.
pub mod endpoint {
    /// OpenAI chat completions.
    pub const OPENAI: &str = "https://api.openai.com/v1/chat/completions";
    /// Fireworks chat completions.
    pub const FIREWORKS: &str = "https://api.fireworks.ai/inference/v1/chat/completions";
    /// Google Gemini OpenAI-compatible chat completions.
    pub const GOOGLE: &str =
        "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
}

/// An OpenAI-compatible LLM provider.
#[derive(Clone)]
pub struct OpenAI {
    /// The HTTP client.
    client: Client,
    /// Request headers (authorization, content-type).
    headers: HeaderMap,
    /// Chat completions endpoint URL.
    endpoint: String,
}

impl OpenAI {
    /// Create a provider targeting the OpenAI API.
    pub fn api(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, endpoint::OPENAI)
    }

    /// Create a provider targeting the Fireworks API.
    pub fn fireworks(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, endpoint::FIREWORKS)
    }

    /// Create a provider targeting the Google Gemini compatibility API.
    pub fn google(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, endpoint::GOOGLE)
    }

    /// Create a provider targeting a custom OpenAI-compatible endpoint.
    pub fn custom(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse()?);
        headers.insert(header::ACCEPT, "application/json".parse()?);
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }
}

impl LLM for OpenAI {
    type ChatConfig = Request;

    async fn send(&self, req: &Request, messages: &[Message]) -> Result<Response> {
        let body = req.messages(messages);
        tracing::trace!("request: {}", serde_json::to_string(&body)?);
        let text = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        tracing::trace!("response: {text}");
        serde_json::from_str(&text).map_err(Into::into)
    }

    fn stream(
        &self,
        req: Request,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        let body = req.messages(messages).stream();
        if let Ok(body) = serde_json::to_string(&body) {
            tracing::trace!("request: {body}");
        }
        let request = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body);

        try_stream! {
            let response = request.send().await?.error_for_status()?;
            let mut stream = response.bytes_stream();
            let mut buf = String::new();
            while let Some(bytes) = stream.next().await.transpose()? {
                buf.push_str(&String::from_utf8_lossy(&bytes));
                // SSE frames are separated by a blank line; a frame may
                // span several network chunks.
                while let Some(pos) = buf.find("\n\n") {
                    let frame = buf[..pos].to_owned();
                    buf = buf[pos + 2..].to_owned();
                    if let Some(chunk) = parse_sse_frame(&frame) {
                        yield chunk;
                    }
                }
            }
            if !buf.trim().is_empty()
                && let Some(chunk) = parse_sse_frame(&buf)
            {
                yield chunk;
            }
        }
    }
}

/// Parse a single SSE frame into a stream chunk.
///
/// Returns `None` for keep-alives, the `[DONE]` terminator, and frames
/// that fail to decode (logged and skipped).
fn parse_sse_frame(frame: &str) -> Option<StreamChunk> {
    let data = frame
        .lines()
        .find_map(|line| line.strip_prefix("data: "))?
        .trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => Some(chunk),
        Err(e) => {
            tracing::warn!("failed to parse stream chunk: {e}, data: {data}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_parses_data_line() {
        let frame = "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"hi\"}}]}";
        let chunk = parse_sse_frame(frame).unwrap();
        assert_eq!(chunk.content(), Some("hi"));
    }

    #[test]
    fn frame_skips_done_marker() {
        assert!(parse_sse_frame("data: [DONE]").is_none());
    }

    #[test]
    fn frame_skips_invalid_json() {
        assert!(parse_sse_frame("data: {not json").is_none());
    }

    #[test]
    fn frame_without_data_line_is_ignored() {
        assert!(parse_sse_frame(": keep-alive").is_none());
    }
}
