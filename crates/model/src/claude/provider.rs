//! LLM trait implementation for the Claude (Anthropic) provider.

use super::{Claude, Request, stream::Event};
use anyhow::Result;
use async_stream::try_stream;
use compact_str::CompactString;
use futures_core::Stream;
use futures_util::StreamExt;
use llm::{
    Choice, CompletionMeta, Delta, FinishReason, FunctionCall, LLM, Message, Response, StreamChunk,
    ToolCall, Usage,
};
use reqwest::Method;

/// Raw Anthropic non-streaming response.
#[derive(serde::Deserialize)]
struct AnthropicResponse {
    id: String,
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<CompactString>,
    usage: AnthropicUsage,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: CompactString,
        input: serde_json::Value,
    },
}

#[derive(serde::Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl LLM for Claude {
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
        let raw: AnthropicResponse = serde_json::from_str(&text)?;
        Ok(to_response(raw))
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
                while let Some(pos) = buf.find("\n\n") {
                    let block = buf[..pos].to_owned();
                    buf = buf[pos + 2..].to_owned();
                    if let Some(chunk) = parse_sse_block(&block) {
                        yield chunk;
                    }
                }
            }
            // Handle any remaining data in the buffer.
            if !buf.trim().is_empty()
                && let Some(chunk) = parse_sse_block(&buf)
            {
                yield chunk;
            }
        }
    }
}

/// Parse a single SSE block (may contain `event:` and `data:` lines).
fn parse_sse_block(block: &str) -> Option<StreamChunk> {
    let mut data_str = None;
    for line in block.lines() {
        if let Some(d) = line.strip_prefix("data: ") {
            data_str = Some(d.trim());
        }
    }
    let data = data_str?;
    match serde_json::from_str::<Event>(data) {
        Ok(event) => event.into_chunk(),
        Err(e) => {
            tracing::warn!("failed to parse anthropic event: {e}, data: {data}");
            None
        }
    }
}

/// Convert a raw Anthropic response to the unified [`Response`] shape.
fn to_response(raw: AnthropicResponse) -> Response {
    let mut content = String::new();
    let mut tool_calls = Vec::new();
    for (index, block) in raw.content.into_iter().enumerate() {
        match block {
            ContentBlock::Text { text } => content.push_str(&text),
            ContentBlock::ToolUse { id, name, input } => {
                tool_calls.push(ToolCall {
                    id,
                    index: index as u32,
                    call_type: "function".into(),
                    function: FunctionCall {
                        name,
                        arguments: input.to_string(),
                    },
                });
            }
        }
    }

    let finish_reason = raw.stop_reason.as_deref().map(|r| match r {
        "max_tokens" => FinishReason::Length,
        "tool_use" => FinishReason::ToolCalls,
        _ => FinishReason::Stop,
    });

    Response {
        meta: CompletionMeta {
            id: raw.id,
            object: "chat.completion".into(),
            model: raw.model,
            ..Default::default()
        },
        choices: vec![Choice {
            index: 0,
            message: Delta {
                role: Some(llm::Role::Assistant),
                content: Some(content),
                reasoning_content: None,
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(tool_calls)
                },
            },
            finish_reason,
        }],
        usage: Some(Usage {
            prompt_tokens: raw.usage.input_tokens,
            completion_tokens: raw.usage.output_tokens,
            total_tokens: raw.usage.input_tokens + raw.usage.output_tokens,
        }),
    }
}
