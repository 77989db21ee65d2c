//! The streaming relay state machine.
//!
//! `INIT → AUTHENTICATED → CHAT_RESOLVED → USER_MESSAGE_PERSISTED →
//! STREAMING → COMPLETED | FAILED`. Everything before streaming fails
//! synchronously with a typed [`RelayError`]; once the stream has
//! started, provider failures become a single generic in-band error
//! event and the caller never sees internal detail.

use crate::{
    RelayError, Session, StreamEvent, Toolbox, WordSmoother, assemble,
    extract::{self, Extracted, ReasoningExtractor},
    prompt::ProviderCall,
    sanitize::sanitize_response_messages,
    title::derive_title,
    tools::ToolContext,
};
use chrono::Utc;
use compact_str::CompactString;
use futures_util::StreamExt;
use llm::{FinishReason, Message, MessageBuilder, Role, ToolChoice};
use model::{Backends, ChatModelConfig, ModelRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::{Chat, ChatMessage, ChatStore};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Hard ceiling on provider/tool round trips per request, enforced by
/// the relay's own loop counter.
pub const MAX_STEPS: usize = 5;

/// The single message callers see when the provider fails mid-stream.
const GENERIC_ERROR: &str = "Oops, an error occurred!";

/// An inbound chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Caller-supplied chat id.
    pub id: CompactString,
    /// The conversation transcript, oldest first.
    pub messages: Vec<Message>,
    /// The model id to route this request through.
    pub selected_chat_model: CompactString,
}

/// The provider-routing and response-streaming relay.
///
/// Registries are read-only after startup; each request runs as an
/// independent task with no shared mutable state beyond the store.
#[derive(Clone)]
pub struct Relay<B, S> {
    registry: Arc<ModelRegistry>,
    backends: B,
    store: S,
    toolbox: Toolbox,
}

impl<B: Backends + 'static, S: ChatStore + 'static> Relay<B, S> {
    /// Create a relay over the given registry, backends, and store.
    pub fn new(registry: Arc<ModelRegistry>, backends: B, store: S, toolbox: Toolbox) -> Self {
        Self {
            registry,
            backends,
            store,
            toolbox,
        }
    }

    /// Run the relay for one request.
    ///
    /// Performs every pre-stream step (authentication, model
    /// resolution, transcript validation, chat resolution, durable
    /// append of the user message), then spawns the streaming task and
    /// returns its ordered event stream.
    pub async fn chat(
        &self,
        session: Option<Session>,
        request: ChatRequest,
    ) -> Result<UnboundedReceiverStream<StreamEvent>, RelayError> {
        let session = session.ok_or(RelayError::Unauthorized)?;
        let model = self
            .registry
            .resolve(&request.selected_chat_model)?
            .clone();

        let user_message = request
            .messages
            .last()
            .filter(|m| m.role == Role::User)
            .cloned()
            .ok_or(RelayError::NoUserMessage)?;

        // Resolve the chat, creating it with a derived title on the
        // first message. Storage guards id uniqueness, so a lost race
        // between two first messages is harmless.
        match self
            .store
            .chat_by_id(&request.id)
            .await
            .map_err(RelayError::Persistence)?
        {
            Some(chat) if chat.user_id != session.user_id => {
                return Err(RelayError::Unauthorized);
            }
            Some(_) => {}
            None => {
                self.store
                    .save_chat(&Chat {
                        id: request.id.clone(),
                        user_id: session.user_id.clone(),
                        title: derive_title(&user_message.content),
                        created_at: Utc::now(),
                    })
                    .await
                    .map_err(RelayError::Persistence)?;
            }
        }

        // Durably append the user message before any provider call, so
        // a later failure never loses the user's input.
        self.store
            .save_messages(&[ChatMessage {
                id: new_id(),
                chat_id: request.id.clone(),
                role: Role::User,
                content: user_message.content.clone(),
                reasoning: None,
                created_at: Utc::now(),
            }])
            .await
            .map_err(RelayError::Persistence)?;

        let call = assemble(&request.messages, &model, &self.toolbox.specs())?;

        let (tx, rx) = mpsc::unbounded_channel();
        let relay = self.clone();
        tokio::spawn(async move {
            relay.run_stream(session, request.id, model, call, tx).await;
        });

        Ok(UnboundedReceiverStream::new(rx))
    }

    /// The streaming phase: provider rounds, tool dispatch, sanitized
    /// persistence, terminal event.
    ///
    /// Send failures on `tx` mean the caller disconnected; in-flight
    /// work is abandoned without compensating rollback.
    async fn run_stream(
        self,
        session: Session,
        chat_id: CompactString,
        model: ChatModelConfig,
        call: ProviderCall,
        tx: UnboundedSender<StreamEvent>,
    ) {
        let ProviderCall {
            mut messages,
            mut config,
        } = call;
        let mut new_messages: Vec<Message> = Vec::new();
        let mut completed = false;

        'steps: for _ in 0..MAX_STEPS {
            let mut builder = MessageBuilder::new(Role::Assistant);
            let mut text_smoother = WordSmoother::new();
            let mut reasoning_smoother = WordSmoother::new();
            let mut extractor = model.reasoning_tag.as_deref().map(ReasoningExtractor::new);

            {
                let stream = self.backends.stream(&model, config.clone(), &messages);
                let mut stream = std::pin::pin!(stream);
                while let Some(result) = stream.next().await {
                    let chunk = match result {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            tracing::error!(chat = %chat_id, "provider stream error: {e:#}");
                            let _ = tx.send(StreamEvent::Error {
                                message: GENERIC_ERROR.to_owned(),
                            });
                            return;
                        }
                    };

                    builder.accept(&chunk);

                    if let Some(delta) = chunk.reasoning_content()
                        && !emit_reasoning(&tx, &mut reasoning_smoother, delta)
                    {
                        return;
                    }

                    if let Some(delta) = chunk.content() {
                        let routed = match extractor.as_mut() {
                            Some(extractor) => extractor.push(delta),
                            None => Extracted {
                                text: delta.to_owned(),
                                ..Default::default()
                            },
                        };
                        if !routed.reasoning.is_empty()
                            && !emit_reasoning(&tx, &mut reasoning_smoother, &routed.reasoning)
                        {
                            return;
                        }
                        if !routed.text.is_empty()
                            && !emit_text(&tx, &mut text_smoother, &routed.text)
                        {
                            return;
                        }
                    }

                    if let Some(reason) = chunk.reason() {
                        match reason {
                            FinishReason::Stop | FinishReason::Length => break,
                            FinishReason::ToolCalls => break,
                            FinishReason::ContentFilter => {
                                tracing::error!(chat = %chat_id, "provider filtered the response");
                                let _ = tx.send(StreamEvent::Error {
                                    message: GENERIC_ERROR.to_owned(),
                                });
                                return;
                            }
                        }
                    }
                }
            }

            // Drain the extractor and smoothers so no trailing partial
            // word or unclosed trace is lost.
            if let Some(mut extractor) = extractor.take() {
                let rest = extractor.flush();
                if !rest.reasoning.is_empty()
                    && !emit_reasoning(&tx, &mut reasoning_smoother, &rest.reasoning)
                {
                    return;
                }
                if !rest.text.is_empty() && !emit_text(&tx, &mut text_smoother, &rest.text) {
                    return;
                }
            }
            if let Some(rest) = reasoning_smoother.flush()
                && tx.send(StreamEvent::ReasoningDelta { delta: rest }).is_err()
            {
                return;
            }
            if let Some(rest) = text_smoother.flush()
                && tx.send(StreamEvent::TextDelta { delta: rest }).is_err()
            {
                return;
            }

            let message = builder.build();
            if message.tool_calls.is_empty() {
                new_messages.push(message);
                completed = true;
                break 'steps;
            }

            // Dispatch tool calls in the order the model issued them,
            // interleaving their progress onto the outbound channel.
            let mut results = Vec::with_capacity(message.tool_calls.len());
            for call in &message.tool_calls {
                let event = StreamEvent::ToolCall {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                };
                if tx.send(event).is_err() {
                    return;
                }

                let ctx = ToolContext {
                    session: &session,
                    store: &self.store,
                    backends: &self.backends,
                    registry: &self.registry,
                    events: &tx,
                };
                let result = self.toolbox.dispatch(call, &ctx).await;

                let event = StreamEvent::ToolResult {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    output: result.content.clone(),
                };
                if tx.send(event).is_err() {
                    return;
                }
                results.push(result);
            }

            messages.push(message.clone());
            messages.extend(results.iter().cloned());
            new_messages.push(message);
            new_messages.extend(results);
            config.tool_choice = Some(ToolChoice::None);
        }

        if !completed {
            tracing::warn!(chat = %chat_id, "tool-call step limit reached after {MAX_STEPS} steps");
        }

        // Persist the sanitized assistant turn. A failure here is
        // logged and swallowed: the stream already reached the caller
        // and is reported as successful regardless.
        let records = persistable_records(new_messages, &chat_id, &model);
        if !records.is_empty()
            && let Err(e) = self.store.save_messages(&records).await
        {
            tracing::error!(chat = %chat_id, "failed to save assistant messages: {e:#}");
        }

        let _ = tx.send(StreamEvent::Finish);
    }
}

/// Sanitize response messages and reconcile reasoning placement into
/// durable records.
fn persistable_records(
    new_messages: Vec<Message>,
    chat_id: &str,
    model: &ChatModelConfig,
) -> Vec<ChatMessage> {
    let mut sanitized = sanitize_response_messages(new_messages);

    if let Some(tag) = model.reasoning_tag.as_deref() {
        for message in &mut sanitized {
            let split = extract::extract(&message.content, tag);
            if !split.reasoning.is_empty() {
                message.content = split.text;
                message.reasoning_content.push_str(&split.reasoning);
            }
        }
        sanitized.retain(|m| !m.content.trim().is_empty());
    }

    sanitized
        .into_iter()
        .map(|message| ChatMessage {
            id: new_id(),
            chat_id: chat_id.into(),
            role: Role::Assistant,
            content: message.content,
            reasoning: (!message.reasoning_content.is_empty())
                .then_some(message.reasoning_content),
            created_at: Utc::now(),
        })
        .collect()
}

fn new_id() -> CompactString {
    CompactString::from(uuid::Uuid::new_v4().to_string())
}

fn emit_text(
    tx: &UnboundedSender<StreamEvent>,
    smoother: &mut WordSmoother,
    delta: &str,
) -> bool {
    for piece in smoother.push(delta) {
        if tx.send(StreamEvent::TextDelta { delta: piece }).is_err() {
            return false;
        }
    }
    true
}

fn emit_reasoning(
    tx: &UnboundedSender<StreamEvent>,
    smoother: &mut WordSmoother,
    delta: &str,
) -> bool {
    for piece in smoother.push(delta) {
        if tx.send(StreamEvent::ReasoningDelta { delta: piece }).is_err() {
            return false;
        }
    }
    true
}
