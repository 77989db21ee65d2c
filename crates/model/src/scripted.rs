//! Scripted provider pool for tests.
//!
//! Plays back pre-programmed stream turns and responses instead of
//! calling any network, and records every call so tests can assert on
//! ordering (e.g. "no provider call happened before validation failed").

use crate::{Backends, registry::ChatModelConfig};
use anyhow::Result;
use compact_str::CompactString;
use futures_core::Stream;
use llm::{
    Choice, CompletionMeta, Delta, FinishReason, General, Message, Response, Role, StreamChunk,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// A recorded provider call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The public id of the model the call was routed for.
    pub model_id: CompactString,
    /// The call configuration.
    pub config: General,
    /// The messages sent.
    pub messages: Vec<Message>,
    /// Whether the call was streaming.
    pub streaming: bool,
}

/// One scripted stream item: a chunk or an error message.
type ScriptedItem = Result<StreamChunk, String>;

#[derive(Default)]
struct Inner {
    turns: Mutex<VecDeque<Vec<ScriptedItem>>>,
    sends: Mutex<VecDeque<Result<Response, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// A [`Backends`] implementation that plays back scripted turns.
#[derive(Clone, Default)]
pub struct ScriptedPool {
    inner: Arc<Inner>,
}

impl ScriptedPool {
    /// Create an empty pool. Any call against it fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a streaming turn that yields the given chunks.
    pub fn push_turn(&self, chunks: Vec<StreamChunk>) {
        self.inner
            .turns
            .lock()
            .unwrap()
            .push_back(chunks.into_iter().map(Ok).collect());
    }

    /// Queue a streaming turn that yields `chunks` then fails.
    pub fn push_failing_turn(&self, chunks: Vec<StreamChunk>, error: impl Into<String>) {
        let mut items: Vec<ScriptedItem> = chunks.into_iter().map(Ok).collect();
        items.push(Err(error.into()));
        self.inner.turns.lock().unwrap().push_back(items);
    }

    /// Queue a non-streaming response.
    pub fn push_send(&self, response: Response) {
        self.inner.sends.lock().unwrap().push_back(Ok(response));
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().unwrap().clone()
    }

    fn record(&self, model: &ChatModelConfig, config: &General, messages: &[Message], streaming: bool) {
        self.inner.calls.lock().unwrap().push(RecordedCall {
            model_id: model.id.clone(),
            config: config.clone(),
            messages: messages.to_vec(),
            streaming,
        });
    }
}

/// Build a plain assistant response, for scripting non-streaming calls.
pub fn response(content: impl Into<String>) -> Response {
    Response {
        meta: CompletionMeta::default(),
        choices: vec![Choice {
            index: 0,
            message: Delta {
                role: Some(Role::Assistant),
                content: Some(content.into()),
                reasoning_content: None,
                tool_calls: None,
            },
            finish_reason: Some(FinishReason::Stop),
        }],
        usage: None,
    }
}

impl Backends for ScriptedPool {
    async fn send(
        &self,
        model: &ChatModelConfig,
        config: General,
        messages: &[Message],
    ) -> Result<Response> {
        self.record(model, &config, messages, false);
        match self.inner.sends.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
            None => Err(anyhow::anyhow!("no scripted response queued")),
        }
    }

    fn stream(
        &self,
        model: &ChatModelConfig,
        config: General,
        messages: &[Message],
    ) -> impl Stream<Item = Result<StreamChunk>> + Send {
        self.record(model, &config, messages, true);
        let turn = self.inner.turns.lock().unwrap().pop_front();
        async_stream::stream! {
            match turn {
                Some(items) => {
                    for item in items {
                        yield item.map_err(|e| anyhow::anyhow!(e));
                    }
                }
                None => yield Err(anyhow::anyhow!("no scripted turn queued")),
            }
        }
    }
}
