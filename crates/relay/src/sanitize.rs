//! Response sanitization before persistence.

use llm::{Message, Role};

/// Strip internal-only fields from a response message set.
///
/// Only assistant messages with visible content survive: tool plumbing
/// (tool-result messages, tool-call lists, call ids) exists for the
/// provider loop and is never persisted. The reasoning trace stays on
/// the message it was produced with.
pub fn sanitize_response_messages(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|m| m.role == Role::Assistant)
        .map(|mut m| {
            m.tool_calls.clear();
            m.tool_call_id = Default::default();
            m
        })
        .filter(|m| !m.content.trim().is_empty())
        .collect()
}
