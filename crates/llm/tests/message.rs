//! Tests for message construction and stream accumulation.

use otter_llm::{
    FinishReason, FunctionCall, Message, MessageBuilder, Role, StreamChunk, ToolCall,
};

#[test]
fn constructors_set_roles() {
    assert_eq!(Message::system("s").role, Role::System);
    assert_eq!(Message::user("u").role, Role::User);
    assert_eq!(Message::assistant("a").role, Role::Assistant);

    let tool = Message::tool("output", "call-1");
    assert_eq!(tool.role, Role::Tool);
    assert_eq!(tool.tool_call_id, "call-1");
}

#[test]
fn role_serializes_lowercase() {
    let msg = Message::user("hi");
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["role"], "user");
    assert_eq!(json["content"], "hi");
}

#[test]
fn builder_accumulates_content() {
    let mut builder = MessageBuilder::new(Role::Assistant);
    builder.accept(&StreamChunk::text("Hello"));
    builder.accept(&StreamChunk::text(", world"));
    builder.accept(&StreamChunk::finish(FinishReason::Stop));

    let message = builder.build();
    assert_eq!(message.content, "Hello, world");
    assert!(message.tool_calls.is_empty());
}

#[test]
fn builder_accumulates_reasoning_separately() {
    let mut builder = MessageBuilder::new(Role::Assistant);
    builder.accept(&StreamChunk::reasoning("thinking "));
    builder.accept(&StreamChunk::reasoning("hard"));
    builder.accept(&StreamChunk::text("answer"));

    let message = builder.build();
    assert_eq!(message.content, "answer");
    assert_eq!(message.reasoning_content, "thinking hard");
}

#[test]
fn builder_merges_streamed_tool_call_fragments() {
    let mut builder = MessageBuilder::new(Role::Assistant);
    builder.accept(&StreamChunk::tool(&[ToolCall {
        id: "call-1".into(),
        index: 0,
        call_type: "function".into(),
        function: FunctionCall {
            name: "getWeather".into(),
            arguments: "{\"latitude\":".into(),
        },
    }]));
    builder.accept(&StreamChunk::tool(&[ToolCall {
        index: 0,
        function: FunctionCall {
            arguments: "48.85,\"longitude\":2.35}".into(),
            ..Default::default()
        },
        ..Default::default()
    }]));

    let message = builder.build();
    assert_eq!(message.tool_calls.len(), 1);
    let call = &message.tool_calls[0];
    assert_eq!(call.id, "call-1");
    assert_eq!(call.function.name, "getWeather");
    assert_eq!(
        call.function.arguments,
        "{\"latitude\":48.85,\"longitude\":2.35}"
    );
}

#[test]
fn builder_keeps_parallel_tool_calls_by_index() {
    let mut builder = MessageBuilder::new(Role::Assistant);
    builder.accept(&StreamChunk::tool(&[
        ToolCall {
            id: "a".into(),
            index: 0,
            function: FunctionCall {
                name: "getWeather".into(),
                arguments: "{}".into(),
            },
            ..Default::default()
        },
        ToolCall {
            id: "b".into(),
            index: 1,
            function: FunctionCall {
                name: "createDocument".into(),
                arguments: "{}".into(),
            },
            ..Default::default()
        },
    ]));

    let message = builder.build();
    assert_eq!(message.tool_calls.len(), 2);
    assert_eq!(message.tool_calls[0].id, "a");
    assert_eq!(message.tool_calls[1].id, "b");
}

#[test]
fn chunk_accessors_filter_empty_strings() {
    let chunk = StreamChunk::text("");
    assert!(chunk.content().is_none());

    let chunk = StreamChunk::reasoning("");
    assert!(chunk.reasoning_content().is_none());

    let chunk = StreamChunk::finish(FinishReason::ToolCalls);
    assert_eq!(chunk.reason(), Some(&FinishReason::ToolCalls));
    assert!(chunk.content().is_none());
}

#[test]
fn stream_chunk_deserializes_openai_shape() {
    let raw = r#"{
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "delta": { "content": "Hi" },
            "finish_reason": null
        }]
    }"#;
    let chunk: StreamChunk = serde_json::from_str(raw).unwrap();
    assert_eq!(chunk.content(), Some("Hi"));
    assert!(chunk.reason().is_none());
}
