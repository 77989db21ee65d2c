//! Document creation and update tools.
//!
//! Documents are long-form content the model builds outside the chat
//! reply. Content is generated through the internal document model and
//! streamed into the request's outbound channel as progress events, so
//! the client renders the document as it grows.

use super::ToolContext;
use crate::StreamEvent;
use anyhow::{Context, Result};
use chrono::Utc;
use compact_str::CompactString;
use futures_util::StreamExt;
use llm::{General, Message, Tool};
use model::Backends;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use store::{ChatStore, Document};

/// The wire name of the creation tool.
pub const CREATE_NAME: &str = "createDocument";
/// The wire name of the update tool.
pub const UPDATE_NAME: &str = "updateDocument";

/// Registry id of the internal model used to generate document content.
const DOCUMENT_MODEL: &str = "document-model";

/// Arguments for [`create`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateArgs {
    /// Title of the document to create.
    pub title: String,
    /// Document kind (e.g. "text").
    #[serde(default = "default_kind")]
    pub kind: String,
}

/// Arguments for [`update`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateArgs {
    /// Id of the document to update.
    pub id: String,
    /// Description of the requested change.
    pub description: String,
}

fn default_kind() -> String {
    "text".to_owned()
}

/// Declaration of the creation tool.
pub fn create_spec() -> Tool {
    Tool {
        name: CREATE_NAME.into(),
        description: "Create a document for writing or content creation".into(),
        parameters: schemars::schema_for!(CreateArgs),
        strict: false,
    }
}

/// Declaration of the update tool.
pub fn update_spec() -> Tool {
    Tool {
        name: UPDATE_NAME.into(),
        description: "Update an existing document with the described changes".into(),
        parameters: schemars::schema_for!(UpdateArgs),
        strict: false,
    }
}

/// Create a new document owned by the session user.
pub async fn create<B: Backends, S: ChatStore>(
    arguments: &str,
    ctx: &ToolContext<'_, B, S>,
) -> Result<String> {
    let args: CreateArgs = serde_json::from_str(arguments)?;
    let id = CompactString::from(uuid::Uuid::new_v4().to_string());

    let _ = ctx.events.send(StreamEvent::Data {
        kind: "document".into(),
        data: json!({ "id": id, "title": args.title, "kind": args.kind }),
    });

    let content = generate(
        ctx,
        &id,
        "Write about the given topic. Markdown is supported. Be thorough.",
        &args.title,
    )
    .await?;

    ctx.store
        .save_document(&Document {
            id: id.clone(),
            user_id: ctx.session.user_id.clone(),
            title: args.title.clone(),
            kind: args.kind.into(),
            content,
            created_at: Utc::now(),
        })
        .await
        .context("failed to save document")?;

    let _ = ctx.events.send(StreamEvent::Data {
        kind: "document-finish".into(),
        data: json!({ "id": id }),
    });

    Ok(json!({
        "id": id,
        "title": args.title,
        "content": "A document was created and is now visible to the user.",
    })
    .to_string())
}

/// Rewrite an existing document per the described change.
pub async fn update<B: Backends, S: ChatStore>(
    arguments: &str,
    ctx: &ToolContext<'_, B, S>,
) -> Result<String> {
    let args: UpdateArgs = serde_json::from_str(arguments)?;
    let document = ctx
        .store
        .document_by_id(&args.id)
        .await?
        .with_context(|| format!("document {} not found", args.id))?;
    if document.user_id != ctx.session.user_id {
        anyhow::bail!("document {} is not owned by the current user", args.id);
    }

    let _ = ctx.events.send(StreamEvent::Data {
        kind: "document-clear".into(),
        data: json!({ "id": document.id }),
    });

    let prompt = format!(
        "Current document:\n\n{}\n\nRequested change: {}",
        document.content, args.description
    );
    let content = generate(
        ctx,
        &document.id,
        "Rewrite the document applying the requested change. \
         Return only the updated document content.",
        &prompt,
    )
    .await?;

    ctx.store
        .save_document(&Document {
            content,
            ..document.clone()
        })
        .await
        .context("failed to save document")?;

    let _ = ctx.events.send(StreamEvent::Data {
        kind: "document-finish".into(),
        data: json!({ "id": document.id }),
    });

    Ok(json!({
        "id": document.id,
        "title": document.title,
        "content": "The document has been updated successfully.",
    })
    .to_string())
}

/// Stream document content from the internal document model, emitting a
/// progress event per delta, and return the accumulated content.
async fn generate<B: Backends, S: ChatStore>(
    ctx: &ToolContext<'_, B, S>,
    document_id: &str,
    system: &str,
    prompt: &str,
) -> Result<String> {
    let model = ctx
        .registry
        .resolve(DOCUMENT_MODEL)
        .context("document model not registered")?;
    let messages = [Message::system(system), Message::user(prompt)];
    let config = General::new(model.model.clone());

    let mut content = String::new();
    let stream = ctx.backends.stream(model, config, &messages);
    let mut stream = std::pin::pin!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(delta) = chunk.content() {
            content.push_str(delta);
            let _ = ctx.events.send(StreamEvent::Data {
                kind: "document-delta".into(),
                data: json!({ "id": document_id, "delta": delta }),
            });
        }
    }
    Ok(content)
}
