//! Document suggestion tool.

use super::ToolContext;
use crate::StreamEvent;
use anyhow::{Context, Result};
use chrono::Utc;
use compact_str::CompactString;
use llm::{General, Message, Tool};
use model::Backends;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use store::{ChatStore, Suggestion};

/// The wire name of this tool.
pub const NAME: &str = "requestSuggestions";

/// Registry id of the internal model used to produce suggestions.
const SUGGESTION_MODEL: &str = "document-model";

/// Arguments for [`run`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Args {
    /// Id of the document to request suggestions for.
    #[serde(rename = "documentId")]
    pub document_id: String,
}

/// Tool declaration.
pub fn spec() -> Tool {
    Tool {
        name: NAME.into(),
        description: "Request improvement suggestions for a document".into(),
        parameters: schemars::schema_for!(Args),
        strict: false,
    }
}

/// Produce, persist, and emit improvement suggestions for a document.
pub async fn run<B: Backends, S: ChatStore>(
    arguments: &str,
    ctx: &ToolContext<'_, B, S>,
) -> Result<String> {
    let args: Args = serde_json::from_str(arguments)?;
    let document = ctx
        .store
        .document_by_id(&args.document_id)
        .await?
        .with_context(|| format!("document {} not found", args.document_id))?;
    if document.user_id != ctx.session.user_id {
        anyhow::bail!(
            "document {} is not owned by the current user",
            args.document_id
        );
    }

    let model = ctx
        .registry
        .resolve(SUGGESTION_MODEL)
        .context("suggestion model not registered")?;
    let messages = [
        Message::system(
            "Suggest improvements for the document. \
             Write one suggestion per line, no numbering.",
        ),
        Message::user(document.content.clone()),
    ];
    let response = ctx
        .backends
        .send(model, General::new(model.model.clone()), &messages)
        .await?;
    let content = response
        .content()
        .context("suggestion model returned no content")?;

    let suggestions: Vec<Suggestion> = content
        .lines()
        .map(|line| line.trim().trim_start_matches('-').trim())
        .filter(|line| !line.is_empty())
        .map(|line| Suggestion {
            id: CompactString::from(uuid::Uuid::new_v4().to_string()),
            document_id: document.id.clone(),
            description: line.to_owned(),
            created_at: Utc::now(),
        })
        .collect();

    ctx.store
        .save_suggestions(&suggestions)
        .await
        .context("failed to save suggestions")?;

    for suggestion in &suggestions {
        let _ = ctx.events.send(StreamEvent::Data {
            kind: "suggestion".into(),
            data: json!({
                "id": suggestion.id,
                "documentId": suggestion.document_id,
                "description": suggestion.description,
            }),
        });
    }

    Ok(format!(
        "Added {} suggestions to the document.",
        suggestions.len()
    ))
}
