//! The relay error taxonomy.

use model::UnknownModel;

/// Everything that can fail between an inbound request and the stream.
///
/// `Unauthorized`, `NoUserMessage`, and `UnknownModel` are detected
/// before streaming starts and surface as synchronous HTTP errors.
/// Provider failures after streaming has begun never appear here — they
/// are converted into a single in-band error event instead.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// No resolvable session for the caller.
    #[error("unauthorized")]
    Unauthorized,

    /// The transcript is empty or does not end with a user message.
    #[error("no user message found")]
    NoUserMessage,

    /// The selected model id is not in the registry.
    #[error(transparent)]
    UnknownModel(#[from] UnknownModel),

    /// The upstream provider call failed before streaming started.
    #[error("provider error: {0}")]
    Provider(#[source] anyhow::Error),

    /// A write to the durable store failed.
    #[error("persistence error: {0}")]
    Persistence(#[source] anyhow::Error),
}
