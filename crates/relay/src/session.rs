//! Caller identity resolution.

use compact_str::CompactString;

/// The resolved identity of a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user id.
    pub user_id: CompactString,
}

impl Session {
    /// Create a session for the given user.
    pub fn new(user_id: impl Into<CompactString>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Resolves a caller's identity for a request.
///
/// External collaborator: the relay only consumes the resolved
/// [`Session`]; how tokens map to users is the gateway's concern.
pub trait SessionGateway: Send + Sync {
    /// Resolve the bearer token to a session, if any.
    fn resolve_session(
        &self,
        token: Option<&str>,
    ) -> impl Future<Output = Option<Session>> + Send;
}
