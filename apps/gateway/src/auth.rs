//! API key session resolution.
//!
//! Static lookup-based session gateway mapping bearer tokens to user
//! ids. Real identity providers slot in behind the same trait.

use crate::config::AuthConfig;
use compact_str::CompactString;
use relay::{Session, SessionGateway};
use std::collections::BTreeMap;

/// Resolves sessions via static API key lookup.
pub struct ApiKeySessions {
    /// Map from bearer token to user id.
    keys: BTreeMap<CompactString, CompactString>,
}

impl ApiKeySessions {
    /// Create from token -> user pairs.
    pub fn new(keys: BTreeMap<CompactString, CompactString>) -> Self {
        Self { keys }
    }

    /// Create from [`AuthConfig`].
    pub fn from_config(config: &AuthConfig) -> Self {
        let keys = config
            .api_keys
            .iter()
            .map(|entry| (CompactString::new(&entry.key), entry.user.clone()))
            .collect();
        Self { keys }
    }
}

impl SessionGateway for ApiKeySessions {
    fn resolve_session(
        &self,
        token: Option<&str>,
    ) -> impl Future<Output = Option<Session>> + Send {
        let session = token
            .and_then(|token| self.keys.get(token))
            .map(|user_id| Session {
                user_id: user_id.clone(),
            });
        std::future::ready(session)
    }
}
