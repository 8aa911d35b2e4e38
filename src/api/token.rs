use std::fmt;
use std::sync::Arc;

/// The credential sent in the `token` header. Fixed for the lifetime of the
/// client, so it is shared without locking.
#[derive(Clone, Default)]
pub struct TokenStore(Option<Arc<str>>);

impl TokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self(
            token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .map(Arc::from),
        )
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("TokenStore(<redacted>)"),
            None => f.write_str("TokenStore(None)"),
        }
    }
}
