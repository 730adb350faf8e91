//! Directory access tokens

use super::DirectoryError;
use async_trait::async_trait;

/// Supplies the token attached to directory requests
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn auth_token(&self) -> Result<String, DirectoryError>;
}

/// Token taken from configuration
#[derive(Clone)]
pub struct StaticTokenAuth {
    token: String,
}

impl StaticTokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenAuth")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn auth_token(&self) -> Result<String, DirectoryError> {
        if self.token.trim().is_empty() {
            return Err(DirectoryError::Auth("access token is empty".to_string()));
        }
        Ok(self.token.clone())
    }
}
