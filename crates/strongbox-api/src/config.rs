//! Secret-service configuration.

use crate::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Configuration for the credential service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Length of generated values and passwords when the request does not
    /// name one (default: 20).
    pub default_password_length: usize,
    /// Actor recorded on audit records when the transport supplies none.
    pub anonymous_actor: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_password_length: 20,
            anonymous_actor: None,
        }
    }
}

impl ServiceConfig {
    /// Clamp the configured default into the accepted password bounds.
    pub fn effective_password_length(&self) -> usize {
        self.default_password_length
            .clamp(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)
    }
}
