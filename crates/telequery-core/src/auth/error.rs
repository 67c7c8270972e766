use serde_json::Value;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Account id and password are required")]
    MissingCredential,

    #[error("Account {0} is not on the allow-list")]
    NotAllowlisted(String),

    #[error("Provider login failed: {0}")]
    Transport(#[from] ApiError),

    /// Provider rejected the login; carries its raw response
    #[error("Provider rejected the credentials")]
    InvalidCredentials(Value),

    #[error("Session store error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AuthError {
    /// Raw provider payload, for errors that carry one
    pub fn provider_payload(&self) -> Option<&Value> {
        match self {
            AuthError::InvalidCredentials(payload) => Some(payload),
            _ => None,
        }
    }
}
