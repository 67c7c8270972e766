use serde_json::Value;
use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Provider reported a failure for the query; carries its raw response
    #[error("Provider query failed")]
    Business(Value),

    #[error("Provider query failed: {0}")]
    Transport(#[from] ApiError),

    #[error("Session store error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl QueryError {
    /// Raw provider payload, for errors that carry one
    pub fn provider_payload(&self) -> Option<&Value> {
        match self {
            QueryError::Business(payload) => Some(payload),
            QueryError::Auth(err) => err.provider_payload(),
            _ => None,
        }
    }
}
