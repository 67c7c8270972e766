use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{AccountCredential, Allowlist, AuthError, SessionRecord};
use crate::api::{ApiError, RemoteClient};
use crate::store::CredentialStore;

/// Provider result code for a successful login
const LOGIN_SUCCESS_CODE: &str = "0000";

/// A successful login: the stored record plus the provider's raw response
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub record: SessionRecord,
    pub response: Value,
}

/// Performs provider logins and persists the resulting sessions.
pub struct Authenticator<C: RemoteClient> {
    client: Arc<C>,
    store: Arc<dyn CredentialStore>,
    allowlist: Option<Allowlist>,
}

impl<C: RemoteClient> Clone for Authenticator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: Arc::clone(&self.store),
            allowlist: self.allowlist.clone(),
        }
    }
}

impl<C: RemoteClient> Authenticator<C> {
    pub fn new(client: Arc<C>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            store,
            allowlist: None,
        }
    }

    /// Restrict logins to the listed account ids
    pub fn with_allowlist(mut self, allowlist: Allowlist) -> Self {
        self.allowlist = Some(allowlist);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Reject requests that must not reach the provider at all
    pub fn check_input(&self, credential: &AccountCredential) -> Result<(), AuthError> {
        if credential.is_incomplete() {
            return Err(AuthError::MissingCredential);
        }
        if let Some(ref allowlist) = self.allowlist {
            if !allowlist.permits(credential.account_id()) {
                return Err(AuthError::NotAllowlisted(credential.account_id().to_string()));
            }
        }
        Ok(())
    }

    /// Log in with the provider and persist the new session for this account.
    ///
    /// The store is only written on a provider success code; a rejected
    /// login returns the provider's response untouched.
    pub async fn authenticate(&self, credential: &AccountCredential) -> Result<Authenticated, AuthError> {
        self.check_input(credential)?;

        let account_id = credential.account_id();
        debug!(account = account_id, "Logging in with provider");

        let response = self.client.login(account_id, credential.secret()).await?;

        let result_code = response
            .pointer("/responseData/resultCode")
            .and_then(Value::as_str);
        if result_code != Some(LOGIN_SUCCESS_CODE) {
            warn!(account = account_id, result_code = ?result_code, "Provider rejected login");
            return Err(AuthError::InvalidCredentials(response));
        }

        let payload = response
            .pointer("/responseData/data/loginSuccessResult")
            .cloned()
            .ok_or_else(|| ApiError::InvalidResponse("Login response missing loginSuccessResult".to_string()))?;
        let record = SessionRecord::from_login(credential, payload).ok_or_else(|| {
            ApiError::InvalidResponse("loginSuccessResult is not an object".to_string())
        })?;

        self.store.upsert(account_id, record.clone())?;
        info!(account = account_id, "Login successful, session stored");

        Ok(Authenticated { record, response })
    }
}
