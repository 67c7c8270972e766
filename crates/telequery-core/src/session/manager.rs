use serde_json::Value;
use tracing::{debug, info};

use super::QueryError;
use crate::api::RemoteClient;
use crate::auth::{AccountCredential, Authenticator};
use crate::query::{ProviderQuery, QueryOutcome};

pub struct SessionCacheManager<C: RemoteClient> {
    authenticator: Authenticator<C>,
}

impl<C: RemoteClient> Clone for SessionCacheManager<C> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
        }
    }
}

impl<C: RemoteClient> SessionCacheManager<C> {
    pub fn new(authenticator: Authenticator<C>) -> Self {
        Self { authenticator }
    }

    pub fn authenticator(&self) -> &Authenticator<C> {
        &self.authenticator
    }

    /// Run `query` for the account, reusing its cached session when the
    /// stored credential pair matches.
    ///
    /// An expired cached session triggers one re-login and one more attempt.
    /// Any other failure, including a failed re-login or a second expiry, is
    /// returned to the caller.
    pub async fn execute_with_session(
        &self,
        credential: &AccountCredential,
        query: &dyn ProviderQuery,
    ) -> Result<Value, QueryError> {
        let account_id = credential.account_id();
        let client: &dyn RemoteClient = self.authenticator.client();

        let cached = self
            .authenticator
            .store()
            .get(account_id)?
            .filter(|record| record.is_usable_for(credential));

        match cached {
            Some(record) => {
                debug!(account = account_id, query = query.name(), "Using cached session");
                match query.execute(client, &record.session()).await? {
                    QueryOutcome::Success(payload) => return Ok(payload),
                    QueryOutcome::BusinessFailure(payload) => return Err(QueryError::Business(payload)),
                    QueryOutcome::AuthExpired(_) => {
                        info!(account = account_id, query = query.name(), "Cached session expired, logging in again");
                    }
                }
            }
            None => {
                debug!(account = account_id, query = query.name(), "No usable cached session");
            }
        }

        let authenticated = self.authenticator.authenticate(credential).await?;

        match query.execute(client, &authenticated.record.session()).await? {
            QueryOutcome::Success(payload) => Ok(payload),
            outcome => Err(QueryError::Business(outcome.into_payload())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
