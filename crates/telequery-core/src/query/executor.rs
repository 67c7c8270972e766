use serde_json::Value;

use super::{FluxPackage, ImportantData, ShareUsage};
use crate::api::RemoteClient;
use crate::auth::{AccountCredential, AuthError};
use crate::session::{QueryError, SessionCacheManager};

/// One method per supported provider query, each run under the session
/// cache policy.
pub struct QueryExecutor<C: RemoteClient> {
    manager: SessionCacheManager<C>,
}

impl<C: RemoteClient> Clone for QueryExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

impl<C: RemoteClient> QueryExecutor<C> {
    pub fn new(manager: SessionCacheManager<C>) -> Self {
        Self { manager }
    }

    /// Explicit login; returns the provider's raw login response
    pub async fn login(&self, credential: &AccountCredential) -> Result<Value, AuthError> {
        self.manager
            .authenticator()
            .authenticate(credential)
            .await
            .map(|authenticated| authenticated.response)
    }

    pub async fn important_data(&self, credential: &AccountCredential) -> Result<Value, QueryError> {
        self.manager.execute_with_session(credential, &ImportantData).await
    }

    pub async fn flux_package(&self, credential: &AccountCredential) -> Result<Value, QueryError> {
        self.manager.execute_with_session(credential, &FluxPackage).await
    }

    pub async fn share_usage(
        &self,
        credential: &AccountCredential,
        billing_cycle: Option<String>,
    ) -> Result<Value, QueryError> {
        self.manager
            .execute_with_session(credential, &ShareUsage::new(billing_cycle))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authenticator;
    use crate::store::{CredentialStore, MemoryCredentialStore};
    use crate::test_support::{login_ok, success, ScriptedClient};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login_then_queries_reuse_session() {
        let client = Arc::new(
            ScriptedClient::new()
                .with_login(Ok(login_ok("tok")))
                .with_call(Ok(success("important")))
                .with_call(Ok(success("flux")))
                .with_call(Ok(success("share"))),
        );
        let store = Arc::new(MemoryCredentialStore::new());
        let executor = QueryExecutor::new(SessionCacheManager::new(Authenticator::new(
            client.clone(),
            store.clone(),
        )));
        let cred = AccountCredential::new("1380000", "pw1");

        let login = executor.login(&cred).await.expect("login");
        assert_eq!(login, login_ok("tok"));
        assert!(store.get("1380000").expect("get").is_some());

        assert_eq!(executor.important_data(&cred).await.expect("important"), success("important"));
        assert_eq!(executor.flux_package(&cred).await.expect("flux"), success("flux"));
        assert_eq!(
            executor
                .share_usage(&cred, Some("202409".to_string()))
                .await
                .expect("share"),
            success("share")
        );

        assert_eq!(client.login_calls(), 1);
        let ops: Vec<String> = client.calls().into_iter().map(|c| c.operation).collect();
        assert_eq!(ops, vec!["qryImportantData", "userFluxPackage", "qryShareUsage"]);
    }
}
