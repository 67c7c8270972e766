//! Supported provider queries.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ProviderQuery;
use crate::api::{ApiError, RemoteClient};

/// Balance, voice and data usage overview (`qryImportantData`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportantData;

#[async_trait]
impl ProviderQuery for ImportantData {
    fn name(&self) -> &'static str {
        "qryImportantData"
    }

    async fn fetch(&self, client: &dyn RemoteClient, session: &Value) -> Result<Value, ApiError> {
        client.call(session, self.name(), Map::new()).await
    }
}

/// Subscribed data packages and their remaining allowance (`userFluxPackage`)
#[derive(Debug, Clone, Copy, Default)]
pub struct FluxPackage;

#[async_trait]
impl ProviderQuery for FluxPackage {
    fn name(&self) -> &'static str {
        "userFluxPackage"
    }

    async fn fetch(&self, client: &dyn RemoteClient, session: &Value) -> Result<Value, ApiError> {
        client.call(session, self.name(), Map::new()).await
    }
}

/// Shared-plan usage for a billing cycle (`qryShareUsage`).
/// Without a cycle the provider reports the current one.
#[derive(Debug, Clone, Default)]
pub struct ShareUsage {
    pub billing_cycle: Option<String>,
}

impl ShareUsage {
    pub fn new(billing_cycle: Option<String>) -> Self {
        Self { billing_cycle }
    }
}

#[async_trait]
impl ProviderQuery for ShareUsage {
    fn name(&self) -> &'static str {
        "qryShareUsage"
    }

    async fn fetch(&self, client: &dyn RemoteClient, session: &Value) -> Result<Value, ApiError> {
        let mut params = Map::new();
        if let Some(ref cycle) = self.billing_cycle {
            params.insert("billing_cycle".to_string(), Value::String(cycle.clone()));
        }
        client.call(session, self.name(), params).await
    }
}
