//! Provider queries and the classification of their responses.
//!
//! Each supported query is a type implementing `ProviderQuery`; the
//! session cache manager runs it against whichever session is installed.
//! `QueryExecutor` exposes one method per query for the route layer.

pub mod executor;
pub mod outcome;
pub mod queries;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, RemoteClient};

pub use executor::QueryExecutor;
pub use outcome::{QueryOutcome, SESSION_EXPIRED_CODE};
pub use queries::{FluxPackage, ImportantData, ShareUsage};

#[async_trait]
pub trait ProviderQuery: Send + Sync {
    /// Provider operation name, also used in logs
    fn name(&self) -> &'static str;

    /// Run the query with `session` installed and return the raw response
    async fn fetch(&self, client: &dyn RemoteClient, session: &Value) -> Result<Value, ApiError>;

    async fn execute(&self, client: &dyn RemoteClient, session: &Value) -> Result<QueryOutcome, ApiError> {
        self.fetch(client, session).await.map(QueryOutcome::classify)
    }
}
