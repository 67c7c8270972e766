//! telequery core - cached provider sessions with transparent re-login.
//!
//! Callers present an account id and password with every query. The
//! session cache manager reuses the stored provider session when the pair
//! matches, logs in again once if the provider reports the session as
//! expired, and otherwise hands the provider's response back unchanged.

pub mod api;
pub mod auth;
pub mod config;
pub mod query;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiError, HttpRemoteClient, RemoteClient};
pub use auth::{AccountCredential, Allowlist, AuthError, Authenticated, Authenticator, SessionRecord};
pub use config::Config;
pub use query::{ProviderQuery, QueryExecutor, QueryOutcome};
pub use session::{QueryError, SessionCacheManager};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
