//! Session cache and transparent re-authentication.
//!
//! `SessionCacheManager` decides per request whether the stored session for
//! an account can be reused, and re-authenticates at most once when the
//! provider reports the session as expired.

pub mod error;
pub mod manager;

pub use error::QueryError;
pub use manager::SessionCacheManager;
