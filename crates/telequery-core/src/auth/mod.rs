//! Authentication module for provider logins and cached sessions.
//!
//! This module provides:
//! - `AccountCredential`: the account id / password pair presented per request
//! - `Allowlist`: optional set of account ids permitted to log in
//! - `SessionRecord`: a provider session bound to the pair that produced it
//! - `Authenticator`: performs the remote login and persists the new session

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod session;

pub use authenticator::{Authenticated, Authenticator};
pub use credentials::{AccountCredential, Allowlist};
pub use error::AuthError;
pub use session::SessionRecord;
