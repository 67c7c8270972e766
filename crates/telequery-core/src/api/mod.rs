//! Client module for the upstream account-data provider.
//!
//! This module provides the `RemoteClient` seam used by the authenticator
//! and the provider queries, plus `HttpRemoteClient`, its reqwest-backed
//! implementation.

pub mod client;
pub mod error;

pub use client::{HttpRemoteClient, RemoteClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
