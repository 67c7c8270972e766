//! Application configuration management.
//!
//! Configuration comes from environment variables (a `.env` file is loaded
//! by the binary before this runs):
//!
//! - `PROVIDER_BASE_URL` (required): base URL of the upstream provider
//! - `CONFIG_PATH`: session store file, default `./config/login_info.json`
//! - `PHONENUM` / `PASSWORD`: credentials used when a request omits them
//! - `WHITELIST_NUM`: account ids allowed to log in
//! - `HOST` / `PORT`: listen address, default `0.0.0.0:10000`
//! - `REQUEST_TIMEOUT_SECS`: provider request timeout, default 30
//! - `DEBUG`: verbose logging when truthy
//! - `LOG_DIR`: also write daily-rotated log files here

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::auth::Allowlist;
use crate::store::file::DEFAULT_STORE_PATH;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 10000;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider_base_url: String,
    pub store_path: PathBuf,
    pub default_account: Option<String>,
    pub default_password: Option<String>,
    pub allowlist: Option<Allowlist>,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub debug: bool,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider_base_url = get("PROVIDER_BASE_URL")
            .ok_or_else(|| anyhow::anyhow!("PROVIDER_BASE_URL must be set"))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid REQUEST_TIMEOUT_SECS: {}", raw))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            provider_base_url,
            store_path: get("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            default_account: get("PHONENUM"),
            default_password: get("PASSWORD"),
            allowlist: get("WHITELIST_NUM").map(|raw| Allowlist::parse(&raw)),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            debug: get("DEBUG").map(|v| is_truthy_flag(&v)).unwrap_or(false),
            log_dir: get("LOG_DIR").map(PathBuf::from),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_truthy_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
