//! Request marshalling for the HTTP endpoints.
//!
//! Every endpoint accepts GET with a query string or POST with a JSON
//! object body. Results map to a status code plus a JSON body: provider
//! payloads pass through untouched, local rejections get `{"message"}`.

use std::sync::Arc;

use hyper::{Method, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use telequery_core::{AccountCredential, AuthError, Config, QueryError, QueryExecutor, RemoteClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    ImportantData,
    FluxPackage,
    ShareUsage,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/login" => Some(Endpoint::Login),
            "/qryImportantData" => Some(Endpoint::ImportantData),
            "/userFluxPackage" => Some(Endpoint::FluxPackage),
            "/qryShareUsage" => Some(Endpoint::ShareUsage),
            _ => None,
        }
    }
}

/// Credentials used when a request leaves them out
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    pub account: Option<String>,
    pub password: Option<String>,
}

impl Defaults {
    pub fn from_config(config: &Config) -> Self {
        Self {
            account: config.default_account.clone(),
            password: config.default_password.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RouteResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn failure(body: Value) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }

    fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }
}

pub struct Routes<C: RemoteClient> {
    executor: Arc<QueryExecutor<C>>,
    defaults: Arc<Defaults>,
}

impl<C: RemoteClient> Clone for Routes<C> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            defaults: Arc::clone(&self.defaults),
        }
    }
}

impl<C: RemoteClient> Routes<C> {
    pub fn new(executor: QueryExecutor<C>, defaults: Defaults) -> Self {
        Self {
            executor: Arc::new(executor),
            defaults: Arc::new(defaults),
        }
    }

    pub async fn dispatch(&self, method: &Method, path: &str, query: Option<&str>, body: &[u8]) -> RouteResponse {
        let Some(endpoint) = Endpoint::from_path(path) else {
            return RouteResponse::message(StatusCode::NOT_FOUND, format!("No route for {}", path));
        };

        let params = match *method {
            Method::GET => parse_query(query),
            Method::POST => match parse_body(body) {
                Ok(params) => params,
                Err(message) => return RouteResponse::message(StatusCode::BAD_REQUEST, message),
            },
            _ => {
                return RouteResponse::message(
                    StatusCode::METHOD_NOT_ALLOWED,
                    format!("{} is not supported", method),
                )
            }
        };

        let credential = self.credential(&params);
        info!(endpoint = ?endpoint, account = credential.account_id(), "Handling request");

        let result = match endpoint {
            Endpoint::Login => self.executor.login(&credential).await.map_err(QueryError::from),
            Endpoint::ImportantData => self.executor.important_data(&credential).await,
            Endpoint::FluxPackage => self.executor.flux_package(&credential).await,
            Endpoint::ShareUsage => {
                let cycle = param_string(&params, "billing_cycle");
                self.executor.share_usage(&credential, cycle).await
            }
        };

        match result {
            Ok(payload) => RouteResponse::ok(payload),
            Err(err) => {
                warn!(endpoint = ?endpoint, account = credential.account_id(), error = %err, "Request failed");
                error_response(err)
            }
        }
    }

    /// Request values win; configured defaults fill the gaps
    fn credential(&self, params: &Map<String, Value>) -> AccountCredential {
        let account = param_string(params, "phonenum")
            .or_else(|| self.defaults.account.clone())
            .unwrap_or_default();
        let password = param_string(params, "password")
            .or_else(|| self.defaults.password.clone())
            .unwrap_or_default();
        AccountCredential::new(account, password)
    }
}

fn error_response(err: QueryError) -> RouteResponse {
    match err {
        QueryError::Business(payload) => RouteResponse::failure(payload),
        QueryError::Auth(AuthError::InvalidCredentials(payload)) => RouteResponse::failure(payload),
        QueryError::Auth(err @ (AuthError::MissingCredential | AuthError::NotAllowlisted(_))) => {
            RouteResponse::message(StatusCode::BAD_REQUEST, err.to_string())
        }
        QueryError::Auth(err @ AuthError::Transport(_)) => {
            RouteResponse::message(StatusCode::BAD_GATEWAY, err.to_string())
        }
        err @ QueryError::Transport(_) => RouteResponse::message(StatusCode::BAD_GATEWAY, err.to_string()),
        QueryError::Auth(err @ AuthError::Storage(_)) => {
            RouteResponse::message(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        err @ QueryError::Storage(_) => {
            RouteResponse::message(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn parse_query(query: Option<&str>) -> Map<String, Value> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

fn parse_body(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("Request body must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid JSON body: {}", e)),
    }
}

/// Non-empty string or number parameter
fn param_string(params: &Map<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
