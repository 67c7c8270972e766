//! hyper listener loop: one task per connection, HTTP/1 only.

use std::convert::Infallible;

use anyhow::{Context, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use telequery_core::RemoteClient;

use crate::routes::{RouteResponse, Routes};

pub async fn serve<C>(addr: &str, routes: Routes<C>) -> Result<()>
where
    C: RemoteClient + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = addr, "Listening");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                let routes = routes.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| handle(routes.clone(), req));
                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        debug!(peer = %peer, error = %e, "Connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

async fn handle<C: RemoteClient>(
    routes: Routes<C>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let route_response = match body.collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            routes
                .dispatch(&parts.method, parts.uri.path(), parts.uri.query(), &bytes)
                .await
        }
        Err(e) => RouteResponse {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "message": format!("Failed to read request body: {}", e) }),
        },
    };

    debug!(
        method = %parts.method,
        path = parts.uri.path(),
        status = route_response.status.as_u16(),
        "Request complete"
    );
    Ok(to_http(route_response))
}

fn to_http(route_response: RouteResponse) -> Response<Full<Bytes>> {
    // Value serialization cannot fail: keys are always strings
    let body = serde_json::to_vec(&route_response.body).unwrap_or_default();
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = route_response.status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    response
}
