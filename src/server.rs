//! HTTP Surface
//!
//! Minimal hyper server exposing the leaderboard read path.
//!
//! | Route                      | Response                                        |
//! |----------------------------|-------------------------------------------------|
//! | `GET /leaderboards/{id}`   | `{ balances, page, total_pages }`               |
//! | `/healthz` `/livez` `/readyz` | `ok`                                          |
//! | `/metrics`                 | Prometheus text exposition                      |
//!
//! Source failures become a bare 500; the cause is logged, never returned.

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::LeaderboardId;
use crate::error::Result;
use crate::leaderboard::LeaderboardService;
use crate::pagination::RawQuery;
use crate::telemetry;

const LEADERBOARD_ROUTE: &str = "/leaderboards/";
const INTERNAL_ERROR_BODY: &str = r#"{"error":"internal server error"}"#;

/// Accept connections until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    service: Arc<LeaderboardService>,
    shutdown: CancellationToken,
) -> Result<()> {
    info!("Leaderboard API listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Leaderboard API stopping");
                return Ok(());
            }
            accepted = listener.accept() => accepted?,
        };

        let io = TokioIo::new(stream);
        let service = Arc::clone(&service);

        tokio::spawn(async move {
            let handler = service_fn(move |req: Request<Incoming>| {
                let service = Arc::clone(&service);
                let span = info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %req.method(),
                    path = %req.uri().path(),
                );
                async move {
                    Ok::<_, Infallible>(handle(&service, req.method(), req.uri()).await)
                }
                .instrument(span)
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, handler).await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Route one request.
pub async fn handle(
    service: &LeaderboardService,
    method: &Method,
    uri: &Uri,
) -> Response<Full<Bytes>> {
    let path = uri.path();

    match path {
        "/healthz" | "/livez" | "/readyz" => {
            return respond(StatusCode::OK, "text/plain", Bytes::from_static(b"ok"))
        }
        "/metrics" => return metrics(),
        _ => {}
    }

    let Some(raw_id) = path.strip_prefix(LEADERBOARD_ROUTE) else {
        return not_found();
    };
    if raw_id.is_empty() || raw_id.contains('/') {
        return not_found();
    }
    if method != Method::GET {
        return respond(
            StatusCode::METHOD_NOT_ALLOWED,
            "text/plain",
            Bytes::from_static(b"method not allowed"),
        );
    }

    let leaderboard_id = match urlencoding::decode(raw_id) {
        Ok(id) => LeaderboardId::new(id.into_owned()),
        Err(_) => return not_found(),
    };
    let query = RawQuery::from_query_string(uri.query().unwrap_or(""));

    let result = match service.get_leaderboard(&leaderboard_id, &query).await {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to serve leaderboard {}: {}", leaderboard_id, e);
            return internal_error();
        }
    };

    match serde_json::to_vec(&result) {
        Ok(body) => respond(StatusCode::OK, "application/json", Bytes::from(body)),
        Err(e) => {
            error!("Failed to encode leaderboard {}: {}", leaderboard_id, e);
            internal_error()
        }
    }
}

fn metrics() -> Response<Full<Bytes>> {
    match telemetry::gather_text() {
        Ok(body) => respond(StatusCode::OK, prometheus::TEXT_FORMAT, Bytes::from(body)),
        Err(e) => {
            warn!("{}", e);
            internal_error()
        }
    }
}

fn not_found() -> Response<Full<Bytes>> {
    respond(
        StatusCode::NOT_FOUND,
        "text/plain",
        Bytes::from_static(b"not found"),
    )
}

fn internal_error() -> Response<Full<Bytes>> {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        "application/json",
        Bytes::from_static(INTERNAL_ERROR_BODY.as_bytes()),
    )
}

fn respond(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BalanceRecord, InMemoryCache, InMemoryLeaderboardSource};
    use http_body_util::BodyExt;
    use serde_json::Value;

    fn service() -> (LeaderboardService, Arc<InMemoryLeaderboardSource>) {
        let source = Arc::new(InMemoryLeaderboardSource::new());
        source.insert(
            "guild 7".into(),
            vec![
                BalanceRecord::new("alice", 10, 5),
                BalanceRecord::new("bob", 1, 50),
            ],
        );
        let service = LeaderboardService::new(Arc::new(InMemoryCache::new()), source.clone());
        (service, source)
    }

    async fn get(service: &LeaderboardService, uri: &str) -> (StatusCode, String) {
        let uri: Uri = uri.parse().unwrap();
        let response = handle(service, &Method::GET, &uri).await;
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_leaderboard_route() {
        let (service, _source) = service();
        let (status, body) = get(&service, "/leaderboards/guild%207?sort=cash").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["balances"][0]["user_id"], "alice");
        assert_eq!(json["balances"].as_array().unwrap().len(), 2);
        assert_eq!(json["page"], Value::Null);
        assert_eq!(json["total_pages"], Value::Null);
    }

    #[tokio::test]
    async fn test_paging_short_circuit_shape() {
        let (service, _source) = service();
        let (status, body) = get(&service, "/leaderboards/empty?page=1&sort=cash").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"balances":[],"page":1,"total_pages":0}"#);
    }

    #[tokio::test]
    async fn test_source_failure_is_500() {
        let (service, source) = service();
        source.set_unavailable(true);

        let (status, body) = get(&service, "/leaderboards/guild%207?page=2").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_BODY);
    }

    #[tokio::test]
    async fn test_not_found() {
        let (service, _source) = service();
        assert_eq!(get(&service, "/leaderboards/").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&service, "/leaderboards/a/b").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get(&service, "/users/1").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let (service, _source) = service();
        let uri: Uri = "/leaderboards/g1".parse().unwrap();
        let response = handle(&service, &Method::POST, &uri).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let (service, _source) = service();
        assert_eq!(get(&service, "/healthz").await, (StatusCode::OK, "ok".to_string()));
        assert_eq!(get(&service, "/readyz").await.0, StatusCode::OK);

        get(&service, "/leaderboards/guild%207").await;
        let (status, body) = get(&service, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("leaderboard_requests_total"));
    }

    #[tokio::test]
    async fn test_serve_stops_on_cancel() {
        let (service, _source) = service();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(serve(listener, Arc::new(service), shutdown.clone()));
        shutdown.cancel();

        assert!(handle.await.unwrap().is_ok());
    }
}
