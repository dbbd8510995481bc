//! Liveness endpoint for hosting platforms.
//!
//! Runs on its own task and shares nothing with the bot, so a stalled quote
//! fetch never delays a health probe.

use std::net::SocketAddr;

use axum::{response::Html, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

const STATUS_PAGE: &str = "<!doctype html>\n<html>\n<head><title>Rates tracker bot</title></head>\n<body>\n<h1>🤖 Rates tracker bot is running</h1>\n<p>Health check: <a href=\"/health\">/health</a></p>\n</body>\n</html>\n";

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

async fn index() -> Html<&'static str> {
    Html(STATUS_PAGE)
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "liveness server listening");
    axum::serve(listener, router()).await?;
    Ok(())
}

/// Start [`serve`] on a separate task; bind errors are logged, not fatal.
pub fn spawn(addr: SocketAddr) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = serve(addr).await {
            tracing::error!(error = %e, %addr, "liveness server stopped");
        }
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn get_path(path: &str) -> (StatusCode, String) {
        let resp = router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_path("/health").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn index_serves_status_page() {
        let (status, body) = get_path("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("is running"));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let (status, _) = get_path("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_over_tcp() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let handle = spawn(addr);
        let mut body = String::new();
        for _ in 0..50 {
            if let Ok(mut stream) = tokio::net::TcpStream::connect(addr).await {
                use tokio::io::{AsyncReadExt, AsyncWriteExt};
                stream
                    .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                    .await
                    .unwrap();
                stream.read_to_string(&mut body).await.unwrap();
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        handle.abort();

        assert!(body.starts_with("HTTP/1.1 200"));
        assert!(body.contains(r#"{"status":"ok"}"#));
    }
}
