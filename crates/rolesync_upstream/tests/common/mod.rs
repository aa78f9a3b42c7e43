//! Local HTTP server standing in for the upstream APIs.

use axum::Router;
use std::time::Duration;

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Client with a short timeout so slow-server tests stay fast.
pub fn quick_client() -> reqwest::Client {
    rolesync_upstream::build_http_client(Duration::from_millis(250)).unwrap()
}

/// A base URL nothing listens on.
pub const DEAD_URL: &str = "http://127.0.0.1:9";
