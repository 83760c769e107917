//! Canned-response HTTP server for exercising the network paths offline.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A response the fixture server sends back
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Canned {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "image/jpeg".into())],
            body: body.into(),
        }
    }

    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            headers: vec![("Location".into(), location.into())],
            body: Vec::new(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

type Route = Arc<dyn Fn(&str) -> Canned + Send + Sync>;

#[derive(Clone)]
struct Fixture {
    route: Route,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Answers every request; the path (with query) picks the canned response
async fn respond(State(fixture): State<Fixture>, OriginalUri(uri): OriginalUri) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    fixture.requests.lock().unwrap().push(path.clone());

    let canned = (fixture.route)(&path);
    let mut response = Response::builder().status(canned.status);
    for (name, value) in &canned.headers {
        response = response.header(name.as_str(), value.as_str());
    }
    response
        .body(Body::from(canned.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

pub struct FixtureServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    /// Start serving; `route` maps a request path (with query) to a response
    pub async fn start<F>(route: F) -> Self
    where
        F: Fn(&str) -> Canned + Send + Sync + 'static,
    {
        init_logging();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(respond).with_state(Fixture {
            route: Arc::new(route),
            requests: requests.clone(),
        });
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base, requests }
    }

    /// Paths requested so far, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// An address nothing listens on
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Route library logs through the test harness; `RUST_LOG=debug` shows them
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
