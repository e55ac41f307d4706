//! Axum stub standing in for an Octopus server in integration tests.

#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener as StdListener};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

/// Request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
struct StubRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
struct StubState {
    routes: Arc<Vec<StubRoute>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

/// Serves canned responses keyed by method and path until the test process exits.
///
/// Routes match on the URI path only; the query string is recorded separately.
pub struct StubServer {
    base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubServer {
    pub fn start(routes: &[(&str, &str, u16, &str)]) -> Self {
        let routes: Vec<StubRoute> = routes
            .iter()
            .map(|(method, path, code, body)| StubRoute {
                method: method.parse().expect("stub method"),
                path: path.to_string(),
                status: StatusCode::from_u16(*code).expect("stub status"),
                body: body.to_string(),
            })
            .collect();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes),
            seen: Arc::clone(&seen),
        };
        let app = Router::new().fallback(reply).with_state(state);

        let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind stub server");
                addr_tx
                    .send(listener.local_addr().expect("local addr"))
                    .expect("report stub address");
                axum::serve(listener, app).await.expect("serve stub");
            });
        });
        let addr = addr_rx.recv().expect("stub server address");

        Self {
            base_url: format!("http://{addr}"),
            seen,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("seen lock").clone()
    }
}

async fn reply(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let route = state
        .routes
        .iter()
        .find(|route| route.method == method && route.path == uri.path());

    state.seen.lock().expect("seen lock").push(SeenRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(key, value)| {
                (
                    key.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match route {
        Some(route) => (
            route.status,
            [(header::CONTENT_TYPE, "application/json")],
            route.body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Address on which nothing is listening.
pub fn closed_port_url() -> String {
    let listener = StdListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// Address that accepts connections but never answers.
pub fn silent_server_url() -> String {
    let listener = StdListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://{addr}")
}
