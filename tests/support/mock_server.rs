//! In-process mock of the KairoIO API
//!
//! Serves canned JSON (or raw text) per method and path, and records every
//! request so tests can assert on what was, or was not, sent.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// A request as the mock server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// What a route answers with
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(u16, Value),
    Text(u16, String),
    /// Wait before answering, to trip client timeouts
    Delayed(Duration, Box<MockResponse>),
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

enum PathMatch {
    Exact(String),
    Prefix(String),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => p == path,
            PathMatch::Prefix(p) => path.starts_with(p.as_str()),
        }
    }
}

struct Route {
    method: Method,
    path: PathMatch,
    respond: Responder,
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Builder for a mock server
#[derive(Default)]
pub struct MockServerBuilder {
    routes: Vec<Route>,
}

impl MockServerBuilder {
    /// Answer `method path` with a JSON body
    pub fn json(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.handler(method, path, move |_| MockResponse::Json(status, body.clone()))
    }

    /// Answer `method path` with a raw text body
    pub fn text(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        let body = body.to_string();
        self.handler(method, path, move |_| MockResponse::Text(status, body.clone()))
    }

    /// Hold `method path` open for `delay` before answering
    pub fn stall(self, method: Method, path: &str, delay: Duration) -> Self {
        self.handler(method, path, move |_| {
            let answer = MockResponse::Json(200, json!({"success": true}));
            MockResponse::Delayed(delay, Box::new(answer))
        })
    }

    /// Answer every path under `prefix` with a JSON body
    pub fn prefix_json(mut self, method: Method, prefix: &str, status: u16, body: Value) -> Self {
        self.routes.push(Route {
            method,
            path: PathMatch::Prefix(prefix.to_string()),
            respond: Arc::new(move |_| MockResponse::Json(status, body.clone())),
        });
        self
    }

    /// Answer `method path` by inspecting the request
    pub fn handler<F>(mut self, method: Method, path: &str, respond: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: PathMatch::Exact(path.to_string()),
            respond: Arc::new(respond),
        });
        self
    }

    /// Serve the schema index
    pub fn schema_index(self, entries: Value) -> Self {
        self.json(
            Method::GET,
            "/api/v1/schemas",
            200,
            json!({"success": true, "data": {"schemas": entries}}),
        )
    }

    /// Serve an example payload for one schema
    pub fn schema_example(self, schema_id: &str, example: Value) -> Self {
        self.json(
            Method::GET,
            &format!("/api/v1/schemas/{}", schema_id),
            200,
            json!({"success": true, "data": {"$id": schema_id, "example": example}}),
        )
    }

    /// Accept `username`/`password` logins with a fixed certification key
    pub fn login(self, username: &str, password: &str, key: &str) -> Self {
        let (username, password, key) =
            (username.to_string(), password.to_string(), key.to_string());
        self.handler(Method::POST, "/api/v1/auth/login", move |req| {
            let body = req.body.clone().unwrap_or(Value::Null);
            if body["username"] == username.as_str() && body["password"] == password.as_str() {
                MockResponse::Json(
                    200,
                    json!({"success": true, "data": {"certification_key": key}}),
                )
            } else {
                MockResponse::Json(
                    401,
                    json!({"success": false, "error": "Invalid username or password"}),
                )
            }
        })
    }

    pub async fn start(self) -> MockServer {
        let state = Arc::new(MockState {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        MockServer {
            addr,
            state,
            _shutdown: shutdown_tx,
        }
    }
}

/// A running mock server; shuts down when dropped
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    _shutdown: oneshot::Sender<()>,
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    /// Requests received for one method and path
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(request.clone());

    let route = state
        .routes
        .iter()
        .find(|route| route.method == method && route.path.matches(&request.path));

    let mut reply = match route {
        Some(route) => (route.respond)(&request),
        None => MockResponse::Json(404, json!({"success": false, "error": "not found"})),
    };

    loop {
        match reply {
            MockResponse::Json(status, body) => {
                return (status_code(status), axum::Json(body)).into_response()
            }
            MockResponse::Text(status, body) => return (status_code(status), body).into_response(),
            MockResponse::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                reply = *inner;
            }
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("valid status code")
}
