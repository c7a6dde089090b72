//! Shared test infrastructure.
//!
//! - `FakePortal` - an actix-web server standing in for the portal backend, for
//!   end-to-end tests through the real `reqwest` transport
//! - `ScriptedTransport` - an in-memory `Transport` with canned replies, for
//!   timer-driven tests on a paused clock

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use mgsa_portal::api::ApiClient;
use mgsa_portal::api::transport::{ApiRequest, RawResponse, Transport};
use mgsa_portal::errors::{ClientError, Result};
use mgsa_portal::notify::{NotificationRegion, NotificationService};
use mgsa_portal::render::SlotBoard;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const SCRIPTED_SITE: &str = "http://portal.test";
pub const CSRF_TOKEN: &str = "test-csrf-token";
pub const NOTIFY_FOR: Duration = Duration::from_millis(5000);

// ============================================================================
// FAKE PORTAL BACKEND (actix-web)
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub csrf: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct FakeState {
    routes: Mutex<HashMap<(String, String), (u16, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
    csrf_cookie: Mutex<Option<String>>,
}

pub struct FakePortal {
    pub url: String,
    state: web::Data<FakeState>,
    handle: ServerHandle,
}

impl FakePortal {
    /// Answer `method path` with `status` and a JSON body.
    pub fn route(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    /// Every response will set this `csrftoken` cookie, like the backend does.
    pub fn issue_csrf_cookie(&self, token: &str) {
        *self.state.csrf_cookie.lock().unwrap() = Some(token.to_string());
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn dispatch(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let method = req.method().to_string();
    let path = req.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        csrf: header("X-CSRFToken"),
        content_type: header("Content-Type"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let routed = state.routes.lock().unwrap().get(&(method, path)).cloned();
    let (status, reply) = routed.unwrap_or((404, json!({"detail": "Not found."})));

    let mut builder = HttpResponse::build(StatusCode::from_u16(status).expect("valid status"));
    if let Some(token) = state.csrf_cookie.lock().unwrap().clone() {
        builder.cookie(Cookie::build("csrftoken", token).path("/").finish());
    }
    if status == 204 {
        return builder.finish();
    }
    builder.json(reply)
}

/// Start a fake backend on an ephemeral port. Must run inside an actix runtime.
pub async fn spawn_portal() -> FakePortal {
    let state = web::Data::new(FakeState::default());
    let data = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .default_service(web::to(dispatch))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind fake portal");

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    FakePortal {
        url: format!("http://{addr}"),
        state,
        handle,
    }
}

/// A real HTTP client pointed at the fake portal.
pub fn http_client(portal: &FakePortal) -> (ApiClient, mgsa_portal::api::HttpTransport) {
    let transport = mgsa_portal::api::HttpTransport::new(&portal.url, Duration::from_secs(5))
        .expect("Failed to build transport");
    let api = ApiClient::new(Arc::new(transport.clone()), &portal.url, "/api", "csrftoken");
    (api, transport)
}

// ============================================================================
// SCRIPTED TRANSPORT
// ============================================================================

#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(u16, Value),
    /// Reply after the given delay (on the tokio clock).
    Slow(Duration, u16, Value),
    /// Transport failure.
    Down,
}

/// Canned replies keyed by method and path. A route's queue pops until one reply is left,
/// which then repeats.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(String, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
    cookies: Mutex<HashMap<String, String>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        let t = Self::default();
        t.cookies
            .lock()
            .unwrap()
            .insert("csrftoken".to_string(), CSRF_TOKEN.to_string());
        Arc::new(t)
    }

    pub fn script(&self, method: &str, path: &str, replies: Vec<Scripted>) {
        self.routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), replies.into());
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        let url = format!("{SCRIPTED_SITE}{path}");
        self.requests()
            .iter()
            .filter(|r| r.method.as_str() == method && r.url == url)
            .count()
    }

    fn next_reply(&self, method: &str, path: &str) -> Scripted {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(method.to_string(), path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().expect("non-empty queue"),
            Some(queue) => queue.front().cloned().unwrap_or(Scripted::Down),
            None => Scripted::Reply(404, json!({"detail": "Not found."})),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let path = request
            .url
            .strip_prefix(SCRIPTED_SITE)
            .unwrap_or(&request.url)
            .to_string();
        let method = request.method.to_string();
        self.requests.lock().unwrap().push(request);

        let reply = self.next_reply(&method, &path);
        let (status, body) = match reply {
            Scripted::Reply(status, body) => (status, body),
            Scripted::Slow(delay, status, body) => {
                tokio::time::sleep(delay).await;
                (status, body)
            }
            Scripted::Down => return Err(ClientError::Network("connection refused".to_string())),
        };
        Ok(RawResponse {
            status,
            status_text: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default()
                .to_string(),
            body: body.to_string(),
        })
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().unwrap().get(name).cloned()
    }
}

pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new(transport.clone(), SCRIPTED_SITE, "/api", "csrftoken")
}

/// A notifier mounted on a fresh region, plus the region to inspect.
pub fn mounted_notifier() -> (NotificationService, NotificationRegion) {
    let region = NotificationRegion::new();
    (NotificationService::new(Some(region.clone()), NOTIFY_FOR), region)
}

pub fn board() -> Arc<SlotBoard> {
    Arc::new(SlotBoard::new())
}
