//! Stub TestRail server on a random localhost port.
//!
//! Routes are keyed by method plus the action after `/index.php?/api/v2/`.
//! Unrouted GETs answer 404; unrouted POSTs echo the body with a new `id`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use rail_client::TestRailClient;
use serde_json::Value;

const API_PREFIX: &str = "/index.php?/api/v2/";
pub const USERNAME: &str = "qa@acme.test";
pub const API_KEY: &str = "secret";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub action: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

type Routes = HashMap<(String, String), (u16, String)>;

pub struct StubServer {
    server: Arc<tiny_http::Server>,
    routes: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
    worker: Option<JoinHandle<()>>,
    port: u16,
}

impl StubServer {
    pub fn start() -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("bind stub server"));
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .expect("stub server has an ip address");
        let routes = Arc::new(Mutex::new(Routes::new()));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let worker = {
            let server = Arc::clone(&server);
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle(request, &routes, &requests);
                }
            })
        };

        Self {
            server,
            routes,
            requests,
            worker: Some(worker),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn client(&self) -> TestRailClient {
        TestRailClient::with_credentials(
            &self.base_url(),
            USERNAME,
            API_KEY,
            std::time::Duration::from_secs(5),
        )
        .expect("client builds")
    }

    pub fn route(&self, method: &str, action: &str, status: u16, body: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method.to_string(), action.to_string()), (status, body.to_string()));
        self
    }

    pub fn get(&self, action: &str, body: &Value) -> &Self {
        self.route("GET", action, 200, &body.to_string())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn handle(
    mut request: tiny_http::Request,
    routes: &Mutex<Routes>,
    requests: &Mutex<Vec<Recorded>>,
) {
    let method = request.method().to_string();
    let action = request
        .url()
        .strip_prefix(API_PREFIX)
        .unwrap_or(request.url())
        .to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());
    let mut raw = String::new();
    let _ = request.as_reader().read_to_string(&mut raw);
    let body: Option<Value> = serde_json::from_str(&raw).ok();

    let mut recorded = requests.lock().unwrap();
    recorded.push(Recorded {
        method: method.clone(),
        action: action.clone(),
        authorization,
        body: body.clone(),
    });
    let created_id = recorded.len();
    drop(recorded);

    let routed = routes.lock().unwrap().get(&(method.clone(), action)).cloned();
    let (status, payload) = match (routed, method.as_str(), body) {
        (Some(reply), _, _) => reply,
        (None, "POST", Some(Value::Object(mut created))) => {
            created.insert("id".into(), created_id.into());
            (200, Value::Object(created).to_string())
        }
        _ => (404, r#"{"error":"Unknown route"}"#.to_string()),
    };

    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static header is valid");
    let response = tiny_http::Response::from_string(payload)
        .with_status_code(status)
        .with_header(header);
    let _ = request.respond(response);
}
