//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_gateway::auth::{BcryptCredentialStore, JwtCodec};
use api_gateway::config::{GatewayConfig, ServiceConfig};
use api_gateway::http::{AuthComponents, GatewayServer};
use api_gateway::lifecycle::Shutdown;
use axum::{
    body::Bytes,
    extract::Request,
    http::{header, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

pub const SECRET: &[u8] = b"integration-secret";
pub const ISSUER: &str = "api-gateway";
pub const USERNAME: &str = "admin123";
pub const PASSWORD: &str = "12345";

/// One request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Bytes,
    pub request_id: Option<String>,
}

/// Everything a mock upstream has received.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    pub fn calls(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Start a mock upstream on an ephemeral port. `respond` maps each recorded
/// request to a status and raw body. For a 3xx status the text is sent as
/// the `Location` header instead of a body.
pub async fn start_upstream<F>(respond: F) -> (SocketAddr, Recorder)
where
    F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
{
    let recorder = Recorder::default();
    let respond = Arc::new(respond);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let rec = recorder.clone();
    let app = Router::new().fallback(move |request: Request| {
        let rec = rec.clone();
        let respond = respond.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, 1024 * 1024).await.unwrap();
            let recorded = Recorded {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                body,
                request_id: parts
                    .headers
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
            };
            let (status, text) = respond(&recorded);
            rec.0.lock().unwrap().push(recorded);
            let status = StatusCode::from_u16(status).unwrap();
            if status.is_redirection() {
                return (status, [(header::LOCATION, text)]).into_response();
            }
            (status, text).into_response()
        }
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, recorder)
}

/// Mock upstream that answers every request with the request body.
pub async fn start_echo_upstream() -> (SocketAddr, Recorder) {
    start_upstream(|req| (200, String::from_utf8_lossy(&req.body).into_owned())).await
}

/// An address nothing listens on.
pub async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn codec() -> JwtCodec {
    JwtCodec::new(SECRET, ISSUER, 300)
}

/// Gateway config pointing both logical services at the given addresses.
pub fn gateway_config(student: SocketAddr, course: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.services.insert(
        "student".into(),
        ServiceConfig {
            base_url: format!("http://{}", student),
        },
    );
    config.services.insert(
        "course".into(),
        ServiceConfig {
            base_url: format!("http://{}", course),
        },
    );
    config
}

/// A running gateway plus the handle that stops it.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway with a known secret and one bcrypt-hashed account.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let codec = Arc::new(codec());
    let credentials = BcryptCredentialStore::new().with_user(USERNAME, bcrypt::hash(PASSWORD, 4).unwrap());
    let components = AuthComponents {
        verifier: codec.clone(),
        issuer: codec,
        credentials: Arc::new(credentials),
    };
    let server = GatewayServer::with_components(config, components).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
