//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use dispatch_emulator::config::{DispatchEntry, ProxyConfig};
use dispatch_emulator::error::ProxyError;
use dispatch_emulator::http::{HttpServer, ProxyHandler};
use dispatch_emulator::lifecycle::{build_proxy_handler, Shutdown};
use dispatch_emulator::observability::ErrorReporter;

/// Errors seen by a capturing reporter, as display strings.
pub type Reported = Arc<Mutex<Vec<String>>>;

/// Reporter that records every error it receives.
pub fn capture_reporter() -> (Reported, Arc<dyn ErrorReporter>) {
    let reported: Reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    let reporter: Arc<dyn ErrorReporter> = Arc::new(move |err: &ProxyError| {
        sink.lock().unwrap().push(err.to_string());
    });
    (reported, reporter)
}

/// Wait until at least `count` errors were reported, then give stragglers a
/// moment to show up.
pub async fn wait_for_reports(reported: &Reported, count: usize) -> Vec<String> {
    for _ in 0..250 {
        if reported.lock().unwrap().len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    reported.lock().unwrap().clone()
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[derive(Clone)]
struct EchoState {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

/// Start an axum backend that echoes the request back.
///
/// The response carries the request body and these headers:
/// - `service`: the backend name
/// - `x-echo-method`, `x-echo-uri`: method and path-and-query as received
/// - `x-echo-forwarded-for`: the received X-Forwarded-For, if any
/// - `x-echo-headers`: received header names, sorted, comma separated
///
/// A `x-echo-status` request header selects the response status.
pub async fn start_echo_backend(name: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let state = EchoState {
        name,
        calls: calls.clone(),
    };
    let app = Router::new().fallback(echo).with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, calls)
}

async fn echo(State(state): State<EchoState>, request: Request<Body>) -> Response<Body> {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let status = parts
        .headers
        .get("x-echo-status")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u16>().ok())
        .and_then(|v| StatusCode::from_u16(v).ok())
        .unwrap_or(StatusCode::OK);

    let mut names: Vec<&str> = parts.headers.keys().map(|k| k.as_str()).collect();
    names.sort_unstable();

    let mut builder = Response::builder()
        .status(status)
        .header("service", state.name)
        .header("x-echo-method", parts.method.as_str())
        .header("x-echo-uri", parts.uri.to_string())
        .header("x-echo-headers", names.join(","));
    if let Some(xff) = parts.headers.get("x-forwarded-for") {
        builder = builder.header("x-echo-forwarded-for", xff.clone());
    }
    builder.body(Body::from(body)).unwrap()
}

/// Start a raw TCP backend that reads the request head and answers with
/// `response` verbatim.
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_head(&mut socket).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a raw TCP backend that promises a large body and trickles chunks
/// until the peer goes away.
pub async fn start_trickling_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_head(&mut socket).await;
                let head = "HTTP/1.1 200 OK\r\nContent-Length: 104857600\r\n\r\n";
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                let chunk = [b'x'; 1024];
                for _ in 0..102_400 {
                    if socket.write_all(&chunk).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            });
        }
    });

    addr
}

async fn read_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// Settings with inline dispatch rules and the given services.
pub fn proxy_config(services: &[(&str, String)], rules: &[(&str, &str)]) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    for (name, origin) in services {
        config.services.insert(name.to_string(), origin.clone());
    }
    for (url, service) in rules {
        config.dispatch.push(DispatchEntry {
            url: url.to_string(),
            service: service.to_string(),
        });
    }
    config
}

pub fn handler(config: &ProxyConfig, reporter: Arc<dyn ErrorReporter>) -> ProxyHandler {
    build_proxy_handler(config, reporter).unwrap()
}

/// A running dispatcher. Dropping it shuts the server down.
pub struct TestProxy {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Serve `handler` on an ephemeral port.
pub async fn start_proxy(handler: ProxyHandler) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = HttpServer::new(handler).run(listener, rx).await;
    });

    TestProxy {
        addr,
        _shutdown: shutdown,
    }
}
