//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use edge_proxy::error::TransportError;
use edge_proxy::upstream::{OutboundRequest, UpstreamClient, UpstreamResponse};

type Responder = dyn Fn(&OutboundRequest) -> Result<UpstreamResponse, TransportError> + Send + Sync;

/// In-process upstream that records every outbound request.
#[derive(Clone)]
pub struct RecordingClient {
    seen: Arc<Mutex<Vec<OutboundRequest>>>,
    responder: Arc<Responder>,
}

impl RecordingClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&OutboundRequest) -> Result<UpstreamResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            seen: Arc::default(),
            responder: Arc::new(responder),
        }
    }

    /// Always answers `status` with `body`.
    pub fn responding(status: u16, body: &'static str) -> Self {
        Self::new(move |_| {
            Ok(UpstreamResponse {
                status: StatusCode::from_u16(status).unwrap(),
                headers: HeaderMap::new(),
                body: Bytes::from_static(body.as_bytes()),
            })
        })
    }

    /// Always answers with a clone of `response`.
    pub fn replying(response: UpstreamResponse) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    /// Fails every attempt at the transport level.
    pub fn unreachable() -> Self {
        Self::new(|_| Err(TransportError::Saturated))
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl UpstreamClient for RecordingClient {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, TransportError> {
        let outcome = (self.responder)(&request);
        self.seen.lock().unwrap().push(request);
        outcome
    }
}

/// Read one request head (up to the blank line) from a raw socket.
async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the raw request head and returns `(status, body)`, or
/// `None` to drop the connection without answering.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicUsize>)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<(u16, String)>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let f = f.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let Some((status, body)) = f(head).await else {
                            drop(socket);
                            return;
                        };
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nX-Backend: mock\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, connections)
}

/// A local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
