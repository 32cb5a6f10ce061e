//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Record of what a mock backend has received.
#[derive(Default)]
pub struct BackendLog {
    bodies: Mutex<Vec<Vec<u8>>>,
}

impl BackendLog {
    pub fn hits(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    pub fn bodies(&self) -> Vec<Vec<u8>> {
        self.bodies.lock().unwrap().clone()
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Start a mock backend that records request bodies and answers every
/// request with a fixed 200 response.
pub async fn start_recording_backend(addr: SocketAddr, response_body: Vec<u8>) -> Arc<BackendLog> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let log = Arc::new(BackendLog::default());
    let accept_log = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let log = accept_log.clone();
                    let response_body = response_body.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut tmp = [0u8; 4096];

                        let header_end = loop {
                            match socket.read(&mut tmp).await {
                                Ok(0) => return,
                                Ok(n) => {
                                    buf.extend_from_slice(&tmp[..n]);
                                    if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
                                        break pos + 4;
                                    }
                                }
                                Err(_) => return,
                            }
                        };

                        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                        let content_length = headers
                            .lines()
                            .find_map(|line| line.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);

                        while buf.len() < header_end + content_length {
                            match socket.read(&mut tmp).await {
                                Ok(0) => break,
                                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                                Err(_) => return,
                            }
                        }
                        let body_end = (header_end + content_length).min(buf.len());
                        log.bodies
                            .lock()
                            .unwrap()
                            .push(buf[header_end..body_end].to_vec());

                        let mut response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            response_body.len()
                        )
                        .into_bytes();
                        response.extend_from_slice(&response_body);
                        let _ = socket.write_all(&response).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    log
}

/// Minimal raw HTTP/1.1 client: send one request, read to EOF, return the
/// status code, raw header block and body.
pub async fn raw_request(
    addr: SocketAddr,
    request: Vec<u8>,
) -> (u16, String, Vec<u8>) {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(&request).await.unwrap();

    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();

    let header_end = find_subslice(&response, b"\r\n\r\n").expect("no header terminator") + 4;
    let headers = String::from_utf8_lossy(&response[..header_end]).to_string();
    let status = headers
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("no status code");
    (status, headers, response[header_end..].to_vec())
}

/// Build a plain HTTP/1.1 request with the given headers and body.
pub fn build_request(
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> Vec<u8> {
    let mut out = format!("{method} {path} HTTP/1.1\r\n").into_bytes();
    for (name, value) in headers {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(format!("Content-Length: {}\r\nConnection: close\r\n\r\n", body.len()).as_bytes());
    out.extend_from_slice(body);
    out
}
