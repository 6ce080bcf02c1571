use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::apis::icanhazdadjoke::{JokeError, JokeSource};

/// Answers every fetch with the same body and remembers the requested URLs.
pub struct CannedSource {
    response: Result<Bytes, StatusCode>,
    requested: Mutex<Vec<String>>,
}

impl CannedSource {
    pub fn new(body: &str) -> Self {
        Self { response: Ok(Bytes::copy_from_slice(body.as_bytes())), requested: Mutex::default() }
    }

    pub fn failing(status_code: StatusCode) -> Self {
        Self { response: Err(status_code), requested: Mutex::default() }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl JokeSource for CannedSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, JokeError> {
        self.requested.lock().unwrap().push(url.into());
        self.response.clone().map_err(JokeError::Status)
    }
}

pub struct OneShotServer {
    pub url: String,
    request: JoinHandle<String>,
}

impl OneShotServer {
    /// The raw request head the server received.
    pub async fn request(self) -> String {
        self.request.await.unwrap()
    }
}

pub fn json_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Accepts a single connection, reads the request head and writes `response`
/// back verbatim.
pub async fn serve_once(response: String) -> OneShotServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());

    let request = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_head(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        request
    });

    OneShotServer { url, request }
}

/// Accepts a single connection and never answers it.
pub async fn serve_nothing() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buffer = [0; 1024];
        while matches!(stream.read(&mut buffer).await, Ok(read) if read > 0) {}
    });

    url
}

pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);
    url
}

async fn read_head(stream: &mut tokio::net::TcpStream) -> String {
    let mut request = Vec::new();
    let mut buffer = [0; 1024];

    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buffer).await {
            Ok(0) | Err(_) => break,
            Ok(read) => request.extend_from_slice(&buffer[..read]),
        }
    }

    String::from_utf8_lossy(&request).into_owned()
}
