//! In-process HTTP responder shared by the integration tests
#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as seen by the responder
#[derive(Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: String,
    pub raw: Vec<u8>,
    pub body: serde_json::Value,
}

/// One canned answer
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: Vec<u8>,
    content_length: usize,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            content_length: body.len(),
            body,
        }
    }

    /// Announce `content_length` bytes but close the connection after `body`
    pub fn truncated(status: u16, body: impl Into<Vec<u8>>, content_length: usize) -> Self {
        Self {
            content_length,
            ..Self::new(status, body)
        }
    }
}

impl From<(u16, &'static str)> for Reply {
    fn from((status, body): (u16, &'static str)) -> Self {
        Self::new(status, body)
    }
}

/// Serve one reply per entry in `replies`, in order, then stop
///
/// Returns the base URL and a handle yielding every request received.
pub async fn serve<R: Into<Reply>>(replies: Vec<R>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let host = format!("http://{}", listener.local_addr().unwrap());
    let replies: Vec<Reply> = replies.into_iter().map(Into::into).collect();

    let handle = tokio::spawn(async move {
        let mut recorded = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().await.expect("Failed to accept");
            recorded.push(read_request(&mut stream).await);

            let head = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reply.status, reply.content_length
            );
            stream.write_all(head.as_bytes()).await.unwrap();
            stream.write_all(&reply.body).await.unwrap();
            stream.flush().await.ok();
            stream.shutdown().await.ok();
        }
        recorded
    });

    (host, handle)
}

async fn read_request(stream: &mut TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "Connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "Connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let raw = buf[header_end..header_end + content_length].to_vec();
    let body = serde_json::from_slice(&raw).unwrap_or(serde_json::Value::Null);

    Recorded {
        method,
        path,
        headers: head,
        raw,
        body,
    }
}
