//! Minimal local HTTP/1.1 server for exercising network paths in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers one connection.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// A complete response with `status` and `body`.
    Status(u16, &'static str),
    /// `chunks` chunks of `chunk_len` bytes, `delay` apart.
    Slow {
        chunk_len: usize,
        chunks: usize,
        delay: Duration,
    },
    /// Announces `declared` bytes but closes after `sent`.
    Truncated { declared: usize, sent: usize },
}

pub(crate) struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Serves `replies` to successive connections; the last one repeats.
    pub(crate) async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let hit = counter.fetch_add(1, Ordering::SeqCst);
                let reply = replies[hit.min(replies.len() - 1)].clone();
                read_request(&mut stream).await;
                write_reply(&mut stream, reply).await;
            }
        });
        Self { base_url, hits }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
}

fn header(status: u16, content_length: usize) -> String {
    format!(
        "HTTP/1.1 {status} Test\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
    )
}

async fn write_reply(stream: &mut TcpStream, reply: Reply) {
    match reply {
        Reply::Status(status, body) => {
            let response = header(status, body.len()) + body;
            let _ = stream.write_all(response.as_bytes()).await;
        }
        Reply::Slow {
            chunk_len,
            chunks,
            delay,
        } => {
            let _ = stream
                .write_all(header(200, chunk_len * chunks).as_bytes())
                .await;
            for _ in 0..chunks {
                if stream.write_all(&vec![b'x'; chunk_len]).await.is_err() {
                    return;
                }
                let _ = stream.flush().await;
                tokio::time::sleep(delay).await;
            }
        }
        Reply::Truncated { declared, sent } => {
            let _ = stream.write_all(header(200, declared).as_bytes()).await;
            let _ = stream.write_all(&vec![b'x'; sent]).await;
        }
    }
    let _ = stream.shutdown().await;
}
