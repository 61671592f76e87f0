//! Tiny HTTP/1.1 servers standing in for the Datadog API in tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
};
use url::Url;

/// Answers requests with `statuses` in order (then `200`), and forwards every request body.
pub(crate) async fn responding(statuses: Vec<u16>) -> (Url, UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    let statuses = Arc::new(Mutex::new(VecDeque::from(statuses)));
    let (bodies, received) = unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let statuses = statuses.clone();
            let bodies = bodies.clone();
            tokio::spawn(async move {
                let _ = serve_connection(stream, statuses, bodies).await;
            });
        }
    });

    (url, received)
}

/// Accepts connections and never answers, reporting each accepted connection.
pub(crate) async fn silent() -> (Url, UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    let (accepted, received) = unbounded_channel();

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
            let _ = accepted.send(());
        }
    });

    (url, received)
}

async fn serve_connection(
    stream: TcpStream,
    statuses: Arc<Mutex<VecDeque<u16>>>,
    bodies: UnboundedSender<String>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    loop {
        let mut line = String::new();
        // request line, or the client closed its keep-alive connection
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let mut content_length = 0;
        loop {
            line.clear();
            reader.read_line(&mut line).await?;
            let header = line.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).await?;
        let _ = bodies.send(String::from_utf8_lossy(&body).into_owned());

        let status = statuses.lock().unwrap().pop_front().unwrap_or(200);
        let reply = if status < 300 { "" } else { "stub failure" };
        let response = format!(
            "HTTP/1.1 {} Stub\r\ncontent-length: {}\r\n\r\n{}",
            status,
            reply.len(),
            reply
        );
        reader.get_mut().write_all(response.as_bytes()).await?;
    }
}
