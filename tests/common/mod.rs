#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use deployexec::exec::ProcessSpec;

pub use deployexec_test_utils::init_tracing;

/// `sh -c <script>`.
pub fn sh(script: &str) -> ProcessSpec {
    ProcessSpec::new("sh").arg("-c").arg(script)
}

/// `sh -c <script> sh <args>...`, so the script can use `$1`, `$2`, ...
pub fn sh_with_args(script: &str, args: &[&str]) -> ProcessSpec {
    sh(script).arg("sh").args(args.iter().copied())
}

/// One HTTP request seen by [`one_shot_server`]; `head` is lower-cased.
pub struct Received {
    pub head: String,
    pub body: serde_json::Value,
}

/// Accept one HTTP request on a local port and answer it with `status`.
pub async fn one_shot_server(status: u16) -> (String, tokio::task::JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/hooks/deploys", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before headers ended");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&raw[..head_end]).to_lowercase();
        let length: usize = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map(|v| v.trim().parse().unwrap())
            .unwrap_or(0);
        while raw.len() < head_end + length {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
        }

        let response =
            format!("HTTP/1.1 {status} X\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        socket.write_all(response.as_bytes()).await.unwrap();

        Received {
            head,
            body: serde_json::from_slice(&raw[head_end..head_end + length]).unwrap(),
        }
    });

    (url, handle)
}

/// HTTP client that ignores proxy settings from the environment.
pub fn webhook_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
