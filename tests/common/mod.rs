#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use lmstudio_bridge::{BridgeConfig, InferenceBridge};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the mock upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest
{   pub method: String
  , pub path: String
  , pub body: Vec<u8>
}

impl RecordedRequest
{   pub fn json(&self) -> Value
    {   serde_json::from_slice(&self.body)
          .expect("request body should be JSON")
    }
}

/// Loopback HTTP server answering every request with one canned reply
pub struct MockUpstream
{   pub base: String
  , requests: Arc<Mutex<Vec<RecordedRequest>>>
  , _task: tokio::task::JoinHandle<()>
}

impl MockUpstream
{   pub async fn start(status: u16, body: &str) -> MockUpstream
    {   let listener = TcpListener::bind("127.0.0.1:0").await
          .expect("bind mock upstream");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let body = body.to_string();

        let _task = tokio::spawn(async move {
          loop
          {   let (stream, _) = match listener.accept().await
              {   Ok(conn) => conn
                , Err(_) => break
              };
              let recorded = Arc::clone(&recorded);
              let body = body.clone();
              tokio::spawn(async move {
                let _ = serve_one(stream, status, &body, recorded).await;
              });
          }
        });

        MockUpstream
        {   base: format!("http://{}/v1", addr)
          , requests
          , _task
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest>
    {   self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> RecordedRequest
    {   self.requests().pop().expect("at least one request")
    }

    pub fn bridge(&self) -> InferenceBridge
    {   bridge_for(&self.base)
    }
}

async fn serve_one(
  mut stream: TcpStream
, status: u16
, body: &str
, recorded: Arc<Mutex<Vec<RecordedRequest>>>
) -> std::io::Result<()>
{   let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop
    {   let n = stream.read(&mut chunk).await?;
        if n == 0
        {   return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n")
        {   break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head.lines()
      .filter_map(|line| line.split_once(':'))
      .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
      .and_then(|(_, value)| value.trim().parse::<usize>().ok())
      .unwrap_or(0);
    while buf.len() < header_end + content_length
    {   let n = stream.read(&mut chunk).await?;
        if n == 0
        {   break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let end = buf.len().min(header_end + content_length);
    recorded.lock().expect("requests lock").push(RecordedRequest
    {   method
      , path
      , body: buf[header_end..end].to_vec()
    });

    let response = format!(
      "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\n\
       Content-Length: {}\r\nConnection: close\r\n\r\n{}",
      status, body.len(), body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base() -> String
{   let listener = TcpListener::bind("127.0.0.1:0").await
      .expect("bind probe");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/v1", addr)
}

pub fn bridge_for(base: &str) -> InferenceBridge
{   let config = BridgeConfig::with_api_base(base)
      .validated()
      .expect("valid config");
    InferenceBridge::new(config).expect("bridge")
}
