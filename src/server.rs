//! MCP server loop over any line-oriented reader/writer pair

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::bridge::InferenceBridge;
use crate::config::ServerInfo;
use crate::error::Error;
use crate::protocol::*;
use crate::tools;
use crate::transport::{spawn_writer, LineReader, OutgoingSender};

pub struct McpServer
{   bridge: Arc<InferenceBridge>
  , info: ServerInfo
}

impl McpServer
{   pub fn new(bridge: InferenceBridge, info: ServerInfo) -> Self
    {   McpServer
        {   bridge: Arc::new(bridge)
          , info
        }
    }

    /// Serve on the process's stdin/stdout
    pub async fn serve_stdio(&self) -> Result<(), Error>
    {   let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        self.run(stdin, tokio::io::stdout()).await
    }

    /// Read requests until EOF, then wait for in-flight tool calls
    /// and the writer to drain.
    pub async fn run<R, W>(&self, reader: R, writer: W)
      -> Result<(), Error>
    where R: AsyncBufRead + Unpin
        , W: AsyncWrite + Unpin + Send + 'static
    {   let (tx, writer_handle) = spawn_writer(writer);
        let mut reader = LineReader::new(reader);

        let outcome = loop
        {   let line = match reader.next_message().await
            {   Ok(Some(line)) => line
              , Ok(None) => {
                  info!("Input closed, shutting down");
                  break Ok(());
                }
              , Err(e) => {
                  error!("Failed to read input: {}", e);
                  break Err(e);
                }
            };
            if let Err(e) = self.handle_line(&line, &tx)
            {   break Err(e);
            }
        };

        // Tool tasks hold their own senders; the writer finishes after them.
        drop(tx);
        let drained = writer_handle.await.map_err(|e| {
          Error::Transport(format!("writer task failed: {}", e))
        })?;
        outcome.and(drained)
    }

    fn handle_line(
      &self
    , line: &str
    , tx: &OutgoingSender
    ) -> Result<(), Error>
    {   let value: Value = match serde_json::from_str(line)
        {   Ok(v) => v
          , Err(e) => {
              warn!("Parse error: {}", e);
              return send(tx, JsonRpcResponse::failure(
                Value::Null
              , PARSE_ERROR
              , "Parse error: invalid JSON"
              ));
            }
        };
        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        let msg: JsonRpcIncoming = match serde_json::from_value(value)
        {   Ok(m) => m
          , Err(e) => {
              warn!("Invalid request: {}", e);
              return send(tx, JsonRpcResponse::failure(
                id_hint
              , INVALID_REQUEST
              , format!("Invalid request: {}", e)
              ));
            }
        };

        let id = match msg.id
        {   Some(id) => id
          , None => {
              debug!("Notification {} ignored", msg.method);
              return Ok(());
            }
        };

        match msg.method.as_str()
        {   "initialize" => {
              let params: InitializeParams = msg.params
                .and_then(|p| serde_json::from_value(p).ok())
                .unwrap_or_default();
              let version = negotiate_protocol_version(
                params.protocol_version.as_deref()
              );
              info!("Initialize, protocol version {}", version);
              let result = InitializeResult
              {   protocol_version: version.to_string()
                , capabilities: ServerCapabilities
                  {   tools: ToolsCapability { list_changed: false }
                  }
                , server_info: self.info.clone()
              };
              send(tx, to_response(id, &result))
            }
          , "ping" => send(tx, JsonRpcResponse::success(id, json!({})))
          , "tools/list" => {
              let result = ListToolsResult { tools: tools::catalog() };
              send(tx, to_response(id, &result))
            }
          , "tools/call" => {
              let params: CallToolParams = match msg.params
                .map(serde_json::from_value::<CallToolParams>)
              {   Some(Ok(p)) => p
                , Some(Err(e)) => {
                    return send(tx, JsonRpcResponse::failure(
                      id
                    , INVALID_PARAMS
                    , format!("Invalid tools/call params: {}", e)
                    ));
                  }
                , None => {
                    return send(tx, JsonRpcResponse::failure(
                      id
                    , INVALID_PARAMS
                    , "Missing tools/call params"
                    ));
                  }
              };
              self.spawn_tool_call(id, params, tx.clone());
              Ok(())
            }
          , other => {
              warn!("Method not found: {}", other);
              send(tx, JsonRpcResponse::failure(
                id
              , METHOD_NOT_FOUND
              , format!("Method not found: {}", other)
              ))
            }
        }
    }

    /// Each call gets its own task so a slow completion does not
    /// hold up other requests.
    fn spawn_tool_call(
      &self
    , id: Value
    , params: CallToolParams
    , tx: OutgoingSender
    )
    {   let bridge = Arc::clone(&self.bridge);
        tokio::spawn(async move {
          let result = tools::call_tool(
            &bridge
          , &params.name
          , params.arguments
          ).await;
          if tx.send(to_response(id, &result)).is_err()
          {   error!("Output closed before {} replied", params.name);
          }
        });
    }
}

fn to_response(id: Value, result: &impl serde::Serialize)
  -> JsonRpcResponse
{   match serde_json::to_value(result)
    {   Ok(value) => JsonRpcResponse::success(id, value)
      , Err(e) => {
          error!("Failed to serialize result: {}", e);
          JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string())
        }
    }
}

fn send(tx: &OutgoingSender, response: JsonRpcResponse)
  -> Result<(), Error>
{   tx.send(response).map_err(|_| {
      error!("Writer channel closed");
      Error::Transport("output closed".to_string())
    })
}
