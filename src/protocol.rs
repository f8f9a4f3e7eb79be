//! JSON-RPC 2.0 framing and the MCP payloads this server speaks

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== JSON-RPC 2.0 error codes =====

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// ===== MCP protocol versions =====

pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str]
  = &["2024-11-05", "2025-03-26", "2025-06-18"];
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// Echo the client's version when supported, otherwise offer ours
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str
{   requested
      .and_then(|v| {
        SUPPORTED_PROTOCOL_VERSIONS.iter().copied().find(|s| *s == v)
      })
      .unwrap_or(LATEST_PROTOCOL_VERSION)
}

// ===== JSON-RPC 2.0 framing =====

/// Incoming request or notification.
/// Requests carry an id (number or string); notifications do not.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcIncoming
{   #[serde(default)]
    pub id: Option<Value>
  , pub method: String
  , #[serde(default)]
    pub params: Option<Value>
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse
{   pub jsonrpc: &'static str
  , pub id: Value
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError
{   pub code: i32
  , pub message: String
}

impl JsonRpcResponse
{   pub fn success(id: Value, result: Value) -> Self
    {   JsonRpcResponse
        {   jsonrpc: "2.0"
          , id
          , result: Some(result)
          , error: None
        }
    }

    pub fn failure(
      id: Value
    , code: i32
    , message: impl Into<String>
    ) -> Self
    {   JsonRpcResponse
        {   jsonrpc: "2.0"
          , id
          , result: None
          , error: Some(JsonRpcError
            {   code
              , message: message.into()
            })
        }
    }
}

// ===== MCP payloads (camelCase on the wire) =====

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams
{   #[serde(default)]
    pub protocol_version: Option<String>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult
{   pub protocol_version: String
  , pub capabilities: ServerCapabilities
  , pub server_info: crate::config::ServerInfo
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities
{   pub tools: ToolsCapability
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability
{   pub list_changed: bool
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor
{   pub name: String
  , pub description: String
  , pub input_schema: Value
}

#[derive(Debug, Clone, Serialize)]
pub struct ListToolsResult
{   pub tools: Vec<ToolDescriptor>
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams
{   pub name: String
  , #[serde(default)]
    pub arguments: Option<Value>
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock
{   #[serde(rename = "text")]
    Text { text: String }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult
{   pub content: Vec<ContentBlock>
  , pub is_error: bool
}

impl CallToolResult
{   pub fn text(text: String) -> Self
    {   CallToolResult
        {   content: vec![ContentBlock::Text { text }]
          , is_error: false
        }
    }

    pub fn error(text: String) -> Self
    {   CallToolResult
        {   content: vec![ContentBlock::Text { text }]
          , is_error: true
        }
    }
}
