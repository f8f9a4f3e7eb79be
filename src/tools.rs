//! Tool catalog and dispatch

use log::{debug, warn};
use serde_json::{json, Value};

use crate::bridge::InferenceBridge;
use crate::error::Error;
use crate::protocol::{CallToolResult, ToolDescriptor};
use crate::request::ChatRequest;

/// The four tools exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool
{   HealthCheck
  , ListModels
  , GetCurrentModel
  , ChatCompletion
}

impl Tool
{   pub const ALL: [Tool; 4] = [
      Tool::HealthCheck
    , Tool::ListModels
    , Tool::GetCurrentModel
    , Tool::ChatCompletion
    ];

    pub fn name(self) -> &'static str
    {   match self
        {   Tool::HealthCheck => "health_check"
          , Tool::ListModels => "list_models"
          , Tool::GetCurrentModel => "get_current_model"
          , Tool::ChatCompletion => "chat_completion"
        }
    }

    pub fn from_name(name: &str) -> Option<Tool>
    {   Tool::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(self) -> &'static str
    {   match self
        {   Tool::HealthCheck => {
              "Check if LM Studio API is accessible."
            }
          , Tool::ListModels => {
              "List all available models in LM Studio."
            }
          , Tool::GetCurrentModel => {
              "Get the currently loaded model in LM Studio \
               (best effort: reads the model field of a tiny completion)."
            }
          , Tool::ChatCompletion => {
              "Generate a completion from the current LM Studio model."
            }
        }
    }

    pub fn input_schema(self) -> Value
    {   match self
        {   Tool::ChatCompletion => json!({
              "type": "object",
              "properties": {
                "prompt": {
                  "type": "string",
                  "description": "The user's prompt to send to the model"
                },
                "system_prompt": {
                  "type": "string",
                  "description": "Optional system instructions for the model",
                  "default": ""
                },
                "temperature": {
                  "type": "number",
                  "description": "Controls randomness (0.0 to 1.0)",
                  "default": 0.7
                },
                "max_tokens": {
                  "type": "integer",
                  "description": "Maximum number of tokens to generate",
                  "default": 1024
                }
              },
              "required": ["prompt"]
            })
          , _ => json!({
              "type": "object",
              "properties": {}
            })
        }
    }

    pub fn descriptor(self) -> ToolDescriptor
    {   ToolDescriptor
        {   name: self.name().to_string()
          , description: self.description().to_string()
          , input_schema: self.input_schema()
        }
    }
}

pub fn catalog() -> Vec<ToolDescriptor>
{   Tool::ALL.into_iter().map(Tool::descriptor).collect()
}

/// Decode `chat_completion` arguments; absent arguments count as `{}`
pub fn parse_chat_request(arguments: Option<Value>)
  -> Result<ChatRequest, Error>
{   let arguments = arguments.unwrap_or_else(|| json!({}));
    serde_json::from_value(arguments).map_err(|e| {
      Error::InvalidArguments(e.to_string())
    })
}

/// Run the named tool.
/// Upstream failures are already text; only unknown names and bad
/// arguments come back flagged as errors.
pub async fn call_tool(
  bridge: &InferenceBridge
, name: &str
, arguments: Option<Value>
) -> CallToolResult
{   let tool = match Tool::from_name(name)
    {   Some(t) => t
      , None => {
          warn!("Unknown tool requested: {}", name);
          return CallToolResult::error(
            format!("Unknown tool: {}", name)
          );
        }
    };
    debug!("Calling tool {}", tool.name());

    let text = match tool
    {   Tool::HealthCheck => bridge.health_check().await
      , Tool::ListModels => bridge.list_models().await
      , Tool::GetCurrentModel => bridge.get_current_model().await
      , Tool::ChatCompletion => {
          match parse_chat_request(arguments)
          {   Ok(request) => bridge.chat_completion(&request).await
            , Err(e) => {
                warn!("Rejected chat_completion arguments: {}", e);
                return CallToolResult::error(
                  format!("{} for {}", e, tool.name())
                );
              }
          }
        }
    };
    CallToolResult::text(text)
}
