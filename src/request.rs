//! Tool arguments and upstream wire types

use serde::{Deserialize, Serialize};

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";

/// Defaults applied when the host omits optional tool arguments
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: i64 = 1024;

fn default_temperature() -> f64
{   DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> i64
{   DEFAULT_MAX_TOKENS
}

/// Arguments of the `chat_completion` tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest
{   /// The user's prompt, forwarded byte-for-byte
    pub prompt: String
  , /// Optional system instructions; empty means omitted
    #[serde(default)]
    pub system_prompt: String
  , /// Sampling temperature, passed through unchecked
    #[serde(default = "default_temperature")]
    pub temperature: f64
  , /// Generation limit, passed through unchecked (-1 means no limit)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64
}

impl ChatRequest
{   pub fn new(prompt: impl Into<String>) -> Self
    {   ChatRequest
        {   prompt: prompt.into()
          , system_prompt: String::new()
          , temperature: DEFAULT_TEMPERATURE
          , max_tokens: DEFAULT_MAX_TOKENS
        }
    }

    pub fn with_system_prompt(
      mut self
    , system_prompt: impl Into<String>
    ) -> Self
    {   self.system_prompt = system_prompt.into();
        self
    }

    /// Optional system message, then exactly one user message
    pub fn messages(&self) -> Vec<ChatMessage>
    {   let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty()
        {   messages.push(ChatMessage::system(&self.system_prompt));
        }
        messages.push(ChatMessage::user(&self.prompt));
        messages
    }

    /// Upstream body for this request
    pub fn to_completion_request(
      &self
    , model: Option<&str>
    ) -> CompletionRequest
    {   CompletionRequest
        {   model: model.map(str::to_string)
          , messages: self.messages()
          , temperature: self.temperature
          , max_tokens: self.max_tokens
        }
    }
}

// ===== Upstream wire types =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn system(content: &str) -> Self
    {   ChatMessage
        {   role: ROLE_SYSTEM.to_string()
          , content: content.to_string()
        }
    }

    pub fn user(content: &str) -> Self
    {   ChatMessage
        {   role: ROLE_USER.to_string()
          , content: content.to_string()
        }
    }
}

/// Body of `POST /chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest
{   #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>
  , pub messages: Vec<ChatMessage>
  , pub temperature: f64
  , pub max_tokens: i64
}

/// Envelope of a `/chat/completions` answer.
/// Every field is optional so that shape gaps become empty results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse
{   #[serde(default)]
    pub model: Option<serde_json::Value>
  , #[serde(default)]
    pub choices: Option<Vec<Choice>>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

impl CompletionResponse
{   /// The envelope's `model` as text; strings bare, other JSON as written
    pub fn model_name(&self) -> Option<String>
    {   match self.model.as_ref()?
        {   serde_json::Value::Null => None
          , serde_json::Value::String(name) => Some(name.clone())
          , other => Some(other.to_string())
        }
    }

    /// Content of the first choice, classified
    pub fn first_content(self)
      -> Result<String, crate::error::Error>
    {   use crate::error::{EmptyResult, Error};
        let first = self.choices
          .and_then(|choices| choices.into_iter().next())
          .ok_or(Error::Empty(EmptyResult::NoChoices))?;
        first.message
          .and_then(|m| m.content)
          .filter(|content| !content.is_empty())
          .ok_or(Error::Empty(EmptyResult::EmptyContent))
    }
}

/// Body of `GET /models`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsResponse
{   #[serde(default)]
    pub data: Option<Vec<crate::ModelDescriptor>>
}
