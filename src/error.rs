use std::fmt;

/// Semantically empty upstream answers.
/// These render as descriptive strings, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyResult
{   /// `/models` answered with no `data` entries
    NoModels
  , /// `/chat/completions` answered with no `choices`
    NoChoices
  , /// First choice carried no message content
    EmptyContent
}

/// Custom error type for bridge operations
/// Implements Clone so outcomes can cross task boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Upstream unreachable, DNS failure, refused, timed out
    Connectivity(String)
  , /// Upstream answered with a non-200 status
    HttpStatus(u16)
  , /// Body was not JSON or lacked a required field
    MalformedPayload(String)
  , /// Well-formed but empty answer
    Empty(EmptyResult)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Tool arguments did not match the input schema
    InvalidArguments(String)
  , /// stdio read or write failure
    Transport(String)
}

impl fmt::Display for EmptyResult
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   EmptyResult::NoModels => {
              write!(f, "No models found in LM Studio.")
            }
          , EmptyResult::NoChoices => {
              write!(f, "Error: No response generated")
            }
          , EmptyResult::EmptyContent => {
              write!(f, "Error: Empty response from model")
            }
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::Connectivity(msg) => write!(f, "{}", msg)
          , Error::HttpStatus(code) => {
              write!(f, "status code {}", code)
            }
          , Error::MalformedPayload(msg) => {
              write!(f, "malformed response: {}", msg)
            }
          , Error::Empty(kind) => write!(f, "{}", kind)
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::InvalidArguments(msg) => {
              write!(f, "Invalid arguments: {}", msg)
            }
          , Error::Transport(msg) => {
              write!(f, "Transport error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_decode()
        {   Error::MalformedPayload(e.to_string())
        } else
        {   Error::Connectivity(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::MalformedPayload(e.to_string())
    }
}

impl From<std::io::Error> for Error
{   fn from(e: std::io::Error) -> Self
    {   Error::Transport(e.to_string())
    }
}

impl Error
{   /// Status code for `HttpStatus`, `None` for every other class
    pub fn status_code(&self) -> Option<u16>
    {   match self
        {   Error::HttpStatus(code) => Some(*code)
          , _ => None
        }
    }

    /// True for soft successes that carry a descriptive message
    pub fn is_empty_result(&self) -> bool
    {   matches!(self, Error::Empty(_))
    }
}
