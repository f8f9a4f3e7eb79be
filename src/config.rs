//! Configuration for the upstream endpoint and the MCP server

use clap::Parser;
use serde::{Deserialize, Serialize};

/// LM Studio's default OpenAI-compatible base path
pub const DEFAULT_API_BASE: &str
  = "http://localhost:1234/v1";

/// Upstream endpoint configuration, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig
{   /// API base URL, without trailing slash
    pub api_base: String
  , /// Sent as `model` on chat completions when set
    pub default_model: Option<String>
  , /// Request timeout in seconds; `None` keeps the client default
    pub timeout_secs: Option<u64>
  , /// Honour HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool
}

impl Default for BridgeConfig
{   fn default() -> Self
    {   BridgeConfig
        {   api_base: DEFAULT_API_BASE.to_string()
          , default_model: None
          , timeout_secs: None
          , use_system_proxy: false
        }
    }
}

impl BridgeConfig
{   /// Config pointed at `api_base`, everything else default
    pub fn with_api_base(api_base: impl Into<String>) -> Self
    {   BridgeConfig
        {   api_base: api_base.into()
          , ..BridgeConfig::default()
        }
    }

    /// Check the base URL and strip trailing slashes
    pub fn validated(mut self)
      -> Result<Self, crate::error::Error>
    {   let trimmed = self.api_base.trim().trim_end_matches('/');
        let url = reqwest::Url::parse(trimmed).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("api base '{}': {}", self.api_base, e)
          )
        })?;
        if url.scheme() != "http" && url.scheme() != "https"
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!(
                "api base '{}' must use http or https",
                self.api_base
              )
            ));
        }
        self.api_base = trimmed.to_string();
        self.default_model = self.default_model
          .filter(|m| !m.trim().is_empty());
        Ok(self)
    }

    /// `{api_base}/{path}`
    pub fn endpoint(&self, path: &str) -> String
    {   format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// Identity reported in the MCP `initialize` handshake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo
{   pub name: String
  , pub version: String
}

impl Default for ServerInfo
{   fn default() -> Self
    {   ServerInfo
        {   name: "lmstudio-bridge".to_string()
          , version: env!("CARGO_PKG_VERSION").to_string()
        }
    }
}

#[derive(Parser, Debug)]
#[command(
  name = "lmstudio-bridge"
, version
, about = "MCP server exposing a local LM Studio API as tools"
)]
pub struct CliArgs
{   /// OpenAI-compatible API base URL
    #[arg(long, default_value = DEFAULT_API_BASE, env = "LMSTUDIO_API_BASE")]
    pub api_base: String

  , /// Model id sent with chat completions (LM Studio picks the loaded one when unset)
    #[arg(long, env = "LMSTUDIO_DEFAULT_MODEL")]
    pub default_model: Option<String>

  , /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, env = "LMSTUDIO_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>

  , /// Route upstream requests through the system proxy
    #[arg(long)]
    pub use_system_proxy: bool

  , /// Server name in the MCP initialize response
    #[arg(long, default_value = "lmstudio-bridge")]
    pub server_name: String

  , /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, default_value = "info", env = "LMSTUDIO_BRIDGE_LOG")]
    pub log_level: String
}

impl CliArgs
{   pub fn bridge_config(&self)
      -> Result<BridgeConfig, crate::error::Error>
    {   BridgeConfig
        {   api_base: self.api_base.clone()
          , default_model: self.default_model.clone()
          , timeout_secs: self.timeout_secs
          , use_system_proxy: self.use_system_proxy
        }.validated()
    }

    pub fn server_info(&self) -> ServerInfo
    {   ServerInfo
        {   name: self.server_name.clone()
          , ..ServerInfo::default()
        }
    }
}
