pub mod error;
pub mod config;
pub mod request;
pub mod bridge;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod server;

use serde::{Deserialize, Serialize};

/*

lmstudio-bridge: an MCP server on stdio whose tools forward to a local
LM Studio (OpenAI-compatible) HTTP API and answer with plain text.

lmstudio-bridge/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and shared types
│   ├── main.rs         # CLI entry: config, logging, stdio server
│   ├── error.rs        # Internal fault taxonomy
│   ├── config.rs       # Endpoint + server configuration, CLI args
│   ├── request.rs      # Tool arguments and upstream wire types
│   ├── bridge.rs       # The four operations against the upstream API
│   ├── protocol.rs     # JSON-RPC 2.0 + MCP payloads
│   ├── tools.rs        # Tool catalog and dispatch
│   ├── transport.rs    # NDJSON reader + single-owner writer task
│   └── server.rs       # Request loop
└── tests/              # Integration tests against a loopback upstream

*/

pub use bridge::InferenceBridge;
pub use config::{BridgeConfig, ServerInfo};
pub use error::{EmptyResult, Error};
pub use request::ChatRequest;
pub use server::McpServer;

/// Every tool answers with a single string, failures included
pub type BridgeResult = String;

/// One entry of the upstream `/models` listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelDescriptor
{   pub id: String
}
