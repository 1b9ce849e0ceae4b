//! Protocol binding
//!
//! JSON-RPC 2.0 over line-delimited stdio, exposing the tool runtime's
//! actions (`tools/list`, `tools/call`) and the module schema resource.

pub mod protocol;
pub mod stdio;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ProtocolHandler, ServerInfo};
pub use stdio::{serve, serve_stdio};
