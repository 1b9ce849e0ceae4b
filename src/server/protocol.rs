//! JSON-RPC 2.0 message handling
//!
//! Maps protocol methods onto the tool runtime. Tool failures are successful
//! JSON-RPC responses with `isError: true`; only protocol-level problems
//! (bad JSON, unknown method, bad params) become JSON-RPC errors.

use crate::engine::ModuleSchema;
use crate::tools::ToolRuntime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revision reported when the client does not ask for one
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// URI of the module schema resource
pub const SCHEMA_RESOURCE_URI: &str = "persona://schema";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Incoming request or notification
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,

    /// Absent for notifications; an explicit `null` id still expects a reply
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default)]
    pub params: Value,
}

/// Wrap any present value, `null` included, so only a missing field is `None`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Protocol-level error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Outgoing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Identity reported during `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub instructions: String,
}

/// Protocol front end over the tool runtime
#[derive(Debug, Clone)]
pub struct ProtocolHandler {
    runtime: ToolRuntime,
    info: ServerInfo,
}

impl ProtocolHandler {
    pub fn new(runtime: ToolRuntime, info: ServerInfo) -> Self {
        Self { runtime, info }
    }

    pub fn runtime(&self) -> &ToolRuntime {
        &self.runtime
    }

    /// Handle one raw line; `None` means nothing should be written back
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Unparseable frame");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned();
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id.unwrap_or(Value::Null),
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ))
            }
        };

        self.handle_request(request)
    }

    /// Dispatch a decoded request
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        trace!(method = %request.method, id = ?request.id, "Request received");

        if let Some(version) = request.jsonrpc.as_deref() {
            if version != JSONRPC_VERSION {
                debug!(version, "Client sent unexpected jsonrpc version");
            }
        }

        let Some(id) = request.id else {
            // Notifications never get a reply
            debug!(method = %request.method, "Notification received");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(&request.params),
            "resources/list" => Ok(self.list_resources()),
            "resources/read" => self.read_resource(&request.params),
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::result(id, result),
            Err((code, message)) => JsonRpcResponse::error(id, code, message),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": false }
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version
            },
            "instructions": self.info.instructions
        })
    }

    fn list_tools(&self) -> Value {
        json!({ "tools": self.runtime.registry().schemas() })
    }

    fn call_tool(&self, params: &Value) -> Result<Value, (i64, String)> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| (INVALID_PARAMS, "tools/call requires a string 'name'".to_string()))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let result = self.runtime.execute(name, &arguments);

        Ok(json!({
            "content": [{ "type": "text", "text": result.output_text() }],
            "structuredContent": result.output,
            "isError": !result.success
        }))
    }

    fn list_resources(&self) -> Value {
        json!({
            "resources": [{
                "uri": SCHEMA_RESOURCE_URI,
                "name": "Persona module schema",
                "description": "Definitions of the seven persona modules",
                "mimeType": "application/json"
            }]
        })
    }

    fn read_resource(&self, params: &Value) -> Result<Value, (i64, String)> {
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| (INVALID_PARAMS, "resources/read requires a string 'uri'".to_string()))?;

        if uri != SCHEMA_RESOURCE_URI {
            return Err((INVALID_PARAMS, format!("Unknown resource: {}", uri)));
        }

        let schema = ModuleSchema::canonical();
        let text = serde_json::to_string_pretty(&schema)
            .map_err(|e| (INVALID_PARAMS, format!("Failed to render schema: {}", e)))?;

        Ok(json!({
            "contents": [{
                "uri": SCHEMA_RESOURCE_URI,
                "mimeType": "application/json",
                "text": text
            }]
        }))
    }
}
