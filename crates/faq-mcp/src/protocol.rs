//! Wire types for the MCP dialect of JSON-RPC 2.0 spoken on stdio.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use faq_core::FaqError;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const JSONRPC: &str = "2.0";

/// An incoming message. Without an `id` it is a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcMessage {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl RpcMessage {
    /// A call that expects a reply.
    pub fn call(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// A fire-and-forget message.
    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            id: None,
            method: method.into(),
            params: Value::Null,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Either half of a reply body; serialized as a `result` or `error` key.
#[derive(Debug, Clone, Serialize)]
enum Outcome {
    #[serde(rename = "result")]
    Done(Value),
    #[serde(rename = "error")]
    Failed(RpcError),
}

/// An outgoing reply.
#[derive(Debug, Clone, Serialize)]
pub struct RpcReply {
    jsonrpc: &'static str,
    id: Value,
    #[serde(flatten)]
    outcome: Outcome,
}

impl RpcReply {
    pub fn new(id: Value, outcome: Result<Value, RpcError>) -> Self {
        let outcome = match outcome {
            Ok(value) => Outcome::Done(value),
            Err(err) => Outcome::Failed(err),
        };
        Self {
            jsonrpc: JSONRPC,
            id,
            outcome,
        }
    }

    pub fn id(&self) -> &Value {
        &self.id
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Done(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcError> {
        match &self.outcome {
            Outcome::Done(_) => None,
            Outcome::Failed(err) => Some(err),
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self {
            code: Self::PARSE_ERROR,
            message: format!("Parse error: {}", detail),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: Self::METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: Self::INTERNAL_ERROR,
            message: message.into(),
        }
    }
}

impl From<FaqError> for RpcError {
    fn from(err: FaqError) -> Self {
        match err {
            FaqError::InvalidArgument { .. } => Self::invalid_params(err.to_string()),
            other => Self::internal(other.guidance()),
        }
    }
}

/// A tool advertised by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters of `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Markdown produced by a tool. A failed tool still answers the call,
/// flagged so the agent can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    text: String,
    is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// The `tools/call` result body: a single text block.
    pub fn into_result(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

/// How a resource is addressed: a fixed URI or a template.
#[derive(Debug, Clone, Serialize)]
pub enum Locator {
    #[serde(rename = "uri")]
    Fixed(String),
    #[serde(rename = "uriTemplate")]
    Template(String),
}

/// An entry of `resources/list` or `resources/templates/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDescriptor {
    #[serde(flatten)]
    pub locator: Locator,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// One entry of a `resources/read` reply.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceText {
    pub uri: String,
    pub mime_type: &'static str,
    pub text: String,
}
