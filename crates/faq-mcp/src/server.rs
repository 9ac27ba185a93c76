//! MCP server implementation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use faq_client::{FaqClient, HttpTransport, Transport};
use faq_core::{FaqError, FaqSource, ServerConfig};
use faq_query::{SearchEngine, MAX_RESULTS};

use crate::format;
use crate::protocol::{
    Locator, ResourceDescriptor, ResourceText, RpcError, RpcMessage, RpcReply, ToolCall,
    ToolOutput, ToolSpec, PROTOCOL_VERSION,
};

const LIST_RESOURCE_URI: &str = "faq://faqs";
const FAQ_RESOURCE_PREFIX: &str = "faq://faq/";
const MARKDOWN: &str = "text/markdown";

/// FAQ MCP server state.
pub struct FaqMcpServer<T = HttpTransport> {
    /// API client (cache + rate state).
    client: Arc<FaqClient<T>>,

    /// Search engine over the client.
    engine: SearchEngine<FaqClient<T>>,

    /// Server settings.
    config: ServerConfig,
}

/// Search request parameters.
#[derive(Debug, Deserialize, Serialize)]
pub struct SearchParams {
    /// The search query.
    pub query: String,

    /// Maximum number of results to show (default and ceiling: 10).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Get-FAQ request parameters.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetFaqParams {
    /// FAQ identifier, as a string or a number.
    pub faq_number: Value,
}

impl GetFaqParams {
    fn faq_id(&self) -> String {
        match &self.faq_number {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// List request parameters.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListParams {
    /// Embed every FAQ's questions in the listing.
    #[serde(default)]
    pub include_questions: bool,
}

/// Server info.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl<T: Transport> FaqMcpServer<T> {
    /// Create a server around an existing client.
    pub fn new(client: Arc<FaqClient<T>>, config: ServerConfig) -> Self {
        info!("Initializing FAQ MCP server '{}'", config.name);
        let engine = SearchEngine::new(client.clone());
        Self {
            client,
            engine,
            config,
        }
    }

    /// The API client.
    pub fn client(&self) -> &Arc<FaqClient<T>> {
        &self.client
    }

    /// Get the server info.
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.config.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// List available tools.
    pub fn tools() -> Vec<ToolSpec> {
        vec![
            ToolSpec {
                name: "search_faqs",
                description: "Search all FAQs for questions and answers matching a query",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Text to search for" },
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of results (1-10, default 10)",
                            "minimum": 1,
                            "maximum": MAX_RESULTS
                        }
                    },
                    "required": ["query"]
                }),
            },
            ToolSpec {
                name: "get_faq",
                description: "Get a FAQ with all of its questions and answers",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "faq_number": {
                            "type": ["string", "integer"],
                            "description": "FAQ identifier"
                        }
                    },
                    "required": ["faq_number"]
                }),
            },
            ToolSpec {
                name: "list_faqs",
                description: "List all accessible FAQs",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "include_questions": {
                            "type": "boolean",
                            "description": "Include each FAQ's questions"
                        }
                    }
                }),
            },
            ToolSpec {
                name: "get_rate_limit_status",
                description: "Show the remaining API quota and when it resets",
                input_schema: json!({ "type": "object", "properties": {} }),
            },
            ToolSpec {
                name: "clear_cache",
                description: "Discard cached API responses",
                input_schema: json!({ "type": "object", "properties": {} }),
            },
        ]
    }

    /// Dispatch one JSON-RPC message. Notifications get no reply.
    pub async fn handle_request(&self, message: RpcMessage) -> Option<RpcReply> {
        debug!(method = %message.method, "MCP request");

        if message.is_notification() {
            debug!("Notification {} acknowledged", message.method);
            return None;
        }
        let id = message.id.unwrap_or(Value::Null);
        let outcome = self.dispatch(&message.method, message.params).await;
        Some(RpcReply::new(id, outcome))
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": Self::tools() })),
            "tools/call" => {
                let call: ToolCall = serde_json::from_value(params).map_err(|e| {
                    RpcError::invalid_params(format!("Invalid tools/call params: {}", e))
                })?;
                let output = self
                    .call_tool(&call.name, call.arguments)
                    .await
                    .map_err(RpcError::invalid_params)?;
                Ok(output.into_result())
            }
            "resources/list" => Ok(json!({ "resources": Self::resources() })),
            "resources/templates/list" => {
                Ok(json!({ "resourceTemplates": Self::resource_templates() }))
            }
            "resources/read" => {
                let uri = params.get("uri").and_then(|u| u.as_str()).unwrap_or("");
                let contents = self.read_resource(uri).await?;
                Ok(json!({ "contents": [contents] }))
            }
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn initialize_result(&self) -> Value {
        let info = self.info();
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "serverInfo": {
                "name": info.name,
                "version": info.version
            },
            "instructions": "Search and read FAQ knowledge bases. Use search_faqs to find answers, get_faq to read a whole FAQ, and list_faqs to see what is available."
        })
    }

    /// Run a tool. `Err` means the call itself was malformed; API failures
    /// come back as an error result.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolOutput, String> {
        info!(tool = %name, "MCP tools/call");

        let result = match name {
            "search_faqs" => self.search(parse_args(arguments)?).await,
            "get_faq" => self.get_faq(parse_args(arguments)?).await,
            "list_faqs" => self.list_faqs(parse_args(arguments)?).await,
            "get_rate_limit_status" => self.rate_limit_status(),
            "clear_cache" => self.clear_cache(),
            other => return Err(format!("Unknown tool: {}", other)),
        };
        Ok(result)
    }

    /// Search the knowledge base.
    pub async fn search(&self, params: SearchParams) -> ToolOutput {
        let limit = params
            .limit
            .unwrap_or(self.config.max_results)
            .clamp(1, MAX_RESULTS);

        match self.engine.search(&params.query).await {
            Ok(results) => ToolOutput::ok(format::search_results(
                params.query.trim(),
                &results,
                limit,
            )),
            Err(e) => tool_error("Search failed", &e),
        }
    }

    /// Get one FAQ.
    pub async fn get_faq(&self, params: GetFaqParams) -> ToolOutput {
        match self.client.get_faq(&params.faq_id()).await {
            Ok(content) => ToolOutput::ok(format::faq(&content)),
            Err(e) => tool_error("Failed to get FAQ", &e),
        }
    }

    /// List FAQs.
    pub async fn list_faqs(&self, params: ListParams) -> ToolOutput {
        let faqs = if params.include_questions {
            self.client.list_faqs_with_questions().await
        } else {
            self.client.list_faqs().await
        };

        match faqs {
            Ok(faqs) => ToolOutput::ok(format::faq_list(&faqs)),
            Err(e) => tool_error("Failed to list FAQs", &e),
        }
    }

    /// Report the rate-limit state.
    pub fn rate_limit_status(&self) -> ToolOutput {
        ToolOutput::ok(format::rate_status(&self.client.rate_status()))
    }

    /// Clear the response cache.
    pub fn clear_cache(&self) -> ToolOutput {
        self.client.clear_cache();
        ToolOutput::ok("Cache cleared.")
    }

    fn resources() -> Vec<ResourceDescriptor> {
        vec![ResourceDescriptor {
            locator: Locator::Fixed(LIST_RESOURCE_URI.to_string()),
            name: "All FAQs",
            description: "Every FAQ accessible with the configured API key",
            mime_type: MARKDOWN,
        }]
    }

    fn resource_templates() -> Vec<ResourceDescriptor> {
        vec![ResourceDescriptor {
            locator: Locator::Template(format!("{}{{faq_number}}", FAQ_RESOURCE_PREFIX)),
            name: "FAQ",
            description: "One FAQ with all questions and answers",
            mime_type: MARKDOWN,
        }]
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> faq_core::Result<ResourceText> {
        let text = if uri == LIST_RESOURCE_URI {
            format::faq_list(&self.client.list_faqs().await?)
        } else if let Some(faq_id) = uri.strip_prefix(FAQ_RESOURCE_PREFIX) {
            format::faq(&self.client.get_faq(faq_id).await?)
        } else {
            return Err(FaqError::invalid_argument(format!("Unknown resource: {}", uri)));
        };

        Ok(ResourceText {
            uri: uri.to_string(),
            mime_type: MARKDOWN,
            text,
        })
    }
}

fn parse_args<P: DeserializeOwned>(arguments: Value) -> Result<P, String> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))
}

fn tool_error(context: &str, err: &FaqError) -> ToolOutput {
    ToolOutput::failed(format!("{}: {}", context, err.guidance()))
}
