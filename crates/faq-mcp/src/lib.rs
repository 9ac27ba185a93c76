//! faq-mcp - MCP server implementation
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! the FAQ knowledge base as tools and resources for AI assistants, speaking
//! newline-delimited JSON-RPC 2.0 over stdio.
//!
//! # Tools
//!
//! - `search_faqs` - Search every FAQ for matching questions and answers
//! - `get_faq` - Get one FAQ with all questions and answers
//! - `list_faqs` - List all FAQs
//! - `get_rate_limit_status` - Show the last reported rate-limit state
//! - `clear_cache` - Drop cached API responses
//!
//! # Resources
//!
//! - `faq://faqs` - All FAQs
//! - `faq://faq/{faq_number}` - One FAQ

pub mod format;
pub mod protocol;
mod server;
mod stdio;

pub use protocol::{RpcError, RpcMessage, RpcReply, ToolOutput, ToolSpec};
pub use server::{FaqMcpServer, GetFaqParams, ListParams, SearchParams, ServerInfo};
pub use stdio::serve;
