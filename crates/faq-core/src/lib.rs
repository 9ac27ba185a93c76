//! faq-core - Core types and traits for the FAQ knowledge base bridge
//!
//! This crate provides the domain types, configuration, error taxonomy and
//! the seam traits shared by the client, search and MCP layers.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{FaqError, Result};
pub use traits::*;
pub use types::*;
