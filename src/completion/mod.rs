//! Client and wire types for the LLM content-generation API.

mod client;
mod types;


pub use client::CompletionClient;
pub use types::*;
