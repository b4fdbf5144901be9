//! LLM provider abstraction for mender.
//!
//! A static registry of five hosted providers, each pinned to one of three
//! wire families that fix the request shape, authentication mechanism, and
//! response schema. Enum dispatch keeps provider-specific details out of
//! the chat layer.

mod client;
mod descriptor;
mod listing;

pub use client::send_completion;
pub use descriptor::{find_provider, ProviderDescriptor, WireFamily, PROVIDERS};
pub use listing::fetch_models;
