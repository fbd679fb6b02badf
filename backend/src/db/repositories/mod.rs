//! Repository implementations module.
//!
//! This module contains different implementations of the `MessageRepository` trait:
//! - `kv`: Cloudflare Workers KV over its REST API
//! - `local`: In-memory implementation for unit testing and local development
#[cfg(feature = "kv-repo")]
pub mod kv;
pub mod local;

#[cfg(feature = "kv-repo")]
pub use kv::KvRepository;
pub use local::LocalRepository;
