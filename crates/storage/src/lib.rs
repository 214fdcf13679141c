//! Storage layer for Brain Mobile
//!
//! This crate provides the durable key-value storage used to persist
//! credentials and device flags between runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod credentials;
pub mod kv;
pub mod memory;

pub use credentials::{Credential, CredentialStore};
pub use kv::{KeyValueStore, KvConfig, KvError, KvStore};
pub use memory::MemoryStore;
