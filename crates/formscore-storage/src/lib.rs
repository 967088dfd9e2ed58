//! Reference set persistence.
//!
//! This crate provides:
//! - The async `ReferenceStore` trait
//! - An in-memory store for tests and embedding
//! - A local filesystem store writing gzip JSON documents
//! - The document codec with format version checks

pub mod codec;
pub mod error;
pub mod local;
pub mod memory;
pub mod store;

pub use codec::{decode_reference_set, encode_reference_set, REFERENCE_EXTENSION};
pub use error::{StorageError, StorageResult};
pub use local::LocalReferenceStore;
pub use memory::InMemoryReferenceStore;
pub use store::{reference_key, ReferenceStore};
