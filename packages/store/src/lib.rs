//! # Store crate: small persistent state for the Agito client
//!
//! The client keeps very little locally: the auth session, so a reload stays signed
//! in, and in-progress checkout drafts, so a reload mid-purchase resumes where it
//! left off. Both are JSON documents under fixed string keys.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`KeyValueStore`] | Async string key/value backend |
//! | [`MemoryStore`] | In-process backend for tests and non-browser targets |
//! | `IdbStore` | IndexedDB backend (`wasm32` + `web` feature) |
//! | [`Slot`] | One typed JSON document under one key |
//! | [`keys`] | The keys the client uses |

mod error;
pub mod keys;
mod kv;
mod memory;
mod slot;

pub use error::StoreError;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use slot::Slot;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod idb;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use idb::IdbStore;
