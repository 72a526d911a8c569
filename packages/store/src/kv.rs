use std::future::Future;

use crate::StoreError;

/// Async string key/value storage.
///
/// Browser storage APIs are asynchronous, so every method returns a future even
/// when the backing store is in memory.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>>;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>>;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>>;

    /// Keys starting with `prefix`, in no particular order.
    fn keys(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, StoreError>>;
}
