use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{KeyValueStore, StoreError};

/// One JSON document of type `T` stored under a fixed key.
///
/// A document that no longer decodes (e.g. written by an older build) is dropped
/// and reported as absent.
pub struct Slot<S, T> {
    store: S,
    key: String,
    _document: PhantomData<fn() -> T>,
}

impl<S: Clone, T> Clone for Slot<S, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key.clone(),
            _document: PhantomData,
        }
    }
}

impl<S, T> Slot<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _document: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn load(&self) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %self.key, "discarding unreadable document: {e}");
                self.store.remove(&self.key).await?;
                Ok(None)
            }
        }
    }

    pub async fn save(&self, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Encode {
            key: self.key.clone(),
            message: e.to_string(),
        })?;
        self.store.set(&self.key, raw).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keys, MemoryStore};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Draft {
        full: u32,
        half: u32,
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let slot: Slot<_, Draft> = Slot::new(MemoryStore::new(), keys::checkout_draft("e1"));
        assert_eq!(slot.load().await.unwrap(), None);

        slot.save(&Draft { full: 2, half: 1 }).await.unwrap();
        assert_eq!(slot.load().await.unwrap(), Some(Draft { full: 2, half: 1 }));

        slot.clear().await.unwrap();
        assert_eq!(slot.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_document_is_dropped() {
        let store = MemoryStore::new();
        store.set(keys::SESSION, "{not json".to_string()).await.unwrap();

        let slot: Slot<_, Draft> = Slot::new(store.clone(), keys::SESSION);
        assert_eq!(slot.load().await.unwrap(), None);
        assert_eq!(store.get(keys::SESSION).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let store = MemoryStore::new();
        let a: Slot<_, Draft> = Slot::new(store.clone(), keys::checkout_draft("a"));
        let b: Slot<_, Draft> = Slot::new(store.clone(), keys::checkout_draft("b"));
        a.save(&Draft { full: 1, half: 0 }).await.unwrap();
        assert_eq!(b.load().await.unwrap(), None);
    }
}
