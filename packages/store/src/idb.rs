//! # IndexedDB key/value store
//!
//! [`IdbStore`] is the [`KeyValueStore`] used in the browser. Documents live in a
//! single object store of the `"agito"` database, keyed by their string key, with
//! the JSON text as value.
//!
//! `Rexie` is not `Clone`, so every call opens the database again; the browser
//! keeps the underlying connection cached.

use rexie::{ObjectStore as RexieObjectStore, Rexie, TransactionMode};
use wasm_bindgen::JsValue;

use crate::{KeyValueStore, StoreError};

const DB_NAME: &str = "agito";
const DB_VERSION: u32 = 1;
const ENTRIES_STORE: &str = "entries";

#[derive(Clone, Debug, Default)]
pub struct IdbStore;

impl IdbStore {
    pub fn new() -> Self {
        Self
    }

    async fn open_db(&self) -> Result<Rexie, StoreError> {
        Rexie::builder(DB_NAME)
            .version(DB_VERSION)
            .add_object_store(RexieObjectStore::new(ENTRIES_STORE))
            .build()
            .await
            .map_err(unavailable)
    }
}

fn unavailable(e: rexie::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

impl KeyValueStore for IdbStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[ENTRIES_STORE], TransactionMode::ReadOnly)
            .map_err(unavailable)?;
        let store = tx.store(ENTRIES_STORE).map_err(unavailable)?;

        let Some(value) = store.get(JsValue::from_str(key)).await.map_err(unavailable)? else {
            return Ok(None);
        };
        Ok(serde_wasm_bindgen::from_value::<String>(value).ok())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[ENTRIES_STORE], TransactionMode::ReadWrite)
            .map_err(unavailable)?;
        let store = tx.store(ENTRIES_STORE).map_err(unavailable)?;

        let value = JsValue::from_str(&value);
        store
            .put(&value, Some(&JsValue::from_str(key)))
            .await
            .map_err(unavailable)?;
        tx.done().await.map_err(unavailable)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[ENTRIES_STORE], TransactionMode::ReadWrite)
            .map_err(unavailable)?;
        let store = tx.store(ENTRIES_STORE).map_err(unavailable)?;

        store
            .delete(JsValue::from_str(key))
            .await
            .map_err(unavailable)?;
        tx.done().await.map_err(unavailable)?;
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let db = self.open_db().await?;
        let tx = db
            .transaction(&[ENTRIES_STORE], TransactionMode::ReadOnly)
            .map_err(unavailable)?;
        let store = tx.store(ENTRIES_STORE).map_err(unavailable)?;

        let entries = store
            .get_all(None, None, None, None)
            .await
            .map_err(unavailable)?;
        Ok(entries
            .into_iter()
            .filter_map(|(key, _)| key.as_string())
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}
