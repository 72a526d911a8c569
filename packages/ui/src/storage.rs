//! Local persistence for the session and checkout drafts.
//!
//! Browser builds with the `web` feature keep documents in IndexedDB; every other
//! build shares one in-memory store for the life of the process.

use api::{CheckoutDraft, Session};
use store::{keys, KeyValueStore, Slot, StoreError};
use uuid::Uuid;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type AppStore = store::IdbStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type AppStore = store::MemoryStore;

pub fn make_store() -> AppStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::IdbStore::new()
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        static SHARED: std::sync::OnceLock<store::MemoryStore> = std::sync::OnceLock::new();
        SHARED.get_or_init(store::MemoryStore::new).clone()
    }
}

pub fn session_slot() -> Slot<AppStore, Session> {
    Slot::new(make_store(), keys::SESSION)
}

pub fn draft_slot(event_id: Uuid) -> Slot<AppStore, CheckoutDraft> {
    Slot::new(make_store(), keys::checkout_draft(event_id))
}

/// Forget every checkout in progress.
pub async fn clear_drafts() -> Result<(), StoreError> {
    let store = make_store();
    for key in store.keys(keys::checkout_prefix()).await? {
        store.remove(&key).await?;
    }
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use api::Money;

    #[tokio::test]
    async fn test_drafts_are_per_event_and_cleared_together() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let mut draft = CheckoutDraft::new(a, Money::from_cents(1000));
        draft.set_full_quantity(2);
        draft_slot(a).save(&draft).await.unwrap();
        draft_slot(b)
            .save(&CheckoutDraft::new(b, Money::ZERO))
            .await
            .unwrap();

        let loaded = draft_slot(a).load().await.unwrap().unwrap();
        assert_eq!(loaded.full_quantity(), 2);

        clear_drafts().await.unwrap();
        assert!(draft_slot(a).load().await.unwrap().is_none());
        assert!(draft_slot(b).load().await.unwrap().is_none());
    }
}
