//! Observable state containers with persistence.
//!
//! A [`Store`] owns one [`Reducer`] state. Each dispatched action is applied
//! purely, the result is committed, and only then are subscribers notified.
//! Persistence is just another subscriber: it serializes the committed state
//! into a [`StorageSlot`], and a failed write is logged without touching the
//! in-memory state.
//!
//! Stores are single-writer: every mutation takes `&mut self`. Share one
//! across tasks by wrapping it in a mutex (see `AppState`).

pub mod cart;
pub mod wishlist;

use std::sync::Arc;

use boutique_core::Reducer;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::StorageSlot;

pub use cart::CartStore;
pub use wishlist::WishlistStore;

/// Schema marker written next to persisted state. Restores ignore it.
pub const PERSIST_VERSION: u32 = 0;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A state-change listener.
pub type Listener<S> = Box<dyn FnMut(&S) + Send>;

#[derive(Serialize)]
struct PersistedRef<'a, S> {
    state: &'a S,
    version: u32,
}

#[derive(Deserialize)]
struct Persisted<S> {
    state: S,
}

/// A single-writer observable state container.
pub struct Store<S: Reducer> {
    name: &'static str,
    state: S,
    listeners: Vec<(SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S: Reducer + PartialEq> Store<S> {
    /// Create an unpersisted store starting from `state`.
    pub fn new(name: &'static str, state: S) -> Self {
        Self {
            name,
            state,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a store mirrored into `storage` under `key`.
    ///
    /// The initial state is restored from the slot; an empty, unreadable, or
    /// malformed slot yields the default state.
    pub fn persisted(storage: Arc<dyn StorageSlot>, key: &'static str) -> Self {
        let state = restore::<S>(storage.as_ref(), key);
        let mut store = Self::new(key, state);
        store.subscribe(move |state: &S| persist(storage.as_ref(), key, state));
        store
    }

    /// The current committed state.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Apply `action`, commit the result, and notify subscribers.
    ///
    /// Returns `false` (and notifies nobody) when the action left the state
    /// unchanged.
    pub fn dispatch(&mut self, action: &S::Action) -> bool {
        let next = self.state.clone().apply(action);
        if next == self.state {
            return false;
        }
        self.state = next;
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
        true
    }

    /// Register a listener called after every committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(&S) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

impl<S: Reducer + std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Load state from `key`, falling back to the default on any problem.
pub fn restore<S: Reducer>(storage: &dyn StorageSlot, key: &str) -> S {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no persisted state, starting empty");
            return S::default();
        }
        Err(e) => {
            warn!(key, error = %e, "persisted state unreadable, starting empty");
            return S::default();
        }
    };

    match serde_json::from_str::<Persisted<S>>(&raw) {
        Ok(Persisted { state }) if state.is_consistent() => {
            debug!(key, "restored persisted state");
            state
        }
        Ok(_) => {
            warn!(key, "persisted state violates invariants, discarding");
            S::default()
        }
        Err(e) => {
            warn!(key, error = %e, "persisted state malformed, discarding");
            S::default()
        }
    }
}

/// Write `state` to `key`. Failures are logged, never returned.
fn persist<S: Serialize>(storage: &dyn StorageSlot, key: &str, state: &S) {
    let envelope = PersistedRef {
        state,
        version: PERSIST_VERSION,
    };
    let raw = match serde_json::to_string(&envelope) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "failed to serialize state");
            return;
        }
    };
    if let Err(e) = storage.save(key, &raw) {
        warn!(key, error = %e, "failed to persist state");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use boutique_core::{CartAction, CartState};

    use super::*;
    use crate::storage::{MemoryStorage, StorageError, keys};
    use crate::test_support::product;

    /// Storage whose writes always fail.
    struct BrokenStorage;

    impl StorageSlot for BrokenStorage {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn save(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_notifies_after_commit() {
        let mut store = Store::new("cart", CartState::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |state: &CartState| sink.lock().unwrap().push(state.total_items()));

        let p = product("7", 679_000);
        assert!(store.dispatch(&CartAction::add(Arc::clone(&p), 2)));
        assert!(store.dispatch(&CartAction::add(p, 1)));

        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_noop_dispatch_skips_listeners() {
        let mut store = Store::new("cart", CartState::default());
        let calls = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&calls);
        store.subscribe(move |_: &CartState| *sink.lock().unwrap() += 1);

        assert!(!store.dispatch(&CartAction::Clear));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = Store::new("cart", CartState::default());
        let calls = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&calls);
        let id = store.subscribe(move |_: &CartState| *sink.lock().unwrap() += 1);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(&CartAction::add(product("1", 1), 1));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_persisted_store_writes_envelope() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store: Store<CartState> = Store::persisted(storage.clone(), keys::CART);
        store.dispatch(&CartAction::add(product("7", 679_000), 1));

        let raw = storage.load(keys::CART).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["items"][0]["quantity"], 1);
        assert_eq!(json["state"]["items"][0]["product"]["id"], "7");
    }

    #[test]
    fn test_restore_falls_back_on_malformed_state() {
        let storage = MemoryStorage::new();
        for raw in [
            "not json",
            r#"{"items": []}"#,
            r#"{"state": {"items": [{"quantity": 1}]}, "version": 0}"#,
        ] {
            storage.save(keys::CART, raw).unwrap();
            let state: CartState = restore(&storage, keys::CART);
            assert!(state.is_empty(), "expected empty cart for {raw}");
        }
    }

    #[test]
    fn test_restore_discards_inconsistent_state() {
        let storage = MemoryStorage::new();
        let p = product("7", 100);
        let mut state = CartState::default().apply(&CartAction::add(p, 1));
        state.items[0].quantity = 0;
        let raw = serde_json::to_string(&PersistedRef {
            state: &state,
            version: PERSIST_VERSION,
        })
        .unwrap();
        storage.save(keys::CART, &raw).unwrap();

        let restored: CartState = restore(&storage, keys::CART);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let mut store: Store<CartState> = Store::persisted(Arc::new(BrokenStorage), keys::CART);
        assert!(store.dispatch(&CartAction::add(product("7", 10), 4)));
        assert_eq!(store.state().total_items(), 4);
    }
}
