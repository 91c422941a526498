//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::storage::{FileStorage, StorageSlot, WriteBehindStorage};
use crate::store::{CartStore, WishlistStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart and wishlist are
/// single-writer stores, so each sits behind its own async mutex.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    storage: Arc<dyn StorageSlot>,
    writer: Option<WriteBehindStorage>,
    cart: Mutex<CartStore>,
    wishlist: Mutex<WishlistStore>,
}

impl AppState {
    /// Create application state with stores persisted under `config.data_dir`.
    ///
    /// File writes run on a background writer; call [`flush`](Self::flush)
    /// before shutdown.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let writer = WriteBehindStorage::spawn(Arc::new(FileStorage::new(config.data_dir.clone())));
        let storage: Arc<dyn StorageSlot> = Arc::new(writer.clone());
        Self::build(config, catalog, storage, Some(writer))
    }

    /// Create application state over an explicit storage backend.
    ///
    /// Writes go straight to `storage`.
    #[must_use]
    pub fn with_storage(
        config: StorefrontConfig,
        catalog: Catalog,
        storage: Arc<dyn StorageSlot>,
    ) -> Self {
        Self::build(config, catalog, storage, None)
    }

    fn build(
        config: StorefrontConfig,
        catalog: Catalog,
        storage: Arc<dyn StorageSlot>,
        writer: Option<WriteBehindStorage>,
    ) -> Self {
        let cart = CartStore::new(Arc::clone(&storage)).with_shipping(config.shipping);
        let wishlist = WishlistStore::new(Arc::clone(&storage));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                writer,
                cart: Mutex::new(cart),
                wishlist: Mutex::new(wishlist),
            }),
        }
    }

    /// Wait for queued store writes to reach storage.
    pub async fn flush(&self) {
        if let Some(writer) = &self.inner.writer {
            writer.flush().await;
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Storage backing the stores.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn StorageSlot> {
        &self.inner.storage
    }

    #[must_use]
    pub fn cart(&self) -> &Mutex<CartStore> {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &Mutex<WishlistStore> {
        &self.inner.wishlist
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("products", &self.inner.catalog.len())
            .finish_non_exhaustive()
    }
}
