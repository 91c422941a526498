//! Command implementations.
//!
//! Each command writes its report to a caller-supplied writer so the same
//! code serves the terminal and the tests.

pub mod cart;
pub mod products;
pub mod wishlist;

use std::path::Path;
use std::sync::Arc;

use boutique_core::{Product, ProductId};
use boutique_storefront::catalog::{Catalog, CatalogError};
use boutique_storefront::storage::{FileStorage, StorageSlot};
use boutique_storefront::store::{CartStore, WishlistStore};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// No product with this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// A shopping session: the catalog plus the persisted stores.
pub struct Session {
    catalog: Catalog,
    storage: Arc<dyn StorageSlot>,
}

impl Session {
    /// Open a session over `data_dir`, loading the catalog from
    /// `catalog_path` or the built-in data.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Catalog` if the catalog cannot be loaded.
    pub fn open(data_dir: &Path, catalog_path: Option<&Path>) -> Result<Self, CliError> {
        let catalog = match catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::embedded()?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "session opened");
        Ok(Self {
            catalog,
            storage: Arc::new(FileStorage::new(data_dir)),
        })
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve a product id against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CliError::UnknownProduct` if no product has this id.
    pub fn product(&self, id: &str) -> Result<Arc<Product>, CliError> {
        self.catalog
            .find(&ProductId::new(id))
            .ok_or_else(|| CliError::UnknownProduct(id.to_string()))
    }

    /// The persisted cart.
    pub fn cart(&self) -> CartStore {
        CartStore::new(Arc::clone(&self.storage))
    }

    /// The persisted wishlist.
    pub fn wishlist(&self) -> WishlistStore {
        WishlistStore::new(Arc::clone(&self.storage))
    }
}
