//! Integration tests for Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p boutique-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - cart continuity across store reloads on disk
//! - `wishlist_session` - wishlist continuity across store reloads on disk
//! - `http_api` - the storefront router driven in-process
//!
//! This library holds the shared fixtures.

use axum::Router;
use boutique_storefront::catalog::Catalog;
use boutique_storefront::config::StorefrontConfig;
use boutique_storefront::state::AppState;
use tempfile::TempDir;

/// A storefront router over a fresh data directory.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Create a context with the embedded catalog and an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or the catalog cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let state = Self::state_for(&dir);
        Self { dir, state }
    }

    /// State rooted at an existing directory, as after a restart.
    ///
    /// # Panics
    ///
    /// Panics if the embedded catalog is invalid.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn state_for(dir: &TempDir) -> AppState {
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        let catalog = Catalog::embedded().expect("embedded catalog");
        AppState::new(config, catalog)
    }

    /// The application router.
    #[must_use]
    pub fn app(&self) -> Router {
        boutique_storefront::app(self.state.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
