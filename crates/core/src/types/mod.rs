//! Core types for Boutique.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod variant;

pub use id::*;
pub use price::Price;
pub use product::{Category, Product, Subcategory};
pub use variant::VariantKey;
