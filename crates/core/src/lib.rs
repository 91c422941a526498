//! Boutique Core - Catalog types and cart/wishlist state transitions.
//!
//! This crate provides the pieces shared by every Boutique component:
//! - `storefront` - HTTP storefront and the observable stores
//! - `cli` - Command-line shopping session
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O, no
//! clocks, no storage. Every mutation of a cart or wishlist is expressed as an
//! action applied to a state value, producing the next state. Side effects such
//! as persistence are layered on top by the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, catalog records and variant keys
//! - [`cart`] - Cart line items, merge rules and derived totals
//! - [`wishlist`] - Deduplicated wishlist entries
//! - [`filter`] - Catalog filtering and sorting
//! - [`reducer`] - The pure transition trait implemented by both states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod reducer;
pub mod types;
pub mod wishlist;

pub use cart::{CartAction, CartLineItem, CartState, CartSummary, ShippingPolicy};
pub use filter::{FilterOptions, ProductFlag, SortBy};
pub use reducer::Reducer;
pub use types::*;
pub use wishlist::{WishlistAction, WishlistEntry, WishlistState};
