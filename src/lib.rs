//! # Storefront Core
//!
//! In-memory indexed data engine behind a small storefront.
//!
//! ## Architecture
//!
//! Three independent components, plus the context object that owns them:
//! - **Carousel**: product display order as a slab-backed doubly-linked
//!   list with a featured window and cycle repair
//! - **Directory**: customer BST with single-rotation promotion and
//!   second-order recommendations
//! - **Cart**: bounded undo stack of cart mutations and a VIP-aware order
//!   queue
//! - **Engine**: [`Storefront`], one instance of each component
//!
//! ## Design Principles
//!
//! 1. **Arena links**: nodes live in slabs and link by key, never by pointer
//! 2. **Expected failures are values**: "not found", "empty" and "already
//!    root" come back as `false`, `None` or an error enum, never a panic
//! 3. **Bounded traversals**: every carousel walk carries a step limit, so
//!    a corrupted (cyclic) list cannot hang a reader
//! 4. **Synchronous execution**: no async, no internal locking

// ============================================================================
// Module declarations
// ============================================================================

/// Core value types: profiles, cart actions, orders, result records
pub mod types;

/// Product carousel: slab-backed linked list with cycle repair
pub mod carousel;

/// Customer directory: BST with promotion and recommendations
pub mod directory;

/// Shopping cart undo stack and order queue
pub mod cart;

/// Storefront context object
pub mod engine;

/// Engine configuration
pub mod config;

/// Error enums
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use carousel::{ProductCarousel, ProductNode};
pub use directory::{CustomerDB, CustomerNode};
pub use cart::{OrderProcessor, ShoppingCart};
pub use engine::Storefront;
pub use config::StoreConfig;
pub use error::{CartError, ConfigError, DirectoryError, QueueError};
pub use types::{ActionKind, CartAction, CustomerProfile, Order, ValidationReport};
