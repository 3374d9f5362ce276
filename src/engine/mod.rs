//! Storefront engine: the single context object owning every component.
//!
//! ## Design Principles
//!
//! 1. **Single owner**: one `Storefront` per process, constructed at
//!    startup and passed to callers; no global instances
//! 2. **Synchronous**: every operation runs to completion on the caller's
//!    thread
//! 3. **Independent components**: the carousel, directory, cart and queue
//!    never call each other
//!
//! Callers that share a `Storefront` across threads must wrap each component
//! (or the whole engine) in a single mutex; intermediate link rewiring is
//! never safe to observe.
//!
//! ## Example
//!
//! ```
//! use storefront_core::config::StoreConfig;
//! use storefront_core::engine::Storefront;
//!
//! let mut store = Storefront::new(StoreConfig::default());
//! store.carousel.add_to_end("A-Shirt", false);
//! store.orders.enqueue_order("O1", false);
//!
//! assert_eq!(store.carousel.featured(), vec!["A-Shirt"]);
//! assert_eq!(store.state_root_hex().len(), 64);
//! ```

pub mod snapshot;

use crate::cart::{OrderProcessor, ShoppingCart};
use crate::carousel::ProductCarousel;
use crate::config::StoreConfig;
use crate::directory::CustomerDB;

/// All storefront components
#[derive(Debug)]
pub struct Storefront {
    pub carousel: ProductCarousel,
    pub customers: CustomerDB,
    pub cart: ShoppingCart,
    pub orders: OrderProcessor,
    config: StoreConfig,
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Storefront {
    /// Build every component from one configuration
    pub fn new(config: StoreConfig) -> Self {
        tracing::debug!(?config, "storefront created");
        Self {
            carousel: ProductCarousel::with_window(config.max_featured, config.carousel_capacity),
            customers: CustomerDB::with_capacity(config.directory_capacity),
            cart: ShoppingCart::with_undo_capacity(config.undo_capacity),
            orders: OrderProcessor::new(),
            config,
        }
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
