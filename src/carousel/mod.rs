//! Catalog carousel: the product display order.
//!
//! ## Architecture
//!
//! The carousel is a doubly-linked list whose nodes live in a slab:
//!
//! - **Slab-based storage**: nodes are addressed by stable `usize` keys
//! - **Index**: product id to slab key for O(1) keyed removal and moves
//! - **Featured window**: the first `max_featured` nodes from head are
//!   flagged, re-derived after every structural mutation
//!
//! ```text
//! head [F] <-> [F] <-> [F] <-> node <-> ... <-> tail
//! ```
//!
//! The `prev`/`next` links are plain slab keys, so a corrupted link can
//! form a cycle without any memory unsafety. Every read path is bounded,
//! and [`ProductCarousel::validate`] detects and cuts cycles.
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add front/end | O(1) link + O(n) window refresh |
//! | Remove by id | O(1) unlink + O(n) window refresh |
//! | Move to front | O(1) relink + O(n) window refresh |
//! | Validate | O(n) |
//!
//! ## Example
//!
//! ```
//! use storefront_core::carousel::ProductCarousel;
//!
//! let mut carousel = ProductCarousel::new();
//! for id in ["A", "B", "C", "D"] {
//!     carousel.add_to_end(id, false);
//! }
//!
//! assert_eq!(carousel.display(), vec!["A", "B", "C", "D"]);
//! assert_eq!(carousel.featured(), vec!["A", "B", "C"]);
//! ```

pub mod node;
pub mod list;

pub use node::ProductNode;
pub use list::ProductCarousel;
