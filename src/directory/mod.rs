//! Customer directory: a binary search tree keyed by customer id.
//!
//! ## Architecture
//!
//! Nodes live in a slab and reference each other by key:
//!
//! - `left` / `right`: owning structural links
//! - `parent`: non-owning back-link, rewritten by the same operation that
//!   changes `left` / `right`
//!
//! Insertion is unbalanced. Hot customers are lifted towards the root one
//! rotation at a time by [`CustomerDB::promote_hot_customer`].
//!
//! Ordering: left subtree ids are strictly smaller, right subtree ids are
//! greater or equal (duplicates descend right).
//!
//! ## Example
//!
//! ```
//! use storefront_core::directory::CustomerDB;
//! use storefront_core::types::CustomerProfile;
//!
//! let mut db = CustomerDB::new();
//! for id in [500, 300, 700] {
//!     db.add_customer(id, CustomerProfile::default());
//! }
//!
//! db.promote_hot_customer(300).unwrap();
//! assert_eq!(db.root_id(), Some(300));
//! assert_eq!(db.right_of(300), Some(500));
//! ```

pub mod node;
pub mod tree;
pub mod recommend;

pub use node::CustomerNode;
pub use tree::CustomerDB;
pub use recommend::rank_second_order;
