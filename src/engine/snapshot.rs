//! Deterministic state root over all components.
//!
//! The root is a SHA-256 hash of a canonical dump:
//!
//! ```text
//! carousel:  id, featured flag    (head to tail)
//! customers: id, freq             (in key order)
//! cart:      product, quantity    (sorted by product)
//! undo:      action kind, product (oldest first)
//! orders:    id, vip flag         (head to tail)
//! ```
//!
//! Two engines that went through the same operation sequence produce the
//! same root, whatever their slab key layout or hash map iteration order.

use sha2::{Digest, Sha256};

use crate::engine::Storefront;

impl Storefront {
    /// Compute the state root
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        hasher.update(b"carousel");
        for id in self.carousel.display() {
            hasher.update(id.as_bytes());
            hasher.update([self.carousel.is_featured(&id).unwrap_or(false) as u8]);
        }

        hasher.update(b"customers");
        for id in self.customers.in_order() {
            hasher.update(id.to_le_bytes());
            let freq = self.customers.find_customer(id).map(|n| n.freq()).unwrap_or(0);
            hasher.update(freq.to_le_bytes());
        }

        hasher.update(b"cart");
        let mut items: Vec<(&String, &u32)> = self.cart.items().iter().collect();
        items.sort();
        for (product, qty) in items {
            hasher.update(product.as_bytes());
            hasher.update(qty.to_le_bytes());
        }

        hasher.update(b"undo");
        for action in self.cart.history() {
            hasher.update([action.kind() as u8]);
            hasher.update(action.product().as_bytes());
        }

        hasher.update(b"orders");
        for order in self.orders.iter() {
            hasher.update(order.id.as_bytes());
            hasher.update([order.vip as u8]);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}
