//! Shopping cart with a bounded undo stack.
//!
//! ## Contract
//!
//! [`ShoppingCart::push_cart_action`] only *records* an action. The caller
//! applies the forward effect to the items itself; the stack exists to make
//! that already-applied effect reversible. The `add_item` /
//! `change_quantity` / `remove_item` / `add_bundle` helpers do both steps.
//!
//! ## Undo Semantics
//!
//! | Action | Inverse |
//! |--------|---------|
//! | `Add` | remove the product entry |
//! | `QtyChange` | restore `old_qty` |
//! | `BundleAdd` | remove every product in `bundle_products` |
//! | `Remove` | restore `old_qty` |

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::config::UNDO_CAPACITY;
use crate::error::CartError;
use crate::types::{ActionKind, CartAction, ProductId};

/// Cart items plus undo history
#[derive(Debug)]
pub struct ShoppingCart {
    /// Product id to quantity
    items: HashMap<ProductId, u32>,

    /// Recorded actions, oldest at the front
    undo_stack: VecDeque<CartAction>,

    /// Maximum number of recorded actions
    undo_capacity: usize,
}

impl Default for ShoppingCart {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingCart {
    /// Create an empty cart with the default undo capacity
    pub fn new() -> Self {
        Self::with_undo_capacity(UNDO_CAPACITY)
    }

    /// Create an empty cart keeping at most `undo_capacity` actions
    pub fn with_undo_capacity(undo_capacity: usize) -> Self {
        Self {
            items: HashMap::new(),
            undo_stack: VecDeque::with_capacity(undo_capacity + 1),
            undo_capacity,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current items
    #[inline]
    pub fn items(&self) -> &HashMap<ProductId, u32> {
        &self.items
    }

    /// Quantity of a product, if present
    #[inline]
    pub fn quantity(&self, product: &str) -> Option<u32> {
        self.items.get(product).copied()
    }

    /// Number of recorded actions
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Recorded actions, oldest first
    pub fn history(&self) -> impl Iterator<Item = &CartAction> {
        self.undo_stack.iter()
    }

    // ========================================================================
    // Undo Stack
    // ========================================================================

    /// Record an action; evicts the oldest one past capacity.
    ///
    /// Does not touch the items.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::cart::ShoppingCart;
    /// use storefront_core::types::CartAction;
    ///
    /// let mut cart = ShoppingCart::new();
    /// cart.push_cart_action(CartAction::Add { product: "Mug".into() });
    ///
    /// assert_eq!(cart.undo_depth(), 1);
    /// assert!(cart.items().is_empty());
    /// ```
    pub fn push_cart_action(&mut self, action: CartAction) {
        debug!(kind = ?action.kind(), product = action.product(), "cart action recorded");
        self.undo_stack.push_back(action);
        if self.undo_stack.len() > self.undo_capacity {
            if let Some(evicted) = self.undo_stack.pop_front() {
                debug!(kind = ?evicted.kind(), product = evicted.product(), "oldest cart action evicted");
            }
        }
    }

    /// Pop the most recent action and apply its inverse to the items.
    ///
    /// # Errors
    ///
    /// [`CartError::StackEmpty`] if nothing is recorded
    pub fn undo_last_action(&mut self) -> Result<ActionKind, CartError> {
        let action = self.undo_stack.pop_back().ok_or(CartError::StackEmpty)?;
        let kind = action.kind();

        match action {
            CartAction::Add { product } => {
                self.items.remove(&product);
            }
            CartAction::QtyChange { product, old_qty } | CartAction::Remove { product, old_qty } => {
                self.items.insert(product, old_qty);
            }
            CartAction::BundleAdd { bundle_products, .. } => {
                for product in &bundle_products {
                    self.items.remove(product);
                }
            }
        }

        debug!(?kind, remaining = self.undo_stack.len(), "cart action undone");
        Ok(kind)
    }

    // ========================================================================
    // Apply-and-record Helpers
    // ========================================================================

    /// Add `qty` of a product.
    ///
    /// A new product is recorded as `Add`; topping up an existing one is
    /// recorded as `QtyChange` so undo restores the earlier quantity.
    pub fn add_item(&mut self, product: impl Into<ProductId>, qty: u32) {
        let product = product.into();
        let action = match self.items.get(&product).copied() {
            Some(old_qty) => {
                self.items.insert(product.clone(), old_qty.saturating_add(qty));
                CartAction::QtyChange { product, old_qty }
            }
            None => {
                self.items.insert(product.clone(), qty);
                CartAction::Add { product }
            }
        };
        self.push_cart_action(action);
    }

    /// Overwrite the quantity of a product already in the cart
    pub fn change_quantity(&mut self, product: &str, new_qty: u32) -> Result<(), CartError> {
        let slot = self
            .items
            .get_mut(product)
            .ok_or_else(|| CartError::ItemNotInCart(product.to_string()))?;
        let old_qty = std::mem::replace(slot, new_qty);

        self.push_cart_action(CartAction::QtyChange {
            product: product.to_string(),
            old_qty,
        });
        Ok(())
    }

    /// Remove a product, returning the quantity it had
    pub fn remove_item(&mut self, product: &str) -> Result<u32, CartError> {
        let old_qty = self
            .items
            .remove(product)
            .ok_or_else(|| CartError::ItemNotInCart(product.to_string()))?;

        self.push_cart_action(CartAction::Remove {
            product: product.to_string(),
            old_qty,
        });
        Ok(old_qty)
    }

    /// Add a bundle anchored on `anchor`: each listed product not yet in the
    /// cart is added with quantity 1.
    ///
    /// Only the newly added products are recorded, so undo never removes
    /// something the bundle did not add.
    ///
    /// # Returns
    ///
    /// Number of products added
    pub fn add_bundle(&mut self, anchor: impl Into<ProductId>, products: &[ProductId]) -> usize {
        let mut added: Vec<ProductId> = Vec::with_capacity(products.len());
        for product in products {
            if !self.items.contains_key(product) {
                self.items.insert(product.clone(), 1);
                added.push(product.clone());
            }
        }

        let count = added.len();
        if count > 0 {
            self.push_cart_action(CartAction::BundleAdd {
                product: anchor.into(),
                bundle_products: added,
            });
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(product: &str) -> CartAction {
        CartAction::Add { product: product.into() }
    }

    #[test]
    fn test_push_does_not_mutate_items() {
        let mut cart = ShoppingCart::new();
        cart.push_cart_action(add("Mug"));

        assert_eq!(cart.undo_depth(), 1);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let mut cart = ShoppingCart::new();
        for i in 0..6 {
            cart.push_cart_action(add(&format!("P{i}")));
        }

        assert_eq!(cart.undo_depth(), 5);
        let first = cart.history().next().unwrap();
        assert_eq!(first.product(), "P1");
    }

    #[test]
    fn test_undo_empty() {
        let mut cart = ShoppingCart::new();
        assert_eq!(cart.undo_last_action(), Err(CartError::StackEmpty));
    }

    #[test]
    fn test_undo_is_lifo() {
        let mut cart = ShoppingCart::new();
        cart.push_cart_action(add("A"));
        cart.push_cart_action(CartAction::QtyChange { product: "B".into(), old_qty: 2 });

        assert_eq!(cart.undo_last_action(), Ok(ActionKind::QtyChange));
        assert_eq!(cart.undo_last_action(), Ok(ActionKind::Add));
        assert_eq!(cart.undo_last_action(), Err(CartError::StackEmpty));
    }

    #[test]
    fn test_undo_record_only_push_inverts_unapplied_effect() {
        // Recording without applying: undo still applies the inverse.
        let mut cart = ShoppingCart::new();
        cart.push_cart_action(CartAction::QtyChange { product: "Mug".into(), old_qty: 3 });

        cart.undo_last_action().unwrap();
        assert_eq!(cart.quantity("Mug"), Some(3));
    }

    #[test]
    fn test_add_item_and_undo() {
        let mut cart = ShoppingCart::new();
        cart.add_item("Mug", 2);
        assert_eq!(cart.quantity("Mug"), Some(2));

        assert_eq!(cart.undo_last_action(), Ok(ActionKind::Add));
        assert_eq!(cart.quantity("Mug"), None);
    }

    #[test]
    fn test_add_item_existing_restores_quantity() {
        let mut cart = ShoppingCart::new();
        cart.add_item("Mug", 2);
        cart.add_item("Mug", 3);
        assert_eq!(cart.quantity("Mug"), Some(5));

        assert_eq!(cart.undo_last_action(), Ok(ActionKind::QtyChange));
        assert_eq!(cart.quantity("Mug"), Some(2));
    }

    #[test]
    fn test_change_quantity() {
        let mut cart = ShoppingCart::new();
        cart.add_item("Mug", 1);
        cart.change_quantity("Mug", 4).unwrap();
        assert_eq!(cart.quantity("Mug"), Some(4));

        cart.undo_last_action().unwrap();
        assert_eq!(cart.quantity("Mug"), Some(1));

        assert_eq!(
            cart.change_quantity("Tea", 1),
            Err(CartError::ItemNotInCart("Tea".into()))
        );
    }

    #[test]
    fn test_remove_item() {
        let mut cart = ShoppingCart::new();
        cart.add_item("Mug", 3);

        assert_eq!(cart.remove_item("Mug"), Ok(3));
        assert_eq!(cart.quantity("Mug"), None);

        assert_eq!(cart.undo_last_action(), Ok(ActionKind::Remove));
        assert_eq!(cart.quantity("Mug"), Some(3));

        assert!(cart.remove_item("Tea").is_err());
    }

    #[test]
    fn test_add_bundle_and_undo() {
        let mut cart = ShoppingCart::new();
        cart.add_item("Brush", 2);

        let bundle: Vec<ProductId> = vec!["Brush".into(), "Paint".into(), "Canvas".into()];
        assert_eq!(cart.add_bundle("Art-Kit", &bundle), 2);
        assert_eq!(cart.quantity("Paint"), Some(1));

        assert_eq!(cart.undo_last_action(), Ok(ActionKind::BundleAdd));
        assert_eq!(cart.quantity("Paint"), None);
        assert_eq!(cart.quantity("Canvas"), None);
        assert_eq!(cart.quantity("Brush"), Some(2));
    }

    #[test]
    fn test_add_bundle_nothing_new_records_nothing() {
        let mut cart = ShoppingCart::new();
        cart.add_item("Brush", 1);

        assert_eq!(cart.add_bundle("Kit", &["Brush".to_string()]), 0);
        assert_eq!(cart.undo_depth(), 1);
    }

    #[test]
    fn test_custom_undo_capacity() {
        let mut cart = ShoppingCart::with_undo_capacity(2);
        cart.add_item("A", 1);
        cart.add_item("B", 1);
        cart.add_item("C", 1);

        assert_eq!(cart.undo_depth(), 2);
        cart.undo_last_action().unwrap();
        cart.undo_last_action().unwrap();
        assert!(cart.undo_last_action().is_err());
        // "A" fell off the stack and can no longer be undone
        assert_eq!(cart.quantity("A"), Some(1));
    }
}
