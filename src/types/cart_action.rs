//! Reversible cart mutations recorded on the undo stack.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Kind of a recorded cart action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// A product entry was added
    Add,
    /// A quantity was overwritten
    QtyChange,
    /// Several products were added together
    BundleAdd,
    /// A product entry was removed
    Remove,
}

/// A cart mutation, with the payload needed to reverse it.
///
/// Serialises as a tagged record:
///
/// ```
/// use storefront_core::types::CartAction;
///
/// let action = CartAction::QtyChange { product: "Mug".into(), old_qty: 2 };
/// let json = serde_json::to_string(&action).unwrap();
/// assert_eq!(json, r#"{"kind":"QTY_CHANGE","product":"Mug","old_qty":2}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartAction {
    /// `product` was added; undo removes the entry
    Add { product: ProductId },

    /// Quantity of `product` changed; undo restores `old_qty`
    QtyChange { product: ProductId, old_qty: u32 },

    /// A bundle anchored on `product` was added; undo removes every
    /// entry in `bundle_products`
    BundleAdd {
        product: ProductId,
        bundle_products: Vec<ProductId>,
    },

    /// `product` was removed; undo restores `old_qty`
    Remove { product: ProductId, old_qty: u32 },
}

impl CartAction {
    /// Get the action kind
    pub fn kind(&self) -> ActionKind {
        match self {
            CartAction::Add { .. } => ActionKind::Add,
            CartAction::QtyChange { .. } => ActionKind::QtyChange,
            CartAction::BundleAdd { .. } => ActionKind::BundleAdd,
            CartAction::Remove { .. } => ActionKind::Remove,
        }
    }

    /// Get the affected product identifier
    pub fn product(&self) -> &str {
        match self {
            CartAction::Add { product }
            | CartAction::QtyChange { product, .. }
            | CartAction::BundleAdd { product, .. }
            | CartAction::Remove { product, .. } => product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind() {
        assert_eq!(CartAction::Add { product: "a".into() }.kind(), ActionKind::Add);
        assert_eq!(
            CartAction::BundleAdd { product: "a".into(), bundle_products: vec![] }.kind(),
            ActionKind::BundleAdd
        );
        assert_eq!(
            CartAction::Remove { product: "a".into(), old_qty: 1 }.kind(),
            ActionKind::Remove
        );
    }

    #[test]
    fn test_action_product() {
        let action = CartAction::BundleAdd {
            product: "Kit".into(),
            bundle_products: vec!["Brush".into(), "Paint".into()],
        };
        assert_eq!(action.product(), "Kit");
    }

    #[test]
    fn test_action_from_tagged_json() {
        let action: CartAction = serde_json::from_str(
            r#"{"kind":"BUNDLE_ADD","product":"Kit","bundle_products":["Brush","Paint"]}"#,
        )
        .unwrap();

        assert_eq!(
            action,
            CartAction::BundleAdd {
                product: "Kit".into(),
                bundle_products: vec!["Brush".into(), "Paint".into()],
            }
        );
    }

    #[test]
    fn test_action_kind_serialization() {
        let json = serde_json::to_string(&ActionKind::QtyChange).unwrap();
        assert_eq!(json, r#""QTY_CHANGE""#);
    }
}
