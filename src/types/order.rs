//! Orders waiting in the order processor.

use serde::{Deserialize, Serialize};

/// An order queued for processing.
///
/// ## Example
///
/// ```
/// use storefront_core::types::Order;
///
/// let order = Order::new("O4", true);
/// assert!(order.vip);
/// assert_eq!(order.id, "O4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: String,

    /// Privileged order, eligible for VIP insertion
    #[serde(default)]
    pub vip: bool,
}

impl Order {
    /// Create an order
    pub fn new(id: impl Into<String>, vip: bool) -> Self {
        Self { id: id.into(), vip }
    }
}
