//! Customer profile payload.
//!
//! The profile is a closed record rather than an untyped blob. The minimal
//! schema accepted from callers is:
//!
//! ```json
//! { "name": "Ada", "freq": 4, "rec_graph": { "A-Shirt": { "B-Pants": 3 } } }
//! ```
//!
//! Every field is optional on input.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Co-purchase graph: product -> (co-purchased product -> count).
///
/// Insertion order is preserved, which makes recommendation tie-breaks
/// deterministic.
pub type RecommendationGraph = IndexMap<ProductId, IndexMap<ProductId, u32>>;

/// Profile attached to a customer node.
///
/// ## Example
///
/// ```
/// use storefront_core::types::CustomerProfile;
///
/// let profile: CustomerProfile = serde_json::from_str(
///     r#"{"freq": 2, "rec_graph": {"A-Shirt": {"B-Pants": 3}}}"#,
/// ).unwrap();
///
/// assert_eq!(profile.freq, 2);
/// assert_eq!(profile.rec_graph["A-Shirt"]["B-Pants"], 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Purchase frequency counter
    #[serde(default)]
    pub freq: u32,

    /// Co-purchase graph used for recommendations
    #[serde(default)]
    pub rec_graph: RecommendationGraph,
}

impl CustomerProfile {
    /// Create a named profile with no purchase history
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Record one co-purchase of `product` together with `other`
    pub fn add_co_purchase(&mut self, product: &str, other: &str) {
        self.add_co_purchases(product, other, 1);
    }

    /// Add `count` co-purchases of `product` with `other`, returning the
    /// new total
    pub fn add_co_purchases(&mut self, product: &str, other: &str, count: u32) -> u32 {
        let weight = self
            .rec_graph
            .entry(product.to_string())
            .or_default()
            .entry(other.to_string())
            .or_insert(0);
        *weight = weight.saturating_add(count);
        *weight
    }
}
