//! Core value types for the storefront engine.
//!
//! Nothing in here owns structure: these are the payloads carried by the
//! carousel, directory and cart nodes, plus the result records handed back
//! to callers.
//!
//! ## Types
//!
//! - [`CustomerProfile`]: profile payload with `freq` and `rec_graph`
//! - [`CartAction`] / [`ActionKind`]: reversible cart mutations
//! - [`Order`]: an order waiting in the [`OrderProcessor`](crate::cart::OrderProcessor)
//! - [`ValidationReport`], [`Rotation`], [`Recommendation`], [`EnqueueOutcome`]:
//!   structured results of the public operations
//!
//! All result records derive `serde::Serialize` so an outer HTTP layer can
//! JSON-encode them unchanged.

mod customer;
mod cart_action;
mod order;
mod report;

/// Product identifier (unique string key in the carousel and cart)
pub type ProductId = String;

/// Customer identifier (BST key)
pub type CustomerId = i64;

pub use customer::{CustomerProfile, RecommendationGraph};
pub use cart_action::{ActionKind, CartAction};
pub use order::Order;
pub use report::{
    EnqueueOutcome, Placement, Recommendation, RepairDetails, Rotation, RotationDirection,
    ValidationReport, ValidationStatus,
};
