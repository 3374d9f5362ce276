//! Cart and order queue.
//!
//! - [`ShoppingCart`]: item quantities plus a bounded undo stack of
//!   [`CartAction`](crate::types::CartAction)s (oldest entry evicted on
//!   overflow)
//! - [`OrderProcessor`]: FIFO order queue where a VIP order is slotted in
//!   one position ahead of the current tail
//!
//! Both are `VecDeque`-backed: O(1) amortized for every operation.

pub mod shopping;
pub mod queue;

pub use shopping::ShoppingCart;
pub use queue::OrderProcessor;
