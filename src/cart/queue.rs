//! VIP-aware FIFO order queue.
//!
//! ## VIP Insertion
//!
//! ```text
//! before:  O1 <- O2 <- O3          (O3 is the tail)
//! VIP O4:  O1 <- O2 <- O4 <- O3
//! ```
//!
//! The current tail is popped, the VIP order appended, and the popped order
//! re-appended. This is a constant-time local bump, not a priority queue:
//! two VIP orders in a row leave the second one *behind* the first.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::QueueError;
use crate::types::{EnqueueOutcome, Order, Placement};

/// Order queue
#[derive(Debug, Default)]
pub struct OrderProcessor {
    orders: VecDeque<Order>,
}

impl OrderProcessor {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued orders
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Order ids from head to tail
    pub fn snapshot(&self) -> Vec<String> {
        self.orders.iter().map(|order| order.id.clone()).collect()
    }

    /// Queued orders from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Next order to be processed, without removing it
    pub fn peek_next(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Queue an order.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::cart::OrderProcessor;
    /// use storefront_core::types::Placement;
    ///
    /// let mut queue = OrderProcessor::new();
    /// queue.enqueue_order("O1", false);
    /// queue.enqueue_order("O2", false);
    ///
    /// let outcome = queue.enqueue_order("O3", true);
    /// assert_eq!(outcome.placement, Placement::AheadOfTail);
    /// assert_eq!(outcome.queue, vec!["O1", "O3", "O2"]);
    /// ```
    pub fn enqueue_order(&mut self, id: impl Into<String>, vip: bool) -> EnqueueOutcome {
        let order = Order::new(id, vip);

        let previous_tail = if vip { self.orders.pop_back() } else { None };
        let placement = match previous_tail {
            Some(previous_tail) => {
                debug!(order = %order.id, ahead_of = %previous_tail.id, "VIP order queued");
                self.orders.push_back(order);
                self.orders.push_back(previous_tail);
                Placement::AheadOfTail
            }
            None => {
                debug!(order = %order.id, vip, "order queued");
                self.orders.push_back(order);
                Placement::Tail
            }
        };

        EnqueueOutcome {
            placement,
            queue: self.snapshot(),
        }
    }

    /// Pop the head order.
    ///
    /// # Errors
    ///
    /// [`QueueError::Empty`] if nothing is queued
    pub fn process_next_order(&mut self) -> Result<Order, QueueError> {
        let order = self.orders.pop_front().ok_or(QueueError::Empty)?;
        debug!(order = %order.id, remaining = self.orders.len(), "order processed");
        Ok(order)
    }
}
