//! Product carousel implementation.
//!
//! ## Memory Model
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - `Slab::with_capacity(n)` pre-allocates n slots
//! - Keys are reused after removal
//! - O(1) insert, remove, and lookup
//!
//! ## Cycle Tolerance
//!
//! Links can be forced into a cycle (see [`ProductCarousel::link_after`]).
//! Traversals therefore never trust `next == None` to terminate: each one
//! carries an explicit step limit derived from the index size, and a link
//! to a key missing from the slab is treated as the end of the list.
//!
//! A forced link also leaves the carousel "suspect" until the next
//! [`ProductCarousel::validate`]. While suspect, removal clears every link
//! still aimed at the freed slab key, so a reused key can never be reached
//! through a stale pointer.

use std::collections::{HashMap, HashSet};

use slab::Slab;
use tracing::{debug, info, warn};

use crate::carousel::ProductNode;
use crate::config::MAX_FEATURED;
use crate::types::{ProductId, RepairDetails, ValidationReport};

/// Ordered, mutable product display list.
#[derive(Debug)]
pub struct ProductCarousel {
    /// Node storage
    /// Key: slab index, Value: ProductNode
    nodes: Slab<ProductNode>,

    /// Product id to slab key mapping (for O(1) removal and moves)
    index: HashMap<ProductId, usize>,

    /// First product (slab key)
    head: Option<usize>,

    /// Last product (slab key)
    tail: Option<usize>,

    /// Size of the featured window
    max_featured: usize,

    /// A forced link was made since the last validation
    suspect: bool,
}

impl Default for ProductCarousel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCarousel {
    /// Create an empty carousel with the default featured window
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a carousel with pre-allocated capacity
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::carousel::ProductCarousel;
    ///
    /// let carousel = ProductCarousel::with_capacity(1_000);
    /// assert!(carousel.capacity() >= 1_000);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_window(MAX_FEATURED, capacity)
    }

    /// Create a carousel with a custom featured window size
    pub fn with_window(max_featured: usize, capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
            max_featured,
            suspect: false,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Get the current capacity (pre-allocated slots)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Number of indexed products
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the carousel is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Size of the featured window
    #[inline]
    pub fn max_featured(&self) -> usize {
        self.max_featured
    }

    /// Check if a product is indexed
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Id of the head product
    pub fn head_id(&self) -> Option<&str> {
        self.head.and_then(|key| self.id_at(key))
    }

    /// Id of the tail product
    pub fn tail_id(&self) -> Option<&str> {
        self.tail.and_then(|key| self.id_at(key))
    }

    /// Id of the product linked after `id`
    pub fn next_id(&self, id: &str) -> Option<&str> {
        let key = *self.index.get(id)?;
        self.next_of(key).and_then(|next| self.id_at(next))
    }

    /// Id of the product linked before `id`
    pub fn prev_id(&self, id: &str) -> Option<&str> {
        let key = *self.index.get(id)?;
        let prev = self.nodes.get(key)?.prev?;
        self.id_at(prev)
    }

    /// Featured flag of a product, or None if it is not indexed
    pub fn is_featured(&self, id: &str) -> Option<bool> {
        let key = *self.index.get(id)?;
        self.nodes.get(key).map(|node| node.featured)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a product at the head.
    ///
    /// The `featured` argument only seeds the node; the featured window is
    /// re-derived right after linking, so position decides the final flag.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if `id` is already indexed
    pub fn add_to_front(&mut self, id: impl Into<ProductId>, featured: bool) -> bool {
        let id = id.into();
        if self.index.contains_key(&id) {
            debug!(product = %id, "add_to_front rejected: already indexed");
            return false;
        }

        let key = self.nodes.insert(ProductNode::new(id.clone(), featured));
        self.push_front(key);
        debug!(product = %id, key, "product added at front");
        self.index.insert(id, key);
        self.refresh_featured();
        true
    }

    /// Insert a product at the tail.
    ///
    /// # Returns
    ///
    /// `false` (and no mutation) if `id` is already indexed
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::carousel::ProductCarousel;
    ///
    /// let mut carousel = ProductCarousel::new();
    /// assert!(carousel.add_to_end("A", false));
    /// assert!(!carousel.add_to_end("A", false));
    /// assert_eq!(carousel.len(), 1);
    /// ```
    pub fn add_to_end(&mut self, id: impl Into<ProductId>, featured: bool) -> bool {
        let id = id.into();
        if self.index.contains_key(&id) {
            debug!(product = %id, "add_to_end rejected: already indexed");
            return false;
        }

        let key = self.nodes.insert(ProductNode::new(id.clone(), featured));
        self.push_back(key);
        debug!(product = %id, key, "product added at end");
        self.index.insert(id, key);
        self.refresh_featured();
        true
    }

    /// Remove a product by id.
    ///
    /// # Returns
    ///
    /// `false` if `id` is not indexed
    pub fn remove_product(&mut self, id: &str) -> bool {
        let Some(key) = self.index.remove(id) else {
            return false;
        };

        self.unlink(key);
        self.nodes.remove(key);
        if self.suspect {
            self.clear_links_to(key);
        }
        debug!(product = %id, key, "product removed");
        self.refresh_featured();
        true
    }

    /// Move a product to the head.
    ///
    /// # Returns
    ///
    /// `false` if `id` is not indexed or is already the head
    pub fn move_to_front(&mut self, id: &str) -> bool {
        let Some(&key) = self.index.get(id) else {
            return false;
        };
        if self.head == Some(key) {
            return false;
        }

        self.unlink(key);
        self.push_front(key);
        debug!(product = %id, key, "product moved to front");
        self.refresh_featured();
        true
    }

    /// Force `from.next = to` without touching the index or `to.prev`.
    ///
    /// Exists to inject corruption for validation tests and diagnostics.
    #[doc(hidden)]
    pub fn link_after(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_key), Some(&to_key)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        self.nodes[from_key].next = Some(to_key);
        self.suspect = true;
        warn!(from, to, "forced carousel link");
        true
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Product ids from head to tail.
    ///
    /// Capped at `2 * len + 2` steps so a cyclic list still terminates.
    pub fn display(&self) -> Vec<ProductId> {
        let limit = 2 * self.index.len() + 2;
        let mut out = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(key) = cursor {
            if out.len() >= limit {
                warn!(limit, "display hit its step limit");
                break;
            }
            let Some(node) = self.nodes.get(key) else {
                break;
            };
            out.push(node.id.clone());
            cursor = node.next;
        }
        out
    }

    /// Featured product ids, head first, at most `max_featured` of them
    pub fn featured(&self) -> Vec<ProductId> {
        let limit = 2 * self.index.len() + 2;
        let mut out = Vec::with_capacity(self.max_featured);
        let mut cursor = self.head;
        let mut steps = 0;
        while let Some(key) = cursor {
            if steps >= limit || out.len() >= self.max_featured {
                break;
            }
            let Some(node) = self.nodes.get(key) else {
                break;
            };
            if node.featured {
                out.push(node.id.clone());
            }
            cursor = node.next;
            steps += 1;
        }
        out
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Detect and repair a forward-link cycle.
    ///
    /// Detection is tortoise-and-hare from head. On a meeting the list is
    /// re-walked from head, recording visited nodes, for at most
    /// `2 * len + 5` steps. When the walk stands on a node whose `next` was
    /// already visited, the node it came from becomes the new tail and its
    /// forward link is cut. Back-links are then rewritten from head, and
    /// products no longer reachable are dropped from the index.
    ///
    /// An acyclic carousel that saw a forced link is normalised the same
    /// way (back-links, tail, unreachable products) and reported as
    /// [`ValidationStatus::LinksRepaired`](crate::types::ValidationStatus)
    /// if that changed anything.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::carousel::ProductCarousel;
    /// use storefront_core::types::ValidationStatus;
    ///
    /// let mut carousel = ProductCarousel::new();
    /// for id in ["A", "B", "C", "D"] {
    ///     carousel.add_to_end(id, false);
    /// }
    /// carousel.link_after("D", "C");
    ///
    /// let report = carousel.validate();
    /// assert_eq!(report.status, ValidationStatus::CycleRepaired);
    /// assert_eq!(carousel.display(), vec!["A", "B", "C"]);
    /// ```
    pub fn validate(&mut self) -> ValidationReport {
        let Some(head) = self.head else {
            if !std::mem::take(&mut self.suspect) || self.index.is_empty() {
                return ValidationReport::empty();
            }
            // Head was removed with only forced links leading on
            return self.normalize();
        };

        if !self.has_cycle(head) {
            if !std::mem::take(&mut self.suspect) {
                debug!(len = self.len(), "carousel validated: no cycle");
                return ValidationReport::no_cycle();
            }
            return self.normalize();
        }

        warn!(len = self.len(), "cycle detected in carousel");
        match self.repair(head) {
            Some(details) => {
                self.suspect = false;
                info!(
                    new_tail = ?details.new_tail,
                    dropped = details.dropped.len(),
                    "carousel cycle repaired"
                );
                ValidationReport::repaired(details)
            }
            None => {
                warn!("repair walk exhausted its step limit");
                ValidationReport::unrepaired()
            }
        }
    }

    /// Rebuild back-links and tail of an acyclic but suspect carousel
    fn normalize(&mut self) -> ValidationReport {
        let old_tail = self.tail;
        let (dropped, steps) = self.drop_unreachable();

        if dropped.is_empty() && old_tail == self.tail {
            debug!(len = self.len(), "carousel validated: no cycle");
            return ValidationReport::no_cycle();
        }

        let details = RepairDetails {
            new_tail: self.tail_id().map(str::to_string),
            revisited: None,
            dropped,
            steps,
        };
        self.refresh_featured();
        info!(
            new_tail = ?details.new_tail,
            dropped = details.dropped.len(),
            "carousel links normalised"
        );
        ValidationReport::links_repaired(details)
    }

    /// Tortoise-and-hare: slow advances one link, fast two
    fn has_cycle(&self, head: usize) -> bool {
        let mut slow = Some(head);
        let mut fast = Some(head);

        while let Some(f) = fast {
            let Some(f1) = self.next_of(f) else {
                return false;
            };
            fast = self.next_of(f1);
            slow = slow.and_then(|s| self.next_of(s));
            if fast.is_some() && fast == slow {
                return true;
            }
        }
        false
    }

    fn repair(&mut self, head: usize) -> Option<RepairDetails> {
        let limit = 2 * self.index.len() + 5;
        let mut visited = HashSet::with_capacity(self.index.len());
        let mut prev: Option<usize> = None;
        let mut cursor = Some(head);
        let mut steps = 0;
        let mut cut = None;

        while let Some(current) = cursor {
            if steps >= limit {
                break;
            }
            steps += 1;

            let next = self.next_of(current);
            if let Some(next_key) = next {
                if visited.contains(&next_key) {
                    cut = Some((prev.unwrap_or(current), next_key));
                    break;
                }
            }
            visited.insert(current);
            prev = Some(current);
            cursor = next;
        }

        let (new_tail, revisited) = cut?;
        self.nodes[new_tail].next = None;

        // Name the revisited node before anything unreachable is freed
        let revisited = self.id_at(revisited).map(str::to_string);
        let (dropped, _) = self.drop_unreachable();

        let details = RepairDetails {
            new_tail: self.id_at(new_tail).map(str::to_string),
            revisited,
            dropped,
            steps,
        };
        self.refresh_featured();
        Some(details)
    }

    /// Relink from head, then free every indexed product the walk missed.
    ///
    /// Returns the dropped ids (sorted) and the number of nodes reached.
    fn drop_unreachable(&mut self) -> (Vec<ProductId>, usize) {
        let reachable = self.relink_back_pointers();
        let mut dropped: Vec<ProductId> = self
            .index
            .iter()
            .filter(|(_, key)| !reachable.contains(key))
            .map(|(id, _)| id.clone())
            .collect();
        dropped.sort();
        for id in &dropped {
            if let Some(key) = self.index.remove(id) {
                self.nodes.remove(key);
                self.clear_links_to(key);
            }
        }
        (dropped, reachable.len())
    }

    /// Rewrite every `prev` along the (now acyclic) chain from head and
    /// make the last node reached the tail.
    ///
    /// Returns the set of keys reached.
    fn relink_back_pointers(&mut self) -> HashSet<usize> {
        let limit = self.nodes.len();
        let mut reached = HashSet::with_capacity(limit);
        let mut previous: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(key) = cursor {
            if reached.len() >= limit || !reached.insert(key) {
                break;
            }
            let Some(node) = self.nodes.get_mut(key) else {
                break;
            };
            node.prev = previous;
            previous = Some(key);
            cursor = node.next;
        }

        // A link to a freed key or back into the chain ends it here
        if let Some(last) = previous {
            self.nodes[last].next = None;
        }
        self.tail = previous;
        reached
    }

    /// Clear every `next` / `prev` that still holds a freed slab key
    fn clear_links_to(&mut self, freed: usize) {
        for (_, node) in self.nodes.iter_mut() {
            if node.next == Some(freed) {
                node.next = None;
            }
            if node.prev == Some(freed) {
                node.prev = None;
            }
        }
    }

    // ========================================================================
    // Linking Helpers
    // ========================================================================

    #[inline]
    fn next_of(&self, key: usize) -> Option<usize> {
        self.nodes.get(key).and_then(|node| node.next)
    }

    #[inline]
    fn id_at(&self, key: usize) -> Option<&str> {
        self.nodes.get(key).map(|node| node.id.as_str())
    }

    fn push_front(&mut self, key: usize) {
        debug_assert!(self.nodes[key].is_unlinked());
        let node = &mut self.nodes[key];
        node.prev = None;
        node.next = self.head;

        if let Some(head_key) = self.head {
            if let Some(head_node) = self.nodes.get_mut(head_key) {
                head_node.prev = Some(key);
            }
        } else {
            // Empty list - this is also the tail
            self.tail = Some(key);
        }
        self.head = Some(key);
    }

    fn push_back(&mut self, key: usize) {
        debug_assert!(self.nodes[key].is_unlinked());
        let node = &mut self.nodes[key];
        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            if let Some(tail_node) = self.nodes.get_mut(tail_key) {
                tail_node.next = Some(key);
            }
        } else {
            // Empty list - this is also the head
            self.head = Some(key);
        }
        self.tail = Some(key);
    }

    fn unlink(&mut self, key: usize) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        // A self-loop is no neighbour
        let prev_key = node.prev.filter(|&prev| prev != key);
        let next_key = node.next.filter(|&next| next != key);

        if let Some(prev_node) = prev_key.and_then(|prev| self.nodes.get_mut(prev)) {
            prev_node.next = next_key;
        }
        if let Some(next_node) = next_key.and_then(|next| self.nodes.get_mut(next)) {
            next_node.prev = prev_key;
        }

        // Ends are checked by key: a forced link can give the head a `prev`
        // or the tail a `next`
        if self.head == Some(key) {
            self.head = next_key;
        }
        if self.tail == Some(key) {
            self.tail = prev_key;
        }

        self.nodes[key].unlink();
    }

    /// Flag the first `max_featured` nodes from head, clear the rest.
    ///
    /// Bounded by the number of nodes in the slab.
    fn refresh_featured(&mut self) {
        let limit = self.nodes.len();
        let mut cursor = self.head;
        let mut position = 0;

        while let Some(key) = cursor {
            if position >= limit {
                break;
            }
            let Some(node) = self.nodes.get_mut(key) else {
                break;
            };
            node.featured = position < self.max_featured;
            cursor = node.next;
            position += 1;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
