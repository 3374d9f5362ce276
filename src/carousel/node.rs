//! Product node for slab-based storage.
//!
//! `ProductNode` carries the product identifier and its featured flag plus
//! the doubly-linked list pointers. The pointers are slab keys (`usize`),
//! not references; the carousel owns every node through its slab.

use crate::types::ProductId;

/// Product node stored in the carousel slab.
#[derive(Debug, Clone)]
pub struct ProductNode {
    /// Product identifier (unique within the carousel)
    pub id: ProductId,

    /// Inside the featured window
    pub featured: bool,

    /// Next product towards the tail (slab key)
    /// None if this is the tail
    pub next: Option<usize>,

    /// Previous product towards the head (slab key)
    /// None if this is the head
    pub prev: Option<usize>,
}

impl ProductNode {
    /// Create a new product node (not yet linked)
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_core::carousel::ProductNode;
    ///
    /// let node = ProductNode::new("A-Shirt", false);
    ///
    /// assert!(node.next.is_none());
    /// assert!(node.prev.is_none());
    /// ```
    #[inline]
    pub fn new(id: impl Into<ProductId>, featured: bool) -> Self {
        Self {
            id: id.into(),
            featured,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (no neighbours)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    /// Clear both links
    #[inline]
    pub fn unlink(&mut self) {
        self.next = None;
        self.prev = None;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
