//! Customer node for slab-based storage.

use crate::types::{CustomerId, CustomerProfile};

/// Customer node stored in the directory slab.
///
/// Links are slab keys. `parent` is None only for the root.
#[derive(Debug, Clone)]
pub struct CustomerNode {
    /// BST key
    pub id: CustomerId,

    /// Profile payload (carries `freq` and `rec_graph`)
    pub profile: CustomerProfile,

    /// Left child (slab key)
    pub left: Option<usize>,

    /// Right child (slab key)
    pub right: Option<usize>,

    /// Parent (slab key, non-owning)
    pub parent: Option<usize>,
}

impl CustomerNode {
    /// Create a detached node
    #[inline]
    pub fn new(id: CustomerId, profile: CustomerProfile) -> Self {
        Self {
            id,
            profile,
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Purchase frequency counter
    #[inline]
    pub fn freq(&self) -> u32 {
        self.profile.freq
    }
}
