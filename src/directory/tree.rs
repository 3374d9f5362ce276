//! Customer directory BST.
//!
//! ## Promotion
//!
//! ```text
//!        g                 g
//!        |                 |
//!        p                 x
//!       / \      =>       / \
//!      x   c             a   p
//!     / \                   / \
//!    a   t                 t   c
//! ```
//!
//! A right rotation around `p` lifts its left child `x` one level; `t`
//! changes parent from `x` to `p`. The left rotation is the mirror image.
//! Four nodes have links rewritten: `x`, `p`, `t` and `g`.

use slab::Slab;
use tracing::{debug, info};

use crate::directory::{rank_second_order, CustomerNode};
use crate::error::DirectoryError;
use crate::types::{
    CustomerId, CustomerProfile, ProductId, Recommendation, Rotation, RotationDirection,
};

/// Binary search tree of customers.
#[derive(Debug, Default)]
pub struct CustomerDB {
    /// Node storage
    nodes: Slab<CustomerNode>,

    /// Root node (slab key)
    root: Option<usize>,
}

impl CustomerDB {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(capacity),
            root: None,
        }
    }

    // ========================================================================
    // Size and Shape
    // ========================================================================

    /// Number of customers
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the directory is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the root customer
    pub fn root_id(&self) -> Option<CustomerId> {
        self.root.map(|key| self.nodes[key].id)
    }

    /// Id of the left child of `id`
    pub fn left_of(&self, id: CustomerId) -> Option<CustomerId> {
        let key = self.locate(id)?;
        self.nodes[key].left.map(|child| self.nodes[child].id)
    }

    /// Id of the right child of `id`
    pub fn right_of(&self, id: CustomerId) -> Option<CustomerId> {
        let key = self.locate(id)?;
        self.nodes[key].right.map(|child| self.nodes[child].id)
    }

    /// Id of the parent of `id`
    pub fn parent_of(&self, id: CustomerId) -> Option<CustomerId> {
        let key = self.locate(id)?;
        self.nodes[key].parent.map(|parent| self.nodes[parent].id)
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|key| (key, 1)).into_iter().collect();

        while let Some((key, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[key];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }
        height
    }

    /// Customer ids in key order
    pub fn in_order(&self) -> Vec<CustomerId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;

        while cursor.is_some() || !stack.is_empty() {
            while let Some(key) = cursor {
                stack.push(key);
                cursor = self.nodes[key].left;
            }
            if let Some(key) = stack.pop() {
                out.push(self.nodes[key].id);
                cursor = self.nodes[key].right;
            }
        }
        out
    }

    /// Check BST ordering and parent-link consistency over the whole tree.
    ///
    /// Every node must satisfy `lo <= id < hi` for the bounds inherited from
    /// its ancestors, every child's `parent` must point back, and every node
    /// in the slab must be reachable from the root.
    pub fn verify(&self) -> bool {
        let Some(root) = self.root else {
            return self.nodes.is_empty();
        };
        if self.nodes[root].parent.is_some() {
            return false;
        }

        let mut reached = 0;
        let mut stack: Vec<(usize, Option<CustomerId>, Option<CustomerId>)> =
            vec![(root, None, None)];

        while let Some((key, lo, hi)) = stack.pop() {
            reached += 1;
            let node = &self.nodes[key];
            if lo.is_some_and(|lo| node.id < lo) || hi.is_some_and(|hi| node.id >= hi) {
                return false;
            }
            for child in [node.left, node.right].into_iter().flatten() {
                if self.nodes[child].parent != Some(key) {
                    return false;
                }
            }
            if let Some(left) = node.left {
                stack.push((left, lo, Some(node.id)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(node.id), hi));
            }
        }
        reached == self.nodes.len()
    }

    // ========================================================================
    // Insert and Lookup
    // ========================================================================

    /// Insert a customer.
    ///
    /// Plain BST descent: left when `id < current`, right otherwise, so a
    /// duplicate id lands in the right subtree of the earlier one.
    ///
    /// # Returns
    ///
    /// The created node
    pub fn add_customer(&mut self, id: CustomerId, profile: CustomerProfile) -> &CustomerNode {
        let key = self.nodes.insert(CustomerNode::new(id, profile));

        let Some(mut current) = self.root else {
            self.root = Some(key);
            debug!(customer = id, "customer inserted as root");
            return &self.nodes[key];
        };

        loop {
            let node = &mut self.nodes[current];
            let slot = if id < node.id {
                &mut node.left
            } else {
                &mut node.right
            };
            match *slot {
                Some(child) => current = child,
                None => {
                    *slot = Some(key);
                    break;
                }
            }
        }

        self.nodes[key].parent = Some(current);
        debug!(customer = id, parent = self.nodes[current].id, "customer inserted");
        &self.nodes[key]
    }

    /// Look up a customer; with duplicate ids the first-inserted one wins
    pub fn find_customer(&self, id: CustomerId) -> Option<&CustomerNode> {
        self.locate(id).map(|key| &self.nodes[key])
    }

    /// Look up a customer for mutation
    pub fn find_customer_mut(&mut self, id: CustomerId) -> Option<&mut CustomerNode> {
        let key = self.locate(id)?;
        self.nodes.get_mut(key)
    }

    fn locate(&self, id: CustomerId) -> Option<usize> {
        let mut cursor = self.root;
        while let Some(key) = cursor {
            let node = &self.nodes[key];
            if id == node.id {
                return Some(key);
            }
            cursor = if id < node.id { node.left } else { node.right };
        }
        None
    }

    // ========================================================================
    // Promotion
    // ========================================================================

    /// Lift a customer one level with a single rotation around its parent.
    ///
    /// Not a splay: reaching the root from depth `d` takes `d` calls.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::CustomerNotFound`] if `id` is absent
    /// - [`DirectoryError::AlreadyRoot`] if `id` is the root; the tree is
    ///   left untouched
    pub fn promote_hot_customer(&mut self, id: CustomerId) -> Result<Rotation, DirectoryError> {
        let key = self.locate(id).ok_or(DirectoryError::CustomerNotFound(id))?;
        let parent = self.nodes[key].parent.ok_or(DirectoryError::AlreadyRoot(id))?;

        let direction = if self.nodes[parent].left == Some(key) {
            self.rotate_right(parent);
            RotationDirection::Right
        } else {
            self.rotate_left(parent);
            RotationDirection::Left
        };

        let rotation = Rotation {
            customer: id,
            direction,
            demoted: self.nodes[parent].id,
            now_root: self.root == Some(key),
        };
        info!(
            customer = id,
            demoted = rotation.demoted,
            ?direction,
            now_root = rotation.now_root,
            "hot customer promoted"
        );
        Ok(rotation)
    }

    /// Rotate right around `parent`, lifting its left child
    fn rotate_right(&mut self, parent: usize) {
        let Some(pivot) = self.nodes[parent].left else {
            return;
        };
        let grandparent = self.nodes[parent].parent;
        let transferred = self.nodes[pivot].right;

        self.nodes[parent].left = transferred;
        if let Some(t) = transferred {
            self.nodes[t].parent = Some(parent);
        }

        self.nodes[pivot].right = Some(parent);
        self.nodes[parent].parent = Some(pivot);

        self.replace_child(grandparent, parent, Some(pivot));
    }

    /// Rotate left around `parent`, lifting its right child
    fn rotate_left(&mut self, parent: usize) {
        let Some(pivot) = self.nodes[parent].right else {
            return;
        };
        let grandparent = self.nodes[parent].parent;
        let transferred = self.nodes[pivot].left;

        self.nodes[parent].right = transferred;
        if let Some(t) = transferred {
            self.nodes[t].parent = Some(parent);
        }

        self.nodes[pivot].left = Some(parent);
        self.nodes[parent].parent = Some(pivot);

        self.replace_child(grandparent, parent, Some(pivot));
    }

    /// Point `parent`'s link that held `old` at `new` (or the root when
    /// `parent` is None) and set `new.parent`
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove a customer and return its profile.
    ///
    /// A node with two children is replaced by its in-order successor,
    /// which is moved (not copied) so every other node keeps its slab key.
    pub fn remove_customer(&mut self, id: CustomerId) -> Result<CustomerProfile, DirectoryError> {
        let key = self.locate(id).ok_or(DirectoryError::CustomerNotFound(id))?;
        let (left, right, parent) = {
            let node = &self.nodes[key];
            (node.left, node.right, node.parent)
        };

        match (left, right) {
            (None, _) => self.replace_child(parent, key, right),
            (_, None) => self.replace_child(parent, key, left),
            (Some(left), Some(right)) => {
                let successor = self.min_from(right);
                if successor != right {
                    let successor_parent = self.nodes[successor].parent;
                    let successor_right = self.nodes[successor].right;
                    self.replace_child(successor_parent, successor, successor_right);

                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                }
                self.replace_child(parent, key, Some(successor));
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
            }
        }

        debug!(customer = id, "customer removed");
        Ok(self.nodes.remove(key).profile)
    }

    fn min_from(&self, mut key: usize) -> usize {
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        key
    }

    // ========================================================================
    // Purchases and Recommendations
    // ========================================================================

    /// Record a purchase: bump `freq` and count every ordered pair of
    /// distinct products in the basket as a co-purchase.
    ///
    /// Every basket product becomes a direct key of the customer's graph,
    /// so a purchase never recommends its own products. Products bought
    /// alongside them by other shoppers arrive through
    /// [`record_co_purchase`](Self::record_co_purchase).
    ///
    /// # Returns
    ///
    /// The updated purchase frequency
    pub fn record_purchase(
        &mut self,
        id: CustomerId,
        basket: &[ProductId],
    ) -> Result<u32, DirectoryError> {
        let node = self
            .find_customer_mut(id)
            .ok_or(DirectoryError::CustomerNotFound(id))?;

        let mut distinct: Vec<&str> = Vec::with_capacity(basket.len());
        for product in basket {
            if !distinct.contains(&product.as_str()) {
                distinct.push(product);
            }
        }

        for product in &distinct {
            for other in &distinct {
                if product != other {
                    node.profile.add_co_purchase(product, other);
                }
            }
        }
        node.profile.freq = node.profile.freq.saturating_add(1);
        debug!(customer = id, items = distinct.len(), freq = node.profile.freq, "purchase recorded");
        Ok(node.profile.freq)
    }

    /// Attach `weight` store-wide co-purchases of `other` to `bought`, a
    /// product in the customer's graph.
    ///
    /// Unlike [`record_purchase`](Self::record_purchase) this does not make
    /// `other` a direct key, so it can surface as a second-order
    /// recommendation.
    ///
    /// # Returns
    ///
    /// The new co-purchase weight of `bought` with `other`
    pub fn record_co_purchase(
        &mut self,
        id: CustomerId,
        bought: &str,
        other: &str,
        weight: u32,
    ) -> Result<u32, DirectoryError> {
        let node = self
            .find_customer_mut(id)
            .ok_or(DirectoryError::CustomerNotFound(id))?;
        let total = node.profile.add_co_purchases(bought, other, weight);
        debug!(customer = id, bought, other, total, "co-purchase recorded");
        Ok(total)
    }

    /// Top `k` second-order recommendations for a customer, with scores
    pub fn score_recommendations(
        &self,
        id: CustomerId,
        k: usize,
    ) -> Result<Vec<Recommendation>, DirectoryError> {
        let node = self
            .find_customer(id)
            .ok_or(DirectoryError::CustomerNotFound(id))?;
        Ok(rank_second_order(&node.profile.rec_graph, k))
    }

    /// Top `k` second-order recommended product ids for a customer
    pub fn recommend_products(
        &self,
        id: CustomerId,
        k: usize,
    ) -> Result<Vec<ProductId>, DirectoryError> {
        Ok(self
            .score_recommendations(id, k)?
            .into_iter()
            .map(|r| r.product)
            .collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn db_of(ids: &[CustomerId]) -> CustomerDB {
        let mut db = CustomerDB::with_capacity(ids.len());
        for &id in ids {
            db.add_customer(id, CustomerProfile::default());
        }
        db
    }

    #[test]
    fn test_db_new() {
        let db = CustomerDB::new();

        assert!(db.is_empty());
        assert!(db.root_id().is_none());
        assert_eq!(db.height(), 0);
        assert!(db.verify());
    }

    #[test]
    fn test_insert_shape() {
        let db = db_of(&[500, 300, 700]);

        assert_eq!(db.root_id(), Some(500));
        assert_eq!(db.left_of(500), Some(300));
        assert_eq!(db.right_of(500), Some(700));
        assert_eq!(db.parent_of(300), Some(500));
        assert_eq!(db.parent_of(500), None);
        assert_eq!(db.height(), 2);
        assert!(db.verify());
    }

    #[test]
    fn test_add_customer_returns_node() {
        let mut db = db_of(&[10]);
        let node = db.add_customer(5, CustomerProfile::named("Bo"));

        assert_eq!(node.id, 5);
        assert_eq!(node.profile.name.as_deref(), Some("Bo"));
        assert!(node.parent.is_some());
    }

    #[test]
    fn test_find_customer() {
        let db = db_of(&[50, 30, 70, 20, 40, 60, 80]);

        for id in [20, 30, 40, 50, 60, 70, 80] {
            assert_eq!(db.find_customer(id).map(|n| n.id), Some(id));
        }
        assert!(db.find_customer(55).is_none());
        assert_eq!(db.in_order(), vec![20, 30, 40, 50, 60, 70, 80]);
    }

    #[test]
    fn test_duplicate_ids_go_right() {
        let mut db = CustomerDB::new();
        db.add_customer(5, CustomerProfile::named("first"));
        db.add_customer(5, CustomerProfile::named("second"));

        assert_eq!(db.len(), 2);
        assert_eq!(db.right_of(5), Some(5));
        assert_eq!(
            db.find_customer(5).and_then(|n| n.profile.name.clone()),
            Some("first".to_string())
        );
        assert!(db.verify());
    }

    #[test]
    fn test_promote_left_child() {
        let mut db = db_of(&[500, 300, 700]);

        let rotation = db.promote_hot_customer(300).unwrap();
        assert_eq!(rotation.direction, RotationDirection::Right);
        assert_eq!(rotation.demoted, 500);
        assert!(rotation.now_root);

        assert_eq!(db.root_id(), Some(300));
        assert_eq!(db.right_of(300), Some(500));
        assert_eq!(db.right_of(500), Some(700));
        assert_eq!(db.parent_of(500), Some(300));
        assert!(db.verify());
    }

    #[test]
    fn test_promote_right_child_with_subtree() {
        let mut db = db_of(&[50, 30, 70, 60, 80]);

        let rotation = db.promote_hot_customer(70).unwrap();
        assert_eq!(rotation.direction, RotationDirection::Left);

        assert_eq!(db.root_id(), Some(70));
        assert_eq!(db.left_of(70), Some(50));
        assert_eq!(db.right_of(50), Some(60));
        assert_eq!(db.parent_of(60), Some(50));
        assert!(db.verify());
    }

    #[test]
    fn test_promote_below_grandparent() {
        let mut db = db_of(&[50, 30, 70, 20, 40]);

        let rotation = db.promote_hot_customer(40).unwrap();
        assert!(!rotation.now_root);

        assert_eq!(db.root_id(), Some(50));
        assert_eq!(db.left_of(50), Some(40));
        assert_eq!(db.parent_of(40), Some(50));
        assert_eq!(db.left_of(40), Some(30));
        assert_eq!(db.left_of(30), Some(20));
        assert!(db.verify());
    }

    #[test]
    fn test_promote_repeatedly_reaches_root() {
        let mut db = db_of(&[50, 30, 70, 20, 40, 35]);

        let mut calls = 0;
        while db.root_id() != Some(35) {
            db.promote_hot_customer(35).unwrap();
            calls += 1;
            assert!(db.verify());
        }
        assert_eq!(calls, 3);
        assert_eq!(db.in_order(), vec![20, 30, 35, 40, 50, 70]);
    }

    #[test]
    fn test_promote_root_is_noop() {
        let mut db = db_of(&[500, 300, 700]);

        assert_eq!(db.promote_hot_customer(500), Err(DirectoryError::AlreadyRoot(500)));
        assert_eq!(db.root_id(), Some(500));
        assert_eq!(db.left_of(500), Some(300));
    }

    #[test]
    fn test_promote_missing() {
        let mut db = db_of(&[1]);
        assert_eq!(
            db.promote_hot_customer(2),
            Err(DirectoryError::CustomerNotFound(2))
        );
    }

    #[test]
    fn test_remove_leaf_and_single_child() {
        let mut db = db_of(&[50, 30, 70, 20]);

        db.remove_customer(20).unwrap();
        assert_eq!(db.left_of(30), None);

        db.remove_customer(30).unwrap();
        assert_eq!(db.left_of(50), None);
        assert_eq!(db.in_order(), vec![50, 70]);
        assert!(db.verify());
    }

    #[test]
    fn test_remove_two_children_root() {
        let mut db = db_of(&[50, 30, 70, 60, 80, 65]);

        let profile = db.remove_customer(50).unwrap();
        assert_eq!(profile, CustomerProfile::default());

        assert_eq!(db.root_id(), Some(60));
        assert_eq!(db.left_of(60), Some(30));
        assert_eq!(db.right_of(60), Some(70));
        assert_eq!(db.left_of(70), Some(65));
        assert_eq!(db.in_order(), vec![30, 60, 65, 70, 80]);
        assert!(db.verify());
    }

    #[test]
    fn test_remove_two_children_direct_successor() {
        let mut db = db_of(&[50, 30, 70, 80]);

        db.remove_customer(50).unwrap();
        assert_eq!(db.root_id(), Some(70));
        assert_eq!(db.left_of(70), Some(30));
        assert_eq!(db.right_of(70), Some(80));
        assert!(db.verify());
    }

    #[test]
    fn test_remove_last_and_missing() {
        let mut db = db_of(&[1]);

        assert!(db.remove_customer(1).is_ok());
        assert!(db.is_empty());
        assert!(db.root_id().is_none());
        assert_eq!(db.remove_customer(1), Err(DirectoryError::CustomerNotFound(1)));
    }

    #[test]
    fn test_record_purchase_updates_graph() {
        let mut db = db_of(&[1]);
        let basket: Vec<ProductId> = vec!["Shirt".into(), "Pants".into(), "Shirt".into()];

        assert_eq!(db.record_purchase(1, &basket), Ok(1));
        assert_eq!(db.record_purchase(1, &basket), Ok(2));

        let node = db.find_customer(1).unwrap();
        assert_eq!(node.freq(), 2);
        assert_eq!(node.profile.rec_graph["Shirt"]["Pants"], 2);
        assert_eq!(node.profile.rec_graph["Pants"]["Shirt"], 2);
        assert!(!node.profile.rec_graph["Shirt"].contains_key("Shirt"));
    }

    #[test]
    fn test_recorded_purchases_alone_recommend_nothing() {
        let mut db = db_of(&[1]);
        db.record_purchase(1, &["Shirt".to_string(), "Pants".to_string()]).unwrap();

        assert!(db.recommend_products(1, 5).unwrap().is_empty());
    }

    #[test]
    fn test_record_co_purchase_surfaces_recommendation() {
        let mut db = db_of(&[1]);
        db.record_purchase(1, &["Shirt".to_string(), "Pants".to_string()]).unwrap();

        assert_eq!(db.record_co_purchase(1, "Pants", "Belt", 2), Ok(2));
        assert_eq!(db.record_co_purchase(1, "Shirt", "Belt", 1), Ok(1));
        assert_eq!(db.record_co_purchase(1, "Shirt", "Socks", 1), Ok(1));

        assert_eq!(db.recommend_products(1, 5).unwrap(), vec!["Belt", "Socks"]);
        assert_eq!(
            db.record_co_purchase(9, "Shirt", "Belt", 1),
            Err(DirectoryError::CustomerNotFound(9))
        );
    }

    #[test]
    fn test_recommend_products() {
        let mut db = CustomerDB::new();
        let profile: CustomerProfile = serde_json::from_str(
            r#"{"rec_graph": {"A-Shirt": {"B-Pants": 3, "C-Socks": 1},
                               "B-Pants": {"A-Shirt": 3, "D-Belt": 2}}}"#,
        )
        .unwrap();
        db.add_customer(7, profile);

        assert_eq!(db.recommend_products(7, 3).unwrap(), vec!["D-Belt", "C-Socks"]);
        assert_eq!(db.recommend_products(7, 1).unwrap(), vec!["D-Belt"]);
        assert_eq!(
            db.recommend_products(8, 3),
            Err(DirectoryError::CustomerNotFound(8))
        );
    }
}
