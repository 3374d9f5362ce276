//! Structured results returned by the public operations.
//!
//! Expected conditions ("no cycle", "already root", "queued ahead of the
//! tail") are reported through these records instead of errors.

use serde::Serialize;

use crate::types::{CustomerId, ProductId};

// ============================================================================
// Carousel validation
// ============================================================================

/// Outcome of a carousel validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Nothing to validate
    Empty,
    /// Fast pointer reached the end without meeting the slow pointer
    NoCycle,
    /// A cycle was found and cut
    CycleRepaired,
    /// A cycle was found but the bounded repair walk never revisited a node
    CycleUnrepaired,
    /// No cycle, but links left behind by a forced link were normalised
    LinksRepaired,
}

/// What a repair changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairDetails {
    /// Product that became the new tail, None if nothing is left
    pub new_tail: Option<ProductId>,

    /// Product the walk revisited (the node the cycle pointed back into);
    /// None when no cycle was cut
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revisited: Option<ProductId>,

    /// Products no longer reachable from head after the cut, dropped from
    /// the index
    pub dropped: Vec<ProductId>,

    /// Steps the repair walk took
    pub steps: usize,
}

/// Result of [`ProductCarousel::validate`](crate::carousel::ProductCarousel::validate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub repaired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<RepairDetails>,
}

impl ValidationReport {
    /// Report for an empty carousel
    pub fn empty() -> Self {
        Self {
            status: ValidationStatus::Empty,
            repaired: false,
            details: None,
        }
    }

    /// Report for an acyclic carousel
    pub fn no_cycle() -> Self {
        Self {
            status: ValidationStatus::NoCycle,
            repaired: false,
            details: None,
        }
    }

    /// Report for a cycle the repair walk could not locate
    pub fn unrepaired() -> Self {
        Self {
            status: ValidationStatus::CycleUnrepaired,
            repaired: false,
            details: None,
        }
    }

    /// Report for a repaired cycle
    pub fn repaired(details: RepairDetails) -> Self {
        Self {
            status: ValidationStatus::CycleRepaired,
            repaired: true,
            details: Some(details),
        }
    }

    /// Report for an acyclic carousel whose stale links were normalised
    pub fn links_repaired(details: RepairDetails) -> Self {
        Self {
            status: ValidationStatus::LinksRepaired,
            repaired: true,
            details: Some(details),
        }
    }
}

// ============================================================================
// Directory promotion and recommendation
// ============================================================================

/// Direction of a single promotion rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    /// Node was its parent's left child
    Right,
    /// Node was its parent's right child
    Left,
}

/// Result of a successful promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rotation {
    /// Promoted customer
    pub customer: CustomerId,

    /// Rotation performed around the former parent
    pub direction: RotationDirection,

    /// Former parent, now a child of `customer`
    pub demoted: CustomerId,

    /// Whether `customer` is now the root
    pub now_root: bool,
}

/// A single recommended product with its accumulated co-purchase count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub product: ProductId,
    pub score: u32,
}

// ============================================================================
// Order queue
// ============================================================================

/// Where an enqueued order landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Appended at the tail
    Tail,
    /// VIP insertion: one position ahead of the previous tail
    AheadOfTail,
}

/// Result of [`OrderProcessor::enqueue_order`](crate::cart::OrderProcessor::enqueue_order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnqueueOutcome {
    pub placement: Placement,

    /// Order ids head to tail after the insertion
    pub queue: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cycle_report_json() {
        let json = serde_json::to_string(&ValidationReport::no_cycle()).unwrap();
        assert_eq!(json, r#"{"status":"no_cycle","repaired":false}"#);
    }

    #[test]
    fn test_repaired_report_carries_details() {
        let report = ValidationReport::repaired(RepairDetails {
            new_tail: Some("C".into()),
            revisited: Some("C".into()),
            dropped: vec!["D".into()],
            steps: 4,
        });

        assert!(report.repaired);
        assert_eq!(report.status, ValidationStatus::CycleRepaired);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["details"]["new_tail"], "C");
        assert_eq!(value["details"]["dropped"][0], "D");
    }

    #[test]
    fn test_links_repaired_report_omits_revisited() {
        let report = ValidationReport::links_repaired(RepairDetails {
            new_tail: Some("D".into()),
            revisited: None,
            dropped: vec!["C".into()],
            steps: 3,
        });

        assert!(report.repaired);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "links_repaired");
        assert!(value["details"].get("revisited").is_none());
    }
}
