//! Second-order product recommendations.
//!
//! Only co-purchased products that are *not* themselves keys of the
//! customer's graph are scored, so products the customer already has a
//! direct entry for never come back as suggestions.

use indexmap::IndexMap;

use crate::types::{Recommendation, RecommendationGraph};

/// Score and rank implicit recommendations.
///
/// Each co-purchase count is added to its product's running total. Results
/// are ordered by total, descending; ties keep the order in which products
/// were first encountered walking the graph in insertion order.
///
/// # Example
///
/// ```
/// use storefront_core::directory::rank_second_order;
/// use storefront_core::types::RecommendationGraph;
///
/// let graph: RecommendationGraph = serde_json::from_str(
///     r#"{"A-Shirt": {"B-Pants": 3, "C-Socks": 1},
///         "B-Pants": {"A-Shirt": 3, "D-Belt": 2}}"#,
/// ).unwrap();
///
/// let ranked = rank_second_order(&graph, 3);
/// let ids: Vec<&str> = ranked.iter().map(|r| r.product.as_str()).collect();
/// assert_eq!(ids, vec!["D-Belt", "C-Socks"]);
/// ```
pub fn rank_second_order(graph: &RecommendationGraph, k: usize) -> Vec<Recommendation> {
    let mut totals: IndexMap<&str, u32> = IndexMap::new();

    for co_purchases in graph.values() {
        for (product, count) in co_purchases {
            if graph.contains_key(product) {
                continue;
            }
            let total = totals.entry(product.as_str()).or_insert(0);
            *total = total.saturating_add(*count);
        }
    }

    let mut ranked: Vec<(&str, u32)> = totals.into_iter().collect();
    // Stable sort keeps first-seen order among equal totals
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(k)
        .map(|(product, score)| Recommendation {
            product: product.to_string(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(json: &str) -> RecommendationGraph {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rank_empty_graph() {
        assert!(rank_second_order(&RecommendationGraph::new(), 5).is_empty());
    }

    #[test]
    fn test_rank_accumulates_across_products() {
        let g = graph(r#"{"A": {"X": 1, "Y": 4}, "B": {"X": 5}}"#);
        let ranked = rank_second_order(&g, 10);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], Recommendation { product: "X".into(), score: 6 });
        assert_eq!(ranked[1], Recommendation { product: "Y".into(), score: 4 });
    }

    #[test]
    fn test_rank_excludes_direct_keys() {
        let g = graph(r#"{"A": {"B": 9, "C": 1}, "B": {"A": 9}}"#);
        let ranked = rank_second_order(&g, 10);

        assert_eq!(ranked, vec![Recommendation { product: "C".into(), score: 1 }]);
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let g = graph(r#"{"A": {"Q": 2, "P": 2}, "B": {"R": 2}}"#);
        let ids: Vec<String> = rank_second_order(&g, 10)
            .into_iter()
            .map(|r| r.product)
            .collect();

        assert_eq!(ids, vec!["Q", "P", "R"]);
    }

    #[test]
    fn test_rank_truncates_to_k() {
        let g = graph(r#"{"A": {"X": 3, "Y": 2, "Z": 1}}"#);

        assert_eq!(rank_second_order(&g, 2).len(), 2);
        assert!(rank_second_order(&g, 0).is_empty());
    }
}
