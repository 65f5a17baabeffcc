//! Candidate-set statistics shared by all strategies.

use crate::model::{Product, ScoringWeights, StoreTemplate};
use crate::placement::PlacementConfig;
use std::collections::{BTreeSet, HashMap};

/// Category order used when the store template names no preference.
pub const DEFAULT_CATEGORY_ORDER: [&str; 8] = [
    "case",
    "screen_protector",
    "cable",
    "charger",
    "adapter",
    "mount",
    "audio",
    "other",
];

/// Read-only scoring inputs computed once per run.
///
/// Holds the normalisation maxima for `balanced`, the category order for
/// `category_grouped` and the forced-priority threshold.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    weights: ScoringWeights,
    max_velocity: f64,
    max_price: f64,
    category_ranks: HashMap<String, usize>,
    category_order: Vec<String>,
    forced_priority_threshold: f64,
    forced_all_strategies: bool,
}

impl ScoringContext {
    /// Builds the context for one candidate set and store.
    ///
    /// The category order is: the store's preferred categories, then
    /// [`DEFAULT_CATEGORY_ORDER`], then any remaining candidate categories
    /// alphabetically.
    pub fn new(products: &[Product], template: &StoreTemplate, config: &PlacementConfig) -> Self {
        let max_velocity = products
            .iter()
            .map(|p| p.sales_velocity)
            .fold(0.0_f64, f64::max);
        let max_price = products.iter().map(|p| p.price).fold(0.0_f64, f64::max);

        let mut category_order: Vec<String> = Vec::new();
        let mut category_ranks = HashMap::new();
        let mut push = |category: &str, order: &mut Vec<String>| {
            if !category_ranks.contains_key(category) {
                category_ranks.insert(category.to_owned(), order.len());
                order.push(category.to_owned());
            }
        };

        for category in &template.mix_rules.preferred_categories {
            push(category.as_str(), &mut category_order);
        }
        for category in DEFAULT_CATEGORY_ORDER {
            push(category, &mut category_order);
        }
        let remaining: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
        for category in remaining {
            push(category, &mut category_order);
        }

        Self {
            weights: template.weights,
            max_velocity,
            max_price,
            category_ranks,
            category_order,
            forced_priority_threshold: config.forced_priority_threshold,
            forced_all_strategies: config.forced_priority_all_strategies,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn forced_priority_threshold(&self) -> f64 {
        self.forced_priority_threshold
    }

    /// Whether the forced-priority rule applies beyond `sales_velocity`.
    pub fn forced_all_strategies(&self) -> bool {
        self.forced_all_strategies
    }

    /// Sales velocity scaled into [0, 1] by the candidate-set maximum.
    pub fn normalized_velocity(&self, product: &Product) -> f64 {
        normalize(product.sales_velocity, self.max_velocity)
    }

    /// Price scaled into [0, 1] by the candidate-set maximum.
    pub fn normalized_price(&self, product: &Product) -> f64 {
        normalize(product.price, self.max_price)
    }

    /// Position of a category in the category order (0 = first).
    pub fn category_rank(&self, category: &str) -> usize {
        self.category_ranks
            .get(category)
            .copied()
            .unwrap_or(self.category_order.len())
    }

    pub fn category_count(&self) -> usize {
        self.category_order.len()
    }
}

fn normalize(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductMixRules;

    #[test]
    fn test_normalization_zero_max() {
        let products = vec![Product::new("A", "case", 8.0, 12.0, 2.0)];
        let ctx = ScoringContext::new(
            &products,
            &StoreTemplate::standard(),
            &PlacementConfig::default(),
        );
        assert_eq!(ctx.normalized_velocity(&products[0]), 0.0);
        assert_eq!(ctx.normalized_price(&products[0]), 0.0);
    }

    #[test]
    fn test_category_order_preferred_default_then_alphabetical() {
        let products = vec![
            Product::new("A", "watch_band", 4.0, 12.0, 2.0),
            Product::new("B", "keyboard", 30.0, 5.0, 12.0),
            Product::new("C", "cable", 5.0, 15.0, 3.0),
        ];
        let template = StoreTemplate::standard().with_mix_rules(ProductMixRules {
            preferred_categories: vec!["audio".into(), "cable".into()],
            ..ProductMixRules::default()
        });
        let ctx = ScoringContext::new(&products, &template, &PlacementConfig::default());

        assert_eq!(ctx.category_rank("audio"), 0);
        assert_eq!(ctx.category_rank("cable"), 1);
        assert_eq!(ctx.category_rank("case"), 2);
        // after the 8 defaults (audio and cable already placed): keyboard, watch_band
        assert_eq!(ctx.category_rank("keyboard"), 8);
        assert_eq!(ctx.category_rank("watch_band"), 9);
        assert_eq!(ctx.category_count(), 10);
    }

    #[test]
    fn test_unknown_category_ranks_last() {
        let ctx = ScoringContext::new(&[], &StoreTemplate::standard(), &PlacementConfig::default());
        assert_eq!(ctx.category_rank("drone"), ctx.category_count());
    }
}
