//! The five scoring strategies.

use super::context::ScoringContext;
use crate::error::PlanogramError;
use crate::model::Product;
use std::fmt;
use std::str::FromStr;

/// Scoring strategy selecting how products are prioritised.
///
/// Every variant maps a product to a single `f64` where **higher is
/// higher priority**. Ties are resolved by [`rank_candidates`](super::rank_candidates),
/// never by the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Raw sales velocity; products above the forced threshold are
    /// attempted first regardless of rank.
    SalesVelocity,

    /// Weighted sum of normalised sales velocity, price and attach rate.
    #[default]
    Balanced,

    /// Category order first, sales velocity second.
    CategoryGrouped,

    /// Price per cm of facing width.
    ValueDensity,

    /// Profit margin per cm² of footprint; missing margin scores 0.
    ProfitEfficiency,
}

impl Strategy {
    /// All strategies, in declaration order.
    pub const ALL: [Strategy; 5] = [
        Strategy::SalesVelocity,
        Strategy::Balanced,
        Strategy::CategoryGrouped,
        Strategy::ValueDensity,
        Strategy::ProfitEfficiency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SalesVelocity => "sales_velocity",
            Strategy::Balanced => "balanced",
            Strategy::CategoryGrouped => "category_grouped",
            Strategy::ValueDensity => "value_density",
            Strategy::ProfitEfficiency => "profit_efficiency",
        }
    }

    /// Computes the priority score of a product.
    pub fn score(&self, product: &Product, ctx: &ScoringContext) -> f64 {
        match self {
            Strategy::SalesVelocity => product.sales_velocity,
            Strategy::Balanced => {
                let w = ctx.weights();
                w.sales_velocity * ctx.normalized_velocity(product)
                    + w.profit_margin * ctx.normalized_price(product)
                    + w.attach_rate * product.attach()
            }
            Strategy::CategoryGrouped => {
                (ctx.category_count() - ctx.category_rank(&product.category)) as f64
            }
            Strategy::ValueDensity => product.price / product.width,
            Strategy::ProfitEfficiency => product.margin() / product.footprint_area(),
        }
    }

    /// Whether the product bypasses normal ranking under this strategy.
    ///
    /// Only `sales_velocity` forces products unless the context enables the
    /// rule for every strategy.
    pub fn is_forced(&self, product: &Product, ctx: &ScoringContext) -> bool {
        (matches!(self, Strategy::SalesVelocity) || ctx.forced_all_strategies())
            && product.sales_velocity > ctx.forced_priority_threshold()
    }

    /// Whether this strategy reads the profit margin.
    pub fn uses_margin(&self) -> bool {
        matches!(self, Strategy::ProfitEfficiency)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = PlanogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| PlanogramError::UnknownStrategy(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScoringWeights, StoreTemplate};
    use crate::placement::PlacementConfig;

    fn products() -> Vec<Product> {
        vec![
            Product::new("A", "case", 8.0, 12.0, 2.0)
                .with_sales_velocity(60.0)
                .with_price(40.0)
                .with_attach_rate(0.5)
                .with_profit_margin(16.0),
            Product::new("B", "cable", 5.0, 15.0, 4.0)
                .with_sales_velocity(30.0)
                .with_price(20.0),
        ]
    }

    fn context(products: &[Product]) -> ScoringContext {
        let template =
            StoreTemplate::standard().with_weights(ScoringWeights::new(0.5, 0.3, 0.2));
        ScoringContext::new(products, &template, &PlacementConfig::default())
    }

    #[test]
    fn test_parse_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
            assert_eq!(strategy.to_string(), strategy.as_str());
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "random".parse::<Strategy>(),
            Err(PlanogramError::UnknownStrategy("random".into()))
        );
    }

    #[test]
    fn test_sales_velocity_and_forced() {
        let ps = products();
        let ctx = context(&ps);
        assert!((Strategy::SalesVelocity.score(&ps[0], &ctx) - 60.0).abs() < 1e-10);
        assert!(Strategy::SalesVelocity.is_forced(&ps[0], &ctx));
        assert!(!Strategy::SalesVelocity.is_forced(&ps[1], &ctx));
        // Forced priority is specific to the sales-velocity strategy.
        assert!(!Strategy::Balanced.is_forced(&ps[0], &ctx));
    }

    #[test]
    fn test_forced_under_all_strategies() {
        let ps = products();
        let config = PlacementConfig::default().with_forced_priority_all_strategies(true);
        let ctx = ScoringContext::new(&ps, &StoreTemplate::standard(), &config);
        assert!(Strategy::Balanced.is_forced(&ps[0], &ctx));
        assert!(Strategy::ValueDensity.is_forced(&ps[0], &ctx));
        assert!(!Strategy::ValueDensity.is_forced(&ps[1], &ctx));
    }

    #[test]
    fn test_balanced_weighted_sum() {
        let ps = products();
        let ctx = context(&ps);
        // A: 0.5*1.0 + 0.3*1.0 + 0.2*0.5 = 0.9
        assert!((Strategy::Balanced.score(&ps[0], &ctx) - 0.9).abs() < 1e-10);
        // B: 0.5*0.5 + 0.3*0.5 + 0.2*0.0 = 0.4
        assert!((Strategy::Balanced.score(&ps[1], &ctx) - 0.4).abs() < 1e-10);
    }

    #[test]
    fn test_category_grouped_follows_category_order() {
        let ps = products();
        let ctx = context(&ps);
        // default order puts case before cable
        assert!(
            Strategy::CategoryGrouped.score(&ps[0], &ctx)
                > Strategy::CategoryGrouped.score(&ps[1], &ctx)
        );
    }

    #[test]
    fn test_value_density() {
        let ps = products();
        let ctx = context(&ps);
        assert!((Strategy::ValueDensity.score(&ps[0], &ctx) - 5.0).abs() < 1e-10);
        assert!((Strategy::ValueDensity.score(&ps[1], &ctx) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_profit_efficiency_missing_margin_is_zero() {
        let ps = products();
        let ctx = context(&ps);
        assert!((Strategy::ProfitEfficiency.score(&ps[0], &ctx) - 1.0).abs() < 1e-10);
        assert_eq!(Strategy::ProfitEfficiency.score(&ps[1], &ctx), 0.0);
        assert!(Strategy::ProfitEfficiency.uses_margin());
    }
}
