//! Facing count allocation.

use crate::model::{PlacementRules, Product, ProductMixRules};
use crate::placement::PlacementConfig;

/// Facing counts for one product: the count to try first and the floor
/// to fall back to when the preferred count does not fit.
///
/// Invariant: `1 <= minimum <= preferred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacingAllocation {
    pub preferred: u32,
    pub minimum: u32,
}

impl FacingAllocation {
    /// Facing counts to try, preferred first, without duplicates.
    pub fn attempts(&self) -> impl Iterator<Item = u32> {
        let fallback = (self.minimum < self.preferred).then_some(self.minimum);
        std::iter::once(self.preferred).chain(fallback)
    }
}

/// Computes the facing allocation for a product.
///
/// `preferred = floor(base_facings × multiplier)` and
/// `minimum = floor(multiplier)`, both at least 1 and capped by the store's
/// `max_facings_per_product` and the product's own `max_facings`.
///
/// Sales velocity deliberately plays no part: the allocator favours the
/// number of distinct products on the fixture over shelf share of top
/// sellers.
///
/// # Examples
///
/// ```
/// use u_planogram::facing::allocate_facings;
/// use u_planogram::model::{PlacementRules, Product, ProductMixRules};
/// use u_planogram::placement::PlacementConfig;
///
/// let product = Product::new("A", "case", 8.0, 12.0, 2.0).with_sales_velocity(500.0);
/// let rules = PlacementRules { min_facings_multiplier: 1.5, ..PlacementRules::default() };
/// let alloc = allocate_facings(&product, &rules, &ProductMixRules::default(), &PlacementConfig::default());
/// assert_eq!(alloc.preferred, 3);
/// assert_eq!(alloc.minimum, 1);
/// ```
pub fn allocate_facings(
    product: &Product,
    rules: &PlacementRules,
    mix: &ProductMixRules,
    config: &PlacementConfig,
) -> FacingAllocation {
    let multiplier = rules.min_facings_multiplier;
    let cap = facing_cap(product, mix);

    let preferred = floor_at_least_one(config.base_facings as f64 * multiplier).min(cap);
    let minimum = floor_at_least_one(multiplier).min(preferred);

    FacingAllocation { preferred, minimum }
}

/// Effective facing cap for a product (never below 1).
pub fn facing_cap(product: &Product, mix: &ProductMixRules) -> u32 {
    let store_cap = mix.max_facings_per_product.unwrap_or(u32::MAX);
    let product_cap = product.max_facings.unwrap_or(u32::MAX);
    store_cap.min(product_cap).max(1)
}

fn floor_at_least_one(value: f64) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value.floor().min(u32::MAX as f64) as u32
    } else {
        1
    }
}
