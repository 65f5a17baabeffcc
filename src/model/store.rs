//! Store templates: shelves plus merchandising rules.

use super::shelf::{Shelf, ShelfType};
use crate::error::ValidationError;
use std::collections::HashSet;

/// Store format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StoreType {
    Express,
    Standard,
    Flagship,
    Custom(String),
}

impl StoreType {
    pub fn as_str(&self) -> &str {
        match self {
            StoreType::Express => "express",
            StoreType::Standard => "standard",
            StoreType::Flagship => "flagship",
            StoreType::Custom(name) => name,
        }
    }
}

/// How placed products are arranged within a shelf after the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GroupingStrategy {
    /// Keep placement order (priority order).
    #[default]
    None,
    /// Reorder each shelf so that products of a category sit together.
    Category,
}

/// Product-mix rules of a store format.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProductMixRules {
    /// Maximum number of distinct categories on the fixture.
    pub max_categories: Option<usize>,

    /// Minimum products per represented category; honoured where feasible.
    pub min_products_per_category: usize,

    /// Categories that lead the category order.
    pub preferred_categories: Vec<String>,

    /// Facing cap applied to every product.
    pub max_facings_per_product: Option<u32>,

    /// Maximum number of distinct products on the fixture.
    pub max_products: Option<usize>,

    /// Maximum number of products per category.
    pub max_products_per_category: Option<usize>,
}

/// Physical placement rules.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementRules {
    pub grouping: GroupingStrategy,

    /// Scales the base facing count; also the per-product facing floor.
    pub min_facings_multiplier: f64,

    /// Gap in cm reserved after each placement.
    pub gap: f64,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            grouping: GroupingStrategy::None,
            min_facings_multiplier: 1.0,
            gap: 2.0,
        }
    }
}

/// Weight vector over the scoring attributes, expected to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringWeights {
    pub sales_velocity: f64,
    pub profit_margin: f64,
    pub attach_rate: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sales_velocity: 0.4,
            profit_margin: 0.3,
            attach_rate: 0.3,
        }
    }
}

impl ScoringWeights {
    pub fn new(sales_velocity: f64, profit_margin: f64, attach_rate: f64) -> Self {
        Self {
            sales_velocity,
            profit_margin,
            attach_rate,
        }
    }

    pub fn sum(&self) -> f64 {
        self.sales_velocity + self.profit_margin + self.attach_rate
    }

    /// Whether the weights sum to 1.0 within `1e-6`.
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= 1e-6
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let named = [
            ("sales_velocity", self.sales_velocity),
            ("profit_margin", self.profit_margin),
            ("attach_rate", self.attach_rate),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

/// A store format's fixture layout and rules. Read-only during a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreTemplate {
    pub store_type: StoreType,
    pub name: String,
    pub shelves: Vec<Shelf>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mix_rules: ProductMixRules,
    #[cfg_attr(feature = "serde", serde(default))]
    pub placement_rules: PlacementRules,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weights: ScoringWeights,
}

impl StoreTemplate {
    /// Creates a template with default rules and weights.
    pub fn new(store_type: StoreType, name: impl Into<String>, shelves: Vec<Shelf>) -> Self {
        Self {
            store_type,
            name: name.into(),
            shelves,
            mix_rules: ProductMixRules::default(),
            placement_rules: PlacementRules::default(),
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_mix_rules(mut self, rules: ProductMixRules) -> Self {
        self.mix_rules = rules;
        self
    }

    pub fn with_placement_rules(mut self, rules: PlacementRules) -> Self {
        self.placement_rules = rules;
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.placement_rules.gap = gap;
        self
    }

    /// Express format: two short shelves, bestsellers only.
    pub fn express() -> Self {
        let shelves = vec![
            Shelf::new(0, "Lower Shelf", 120.0, 30.0, 35.0, 0.5).with_y_position(60.0),
            Shelf::new(1, "Eye Level Shelf", 120.0, 30.0, 35.0, 0.9)
                .with_y_position(95.0)
                .with_shelf_type(ShelfType::Premium),
        ];
        Self::new(StoreType::Express, "Express Store Template", shelves)
            .with_mix_rules(ProductMixRules {
                max_categories: Some(5),
                min_products_per_category: 1,
                max_facings_per_product: Some(2),
                max_products: Some(50),
                ..ProductMixRules::default()
            })
            .with_weights(ScoringWeights::new(0.6, 0.2, 0.2))
    }

    /// Standard format: three 150cm shelves, category grouping.
    pub fn standard() -> Self {
        let shelves = vec![
            Shelf::new(0, "Bottom Shelf", 150.0, 35.0, 40.0, 0.2).with_y_position(20.0),
            Shelf::new(1, "Middle Shelf", 150.0, 30.0, 40.0, 0.5).with_y_position(60.0),
            Shelf::new(2, "Eye Level Shelf", 150.0, 30.0, 35.0, 0.9)
                .with_y_position(95.0)
                .with_shelf_type(ShelfType::Premium),
        ];
        Self::new(StoreType::Standard, "Standard Store Template", shelves)
            .with_mix_rules(ProductMixRules {
                min_products_per_category: 2,
                max_facings_per_product: Some(4),
                max_products: Some(150),
                ..ProductMixRules::default()
            })
            .with_placement_rules(PlacementRules {
                grouping: GroupingStrategy::Category,
                ..PlacementRules::default()
            })
            .with_weights(ScoringWeights::new(0.4, 0.3, 0.3))
    }

    /// Flagship format: five 200cm shelves with a promotional top shelf.
    pub fn flagship() -> Self {
        let shelves = vec![
            Shelf::new(0, "Floor Level", 200.0, 35.0, 45.0, 0.3).with_y_position(20.0),
            Shelf::new(1, "Lower Mid", 200.0, 30.0, 40.0, 0.6).with_y_position(60.0),
            Shelf::new(2, "Eye Level", 200.0, 30.0, 40.0, 1.0)
                .with_y_position(95.0)
                .with_shelf_type(ShelfType::Premium),
            Shelf::new(3, "Upper", 200.0, 25.0, 35.0, 0.7).with_y_position(130.0),
            Shelf::new(4, "Top Promotional", 200.0, 25.0, 30.0, 0.4)
                .with_y_position(160.0)
                .with_shelf_type(ShelfType::Promotional),
        ];
        Self::new(StoreType::Flagship, "Flagship Store Template", shelves)
            .with_mix_rules(ProductMixRules {
                min_products_per_category: 3,
                max_facings_per_product: Some(5),
                max_products: Some(500),
                ..ProductMixRules::default()
            })
            .with_placement_rules(PlacementRules {
                grouping: GroupingStrategy::Category,
                min_facings_multiplier: 1.5,
                gap: 2.0,
            })
            .with_weights(ScoringWeights::new(0.3, 0.4, 0.3))
    }

    /// Shelf indices in fill order: descending eye-level score, ties by
    /// template order.
    pub fn shelf_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.shelves.len()).collect();
        order.sort_by(|&a, &b| {
            self.shelves[b]
                .eye_level_score
                .total_cmp(&self.shelves[a].eye_level_score)
                .then(a.cmp(&b))
        });
        order
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.shelves.is_empty() {
            return Err(ValidationError::NoShelves);
        }
        let mut seen = HashSet::with_capacity(self.shelves.len());
        for shelf in &self.shelves {
            shelf.validate()?;
            if !seen.insert(shelf.id) {
                return Err(ValidationError::DuplicateShelf(shelf.id));
            }
        }

        let multiplier = self.placement_rules.min_facings_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ValidationError::InvalidMultiplier(multiplier));
        }
        let gap = self.placement_rules.gap;
        if !gap.is_finite() || gap < 0.0 {
            return Err(ValidationError::InvalidGap(gap));
        }

        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(StoreTemplate::express().validate().is_ok());
        assert!(StoreTemplate::standard().validate().is_ok());
        assert!(StoreTemplate::flagship().validate().is_ok());
    }

    #[test]
    fn test_presets_weights_normalized() {
        assert!(StoreTemplate::express().weights.is_normalized());
        assert!(StoreTemplate::standard().weights.is_normalized());
        assert!(StoreTemplate::flagship().weights.is_normalized());
    }

    #[test]
    fn test_shelf_order_by_eye_level() {
        let t = StoreTemplate::flagship();
        // scores: [0.3, 0.6, 1.0, 0.7, 0.4]
        assert_eq!(t.shelf_order(), vec![2, 3, 1, 4, 0]);
    }

    #[test]
    fn test_shelf_order_ties_keep_template_order() {
        let shelves = vec![
            Shelf::new(7, "a", 100.0, 30.0, 30.0, 0.5),
            Shelf::new(3, "b", 100.0, 30.0, 30.0, 0.5),
            Shelf::new(5, "c", 100.0, 30.0, 30.0, 0.9),
        ];
        let t = StoreTemplate::new(StoreType::Custom("kiosk".into()), "k", shelves);
        assert_eq!(t.shelf_order(), vec![2, 0, 1]);
        assert_eq!(t.store_type.as_str(), "kiosk");
    }

    #[test]
    fn test_validate_no_shelves() {
        let t = StoreTemplate::new(StoreType::Standard, "empty", vec![]);
        assert_eq!(t.validate(), Err(ValidationError::NoShelves));
    }

    #[test]
    fn test_validate_duplicate_shelf() {
        let shelves = vec![
            Shelf::new(1, "a", 100.0, 30.0, 30.0, 0.5),
            Shelf::new(1, "b", 100.0, 30.0, 30.0, 0.6),
        ];
        let t = StoreTemplate::new(StoreType::Standard, "dup", shelves);
        assert_eq!(t.validate(), Err(ValidationError::DuplicateShelf(1)));
    }

    #[test]
    fn test_validate_bad_multiplier_and_gap() {
        let mut t = StoreTemplate::standard();
        t.placement_rules.min_facings_multiplier = 0.0;
        assert!(matches!(t.validate(), Err(ValidationError::InvalidMultiplier(_))));

        let t = StoreTemplate::standard().with_gap(-1.0);
        assert!(matches!(t.validate(), Err(ValidationError::InvalidGap(_))));
    }

    #[test]
    fn test_validate_negative_weight() {
        let t = StoreTemplate::standard().with_weights(ScoringWeights::new(-0.1, 0.6, 0.5));
        assert!(matches!(
            t.validate(),
            Err(ValidationError::InvalidWeight {
                name: "sales_velocity",
                ..
            })
        ));
    }

    #[test]
    fn test_unnormalized_weights_are_valid() {
        let t = StoreTemplate::standard().with_weights(ScoringWeights::new(1.0, 1.0, 1.0));
        assert!(t.validate().is_ok());
        assert!(!t.weights.is_normalized());
    }
}
