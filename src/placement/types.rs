//! Result and diagnostic types of a placement run.

use crate::model::ShelfType;
use crate::scoring::Strategy;
use crate::tracker::Placement;
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle of one candidate inside a run.
///
/// ```text
/// Pending -> Attempting -> Placed
///                       -> Rejected
///            Placed     -> BumpedRetry -> Attempting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Pending,
    Attempting,
    Placed,
    BumpedRetry,
    Rejected,
}

impl CandidateState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: CandidateState) -> bool {
        use CandidateState::*;
        matches!(
            (self, next),
            (Pending, Attempting)
                | (Attempting, Placed)
                | (Attempting, Rejected)
                | (Placed, BumpedRetry)
                | (Placed, Rejected)
                | (BumpedRetry, Attempting)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CandidateState::Placed | CandidateState::Rejected)
    }
}

/// Why a product ended up off the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectionReason {
    /// No shelf had room and the candidate may not bump.
    InsufficientWidth,
    /// Placing the product would exceed `max_categories`.
    CategoryCapReached,
    /// The candidate may bump, but no shelf offered a valid eviction set.
    NoEvictionCandidate,
    /// Taller or deeper than every shelf.
    ExceedsShelfDimensions,
    /// The store's `max_products` limit is already reached.
    ProductLimitReached,
    /// The category's `max_products_per_category` limit is already reached.
    CategoryProductLimitReached,
    /// Evicted more often than `max_bump_retries` allows.
    RetryBudgetExhausted,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::InsufficientWidth => "insufficient shelf width",
            RejectionReason::CategoryCapReached => "category cap reached",
            RejectionReason::NoEvictionCandidate => "no eviction candidate available",
            RejectionReason::ExceedsShelfDimensions => "exceeds shelf dimensions",
            RejectionReason::ProductLimitReached => "store product limit reached",
            RejectionReason::CategoryProductLimitReached => "category product limit reached",
            RejectionReason::RetryBudgetExhausted => "bump retry budget exhausted",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product that was not placed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rejection {
    pub product_id: String,
    pub reason: RejectionReason,
}

/// Non-fatal diagnostics collected during a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Warning {
    /// A candidate displaced lower-priority placements.
    Eviction {
        candidate: String,
        forced: bool,
        shelf_id: u32,
        evicted: Vec<String>,
    },
    /// Profit margin absent under a strategy that reads it; scored as 0.
    MissingProfitMargin { product_id: String },
    /// The store weight vector does not sum to 1.0.
    WeightsNotNormalized { sum: f64 },
    /// Placed with fewer facings than preferred.
    ReducedFacings {
        product_id: String,
        preferred: u32,
        placed: u32,
    },
    /// A represented category has fewer products than the store minimum.
    CategoryBelowMinimum {
        category: String,
        placed: usize,
        minimum: usize,
    },
    /// A non-empty shelf is below the utilization threshold.
    UnderutilizedShelf { shelf_id: u32, utilization: f64 },
    /// A shelf is above the overcrowding threshold.
    OvercrowdedShelf { shelf_id: u32, utilization: f64 },
    /// Under category grouping, a shelf mixes more categories than allowed.
    TooManyCategoriesOnShelf {
        shelf_id: u32,
        categories: usize,
        maximum: usize,
    },
    /// Eye-level shelves carry products cheaper than the catalogue average.
    EyeLevelBelowAveragePrice {
        eye_level_average: f64,
        catalogue_average: f64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Eviction {
                candidate,
                forced,
                shelf_id,
                evicted,
            } => {
                let kind = if *forced { "forced-priority" } else { "top-ranked" };
                write!(
                    f,
                    "{kind} product {candidate} required eviction of {} lower-priority item(s) on shelf {shelf_id}: {}",
                    evicted.len(),
                    evicted.join(", ")
                )
            }
            Warning::MissingProfitMargin { product_id } => {
                write!(f, "product {product_id} has no profit margin; scored as 0")
            }
            Warning::WeightsNotNormalized { sum } => {
                write!(f, "scoring weights sum to {sum:.3}, expected 1.0")
            }
            Warning::ReducedFacings {
                product_id,
                preferred,
                placed,
            } => write!(
                f,
                "product {product_id} placed with {placed} facing(s) instead of {preferred}"
            ),
            Warning::CategoryBelowMinimum {
                category,
                placed,
                minimum,
            } => write!(
                f,
                "category {category} has only {placed} product(s) placed (minimum: {minimum})"
            ),
            Warning::UnderutilizedShelf {
                shelf_id,
                utilization,
            } => write!(f, "shelf {shelf_id} is underutilized ({utilization:.1}%)"),
            Warning::OvercrowdedShelf {
                shelf_id,
                utilization,
            } => write!(f, "shelf {shelf_id} is overcrowded ({utilization:.1}%)"),
            Warning::TooManyCategoriesOnShelf {
                shelf_id,
                categories,
                maximum,
            } => write!(
                f,
                "shelf {shelf_id} mixes {categories} categories (maximum: {maximum})"
            ),
            Warning::EyeLevelBelowAveragePrice {
                eye_level_average,
                catalogue_average,
            } => write!(
                f,
                "eye-level shelves average {eye_level_average:.2} in price, below the catalogue average of {catalogue_average:.2}"
            ),
        }
    }
}

/// Occupancy summary of one shelf.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShelfMetrics {
    pub shelf_id: u32,
    pub name: String,
    pub shelf_type: ShelfType,
    pub eye_level: bool,
    pub width: f64,
    pub used_width: f64,
    pub remaining_width: f64,
    /// Used width as % of shelf width.
    pub utilization: f64,
    pub products: usize,
    pub facings: u32,
    /// Distinct categories on the shelf.
    pub categories: usize,
}

/// Aggregate layout metrics.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutMetrics {
    /// Per shelf, in fill order.
    pub shelves: Vec<ShelfMetrics>,
    pub average_utilization: f64,
    /// Placed products per category.
    pub category_distribution: BTreeMap<String, usize>,
    /// Placed facings per category.
    pub category_facings: BTreeMap<String, u32>,
    /// Placed facings per product id.
    pub facings_by_product: BTreeMap<String, u32>,
    pub total_products: usize,
    pub total_facings: u32,
    /// Daily profit per cm of occupied product width: margin (price when
    /// the margin is unknown) × sales velocity × facings, summed.
    pub profit_density: f64,
    /// Daily units per cm of occupied product width: sales velocity ×
    /// facings, summed.
    pub quantity_density: f64,
    pub eye_level_shelves: usize,
    pub premium_shelves: usize,
}

/// The terminal artifact of a placement run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    pub strategy: Strategy,

    /// Placements shelf by shelf in fill order, left to right.
    pub placements: Vec<Placement>,

    /// Rejected products in rejection order.
    pub rejections: Vec<Rejection>,

    pub warnings: Vec<Warning>,

    pub metrics: LayoutMetrics,

    /// Placement attempts performed (initial + re-queued).
    pub attempts: usize,

    /// Successful bumps.
    pub bumps: usize,
}

impl OptimizationResult {
    /// Whether at least one product was placed.
    pub fn success(&self) -> bool {
        !self.placements.is_empty()
    }

    pub fn placement(&self, product_id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.product_id == product_id)
    }

    pub fn rejection(&self, product_id: &str) -> Option<RejectionReason> {
        self.rejections
            .iter()
            .find(|r| r.product_id == product_id)
            .map(|r| r.reason)
    }

    /// Placed product ids in output order.
    pub fn placed_ids(&self) -> Vec<&str> {
        self.placements
            .iter()
            .map(|p| p.product_id.as_str())
            .collect()
    }

    /// Placements on one shelf, left to right.
    pub fn shelf_placements(&self, shelf_id: u32) -> impl Iterator<Item = &Placement> + '_ {
        self.placements.iter().filter(move |p| p.shelf_id == shelf_id)
    }
}
