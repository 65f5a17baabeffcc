//! Eviction planning and execution.

use crate::facing::FacingAllocation;
use crate::model::{Product, ProductMixRules};
use crate::placement::PlacementConfig;
use crate::scoring::{priority_cmp, Candidate};
use crate::tracker::{Placement, ShelfLedger, ShelfTracker};
use std::collections::BTreeMap;
use tracing::debug;

/// What an eviction set must free besides width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotRequirement {
    /// Width only.
    #[default]
    WidthOnly,
    /// At least one placed product; the store product limit is reached.
    AnyProduct,
    /// At least one placed product of the candidate's category; the
    /// category product limit is reached.
    SameCategory,
}

impl SlotRequirement {
    fn satisfied_by(self, victim: &Placement, category: &str) -> bool {
        match self {
            SlotRequirement::WidthOnly => false,
            SlotRequirement::AnyProduct => true,
            SlotRequirement::SameCategory => victim.category == category,
        }
    }
}

/// The outcome of a successful bump.
#[derive(Debug, Clone, PartialEq)]
pub struct Eviction {
    /// The candidate's new placement.
    pub placement: Placement,

    /// Placements removed to make room, lowest priority first.
    pub evicted: Vec<Placement>,
}

/// Bumping Resolver: frees room for a high-priority candidate by evicting
/// strictly lower-scored placements.
///
/// Rules:
///
/// 1. Only forced-priority candidates and candidates ranked inside the
///    top `bump_quantile` of the queue may bump.
/// 2. Shelves are scanned in fill order; the first shelf with a valid
///    eviction set wins.
/// 3. Victims are taken lowest priority first and every victim's score must
///    be strictly below the candidate's.
/// 4. A victim is protected when its removal would drop its category
///    below `min_products_per_category` (the candidate's own category is
///    exempt).
/// 5. Under a [`SlotRequirement`] other than `WidthOnly`, the set must also
///    free a product slot, even when the candidate already fits.
/// 6. Once enough is freed, selected victims are re-checked highest
///    priority first and released when the rest already free enough.
#[derive(Debug, Clone)]
pub struct BumpResolver<'a> {
    products: &'a [Product],
    min_per_category: usize,
    eligible_ranks: usize,
    epsilon: f64,
}

impl<'a> BumpResolver<'a> {
    /// Creates a resolver for a queue of `candidate_count` ranked products.
    pub fn new(
        products: &'a [Product],
        mix: &ProductMixRules,
        config: &PlacementConfig,
        candidate_count: usize,
    ) -> Self {
        let eligible_ranks = (config.bump_quantile * candidate_count as f64).ceil() as usize;
        Self {
            products,
            min_per_category: mix.min_products_per_category,
            eligible_ranks,
            epsilon: config.epsilon,
        }
    }

    /// Number of top-ranked positions allowed to bump.
    pub fn eligible_ranks(&self) -> usize {
        self.eligible_ranks
    }

    pub fn is_eligible(&self, candidate: &Candidate) -> bool {
        candidate.forced || candidate.rank < self.eligible_ranks
    }

    /// Tries to place `candidate` by evicting lower-priority placements.
    ///
    /// Returns `None`, leaving the tracker untouched, when no shelf yields a
    /// valid eviction set.
    pub fn resolve(
        &self,
        tracker: &mut ShelfTracker<'_>,
        candidate: &Candidate,
        facings: FacingAllocation,
        slot: SlotRequirement,
    ) -> Option<Eviction> {
        let product = &self.products[candidate.index];
        if tracker.contains(&product.id) {
            return None;
        }
        let category_counts = tracker.category_counts();

        for shelf in 0..tracker.shelf_count() {
            let Some(victims) = self.plan(
                &tracker.ledgers()[shelf],
                candidate,
                facings.minimum,
                &category_counts,
                slot,
            ) else {
                continue;
            };

            let snapshot = tracker.ledgers()[shelf].clone();
            let evicted: Vec<Placement> = victims
                .iter()
                .filter_map(|id| tracker.remove(shelf, id))
                .collect();

            let placed = facings.attempts().find_map(|n| {
                tracker.try_place(
                    shelf,
                    product,
                    candidate.index,
                    n,
                    candidate.score,
                    candidate.forced,
                )
            });

            match placed {
                Some(placement) => {
                    debug!(
                        product = %product.id,
                        shelf = placement.shelf_id,
                        evicted = evicted.len(),
                        "eviction set applied"
                    );
                    return Some(Eviction { placement, evicted });
                }
                None => {
                    debug!(
                        product = %product.id,
                        shelf = tracker.ledgers()[shelf].shelf().id,
                        "eviction set rolled back"
                    );
                    tracker.restore(shelf, snapshot);
                }
            }
        }
        None
    }

    /// Plans the minimal eviction set on one shelf, as product ids.
    fn plan(
        &self,
        ledger: &ShelfLedger<'_>,
        candidate: &Candidate,
        facings: u32,
        category_counts: &BTreeMap<String, usize>,
        slot: SlotRequirement,
    ) -> Option<Vec<String>> {
        let product = &self.products[candidate.index];
        if !ledger.shelf().fits_dimensions(product) {
            return None;
        }

        let required = ledger.required_width(product.width, facings);
        if required > ledger.shelf().width + self.epsilon {
            return None;
        }
        let deficit = required - ledger.remaining_width();
        if deficit <= self.epsilon && slot == SlotRequirement::WidthOnly {
            return None;
        }

        let mut pool: Vec<&Placement> = ledger
            .placements()
            .iter()
            .filter(|p| p.score < candidate.score)
            .collect();
        // lowest priority first
        pool.sort_by(|a, b| {
            priority_cmp(
                (&self.products[b.product_index], b.score, b.forced),
                (&self.products[a.product_index], a.score, a.forced),
            )
        });

        let gap = ledger.gap();
        let mut remaining_in_category = category_counts.clone();
        let mut selected: Vec<&Placement> = Vec::new();
        let mut freed = 0.0;
        let mut slots = 0usize;
        let enough = |freed: f64, slots: usize| {
            freed + self.epsilon >= deficit && (slot == SlotRequirement::WidthOnly || slots > 0)
        };

        for victim in pool {
            if enough(freed, slots) {
                break;
            }
            if victim.category != product.category && self.min_per_category > 0 {
                let count = remaining_in_category
                    .get(&victim.category)
                    .copied()
                    .unwrap_or(0);
                if count <= self.min_per_category {
                    continue;
                }
            }
            if let Some(count) = remaining_in_category.get_mut(&victim.category) {
                *count = count.saturating_sub(1);
            }
            freed += victim.footprint(gap);
            if slot.satisfied_by(victim, &product.category) {
                slots += 1;
            }
            selected.push(victim);
        }

        if !enough(freed, slots) {
            return None;
        }

        // Release victims that are not needed, highest priority first.
        let mut i = selected.len();
        while i > 0 {
            i -= 1;
            let footprint = selected[i].footprint(gap);
            let held = usize::from(slot.satisfied_by(selected[i], &product.category));
            if enough(freed - footprint, slots - held) {
                freed -= footprint;
                slots -= held;
                selected.remove(i);
            }
        }

        Some(selected.into_iter().map(|p| p.product_id.clone()).collect())
    }
}
