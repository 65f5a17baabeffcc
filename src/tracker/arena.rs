//! Per-run shelf state.

use super::ledger::{Placement, ShelfLedger};
use crate::model::{Product, StoreTemplate};
use std::collections::{BTreeMap, HashMap};

/// Shelf Capacity Tracker: owns every shelf ledger of one run.
///
/// Ledgers are stored in fill order (descending eye-level score), so
/// ledger position 0 is always the most visible shelf. The tracker is
/// created fresh for each run and handed by `&mut` to the orchestrator
/// and the bumping resolver; nothing outlives the run.
#[derive(Debug, Clone)]
pub struct ShelfTracker<'a> {
    ledgers: Vec<ShelfLedger<'a>>,
    /// product id -> ledger position
    located: HashMap<String, usize>,
    epsilon: f64,
}

impl<'a> ShelfTracker<'a> {
    pub fn new(template: &'a StoreTemplate, epsilon: f64) -> Self {
        let gap = template.placement_rules.gap;
        let ledgers = template
            .shelf_order()
            .into_iter()
            .map(|i| ShelfLedger::new(&template.shelves[i], gap))
            .collect();
        Self {
            ledgers,
            located: HashMap::new(),
            epsilon,
        }
    }

    /// Ledgers in fill order.
    pub fn ledgers(&self) -> &[ShelfLedger<'a>] {
        &self.ledgers
    }

    pub fn shelf_count(&self) -> usize {
        self.ledgers.len()
    }

    pub fn remaining_width(&self, shelf: usize) -> f64 {
        self.ledgers[shelf].remaining_width()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.located.contains_key(product_id)
    }

    pub fn placed_count(&self) -> usize {
        self.located.len()
    }

    /// Whether the product could be placed on the shelf at `facings`
    /// without evicting anything.
    pub fn fits(&self, shelf: usize, product: &Product, facings: u32) -> bool {
        let ledger = &self.ledgers[shelf];
        ledger.shelf().fits_dimensions(product)
            && ledger.can_fit(ledger.required_width(product.width, facings), self.epsilon)
    }

    /// Places a product if it fits; returns `None` without side effects
    /// otherwise, or if the product is already placed.
    pub fn try_place(
        &mut self,
        shelf: usize,
        product: &Product,
        product_index: usize,
        facings: u32,
        score: f64,
        forced: bool,
    ) -> Option<Placement> {
        if facings == 0 || self.contains(&product.id) || !self.fits(shelf, product, facings) {
            return None;
        }
        let placement = self.ledgers[shelf].push(Placement {
            product_id: product.id.clone(),
            category: product.category.clone(),
            shelf_id: 0,
            facings,
            offset: 0.0,
            width: product.width * facings as f64,
            score,
            forced,
            product_index,
        });
        self.located.insert(product.id.clone(), shelf);
        Some(placement)
    }

    /// Removes a placement and reclaims its width.
    pub fn remove(&mut self, shelf: usize, product_id: &str) -> Option<Placement> {
        if self.located.get(product_id) != Some(&shelf) {
            return None;
        }
        let removed = self.ledgers[shelf].remove(product_id)?;
        self.located.remove(product_id);
        Some(removed)
    }

    /// Puts one shelf back to a state captured earlier in the same run.
    pub(crate) fn restore(&mut self, shelf: usize, ledger: ShelfLedger<'a>) {
        self.located.retain(|_, position| *position != shelf);
        for placement in ledger.placements() {
            self.located.insert(placement.product_id.clone(), shelf);
        }
        self.ledgers[shelf] = ledger;
    }

    /// Number of placed products per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for placement in self.placements() {
            *counts.entry(placement.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of placed products in one category.
    pub fn category_count(&self, category: &str) -> usize {
        self.placements().filter(|p| p.category == category).count()
    }

    /// Iterates all placements in fill order, left to right.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> + '_ {
        self.ledgers.iter().flat_map(|l| l.placements().iter())
    }

    /// Reorders every shelf so products of a category sit together,
    /// categories by `category_rank`, higher scores first within a category.
    pub fn group_by_category<F>(&mut self, category_rank: F)
    where
        F: Fn(&str) -> usize,
    {
        for ledger in &mut self.ledgers {
            ledger.reorder_by(|a, b| {
                category_rank(&a.category)
                    .cmp(&category_rank(&b.category))
                    .then_with(|| b.score.total_cmp(&a.score))
                    .then_with(|| a.product_id.cmp(&b.product_id))
            });
        }
    }

    /// Consumes the tracker, returning placements in fill order.
    pub fn into_placements(self) -> Vec<Placement> {
        self.ledgers
            .into_iter()
            .flat_map(ShelfLedger::into_placements)
            .collect()
    }
}
