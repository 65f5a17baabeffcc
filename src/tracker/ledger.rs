//! Per-shelf occupancy ledger.

use crate::model::Shelf;

/// A product placed on a shelf. The output unit of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub product_id: String,
    pub category: String,
    pub shelf_id: u32,
    pub facings: u32,
    /// Distance from the shelf's left edge in cm.
    pub offset: f64,
    /// Occupied width (facing width × facings), excluding the gap.
    pub width: f64,
    /// Score that justified inclusion.
    pub score: f64,
    /// Whether the product was placed as forced priority.
    pub forced: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) product_index: usize,
}

impl Placement {
    /// Occupied width plus the trailing gap.
    pub fn footprint(&self, gap: f64) -> f64 {
        self.width + gap
    }
}

/// Mutable occupancy of one shelf during a run.
///
/// Placements are contiguous from the left edge; each consumes its width
/// plus the store gap. The sum of footprints never exceeds the shelf width.
#[derive(Debug, Clone)]
pub struct ShelfLedger<'a> {
    shelf: &'a Shelf,
    gap: f64,
    used: f64,
    placements: Vec<Placement>,
}

impl<'a> ShelfLedger<'a> {
    pub fn new(shelf: &'a Shelf, gap: f64) -> Self {
        Self {
            shelf,
            gap,
            used: 0.0,
            placements: Vec::new(),
        }
    }

    pub fn shelf(&self) -> &'a Shelf {
        self.shelf
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Width consumed by placements and their gaps.
    pub fn used_width(&self) -> f64 {
        self.used
    }

    pub fn remaining_width(&self) -> f64 {
        (self.shelf.width - self.used).max(0.0)
    }

    /// Used width as a percentage of the shelf width.
    pub fn utilization(&self) -> f64 {
        self.used / self.shelf.width * 100.0
    }

    pub fn total_facings(&self) -> u32 {
        self.placements.iter().map(|p| p.facings).sum()
    }

    /// Width (with gap) a product would need at the given facing count.
    pub fn required_width(&self, facing_width: f64, facings: u32) -> f64 {
        facing_width * facings as f64 + self.gap
    }

    pub fn can_fit(&self, required: f64, epsilon: f64) -> bool {
        required <= self.remaining_width() + epsilon
    }

    /// Appends a placement at the current right edge.
    pub(crate) fn push(&mut self, mut placement: Placement) -> Placement {
        placement.offset = self.used;
        placement.shelf_id = self.shelf.id;
        self.used += placement.footprint(self.gap);
        self.placements.push(placement.clone());
        placement
    }

    /// Removes a placement by product id and closes the hole it leaves.
    pub(crate) fn remove(&mut self, product_id: &str) -> Option<Placement> {
        let pos = self
            .placements
            .iter()
            .position(|p| p.product_id == product_id)?;
        let removed = self.placements.remove(pos);
        self.reflow();
        Some(removed)
    }

    /// Reorders placements with a comparator and recomputes offsets.
    pub(crate) fn reorder_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Placement, &Placement) -> std::cmp::Ordering,
    {
        self.placements.sort_by(compare);
        self.reflow();
    }

    /// Recomputes offsets left to right and the used width from scratch.
    fn reflow(&mut self) {
        let mut x = 0.0;
        for placement in &mut self.placements {
            placement.offset = x;
            x += placement.width + self.gap;
        }
        self.used = x;
    }

    pub(crate) fn into_placements(self) -> Vec<Placement> {
        self.placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(id: &str, width: f64) -> Placement {
        Placement {
            product_id: id.into(),
            category: "case".into(),
            shelf_id: 0,
            facings: 1,
            offset: 0.0,
            width,
            score: 1.0,
            forced: false,
            product_index: 0,
        }
    }

    #[test]
    fn test_push_offsets_and_remaining() {
        let shelf = Shelf::new(3, "S", 100.0, 30.0, 30.0, 0.5);
        let mut ledger = ShelfLedger::new(&shelf, 2.0);
        let a = ledger.push(placement("a", 20.0));
        let b = ledger.push(placement("b", 30.0));

        assert_eq!(a.shelf_id, 3);
        assert!((a.offset - 0.0).abs() < 1e-10);
        assert!((b.offset - 22.0).abs() < 1e-10);
        assert!((ledger.used_width() - 54.0).abs() < 1e-10);
        assert!((ledger.remaining_width() - 46.0).abs() < 1e-10);
        assert!((ledger.utilization() - 54.0).abs() < 1e-10);
    }

    #[test]
    fn test_remove_reflows() {
        let shelf = Shelf::new(0, "S", 100.0, 30.0, 30.0, 0.5);
        let mut ledger = ShelfLedger::new(&shelf, 1.0);
        ledger.push(placement("a", 20.0));
        ledger.push(placement("b", 30.0));
        ledger.push(placement("c", 10.0));

        let removed = ledger.remove("a").unwrap();
        assert_eq!(removed.product_id, "a");
        let offsets: Vec<f64> = ledger.placements().iter().map(|p| p.offset).collect();
        assert_eq!(offsets, vec![0.0, 31.0]);
        assert!((ledger.remaining_width() - 58.0).abs() < 1e-10);
        assert!(ledger.remove("a").is_none());
    }

    #[test]
    fn test_can_fit_boundary() {
        let shelf = Shelf::new(0, "S", 100.0, 30.0, 30.0, 0.5);
        let ledger = ShelfLedger::new(&shelf, 0.0);
        assert!(ledger.can_fit(100.0, 1e-9));
        assert!(!ledger.can_fit(100.1, 1e-9));
        assert!((ledger.required_width(8.0, 3) - 24.0).abs() < 1e-10);
    }
}
