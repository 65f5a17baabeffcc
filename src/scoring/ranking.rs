//! Deterministic candidate ranking.

use super::context::ScoringContext;
use super::strategy::Strategy;
use crate::model::Product;
use std::cmp::Ordering;

/// A scored product awaiting placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into the run's product slice.
    pub index: usize,

    /// Strategy score (higher = higher priority).
    pub score: f64,

    /// Forced-priority products are dequeued before all others.
    pub forced: bool,

    /// Position in the ranked queue (0 = first).
    pub rank: usize,
}

/// Orders two products by priority: forced first, then descending score,
/// descending sales velocity and ascending id.
///
/// `Ordering::Less` means `a` has higher priority.
pub fn priority_cmp(
    a: (&Product, f64, bool),
    b: (&Product, f64, bool),
) -> Ordering {
    let (pa, sa, fa) = a;
    let (pb, sb, fb) = b;
    fb.cmp(&fa)
        .then_with(|| sb.total_cmp(&sa))
        .then_with(|| pb.sales_velocity.total_cmp(&pa.sales_velocity))
        .then_with(|| pa.id.cmp(&pb.id))
}

/// Scores every product and returns candidates in placement order.
///
/// The order is total: no two distinct product ids compare equal, so
/// identical input always yields the identical queue.
///
/// # Examples
///
/// ```
/// use u_planogram::model::{Product, StoreTemplate};
/// use u_planogram::placement::PlacementConfig;
/// use u_planogram::scoring::{rank_candidates, ScoringContext, Strategy};
///
/// let products = vec![
///     Product::new("B", "case", 8.0, 12.0, 2.0).with_sales_velocity(40.0),
///     Product::new("A", "case", 8.0, 12.0, 2.0).with_sales_velocity(60.0),
/// ];
/// let ctx = ScoringContext::new(&products, &StoreTemplate::standard(), &PlacementConfig::default());
/// let ranked = rank_candidates(&products, Strategy::SalesVelocity, &ctx);
/// assert_eq!(ranked[0].index, 1);
/// assert!(ranked[0].forced);
/// ```
pub fn rank_candidates(
    products: &[Product],
    strategy: Strategy,
    ctx: &ScoringContext,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = products
        .iter()
        .enumerate()
        .map(|(index, product)| Candidate {
            index,
            score: strategy.score(product, ctx),
            forced: strategy.is_forced(product, ctx),
            rank: 0,
        })
        .collect();

    candidates.sort_by(|a, b| {
        priority_cmp(
            (&products[a.index], a.score, a.forced),
            (&products[b.index], b.score, b.forced),
        )
    });

    for (rank, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = rank;
    }
    candidates
}
