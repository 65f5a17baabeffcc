//! Product scoring and ranking.
//!
//! Converts product attributes into a single comparable priority score
//! under one of five strategies:
//!
//! - **sales_velocity**: units/day, with a forced-priority override above
//!   a configurable threshold.
//! - **balanced**: weighted sum of normalised velocity, price and attach
//!   rate using the store's weight vector.
//! - **category_grouped**: category order first, velocity second.
//! - **value_density**: price per cm of facing width.
//! - **profit_efficiency**: margin per cm² of footprint.
//!
//! Scoring is a pure function of the product and a per-run
//! [`ScoringContext`]. Ranking applies one fixed tie-break for every
//! strategy: descending sales velocity, then ascending product id.

mod context;
mod ranking;
mod strategy;

pub use context::{ScoringContext, DEFAULT_CATEGORY_ORDER};
pub use ranking::{priority_cmp, rank_candidates, Candidate};
pub use strategy::Strategy;
