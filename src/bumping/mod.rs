//! Bumping: displacing lower-priority placements.
//!
//! When a candidate fits on no shelf, the [`BumpResolver`] looks for the
//! lowest-priority set of placed products whose removal frees enough
//! width. When a store or category product limit is reached, the set must
//! also free a product slot ([`SlotRequirement`]). Priority is monotonic:
//! a placement is only ever displaced by a candidate with a strictly
//! higher score.

mod resolver;

pub use resolver::{BumpResolver, Eviction, SlotRequirement};
