//! Input data model: products, shelves and store templates.
//!
//! All types here are immutable inputs to a placement run. They are
//! validated once, up front, by [`PlacementRunner`](crate::placement::PlacementRunner);
//! the engine never starts a run on invalid input.

mod product;
mod shelf;
mod store;

pub use product::Product;
pub use shelf::{Shelf, ShelfType, EYE_LEVEL_THRESHOLD};
pub use store::{
    GroupingStrategy, PlacementRules, ProductMixRules, ScoringWeights, StoreTemplate, StoreType,
};
