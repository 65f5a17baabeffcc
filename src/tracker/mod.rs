//! Shelf capacity tracking.
//!
//! [`ShelfTracker`] is the per-run arena of shelf state. Each shelf has a
//! [`ShelfLedger`] holding its ordered [`Placement`]s, used width and
//! remaining width. Placement is tentative-free: a failed `try_place`
//! leaves the tracker untouched.

mod arena;
mod ledger;

pub use arena::ShelfTracker;
pub use ledger::{Placement, ShelfLedger};
