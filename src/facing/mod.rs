//! Facing allocation.
//!
//! Decides how many parallel front-facing units a product occupies,
//! bounded below by the store's facing multiplier and above by the
//! configured caps.

mod allocator;

pub use allocator::{allocate_facings, facing_cap, FacingAllocation};
