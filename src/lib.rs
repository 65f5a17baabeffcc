//! Placement optimization engine for retail accessory planograms.
//!
//! Turns ranked product attributes (sales velocity, price, margin, attach
//! rate) into a concrete shelf layout (shelf, offset, facing count) under
//! hard width and category constraints:
//!
//! - **Scoring**: five interchangeable strategies behind a closed
//!   [`Strategy`](scoring::Strategy) enum, with a total deterministic
//!   tie-break.
//! - **Facing**: conservative facing counts bounded by store rules.
//! - **Tracker**: per-run shelf state (used width, ordered placements).
//! - **Bumping**: evicting strictly lower-priority placements for
//!   forced-priority or top-ranked candidates.
//! - **Placement**: the orchestrator producing an
//!   [`OptimizationResult`](placement::OptimizationResult) with
//!   placements, rejections, warnings and metrics.
//!
//! The engine is a greedy priority heuristic, not an exact solver: the same
//! input always yields the same layout.
//!
//! # Example
//!
//! ```
//! use u_planogram::model::{Product, StoreTemplate};
//! use u_planogram::placement::{PlacementConfig, PlacementRunner};
//! use u_planogram::scoring::Strategy;
//!
//! let products = vec![
//!     Product::new("CASE_CLEAR", "case", 8.0, 15.0, 2.0).with_sales_velocity(65.0),
//!     Product::new("CABLE_1M", "cable", 5.0, 15.0, 3.0).with_sales_velocity(20.0),
//! ];
//! let result = PlacementRunner::run(
//!     &products,
//!     &StoreTemplate::express(),
//!     Strategy::SalesVelocity,
//!     &PlacementConfig::default(),
//! )?;
//! assert!(result.placement("CASE_CLEAR").unwrap().forced);
//! # Ok::<(), u_planogram::PlanogramError>(())
//! ```

pub mod bumping;
pub mod error;
pub mod facing;
pub mod model;
pub mod placement;
pub mod scoring;
pub mod tracker;

pub use error::{PlanogramError, Result, ValidationError};
