//! Placement Orchestrator.
//!
//! Drives one deterministic, priority-driven pass per run:
//!
//! 1. Validate products, store template and configuration.
//! 2. Score and rank candidates (forced-priority products first).
//! 3. Drain the queue: direct placement on shelves in fill order, falling
//!    back to bumping; evicted products are re-queued up to
//!    `max_bump_retries` times.
//! 4. Optional category grouping, then metrics and warnings.
//!
//! The loop performs at most `N × (1 + max_bump_retries)` attempts.
//!
//! Runs share no state; [`run_batch`] executes independent jobs.

mod batch;
mod config;
mod runner;
mod types;

pub use batch::{run_batch, PlacementJob};
pub use config::PlacementConfig;
pub use runner::PlacementRunner;
pub use types::{
    CandidateState, LayoutMetrics, OptimizationResult, Rejection, RejectionReason, ShelfMetrics,
    Warning,
};
