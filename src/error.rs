//! Error types.
//!
//! Only structurally invalid input aborts a run. Capacity exhaustion and
//! degraded data are reported inside the
//! [`OptimizationResult`](crate::placement::OptimizationResult) instead.

use thiserror::Error;

/// Malformed product, shelf or template data.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("product id must not be empty")]
    EmptyProductId,
    #[error("duplicate product id: {0}")]
    DuplicateProduct(String),
    #[error("product {product_id}: invalid {field} ({value})")]
    InvalidProductField {
        product_id: String,
        field: &'static str,
        value: f64,
    },
    #[error("product {product_id}: attach rate must be in [0, 1], got {value}")]
    InvalidAttachRate { product_id: String, value: f64 },
    #[error("store template has no shelves")]
    NoShelves,
    #[error("duplicate shelf id: {0}")]
    DuplicateShelf(u32),
    #[error("shelf {shelf_id}: invalid {field} ({value})")]
    InvalidShelfField {
        shelf_id: u32,
        field: &'static str,
        value: f64,
    },
    #[error("shelf {shelf_id}: eye-level score must be in [0, 1], got {value}")]
    InvalidEyeLevel { shelf_id: u32, value: f64 },
    #[error("min facings multiplier must be positive, got {0}")]
    InvalidMultiplier(f64),
    #[error("gap must be non-negative, got {0}")]
    InvalidGap(f64),
    #[error("weight {name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Crate-level error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlanogramError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("invalid placement config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlanogramError>;
