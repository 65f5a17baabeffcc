//! Placement run configuration.

use crate::error::{PlanogramError, Result};

/// Engine parameters for a placement run.
///
/// Store-specific constants (gap, facing multiplier, caps) live on the
/// [`StoreTemplate`](crate::model::StoreTemplate); this struct holds the
/// knobs of the algorithm itself.
///
/// # Examples
///
/// ```
/// use u_planogram::placement::PlacementConfig;
///
/// let config = PlacementConfig::default()
///     .with_forced_priority_threshold(40.0)
///     .with_bump_quantile(0.25)
///     .with_max_bump_retries(2)
///     .with_base_facings(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Sales velocity (units/day) above which the `sales_velocity`
    /// strategy marks a product as forced priority.
    pub forced_priority_threshold: f64,

    /// Apply the forced-priority rule under every strategy, not only
    /// `sales_velocity`. Forced products are then dequeued first even when
    /// their strategy score is low, which makes them evictable by
    /// higher-scored top-ranked candidates.
    pub forced_priority_all_strategies: bool,

    /// Fraction of the ranked candidate list allowed to trigger bumping.
    ///
    /// Forced-priority candidates may always bump. 0.0 restricts bumping
    /// to forced candidates only.
    pub bump_quantile: f64,

    /// How many times one product may be evicted and re-queued.
    pub max_bump_retries: usize,

    /// Facing count before the store's multiplier is applied.
    pub base_facings: u32,

    /// Utilization (%) below which a non-empty shelf is reported.
    pub underutilization_threshold: f64,

    /// Utilization (%) above which a shelf is reported as overcrowded.
    pub overcrowding_threshold: f64,

    /// Distinct categories per shelf tolerated under category grouping.
    pub max_categories_per_shelf: usize,

    /// Tolerance for width comparisons.
    pub epsilon: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            forced_priority_threshold: 50.0,
            forced_priority_all_strategies: false,
            bump_quantile: 0.2,
            max_bump_retries: 1,
            base_facings: 2,
            underutilization_threshold: 20.0,
            overcrowding_threshold: 95.0,
            max_categories_per_shelf: 3,
            epsilon: 1e-9,
        }
    }
}

impl PlacementConfig {
    pub fn with_forced_priority_threshold(mut self, units_per_day: f64) -> Self {
        self.forced_priority_threshold = units_per_day;
        self
    }

    pub fn with_forced_priority_all_strategies(mut self, enabled: bool) -> Self {
        self.forced_priority_all_strategies = enabled;
        self
    }

    pub fn with_bump_quantile(mut self, q: f64) -> Self {
        self.bump_quantile = q;
        self
    }

    pub fn with_max_bump_retries(mut self, n: usize) -> Self {
        self.max_bump_retries = n;
        self
    }

    pub fn with_base_facings(mut self, n: u32) -> Self {
        self.base_facings = n;
        self
    }

    pub fn with_underutilization_threshold(mut self, percent: f64) -> Self {
        self.underutilization_threshold = percent;
        self
    }

    pub fn with_overcrowding_threshold(mut self, percent: f64) -> Self {
        self.overcrowding_threshold = percent;
        self
    }

    pub fn with_max_categories_per_shelf(mut self, n: usize) -> Self {
        self.max_categories_per_shelf = n;
        self
    }

    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    /// Upper bound on placement attempts for `n` candidates.
    pub fn attempt_budget(&self, n: usize) -> usize {
        n.saturating_mul(1 + self.max_bump_retries)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.forced_priority_threshold.is_finite() || self.forced_priority_threshold < 0.0 {
            return Err(PlanogramError::InvalidConfig(format!(
                "forced_priority_threshold must be finite and non-negative, got {}",
                self.forced_priority_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.bump_quantile) {
            return Err(PlanogramError::InvalidConfig(format!(
                "bump_quantile must be in [0, 1], got {}",
                self.bump_quantile
            )));
        }
        if self.base_facings == 0 {
            return Err(PlanogramError::InvalidConfig(
                "base_facings must be at least 1".into(),
            ));
        }
        if !self.underutilization_threshold.is_finite() {
            return Err(PlanogramError::InvalidConfig(
                "underutilization_threshold must be finite".into(),
            ));
        }
        if !self.overcrowding_threshold.is_finite() {
            return Err(PlanogramError::InvalidConfig(
                "overcrowding_threshold must be finite".into(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(PlanogramError::InvalidConfig(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacementConfig::default();
        assert!((config.forced_priority_threshold - 50.0).abs() < 1e-10);
        assert_eq!(config.max_bump_retries, 1);
        assert_eq!(config.base_facings, 2);
        assert!(!config.forced_priority_all_strategies);
        assert!((config.overcrowding_threshold - 95.0).abs() < 1e-10);
        assert_eq!(config.max_categories_per_shelf, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_attempt_budget() {
        let config = PlacementConfig::default().with_max_bump_retries(2);
        assert_eq!(config.attempt_budget(10), 30);
        assert_eq!(config.attempt_budget(0), 0);
    }

    #[test]
    fn test_validate_bad_quantile() {
        let config = PlacementConfig::default().with_bump_quantile(1.5);
        assert!(matches!(
            config.validate(),
            Err(PlanogramError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_zero_base_facings() {
        let config = PlacementConfig::default().with_base_facings(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_threshold() {
        let config = PlacementConfig::default().with_forced_priority_threshold(-5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_non_finite_overcrowding() {
        let config = PlacementConfig::default().with_overcrowding_threshold(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_epsilon() {
        let config = PlacementConfig::default().with_epsilon(-1e-9);
        assert!(config.validate().is_err());
    }
}
