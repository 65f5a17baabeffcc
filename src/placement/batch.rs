//! Independent runs across (category, store format, strategy) combinations.

use super::config::PlacementConfig;
use super::runner::PlacementRunner;
use super::types::OptimizationResult;
use crate::error::Result;
use crate::model::{Product, StoreTemplate};
use crate::scoring::Strategy;
use tracing::info;

/// One self-contained placement run.
#[derive(Debug, Clone)]
pub struct PlacementJob {
    /// Caller-chosen label, e.g. `"iphone/flagship/balanced"`.
    pub label: String,
    pub products: Vec<Product>,
    pub template: StoreTemplate,
    pub strategy: Strategy,
}

impl PlacementJob {
    pub fn new(
        label: impl Into<String>,
        products: Vec<Product>,
        template: StoreTemplate,
        strategy: Strategy,
    ) -> Self {
        Self {
            label: label.into(),
            products,
            template,
            strategy,
        }
    }

    /// Every `template × strategy` combination for one product set,
    /// labelled `"{store_type}/{strategy}"`.
    pub fn grid(products: &[Product], templates: &[StoreTemplate], strategies: &[Strategy]) -> Vec<Self> {
        templates
            .iter()
            .flat_map(|template| {
                strategies.iter().map(move |&strategy| {
                    Self::new(
                        format!("{}/{}", template.store_type.as_str(), strategy),
                        products.to_vec(),
                        template.clone(),
                        strategy,
                    )
                })
            })
            .collect()
    }

    pub fn run(&self, config: &PlacementConfig) -> Result<OptimizationResult> {
        PlacementRunner::run(&self.products, &self.template, self.strategy, config)
    }
}

/// Runs every job, returning results in job order.
///
/// Jobs share no state; with the `parallel` feature they run on the rayon
/// thread pool.
pub fn run_batch(jobs: &[PlacementJob], config: &PlacementConfig) -> Vec<Result<OptimizationResult>> {
    info!(jobs = jobs.len(), "starting placement batch");

    #[cfg(feature = "parallel")]
    let results: Vec<Result<OptimizationResult>> = {
        use rayon::prelude::*;
        jobs.par_iter().map(|job| job.run(config)).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<OptimizationResult>> = jobs.iter().map(|job| job.run(config)).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(jobs = jobs.len(), failed, "placement batch complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<Product> {
        vec![
            Product::new("CASE_A", "case", 8.0, 15.0, 2.0)
                .with_sales_velocity(20.0)
                .with_price(30.0),
            Product::new("CABLE_B", "cable", 5.0, 15.0, 3.0)
                .with_sales_velocity(12.0)
                .with_price(19.0),
        ]
    }

    #[test]
    fn test_grid_labels() {
        let jobs = PlacementJob::grid(
            &catalogue(),
            &[StoreTemplate::express(), StoreTemplate::flagship()],
            &[Strategy::Balanced, Strategy::ValueDensity],
        );
        let labels: Vec<&str> = jobs.iter().map(|j| j.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "express/balanced",
                "express/value_density",
                "flagship/balanced",
                "flagship/value_density",
            ]
        );
    }

    #[test]
    fn test_batch_matches_individual_runs() {
        let jobs = PlacementJob::grid(
            &catalogue(),
            &[StoreTemplate::express(), StoreTemplate::standard()],
            &Strategy::ALL,
        );
        let config = PlacementConfig::default();
        let results = run_batch(&jobs, &config);
        assert_eq!(results.len(), jobs.len());
        for (job, result) in jobs.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap(), &job.run(&config).unwrap());
        }
    }

    #[test]
    fn test_batch_reports_invalid_job() {
        let bad = PlacementJob::new(
            "bad",
            vec![Product::new("", "case", 1.0, 1.0, 1.0)],
            StoreTemplate::express(),
            Strategy::Balanced,
        );
        let good = PlacementJob::new("good", catalogue(), StoreTemplate::express(), Strategy::Balanced);
        let results = run_batch(&[bad, good], &PlacementConfig::default());
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
