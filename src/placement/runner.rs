//! Placement Orchestrator: the priority-driven placement pass.
//!
//! [`PlacementRunner`] drives one run: validate → score and rank →
//! drain the candidate queue (direct placement, then bumping) → layout
//! post-processing → metrics.

use super::config::PlacementConfig;
use super::types::{
    CandidateState, LayoutMetrics, OptimizationResult, Rejection, RejectionReason, ShelfMetrics,
    Warning,
};
use crate::bumping::{BumpResolver, Eviction, SlotRequirement};
use crate::error::{Result, ValidationError};
use crate::facing::{allocate_facings, FacingAllocation};
use crate::model::{GroupingStrategy, Product, ProductMixRules, StoreTemplate};
use crate::scoring::{rank_candidates, Candidate, ScoringContext, Strategy};
use crate::tracker::{Placement, ShelfTracker};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::{debug, info, info_span, warn};

/// Outcome of a single placement attempt.
enum Attempt {
    Placed(Placement),
    Bumped(Eviction),
    Rejected(RejectionReason),
}

/// Mutable bookkeeping of one run, separate from shelf state.
struct RunState {
    states: Vec<CandidateState>,
    bump_counts: Vec<usize>,
    rejections: Vec<Rejection>,
    warnings: Vec<Warning>,
    attempts: usize,
    bumps: usize,
}

impl RunState {
    fn new(n: usize, warnings: Vec<Warning>) -> Self {
        Self {
            states: vec![CandidateState::Pending; n],
            bump_counts: vec![0; n],
            rejections: Vec::new(),
            warnings,
            attempts: 0,
            bumps: 0,
        }
    }

    fn transition(&mut self, index: usize, next: CandidateState) {
        debug_assert!(
            self.states[index].can_transition_to(next),
            "illegal candidate transition {:?} -> {:?}",
            self.states[index],
            next
        );
        self.states[index] = next;
    }

    fn reject(&mut self, product: &Product, index: usize, reason: RejectionReason) {
        self.transition(index, CandidateState::Rejected);
        debug!(product = %product.id, reason = %reason, "product rejected");
        self.rejections.push(Rejection {
            product_id: product.id.clone(),
            reason,
        });
    }
}

/// Executes placement runs.
pub struct PlacementRunner;

impl PlacementRunner {
    /// Runs one placement pass.
    ///
    /// Fails only on invalid input or configuration; capacity exhaustion
    /// is reported as rejections inside the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_planogram::model::{Product, StoreTemplate};
    /// use u_planogram::placement::{PlacementConfig, PlacementRunner};
    /// use u_planogram::scoring::Strategy;
    ///
    /// let products = vec![
    ///     Product::new("CABLE_USB_1M", "cable", 5.0, 15.0, 3.0).with_sales_velocity(12.0),
    ///     Product::new("CHARGER_20W", "charger", 6.0, 6.0, 6.0).with_sales_velocity(10.0),
    /// ];
    /// let result = PlacementRunner::run(
    ///     &products,
    ///     &StoreTemplate::standard(),
    ///     Strategy::SalesVelocity,
    ///     &PlacementConfig::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(result.placed_ids(), vec!["CABLE_USB_1M", "CHARGER_20W"]);
    /// assert!(result.rejections.is_empty());
    /// ```
    pub fn run(
        products: &[Product],
        template: &StoreTemplate,
        strategy: Strategy,
        config: &PlacementConfig,
    ) -> Result<OptimizationResult> {
        config.validate()?;
        validate_inputs(products, template)?;

        let span = info_span!(
            "placement_run",
            store = %template.name,
            strategy = %strategy
        );
        let _guard = span.enter();
        info!(
            products = products.len(),
            shelves = template.shelves.len(),
            "starting placement run"
        );

        let warnings = data_warnings(products, template, strategy);
        let ctx = ScoringContext::new(products, template, config);
        let ranked = rank_candidates(products, strategy, &ctx);

        // product index -> position in `ranked`
        let mut rank_of = vec![0; products.len()];
        for candidate in &ranked {
            rank_of[candidate.index] = candidate.rank;
        }
        let allocations: Vec<FacingAllocation> = products
            .iter()
            .map(|p| {
                allocate_facings(
                    p,
                    &template.placement_rules,
                    &template.mix_rules,
                    config,
                )
            })
            .collect();

        let mut tracker = ShelfTracker::new(template, config.epsilon);
        let resolver = BumpResolver::new(products, &template.mix_rules, config, products.len());
        let mut run = RunState::new(products.len(), warnings);
        let mut queue: VecDeque<Candidate> = ranked.iter().copied().collect();
        let budget = config.attempt_budget(products.len());

        while let Some(candidate) = queue.pop_front() {
            let index = candidate.index;
            let product = &products[index];

            run.transition(index, CandidateState::Attempting);
            if run.attempts >= budget {
                warn!(product = %product.id, budget, "attempt budget exhausted");
                run.reject(product, index, RejectionReason::RetryBudgetExhausted);
                continue;
            }
            run.attempts += 1;

            let alloc = allocations[index];
            match attempt(products, template, &mut tracker, &resolver, &candidate, alloc) {
                Attempt::Placed(placement) => {
                    run.transition(index, CandidateState::Placed);
                    debug!(
                        product = %placement.product_id,
                        shelf = placement.shelf_id,
                        facings = placement.facings,
                        offset = placement.offset,
                        "product placed"
                    );
                    if placement.facings < alloc.preferred {
                        run.warnings.push(Warning::ReducedFacings {
                            product_id: placement.product_id.clone(),
                            preferred: alloc.preferred,
                            placed: placement.facings,
                        });
                    }
                }
                Attempt::Bumped(eviction) => {
                    run.transition(index, CandidateState::Placed);
                    run.bumps += 1;
                    let evicted_ids: Vec<String> = eviction
                        .evicted
                        .iter()
                        .map(|p| p.product_id.clone())
                        .collect();
                    info!(
                        product = %product.id,
                        forced = candidate.forced,
                        shelf = eviction.placement.shelf_id,
                        evicted = ?evicted_ids,
                        "placed by eviction"
                    );
                    if eviction.placement.facings < alloc.preferred {
                        run.warnings.push(Warning::ReducedFacings {
                            product_id: product.id.clone(),
                            preferred: alloc.preferred,
                            placed: eviction.placement.facings,
                        });
                    }
                    run.warnings.push(Warning::Eviction {
                        candidate: product.id.clone(),
                        forced: candidate.forced,
                        shelf_id: eviction.placement.shelf_id,
                        evicted: evicted_ids,
                    });

                    for victim in eviction.evicted {
                        let v = victim.product_index;
                        run.bump_counts[v] += 1;
                        if run.bump_counts[v] <= config.max_bump_retries {
                            run.transition(v, CandidateState::BumpedRetry);
                            queue.push_back(ranked[rank_of[v]]);
                        } else {
                            run.reject(&products[v], v, RejectionReason::RetryBudgetExhausted);
                        }
                    }
                }
                Attempt::Rejected(reason) => run.reject(product, index, reason),
            }
        }
        debug_assert!(
            run.states.iter().all(|s| s.is_terminal()),
            "candidate left the queue without a verdict"
        );

        if template.placement_rules.grouping == GroupingStrategy::Category {
            tracker.group_by_category(|category| ctx.category_rank(category));
        }

        let minimum = template.mix_rules.min_products_per_category;
        if minimum > 0 {
            for (category, placed) in tracker.category_counts() {
                if placed < minimum {
                    run.warnings.push(Warning::CategoryBelowMinimum {
                        category,
                        placed,
                        minimum,
                    });
                }
            }
        }

        let metrics = layout_metrics(products, &tracker);
        let diagnostics = layout_warnings(products, template, config, &tracker, &metrics);
        run.warnings.extend(diagnostics);

        let placements = tracker.into_placements();
        info!(
            placed = placements.len(),
            rejected = run.rejections.len(),
            warnings = run.warnings.len(),
            bumps = run.bumps,
            attempts = run.attempts,
            utilization = metrics.average_utilization,
            "placement run complete"
        );

        Ok(OptimizationResult {
            strategy,
            placements,
            rejections: run.rejections,
            warnings: run.warnings,
            metrics,
            attempts: run.attempts,
            bumps: run.bumps,
        })
    }

    /// Runs with a strategy given by name (`"sales_velocity"`, `"balanced"`, ...).
    pub fn run_named(
        products: &[Product],
        template: &StoreTemplate,
        strategy: &str,
        config: &PlacementConfig,
    ) -> Result<OptimizationResult> {
        let strategy: Strategy = strategy.parse()?;
        Self::run(products, template, strategy, config)
    }
}

/// One placement attempt: limits, direct placement, then bumping.
///
/// At a product limit direct placement is skipped; an eligible candidate
/// may still enter by evicting a product that frees the slot.
fn attempt(
    products: &[Product],
    template: &StoreTemplate,
    tracker: &mut ShelfTracker<'_>,
    resolver: &BumpResolver<'_>,
    candidate: &Candidate,
    alloc: FacingAllocation,
) -> Attempt {
    let product = &products[candidate.index];

    if let Some(cap) = template.mix_rules.max_categories {
        let counts = tracker.category_counts();
        if !counts.contains_key(&product.category) && counts.len() >= cap {
            return Attempt::Rejected(RejectionReason::CategoryCapReached);
        }
    }

    if !template.shelves.iter().any(|s| s.fits_dimensions(product)) {
        return Attempt::Rejected(RejectionReason::ExceedsShelfDimensions);
    }

    let slot = slot_requirement(&template.mix_rules, tracker, product);
    if slot == SlotRequirement::WidthOnly {
        for shelf in 0..tracker.shelf_count() {
            for facings in alloc.attempts() {
                if let Some(placement) = tracker.try_place(
                    shelf,
                    product,
                    candidate.index,
                    facings,
                    candidate.score,
                    candidate.forced,
                ) {
                    return Attempt::Placed(placement);
                }
            }
        }
    }

    let limit = match slot {
        SlotRequirement::WidthOnly => None,
        SlotRequirement::AnyProduct => Some(RejectionReason::ProductLimitReached),
        SlotRequirement::SameCategory => Some(RejectionReason::CategoryProductLimitReached),
    };
    if !resolver.is_eligible(candidate) {
        return Attempt::Rejected(limit.unwrap_or(RejectionReason::InsufficientWidth));
    }
    match resolver.resolve(tracker, candidate, alloc, slot) {
        Some(eviction) => Attempt::Bumped(eviction),
        None => Attempt::Rejected(limit.unwrap_or(RejectionReason::NoEvictionCandidate)),
    }
}

/// Which product slot, if any, a candidate must free before it can enter.
fn slot_requirement(
    mix: &ProductMixRules,
    tracker: &ShelfTracker<'_>,
    product: &Product,
) -> SlotRequirement {
    if mix
        .max_products_per_category
        .is_some_and(|max| tracker.category_count(&product.category) >= max)
    {
        SlotRequirement::SameCategory
    } else if mix
        .max_products
        .is_some_and(|max| tracker.placed_count() >= max)
    {
        SlotRequirement::AnyProduct
    } else {
        SlotRequirement::WidthOnly
    }
}

fn validate_inputs(products: &[Product], template: &StoreTemplate) -> Result<()> {
    template.validate()?;
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        product.validate()?;
        if !seen.insert(product.id.as_str()) {
            return Err(ValidationError::DuplicateProduct(product.id.clone()).into());
        }
    }
    Ok(())
}

/// Degraded-data warnings known before the pass starts.
fn data_warnings(products: &[Product], template: &StoreTemplate, strategy: Strategy) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if !template.weights.is_normalized() {
        let sum = template.weights.sum();
        warn!(sum, "scoring weights are not normalized");
        warnings.push(Warning::WeightsNotNormalized { sum });
    }

    if strategy.uses_margin() {
        for product in products.iter().filter(|p| p.profit_margin.is_none()) {
            warn!(product = %product.id, "missing profit margin, scoring as 0");
            warnings.push(Warning::MissingProfitMargin {
                product_id: product.id.clone(),
            });
        }
    }

    warnings
}

fn layout_metrics(products: &[Product], tracker: &ShelfTracker<'_>) -> LayoutMetrics {
    let shelves: Vec<ShelfMetrics> = tracker
        .ledgers()
        .iter()
        .map(|ledger| {
            let shelf = ledger.shelf();
            let categories: BTreeSet<&str> = ledger
                .placements()
                .iter()
                .map(|p| p.category.as_str())
                .collect();
            ShelfMetrics {
                shelf_id: shelf.id,
                name: shelf.name.clone(),
                shelf_type: shelf.shelf_type,
                eye_level: shelf.is_eye_level(),
                width: shelf.width,
                used_width: ledger.used_width(),
                remaining_width: ledger.remaining_width(),
                utilization: ledger.utilization(),
                products: ledger.placements().len(),
                facings: ledger.total_facings(),
                categories: categories.len(),
            }
        })
        .collect();

    let mut category_facings: BTreeMap<String, u32> = BTreeMap::new();
    let mut facings_by_product: BTreeMap<String, u32> = BTreeMap::new();
    let mut occupied = 0.0;
    let mut profit = 0.0;
    let mut quantity = 0.0;
    for placement in tracker.placements() {
        *category_facings
            .entry(placement.category.clone())
            .or_insert(0) += placement.facings;
        facings_by_product.insert(placement.product_id.clone(), placement.facings);

        let product = &products[placement.product_index];
        let units = product.sales_velocity * placement.facings as f64;
        occupied += placement.width;
        quantity += units;
        profit += product.profit_margin.unwrap_or(product.price) * units;
    }
    let density = |total: f64| if occupied > 0.0 { total / occupied } else { 0.0 };

    let average_utilization = if shelves.is_empty() {
        0.0
    } else {
        shelves.iter().map(|s| s.utilization).sum::<f64>() / shelves.len() as f64
    };

    LayoutMetrics {
        total_products: shelves.iter().map(|s| s.products).sum(),
        total_facings: shelves.iter().map(|s| s.facings).sum(),
        average_utilization,
        category_distribution: tracker.category_counts(),
        category_facings,
        facings_by_product,
        profit_density: density(profit),
        quantity_density: density(quantity),
        eye_level_shelves: tracker
            .ledgers()
            .iter()
            .filter(|l| l.shelf().is_eye_level())
            .count(),
        premium_shelves: tracker
            .ledgers()
            .iter()
            .filter(|l| l.shelf().is_premium())
            .count(),
        shelves,
    }
}

/// Layout diagnostics computed after the pass.
fn layout_warnings(
    products: &[Product],
    template: &StoreTemplate,
    config: &PlacementConfig,
    tracker: &ShelfTracker<'_>,
    metrics: &LayoutMetrics,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let grouped = template.placement_rules.grouping == GroupingStrategy::Category;

    for shelf in &metrics.shelves {
        if shelf.products > 0 && shelf.utilization < config.underutilization_threshold {
            warnings.push(Warning::UnderutilizedShelf {
                shelf_id: shelf.shelf_id,
                utilization: shelf.utilization,
            });
        } else if shelf.utilization > config.overcrowding_threshold {
            warnings.push(Warning::OvercrowdedShelf {
                shelf_id: shelf.shelf_id,
                utilization: shelf.utilization,
            });
        }
        if grouped && shelf.categories > config.max_categories_per_shelf {
            warnings.push(Warning::TooManyCategoriesOnShelf {
                shelf_id: shelf.shelf_id,
                categories: shelf.categories,
                maximum: config.max_categories_per_shelf,
            });
        }
    }

    let eye_level_prices: Vec<f64> = tracker
        .ledgers()
        .iter()
        .filter(|l| l.shelf().is_eye_level())
        .flat_map(|l| l.placements())
        .map(|p| products[p.product_index].price)
        .collect();
    if !eye_level_prices.is_empty() {
        let eye_level_average =
            eye_level_prices.iter().sum::<f64>() / eye_level_prices.len() as f64;
        let catalogue_average =
            products.iter().map(|p| p.price).sum::<f64>() / products.len() as f64;
        if eye_level_average < catalogue_average {
            warnings.push(Warning::EyeLevelBelowAveragePrice {
                eye_level_average,
                catalogue_average,
            });
        }
    }

    for warning in &warnings {
        debug!(%warning, "layout diagnostic");
    }
    warnings
}
