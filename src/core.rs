//! Core traits and the RANSAC engine.
//!
//! The engine is generic over a handful of small capability traits:
//! - [`Estimator`]: fits a model from a sample and measures residuals.
//! - [`Sampler`]: draws minimal samples.
//! - [`Scoring`]: decides inliers and ranks hypotheses.
//! - [`LocalOptimizer`]: refines a model from its inliers.
//! - [`TerminationCriterion`]: adapts the iteration budget.
//!
//! [`RansacEngine`] wires them together. It borrows the correspondences for the
//! duration of a call and owns everything else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::scoring::Score;
use crate::settings::{validate_confidence, validate_delta, RansacSettings};
use crate::types::WorkingSet;
use crate::utils::rmse;

/// Estimator responsible for generating model hypotheses.
pub trait Estimator {
    /// Single observation, e.g. a point correspondence.
    type Datum;
    /// Model type produced by this estimator.
    type Model: Clone;

    /// Size of a minimal sample for this estimator.
    fn sample_size(&self) -> usize;

    /// Fit a model to every datum yielded by `data`.
    ///
    /// Exact on a minimal sample, least squares on larger sets. Returns `None`
    /// for degenerate input.
    fn fit<'a, I>(&self, data: I) -> Option<Self::Model>
    where
        I: IntoIterator<Item = &'a Self::Datum>,
        I::IntoIter: Clone,
        Self::Datum: 'a;

    /// Squared residual of one datum under `model`.
    fn squared_residual(&self, model: &Self::Model, datum: &Self::Datum) -> f64;

    /// Check whether a given sample is usable before fitting.
    ///
    /// The default only rejects out-of-range and repeated indices.
    fn is_valid_sample(&self, data: &[Self::Datum], sample: &[usize]) -> bool {
        sample.len() >= self.sample_size()
            && sample.iter().all(|&i| i < data.len())
            && sample
                .iter()
                .enumerate()
                .all(|(k, i)| !sample[..k].contains(i))
    }

    /// Estimate a model from a minimal sample.
    fn estimate_model(&self, data: &[Self::Datum], sample: &[usize]) -> Option<Self::Model> {
        self.fit(sample.iter().map(|&i| &data[i]))
    }

    /// Estimate a model from an arbitrary subset of the working set.
    fn estimate_model_nonminimal(
        &self,
        data: &WorkingSet<'_, Self::Datum>,
        subset: &[usize],
    ) -> Option<Self::Model> {
        let data = *data;
        self.fit(subset.iter().map(move |&i| data.get(i)))
    }

    /// Ratio between the two sides of an edge joining `a` and `b`, once the
    /// model's scale is accounted for. `None` when the model family has no
    /// such notion.
    fn edge_length_ratio(
        &self,
        _model: &Self::Model,
        _a: &Self::Datum,
        _b: &Self::Datum,
    ) -> Option<f64> {
        None
    }
}

/// Sampler responsible for drawing minimal samples from the data.
pub trait Sampler {
    /// Draw `sample_size` distinct indices from `0..point_count` into `out_indices`.
    ///
    /// Returns `false` if a valid sample could not be drawn.
    fn sample(&mut self, point_count: usize, sample_size: usize, out_indices: &mut [usize]) -> bool;
}

/// Scoring strategy used to evaluate model quality and determine inliers.
pub trait Scoring<E: Estimator> {
    /// Inlier distance threshold.
    fn threshold(&self) -> f64;

    /// Cheap consistency checks on the sample a hypothesis was fitted from.
    fn is_consistent_sample(
        &self,
        _estimator: &E,
        _model: &E::Model,
        _data: &[E::Datum],
        _sample: &[usize],
    ) -> bool {
        true
    }

    /// Score a model over the whole working set and collect its inliers.
    fn score(
        &self,
        estimator: &E,
        model: &E::Model,
        data: &WorkingSet<'_, E::Datum>,
        inliers_out: &mut Vec<usize>,
    ) -> Score;
}

/// Local optimization strategy, refining a model using its inliers.
pub trait LocalOptimizer<E: Estimator> {
    /// Returns the refined model, or `None` to keep the input one.
    fn run(
        &mut self,
        estimator: &E,
        data: &WorkingSet<'_, E::Datum>,
        inliers: &[usize],
        model: &E::Model,
    ) -> Option<E::Model>;
}

/// Least squares optimizer that refits the model using all inliers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquaresOptimizer;

impl LeastSquaresOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl<E: Estimator> LocalOptimizer<E> for LeastSquaresOptimizer {
    fn run(
        &mut self,
        estimator: &E,
        data: &WorkingSet<'_, E::Datum>,
        inliers: &[usize],
        _model: &E::Model,
    ) -> Option<E::Model> {
        if inliers.len() < estimator.sample_size() {
            return None;
        }
        estimator.estimate_model_nonminimal(data, inliers)
    }
}

/// Termination criterion deciding when the RANSAC loop can stop.
pub trait TerminationCriterion {
    /// Update the iteration budget after a new best model.
    ///
    /// `point_count` is the size of the sampling data. Returns `true` if the
    /// loop should stop immediately.
    fn check(
        &mut self,
        point_count: usize,
        best_score: &Score,
        sample_size: usize,
        confidence: f64,
        max_iterations: &mut usize,
    ) -> bool;
}

/// Standard RANSAC termination: shrink the iteration budget to
/// `N = log(1 - confidence) / log(1 - w^k)` as the inlier ratio `w` grows.
#[derive(Debug, Clone, Copy)]
pub struct RansacTerminationCriterion {
    /// Stop outright once this fraction of the sampling data are inliers.
    pub early_exit_inlier_ratio: f64,
}

impl Default for RansacTerminationCriterion {
    fn default() -> Self {
        Self {
            early_exit_inlier_ratio: 1.0,
        }
    }
}

impl TerminationCriterion for RansacTerminationCriterion {
    fn check(
        &mut self,
        point_count: usize,
        best_score: &Score,
        sample_size: usize,
        confidence: f64,
        max_iterations: &mut usize,
    ) -> bool {
        if point_count == 0 {
            return false;
        }

        let inlier_ratio = (best_score.data_inlier_count as f64 / point_count as f64).clamp(0.0, 1.0);
        let required = adaptive_iteration_bound(inlier_ratio, sample_size, confidence, *max_iterations);
        if required < *max_iterations {
            *max_iterations = required;
        }

        inlier_ratio >= self.early_exit_inlier_ratio
    }
}

/// Number of iterations needed to draw one all-inlier sample of size
/// `sample_size` with probability `confidence`, clamped to `[1, max_iterations]`.
pub fn adaptive_iteration_bound(
    inlier_ratio: f64,
    sample_size: usize,
    confidence: f64,
    max_iterations: usize,
) -> usize {
    let max_iterations = max_iterations.max(1);
    if inlier_ratio <= 0.0 {
        return max_iterations;
    }

    let p_good_sample = inlier_ratio.powi(sample_size as i32);
    if p_good_sample >= 1.0 {
        return 1;
    }

    let log_one_minus_conf = (1.0 - confidence).ln();
    let log_one_minus_p = (1.0 - p_good_sample).ln();
    if !log_one_minus_conf.is_finite() || !log_one_minus_p.is_finite() || log_one_minus_p >= 0.0 {
        return max_iterations;
    }

    let required = (log_one_minus_conf / log_one_minus_p).ceil();
    if !required.is_finite() {
        return max_iterations;
    }
    (required as usize).clamp(1, max_iterations)
}

/// Why the sampling loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The adaptive bound fell below the hard cap and was reached.
    Converged,
    /// The hard iteration cap was reached.
    ExhaustedIterations,
    /// The best model reached the early-exit support ratio.
    EarlyExit,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Phase of the engine; the last value survives a call for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RansacState {
    Initialized,
    Sampling,
    Fitting,
    Scoring,
    Finished(TerminationReason),
}

/// Outcome of a successful [`RansacEngine::compute`].
#[derive(Debug, Clone)]
pub struct RansacReport<M> {
    /// Model refined over the consensus set.
    pub model: M,
    /// Working-set indices of the consensus set; agree data follow the
    /// sampling data.
    pub inliers: Vec<usize>,
    /// Inliers over the size of the working set.
    pub percentage_of_data_used: f64,
    /// Root mean square residual of the inliers under `model`.
    pub inlier_rmse: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    pub termination: TerminationReason,
}

/// RANSAC pipeline orchestrating the above components.
pub struct RansacEngine<'d, E, Sa, Sc, LO, T>
where
    E: Estimator,
    Sa: Sampler,
    Sc: Scoring<E>,
    LO: LocalOptimizer<E>,
    T: TerminationCriterion,
{
    pub settings: RansacSettings,
    pub estimator: E,
    pub sampler: Sa,
    pub scoring: Sc,
    pub local_optimizer: Option<LO>,
    pub final_optimizer: Option<LO>,
    pub termination: T,
    agree_data: &'d [E::Datum],
    cancel_flag: Option<Arc<AtomicBool>>,

    // Outputs / diagnostics of the last call
    pub state: RansacState,
    pub best_model: Option<E::Model>,
    pub best_inliers: Vec<usize>,
    pub best_score: Option<Score>,
    pub iteration: usize,
    pub iteration_bound: usize,
    pub degenerate_samples: usize,
}

impl<'d, E, Sa, Sc, LO, T> RansacEngine<'d, E, Sa, Sc, LO, T>
where
    E: Estimator,
    Sa: Sampler,
    Sc: Scoring<E>,
    LO: LocalOptimizer<E>,
    T: TerminationCriterion,
{
    /// Create a new pipeline from its components.
    pub fn new(
        settings: RansacSettings,
        estimator: E,
        sampler: Sa,
        scoring: Sc,
        local_optimizer: Option<LO>,
        final_optimizer: Option<LO>,
        termination: T,
    ) -> Self {
        let iteration_bound = settings.max_iterations;
        Self {
            settings,
            estimator,
            sampler,
            scoring,
            local_optimizer,
            final_optimizer,
            termination,
            agree_data: &[],
            cancel_flag: None,
            state: RansacState::Initialized,
            best_model: None,
            best_inliers: Vec::new(),
            best_score: None,
            iteration: 0,
            iteration_bound,
            degenerate_samples: 0,
        }
    }

    /// Trusted correspondences used to validate hypotheses, never sampled.
    ///
    /// Assumed disjoint from the data passed to [`compute`](Self::compute):
    /// an entry present in both is scored twice.
    pub fn set_agree_data(&mut self, agree_data: &'d [E::Datum]) {
        self.agree_data = agree_data;
    }

    pub fn agree_data(&self) -> &'d [E::Datum] {
        self.agree_data
    }

    /// Override the sample size. Must be positive; the upper bound is checked
    /// against the data in [`compute`](Self::compute).
    pub fn set_minimal_for_estimate(&mut self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(Error::config("minimal_for_estimate must be positive"));
        }
        self.settings.minimal_for_estimate = Some(k);
        Ok(())
    }

    /// Sample size used by the loop.
    pub fn minimal_for_estimate(&self) -> usize {
        self.settings
            .minimal_for_estimate
            .unwrap_or_else(|| self.estimator.sample_size())
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<()> {
        if max_iterations == 0 {
            return Err(Error::config("max_iterations must be positive"));
        }
        self.settings.max_iterations = max_iterations;
        Ok(())
    }

    /// Flag polled once per iteration; raising it stops the loop and keeps
    /// the best model found so far.
    pub fn set_cancellation_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel_flag = Some(flag);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn reset(&mut self) {
        self.state = RansacState::Initialized;
        self.best_model = None;
        self.best_inliers.clear();
        self.best_score = None;
        self.iteration = 0;
        self.iteration_bound = self.settings.max_iterations;
        self.degenerate_samples = 0;
    }

    fn validate(&self, data: &[E::Datum], confidence: f64) -> Result<usize> {
        let point_count = data.len();
        self.settings.validate()?;
        validate_confidence(confidence)?;
        validate_delta(self.scoring.threshold())?;

        let k = self.minimal_for_estimate();
        let estimator_min = self.estimator.sample_size();
        if k < estimator_min {
            return Err(Error::config(format!(
                "minimal_for_estimate {k} is below the {estimator_min} correspondences the estimator needs"
            )));
        }
        if k > point_count {
            return Err(Error::config(format!(
                "minimal_for_estimate {k} exceeds the {point_count} available correspondences"
            )));
        }
        // Only one sample exists, so a degenerate one can never succeed.
        if k == point_count {
            let all: Vec<usize> = (0..point_count).collect();
            if !self.estimator.is_valid_sample(data, &all) {
                return Err(Error::config(
                    "minimal_for_estimate equals the data size and the only possible sample is degenerate",
                ));
            }
        }
        Ok(k)
    }

    /// Run with the confidence from the settings.
    pub fn run(&mut self, data: &[E::Datum]) -> Result<RansacReport<E::Model>> {
        let confidence = self.settings.confidence;
        self.compute(data, confidence)
    }

    /// Run the RANSAC loop on `data`.
    ///
    /// `confidence` is the desired probability that at least one sample was
    /// outlier-free when the loop stops.
    pub fn compute(&mut self, data: &[E::Datum], confidence: f64) -> Result<RansacReport<E::Model>> {
        self.reset();
        let sample_size = self.validate(data, confidence)?;
        let working = WorkingSet::new(data, self.agree_data);

        let mut sample = vec![0usize; sample_size];
        let mut inliers = Vec::with_capacity(working.len());
        let mut lo_inliers = Vec::new();

        let mut max_iterations = self.settings.max_iterations;
        let min_iterations = self.settings.min_iterations.min(max_iterations);
        let mut stop_reason = None;

        while self.iteration < max_iterations || self.iteration < min_iterations {
            if self.is_cancelled() {
                stop_reason = Some(TerminationReason::Cancelled);
                break;
            }
            self.iteration += 1;

            self.state = RansacState::Sampling;
            if !self.sampler.sample(data.len(), sample_size, &mut sample) {
                continue;
            }
            if !self.estimator.is_valid_sample(data, &sample) {
                self.degenerate_samples += 1;
                continue;
            }

            self.state = RansacState::Fitting;
            let Some(model) = self.estimator.estimate_model(data, &sample) else {
                self.degenerate_samples += 1;
                continue;
            };
            if !self
                .scoring
                .is_consistent_sample(&self.estimator, &model, data, &sample)
            {
                continue;
            }

            self.state = RansacState::Scoring;
            let score = self
                .scoring
                .score(&self.estimator, &model, &working, &mut inliers);
            if self.best_score.as_ref().is_some_and(|best| score <= *best) {
                continue;
            }

            let (model, score) = match self.local_optimizer.as_mut() {
                Some(lo) => match lo.run(&self.estimator, &working, &inliers, &model) {
                    Some(refined) => {
                        let refined_score =
                            self.scoring
                                .score(&self.estimator, &refined, &working, &mut lo_inliers);
                        if refined_score > score {
                            std::mem::swap(&mut inliers, &mut lo_inliers);
                            (refined, refined_score)
                        } else {
                            (model, score)
                        }
                    }
                    None => (model, score),
                },
                None => (model, score),
            };

            log::debug!(
                "iteration {}: new best model with {} inliers ({} in sampling data)",
                self.iteration,
                score.inlier_count,
                score.data_inlier_count
            );
            self.best_model = Some(model);
            self.best_inliers.clear();
            self.best_inliers.extend_from_slice(&inliers);
            self.best_score = Some(score);

            let stop = self.termination.check(
                data.len(),
                &score,
                sample_size,
                confidence,
                &mut max_iterations,
            );
            self.iteration_bound = max_iterations;
            if stop {
                stop_reason = Some(TerminationReason::EarlyExit);
                break;
            }
        }

        let reason = stop_reason.unwrap_or(if self.iteration >= self.settings.max_iterations {
            TerminationReason::ExhaustedIterations
        } else {
            TerminationReason::Converged
        });
        self.state = RansacState::Finished(reason);

        let best_support = self.best_score.map_or(0, |s| s.inlier_count);
        let model = match self.best_model.take() {
            Some(model) if best_support >= sample_size => model,
            _ => {
                log::warn!(
                    "no model reached {} inliers after {} iterations (best support {})",
                    sample_size,
                    self.iteration,
                    best_support
                );
                self.best_inliers.clear();
                return Err(Error::EstimationFailure {
                    iterations: self.iteration,
                    best_support,
                    required: sample_size,
                });
            }
        };

        let model = match self.final_optimizer.as_mut() {
            Some(fo) => fo
                .run(&self.estimator, &working, &self.best_inliers, &model)
                .unwrap_or(model),
            None => model,
        };

        let sum_squared: f64 = self
            .best_inliers
            .iter()
            .map(|&i| self.estimator.squared_residual(&model, working.get(i)))
            .sum();
        let inlier_rmse = rmse(sum_squared, self.best_inliers.len());
        let percentage_of_data_used = self.best_inliers.len() as f64 / working.len() as f64;

        log::info!(
            "RANSAC finished after {} iterations ({:?}): {} inliers, {:.1}% of data, RMSE {:.6}, {} degenerate samples",
            self.iteration,
            reason,
            self.best_inliers.len(),
            100.0 * percentage_of_data_used,
            inlier_rmse,
            self.degenerate_samples
        );

        self.best_model = Some(model.clone());
        Ok(RansacReport {
            model,
            inliers: self.best_inliers.clone(),
            percentage_of_data_used,
            inlier_rmse,
            iterations: self.iteration,
            termination: reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::samplers::UniformRandomSampler;
    use crate::scoring::ConsensusScoring;

    /// One-dimensional "constant" model: the mean of the sample.
    struct MeanEstimator {
        min_samples: usize,
    }

    impl Estimator for MeanEstimator {
        type Datum = f64;
        type Model = f64;

        fn sample_size(&self) -> usize {
            self.min_samples
        }

        fn fit<'a, I>(&self, data: I) -> Option<f64>
        where
            I: IntoIterator<Item = &'a f64>,
            I::IntoIter: Clone,
            Self::Datum: 'a,
        {
            let (sum, n) = data
                .into_iter()
                .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
            (n >= self.min_samples).then(|| sum / n as f64)
        }

        fn squared_residual(&self, model: &f64, datum: &f64) -> f64 {
            (model - datum).powi(2)
        }
    }

    type MeanRansac<'d> = RansacEngine<
        'd,
        MeanEstimator,
        UniformRandomSampler,
        ConsensusScoring,
        LeastSquaresOptimizer,
        RansacTerminationCriterion,
    >;

    fn mean_ransac<'d>(min_samples: usize, delta: f64, seed: u64) -> MeanRansac<'d> {
        let settings = RansacSettings::default()
            .with_inlier_threshold(delta)
            .with_max_iterations(500)
            .with_seed(seed);
        RansacEngine::new(
            settings,
            MeanEstimator { min_samples },
            UniformRandomSampler::from_seed(seed),
            ConsensusScoring::new(delta).unwrap(),
            None,
            Some(LeastSquaresOptimizer),
            RansacTerminationCriterion::default(),
        )
    }

    fn mostly_constant() -> Vec<f64> {
        vec![5.0, 5.01, 4.99, 5.02, 4.98, 5.0, 5.005, 4.995, 100.0, -50.0, 33.0]
    }

    #[test]
    fn engine_finds_consensus_and_refines() {
        let data = mostly_constant();
        let mut ransac = mean_ransac(1, 0.1, 3);

        let report = ransac.run(&data).unwrap();

        assert_eq!(report.inliers, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert!((report.model - 5.0).abs() < 1e-3);
        assert!((report.percentage_of_data_used - 8.0 / 11.0).abs() < 1e-12);
        assert!(report.inlier_rmse < 0.02);
        assert!(matches!(ransac.state, RansacState::Finished(_)));
        assert_eq!(ransac.best_inliers, report.inliers);
    }

    #[test]
    fn adaptive_bound_matches_closed_form() {
        // log(0.01) / log(1 - 0.5^3) = 34.49
        assert_eq!(adaptive_iteration_bound(0.5, 3, 0.99, 10_000), 35);
        assert_eq!(adaptive_iteration_bound(1.0, 3, 0.99, 10_000), 1);
        assert_eq!(adaptive_iteration_bound(0.0, 3, 0.99, 10_000), 10_000);
        assert_eq!(adaptive_iteration_bound(0.5, 3, 0.99, 20), 20);
        assert_eq!(adaptive_iteration_bound(1e-9, 3, 0.99, 777), 777);
    }

    #[test]
    fn termination_shrinks_budget_and_exits_early() {
        let mut term = RansacTerminationCriterion::default();
        let mut max_iterations = 10_000;

        let half = Score::new(50, 50, 0.0);
        assert!(!term.check(100, &half, 3, 0.99, &mut max_iterations));
        assert_eq!(max_iterations, 35);

        let all = Score::new(100, 100, 0.0);
        assert!(term.check(100, &all, 3, 0.99, &mut max_iterations));
        assert_eq!(max_iterations, 1);
    }

    #[test]
    fn no_support_is_an_estimation_failure() {
        let data = vec![0.0, 10.0, 20.0, 30.0, 40.0];
        let mut ransac = mean_ransac(2, 0.1, 1);

        match ransac.run(&data) {
            Err(Error::EstimationFailure {
                best_support,
                required,
                ..
            }) => {
                assert!(best_support < 2);
                assert_eq!(required, 2);
            }
            other => panic!("expected estimation failure, got {other:?}"),
        }
        assert!(ransac.best_model.is_none());
        assert!(ransac.best_inliers.is_empty());
    }

    #[test]
    fn invalid_configuration_fails_before_sampling() {
        let data = mostly_constant();
        let mut ransac = mean_ransac(1, 0.1, 1);

        assert!(matches!(
            ransac.compute(&data, 1.5),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(ransac.iteration, 0);

        ransac.set_minimal_for_estimate(data.len() + 1).unwrap();
        assert!(matches!(
            ransac.run(&data),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(ransac.iteration, 0);

        assert!(ransac.set_minimal_for_estimate(0).is_err());
        assert!(ransac.set_max_iterations(0).is_err());
    }

    #[test]
    fn sample_size_below_estimator_minimum_is_rejected() {
        let data = mostly_constant();
        let mut ransac = mean_ransac(2, 0.1, 1);
        ransac.set_minimal_for_estimate(1).unwrap();
        assert!(matches!(
            ransac.run(&data),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn same_seed_gives_same_report() {
        let data = mostly_constant();
        let a = mean_ransac(1, 0.1, 42).run(&data).unwrap();
        let b = mean_ransac(1, 0.1, 42).run(&data).unwrap();

        assert_eq!(a.model, b.model);
        assert_eq!(a.inliers, b.inliers);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.inlier_rmse, b.inlier_rmse);
    }

    #[test]
    fn raised_cancellation_flag_stops_before_sampling() {
        let data = mostly_constant();
        let mut ransac = mean_ransac(1, 0.1, 5);
        let flag = Arc::new(AtomicBool::new(true));
        ransac.set_cancellation_flag(flag.clone());

        assert!(matches!(
            ransac.run(&data),
            Err(Error::EstimationFailure { iterations: 0, .. })
        ));
        assert_eq!(
            ransac.state,
            RansacState::Finished(TerminationReason::Cancelled)
        );

        flag.store(false, Ordering::Relaxed);
        assert!(ransac.run(&data).is_ok());
    }

    #[test]
    fn agree_data_is_scored_but_never_sampled() {
        let data = vec![5.0, 5.01, 4.99, 40.0];
        let agree = vec![5.0, 5.0, 5.0, 5.0, -7.0];
        let mut ransac = mean_ransac(1, 0.1, 9);
        ransac.set_agree_data(&agree);

        let report = ransac.run(&data).unwrap();
        assert_eq!(report.inliers, vec![0, 1, 2, 4, 5, 6, 7]);
        assert!((report.percentage_of_data_used - 7.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn agree_data_overlapping_the_data_counts_twice() {
        let data = vec![5.0, 5.01, 40.0];
        let mut ransac = mean_ransac(1, 0.1, 4);
        ransac.set_agree_data(&data);

        let report = ransac.run(&data).unwrap();
        assert_eq!(report.inliers, vec![0, 1, 3, 4]);
        assert!((report.percentage_of_data_used - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn whole_data_sample_is_deterministic() {
        let data = vec![1.0, 1.02, 0.98, 1.01];
        let mut ransac = mean_ransac(1, 0.1, 2);
        ransac.set_minimal_for_estimate(data.len()).unwrap();

        let report = ransac.run(&data).unwrap();
        assert_eq!(report.inliers, vec![0, 1, 2, 3]);
        assert!((report.model - 1.0025).abs() < 1e-12);
        assert_eq!(report.termination, TerminationReason::EarlyExit);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn best_support_never_decreases() {
        let data = mostly_constant();
        let mut ransac = mean_ransac(1, 0.1, 17);

        let mut last = 0;
        for budget in [1, 2, 5, 20, 200] {
            ransac.set_max_iterations(budget).unwrap();
            ransac.sampler = UniformRandomSampler::from_seed(17);
            if let Ok(report) = ransac.run(&data) {
                assert!(report.inliers.len() >= last);
                last = report.inliers.len();
            }
        }
        assert_eq!(last, 8);
    }
}
