//! Consensus scoring.
//!
//! A datum agrees with a hypothesis when its squared residual is at most
//! `delta²`. Hypotheses are ranked by inlier count, then by the residual sum
//! of their inliers. [`ConsensusScoring`] also carries the optional sample
//! sanity checks run right after a minimal fit.

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{Estimator, Scoring};
use crate::error::Result;
use crate::settings::{validate_delta, validate_edge_length_tolerance, RansacSettings};
use crate::types::WorkingSet;
use crate::utils::MaybeSync;

/// Support of a hypothesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Score {
    /// Inliers over the whole working set.
    pub inlier_count: usize,
    /// Inliers among the sampling data only; drives the adaptive bound.
    pub data_inlier_count: usize,
    /// Sum of the squared residuals of the inliers.
    pub residual_sum: f64,
}

impl Score {
    pub fn new(inlier_count: usize, data_inlier_count: usize, residual_sum: f64) -> Self {
        Self {
            inlier_count,
            data_inlier_count,
            residual_sum,
        }
    }
}

// More inliers wins; ties go to the tighter fit.
impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.inlier_count.cmp(&other.inlier_count) {
            Ordering::Equal => other.residual_sum.partial_cmp(&self.residual_sum),
            ord => Some(ord),
        }
    }
}

/// Threshold scoring with the optional correspondence checks.
#[derive(Debug, Clone)]
pub struct ConsensusScoring {
    delta_squared: f64,
    check_correspondence_distance: bool,
    edge_length_tolerance: Option<f64>,
}

impl ConsensusScoring {
    pub fn new(delta: f64) -> Result<Self> {
        validate_delta(delta)?;
        Ok(Self {
            delta_squared: delta * delta,
            check_correspondence_distance: false,
            edge_length_tolerance: None,
        })
    }

    pub fn from_settings(settings: &RansacSettings) -> Result<Self> {
        let mut scoring = Self::new(settings.inlier_threshold)?;
        scoring.set_check_correspondence_distance(settings.check_correspondence_distance);
        scoring.set_check_edge_length(settings.edge_length_tolerance)?;
        Ok(scoring)
    }

    pub fn delta(&self) -> f64 {
        self.delta_squared.sqrt()
    }

    pub fn set_delta(&mut self, delta: f64) -> Result<()> {
        validate_delta(delta)?;
        self.delta_squared = delta * delta;
        Ok(())
    }

    /// Require each sampled correspondence to agree with the model fitted
    /// from it.
    pub fn set_check_correspondence_distance(&mut self, enabled: bool) {
        self.check_correspondence_distance = enabled;
    }

    /// Reject samples whose edges disagree in length by more than the
    /// tolerance band, e.g. `Some(0.9)` accepts ratios in `[0.9, 1/0.9]`.
    pub fn set_check_edge_length(&mut self, tolerance: Option<f64>) -> Result<()> {
        if let Some(tolerance) = tolerance {
            validate_edge_length_tolerance(tolerance)?;
        }
        self.edge_length_tolerance = tolerance;
        Ok(())
    }

    /// Agreement test for a single datum.
    pub fn agree<E: Estimator>(&self, estimator: &E, model: &E::Model, datum: &E::Datum) -> bool {
        estimator.squared_residual(model, datum) <= self.delta_squared
    }

    fn edges_consistent<E: Estimator>(
        &self,
        tolerance: f64,
        estimator: &E,
        model: &E::Model,
        data: &[E::Datum],
        sample: &[usize],
    ) -> bool {
        for (k, &i) in sample.iter().enumerate() {
            for &j in &sample[k + 1..] {
                let Some(ratio) = estimator.edge_length_ratio(model, &data[i], &data[j]) else {
                    continue;
                };
                if !ratio.is_finite() || ratio <= 0.0 || ratio.min(ratio.recip()) < tolerance {
                    return false;
                }
            }
        }
        true
    }
}

impl<E> Scoring<E> for ConsensusScoring
where
    E: Estimator + MaybeSync,
    E::Model: MaybeSync,
    E::Datum: MaybeSync,
{
    fn threshold(&self) -> f64 {
        self.delta()
    }

    fn is_consistent_sample(
        &self,
        estimator: &E,
        model: &E::Model,
        data: &[E::Datum],
        sample: &[usize],
    ) -> bool {
        if self.check_correspondence_distance
            && !sample
                .iter()
                .all(|&i| self.agree(estimator, model, &data[i]))
        {
            return false;
        }
        match self.edge_length_tolerance {
            Some(tolerance) => self.edges_consistent(tolerance, estimator, model, data, sample),
            None => true,
        }
    }

    fn score(
        &self,
        estimator: &E,
        model: &E::Model,
        data: &WorkingSet<'_, E::Datum>,
        inliers_out: &mut Vec<usize>,
    ) -> Score {
        inliers_out.clear();
        let sampling_len = data.sampling_len();
        let mut score = Score::default();

        #[cfg(feature = "parallel")]
        {
            let residuals: Vec<(usize, f64)> = (0..data.len())
                .into_par_iter()
                .filter_map(|i| {
                    let r = estimator.squared_residual(model, data.get(i));
                    (r <= self.delta_squared).then_some((i, r))
                })
                .collect();
            for (i, r) in residuals {
                inliers_out.push(i);
                score.residual_sum += r;
            }
        }

        #[cfg(not(feature = "parallel"))]
        for (i, datum) in data.iter().enumerate() {
            let r = estimator.squared_residual(model, datum);
            if r <= self.delta_squared {
                inliers_out.push(i);
                score.residual_sum += r;
            }
        }

        score.inlier_count = inliers_out.len();
        score.data_inlier_count = inliers_out.partition_point(|&i| i < sampling_len);
        score
    }
}
