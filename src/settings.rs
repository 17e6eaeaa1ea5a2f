//! RANSAC configuration types.
//!
//! [`RansacSettings`] gathers every knob of the robust estimator in one plain
//! struct with sensible defaults. It is validated once, before any sampling,
//! so configuration mistakes fail fast instead of surfacing mid-loop.

use crate::error::{Error, Result};

/// Local optimization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalOptimizationType {
    /// Keep the model as estimated.
    None,
    /// Refit the model by least squares over its inliers.
    Lsq,
}

/// Main configuration object for the RANSAC engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RansacSettings {
    /// Minimum number of iterations, even if the adaptive bound is lower.
    pub min_iterations: usize,
    /// Hard iteration cap.
    pub max_iterations: usize,
    /// Inlier distance threshold (`delta`), in the units of the input points.
    pub inlier_threshold: f64,
    /// Desired probability of drawing at least one outlier-free sample.
    pub confidence: f64,
    /// Size of the random samples; `None` uses the estimator's minimum.
    pub minimal_for_estimate: Option<usize>,
    /// Stop as soon as this fraction of the sampling data are inliers.
    pub early_exit_inlier_ratio: f64,
    /// Require every sampled correspondence to agree with its own fit.
    pub check_correspondence_distance: bool,
    /// Minimum edge-length ratio between paired sample edges, e.g. `0.9`.
    pub edge_length_tolerance: Option<f64>,
    pub local_optimization: LocalOptimizationType,
    pub final_optimization: LocalOptimizationType,
    /// Seed of the sampling stream; `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for RansacSettings {
    fn default() -> Self {
        Self {
            min_iterations: 0,
            max_iterations: 10_000,
            inlier_threshold: 3.0,
            confidence: 0.99,
            minimal_for_estimate: None,
            early_exit_inlier_ratio: 1.0,
            check_correspondence_distance: false,
            edge_length_tolerance: None,
            local_optimization: LocalOptimizationType::Lsq,
            final_optimization: LocalOptimizationType::Lsq,
            seed: None,
        }
    }
}

impl RansacSettings {
    /// Iterations run even after the adaptive bound is met, capped by
    /// `max_iterations`.
    pub fn with_min_iterations(mut self, min_iterations: usize) -> Self {
        self.min_iterations = min_iterations;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_inlier_threshold(mut self, delta: f64) -> Self {
        self.inlier_threshold = delta;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_minimal_for_estimate(mut self, k: usize) -> Self {
        self.minimal_for_estimate = Some(k);
        self
    }

    pub fn with_edge_length_tolerance(mut self, tolerance: f64) -> Self {
        self.edge_length_tolerance = Some(tolerance);
        self
    }

    pub fn with_check_correspondence_distance(mut self, enabled: bool) -> Self {
        self.check_correspondence_distance = enabled;
        self
    }

    pub fn with_local_optimization(mut self, kind: LocalOptimizationType) -> Self {
        self.local_optimization = kind;
        self
    }

    pub fn with_final_optimization(mut self, kind: LocalOptimizationType) -> Self {
        self.final_optimization = kind;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the data-independent constraints.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::config("max_iterations must be positive"));
        }
        validate_delta(self.inlier_threshold)?;
        validate_confidence(self.confidence)?;
        if self.minimal_for_estimate == Some(0) {
            return Err(Error::config("minimal_for_estimate must be positive"));
        }
        if !(self.early_exit_inlier_ratio > 0.0 && self.early_exit_inlier_ratio <= 1.0) {
            return Err(Error::config(format!(
                "early_exit_inlier_ratio must be in (0, 1], got {}",
                self.early_exit_inlier_ratio
            )));
        }
        if let Some(tolerance) = self.edge_length_tolerance {
            validate_edge_length_tolerance(tolerance)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_delta(delta: f64) -> Result<()> {
    if !delta.is_finite() || delta < 0.0 {
        return Err(Error::config(format!(
            "inlier threshold must be finite and non-negative, got {delta}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_confidence(confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::config(format!(
            "confidence must be in (0, 1), got {confidence}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_edge_length_tolerance(tolerance: f64) -> Result<()> {
    if !(tolerance > 0.0 && tolerance <= 1.0) {
        return Err(Error::config(format!(
            "edge length tolerance must be in (0, 1], got {tolerance}"
        )));
    }
    Ok(())
}
