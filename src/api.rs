//! High-level Rust API.
//!
//! This module provides user-friendly functions for registering two 3D point
//! sets, plus the direct (non-robust) estimation entry points.

use nalgebra::DMatrix;

use crate::core::{
    LeastSquaresOptimizer, RansacEngine, RansacReport, RansacTerminationCriterion,
};
use crate::error::Result;
use crate::estimators::SimilarityEstimator;
use crate::models::SimilarityTransform;
use crate::samplers::UniformRandomSampler;
use crate::scoring::ConsensusScoring;
use crate::settings::{LocalOptimizationType, RansacSettings};
use crate::types::{
    correspondences_from_matrix, correspondences_from_point_sets, Correspondence, DataMatrix,
};

/// Result of a robust registration.
pub type EstimationResult = RansacReport<SimilarityTransform>;

/// RANSAC pipeline for similarity and rigid transforms.
pub type SimilarityRansac<'d> = RansacEngine<
    'd,
    SimilarityEstimator,
    UniformRandomSampler,
    ConsensusScoring,
    LeastSquaresOptimizer,
    RansacTerminationCriterion,
>;

fn optimizer(kind: LocalOptimizationType) -> Option<LeastSquaresOptimizer> {
    match kind {
        LocalOptimizationType::None => None,
        LocalOptimizationType::Lsq => Some(LeastSquaresOptimizer::new()),
    }
}

impl<'d> SimilarityRansac<'d> {
    /// Assemble the pipeline described by `settings`.
    pub fn from_settings(settings: RansacSettings, estimator: SimilarityEstimator) -> Result<Self> {
        settings.validate()?;
        let scoring = ConsensusScoring::from_settings(&settings)?;
        let sampler = UniformRandomSampler::from_optional_seed(settings.seed);
        let termination = RansacTerminationCriterion {
            early_exit_inlier_ratio: settings.early_exit_inlier_ratio,
        };
        let local_optimizer = optimizer(settings.local_optimization);
        let final_optimizer = optimizer(settings.final_optimization);

        Ok(RansacEngine::new(
            settings,
            estimator,
            sampler,
            scoring,
            local_optimizer,
            final_optimizer,
            termination,
        ))
    }
}

fn register(
    estimator: SimilarityEstimator,
    data: &[Correspondence],
    agree_data: &[Correspondence],
    threshold: f64,
    settings_opt: Option<RansacSettings>,
) -> Result<EstimationResult> {
    let settings = settings_opt
        .unwrap_or_default()
        .with_inlier_threshold(threshold);
    let mut ransac = SimilarityRansac::from_settings(settings, estimator)?;
    ransac.set_agree_data(agree_data);
    ransac.run(data)
}

/// Estimate a similarity transform mapping `points_fixed` onto `points_moving`.
///
/// # Arguments
/// * `points_fixed` - Fixed 3D points (Nx3 matrix)
/// * `points_moving` - Matching moving 3D points (Nx3 matrix)
/// * `threshold` - Inlier distance threshold
/// * `settings_opt` - Optional RANSAC settings (uses defaults if None)
///
/// # Returns
/// [`EstimationResult`] with the transform, inliers, data percentage and RMSE.
///
/// # Example
/// ```
/// use landmark_ransac::api::estimate_similarity_transform;
/// use landmark_ransac::settings::RansacSettings;
/// use nalgebra::DMatrix;
///
/// let fixed = DMatrix::from_row_slice(4, 3, &[
///     0.0, 0.0, 0.0,
///     1.0, 0.0, 0.0,
///     0.0, 1.0, 0.0,
///     0.0, 0.0, 1.0,
/// ]);
/// // Scale by two and shift along x.
/// let moving = fixed.map(|v| 2.0 * v) + DMatrix::from_fn(4, 3, |_, c| if c == 0 { 1.0 } else { 0.0 });
///
/// let settings = RansacSettings::default().with_seed(7);
/// let result = estimate_similarity_transform(&fixed, &moving, 0.01, Some(settings)).unwrap();
/// assert!((result.model.scale - 2.0).abs() < 1e-9);
/// assert_eq!(result.inliers.len(), 4);
/// ```
pub fn estimate_similarity_transform(
    points_fixed: &DMatrix<f64>,
    points_moving: &DMatrix<f64>,
    threshold: f64,
    settings_opt: Option<RansacSettings>,
) -> Result<EstimationResult> {
    let data = correspondences_from_point_sets(points_fixed, points_moving)?;
    register(SimilarityEstimator::new(), &data, &[], threshold, settings_opt)
}

/// Estimate a rigid transform (unit scale) mapping `points_fixed` onto
/// `points_moving`. Same arguments as [`estimate_similarity_transform`].
pub fn estimate_rigid_transform(
    points_fixed: &DMatrix<f64>,
    points_moving: &DMatrix<f64>,
    threshold: f64,
    settings_opt: Option<RansacSettings>,
) -> Result<EstimationResult> {
    let data = correspondences_from_point_sets(points_fixed, points_moving)?;
    register(SimilarityEstimator::rigid(), &data, &[], threshold, settings_opt)
}

/// Similarity registration from packed `[fx, fy, fz, mx, my, mz]` rows.
///
/// Rows of `agree_data` are only used to validate hypotheses; their inlier
/// indices follow those of `data`. The two sets are assumed disjoint, so a
/// row present in both counts twice towards support.
pub fn estimate_from_packed(
    data: &DataMatrix,
    agree_data: Option<&DataMatrix>,
    threshold: f64,
    settings_opt: Option<RansacSettings>,
) -> Result<EstimationResult> {
    let data = correspondences_from_matrix(data)?;
    let agree_data = match agree_data {
        Some(agree) => correspondences_from_matrix(agree)?,
        None => Vec::new(),
    };
    register(
        SimilarityEstimator::new(),
        &data,
        &agree_data,
        threshold,
        settings_opt,
    )
}

/// Exact similarity from a minimal sample of three correspondences.
pub fn estimate(sample: &[Correspondence]) -> Result<SimilarityTransform> {
    SimilarityEstimator::new().estimate(sample)
}

/// Least-squares similarity over all of `data`.
pub fn least_squares_estimate(data: &[Correspondence]) -> Result<SimilarityTransform> {
    SimilarityEstimator::new().least_squares_estimate(data)
}

/// Least-squares similarity over borrowed correspondences.
pub fn least_squares_estimate_refs(data: &[&Correspondence]) -> Result<SimilarityTransform> {
    SimilarityEstimator::new().least_squares_estimate_refs(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use nalgebra::{Point3, Translation3, UnitQuaternion};

    fn grid() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..2 {
                    points.push(Point3::new(i as f64, j as f64 * 1.5, k as f64 * 2.0));
                }
            }
        }
        points
    }

    #[test]
    fn settings_pick_the_optimizers() {
        let settings = RansacSettings {
            local_optimization: LocalOptimizationType::Lsq,
            final_optimization: LocalOptimizationType::None,
            ..RansacSettings::default()
        };
        let ransac = SimilarityRansac::from_settings(settings, SimilarityEstimator::new()).unwrap();
        assert!(ransac.local_optimizer.is_some());
        assert!(ransac.final_optimizer.is_none());

        let bad = RansacSettings::default().with_confidence(2.0);
        assert!(SimilarityRansac::from_settings(bad, SimilarityEstimator::new()).is_err());
    }

    #[test]
    fn packed_rows_with_agree_data() {
        let gt = SimilarityTransform::new(
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
            0.5,
            Translation3::new(3.0, 0.0, -1.0),
        );
        let correspondences: Vec<_> = grid()
            .iter()
            .map(|p| Correspondence::new(*p, gt.transform_point(p)))
            .collect();
        let (data, agree) = correspondences.split_at(10);
        let data = crate::types::correspondences_to_matrix(data);
        let agree = crate::types::correspondences_to_matrix(agree);

        let settings = RansacSettings::default().with_seed(5);
        let result = estimate_from_packed(&data, Some(&agree), 1e-6, Some(settings)).unwrap();

        assert_eq!(result.inliers.len(), 18);
        assert!((result.percentage_of_data_used - 1.0).abs() < 1e-12);
        assert!((result.model.scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn mismatched_point_sets_are_rejected() {
        let a = DMatrix::<f64>::zeros(5, 3);
        let b = DMatrix::<f64>::zeros(4, 3);
        assert!(matches!(
            estimate_rigid_transform(&a, &b, 0.1, None),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn direct_entry_points_agree() {
        let gt = SimilarityTransform::new(
            UnitQuaternion::from_euler_angles(-0.4, 0.0, 1.2),
            2.0,
            Translation3::new(0.0, 5.0, 0.0),
        );
        let data: Vec<_> = grid()
            .iter()
            .map(|p| Correspondence::new(*p, gt.transform_point(p)))
            .collect();

        let minimal = estimate(&[data[0], data[3], data[8]]).unwrap();
        let all = least_squares_estimate(&data).unwrap();
        let refs: Vec<_> = data.iter().collect();
        let all_refs = least_squares_estimate_refs(&refs).unwrap();

        assert!(minimal.rotation.angle_to(&gt.rotation) < 1e-9);
        assert!(all.rotation.angle_to(&gt.rotation) < 1e-9);
        assert_eq!(all, all_refs);
        assert!(matches!(estimate(&data[..2]), Err(Error::InvalidConfiguration(_))));
    }
}
