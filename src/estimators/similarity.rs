//! Similarity and rigid transform estimation by Procrustes analysis.
//!
//! Closed-form least squares (Umeyama): centre both point sets, take the SVD
//! of their cross-covariance, fix a possible reflection on the smallest
//! singular direction, then read the scale off the singular values. Three
//! non-collinear correspondences determine the transform exactly; more give
//! the least-squares solution.

use nalgebra::{Matrix3, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::core::Estimator;
use crate::error::{Error, Result};
use crate::models::SimilarityTransform;
use crate::types::Correspondence;

/// Minimum sine of the angle between two sample edges.
const COLLINEARITY_TOLERANCE: f64 = 1e-6;
/// Second singular value relative to the first below which the covariance
/// is treated as rank one.
const RANK_TOLERANCE: f64 = 1e-9;

/// Estimator for `moving = scale * R * fixed + t`.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEstimator {
    estimate_scale: bool,
}

impl Default for SimilarityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityEstimator {
    /// Full similarity transform (rotation, translation and scale).
    pub fn new() -> Self {
        Self {
            estimate_scale: true,
        }
    }

    /// Rigid transform; the scale stays at 1.
    pub fn rigid() -> Self {
        Self {
            estimate_scale: false,
        }
    }

    pub fn estimates_scale(&self) -> bool {
        self.estimate_scale
    }

    /// Exact fit from a minimal sample of exactly [`sample_size`](Estimator::sample_size)
    /// correspondences.
    pub fn estimate(&self, sample: &[Correspondence]) -> Result<SimilarityTransform> {
        if sample.len() != self.sample_size() {
            return Err(Error::config(format!(
                "a minimal sample has {} correspondences, got {}",
                self.sample_size(),
                sample.len()
            )));
        }
        self.fit(sample).ok_or(Error::DegenerateSample)
    }

    /// Least-squares fit over any number of correspondences.
    pub fn least_squares_estimate(&self, data: &[Correspondence]) -> Result<SimilarityTransform> {
        self.fit(data).ok_or(Error::DegenerateSample)
    }

    /// Same as [`least_squares_estimate`](Self::least_squares_estimate) over
    /// borrowed correspondences.
    pub fn least_squares_estimate_refs(
        &self,
        data: &[&Correspondence],
    ) -> Result<SimilarityTransform> {
        self.fit(data.iter().copied()).ok_or(Error::DegenerateSample)
    }
}

impl Estimator for SimilarityEstimator {
    type Datum = Correspondence;
    type Model = SimilarityTransform;

    fn sample_size(&self) -> usize {
        3
    }

    fn is_valid_sample(&self, data: &[Correspondence], sample: &[usize]) -> bool {
        if sample.len() < self.sample_size() {
            return false;
        }
        // Check for distinct, in-range indices
        for (k, &i) in sample.iter().enumerate() {
            if i >= data.len() || sample[..k].contains(&i) {
                return false;
            }
        }

        let points = move || sample.iter().map(move |&i| &data[i]);
        points().all(Correspondence::is_finite)
            && spans_plane(points().map(|c| c.fixed.coords))
            && spans_plane(points().map(|c| c.moving.coords))
    }

    fn fit<'a, I>(&self, data: I) -> Option<SimilarityTransform>
    where
        I: IntoIterator<Item = &'a Correspondence>,
        I::IntoIter: Clone,
        Self::Datum: 'a,
    {
        let data = data.into_iter();

        let mut n = 0usize;
        let mut c0 = Vector3::<f64>::zeros();
        let mut c1 = Vector3::<f64>::zeros();
        let mut magnitude = 0.0f64;
        for c in data.clone() {
            c0 += c.fixed.coords;
            c1 += c.moving.coords;
            magnitude = magnitude.max(c.fixed.coords.norm_squared());
            n += 1;
        }
        if n < self.sample_size() {
            return None;
        }
        c0 /= n as f64;
        c1 /= n as f64;

        // Cross-covariance H = sum p0 * p1^T of the centred points
        let mut h = Matrix3::<f64>::zeros();
        let mut var0 = 0.0;
        for c in data {
            let p0 = c.fixed.coords - c0;
            let p1 = c.moving.coords - c1;
            h += p0 * p1.transpose();
            var0 += p0.norm_squared();
        }
        // Spread is measured against the coordinate magnitude.
        let min_variance = f64::EPSILON * n as f64 * magnitude;
        if !(var0 > min_variance) || h.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let svd = h.svd(true, true);
        let u = svd.u?;
        let mut v = svd.v_t?.transpose();
        let sv = svd.singular_values;

        // nalgebra does not guarantee the singular values are sorted.
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| sv[b].total_cmp(&sv[a]));
        let (largest, middle, smallest) = (order[0], order[1], order[2]);
        if !(sv[largest] > 0.0) || sv[middle] <= RANK_TOLERANCE * sv[largest] {
            return None;
        }

        // R = V * U^T, flipping the weakest direction if that is a reflection.
        let mut d = Vector3::new(1.0, 1.0, 1.0);
        if (v * u.transpose()).determinant() < 0.0 {
            v.column_mut(smallest).neg_mut();
            d[smallest] = -1.0;
        }
        let r = v * u.transpose();

        let scale = if self.estimate_scale {
            sv.dot(&d) / var0
        } else {
            1.0
        };
        if !(scale.is_finite() && scale > 0.0) {
            return None;
        }

        let t = c1 - r * c0 * scale;
        let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(r));
        Some(SimilarityTransform::new(
            rotation,
            scale,
            Translation3::from(t),
        ))
    }

    fn squared_residual(&self, model: &SimilarityTransform, c: &Correspondence) -> f64 {
        (model.transform_point(&c.fixed) - c.moving).norm_squared()
    }

    fn edge_length_ratio(
        &self,
        model: &SimilarityTransform,
        a: &Correspondence,
        b: &Correspondence,
    ) -> Option<f64> {
        let fixed_length = (a.fixed - b.fixed).norm() * model.scale;
        let moving_length = (a.moving - b.moving).norm();
        Some(moving_length / fixed_length)
    }
}

/// Whether the points do not all lie on one line.
fn spans_plane<I>(mut points: I) -> bool
where
    I: Iterator<Item = Vector3<f64>>,
{
    let Some(origin) = points.next() else {
        return false;
    };
    let mut axis: Option<Vector3<f64>> = None;
    for p in points {
        let edge = p - origin;
        let length = edge.norm();
        if length <= f64::EPSILON * origin.norm().max(p.norm()) {
            continue;
        }
        match axis {
            None => axis = Some(edge / length),
            Some(a) => {
                if a.cross(&edge).norm() > COLLINEARITY_TOLERANCE * length {
                    return true;
                }
            }
        }
    }
    false
}
