//! Geometric models produced by the estimators.

use nalgebra::{Matrix4, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};

use crate::error::{Error, Result};

/// Number of entries in the flat parameter form of a [`SimilarityTransform`].
pub const SIMILARITY_PARAMETER_COUNT: usize = 7;

/// Similarity transform in 3D: `moving = scale * R * fixed + t`.
///
/// A rigid transform is the special case `scale == 1`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityTransform {
    pub rotation: UnitQuaternion<f64>,
    pub scale: f64,
    pub translation: Translation3<f64>,
}

impl SimilarityTransform {
    pub fn new(rotation: UnitQuaternion<f64>, scale: f64, translation: Translation3<f64>) -> Self {
        Self {
            rotation,
            scale,
            translation,
        }
    }

    /// Rigid transform (unit scale).
    pub fn rigid(rotation: UnitQuaternion<f64>, translation: Translation3<f64>) -> Self {
        Self::new(rotation, 1.0, translation)
    }

    pub fn identity() -> Self {
        Self::new(UnitQuaternion::identity(), 1.0, Translation3::identity())
    }

    /// Map a point of the fixed set into the moving frame.
    pub fn transform_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * p.coords * self.scale + self.translation.vector)
    }

    /// Transform mapping the moving frame back onto the fixed one.
    ///
    /// Returns `None` when the scale is zero or not finite.
    pub fn inverse(&self) -> Option<Self> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        let inv_rot = self.rotation.inverse();
        let inv_scale = 1.0 / self.scale;
        let t = -(inv_rot * self.translation.vector) * inv_scale;
        Some(Self::new(inv_rot, inv_scale, Translation3::from(t)))
    }

    /// Homogeneous 4x4 matrix `[[sR, t], [0, 1]]`.
    pub fn to_matrix4(&self) -> Matrix4<f64> {
        let sr = self.rotation.to_rotation_matrix().into_inner() * self.scale;
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&sr);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation.vector);
        m
    }

    /// Flat parameter form `[versor_x, versor_y, versor_z, t_x, t_y, t_z, scale]`.
    ///
    /// The versor is the vector part of the rotation quaternion, normalised so
    /// that its scalar part is non-negative.
    pub fn parameters(&self) -> [f64; SIMILARITY_PARAMETER_COUNT] {
        let q = self.rotation.quaternion();
        let sign = if q.w < 0.0 { -1.0 } else { 1.0 };
        let t = &self.translation.vector;
        [
            sign * q.i,
            sign * q.j,
            sign * q.k,
            t.x,
            t.y,
            t.z,
            self.scale,
        ]
    }

    /// Inverse of [`parameters`](Self::parameters). The scale must be positive.
    pub fn from_parameters(params: &[f64]) -> Result<Self> {
        if params.len() != SIMILARITY_PARAMETER_COUNT {
            return Err(Error::InvalidParameters(format!(
                "expected {SIMILARITY_PARAMETER_COUNT} values, got {}",
                params.len()
            )));
        }
        if params.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidParameters("non-finite value".to_string()));
        }
        if params[6] <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "scale must be positive, got {}",
                params[6]
            )));
        }

        let v = Vector3::new(params[0], params[1], params[2]);
        let norm_sq = v.norm_squared();
        if norm_sq > 1.0 + 1e-9 {
            return Err(Error::InvalidParameters(format!(
                "versor norm {} exceeds 1",
                norm_sq.sqrt()
            )));
        }
        let w = (1.0 - norm_sq).max(0.0).sqrt();
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(w, v.x, v.y, v.z));
        let translation = Translation3::new(params[3], params[4], params[5]);

        Ok(Self::new(rotation, params[6], translation))
    }

    /// Rotation angle (radians) between this transform and `other`.
    pub fn rotation_angle_to(&self, other: &Self) -> f64 {
        self.rotation.angle_to(&other.rotation)
    }
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_transform() -> SimilarityTransform {
        SimilarityTransform::new(
            UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1),
            1.7,
            Translation3::new(1.0, -2.0, 0.5),
        )
    }

    #[test]
    fn parameters_survive_a_round_trip() {
        let t = sample_transform();
        let back = SimilarityTransform::from_parameters(&t.parameters()).unwrap();

        assert_relative_eq!(t.rotation_angle_to(&back), 0.0, epsilon = 1e-12);
        assert_relative_eq!(back.scale, 1.7, epsilon = 1e-12);
        assert_relative_eq!(back.translation.vector, t.translation.vector, epsilon = 1e-12);
    }

    #[test]
    fn malformed_parameters_are_rejected() {
        assert!(SimilarityTransform::from_parameters(&[]).is_err());
        assert!(SimilarityTransform::from_parameters(&[0.9, 0.9, 0.0, 0.0, 0.0, 0.0, 1.0]).is_err());
        assert!(
            SimilarityTransform::from_parameters(&[0.0, 0.0, 0.0, f64::NAN, 0.0, 0.0, 1.0])
                .is_err()
        );
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        for scale in [0.0, -1.0] {
            assert!(matches!(
                SimilarityTransform::from_parameters(&[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, scale]),
                Err(Error::InvalidParameters(_))
            ));
        }
        assert!(SimilarityTransform::from_parameters(&[0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 0.5]).is_ok());
    }

    #[test]
    fn inverse_undoes_transform() {
        let t = sample_transform();
        let inv = t.inverse().unwrap();
        let p = Point3::new(0.4, 2.0, -3.0);

        let back = inv.transform_point(&t.transform_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);

        let zero = SimilarityTransform::new(UnitQuaternion::identity(), 0.0, Translation3::identity());
        assert!(zero.inverse().is_none());
    }

    #[test]
    fn matrix_form_agrees_with_point_transform() {
        let t = sample_transform();
        let p = Point3::new(-1.0, 0.5, 2.0);
        let m = t.to_matrix4();

        let h = m * p.to_homogeneous();
        let expected = t.transform_point(&p);
        assert_relative_eq!(h.x, expected.x, epsilon = 1e-12);
        assert_relative_eq!(h.y, expected.y, epsilon = 1e-12);
        assert_relative_eq!(h.z, expected.z, epsilon = 1e-12);
        assert_relative_eq!(h.w, 1.0);
    }
}
