//! Core shared types.
//!
//! A correspondence pairs a point of the fixed set with its putative match in
//! the moving set. Upstream producers hand them over either as typed values or
//! packed as rows `[fx, fy, fz, mx, my, mz]` of a [`DataMatrix`].

use nalgebra::{DMatrix, Point3};

use crate::error::{Error, Result};

/// Dynamic matrix of `f64`; one packed correspondence per row.
pub type DataMatrix = DMatrix<f64>;

/// Number of coordinates of a packed correspondence (two 3D points).
pub const PACKED_DIMENSION: usize = 6;

/// A putative match between a fixed point and a moving point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Correspondence {
    pub fixed: Point3<f64>,
    pub moving: Point3<f64>,
}

impl Correspondence {
    pub fn new(fixed: Point3<f64>, moving: Point3<f64>) -> Self {
        Self { fixed, moving }
    }

    /// Unpack `[fx, fy, fz, mx, my, mz]`.
    pub fn from_packed(p: &[f64; PACKED_DIMENSION]) -> Self {
        Self {
            fixed: Point3::new(p[0], p[1], p[2]),
            moving: Point3::new(p[3], p[4], p[5]),
        }
    }

    /// Pack into `[fx, fy, fz, mx, my, mz]`.
    pub fn packed(&self) -> [f64; PACKED_DIMENSION] {
        [
            self.fixed.x,
            self.fixed.y,
            self.fixed.z,
            self.moving.x,
            self.moving.y,
            self.moving.z,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.packed().iter().all(|v| v.is_finite())
    }
}

impl From<[f64; PACKED_DIMENSION]> for Correspondence {
    fn from(p: [f64; PACKED_DIMENSION]) -> Self {
        Self::from_packed(&p)
    }
}

impl From<(Point3<f64>, Point3<f64>)> for Correspondence {
    fn from((fixed, moving): (Point3<f64>, Point3<f64>)) -> Self {
        Self::new(fixed, moving)
    }
}

/// Read correspondences from an N×6 matrix of packed rows.
pub fn correspondences_from_matrix(data: &DataMatrix) -> Result<Vec<Correspondence>> {
    if data.ncols() != PACKED_DIMENSION {
        return Err(Error::DimensionMismatch {
            expected: format!("Nx{PACKED_DIMENSION}"),
            actual: format!("{}x{}", data.nrows(), data.ncols()),
        });
    }

    Ok(data
        .row_iter()
        .map(|row| {
            Correspondence::new(
                Point3::new(row[0], row[1], row[2]),
                Point3::new(row[3], row[4], row[5]),
            )
        })
        .collect())
}

/// Pair up two N×3 point matrices row by row.
pub fn correspondences_from_point_sets(
    points_fixed: &DMatrix<f64>,
    points_moving: &DMatrix<f64>,
) -> Result<Vec<Correspondence>> {
    if points_fixed.nrows() != points_moving.nrows() {
        return Err(Error::DimensionMismatch {
            expected: format!("{} rows in both point sets", points_fixed.nrows()),
            actual: format!("{} rows", points_moving.nrows()),
        });
    }
    for points in [points_fixed, points_moving] {
        if points.ncols() != 3 {
            return Err(Error::DimensionMismatch {
                expected: "Nx3".to_string(),
                actual: format!("{}x{}", points.nrows(), points.ncols()),
            });
        }
    }

    Ok((0..points_fixed.nrows())
        .map(|i| {
            Correspondence::new(
                Point3::new(points_fixed[(i, 0)], points_fixed[(i, 1)], points_fixed[(i, 2)]),
                Point3::new(
                    points_moving[(i, 0)],
                    points_moving[(i, 1)],
                    points_moving[(i, 2)],
                ),
            )
        })
        .collect())
}

/// Pack correspondences back into an N×6 matrix.
pub fn correspondences_to_matrix(data: &[Correspondence]) -> DataMatrix {
    let flat: Vec<f64> = data.iter().flat_map(|c| c.packed()).collect();
    DataMatrix::from_row_slice(data.len(), PACKED_DIMENSION, &flat)
}

/// Borrowed view over the sampling data followed by the agree-only data.
///
/// Indices `0..sampling_len()` address the sampling data; the agree data
/// follows at offset `sampling_len()`. Samplers only draw from the first part.
/// The two parts are not deduplicated: an entry present in both is scored twice.
pub struct WorkingSet<'a, D> {
    data: &'a [D],
    agree_data: &'a [D],
}

impl<D> Clone for WorkingSet<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for WorkingSet<'_, D> {}

impl<'a, D> WorkingSet<'a, D> {
    pub fn new(data: &'a [D], agree_data: &'a [D]) -> Self {
        Self { data, agree_data }
    }

    /// Working set without agree data.
    pub fn sampling_only(data: &'a [D]) -> Self {
        Self::new(data, &[])
    }

    pub fn len(&self) -> usize {
        self.data.len() + self.agree_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of correspondences minimal samples are drawn from.
    pub fn sampling_len(&self) -> usize {
        self.data.len()
    }

    pub fn sampling_data(&self) -> &'a [D] {
        self.data
    }

    pub fn agree_data(&self) -> &'a [D] {
        self.agree_data
    }

    /// Element at a working-set index. Panics when out of range, like slices.
    pub fn get(&self, index: usize) -> &'a D {
        match index.checked_sub(self.data.len()) {
            None => &self.data[index],
            Some(offset) => &self.agree_data[offset],
        }
    }

    pub fn iter(&self) -> std::iter::Chain<std::slice::Iter<'a, D>, std::slice::Iter<'a, D>> {
        self.data.iter().chain(self.agree_data.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_set_appends_agree_data() {
        let data = [1, 2, 3];
        let agree = [10, 20];
        let ws = WorkingSet::new(&data[..], &agree[..]);

        assert_eq!(ws.len(), 5);
        assert_eq!(ws.sampling_len(), 3);
        assert_eq!(*ws.get(2), 3);
        assert_eq!(*ws.get(3), 10);
        assert_eq!(*ws.get(4), 20);
        assert_eq!(ws.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 10, 20]);

        let only = WorkingSet::sampling_only(&data[..]);
        assert_eq!(only.len(), 3);
        assert!(only.agree_data().is_empty());
    }

    #[test]
    fn matrix_rows_follow_packing_convention() {
        let data = DataMatrix::from_row_slice(
            2,
            6,
            &[
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, //
                -1.0, -2.0, -3.0, -4.0, -5.0, -6.0,
            ],
        );
        let corr = correspondences_from_matrix(&data).unwrap();
        assert_eq!(corr.len(), 2);
        assert_eq!(corr[0].fixed, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(corr[0].moving, Point3::new(4.0, 5.0, 6.0));
        assert_eq!(corr[1].packed(), [-1.0, -2.0, -3.0, -4.0, -5.0, -6.0]);

        assert_eq!(correspondences_to_matrix(&corr), data);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let data = DataMatrix::zeros(3, 4);
        assert!(matches!(
            correspondences_from_matrix(&data),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn point_sets_must_have_matching_rows() {
        let a = DMatrix::<f64>::zeros(3, 3);
        let b = DMatrix::<f64>::zeros(4, 3);
        assert!(correspondences_from_point_sets(&a, &b).is_err());

        let c = DMatrix::<f64>::zeros(3, 2);
        assert!(correspondences_from_point_sets(&a, &c).is_err());
    }
}
