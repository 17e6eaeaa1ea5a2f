//! # landmark-ransac - Robust 3D landmark registration
//!
//! `landmark-ransac` estimates the similarity (or rigid) transform between
//! two 3D point sets from putative point correspondences, some of which may
//! be wrong. A closed-form least-squares fit is wrapped in a RANSAC loop that
//! samples minimal subsets, keeps the hypothesis with the largest support and
//! adaptively bounds the number of iterations.
//!
//! ## Quick Start
//!
//! The easiest way in is through the high-level API functions:
//!
//! ```rust
//! use landmark_ransac::{estimate_rigid_transform, RansacSettings};
//! use nalgebra::DMatrix;
//!
//! let fixed = DMatrix::from_row_slice(4, 3, &[
//!     0.0, 0.0, 0.0,
//!     1.0, 0.0, 0.0,
//!     0.0, 1.0, 0.0,
//!     0.0, 0.0, 1.0,
//! ]);
//! let moving = fixed.map(|v| v + 0.5);
//!
//! let settings = RansacSettings::default().with_seed(1);
//! let result = estimate_rigid_transform(&fixed, &moving, 0.01, Some(settings)).unwrap();
//! println!("Found {} inliers, RMSE {}", result.inliers.len(), result.inlier_rmse);
//! ```
//!
//! ## Extending the Library
//!
//! The pipeline is built around a few traits:
//!
//! - **[`Estimator`](core::Estimator)**: fits a model and measures residuals
//! - **[`Sampler`](core::Sampler)**: draws minimal samples
//! - **[`Scoring<E>`](core::Scoring)**: decides inliers and ranks hypotheses
//! - **[`LocalOptimizer<E>`](core::LocalOptimizer)**: refines a model from its inliers
//! - **[`TerminationCriterion`](core::TerminationCriterion)**: adapts the iteration budget
//!
//! [`RansacEngine`](core::RansacEngine) is generic over all of them, so any
//! model with a minimal solver can reuse the loop:
//!
//! ```rust
//! use landmark_ransac::core::Estimator;
//!
//! /// A 1D "model": the mean of the sample.
//! struct MeanEstimator;
//!
//! impl Estimator for MeanEstimator {
//!     type Datum = f64;
//!     type Model = f64;
//!
//!     fn sample_size(&self) -> usize {
//!         1
//!     }
//!
//!     fn fit<'a, I>(&self, data: I) -> Option<f64>
//!     where
//!         I: IntoIterator<Item = &'a f64>,
//!         I::IntoIter: Clone,
//!         Self::Datum: 'a,
//!     {
//!         let (sum, n) = data.into_iter().fold((0.0, 0), |(s, n), &x| (s + x, n + 1));
//!         (n > 0).then(|| sum / n as f64)
//!     }
//!
//!     fn squared_residual(&self, model: &f64, datum: &f64) -> f64 {
//!         (model - datum).powi(2)
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - **[`api`](api)**: High-level registration functions
//! - **[`core`](core)**: Core traits and the `RansacEngine` pipeline
//! - **[`estimators`](estimators)**: Procrustes similarity/rigid estimator
//! - **[`samplers`](samplers)**: Sampling strategies
//! - **[`scoring`](scoring)**: Consensus scoring and sample checks
//! - **[`models`](models)**: Transform types
//! - **[`settings`](settings)**: Configuration of the pipeline
//! - **[`types`](types)**: Correspondences and conversions

pub mod api;
pub mod core;
pub mod error;
pub mod estimators;
pub mod models;
pub mod samplers;
pub mod scoring;
pub mod settings;
pub mod types;
pub mod utils;

// Re-export high-level API
pub use api::{
    estimate_from_packed, estimate_rigid_transform, estimate_similarity_transform,
    EstimationResult, SimilarityRansac,
};

// Re-export core traits for easy access
pub use crate::core::{
    Estimator, LocalOptimizer, RansacEngine, RansacReport, Sampler, Scoring, TerminationCriterion,
    TerminationReason,
};

pub use error::{Error, Result};
pub use estimators::SimilarityEstimator;
pub use models::SimilarityTransform;
pub use settings::RansacSettings;
pub use types::Correspondence;
