//! Estimators for geometric models.
//!
//! This module contains estimators for 3D point-set registration:
//! - Similarity transform estimation (rotation, translation, scale)
//! - Rigid transform estimation (the same solver with unit scale)

pub mod similarity;

// Re-export all estimators for convenience
pub use similarity::SimilarityEstimator;
