//! Example: Robust landmark registration using RANSAC
//!
//! Matches between two landmark sets are generated from a known similarity
//! transform, a fraction of them is replaced by mismatches, and the transform
//! is recovered with the landmark-style configuration (distance and edge
//! length checks on every minimal sample).
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example similarity_registration

use landmark_ransac::api::estimate_similarity_transform;
use landmark_ransac::settings::RansacSettings;
use landmark_ransac::SimilarityTransform;
use nalgebra::{DMatrix, Point3, Translation3, UnitQuaternion, Vector3};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Robust Similarity Registration Example ===\n");

    let n_inliers = 150;
    let n_outliers = 50;
    let n_total = n_inliers + n_outliers;
    let sigma = 0.5;

    let mut rng = rand::thread_rng();

    let truth = SimilarityTransform::new(
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.35),
        1.1,
        Translation3::new(12.0, -4.0, 30.0),
    );
    println!("True parameters: {:?}", truth.parameters());
    println!(
        "Generating {} matches and {} mismatches (noise sigma {})\n",
        n_inliers, n_outliers, sigma
    );

    let mut random_point = || {
        Point3::new(
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
            rng.gen_range(-100.0..100.0),
        )
    };

    // (fixed, moving, is_true_match)
    let mut matches = Vec::with_capacity(n_total);
    for _ in 0..n_inliers {
        let fixed = random_point();
        matches.push((fixed, truth.transform_point(&fixed), true));
    }
    for _ in 0..n_outliers {
        let fixed = random_point();
        let wrong = truth.transform_point(&random_point());
        matches.push((fixed, wrong, false));
    }

    let mut rng = rand::thread_rng();
    for m in matches.iter_mut().filter(|m| m.2) {
        for c in m.1.coords.iter_mut() {
            *c += sigma * rng.sample::<f64, _>(StandardNormal);
        }
    }
    matches.shuffle(&mut rng);

    let fixed = DMatrix::from_fn(n_total, 3, |r, c| matches[r].0[c]);
    let moving = DMatrix::from_fn(n_total, 3, |r, c| matches[r].1[c]);

    let threshold = 3.0;
    let settings = RansacSettings::default()
        .with_max_iterations(10_000)
        .with_confidence(0.99)
        .with_check_correspondence_distance(true)
        .with_edge_length_tolerance(0.9);
    let result = estimate_similarity_transform(&fixed, &moving, threshold, Some(settings))?;

    println!("RANSAC Results:");
    println!(
        "  Found {} inliers out of {} matches",
        result.inliers.len(),
        n_total
    );
    println!(
        "  Percentage of data used: {:.2}%",
        100.0 * result.percentage_of_data_used
    );
    println!("  Inlier RMSE: {:.4}", result.inlier_rmse);
    println!(
        "  Iterations: {} ({:?})",
        result.iterations, result.termination
    );

    let model = &result.model;
    println!("\nEstimated parameters: {:?}", model.parameters());
    println!(
        "  Rotation error: {:.4} deg",
        model.rotation_angle_to(&truth).to_degrees()
    );
    println!("  Scale error: {:.5}", (model.scale - truth.scale).abs());
    println!(
        "  Translation error: {:.4}",
        (model.translation.vector - truth.translation.vector).norm()
    );

    let found = result.inliers.iter().filter(|&&i| matches[i].2).count();
    println!(
        "\nCorrectly identified {} out of {} true matches",
        found, n_inliers
    );

    Ok(())
}
