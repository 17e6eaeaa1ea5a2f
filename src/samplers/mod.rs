//! Sampling strategies for minimal subsets.
//!
//! Samplers implement the shared [`Sampler`](crate::core::Sampler) trait and only
//! ever draw from the sampling data, never from the validation-only agree data.

pub mod uniform;

pub use uniform::UniformRandomSampler;
