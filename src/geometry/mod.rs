//! Geometry utilities for mesh-flatten.
//!
//! This module provides vector and polygon helpers on `[f64; 3]` points and
//! the reference-plane type with its least-squares estimator.

pub mod metrics;
pub mod plane;

pub use plane::{Plane, best_fit_plane};
