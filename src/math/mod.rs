//! Mathematical utilities for pose classification.
//!
//! This module provides:
//! - [`vector`]: 3D point arithmetic and weighted norms
//! - [`top_k`]: bounded smallest-K selection

pub mod top_k;
pub mod vector;

pub use top_k::BoundedTopK;
pub use vector::{point, Point3D};
