//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the crate.
//! Types here should not depend on the session, the layer or the
//! image transform code.

pub mod annotation;
pub mod geometry;
pub mod measurement;

pub use annotation::*;
pub use geometry::*;
pub use measurement::*;
