//! Drawing surface and pixel work
//!
//! This module contains:
//! - The layer holding live primitives and the pending-redraw flag
//! - Geometry constants shared by the controllers and the rasterizer
//! - Image rendering using tiny-skia (for exporting an annotated view)
//! - Pixel transforms on decoded buffers (window/level, crop, filters)

pub mod geometry;
pub mod image;
pub mod layer;
pub mod transform;

pub use layer::{Layer, NodeId};
