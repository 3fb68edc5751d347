//! Shared layout constants and helpers for annotation rendering
//!
//! Used by the shape controllers when positioning labels and by the image
//! renderer when flattening primitives with tiny-skia.

/// Label placement relative to the shape it describes
pub mod label {
    /// Gap above a circle's top edge (three text lines)
    pub const CIRCLE_OFFSET: f32 = 40.0;
    /// Gap above an ellipse's top edge (four text lines)
    pub const ELLIPSE_OFFSET: f32 = 60.0;
    /// Initial label offset when a shape is created
    pub const INITIAL_OFFSET: f32 = 20.0;
    /// Angle label offset from the vertex
    pub const ANGLE_DX: f32 = 10.0;
    pub const ANGLE_DY: f32 = -20.0;
    /// Distance label offset from the line's end point
    pub const LINE_DX: f32 = 8.0;
    pub const LINE_DY: f32 = -18.0;
}

/// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
pub const BEZIER_K: f32 = 0.552_284_8;

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rect() {
        assert_eq!(normalize_rect(10.0, 5.0, 2.0, 8.0), (2.0, 5.0, 10.0, 8.0));
        assert_eq!(normalize_rect(1.0, 1.0, 1.0, 1.0), (1.0, 1.0, 1.0, 1.0));
    }
}
