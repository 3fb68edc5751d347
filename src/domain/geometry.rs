//! Geometric types for pointer positions and regions on the drawing surface

/// Position in surface-local logical coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to this point
    pub fn delta_from(&self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// Rectangle anchored at `(x, y)` whose width and height may be negative
/// while the user drags towards the top or left
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from an origin and a signed size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Flip negative extents so the origin is the top-left corner
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Divide every coordinate by the per-axis scale factor
    pub fn unscale(&self, scale_x: f32, scale_y: f32) -> Rect {
        Rect {
            x: self.x / scale_x,
            y: self.y / scale_y,
            width: self.width / scale_x,
            height: self.height / scale_y,
        }
    }

    /// Intersect with the rectangle `(0, 0)..(width, height)`
    pub fn clamp_to(&self, width: f32, height: f32) -> Option<Rect> {
        let r = self.normalized();
        let left = r.x.max(0.0);
        let top = r.y.max(0.0);
        let right = (r.x + r.width).min(width);
        let bottom = (r.y + r.height).min(height);
        if left < right && top < bottom {
            Some(Rect {
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_flips_negative_drag() {
        let r = Rect::new(50.0, 40.0, -20.0, -10.0).normalized();
        assert_eq!(r, Rect::new(30.0, 30.0, 20.0, 10.0));
    }

    #[test]
    fn test_normalized_keeps_positive_drag() {
        let r = Rect::new(5.0, 5.0, 10.0, 3.0);
        assert_eq!(r.normalized(), r);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let r = Rect::new(-5.0, 2.0, 20.0, 20.0).clamp_to(10.0, 10.0).unwrap();
        assert_eq!(r, Rect::new(0.0, 2.0, 10.0, 8.0));
        assert!(Rect::new(20.0, 20.0, 5.0, 5.0).clamp_to(10.0, 10.0).is_none());
    }

    #[test]
    fn test_unscale() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0).unscale(2.0, 4.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 20.0, 15.0));
    }
}
