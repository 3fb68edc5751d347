//! Measurement math and unit formatting
//!
//! Everything here is pure: shape statistics, the angle between two rays and
//! the conversion of on-screen pixel lengths into physical units using the
//! pixel spacing reported by the image source.

use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Unit used when displaying lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    #[default]
    Px,
    Mm,
    Cm,
}

impl MeasurementUnit {
    /// Suffix appended to formatted lengths
    pub fn suffix(self) -> &'static str {
        match self {
            MeasurementUnit::Px => "px",
            MeasurementUnit::Mm => "mm",
            MeasurementUnit::Cm => "cm",
        }
    }

    /// Parse the selector value used by the host UI
    pub fn from_selector(value: &str) -> Option<Self> {
        match value {
            "px" => Some(MeasurementUnit::Px),
            "mm" => Some(MeasurementUnit::Mm),
            "cm" => Some(MeasurementUnit::Cm),
            _ => None,
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Perimeter and area of a closed shape, in pixels and square pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapeStats {
    pub circumference: f32,
    pub area: f32,
}

pub fn circle_stats(radius: f32) -> ShapeStats {
    ShapeStats {
        circumference: 2.0 * PI * radius,
        area: PI * radius * radius,
    }
}

/// Ellipse statistics; the circumference uses Ramanujan's second approximation
pub fn ellipse_stats(radius_x: f32, radius_y: f32) -> ShapeStats {
    let sum = radius_x + radius_y;
    let h = if sum == 0.0 {
        0.0
    } else {
        ((radius_x - radius_y) / sum).powi(2)
    };
    let circumference = PI * sum * (1.0 + (3.0 * h) / (10.0 + (4.0 - 3.0 * h).sqrt()));
    ShapeStats {
        circumference,
        area: PI * radius_x * radius_y,
    }
}

pub fn distance(a: Point, b: Point) -> f32 {
    let (dx, dy) = b.delta_from(a);
    (dx * dx + dy * dy).sqrt()
}

/// Non-reflex angle in degrees between the rays `vertex -> a` and `vertex -> b`
pub fn angle_between(vertex: Point, a: Point, b: Point) -> f32 {
    let bearing_a = (a.y - vertex.y).atan2(a.x - vertex.x);
    let bearing_b = (b.y - vertex.y).atan2(b.x - vertex.x);
    let angle = (bearing_b - bearing_a).to_degrees().abs();
    if angle > 180.0 { 360.0 - angle } else { angle }
}

pub fn convert_to_real_world(pixels: f32, unit: MeasurementUnit, pixel_spacing: f32) -> f32 {
    match unit {
        MeasurementUnit::Px => pixels,
        MeasurementUnit::Mm => pixels * pixel_spacing,
        MeasurementUnit::Cm => pixels * pixel_spacing / 10.0,
    }
}

/// Format a pixel length in the requested unit, e.g. `"26.4 mm"`
pub fn format_measurement(pixels: f32, unit: MeasurementUnit, pixel_spacing: f32) -> String {
    let value = convert_to_real_world(pixels, unit, pixel_spacing);
    match unit {
        MeasurementUnit::Px => format!("{} px", value.round() as i64),
        MeasurementUnit::Mm => format!("{value:.1} mm"),
        MeasurementUnit::Cm => format!("{value:.2} cm"),
    }
}

/// Format an area given in square pixels, e.g. `"452 px²"`
pub fn format_area(square_pixels: f32, unit: MeasurementUnit, pixel_spacing: f32) -> String {
    let spacing_sq = pixel_spacing * pixel_spacing;
    match unit {
        MeasurementUnit::Px => format!("{} px²", square_pixels.round() as i64),
        MeasurementUnit::Mm => format!("{:.1} mm²", square_pixels * spacing_sq),
        MeasurementUnit::Cm => format!("{:.2} cm²", square_pixels * spacing_sq / 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_circle_stats() {
        for r in [0.0_f32, 1.0, 2.5, 10.0, 123.4] {
            let stats = circle_stats(r);
            assert!((stats.area - PI * r * r).abs() <= EPS * r.max(1.0) * r.max(1.0));
            assert!((stats.circumference - 2.0 * PI * r).abs() <= EPS * r.max(1.0));
        }
    }

    #[test]
    fn test_ellipse_area_and_circle_reduction() {
        let stats = ellipse_stats(3.0, 5.0);
        assert!((stats.area - PI * 15.0).abs() < EPS);

        for a in [0.5_f32, 1.0, 7.0, 250.0] {
            assert_eq!(
                ellipse_stats(a, a).circumference,
                circle_stats(a).circumference
            );
        }
    }

    #[test]
    fn test_ellipse_degenerate_is_zero() {
        let stats = ellipse_stats(0.0, 0.0);
        assert_eq!(stats.circumference, 0.0);
        assert_eq!(stats.area, 0.0);
    }

    #[test]
    fn test_ellipse_flat_is_four_times_radius() {
        // A fully flattened ellipse approaches a doubled line segment
        let stats = ellipse_stats(10.0, 0.0);
        assert!((stats.circumference - 40.0).abs() < 0.1);
    }

    #[test]
    fn test_angle_between_right_angle() {
        let angle = angle_between(
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        );
        assert!((angle - 90.0).abs() < EPS);
    }

    #[test]
    fn test_angle_between_symmetric_and_bounded() {
        let vertex = Point::new(3.0, -2.0);
        let samples = [
            Point::new(10.0, 0.0),
            Point::new(-4.0, 7.0),
            Point::new(-8.0, -8.0),
            Point::new(3.0, 9.0),
            Point::new(0.0, -20.0),
        ];
        for a in samples {
            for b in samples {
                let ab = angle_between(vertex, a, b);
                let ba = angle_between(vertex, b, a);
                assert!((ab - ba).abs() < EPS);
                assert!((0.0..=180.0).contains(&ab));
            }
        }
    }

    #[test]
    fn test_angle_reflex_is_reflected() {
        // Bearings of 170 and -170 degrees are 20 degrees apart, not 340
        let vertex = Point::default();
        let a = Point::new(170f32.to_radians().cos(), 170f32.to_radians().sin());
        let b = Point::new((-170f32).to_radians().cos(), (-170f32).to_radians().sin());
        assert!((angle_between(vertex, a, b) - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_convert_to_real_world() {
        assert_eq!(convert_to_real_world(100.0, MeasurementUnit::Mm, 0.5), 50.0);
        assert_eq!(convert_to_real_world(100.0, MeasurementUnit::Cm, 0.5), 5.0);
        assert_eq!(convert_to_real_world(100.0, MeasurementUnit::Px, 0.5), 100.0);
        assert_eq!(convert_to_real_world(100.0, MeasurementUnit::Px, 42.0), 100.0);
    }

    #[test]
    fn test_format_measurement() {
        assert_eq!(format_measurement(100.0, MeasurementUnit::Px, 1.0), "100 px");
        assert_eq!(format_measurement(100.0, MeasurementUnit::Px, 0.3), "100 px");
        assert_eq!(format_measurement(99.6, MeasurementUnit::Px, 1.0), "100 px");
        assert_eq!(format_measurement(100.0, MeasurementUnit::Mm, 0.264), "26.4 mm");
        assert_eq!(format_measurement(100.0, MeasurementUnit::Cm, 0.5), "5.00 cm");
    }

    #[test]
    fn test_format_area() {
        assert_eq!(format_area(452.39, MeasurementUnit::Px, 1.0), "452 px²");
        assert_eq!(format_area(100.0, MeasurementUnit::Mm, 0.5), "25.0 mm²");
        assert_eq!(format_area(100.0, MeasurementUnit::Cm, 0.5), "0.25 cm²");
    }

    #[test]
    fn test_unit_selector() {
        assert_eq!(MeasurementUnit::from_selector("mm"), Some(MeasurementUnit::Mm));
        assert_eq!(MeasurementUnit::from_selector("in"), None);
        assert_eq!(MeasurementUnit::Cm.to_string(), "cm");
    }
}
