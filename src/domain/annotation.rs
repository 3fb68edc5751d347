//! Annotation primitives placed on the drawing surface
//!
//! All primitives store coordinates in surface-local logical coordinates.

use crate::config::{AnnotationStyle, ShapeColor};

/// Stroke appearance shared by every outline primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: ShapeColor,
    pub width: f32,
    /// Dash and gap lengths, or `None` for a solid stroke
    pub dash: Option<[f32; 2]>,
}

impl StrokeStyle {
    /// Dashed outline used by crop boxes, circles and ellipses
    pub fn dashed(style: &AnnotationStyle) -> Self {
        Self {
            color: style.color,
            width: style.stroke_width,
            dash: Some(style.dash),
        }
    }

    /// Solid stroke used by angle rays and distance lines
    pub fn solid(style: &AnnotationStyle) -> Self {
        Self {
            color: style.color,
            width: style.stroke_width,
            dash: None,
        }
    }
}

/// Rectangle outline; width and height keep the sign of the drag
#[derive(Clone, Debug, PartialEq)]
pub struct RectPrimitive {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stroke: StrokeStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CirclePrimitive {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub stroke: StrokeStyle,
}

/// Axis-aligned ellipse centered on `(x, y)`
#[derive(Clone, Debug, PartialEq)]
pub struct EllipsePrimitive {
    pub x: f32,
    pub y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
    pub stroke: StrokeStyle,
}

/// Straight segment `[x1, y1, x2, y2]`
#[derive(Clone, Debug, PartialEq)]
pub struct LinePrimitive {
    pub points: [f32; 4],
    pub stroke: StrokeStyle,
}

/// Measurement text anchored at its top-left corner
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
    pub color: ShapeColor,
}

impl Label {
    /// Average advance of a glyph relative to the font size
    const GLYPH_ADVANCE: f32 = 0.6;

    pub fn new(x: f32, y: f32, text: impl Into<String>, style: &AnnotationStyle) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            font_size: style.font_size,
            color: style.color,
        }
    }

    /// Estimated rendered width of the widest line
    pub fn width(&self) -> f32 {
        let widest = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        widest as f32 * self.font_size * Self::GLYPH_ADVANCE
    }
}

/// Any node that can live on a [`crate::render::Layer`]
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Ellipse(EllipsePrimitive),
    Line(LinePrimitive),
    Label(Label),
}

impl Primitive {
    /// Check if this primitive is an outline shape rather than text
    pub fn is_shape(&self) -> bool {
        !matches!(self, Primitive::Label(_))
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Primitive::Label(label) => Some(label),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_width_uses_widest_line() {
        let style = AnnotationStyle::default();
        let label = Label::new(0.0, 0.0, "ab\nabcd\nc", &style);
        assert!((label.width() - 4.0 * style.font_size * 0.6).abs() < 1e-4);
        assert_eq!(Label::new(0.0, 0.0, "", &style).width(), 0.0);
    }

    #[test]
    fn test_primitive_kind() {
        let style = AnnotationStyle::default();
        let label = Primitive::Label(Label::new(1.0, 2.0, "0°", &style));
        assert!(!label.is_shape());
        assert_eq!(label.as_label().map(|l| l.text.as_str()), Some("0°"));

        let line = Primitive::Line(LinePrimitive {
            points: [0.0; 4],
            stroke: StrokeStyle::solid(&style),
        });
        assert!(line.is_shape());
        assert!(line.as_label().is_none());
    }
}
