//! Image rendering for annotations using tiny-skia
//!
//! These functions flatten the primitives of a layer onto an RgbaImage, for
//! exporting an annotated view. Labels are left to the host's text renderer.

use image::RgbaImage;
use tiny_skia::{LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::geometry::{self, BEZIER_K};
use super::layer::Layer;
use crate::domain::{Primitive, StrokeStyle};

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

fn build_rect_path(x: f32, y: f32, width: f32, height: f32) -> Option<Path> {
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(x, y, x + width, y + height);

    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let kx = rx * BEZIER_K;
    let ky = ry * BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

fn build_line_path(points: [f32; 4]) -> Option<Path> {
    let [x1, y1, x2, y2] = points;
    let mut pb = PathBuilder::new();
    pb.move_to(x1, y1);
    pb.line_to(x2, y2);
    pb.finish()
}

/// Outline path of a shape primitive; `None` for labels and zero-size shapes
fn shape_path(primitive: &Primitive) -> Option<(Path, StrokeStyle)> {
    match primitive {
        Primitive::Rect(r) if r.width != 0.0 && r.height != 0.0 => {
            Some((build_rect_path(r.x, r.y, r.width, r.height)?, r.stroke))
        }
        Primitive::Circle(c) if c.radius > 0.0 => {
            Some((build_ellipse_path(c.x, c.y, c.radius, c.radius)?, c.stroke))
        }
        Primitive::Ellipse(e) if e.radius_x > 0.0 && e.radius_y > 0.0 => Some((
            build_ellipse_path(e.x, e.y, e.radius_x, e.radius_y)?,
            e.stroke,
        )),
        Primitive::Line(l) => Some((build_line_path(l.points)?, l.stroke)),
        _ => None,
    }
}

fn stroke_for(style: &StrokeStyle) -> Stroke {
    let dash = style
        .dash
        .and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0));
    Stroke {
        width: style.width.max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash,
        ..Default::default()
    }
}

/// Draw every shape on the layer onto an image, bottom first
pub fn draw_layer_on_image(img: &mut RgbaImage, layer: &Layer) {
    let shapes: Vec<_> = layer
        .iter()
        .filter(|p| p.is_shape())
        .filter_map(shape_path)
        .collect();
    if shapes.is_empty() {
        return;
    }

    with_pixmap(img, |pixmap| {
        for (path, style) in &shapes {
            let [r, g, b, a] = style.color.to_rgba_u8();
            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            paint.anti_alias = true;

            pixmap.stroke_path(path, &paint, &stroke_for(style), Transform::identity(), None);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnotationStyle;
    use crate::domain::{CirclePrimitive, Label, LinePrimitive, RectPrimitive};
    use image::Rgba;

    fn black(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255]))
    }

    fn green_pixels(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p[1] > 128 && p[0] < 64).count()
    }

    #[test]
    fn test_solid_line_is_drawn() {
        let style = AnnotationStyle::default();
        let mut layer = Layer::new();
        layer.add(Primitive::Line(LinePrimitive {
            points: [2.0, 10.0, 18.0, 10.0],
            stroke: StrokeStyle::solid(&style),
        }));

        let mut img = black(20);
        draw_layer_on_image(&mut img, &layer);
        assert!(img.get_pixel(10, 10)[1] > 128);
        assert_eq!(img.get_pixel(10, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_dashed_rect_negative_size_is_drawn() {
        let style = AnnotationStyle::default();
        let mut layer = Layer::new();
        layer.add(Primitive::Rect(RectPrimitive {
            x: 30.0,
            y: 30.0,
            width: -20.0,
            height: -20.0,
            stroke: StrokeStyle::dashed(&style),
        }));

        let mut img = black(40);
        draw_layer_on_image(&mut img, &layer);
        assert!(green_pixels(&img) > 0);
        // Interior stays untouched
        assert_eq!(img.get_pixel(20, 20).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_labels_and_degenerate_shapes_are_skipped() {
        let style = AnnotationStyle::default();
        let mut layer = Layer::new();
        layer.add(Primitive::Label(Label::new(5.0, 5.0, "Radius: 0 px", &style)));
        layer.add(Primitive::Circle(CirclePrimitive {
            x: 10.0,
            y: 10.0,
            radius: 0.0,
            stroke: StrokeStyle::dashed(&style),
        }));

        let mut img = black(20);
        let before = img.clone();
        draw_layer_on_image(&mut img, &layer);
        assert_eq!(img, before);
    }
}
