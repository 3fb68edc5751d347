//! Ellipse measurement: axis-aligned radii dragged out from the center point

use super::{GestureController, GestureState, destroy_nodes, relabel, skip_missing_position};
use crate::config::AnnotationStyle;
use crate::domain::{
    EllipsePrimitive, Label, Point, Primitive, StrokeStyle, ellipse_stats, format_area,
    format_measurement,
};
use crate::render::geometry::label;
use crate::render::{Layer, NodeId};
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

#[derive(Debug, Clone, Copy)]
struct EllipseNodes {
    ellipse: NodeId,
    label: NodeId,
}

#[derive(Debug)]
pub struct EllipseController {
    style: AnnotationStyle,
    state: GestureState,
    nodes: Option<EllipseNodes>,
    radii: (f32, f32),
}

impl EllipseController {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            state: GestureState::Idle,
            nodes: None,
            radii: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// `(radius_x, radius_y)` of the live ellipse in pixels
    pub fn radii(&self) -> Option<(f32, f32)> {
        self.nodes.map(|_| self.radii)
    }

    pub fn ellipse_id(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.ellipse)
    }

    pub fn label_id(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.label)
    }

    fn begin(&mut self, pos: Point, layer: &mut Layer, settings: &Settings) {
        self.destroy(layer);

        let ellipse = layer.add(Primitive::Ellipse(EllipsePrimitive {
            x: pos.x,
            y: pos.y,
            radius_x: 0.0,
            radius_y: 0.0,
            stroke: StrokeStyle::dashed(&self.style),
        }));
        let text = format_measurement(0.0, settings.unit(), settings.pixel_spacing());
        let label = layer.add(Primitive::Label(Label::new(
            pos.x,
            pos.y - label::INITIAL_OFFSET,
            text,
            &self.style,
        )));

        self.nodes = Some(EllipseNodes { ellipse, label });
        self.radii = (0.0, 0.0);
        self.state = GestureState::Drawing { anchor: pos };
        layer.batch_draw();
    }

    fn update(&mut self, anchor: Point, pos: Point, layer: &mut Layer, settings: &Settings) {
        let Some(nodes) = self.nodes else {
            return;
        };
        let (dx, dy) = pos.delta_from(anchor);
        let (radius_x, radius_y) = (dx.abs(), dy.abs());
        self.radii = (radius_x, radius_y);

        if let Some(Primitive::Ellipse(ellipse)) = layer.get_mut(nodes.ellipse) {
            ellipse.radius_x = radius_x;
            ellipse.radius_y = radius_y;
        }
        place_label(layer, nodes.label, anchor, self.radii, settings);
        layer.batch_draw();
    }

    fn destroy(&mut self, layer: &mut Layer) {
        if let Some(nodes) = self.nodes.take() {
            destroy_nodes(layer, [nodes.ellipse, nodes.label]);
            layer.batch_draw();
        }
        self.radii = (0.0, 0.0);
    }
}

fn place_label(
    layer: &mut Layer,
    id: NodeId,
    center: Point,
    (radius_x, radius_y): (f32, f32),
    settings: &Settings,
) {
    relabel(layer, id, label_text(radius_x, radius_y, settings), |l| {
        (
            center.x - l.width() / 2.0,
            center.y - radius_y - label::ELLIPSE_OFFSET,
        )
    });
}

fn label_text(radius_x: f32, radius_y: f32, settings: &Settings) -> String {
    let (unit, spacing) = (settings.unit(), settings.pixel_spacing());
    let stats = ellipse_stats(radius_x, radius_y);
    format!(
        "RadiusX: {}\nRadiusY: {}\nCircumference: {}\nArea: {}",
        format_measurement(radius_x, unit, spacing),
        format_measurement(radius_y, unit, spacing),
        format_measurement(stats.circumference, unit, spacing),
        format_area(stats.area, unit, spacing),
    )
}

impl GestureController for EllipseController {
    fn handle(&mut self, event: PointerEvent, layer: &mut Layer, settings: &Settings) {
        match event {
            PointerEvent::Down(Some(pos)) => self.begin(pos, layer, settings),
            PointerEvent::Move(Some(pos)) => {
                if let GestureState::Drawing { anchor } = self.state {
                    self.update(anchor, pos, layer, settings);
                }
            }
            PointerEvent::Up(_) => self.state = GestureState::Idle,
            PointerEvent::Down(None) | PointerEvent::Move(None) => {
                skip_missing_position("ellipse", event)
            }
        }
    }

    fn cancel(&mut self, _layer: &mut Layer) {
        self.state = GestureState::Idle;
    }

    fn clear(&mut self, layer: &mut Layer) {
        self.state = GestureState::Idle;
        self.destroy(layer);
    }

    fn is_drawing(&self) -> bool {
        matches!(self.state, GestureState::Drawing { .. })
    }

    fn relabel(&mut self, layer: &mut Layer, settings: &Settings) {
        let Some(nodes) = self.nodes else {
            return;
        };
        let Some(Primitive::Ellipse(ellipse)) = layer.get(nodes.ellipse) else {
            return;
        };
        let center = Point::new(ellipse.x, ellipse.y);
        place_label(layer, nodes.label, center, self.radii, settings);
    }
}
