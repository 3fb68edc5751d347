//! Distance measurement between two points

use super::{GestureController, GestureState, destroy_nodes, relabel, skip_missing_position};
use crate::config::AnnotationStyle;
use crate::domain::{Label, LinePrimitive, Point, Primitive, StrokeStyle, distance, format_measurement};
use crate::render::geometry::label;
use crate::render::{Layer, NodeId};
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

#[derive(Debug, Clone, Copy)]
struct LineNodes {
    line: NodeId,
    label: NodeId,
}

#[derive(Debug)]
pub struct LineController {
    style: AnnotationStyle,
    state: GestureState,
    nodes: Option<LineNodes>,
    length: f32,
}

impl LineController {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            state: GestureState::Idle,
            nodes: None,
            length: 0.0,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Length of the live line in pixels
    pub fn length(&self) -> Option<f32> {
        self.nodes.map(|_| self.length)
    }

    pub fn line_id(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.line)
    }

    pub fn label_id(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.label)
    }

    fn begin(&mut self, pos: Point, layer: &mut Layer, settings: &Settings) {
        self.destroy(layer);

        let line = layer.add(Primitive::Line(LinePrimitive {
            points: [pos.x, pos.y, pos.x, pos.y],
            stroke: StrokeStyle::solid(&self.style),
        }));
        let text = format_measurement(0.0, settings.unit(), settings.pixel_spacing());
        let label = layer.add(Primitive::Label(Label::new(
            pos.x + label::LINE_DX,
            pos.y + label::LINE_DY,
            text,
            &self.style,
        )));

        self.nodes = Some(LineNodes { line, label });
        self.length = 0.0;
        self.state = GestureState::Drawing { anchor: pos };
        layer.batch_draw();
    }

    fn update(&mut self, anchor: Point, pos: Point, layer: &mut Layer, settings: &Settings) {
        let Some(nodes) = self.nodes else {
            return;
        };
        self.length = distance(anchor, pos);

        if let Some(Primitive::Line(line)) = layer.get_mut(nodes.line) {
            line.points = [anchor.x, anchor.y, pos.x, pos.y];
        }
        place_label(layer, nodes.label, pos, self.length, settings);
        layer.batch_draw();
    }

    fn destroy(&mut self, layer: &mut Layer) {
        if let Some(nodes) = self.nodes.take() {
            destroy_nodes(layer, [nodes.line, nodes.label]);
            layer.batch_draw();
        }
        self.length = 0.0;
    }
}

fn place_label(layer: &mut Layer, id: NodeId, end: Point, length: f32, settings: &Settings) {
    let text = format_measurement(length, settings.unit(), settings.pixel_spacing());
    relabel(layer, id, text, |_| {
        (end.x + label::LINE_DX, end.y + label::LINE_DY)
    });
}

impl GestureController for LineController {
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
                skip_missing_position("line", event)
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
        let Some(Primitive::Line(line)) = layer.get(nodes.line) else {
            return;
        };
        let end = Point::new(line.points[2], line.points[3]);
        place_label(layer, nodes.label, end, self.length, settings);
    }
}
