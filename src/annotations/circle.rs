//! Circle measurement: drag out a radius from the center point

use super::{GestureController, GestureState, destroy_nodes, relabel, skip_missing_position};
use crate::config::AnnotationStyle;
use crate::domain::{
    CirclePrimitive, Label, Point, Primitive, StrokeStyle, circle_stats, distance, format_area,
    format_measurement,
};
use crate::render::geometry::label;
use crate::render::{Layer, NodeId};
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

#[derive(Debug, Clone, Copy)]
struct CircleNodes {
    circle: NodeId,
    label: NodeId,
}

#[derive(Debug)]
pub struct CircleController {
    style: AnnotationStyle,
    state: GestureState,
    nodes: Option<CircleNodes>,
    radius: f32,
}

impl CircleController {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            state: GestureState::Idle,
            nodes: None,
            radius: 0.0,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Radius of the live circle in pixels
    pub fn radius(&self) -> Option<f32> {
        self.nodes.map(|_| self.radius)
    }

    pub fn circle_id(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.circle)
    }

    pub fn label_id(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.label)
    }

    fn begin(&mut self, pos: Point, layer: &mut Layer, settings: &Settings) {
        self.destroy(layer);

        let circle = layer.add(Primitive::Circle(CirclePrimitive {
            x: pos.x,
            y: pos.y,
            radius: 0.0,
            stroke: StrokeStyle::dashed(&self.style),
        }));
        let text = format_measurement(0.0, settings.unit(), settings.pixel_spacing());
        let label = layer.add(Primitive::Label(Label::new(
            pos.x,
            pos.y - label::INITIAL_OFFSET,
            text,
            &self.style,
        )));

        self.nodes = Some(CircleNodes { circle, label });
        self.radius = 0.0;
        self.state = GestureState::Drawing { anchor: pos };
        layer.batch_draw();
    }

    fn update(&mut self, anchor: Point, pos: Point, layer: &mut Layer, settings: &Settings) {
        let Some(nodes) = self.nodes else {
            return;
        };
        let radius = distance(anchor, pos);
        self.radius = radius;

        if let Some(Primitive::Circle(circle)) = layer.get_mut(nodes.circle) {
            circle.radius = radius;
        }
        place_label(layer, nodes.label, anchor, radius, settings);
        layer.batch_draw();
    }

    fn destroy(&mut self, layer: &mut Layer) {
        if let Some(nodes) = self.nodes.take() {
            destroy_nodes(layer, [nodes.circle, nodes.label]);
            layer.batch_draw();
        }
        self.radius = 0.0;
    }
}

fn place_label(layer: &mut Layer, id: NodeId, center: Point, radius: f32, settings: &Settings) {
    relabel(layer, id, label_text(radius, settings), |l| {
        (
            center.x - l.width() / 2.0,
            center.y - radius - label::CIRCLE_OFFSET,
        )
    });
}

fn label_text(radius: f32, settings: &Settings) -> String {
    let (unit, spacing) = (settings.unit(), settings.pixel_spacing());
    let stats = circle_stats(radius);
    format!(
        "Radius: {}\nCircumference: {}\nArea: {}",
        format_measurement(radius, unit, spacing),
        format_measurement(stats.circumference, unit, spacing),
        format_area(stats.area, unit, spacing),
    )
}

impl GestureController for CircleController {
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
                skip_missing_position("circle", event)
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
        let Some(Primitive::Circle(circle)) = layer.get(nodes.circle) else {
            return;
        };
        let center = Point::new(circle.x, circle.y);
        place_label(layer, nodes.label, center, self.radius, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MeasurementUnit;

    fn setup() -> (CircleController, Layer, Settings) {
        (
            CircleController::new(AnnotationStyle::default()),
            Layer::new(),
            Settings::default(),
        )
    }

    fn label_of(layer: &Layer, c: &CircleController) -> Label {
        layer
            .get(c.label_id().unwrap())
            .and_then(Primitive::as_label)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_drag_sets_radius_and_label() {
        let (mut c, mut layer, settings) = setup();
        c.handle(PointerEvent::down(50.0, 50.0), &mut layer, &settings);
        assert_eq!(label_of(&layer, &c).text, "0 px");

        c.handle(PointerEvent::moved(53.0, 54.0), &mut layer, &settings);
        assert_eq!(c.radius(), Some(5.0));
        match layer.get(c.circle_id().unwrap()) {
            Some(Primitive::Circle(circle)) => assert_eq!(circle.radius, 5.0),
            other => panic!("unexpected primitive {other:?}"),
        }

        let label = label_of(&layer, &c);
        assert_eq!(label.text, "Radius: 5 px\nCircumference: 31 px\nArea: 79 px²");
        assert_eq!(label.y, 50.0 - 5.0 - 40.0);
        assert_eq!(label.x, 50.0 - label.width() / 2.0);

        c.handle(PointerEvent::up(53.0, 54.0), &mut layer, &settings);
        assert_eq!(c.state(), GestureState::Idle);
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn test_move_after_release_is_ignored() {
        let (mut c, mut layer, settings) = setup();
        c.handle(PointerEvent::down(0.0, 0.0), &mut layer, &settings);
        c.handle(PointerEvent::moved(3.0, 4.0), &mut layer, &settings);
        c.handle(PointerEvent::up(3.0, 4.0), &mut layer, &settings);
        c.handle(PointerEvent::moved(30.0, 40.0), &mut layer, &settings);
        assert_eq!(c.radius(), Some(5.0));
    }

    #[test]
    fn test_new_gesture_replaces_previous_circle() {
        let (mut c, mut layer, settings) = setup();
        c.handle(PointerEvent::down(10.0, 10.0), &mut layer, &settings);
        c.handle(PointerEvent::down(20.0, 20.0), &mut layer, &settings);
        assert_eq!(layer.count(|p| matches!(p, Primitive::Circle(_))), 1);
        assert_eq!(layer.count(|p| matches!(p, Primitive::Label(_))), 1);
    }

    #[test]
    fn test_missing_position_changes_nothing() {
        let (mut c, mut layer, settings) = setup();
        c.handle(PointerEvent::down(10.0, 10.0), &mut layer, &settings);
        c.handle(PointerEvent::moved(13.0, 14.0), &mut layer, &settings);
        layer.take_redraw();
        let snapshot: Vec<_> = layer.iter().cloned().collect();

        c.handle(PointerEvent::Move(None), &mut layer, &settings);
        c.handle(PointerEvent::Down(None), &mut layer, &settings);
        assert!(c.is_drawing());
        assert_eq!(layer.iter().cloned().collect::<Vec<_>>(), snapshot);
        assert!(!layer.take_redraw());
    }

    #[test]
    fn test_label_uses_current_unit() {
        let (mut c, mut layer, mut settings) = setup();
        settings.set_unit(MeasurementUnit::Mm);
        settings.set_pixel_spacing(0.5);
        c.handle(PointerEvent::down(0.0, 0.0), &mut layer, &settings);
        c.handle(PointerEvent::moved(10.0, 0.0), &mut layer, &settings);
        let text = label_of(&layer, &c).text;
        assert!(text.starts_with("Radius: 5.0 mm\n"), "{text}");
        assert!(text.ends_with("Area: 78.5 mm²"), "{text}");
    }

    #[test]
    fn test_relabel_switches_unit_of_finished_circle() {
        let (mut c, mut layer, mut settings) = setup();
        c.handle(PointerEvent::down(50.0, 50.0), &mut layer, &settings);
        c.handle(PointerEvent::moved(53.0, 54.0), &mut layer, &settings);
        c.handle(PointerEvent::up(53.0, 54.0), &mut layer, &settings);

        settings.set_unit(MeasurementUnit::Mm);
        settings.set_pixel_spacing(0.5);
        c.relabel(&mut layer, &settings);
        let label = label_of(&layer, &c);
        assert_eq!(label.text, "Radius: 2.5 mm\nCircumference: 15.7 mm\nArea: 19.6 mm²");
        assert_eq!(label.x, 50.0 - label.width() / 2.0);
        assert_eq!(label.y, 50.0 - 5.0 - 40.0);
    }

    #[test]
    fn test_zero_radius_is_still_shown() {
        let (mut c, mut layer, settings) = setup();
        c.handle(PointerEvent::down(10.0, 10.0), &mut layer, &settings);
        c.handle(PointerEvent::up(10.0, 10.0), &mut layer, &settings);
        assert_eq!(c.radius(), Some(0.0));
        assert_eq!(layer.len(), 2);
    }

    #[test]
    fn test_clear_destroys_primitives() {
        let (mut c, mut layer, settings) = setup();
        c.handle(PointerEvent::down(10.0, 10.0), &mut layer, &settings);
        c.clear(&mut layer);
        assert!(layer.is_empty());
        assert_eq!(c.radius(), None);
        assert!(!c.is_drawing());
    }
}
