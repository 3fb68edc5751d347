//! Angle measurement driven by clicks rather than drags
//!
//! The first click starts ray 1, the second fixes the vertex and starts
//! ray 2, the third fixes ray 2 and the fourth clears the marker. Between
//! clicks the free end of the current ray follows the pointer, and while
//! ray 2 is live the label shows the angle at the vertex.

use super::{GestureController, relabel, skip_missing_position};
use crate::config::AnnotationStyle;
use crate::domain::{Label, LinePrimitive, Point, Primitive, StrokeStyle, angle_between};
use crate::render::geometry::label;
use crate::render::{Layer, NodeId};
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AngleState {
    #[default]
    Idle,
    /// Ray 1 rubber-bands from `start`
    FirstRay { start: Point },
    /// Ray 1 is fixed at `start -> vertex`; ray 2 rubber-bands from `vertex`
    SecondRay { start: Point, vertex: Point },
    /// Both rays fixed
    Finished {
        start: Point,
        vertex: Point,
        end: Point,
    },
}

#[derive(Debug, Default)]
struct AngleNodes {
    ray1: Option<NodeId>,
    ray2: Option<NodeId>,
    label: Option<NodeId>,
}

#[derive(Debug)]
pub struct AngleController {
    style: AnnotationStyle,
    state: AngleState,
    nodes: AngleNodes,
    angle: Option<f32>,
}

impl AngleController {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            state: AngleState::Idle,
            nodes: AngleNodes::default(),
            angle: None,
        }
    }

    pub fn state(&self) -> AngleState {
        self.state
    }

    /// Current angle in degrees, live while ray 2 follows the pointer
    pub fn angle(&self) -> Option<f32> {
        self.angle
    }

    fn click(&mut self, pos: Point, layer: &mut Layer) {
        self.state = match self.state {
            AngleState::Idle => {
                self.nodes.ray1 = Some(self.add_ray(layer, pos));
                AngleState::FirstRay { start: pos }
            }
            AngleState::FirstRay { start } => {
                self.set_ray(layer, self.nodes.ray1, start, pos);
                self.nodes.ray2 = Some(self.add_ray(layer, pos));
                self.nodes.label = Some(layer.add(Primitive::Label(Label::new(
                    pos.x + label::ANGLE_DX,
                    pos.y + label::ANGLE_DY,
                    "0°",
                    &self.style,
                ))));
                self.angle = Some(0.0);
                AngleState::SecondRay { start, vertex: pos }
            }
            AngleState::SecondRay { start, vertex } => {
                self.track_second_ray(layer, start, vertex, pos);
                AngleState::Finished {
                    start,
                    vertex,
                    end: pos,
                }
            }
            AngleState::Finished { .. } => {
                self.destroy(layer);
                AngleState::Idle
            }
        };
        log::debug!("angle: click at ({}, {}) -> {:?}", pos.x, pos.y, self.state);
        layer.batch_draw();
    }

    fn track(&mut self, pos: Point, layer: &mut Layer) {
        match self.state {
            AngleState::FirstRay { start } => self.set_ray(layer, self.nodes.ray1, start, pos),
            AngleState::SecondRay { start, vertex } => {
                self.track_second_ray(layer, start, vertex, pos)
            }
            AngleState::Idle | AngleState::Finished { .. } => return,
        }
        layer.batch_draw();
    }

    fn track_second_ray(&mut self, layer: &mut Layer, start: Point, vertex: Point, pos: Point) {
        self.set_ray(layer, self.nodes.ray2, vertex, pos);
        let angle = angle_between(vertex, start, pos);
        self.angle = Some(angle);
        if let Some(id) = self.nodes.label {
            relabel(layer, id, format!("{}°", angle.round() as i64), |_| {
                (vertex.x + label::ANGLE_DX, vertex.y + label::ANGLE_DY)
            });
        }
    }

    fn add_ray(&self, layer: &mut Layer, at: Point) -> NodeId {
        layer.add(Primitive::Line(LinePrimitive {
            points: [at.x, at.y, at.x, at.y],
            stroke: StrokeStyle::solid(&self.style),
        }))
    }

    fn set_ray(&self, layer: &mut Layer, id: Option<NodeId>, from: Point, to: Point) {
        if let Some(id) = id
            && let Some(Primitive::Line(line)) = layer.get_mut(id)
        {
            line.points = [from.x, from.y, to.x, to.y];
        }
    }

    fn destroy(&mut self, layer: &mut Layer) {
        let nodes = std::mem::take(&mut self.nodes);
        for id in [nodes.ray1, nodes.ray2, nodes.label].into_iter().flatten() {
            layer.destroy(id);
        }
        self.angle = None;
    }
}

impl GestureController for AngleController {
    fn handle(&mut self, event: PointerEvent, layer: &mut Layer, _settings: &Settings) {
        match event {
            PointerEvent::Down(Some(pos)) => self.click(pos, layer),
            PointerEvent::Move(Some(pos)) => self.track(pos, layer),
            PointerEvent::Up(_) => {}
            PointerEvent::Down(None) | PointerEvent::Move(None) => {
                skip_missing_position("angle", event)
            }
        }
    }

    /// A half-drawn marker is removed; a finished one stays
    fn cancel(&mut self, layer: &mut Layer) {
        if self.is_drawing() {
            self.destroy(layer);
            self.state = AngleState::Idle;
            layer.batch_draw();
        }
    }

    fn clear(&mut self, layer: &mut Layer) {
        self.destroy(layer);
        self.state = AngleState::Idle;
        layer.batch_draw();
    }

    fn is_drawing(&self) -> bool {
        matches!(
            self.state,
            AngleState::FirstRay { .. } | AngleState::SecondRay { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(c: &mut AngleController, layer: &mut Layer, x: f32, y: f32) {
        let settings = Settings::default();
        c.handle(PointerEvent::down(x, y), layer, &settings);
        c.handle(PointerEvent::up(x, y), layer, &settings);
    }

    fn lines(layer: &Layer) -> Vec<[f32; 4]> {
        layer
            .iter()
            .filter_map(|p| match p {
                Primitive::Line(l) => Some(l.points),
                _ => None,
            })
            .collect()
    }

    fn label_text(layer: &Layer) -> Option<String> {
        layer.iter().find_map(|p| p.as_label().map(|l| l.text.clone()))
    }

    #[test]
    fn test_three_clicks_measure_right_angle() {
        let mut c = AngleController::new(AnnotationStyle::default());
        let mut layer = Layer::new();
        click(&mut c, &mut layer, 0.0, 0.0);
        click(&mut c, &mut layer, 10.0, 0.0);
        click(&mut c, &mut layer, 10.0, 10.0);

        assert!((c.angle().unwrap() - 90.0).abs() < 1e-3);
        assert_eq!(label_text(&layer).as_deref(), Some("90°"));
        assert_eq!(
            lines(&layer),
            vec![[0.0, 0.0, 10.0, 0.0], [10.0, 0.0, 10.0, 10.0]]
        );
        assert!(matches!(c.state(), AngleState::Finished { .. }));
        assert!(!c.is_drawing());
    }

    #[test]
    fn test_fourth_click_resets() {
        let mut c = AngleController::new(AnnotationStyle::default());
        let mut layer = Layer::new();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (50.0, 50.0)] {
            click(&mut c, &mut layer, x, y);
        }
        assert_eq!(c.state(), AngleState::Idle);
        assert!(layer.is_empty());
        assert_eq!(c.angle(), None);

        // The next click starts a fresh marker
        click(&mut c, &mut layer, 1.0, 1.0);
        assert_eq!(c.state(), AngleState::FirstRay { start: Point::new(1.0, 1.0) });
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_rays_follow_pointer_between_clicks() {
        let mut c = AngleController::new(AnnotationStyle::default());
        let mut layer = Layer::new();
        let settings = Settings::default();

        click(&mut c, &mut layer, 0.0, 0.0);
        assert_eq!(lines(&layer), vec![[0.0, 0.0, 0.0, 0.0]]);
        c.handle(PointerEvent::moved(5.0, 5.0), &mut layer, &settings);
        assert_eq!(lines(&layer), vec![[0.0, 0.0, 5.0, 5.0]]);

        click(&mut c, &mut layer, 10.0, 0.0);
        assert_eq!(label_text(&layer).as_deref(), Some("0°"));
        c.handle(PointerEvent::moved(20.0, 0.0), &mut layer, &settings);
        // Straight continuation of ray 1
        assert_eq!(label_text(&layer).as_deref(), Some("180°"));
        c.handle(PointerEvent::moved(10.0, -10.0), &mut layer, &settings);
        assert_eq!(label_text(&layer).as_deref(), Some("90°"));
        assert_eq!(
            lines(&layer),
            vec![[0.0, 0.0, 10.0, 0.0], [10.0, 0.0, 10.0, -10.0]]
        );

        let label = layer.iter().find_map(Primitive::as_label).unwrap();
        assert_eq!((label.x, label.y), (20.0, -20.0));
    }

    #[test]
    fn test_release_does_not_advance() {
        let mut c = AngleController::new(AnnotationStyle::default());
        let mut layer = Layer::new();
        let settings = Settings::default();
        c.handle(PointerEvent::down(0.0, 0.0), &mut layer, &settings);
        c.handle(PointerEvent::up(3.0, 3.0), &mut layer, &settings);
        c.handle(PointerEvent::up(4.0, 4.0), &mut layer, &settings);
        assert_eq!(c.state(), AngleState::FirstRay { start: Point::new(0.0, 0.0) });
    }

    #[test]
    fn test_missing_position_changes_nothing() {
        let mut c = AngleController::new(AnnotationStyle::default());
        let mut layer = Layer::new();
        let settings = Settings::default();
        click(&mut c, &mut layer, 0.0, 0.0);
        click(&mut c, &mut layer, 10.0, 0.0);
        c.handle(PointerEvent::moved(10.0, 10.0), &mut layer, &settings);
        let snapshot: Vec<_> = layer.iter().cloned().collect();

        c.handle(PointerEvent::Move(None), &mut layer, &settings);
        c.handle(PointerEvent::Down(None), &mut layer, &settings);
        assert_eq!(layer.iter().cloned().collect::<Vec<_>>(), snapshot);
        assert!(matches!(c.state(), AngleState::SecondRay { .. }));
    }

    #[test]
    fn test_cancel_removes_half_drawn_marker_only() {
        let mut c = AngleController::new(AnnotationStyle::default());
        let mut layer = Layer::new();
        click(&mut c, &mut layer, 0.0, 0.0);
        click(&mut c, &mut layer, 10.0, 0.0);
        c.cancel(&mut layer);
        assert!(layer.is_empty());
        assert_eq!(c.state(), AngleState::Idle);

        click(&mut c, &mut layer, 0.0, 0.0);
        click(&mut c, &mut layer, 10.0, 0.0);
        click(&mut c, &mut layer, 10.0, 10.0);
        c.cancel(&mut layer);
        assert_eq!(layer.len(), 3);
    }
}
