//! Crop box: a dashed rectangle dragged from an anchor in any direction
//!
//! While dragging, width and height keep their sign so the box can grow up
//! or to the left of the anchor. [`CropController::region`] returns the
//! normalized box used when extracting pixels.

use super::{GestureController, GestureState, skip_missing_position};
use crate::config::AnnotationStyle;
use crate::domain::{Point, Primitive, Rect, RectPrimitive, StrokeStyle};
use crate::render::{Layer, NodeId};
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

#[derive(Debug)]
pub struct CropController {
    style: AnnotationStyle,
    state: GestureState,
    node: Option<NodeId>,
    rect: Rect,
}

impl CropController {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            style,
            state: GestureState::Idle,
            node: None,
            rect: Rect::default(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn box_id(&self) -> Option<NodeId> {
        self.node
    }

    /// Live box as drawn, with signed width and height
    pub fn crop_box(&self) -> Option<Rect> {
        self.node.map(|_| self.rect)
    }

    /// Normalized crop region in display coordinates, `None` if empty
    pub fn region(&self) -> Option<Rect> {
        let rect = self.crop_box()?.normalized();
        (!rect.is_empty()).then_some(rect)
    }

    fn begin(&mut self, pos: Point, layer: &mut Layer) {
        self.destroy(layer);

        self.rect = Rect::new(pos.x, pos.y, 0.0, 0.0);
        self.node = Some(layer.add(Primitive::Rect(RectPrimitive {
            x: pos.x,
            y: pos.y,
            width: 0.0,
            height: 0.0,
            stroke: StrokeStyle::dashed(&self.style),
        })));
        self.state = GestureState::Drawing { anchor: pos };
        layer.batch_draw();
    }

    fn update(&mut self, anchor: Point, pos: Point, layer: &mut Layer) {
        let Some(node) = self.node else {
            return;
        };
        let (width, height) = pos.delta_from(anchor);
        self.rect.width = width;
        self.rect.height = height;

        if let Some(Primitive::Rect(rect)) = layer.get_mut(node) {
            rect.width = width;
            rect.height = height;
        }
        layer.batch_draw();
    }

    fn destroy(&mut self, layer: &mut Layer) {
        if let Some(node) = self.node.take() {
            layer.destroy(node);
            layer.batch_draw();
        }
        self.rect = Rect::default();
    }
}

impl GestureController for CropController {
    fn handle(&mut self, event: PointerEvent, layer: &mut Layer, _settings: &Settings) {
        match event {
            PointerEvent::Down(Some(pos)) => self.begin(pos, layer),
            PointerEvent::Move(Some(pos)) => {
                if let GestureState::Drawing { anchor } = self.state {
                    self.update(anchor, pos, layer);
                }
            }
            PointerEvent::Up(_) => self.state = GestureState::Idle,
            PointerEvent::Down(None) | PointerEvent::Move(None) => {
                skip_missing_position("crop", event)
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
}
