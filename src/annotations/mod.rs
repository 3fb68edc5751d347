//! Interactive measurement tools
//!
//! This module provides:
//! - One gesture controller per shape kind (crop box, circle, ellipse,
//!   angle, distance line), each an explicit state machine over pointer events
//! - Pointer dispatch on the active tool (handlers.rs)
//!
//! Controllers own the primitives they put on the layer. Starting a new
//! gesture destroys the previous primitive of the same kind synchronously,
//! so at most one of each kind is live at a time.

pub mod angle;
pub mod circle;
pub mod crop;
pub mod ellipse;
pub mod handlers;
pub mod line;

pub use angle::AngleController;
pub use circle::CircleController;
pub use crop::CropController;
pub use ellipse::EllipseController;
pub use line::LineController;

use crate::config::{AnnotationStyle, ShapeTool};
use crate::domain::{Label, Point, Primitive};
use crate::render::{Layer, NodeId};
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

/// State of a press-drag-release gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Pointer is down; geometry follows the pointer from `anchor`
    Drawing { anchor: Point },
}

impl GestureState {
    pub fn anchor(&self) -> Option<Point> {
        match *self {
            GestureState::Idle => None,
            GestureState::Drawing { anchor } => Some(anchor),
        }
    }
}

/// A pointer-driven drawing tool
pub trait GestureController {
    /// Advance the state machine; events without a position change nothing
    fn handle(&mut self, event: PointerEvent, layer: &mut Layer, settings: &Settings);

    /// Abandon an in-flight gesture. Finished primitives stay on the layer.
    fn cancel(&mut self, layer: &mut Layer);

    /// Destroy every primitive owned by this controller
    fn clear(&mut self, layer: &mut Layer);

    fn is_drawing(&self) -> bool;

    /// Rewrite live labels after the unit or pixel spacing changed
    fn relabel(&mut self, _layer: &mut Layer, _settings: &Settings) {}
}

/// The full set of tools of a session
#[derive(Debug)]
pub struct Controllers {
    pub crop: CropController,
    pub circle: CircleController,
    pub ellipse: EllipseController,
    pub angle: AngleController,
    pub line: LineController,
}

impl Controllers {
    pub fn new(style: AnnotationStyle) -> Self {
        Self {
            crop: CropController::new(style),
            circle: CircleController::new(style),
            ellipse: EllipseController::new(style),
            angle: AngleController::new(style),
            line: LineController::new(style),
        }
    }

    /// Controller driven by the given tool
    pub fn get_mut(&mut self, tool: ShapeTool) -> &mut dyn GestureController {
        match tool {
            ShapeTool::Circle => &mut self.circle,
            ShapeTool::Ellipse => &mut self.ellipse,
            ShapeTool::Angle => &mut self.angle,
            ShapeTool::Roi => &mut self.crop,
            ShapeTool::Line => &mut self.line,
        }
    }

    pub fn relabel_all(&mut self, layer: &mut Layer, settings: &Settings) {
        for tool in ShapeTool::ALL {
            self.get_mut(tool).relabel(layer, settings);
        }
    }

    pub fn clear_all(&mut self, layer: &mut Layer) {
        for tool in ShapeTool::ALL {
            self.get_mut(tool).clear(layer);
        }
    }
}

/// Replace a label's text and move it to the position computed from it
pub(crate) fn relabel(
    layer: &mut Layer,
    id: NodeId,
    text: String,
    place: impl FnOnce(&Label) -> (f32, f32),
) {
    if let Some(Primitive::Label(label)) = layer.get_mut(id) {
        label.text = text;
        let (x, y) = place(label);
        label.x = x;
        label.y = y;
    }
}

pub(crate) fn destroy_nodes(layer: &mut Layer, ids: impl IntoIterator<Item = NodeId>) {
    for id in ids {
        layer.destroy(id);
    }
}

/// Log and drop an event that carries no position
pub(crate) fn skip_missing_position(tool: &str, event: PointerEvent) {
    log::trace!("{tool}: ignoring {event:?} without a position");
}
