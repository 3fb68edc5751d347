//! Pointer dispatch and tool switching
//!
//! Only the controller of the active tool sees pointer events. Switching
//! tools abandons whatever gesture the other tools had in flight.

use super::{Controllers, GestureController};
use crate::config::ShapeTool;
use crate::render::Layer;
use crate::session::messages::PointerEvent;
use crate::session::settings::Settings;

/// Route a pointer event to the active tool; no-op when no tool is selected
pub fn handle_pointer(
    controllers: &mut Controllers,
    event: PointerEvent,
    layer: &mut Layer,
    settings: &Settings,
) {
    let Some(tool) = settings.active_shape() else {
        log::trace!("no active tool, dropping {event:?}");
        return;
    };
    controllers.get_mut(tool).handle(event, layer, settings);
}

/// Select a tool (or none) and cancel in-flight gestures of every other tool
pub fn switch_tool(
    controllers: &mut Controllers,
    tool: Option<ShapeTool>,
    layer: &mut Layer,
    settings: &mut Settings,
) {
    if settings.active_shape() == tool {
        return;
    }
    disable_other_tools(controllers, tool, layer);
    settings.set_active_shape(tool);
    log::debug!(
        "active tool: {}",
        tool.map(ShapeTool::selector).unwrap_or("none")
    );
}

fn disable_other_tools(controllers: &mut Controllers, keep: Option<ShapeTool>, layer: &mut Layer) {
    for tool in ShapeTool::ALL {
        if Some(tool) != keep {
            let controller: &mut dyn GestureController = controllers.get_mut(tool);
            if controller.is_drawing() {
                controller.cancel(layer);
            }
        }
    }
}
