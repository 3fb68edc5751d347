//! Message types for a viewing session
//!
//! This module contains:
//! - Pointer events fed to the shape controllers
//! - Settings messages emitted by the host UI controls
//! - The top-level Msg enum dispatched by the session

use crate::config::ShapeTool;
use crate::domain::{MeasurementUnit, Point};

// ============================================================================
// Pointer Events
// ============================================================================

/// Mouse or touch event on the drawing surface
///
/// The position is `None` when the host could not resolve it, for example
/// when the pointer left the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse down or touch start
    Down(Option<Point>),
    /// Mouse move or touch move
    Move(Option<Point>),
    /// Mouse up or touch end
    Up(Option<Point>),
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down(pos) | PointerEvent::Move(pos) | PointerEvent::Up(pos) => pos,
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        PointerEvent::Down(Some(Point::new(x, y)))
    }

    pub fn moved(x: f32, y: f32) -> Self {
        PointerEvent::Move(Some(Point::new(x, y)))
    }

    pub fn up(x: f32, y: f32) -> Self {
        PointerEvent::Up(Some(Point::new(x, y)))
    }
}

// ============================================================================
// Settings Messages
// ============================================================================

/// Changes coming from the host's controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsMsg {
    SetUnit(MeasurementUnit),
    /// Millimetres per pixel
    SetPixelSpacing(f32),
    SetWindowWidth(f32),
    SetWindowCenter(f32),
    /// Slider position in -100..100
    SetBrightness(f32),
    /// Slider position in -100..100
    SetContrast(f32),
    SetActiveShape(Option<ShapeTool>),
}

// ============================================================================
// Top-level Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Msg {
    Pointer(PointerEvent),
    Settings(SettingsMsg),
    /// Destroy every annotation and reset all controllers
    ClearAnnotations,
}

impl From<PointerEvent> for Msg {
    fn from(event: PointerEvent) -> Self {
        Msg::Pointer(event)
    }
}

impl From<SettingsMsg> for Msg {
    fn from(msg: SettingsMsg) -> Self {
        Msg::Settings(msg)
    }
}
