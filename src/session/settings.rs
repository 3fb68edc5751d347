//! Viewing settings shared by the shape controllers and the transform engine
//!
//! Setters are the only mutation path. Each one validates its input and
//! leaves the previous value in place when the input is out of range.

use crate::config::{ShapeTool, ViewerConfig};
use crate::domain::MeasurementUnit;

/// Sliders in the host UI run from -100 to 100
pub const SLIDER_SCALE: f32 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    unit: MeasurementUnit,
    pixel_spacing: f32,
    window_width: f32,
    window_center: f32,
    brightness: f32,
    contrast: f32,
    active_shape: Option<ShapeTool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: MeasurementUnit::Px,
            pixel_spacing: 1.0,
            window_width: 2048.0,
            window_center: 1024.0,
            brightness: 0.0,
            contrast: 0.0,
            active_shape: None,
        }
    }
}

impl Settings {
    /// Seed settings from the persisted config, skipping invalid values
    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut settings = Self::default();
        settings.set_unit(config.unit);
        settings.set_pixel_spacing(config.pixel_spacing);
        settings.set_window_width(config.window_width);
        settings.set_window_center(config.window_center);
        settings.set_brightness(config.brightness);
        settings.set_contrast(config.contrast);
        settings.set_active_shape(config.active_shape);
        settings
    }

    pub fn unit(&self) -> MeasurementUnit {
        self.unit
    }

    /// Millimetres per pixel
    pub fn pixel_spacing(&self) -> f32 {
        self.pixel_spacing
    }

    pub fn window_width(&self) -> f32 {
        self.window_width
    }

    pub fn window_center(&self) -> f32 {
        self.window_center
    }

    /// Normalized brightness in -1..1
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Normalized contrast in -1..1
    pub fn contrast(&self) -> f32 {
        self.contrast
    }

    pub fn active_shape(&self) -> Option<ShapeTool> {
        self.active_shape
    }

    pub fn set_unit(&mut self, unit: MeasurementUnit) {
        self.unit = unit;
    }

    pub fn set_pixel_spacing(&mut self, spacing: f32) -> bool {
        if !(spacing > 0.0 && spacing.is_finite()) {
            log::warn!("Ignoring invalid pixel spacing {spacing}");
            return false;
        }
        self.pixel_spacing = spacing;
        true
    }

    pub fn set_window_width(&mut self, width: f32) -> bool {
        if !(width > 0.0 && width.is_finite()) {
            log::warn!("Ignoring invalid window width {width}");
            return false;
        }
        self.window_width = width;
        true
    }

    pub fn set_window_center(&mut self, center: f32) -> bool {
        if !center.is_finite() {
            log::warn!("Ignoring invalid window center {center}");
            return false;
        }
        self.window_center = center;
        true
    }

    /// Set brightness from a slider position in -100..100
    pub fn set_brightness(&mut self, slider: f32) -> bool {
        match normalize_slider(slider) {
            Some(value) => {
                self.brightness = value;
                true
            }
            None => {
                log::warn!("Ignoring invalid brightness {slider}");
                false
            }
        }
    }

    /// Set contrast from a slider position in -100..100
    pub fn set_contrast(&mut self, slider: f32) -> bool {
        match normalize_slider(slider) {
            Some(value) => {
                self.contrast = value;
                true
            }
            None => {
                log::warn!("Ignoring invalid contrast {slider}");
                false
            }
        }
    }

    pub fn set_active_shape(&mut self, shape: Option<ShapeTool>) {
        self.active_shape = shape;
    }
}

fn normalize_slider(slider: f32) -> Option<f32> {
    slider
        .is_finite()
        .then(|| (slider / SLIDER_SCALE).clamp(-1.0, 1.0))
}
