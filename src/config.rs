//! Configuration persistence for medview settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::MeasurementUnit;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Measurement green (#00ff00)
        Self {
            r: 0.0,
            g: 1.0,
            b: 0.0,
        }
    }
}

impl ShapeColor {
    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

/// Measurement tool selected in the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeTool {
    Circle,
    Ellipse,
    Angle,
    /// Rectangular region of interest, used for cropping
    Roi,
    Line,
}

impl ShapeTool {
    pub const ALL: [ShapeTool; 5] = [
        ShapeTool::Circle,
        ShapeTool::Ellipse,
        ShapeTool::Angle,
        ShapeTool::Roi,
        ShapeTool::Line,
    ];

    /// Parse the selector value used by the host UI
    pub fn from_selector(value: &str) -> Option<Self> {
        match value {
            "circle" => Some(ShapeTool::Circle),
            "ellipse" => Some(ShapeTool::Ellipse),
            "angle" => Some(ShapeTool::Angle),
            "roi" => Some(ShapeTool::Roi),
            "line" => Some(ShapeTool::Line),
            _ => None,
        }
    }

    /// Get the selector value for this tool
    pub fn selector(self) -> &'static str {
        match self {
            ShapeTool::Circle => "circle",
            ShapeTool::Ellipse => "ellipse",
            ShapeTool::Angle => "angle",
            ShapeTool::Roi => "roi",
            ShapeTool::Line => "line",
        }
    }
}

/// Appearance of measurement primitives and their labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationStyle {
    pub color: ShapeColor,
    pub stroke_width: f32,
    /// Dash and gap length for dashed outlines
    pub dash: [f32; 2],
    pub font_size: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: ShapeColor::default(),
            stroke_width: 2.0,
            dash: [5.0, 5.0],
            font_size: 14.0,
        }
    }
}

/// Viewer configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Unit used for measurement labels
    pub unit: MeasurementUnit,
    /// Millimetres per pixel
    pub pixel_spacing: f32,
    pub window_width: f32,
    pub window_center: f32,
    /// Brightness slider position (-100..100)
    pub brightness: f32,
    /// Contrast slider position (-100..100)
    pub contrast: f32,
    /// Tool active when a session starts
    pub active_shape: Option<ShapeTool>,
    pub style: AnnotationStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            unit: MeasurementUnit::Px,
            pixel_spacing: 1.0,
            window_width: 2048.0,
            window_center: 1024.0,
            brightness: 0.0,
            contrast: 0.0,
            active_shape: None,
            style: AnnotationStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "medview";

    /// Location of the config file, if the platform has a config dir
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("Could not locate config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Failed to write config {}", path.display()))
    }
}
