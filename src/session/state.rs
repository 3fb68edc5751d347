use image::RgbaImage;

use super::messages::{Msg, SettingsMsg};
use super::settings::Settings;
use super::swap::{ImageSwap, PreparedImage, SwapKind, SwapOutput};
use crate::annotations::Controllers;
use crate::annotations::handlers::{handle_pointer, switch_tool};
use crate::config::{AnnotationStyle, ViewerConfig};
use crate::loader::{DecodedImage, DicomMetadata};
use crate::render::Layer;
use crate::render::image::draw_layer_on_image;
use crate::render::transform;

/// Everything a viewer holds for one loaded image
///
/// Four buffers are kept: `source` as loaded, `working` as cropped but not
/// windowed, `base` as produced by the latest window/level or crop swap, and
/// `display`, which is `base` with brightness/contrast applied. Window/level
/// starts from `working`; filters are always recomputed from `base`.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    style: AnnotationStyle,
    controllers: Controllers,
    layer: Layer,
    source: Option<DecodedImage>,
    working: Option<DecodedImage>,
    base: Option<DecodedImage>,
    display: Option<DecodedImage>,
    /// Display pixels per source pixel, per axis
    display_scale: (f32, f32),
    generation: u64,
    metadata: Option<DicomMetadata>,
    last_error: Option<anyhow::Error>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl Session {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            settings: Settings::from_config(config),
            style: config.style,
            controllers: Controllers::new(config.style),
            layer: Layer::new(),
            source: None,
            working: None,
            base: None,
            display: None,
            display_scale: (1.0, 1.0),
            generation: 0,
            metadata: None,
            last_error: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn style(&self) -> &AnnotationStyle {
        &self.style
    }

    pub fn controllers(&self) -> &Controllers {
        &self.controllers
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Image as delivered by the loader
    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_ref()
    }

    /// Image currently shown, with every transform applied
    pub fn display(&self) -> Option<&DecodedImage> {
        self.display.as_ref()
    }

    pub fn display_scale(&self) -> (f32, f32) {
        self.display_scale
    }

    pub fn metadata(&self) -> Option<&DicomMetadata> {
        self.metadata.as_ref()
    }

    /// Last loader failure, cleared by the next successful load
    pub fn last_error(&self) -> Option<&anyhow::Error> {
        self.last_error.as_ref()
    }

    /// Apply a message
    ///
    /// Window width/center changes return the swap that re-renders the
    /// image; the caller awaits it and passes the result to
    /// [`Session::finish_swap`].
    pub fn update(&mut self, msg: Msg) -> Option<ImageSwap> {
        match msg {
            Msg::Pointer(event) => {
                handle_pointer(&mut self.controllers, event, &mut self.layer, &self.settings);
                None
            }
            Msg::Settings(msg) => self.apply_settings(msg),
            Msg::ClearAnnotations => {
                self.controllers.clear_all(&mut self.layer);
                None
            }
        }
    }

    fn apply_settings(&mut self, msg: SettingsMsg) -> Option<ImageSwap> {
        match msg {
            SettingsMsg::SetUnit(unit) => {
                self.settings.set_unit(unit);
                self.relabel();
            }
            SettingsMsg::SetPixelSpacing(spacing) => {
                if self.settings.set_pixel_spacing(spacing) {
                    self.relabel();
                }
            }
            SettingsMsg::SetWindowWidth(width) => {
                if self.settings.set_window_width(width) {
                    return self.window_level_swap();
                }
            }
            SettingsMsg::SetWindowCenter(center) => {
                if self.settings.set_window_center(center) {
                    return self.window_level_swap();
                }
            }
            SettingsMsg::SetBrightness(slider) => {
                if self.settings.set_brightness(slider) {
                    self.refresh_display();
                }
            }
            SettingsMsg::SetContrast(slider) => {
                if self.settings.set_contrast(slider) {
                    self.refresh_display();
                }
            }
            SettingsMsg::SetActiveShape(tool) => switch_tool(
                &mut self.controllers,
                tool,
                &mut self.layer,
                &mut self.settings,
            ),
        }
        None
    }

    /// Rewrite measurement labels in the current unit and spacing
    fn relabel(&mut self) {
        self.controllers.relabel_all(&mut self.layer, &self.settings);
        self.layer.batch_draw();
    }

    /// Install a decoded image, or record why decoding failed
    ///
    /// A new image invalidates every annotation and any swap in flight. On
    /// failure the current image stays.
    pub fn load_image(&mut self, result: anyhow::Result<DecodedImage>) {
        match result {
            Ok(image) => {
                log::debug!("Loaded {}x{} image", image.width, image.height);
                self.generation = self.generation.wrapping_add(1);
                self.controllers.clear_all(&mut self.layer);
                self.display_scale = (1.0, 1.0);
                self.working = Some(image.clone());
                self.base = Some(image.clone());
                self.source = Some(image);
                self.last_error = None;
                self.refresh_display();
            }
            Err(err) => {
                log::error!("Failed to load image: {err:?}");
                self.last_error = Some(err);
            }
        }
    }

    /// Record metadata extracted by the host; a failure leaves it unset
    pub fn set_metadata(&mut self, result: anyhow::Result<DicomMetadata>) {
        match result {
            Ok(metadata) => self.metadata = Some(metadata),
            Err(err) => {
                log::error!("Failed to read image metadata: {err:?}");
                self.metadata = None;
                self.last_error = Some(err);
            }
        }
    }

    /// Re-render the current (possibly cropped) image through the current window
    pub fn window_level_swap(&mut self) -> Option<ImageSwap> {
        let working = self.pixel_source(self.working.as_ref())?;
        let (width, center) = (self.settings.window_width(), self.settings.window_center());
        Some(self.start_swap(SwapKind::WindowLevel, move || {
            transform::window_level(&working, width, center).map(SwapOutput::from)
        }))
    }

    /// Replace the image with the region under the crop box
    pub fn crop_swap(&mut self) -> Option<ImageSwap> {
        let Some(region) = self.controllers.crop.region() else {
            log::debug!("No crop region drawn");
            return None;
        };
        let base = self.pixel_source(self.base.as_ref())?;
        let scale = self.display_scale;
        // A box off the image must not advance the generation
        transform::visible_crop(base.width, base.height, region, scale)?;
        let working = self.working.clone();
        Some(self.start_swap(SwapKind::Crop, move || {
            let image = transform::crop(&base, region, scale)?;
            let working = working.and_then(|w| transform::crop(&w, region, scale));
            Some(SwapOutput { image, working })
        }))
    }

    fn pixel_source(&self, image: Option<&DecodedImage>) -> Option<DecodedImage> {
        match image {
            Some(image) if image.pixels().is_some() => Some(image.clone()),
            Some(image) => {
                log::debug!(
                    "No swap, {}x{} image has no pixel data",
                    image.width,
                    image.height
                );
                None
            }
            None => {
                log::debug!("No swap, no image loaded");
                None
            }
        }
    }

    fn start_swap<F>(&mut self, kind: SwapKind, work: F) -> ImageSwap
    where
        F: FnOnce() -> Option<SwapOutput> + Send + 'static,
    {
        self.generation = self.generation.wrapping_add(1);
        log::debug!("Starting {kind:?} swap {}", self.generation);
        ImageSwap::spawn(self.generation, kind, work)
    }

    /// Install the result of a swap and request a redraw
    ///
    /// Returns false when the swap was superseded by a newer swap or image.
    pub fn finish_swap(&mut self, prepared: PreparedImage) -> bool {
        if prepared.generation != self.generation {
            log::debug!(
                "Dropping stale {:?} swap {} (current {})",
                prepared.kind,
                prepared.generation,
                self.generation
            );
            return false;
        }
        if prepared.kind == SwapKind::Crop {
            // The crop is resampled to its display size
            self.display_scale = (1.0, 1.0);
        }
        if let Some(working) = prepared.working {
            self.working = Some(working);
        }
        self.base = Some(prepared.image);
        self.refresh_display();
        true
    }

    /// Recompute the display buffer from `base` and request a redraw
    fn refresh_display(&mut self) {
        let Some(base) = &self.base else {
            return;
        };
        self.display = transform::brightness_contrast(
            base,
            self.settings.brightness(),
            self.settings.contrast(),
        )
        .or_else(|| Some(base.clone()));
        self.layer.batch_draw();
    }

    /// Set the factor between source and display pixels; ignored unless positive
    pub fn set_display_scale(&mut self, scale_x: f32, scale_y: f32) -> bool {
        let valid = |s: f32| s.is_finite() && s > 0.0;
        if !(valid(scale_x) && valid(scale_y)) {
            log::warn!("Ignoring invalid display scale ({scale_x}, {scale_y})");
            return false;
        }
        self.display_scale = (scale_x, scale_y);
        true
    }

    /// Drain the pending redraw request
    pub fn take_redraw(&mut self) -> bool {
        self.layer.take_redraw()
    }

    /// Current display buffer with every shape flattened onto it
    pub fn render(&self) -> Option<RgbaImage> {
        let mut out = self.display.as_ref()?.pixels()?.clone();
        draw_layer_on_image(&mut out, &self.layer);
        Some(out)
    }
}
