//! Image source collaborators
//!
//! This module consolidates:
//! - Decoded image type and raster decoding (image.rs)
//! - DICOM header metadata (metadata.rs)

pub mod image;
pub mod metadata;

pub use self::image::{DecodedImage, decode_raster, open_raster};
pub use metadata::{DicomMetadata, TagSource};
