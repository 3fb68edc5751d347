//! Viewer session
//!
//! This module contains:
//! - Session state tying settings, controllers, the layer and the images together
//! - Message types for pointer and settings input
//! - Settings with validating setters
//! - Deferred image swaps

pub mod messages;
pub mod settings;
pub mod state;
pub mod swap;

pub use state::Session;
pub use swap::{ImageSwap, PreparedImage, SwapKind, SwapOutput};
