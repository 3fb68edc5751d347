//! Measurement and annotation engine for medical image viewers

pub mod annotations;
pub mod config;
pub mod domain;
pub mod loader;
pub mod render;
pub mod session;

pub use config::ViewerConfig;
pub use session::Session;
