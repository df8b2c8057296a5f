//! Paint model shared between scene materials and renderers.
//!
//! Scope:
//! - color representation (linear RGBA, straight alpha)
//!
//! Geometry types remain in `scene`.

pub mod color;

pub use color::Color;
