//! Tumble engine crate.
//!
//! This crate owns everything behind the spinning-cube viewer: the platform +
//! GPU runtime pieces, the camera/scene data, and the render driver that ties
//! them together.

pub mod device;
pub mod window;
pub mod time;

pub mod logging;
pub mod paint;

pub mod banner;
pub mod camera;
pub mod driver;
pub mod render;
pub mod scene;
pub mod session;
