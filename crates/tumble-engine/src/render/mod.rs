//! GPU rendering subsystem.
//!
//! Renderers consume `scene` data and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers,
//! offscreen targets).
//!
//! Convention:
//! - CPU geometry is in object space; the vertex shader applies the full
//!   camera * model transform from a uniform.

mod ctx;
mod cube;

pub use ctx::{RenderCtx, RenderTarget};
pub use cube::CubeRenderer;
