//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record passes
//! into the frame encoder handed out by `core::FrameCtx::render`.
//!
//! Convention:
//! - CPU geometry is in world units, right-handed, +Y up.
//! - A single view-projection matrix is uploaded per draw as a uniform.

mod ctx;
pub mod mesh;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{Mesh, MeshRenderer, MeshStyle};
