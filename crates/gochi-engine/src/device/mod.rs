//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) plus its depth and
//!   multisampled color attachments
//! - acquiring frames and providing encoders/views for rendering

mod attachment;
mod gpu;
mod init;
mod surface;

pub use attachment::Attachment;
pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
