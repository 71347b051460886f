//! Screen-space types shared by the runtime and renderers.
//!
//! Sizes are logical pixels (DPI-aware). World-space geometry uses `glam`.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
