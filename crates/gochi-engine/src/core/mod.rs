//! Contract between the runtime loop and the programs built on it.
//!
//! Programs implement [`App`]; the runtime hands them a [`FrameCtx`] per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
