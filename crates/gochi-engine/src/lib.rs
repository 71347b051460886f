//! GoChi engine crate.
//!
//! Window, GPU device and the frame loop that the game and the tutorial
//! programs run on, plus the triangle-list renderer they draw with.
//!
//! | Module    | Contents                                              |
//! |-----------|-------------------------------------------------------|
//! | `core`    | `App` trait and the per-frame `FrameCtx`              |
//! | `window`  | `Runtime` event loop and `RuntimeConfig`              |
//! | `device`  | wgpu instance/device/surface and the depth target    |
//! | `render`  | `MeshRenderer` and its `RenderCtx`/`RenderTarget`     |
//! | `input`   | platform-agnostic keyboard and pointer state          |
//! | `time`    | clamped frame clock                                   |
//! | `coords`  | viewport and clear color                              |
//! | `logging` | one-time `env_logger` setup                           |

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
