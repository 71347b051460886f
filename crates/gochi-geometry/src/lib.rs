//! Geometry model for GoChi.
//!
//! Triangles are grouped into flat-colored [`Object`]s, and objects are
//! flattened into a [`VertexBuffer`] whose position/color arrays are uploaded
//! to the GPU as-is. Nothing here touches wgpu, so all bookkeeping is testable
//! without a device.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`triangle`] | `Triangle` and its in-place transforms |
//! | [`object`] | `Object`, `ShapeKind` and per-kind constructors |
//! | [`shapes`] | floor, cube, UV sphere, tetrahedron, octahedron |
//! | [`buffer`] | `VertexBuffer`, `SlotId` |
//! | [`error`] | `BufferError` |

pub mod buffer;
pub mod color;
pub mod error;
pub mod object;
pub mod shapes;
pub mod triangle;

pub use buffer::{SlotId, VertexBuffer};
pub use color::{Rgb, Rgba};
pub use error::BufferError;
pub use object::{Object, ShapeKind};
pub use triangle::Triangle;
