use std::fmt;

use crate::buffer::SlotId;

/// Misuse of a [`VertexBuffer`](crate::VertexBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The slot was never allocated or has already been removed.
    UnknownSlot(SlotId),
    /// Position and color arrays differ in length.
    LengthMismatch { positions: usize, colors: usize },
    /// Vertex count is not a multiple of three.
    NotTriangles(usize),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSlot(id) => write!(f, "unknown buffer slot {id}"),
            Self::LengthMismatch { positions, colors } => write!(
                f,
                "vertex data mismatch: {positions} positions vs {colors} colors"
            ),
            Self::NotTriangles(n) => write!(f, "{n} vertices do not form whole triangles"),
        }
    }
}

impl std::error::Error for BufferError {}
