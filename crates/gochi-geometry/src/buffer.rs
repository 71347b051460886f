use std::fmt;
use std::ops::Range;

use glam::Vec3;

use crate::color::Rgba;
use crate::error::BufferError;
use crate::Object;

/// Handle to the vertex range one object occupies in a [`VertexBuffer`].
///
/// Ids are handed out in increasing order and never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SlotId(u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    id: SlotId,
    range: Range<usize>,
}

/// Flattened position/color arrays for a triangle list.
///
/// Each object owns one contiguous range of vertices. Ranges are kept sorted
/// by start, never overlap, and tile `0..vertex_count()` with no holes:
/// removing a slot shifts every later slot down by the removed length.
///
/// Slot lookup is a linear scan.
#[derive(Debug, Default)]
pub struct VertexBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    slots: Vec<Slot>,
    next_id: u64,
    dirty: bool,
}

impl VertexBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * 3),
            colors: Vec::with_capacity(triangles * 3),
            ..Self::default()
        }
    }

    /// Appends `object`'s triangles, each vertex tagged with the object color.
    pub fn add(&mut self, object: &Object) -> SlotId {
        let id = self.alloc_id();
        self.append(id, object);
        id
    }

    /// Appends pre-flattened vertex data (e.g. per-vertex colored meshes).
    pub fn add_raw(
        &mut self,
        positions: &[[f32; 3]],
        colors: &[[f32; 4]],
    ) -> Result<SlotId, BufferError> {
        if positions.len() != colors.len() {
            return Err(BufferError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        if positions.len() % 3 != 0 {
            return Err(BufferError::NotTriangles(positions.len()));
        }

        let id = self.alloc_id();
        let start = self.positions.len();
        self.positions.extend_from_slice(positions);
        self.colors.extend_from_slice(colors);
        self.slots.push(Slot { id, range: start..self.positions.len() });
        self.dirty = true;
        Ok(id)
    }

    /// Rewrites the slot with `object`'s current geometry.
    ///
    /// Same vertex count: overwritten in place. Otherwise the old range is
    /// removed and the object re-appended at the end under the same id.
    pub fn update(&mut self, id: SlotId, object: &Object) -> Result<(), BufferError> {
        let idx = self.slot_index(id)?;
        let range = self.slots[idx].range.clone();

        if range.len() == object.vertex_count() {
            let color = Rgba::from(object.color()).to_array();
            for (dst, v) in self.positions[range.clone()].iter_mut().zip(object.vertices()) {
                *dst = v.to_array();
            }
            self.colors[range].fill(color);
            self.dirty = true;
            return Ok(());
        }

        self.remove_at(idx);
        self.append(id, object);
        Ok(())
    }

    /// Shifts every vertex in the slot by `shift` without touching colors.
    pub fn translate(&mut self, id: SlotId, shift: Vec3) -> Result<(), BufferError> {
        let idx = self.slot_index(id)?;
        let range = self.slots[idx].range.clone();
        for p in &mut self.positions[range] {
            *p = (Vec3::from_array(*p) + shift).to_array();
        }
        self.dirty = true;
        Ok(())
    }

    /// Drops the slot's vertices and compacts everything after it.
    ///
    /// Returns the range the slot occupied before removal.
    pub fn remove(&mut self, id: SlotId) -> Result<Range<usize>, BufferError> {
        let idx = self.slot_index(id)?;
        Ok(self.remove_at(idx))
    }

    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    /// Current vertex range of the slot, if it is live.
    pub fn range(&self, id: SlotId) -> Option<Range<usize>> {
        self.slots.iter().find(|s| s.id == id).map(|s| s.range.clone())
    }

    /// Removes all data and slots. Ids keep increasing.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
        self.slots.clear();
        self.dirty = true;
    }

    /// Clears and re-adds every object in order.
    pub fn rebuild<'a, I>(&mut self, objects: I) -> Vec<SlotId>
    where
        I: IntoIterator<Item = &'a Object>,
    {
        self.clear();
        objects.into_iter().map(|o| self.add(o)).collect()
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Reports whether the arrays changed since the last call, then resets the flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn alloc_id(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        id
    }

    fn append(&mut self, id: SlotId, object: &Object) {
        let start = self.positions.len();
        let color = Rgba::from(object.color()).to_array();

        self.positions.extend(object.vertices().map(|v| v.to_array()));
        self.colors.resize(self.positions.len(), color);

        self.slots.push(Slot { id, range: start..self.positions.len() });
        self.dirty = true;
    }

    fn slot_index(&self, id: SlotId) -> Result<usize, BufferError> {
        self.slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(BufferError::UnknownSlot(id))
    }

    fn remove_at(&mut self, idx: usize) -> Range<usize> {
        let Slot { id, range } = self.slots.remove(idx);
        let len = range.len();

        self.positions.drain(range.clone());
        self.colors.drain(range.clone());

        for slot in &mut self.slots[idx..] {
            slot.range = slot.range.start - len..slot.range.end - len;
        }

        log::trace!("buffer slot {id} removed ({len} vertices at {})", range.start);
        self.dirty = true;
        range
    }
}
