//! Per-kind instance buffers.

use crate::object::{ObjectKind, Rgb};
use glam::Mat4;

/// Flat array of transforms drawn as many copies of one shape in a single
/// draw call, plus per-instance colours.
///
/// The buffer has no memory of scale or any other component: whatever matrix
/// is written to a slot is what gets drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBuffer {
    kind: ObjectKind,
    matrices: Vec<Mat4>,
    colors: Vec<Rgb>,
    dirty: bool,
    version: u64,
}

impl InstanceBuffer {
    pub fn new(kind: ObjectKind, len: usize) -> Self {
        Self {
            kind,
            matrices: vec![Mat4::IDENTITY; len],
            colors: vec![[1.0, 1.0, 1.0]; len],
            dirty: len > 0,
            version: 0,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn matrix_at(&self, slot: usize) -> Option<Mat4> {
        self.matrices.get(slot).copied()
    }

    /// Overwrites one slot. Out-of-range slots are ignored.
    pub fn set_matrix_at(&mut self, slot: usize, matrix: Mat4) {
        if let Some(entry) = self.matrices.get_mut(slot) {
            *entry = matrix;
        }
    }

    pub fn set_color_at(&mut self, slot: usize, color: Rgb) {
        if let Some(entry) = self.colors.get_mut(slot) {
            *entry = color;
        }
    }

    /// Flags the whole buffer for re-upload.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.version += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of times the buffer has been flagged since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Clears the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
