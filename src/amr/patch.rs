use std::array;
use std::fmt;

use datasize::DataSize;

use crate::geometry::{HyperBox, IndexBox, IndexSpace};

/// Number of cells along each axis of every patch.
pub const PATCH_CELLS: usize = 16;
/// Factor by which cell spacing shrinks between adjacent levels.
pub const REFINEMENT_RATIO: usize = 2;

/// Identifier of a patch, also used as the value the patch is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatchId(pub usize);

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the cell spacing on a given level from the spacing of the base level.
pub fn spacing_at_level<const N: usize>(base: [f64; N], level: usize) -> [f64; N] {
    let factor = (REFINEMENT_RATIO as f64).powi(level as i32);
    array::from_fn(|axis| base[axis] / factor)
}

/// A uniform block of `PATCH_CELLS^N` cells on a single refinement level, holding
/// a constant field equal to its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch<const N: usize> {
    id: PatchId,
    level: usize,
    spacing: [f64; N],
    origin: [f64; N],
    /// Cells covered by this patch in the index space of its level.
    cells: IndexBox<N>,
    /// Cell data, first axis fastest.
    data: Vec<f64>,
}

impl<const N: usize> Patch<N> {
    /// Builds a patch on `level`, deriving its spacing from the base level spacing.
    /// `lower` is the first cell of the patch in the index space of `level`.
    pub fn new(
        id: PatchId,
        level: usize,
        base_spacing: [f64; N],
        origin: [f64; N],
        lower: [usize; N],
    ) -> Self {
        let cells = IndexBox::new(lower, [PATCH_CELLS; N]);

        Self {
            id,
            level,
            spacing: spacing_at_level(base_spacing, level),
            origin,
            cells,
            data: vec![id.0 as f64; cells.space().len()],
        }
    }

    /// The level 0 patch, whose lower corner defines the origin of every index space.
    pub fn base(base_spacing: [f64; N], origin: [f64; N]) -> Self {
        Self::new(PatchId(0), 0, base_spacing, origin, [0; N])
    }

    /// Creates a child of this patch on the next finer level. The child's origin is shifted
    /// from this patch's origin by `offset` cells of this patch.
    pub fn refine(&self, offset: [usize; N], base_spacing: [f64; N]) -> Self {
        assert!(
            offset.iter().all(|&o| o < PATCH_CELLS),
            "child origin must lie inside the parent patch"
        );

        let origin = array::from_fn(|i| self.origin[i] + offset[i] as f64 * self.spacing[i]);
        let lower = IndexBox::refine_cell(
            array::from_fn(|axis| self.cells.lower[axis] + offset[axis]),
            REFINEMENT_RATIO,
        );

        Self::new(
            PatchId(self.id.0 + 1),
            self.level + 1,
            base_spacing,
            origin,
            lower,
        )
    }

    pub fn id(&self) -> PatchId {
        self.id
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn spacing(&self) -> [f64; N] {
        self.spacing
    }

    pub fn origin(&self) -> [f64; N] {
        self.origin
    }

    /// Number of cells along each axis.
    pub fn size(&self) -> [usize; N] {
        self.space().size()
    }

    pub fn cells(&self) -> IndexBox<N> {
        self.cells
    }

    pub fn space(&self) -> IndexSpace<N> {
        self.cells.space()
    }

    /// Physical extent of the patch.
    pub fn bounds(&self) -> HyperBox<N> {
        HyperBox {
            size: array::from_fn(|axis| self.spacing[axis] * self.cells.size[axis] as f64),
            origin: self.origin,
        }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value stored in the given (patch local) cell.
    pub fn value(&self, cell: [usize; N]) -> f64 {
        self.data[self.space().linear_from_cartesian(cell)]
    }
}

impl<const N: usize> DataSize for Patch<N> {
    const IS_DYNAMIC: bool = true;
    const STATIC_HEAP_SIZE: usize = 0;

    fn estimate_heap_size(&self) -> usize {
        self.data.estimate_heap_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_per_level() {
        let base = [1.0, 0.5];

        for level in 0..=8 {
            let spacing = spacing_at_level(base, level);
            let ratio = REFINEMENT_RATIO.pow(level as u32) as f64;

            assert_eq!(spacing[0], base[0] / ratio);
            assert_eq!(spacing[1], base[1] / ratio);
        }

        let patch = Patch::new(PatchId(3), 3, base, [0.0, 0.0], [0, 0]);
        assert_eq!(patch.spacing(), [0.125, 0.0625]);
    }

    #[test]
    fn constant_fill() {
        let patch = Patch::new(PatchId(7), 2, [1.0, 1.0], [0.25, 0.5], [1, 2]);

        assert_eq!(patch.size(), [PATCH_CELLS, PATCH_CELLS]);
        assert_eq!(patch.data().len(), PATCH_CELLS * PATCH_CELLS);
        assert!(patch.data().iter().all(|&v| v == 7.0));
        assert_eq!(patch.value([PATCH_CELLS - 1, 3]), 7.0);
    }

    #[test]
    fn child_geometry() {
        let base = Patch::base([1.0, 1.0], [-2.0, 3.0]);
        assert_eq!(base.id(), PatchId(0));
        assert_eq!(base.level(), 0);
        assert_eq!(base.bounds().size, [16.0, 16.0]);

        let child = base.refine([8, 3], [1.0, 1.0]);
        assert_eq!(child.id(), PatchId(1));
        assert_eq!(child.level(), 1);
        assert_eq!(child.origin(), [6.0, 6.0]);
        assert_eq!(child.spacing(), [0.5, 0.5]);
        assert_eq!(child.cells().lower, [16, 6]);
        assert!(base.bounds().contains(child.origin()));

        let grandchild = child.refine([0, 8], [1.0, 1.0]);
        assert_eq!(grandchild.origin(), [6.0, 10.0]);
        assert_eq!(grandchild.cells().lower, [32, 28]);

        // The integer box must describe the same physical origin.
        for axis in 0..2 {
            let origin = base.origin()[axis]
                + grandchild.cells().lower[axis] as f64 * grandchild.spacing()[axis];
            assert_eq!(origin, grandchild.origin()[axis]);
        }
    }

    #[test]
    #[should_panic]
    fn child_outside_parent() {
        let base = Patch::base([1.0], [0.0]);
        let _ = base.refine([PATCH_CELLS], [1.0]);
    }
}
