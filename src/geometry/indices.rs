#![allow(clippy::needless_range_loop)]

use std::array;

/// Describes an abstract index space, and transformations from cartesian
/// to linear indices.
///
/// Linear indices are ordered with the first axis varying fastest, which
/// matches the cell ordering used by VTK image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpace<const N: usize> {
    size: [usize; N],
}

impl<const N: usize> IndexSpace<N> {
    /// Constructs a new index space.
    pub fn new(size: [usize; N]) -> Self {
        Self { size }
    }

    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    /// Returns the dimensions of the index space along each axis.
    pub fn size(self) -> [usize; N] {
        self.size
    }

    /// Converts a cartesian index into a linear index.
    pub fn linear_from_cartesian(self, cartesian: [usize; N]) -> usize {
        let mut result = 0;
        let mut stride = 1;

        for i in 0..N {
            result += stride * cartesian[i];
            stride *= self.size[i];
        }

        result
    }
}

/// An axis aligned box of cells in the index space of a single refinement level.
/// `lower` is the first cell along each axis, and `size` the number of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBox<const N: usize> {
    pub lower: [usize; N],
    pub size: [usize; N],
}

impl<const N: usize> IndexBox<N> {
    pub fn new(lower: [usize; N], size: [usize; N]) -> Self {
        Self { lower, size }
    }

    /// Last cell (inclusive) along each axis. Panics for empty boxes.
    pub fn upper(&self) -> [usize; N] {
        array::from_fn(|axis| {
            assert!(self.size[axis] > 0, "empty index box has no upper corner");
            self.lower[axis] + self.size[axis] - 1
        })
    }

    pub fn space(&self) -> IndexSpace<N> {
        IndexSpace::new(self.size)
    }

    /// Maps the given cell into the index space of the next level up.
    pub fn refine_cell(cell: [usize; N], ratio: usize) -> [usize; N] {
        array::from_fn(|axis| cell[axis] * ratio)
    }

    /// Returns a copy of this box expressed in the index space `ratio` times finer.
    pub fn refined(&self, ratio: usize) -> Self {
        Self {
            lower: Self::refine_cell(self.lower, ratio),
            size: array::from_fn(|axis| self.size[axis] * ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversion() {
        let space = IndexSpace::new([2, 4, 3]);

        assert_eq!(space.len(), 24);
        assert_eq!(space.size(), [2, 4, 3]);

        assert_eq!(space.linear_from_cartesian([0, 0, 0]), 0);
        assert_eq!(space.linear_from_cartesian([1, 0, 0]), 1);
        assert_eq!(space.linear_from_cartesian([0, 1, 0]), 2);
        assert_eq!(space.linear_from_cartesian([0, 0, 2]), 8 * 2);
        assert_eq!(space.linear_from_cartesian([1, 1, 2]), 8 * 2 + 2 + 1);
        assert_eq!(space.linear_from_cartesian([1, 3, 2]), 23);
    }

    #[test]
    fn index_boxes() {
        let coarse = IndexBox::new([4, 2], [16, 16]);
        assert_eq!(coarse.upper(), [19, 17]);
        assert_eq!(coarse.space().len(), 256);

        let fine = coarse.refined(2);
        assert_eq!(fine.lower, [8, 4]);
        assert_eq!(fine.size, [32, 32]);
        assert_eq!(IndexBox::refine_cell([3, 5], 2), [6, 10]);
    }
}
