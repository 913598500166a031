use std::array;

use datasize::DataSize;

/// Represents a rectangular physical domain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HyperBox<const N: usize> {
    /// Size of the rectangle along each axis.
    pub size: [f64; N],
    /// Origin of the rectangle (located at the bottom-left corner).
    pub origin: [f64; N],
}

impl<const N: usize> DataSize for HyperBox<N> {
    const IS_DYNAMIC: bool = false;
    const STATIC_HEAP_SIZE: usize = 0;

    fn estimate_heap_size(&self) -> usize {
        0
    }
}

impl<const N: usize> HyperBox<N> {
    /// Returns true if the point lies in the half open box `[aa, bb)`.
    pub fn contains(&self, point: [f64; N]) -> bool {
        let (aa, bb) = (self.aa(), self.bb());

        for axis in 0..N {
            if point[axis] < aa[axis] || point[axis] >= bb[axis] {
                return false;
            }
        }

        true
    }

    pub fn aa(&self) -> [f64; N] {
        self.origin
    }

    pub fn bb(&self) -> [f64; N] {
        array::from_fn(|i| self.origin[i] + self.size[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_containment() {
        let bounds = HyperBox {
            size: [2.0, 1.0],
            origin: [1.0, -1.0],
        };

        assert!(bounds.contains([1.0, -1.0]));
        assert!(bounds.contains([2.5, -0.5]));
        assert!(!bounds.contains([3.0, -0.5]));
        assert!(!bounds.contains([2.0, 0.0]));
        assert!(!bounds.contains([0.5, -0.5]));

        assert_eq!(bounds.aa(), [1.0, -1.0]);
        assert_eq!(bounds.bb(), [3.0, 0.0]);
    }
}
