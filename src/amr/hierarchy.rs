use datasize::DataSize;
use thiserror::Error;

use super::patch::{PATCH_CELLS, Patch, REFINEMENT_RATIO};
use super::snapshot::Snapshot;

/// Violations of the single-chain structure of a `Hierarchy`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HierarchyError {
    #[error("hierarchy contains no patches")]
    Empty,
    #[error("patch at position {position} is on level {level}")]
    LevelGap { position: usize, level: usize },
    #[error("hierarchy depth {depth} exceeds maximum level {max_level}")]
    TooDeep { depth: usize, max_level: usize },
    #[error("patch on level {level} does not start inside its parent")]
    OutsideParent { level: usize },
}

/// A chain of nested patches, exactly one per level, from level 0 up to the current depth.
#[derive(Debug, Clone)]
pub struct Hierarchy<const N: usize> {
    base_spacing: [f64; N],
    patches: Vec<Patch<N>>,
}

impl<const N: usize> Hierarchy<N> {
    /// Creates a hierarchy consisting only of the base patch.
    pub fn new(base_spacing: [f64; N], origin: [f64; N]) -> Self {
        Self {
            base_spacing,
            patches: vec![Patch::base(base_spacing, origin)],
        }
    }

    /// Index of the finest level.
    pub fn depth(&self) -> usize {
        self.patches.len() - 1
    }

    pub fn num_levels(&self) -> usize {
        self.patches.len()
    }

    pub fn base_spacing(&self) -> [f64; N] {
        self.base_spacing
    }

    pub fn patches(&self) -> &[Patch<N>] {
        &self.patches
    }

    pub fn patch(&self, level: usize) -> Option<&Patch<N>> {
        self.patches.get(level)
    }

    pub fn base(&self) -> &Patch<N> {
        &self.patches[0]
    }

    pub fn finest(&self) -> &Patch<N> {
        &self.patches[self.patches.len() - 1]
    }

    /// Appends a new finest patch, offset from the current finest patch by
    /// `offset` of its cells.
    pub fn refine(&mut self, offset: [usize; N]) -> &Patch<N> {
        let child = self.finest().refine(offset, self.base_spacing);
        self.patches.push(child);
        self.finest()
    }

    /// Drops the finest patch. The base patch is never removed.
    pub fn coarsen(&mut self) -> Option<Patch<N>> {
        if self.patches.len() <= 1 {
            return None;
        }

        self.patches.pop()
    }

    /// Builds the export ready view of the current hierarchy.
    pub fn snapshot(&self) -> Snapshot<'_, N> {
        Snapshot::from_patches(&self.patches)
    }

    /// Checks that the hierarchy is a gapless chain no deeper than `max_level`,
    /// with each patch anchored inside its parent.
    pub fn validate(&self, max_level: usize) -> Result<(), HierarchyError> {
        if self.patches.is_empty() {
            return Err(HierarchyError::Empty);
        }

        for (position, patch) in self.patches.iter().enumerate() {
            if patch.level() != position {
                return Err(HierarchyError::LevelGap {
                    position,
                    level: patch.level(),
                });
            }
        }

        if self.depth() > max_level {
            return Err(HierarchyError::TooDeep {
                depth: self.depth(),
                max_level,
            });
        }

        for pair in self.patches.windows(2) {
            let (parent, child) = (&pair[0], &pair[1]);

            if !parent.bounds().contains(child.origin()) {
                return Err(HierarchyError::OutsideParent {
                    level: child.level(),
                });
            }

            let covered = parent.cells().refined(REFINEMENT_RATIO);
            let anchor = (0..N).all(|axis| {
                let start = child.cells().lower[axis];
                start >= covered.lower[axis]
                    && start < covered.lower[axis] + PATCH_CELLS * REFINEMENT_RATIO
            });

            if !anchor {
                return Err(HierarchyError::OutsideParent {
                    level: child.level(),
                });
            }
        }

        Ok(())
    }
}

impl<const N: usize> DataSize for Hierarchy<N> {
    const IS_DYNAMIC: bool = true;
    const STATIC_HEAP_SIZE: usize = 0;

    fn estimate_heap_size(&self) -> usize {
        self.patches.estimate_heap_size()
    }
}
