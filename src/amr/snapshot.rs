use crate::geometry::IndexBox;

use super::patch::{Patch, PatchId};

/// A single block of an AMR dataset.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a, const N: usize> {
    /// Position of the block within its level.
    pub index: usize,
    pub id: PatchId,
    pub origin: [f64; N],
    /// Cells covered in the index space of the block's level.
    pub cells: IndexBox<N>,
    /// Cell data, first axis fastest.
    pub data: &'a [f64],
}

/// All blocks sharing a refinement level (and therefore a spacing).
#[derive(Debug, Clone)]
pub struct Level<'a, const N: usize> {
    pub spacing: [f64; N],
    pub blocks: Vec<Block<'a, N>>,
}

/// Export ready view of a set of patches, grouped by level. Snapshots borrow
/// the patch data and are rebuilt whenever the patches change.
#[derive(Debug, Clone)]
pub struct Snapshot<'a, const N: usize> {
    /// Global origin, shared by the index spaces of every level.
    pub origin: [f64; N],
    pub levels: Vec<Level<'a, N>>,
}

impl<'a, const N: usize> Snapshot<'a, N> {
    /// Groups patches by level. Levels without patches are kept (empty) so that
    /// level numbering matches the patches.
    pub fn from_patches(patches: &'a [Patch<N>]) -> Self {
        let num_levels = patches.iter().map(|p| p.level() + 1).max().unwrap_or(0);

        let mut levels: Vec<Level<'a, N>> = (0..num_levels)
            .map(|_| Level {
                spacing: [0.0; N],
                blocks: Vec::new(),
            })
            .collect();

        for patch in patches {
            let level = &mut levels[patch.level()];
            level.spacing = patch.spacing();
            level.blocks.push(Block {
                index: level.blocks.len(),
                id: patch.id(),
                origin: patch.origin(),
                cells: patch.cells(),
                data: patch.data(),
            });
        }

        let origin = patches
            .iter()
            .find(|p| p.level() == 0)
            .map(|p| p.origin())
            .unwrap_or([0.0; N]);

        Self { origin, levels }
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn num_blocks(&self) -> usize {
        self.levels.iter().map(|level| level.blocks.len()).sum()
    }

    /// Number of blocks on each level.
    pub fn blocks_per_level(&self) -> Vec<usize> {
        self.levels.iter().map(|level| level.blocks.len()).collect()
    }

    /// Iterates over `(level, block)` pairs, coarsest level first.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, &Block<'a, N>)> + '_ {
        self.levels
            .iter()
            .enumerate()
            .flat_map(|(l, level)| level.blocks.iter().map(move |block| (l, block)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amr::Hierarchy;

    #[test]
    fn one_block_per_level() {
        let mut hierarchy = Hierarchy::new([1.0, 1.0], [0.5, 0.5]);
        hierarchy.refine([4, 4]);
        hierarchy.refine([8, 0]);

        let snapshot = hierarchy.snapshot();
        assert_eq!(snapshot.num_levels(), 3);
        assert_eq!(snapshot.num_blocks(), 3);
        assert_eq!(snapshot.blocks_per_level(), vec![1, 1, 1]);
        assert_eq!(snapshot.origin, [0.5, 0.5]);
        assert_eq!(snapshot.levels[2].spacing, [0.25, 0.25]);

        for (level, block) in snapshot.blocks() {
            assert_eq!(block.index, 0);
            assert_eq!(block.id, PatchId(level));
            assert!(block.data.iter().all(|&v| v == level as f64));
        }
    }

    #[test]
    fn rebuilt_after_coarsening() {
        let mut hierarchy = Hierarchy::new([1.0], [0.0]);
        hierarchy.refine([1]);
        assert_eq!(hierarchy.snapshot().num_levels(), 2);

        hierarchy.coarsen();
        let snapshot = hierarchy.snapshot();
        assert_eq!(snapshot.num_levels(), 1);
        assert_eq!(snapshot.levels[0].blocks[0].cells.lower, [0]);
    }

    #[test]
    fn empty_patch_list() {
        let snapshot = Snapshot::<2>::from_patches(&[]);
        assert_eq!(snapshot.num_levels(), 0);
        assert_eq!(snapshot.num_blocks(), 0);
    }
}
