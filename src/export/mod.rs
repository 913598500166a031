//! Exports AMR snapshots to disk in VTK's hierarchical XML format.
//!
//! A dataset `<dir>/<name>.vthb` is written alongside a directory `<dir>/<name>/` which
//! holds one image data file `<name>_<level>_<index>.vti` per block. Paths inside the
//! index are relative, so the pair can be moved around together.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::amr::Snapshot;

mod index;
mod vtk;

pub use index::index_xml;
pub use vtk::{block_model, export_block};

/// Failures encountered while writing a dataset.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write vtk file: {0}")]
    Vtk(String),
    #[error("failed to format index: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("snapshot contains no blocks")]
    Empty,
    #[error("invalid dataset path {0:?}")]
    InvalidPath(PathBuf),
}

/// Which VTK AMR container the index describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmrKind {
    /// Blocks listed by level and index only.
    #[default]
    NonOverlapping,
    /// Blocks additionally carry level spacing and integer boxes, letting readers
    /// reason about how levels nest.
    Overlapping,
}

impl AmrKind {
    /// Name of the VTK data type.
    pub fn vtk_type(self) -> &'static str {
        match self {
            AmrKind::NonOverlapping => "vtkNonOverlappingAMR",
            AmrKind::Overlapping => "vtkOverlappingAMR",
        }
    }
}

/// Settings for `export_vthb`.
#[derive(Debug, Clone)]
pub struct ExportAmrConfig {
    pub kind: AmrKind,
    /// Name of the cell attribute holding the block values.
    pub field: String,
}

impl Default for ExportAmrConfig {
    fn default() -> Self {
        Self {
            kind: AmrKind::default(),
            field: "data".to_string(),
        }
    }
}

/// Files produced by a single export.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub index: PathBuf,
    pub blocks: Vec<PathBuf>,
}

/// Writes a snapshot to `path` (conventionally with a `.vthb` extension) along with
/// the per block files.
pub fn export_vthb<const N: usize>(
    snapshot: &Snapshot<'_, N>,
    path: impl AsRef<Path>,
    config: &ExportAmrConfig,
) -> Result<ExportSummary, ExportError> {
    let path = path.as_ref();

    if snapshot.num_blocks() == 0 {
        return Err(ExportError::Empty);
    }

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ExportError::InvalidPath(path.to_path_buf()))?
        .to_string();
    let parent = path.parent().unwrap_or(Path::new(""));
    let directory = parent.join(&stem);

    std::fs::create_dir_all(&directory)?;
    remove_stale_blocks(&directory, &stem)?;

    let file_name = |level: usize, index: usize| format!("{stem}_{level}_{index}.vti");

    let mut blocks = Vec::with_capacity(snapshot.num_blocks());

    for (l, level) in snapshot.levels.iter().enumerate() {
        for block in level.blocks.iter() {
            let block_path = directory.join(file_name(l, block.index));
            export_block(block, level.spacing, &config.field, &block_path)?;
            blocks.push(block_path);
        }
    }

    let xml = index_xml(snapshot, config.kind, |level, index| {
        format!("{stem}/{}", file_name(level, index))
    })?;
    std::fs::write(path, xml)?;

    log::trace!(
        "Wrote {} with {} levels and {} blocks",
        path.display(),
        snapshot.num_levels(),
        blocks.len()
    );

    Ok(ExportSummary {
        index: path.to_path_buf(),
        blocks,
    })
}

/// Removes block files left in `directory` by an earlier export of the same dataset, so a
/// shallower hierarchy does not leave files from levels that no longer exist.
fn remove_stale_blocks(directory: &Path, stem: &str) -> Result<(), ExportError> {
    let prefix = format!("{stem}_");

    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();

        if name.starts_with(&prefix) && name.ends_with(".vti") && path.is_file() {
            log::trace!("Removing stale block {}", path.display());
            std::fs::remove_file(&path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amr::Hierarchy;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("amrgen-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_index_and_blocks() {
        let dir = scratch_dir("export");

        let mut hierarchy = Hierarchy::new([1.0, 1.0], [0.0, 0.0]);
        hierarchy.refine([8, 8]);
        hierarchy.refine([0, 4]);

        let summary = export_vthb(
            &hierarchy.snapshot(),
            dir.join("amr_3.vthb"),
            &ExportAmrConfig::default(),
        )
        .unwrap();

        assert_eq!(summary.index, dir.join("amr_3.vthb"));
        assert_eq!(
            summary.blocks,
            vec![
                dir.join("amr_3").join("amr_3_0_0.vti"),
                dir.join("amr_3").join("amr_3_1_0.vti"),
                dir.join("amr_3").join("amr_3_2_0.vti"),
            ]
        );

        for block in summary.blocks.iter() {
            let contents = std::fs::read_to_string(block).unwrap();
            assert!(contents.contains("ImageData"));
            assert!(contents.contains("data"));
        }

        let index = std::fs::read_to_string(&summary.index).unwrap();
        assert!(index.contains("vtkNonOverlappingAMR"));
        assert!(index.contains("file=\"amr_3/amr_3_2_0.vti\""));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn rejects_empty_snapshots() {
        let dir = scratch_dir("empty");
        let snapshot = Snapshot::<2>::from_patches(&[]);

        let result = export_vthb(
            &snapshot,
            dir.join("amr_0.vthb"),
            &ExportAmrConfig::default(),
        );
        assert!(matches!(result, Err(ExportError::Empty)));
        assert!(!dir.join("amr_0").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn removes_stale_blocks() {
        let dir = scratch_dir("stale");
        let path = dir.join("amr_0.vthb");
        let config = ExportAmrConfig::default();

        let mut hierarchy = Hierarchy::new([1.0, 1.0], [0.0, 0.0]);
        hierarchy.refine([1, 1]);
        hierarchy.refine([2, 2]);
        export_vthb(&hierarchy.snapshot(), &path, &config).unwrap();
        assert!(dir.join("amr_0").join("amr_0_2_0.vti").exists());

        // Unrelated files in the block directory are kept.
        std::fs::write(dir.join("amr_0").join("notes.txt"), "keep").unwrap();

        hierarchy.coarsen();
        hierarchy.coarsen();
        let summary = export_vthb(&hierarchy.snapshot(), &path, &config).unwrap();

        let mut files: Vec<String> = std::fs::read_dir(dir.join("amr_0"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();

        assert_eq!(files, vec!["amr_0_0_0.vti", "notes.txt"]);
        assert_eq!(summary.blocks, vec![dir.join("amr_0").join("amr_0_0_0.vti")]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn kind_names() {
        assert_eq!(AmrKind::default(), AmrKind::NonOverlapping);
        assert_eq!(AmrKind::Overlapping.vtk_type(), "vtkOverlappingAMR");
    }
}
