//! Generation of synthetic adaptive mesh refinement datasets.
//!
//! `amrgen` maintains a single chain of nested refinement patches, grows and shrinks
//! it with a seeded random walk, and writes each state of the chain as a VTK AMR
//! dataset (`.vthb` index plus `.vti` blocks) for inspection in ParaView or VisIt.

pub mod amr;
pub mod export;
pub mod geometry;

/// Provides common types used for most `amrgen` applications.
pub mod prelude {
    pub use crate::amr::{
        Action, Driver, DriverParams, Hierarchy, HierarchyError, PATCH_CELLS, Patch, PatchId,
        REFINEMENT_RATIO, Snapshot, StepReport,
    };
    pub use crate::export::{AmrKind, ExportAmrConfig, ExportError, ExportSummary, export_vthb};
    pub use crate::geometry::{HyperBox, IndexBox, IndexSpace};
}
