//! Synthetic adaptive mesh refinement.
//!
//! A `Hierarchy` is a single chain of nested `Patch`es, one per level, each a
//! `PATCH_CELLS^N` block filled with its own identifier. The `Driver` grows and
//! shrinks that chain with a seeded random walk, and a `Snapshot` turns the current
//! chain into the level/block layout used when exporting.

mod driver;
mod hierarchy;
mod patch;
mod snapshot;

pub use driver::{Action, Decision, Driver, DriverParams, StepReport, decide};
pub use hierarchy::{Hierarchy, HierarchyError};
pub use patch::{PATCH_CELLS, Patch, PatchId, REFINEMENT_RATIO, spacing_at_level};
pub use snapshot::{Block, Level, Snapshot};
