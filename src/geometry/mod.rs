//! A module for geometric primitives (physical boxes and cartesian index spaces).

mod hyperbox;
mod indices;

pub use hyperbox::HyperBox;
pub use indices::{IndexBox, IndexSpace};
