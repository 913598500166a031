//! Common utilities used by amrgen-based applications.
//!
//! Includes utils for resolving output paths, loading and saving toml config
//! files, and styles for progress bars (to keep styling consistent).

pub mod file;
pub mod progress;
