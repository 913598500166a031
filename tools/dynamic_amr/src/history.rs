use amrgen::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

/// Optional csv log with one row per dataset written.
#[derive(Debug)]
pub struct RunHistory {
    /// Csv file output (if any)
    writer: Option<csv::Writer<File>>,
}

impl RunHistory {
    /// Constructs a run history object that ignores record data.
    pub fn empty() -> Self {
        Self { writer: None }
    }

    /// Constructs a run history object that will store record data in the given file.
    pub fn output(path: &Path) -> Result<Self, csv::Error> {
        Ok(Self {
            writer: Some(csv::Writer::from_path(path)?),
        })
    }

    pub fn write_record(&mut self, record: RunRecord) -> Result<(), csv::Error> {
        let Some(ref mut writer) = self.writer else {
            return Ok(());
        };

        writer.serialize(record)
    }

    pub fn flush(&mut self) -> Result<(), std::io::Error> {
        let Some(ref mut writer) = self.writer else {
            return Ok(());
        };

        writer.flush()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunRecord {
    /// Index of the dataset (0 is the initial state).
    pub step: usize,
    pub action: String,
    pub depth: usize,
    pub patches: usize,
    /// Dataset file name, relative to the output directory.
    pub file: String,
}

impl RunRecord {
    /// Record of the state before any steps were taken.
    pub fn initial(hierarchy: &Hierarchy<2>, file: String) -> Self {
        Self {
            step: 0,
            action: "initial".to_string(),
            depth: hierarchy.depth(),
            patches: hierarchy.num_levels(),
            file,
        }
    }

    /// Record of the state after a step of the driver.
    pub fn from_report(report: &StepReport, file: String) -> Self {
        Self {
            step: report.timestep + 1,
            action: report.action.name().to_string(),
            depth: report.depth,
            patches: report.patches,
            file,
        }
    }
}
