use std::array;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::hierarchy::Hierarchy;
use super::patch::{PATCH_CELLS, PatchId};

/// Parameters of the random walk performed by the `Driver`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverParams {
    /// Deepest level the hierarchy may reach.
    pub max_level: usize,
    /// Draws above this value refine (when possible).
    pub refine_threshold: f64,
    /// Draws above this value (that did not refine) coarsen (when possible).
    pub coarsen_threshold: f64,
}

impl DriverParams {
    pub fn new(max_level: usize) -> Self {
        Self {
            max_level,
            ..Default::default()
        }
    }
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            max_level: 5,
            refine_threshold: 0.2,
            coarsen_threshold: 0.1,
        }
    }
}

/// Outcome of a single decision draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Refine,
    Coarsen,
    Hold,
}

/// Maps a uniform draw `r ∈ [0, 1)` to a transition of a hierarchy at `depth`.
///
/// Refinement is tested first. A draw in `(coarsen_threshold, refine_threshold]`
/// only coarsens when `depth > 0`, and a refining draw at `max_level` falls through
/// to the coarsening test.
pub fn decide(r: f64, depth: usize, params: &DriverParams) -> Decision {
    if r > params.refine_threshold && depth < params.max_level {
        Decision::Refine
    } else if r > params.coarsen_threshold && depth > 0 {
        Decision::Coarsen
    } else {
        Decision::Hold
    }
}

/// Transition applied to the hierarchy during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A patch was added on `level`.
    Refine {
        level: usize,
        id: PatchId,
    },
    /// The patch on `level` was removed.
    Coarsen {
        level: usize,
    },
    Hold,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Refine { .. } => "refine",
            Action::Coarsen { .. } => "coarsen",
            Action::Hold => "hold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Refine { level, id } => write!(f, "added patch {id} at level {level}"),
            Action::Coarsen { level } => write!(f, "removed patch at level {level}"),
            Action::Hold => write!(f, "unchanged"),
        }
    }
}

/// Summary of one step of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Zero based index of the step just taken.
    pub timestep: usize,
    pub action: Action,
    /// Depth of the hierarchy after the step.
    pub depth: usize,
    /// Number of patches after the step.
    pub patches: usize,
}

/// Randomly refines and coarsens a `Hierarchy`, one step at a time.
///
/// Each step consumes one uniform draw to decide the transition, followed by
/// one bounded integer draw per axis (first axis first) when a patch is added.
#[derive(Debug, Clone)]
pub struct Driver<const N: usize, R = StdRng> {
    hierarchy: Hierarchy<N>,
    params: DriverParams,
    rng: R,
    timestep: usize,
}

impl<const N: usize> Driver<N, StdRng> {
    /// Creates a driver using a `StdRng` seeded from `seed`.
    pub fn seeded(hierarchy: Hierarchy<N>, params: DriverParams, seed: u64) -> Self {
        Self::new(hierarchy, params, StdRng::seed_from_u64(seed))
    }
}

impl<const N: usize, R: Rng> Driver<N, R> {
    pub fn new(hierarchy: Hierarchy<N>, params: DriverParams, rng: R) -> Self {
        assert!(
            hierarchy.depth() <= params.max_level,
            "initial hierarchy is deeper than the maximum level"
        );

        Self {
            hierarchy,
            params,
            rng,
            timestep: 0,
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy<N> {
        &self.hierarchy
    }

    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    /// Number of steps taken so far.
    pub fn timestep(&self) -> usize {
        self.timestep
    }

    pub fn into_hierarchy(self) -> Hierarchy<N> {
        self.hierarchy
    }

    /// Performs a single step of the random walk.
    pub fn step(&mut self) -> StepReport {
        let r: f64 = self.rng.random();

        let action = match decide(r, self.hierarchy.depth(), &self.params) {
            Decision::Refine => {
                let offset: [usize; N] =
                    array::from_fn(|_| self.rng.random_range(0..=PATCH_CELLS / 2));
                let patch = self.hierarchy.refine(offset);

                log::debug!(
                    "Adding patch {} at level {}, offset {:?}",
                    patch.id(),
                    patch.level(),
                    offset
                );

                Action::Refine {
                    level: patch.level(),
                    id: patch.id(),
                }
            }
            Decision::Coarsen => {
                let level = self.hierarchy.depth();
                self.hierarchy.coarsen();

                log::debug!("Removing patch at level {level}");

                Action::Coarsen { level }
            }
            Decision::Hold => Action::Hold,
        };

        let report = StepReport {
            timestep: self.timestep,
            action,
            depth: self.hierarchy.depth(),
            patches: self.hierarchy.num_levels(),
        };

        self.timestep += 1;

        report
    }
}

impl<const N: usize, R: Rng> Iterator for Driver<N, R> {
    type Item = StepReport;

    fn next(&mut self) -> Option<StepReport> {
        Some(self.step())
    }
}
