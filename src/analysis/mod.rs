//! Analysis types and options

mod buckling;
mod cancel;
mod static_solver;

pub use buckling::BucklingSolver;
pub use cancel::CancelToken;
pub use static_solver::StaticSolver;

use serde::{Deserialize, Serialize};

use crate::math::TorsionFormulation;

/// Options shared by the static and buckling solvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Torsion-warping block used in the element stiffness
    pub torsion: TorsionFormulation,
    /// Number of buckling modes to keep (None = all positive modes)
    pub num_modes: Option<usize>,
    /// Smallest admissible reciprocal condition estimate of K_FF
    pub singular_tolerance: f64,
    /// Convergence tolerance of the symmetric eigensolver
    pub eigen_tolerance: f64,
    /// Iteration cap of the symmetric eigensolver (0 = unbounded)
    pub max_iterations: usize,
    /// Enable progress output at info level
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            torsion: TorsionFormulation::Hermite,
            num_modes: None,
            singular_tolerance: 1e-12,
            eigen_tolerance: f64::EPSILON,
            max_iterations: 100_000,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Default options for a static solve
    pub fn linear() -> Self {
        Self::default()
    }

    /// Options for a buckling solve keeping the lowest `num_modes` modes
    pub fn buckling(num_modes: usize) -> Self {
        Self {
            num_modes: Some(num_modes),
            ..Self::default()
        }
    }

    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Select the torsion-warping formulation
    pub fn with_torsion(mut self, torsion: TorsionFormulation) -> Self {
        self.torsion = torsion;
        self
    }

    pub fn with_num_modes(mut self, num_modes: usize) -> Self {
        self.num_modes = Some(num_modes);
        self
    }

    /// Set the singular-matrix threshold
    pub fn with_singular_tolerance(mut self, tol: f64) -> Self {
        self.singular_tolerance = tol;
        self
    }

    /// Set eigensolver tolerance and iteration cap
    pub fn with_eigen_tolerance(mut self, tol: f64, max_iter: usize) -> Self {
        self.eigen_tolerance = tol;
        self.max_iterations = max_iter;
        self
    }
}
