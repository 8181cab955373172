//! Linear static solver

use std::time::Instant;

use super::{AnalysisOptions, CancelToken};
use crate::error::{FEAError, FEAResult};
use crate::math::{cholesky_factor, reciprocal_condition, submatrix, subvector, Vec as FEVec};
use crate::model::Model;
use crate::results::{ElementForces, StaticResult};

/// Reciprocal condition below which a solve still proceeds but is reported
const ILL_CONDITIONED_RCOND: f64 = 1e-8;

/// Solves K_FF·u_F = f_F for a model and recovers element forces and reactions
pub struct StaticSolver<'a> {
    model: &'a Model,
    options: AnalysisOptions,
    cancel: CancelToken,
}

impl<'a> StaticSolver<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            options: AnalysisOptions::default(),
            cancel: CancelToken::default(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a cancellation token polled between solve phases
    pub fn with_cancellation(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the analysis
    pub fn solve(&self) -> FEAResult<StaticResult> {
        let model = self.model;
        let start = Instant::now();

        self.cancel.check("assembly")?;
        let k = model.assemble_stiffness(self.options.torsion);
        let f = model.assemble_load_vector();
        let partition = model.partition();
        log::debug!(
            "Static assembly: {} DOFs ({} free) in {:?}",
            model.total_dofs(),
            partition.free.len(),
            start.elapsed()
        );

        let mut u = FEVec::zeros(model.total_dofs());
        let mut residual_norm = 0.0;

        if partition.free.is_empty() {
            log::warn!("Model has no free DOFs; displacements are all zero");
        } else {
            let k_ff = submatrix(&k, &partition.free);
            let f_f = subvector(&f, &partition.free);

            self.cancel.check("factorization")?;
            let chol = cholesky_factor(&k_ff, self.options.singular_tolerance)?;
            let rcond = reciprocal_condition(&chol);
            if rcond < ILL_CONDITIONED_RCOND {
                log::warn!("Stiffness matrix is poorly conditioned (rcond ≈ {:.2e})", rcond);
            }

            let u_f = chol.solve(&f_f);
            residual_norm = (&k_ff * &u_f - &f_f).norm();

            for (i, &dof) in partition.free.iter().enumerate() {
                u[dof] = u_f[i];
            }
        }

        self.cancel.check("recovery")?;
        let mut element_forces = Vec::with_capacity(model.element_count());
        for (idx, element) in model.elements().iter().enumerate() {
            let u_e = model.element_displacements(idx, &u).ok_or_else(|| {
                FEAError::Numerical(format!("element {} has no DOF map", idx))
            })?;
            element_forces.push(ElementForces {
                axial: element.axial_force(&u_e),
                end_forces: element.local_end_forces(&u_e, self.options.torsion),
            });
        }
        let axial_forces = element_forces.iter().map(|ef| ef.axial).collect();

        let mut reactions = &k * &u - &f;
        for &dof in &partition.free {
            reactions[dof] = 0.0;
        }

        if self.options.log {
            log::info!(
                "Static solve: max |u| = {:.4e}, residual = {:.2e}, {:?}",
                u.amax(),
                residual_norm,
                start.elapsed()
            );
        }

        Ok(StaticResult {
            displacements: u,
            axial_forces,
            element_forces,
            reactions,
            residual_norm,
            free_dofs: partition.free.len(),
        })
    }
}
