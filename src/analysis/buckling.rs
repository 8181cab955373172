//! Linear buckling (eigenvalue) solver

use std::time::Instant;

use super::{AnalysisOptions, CancelToken};
use crate::error::{FEAError, FEAResult};
use crate::math::{cholesky_factor, generalized_buckling_eigen, submatrix, Vec as FEVec};
use crate::model::Model;
use crate::results::{BucklingMode, BucklingResult, StaticResult};

/// Solves (K + λ·K_g)·v = 0 on the free DOFs for positive load factors λ.
///
/// K_g is built from one axial force per element. λ scales that force
/// distribution to the critical state.
pub struct BucklingSolver<'a> {
    model: &'a Model,
    axial_forces: Vec<f64>,
    options: AnalysisOptions,
    cancel: CancelToken,
}

impl<'a> BucklingSolver<'a> {
    /// Buckling solver for a given axial force per element (tension positive)
    pub fn new(model: &'a Model, axial_forces: &[f64]) -> Self {
        Self {
            model,
            axial_forces: axial_forces.to_vec(),
            options: AnalysisOptions::default(),
            cancel: CancelToken::default(),
        }
    }

    /// Buckling solver using the axial forces of a static solution
    pub fn from_static(model: &'a Model, result: &StaticResult) -> Self {
        Self::new(model, &result.axial_forces)
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
    pub fn solve(&self) -> FEAResult<BucklingResult> {
        if self.options.num_modes == Some(0) {
            return Err(FEAError::config("num_modes must be at least 1"));
        }
        let model = self.model;
        let start = Instant::now();

        self.cancel.check("assembly")?;
        let k = model.assemble_stiffness(self.options.torsion);
        let kg = model.assemble_geometric_stiffness(&self.axial_forces)?;
        let partition = model.partition();
        if partition.free.is_empty() {
            return Err(FEAError::NoBucklingMode);
        }
        let k_ff = submatrix(&k, &partition.free);
        let kg_ff = submatrix(&kg, &partition.free);
        log::debug!(
            "Buckling assembly: {} free DOFs in {:?}",
            partition.free.len(),
            start.elapsed()
        );

        self.cancel.check("factorization")?;
        let chol = cholesky_factor(&k_ff, self.options.singular_tolerance)?;

        self.cancel.check("eigensolve")?;
        let mut pairs = generalized_buckling_eigen(
            &chol,
            &kg_ff,
            self.options.eigen_tolerance,
            self.options.max_iterations,
        )?;
        if pairs.is_empty() {
            return Err(FEAError::NoBucklingMode);
        }
        if let Some(n) = self.options.num_modes {
            pairs.truncate(n);
        }

        let modes: Vec<BucklingMode> = pairs
            .into_iter()
            .map(|(load_factor, v_f)| {
                let mut shape = FEVec::zeros(model.total_dofs());
                for (i, &dof) in partition.free.iter().enumerate() {
                    shape[dof] = v_f[i];
                }
                normalize_shape(&mut shape);
                BucklingMode { load_factor, shape }
            })
            .collect();

        if self.options.log {
            log::info!(
                "Buckling solve: {} modes, λ_cr = {:.6e}, {:?}",
                modes.len(),
                modes[0].load_factor,
                start.elapsed()
            );
        }

        Ok(BucklingResult { modes })
    }
}

/// Scale a mode so its largest-magnitude component is +1
fn normalize_shape(shape: &mut FEVec) {
    let idx = shape.iamax();
    let peak = shape[idx];
    if peak != 0.0 {
        *shape /= peak;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Beam3D, Material, Node, Section};
    use approx::assert_relative_eq;

    const L: f64 = 4.0;

    /// Pin-pinned column along X with `n` elements
    fn column(n: usize) -> Model {
        let mut model = Model::new();
        let section = Section::new(1e-3, 1e-6, 2e-5, 5e-7, 1e-8);
        for i in 0..=n {
            model
                .add_node(Node::new(i, L * i as f64 / n as f64, 0.0, 0.0))
                .unwrap();
        }
        for i in 0..n {
            let a = *model.node(i).unwrap();
            let b = *model.node(i + 1).unwrap();
            model
                .add_element(Beam3D::new(&a, &b, Material::steel(), section).unwrap())
                .unwrap();
        }
        for dof in [0, 1, 2, 3] {
            model.add_constraint(0, dof).unwrap();
        }
        for dof in [1, 2, 3] {
            model.add_constraint(n, dof).unwrap();
        }
        model
    }

    #[test]
    fn test_single_element_factor() {
        let model = column(1);
        let result = BucklingSolver::new(&model, &[-1.0]).solve().unwrap();
        // Cubic element pin-pin estimate 12·EI/L² about the weak axis
        let expected = 12.0 * 210e9 * 1e-6 / (L * L);
        assert_relative_eq!(
            result.critical_load_factor().unwrap(),
            expected,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_modes_sorted_and_normalized() {
        let model = column(4);
        let n = model.element_count();
        let result = BucklingSolver::new(&model, &vec![-1.0; n])
            .with_options(AnalysisOptions::linear().with_num_modes(3))
            .solve()
            .unwrap();
        assert_eq!(result.len(), 3);
        let factors = result.load_factors();
        assert!(factors.windows(2).all(|w| w[0] <= w[1]));
        for mode in &result.modes {
            assert_relative_eq!(mode.shape.amax(), 1.0, max_relative = 1e-12);
            assert_eq!(mode.shape.max(), 1.0);
        }
    }

    #[test]
    fn test_tension_has_no_mode() {
        let model = column(2);
        let result = BucklingSolver::new(&model, &[1000.0, 1000.0]).solve();
        assert!(matches!(result, Err(FEAError::NoBucklingMode)));
        let result = BucklingSolver::new(&model, &[0.0, 0.0]).solve();
        assert!(matches!(result, Err(FEAError::NoBucklingMode)));
    }

    #[test]
    fn test_force_count_mismatch() {
        let model = column(2);
        let result = BucklingSolver::new(&model, &[-1.0]).solve();
        assert!(matches!(result, Err(FEAError::Configuration(_))));
        let result = BucklingSolver::new(&model, &[-1.0, -1.0])
            .with_options(AnalysisOptions::buckling(0))
            .solve();
        assert!(matches!(result, Err(FEAError::Configuration(_))));
    }

    #[test]
    fn test_eigensolver_iteration_cap() {
        let model = column(10);
        let result = BucklingSolver::new(&model, &[-1.0; 10])
            .with_options(AnalysisOptions::linear().with_eigen_tolerance(f64::EPSILON, 1))
            .solve();
        assert!(matches!(result, Err(FEAError::Numerical(_))));
    }

    #[test]
    fn test_expired_deadline_cancels() {
        let model = column(2);
        let token = CancelToken::new().with_deadline(Instant::now());
        let result = BucklingSolver::new(&model, &[-1.0, -1.0])
            .with_cancellation(token)
            .solve();
        assert!(matches!(result, Err(FEAError::Cancelled(_))));
    }
}
