//! Dense factorization and generalized eigenvalue helpers

use nalgebra::linalg::{Cholesky, SymmetricEigen};
use nalgebra::Dyn;

use super::{Mat, Vec};
use crate::error::{FEAError, FEAResult};

/// Relative size below which an eigenvalue of the reduced problem counts as zero
const ZERO_EIGENVALUE_RTOL: f64 = 1e-10;

/// Estimate the reciprocal condition number from Cholesky pivots.
///
/// Returns min(L_ii²) / max(L_ii²), a cheap lower-quality stand-in for
/// 1/κ(K) that collapses towards machine epsilon for a singular matrix.
pub fn reciprocal_condition(chol: &Cholesky<f64, Dyn>) -> f64 {
    let pivots = chol.l_dirty().diagonal().map(|d| d * d);
    let max = pivots.max();
    if max <= 0.0 {
        return 0.0;
    }
    pivots.min() / max
}

/// Factorize a symmetric positive definite matrix.
///
/// Fails with `SingularSystem` when the factorization breaks down or the
/// estimated reciprocal condition number drops below `singular_tolerance`.
pub fn cholesky_factor(k: &Mat, singular_tolerance: f64) -> FEAResult<Cholesky<f64, Dyn>> {
    if k.iter().any(|v| !v.is_finite()) {
        return Err(FEAError::Numerical(
            "stiffness matrix contains non-finite entries".to_string(),
        ));
    }
    let chol = k.clone().cholesky().ok_or_else(|| {
        FEAError::SingularSystem(
            "factorization failed (matrix not positive definite)".to_string(),
        )
    })?;
    let rcond = reciprocal_condition(&chol);
    if rcond < singular_tolerance {
        return Err(FEAError::SingularSystem(format!(
            "estimated reciprocal condition {:.3e} below tolerance {:.1e}",
            rcond, singular_tolerance
        )));
    }
    log::debug!("Cholesky factorization of {} DOFs, rcond ≈ {:.3e}", k.nrows(), rcond);
    Ok(chol)
}

/// Solve K·v = −λ·K_g·v for strictly positive λ.
///
/// K must be symmetric positive definite; K_g may be indefinite. With
/// K = L·Lᵀ the problem becomes the standard symmetric problem
/// L⁻¹(−K_g)L⁻ᵀ·y = μ·y with μ = 1/λ and v = L⁻ᵀ·y, so only K is ever
/// factorized. Returns (λ, v) pairs sorted ascending by λ.
pub fn generalized_buckling_eigen(
    chol: &Cholesky<f64, Dyn>,
    kg: &Mat,
    eigen_tolerance: f64,
    max_iterations: usize,
) -> FEAResult<std::vec::Vec<(f64, Vec)>> {
    let l = chol.l();
    let triangular_failure =
        || FEAError::Numerical("triangular solve with Cholesky factor failed".to_string());

    let x = l.solve_lower_triangular(&(-kg)).ok_or_else(triangular_failure)?;
    let a = l
        .solve_lower_triangular(&x.transpose())
        .ok_or_else(triangular_failure)?;
    let a = (&a + a.transpose()) * 0.5;

    let eig = SymmetricEigen::try_new(a, eigen_tolerance, max_iterations).ok_or_else(|| {
        FEAError::Numerical(format!(
            "symmetric eigensolver did not converge in {} iterations",
            max_iterations
        ))
    })?;

    let scale = eig.eigenvalues.amax();
    if scale == 0.0 {
        return Ok(std::vec::Vec::new());
    }

    let mut pairs = std::vec::Vec::new();
    for (i, &mu) in eig.eigenvalues.iter().enumerate() {
        if mu <= ZERO_EIGENVALUE_RTOL * scale {
            continue;
        }
        let y = eig.eigenvectors.column(i).into_owned();
        let v = l.tr_solve_lower_triangular(&y).ok_or_else(triangular_failure)?;
        pairs.push((1.0 / mu, v));
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_singular_matrix_rejected() {
        // Free bar: rigid translation mode
        let k = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        assert!(matches!(
            cholesky_factor(&k, 1e-12),
            Err(FEAError::SingularSystem(_))
        ));
    }

    #[test]
    fn test_ill_conditioned_rejected_by_threshold() {
        let k = Mat::from_diagonal(&Vec::from_vec(vec![1.0, 1e-14]));
        assert!(cholesky_factor(&k, 1e-12).is_err());
        assert!(cholesky_factor(&k, 1e-16).is_ok());
    }

    #[test]
    fn test_indefinite_rhs_eigenproblem() {
        // K = diag(2, 3), K_g = diag(-1, +1): only the first DOF is compressed
        let k = Mat::from_diagonal(&Vec::from_vec(vec![2.0, 3.0]));
        let kg = Mat::from_diagonal(&Vec::from_vec(vec![-1.0, 1.0]));
        let chol = cholesky_factor(&k, 1e-12).unwrap();
        let pairs = generalized_buckling_eigen(&chol, &kg, 1e-14, 1000).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_relative_eq!(pairs[0].0, 2.0, max_relative = 1e-12);
        let v = &pairs[0].1;
        assert!(v[1].abs() < 1e-12 * v[0].abs());
    }

    #[test]
    fn test_eigenpairs_sorted_and_satisfy_equation() {
        let k = Mat::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);
        let kg = Mat::from_row_slice(3, 3, &[-1.0, 0.2, 0.0, 0.2, -2.0, 0.0, 0.0, 0.0, -0.5]);
        let chol = cholesky_factor(&k, 1e-12).unwrap();
        let pairs = generalized_buckling_eigen(&chol, &kg, 1e-14, 1000).unwrap();
        assert_eq!(pairs.len(), 3);
        for w in pairs.windows(2) {
            assert!(w[0].0 <= w[1].0);
        }
        for (lambda, v) in &pairs {
            let r = &k * v + (&kg * v) * *lambda;
            assert!(r.norm() < 1e-10 * v.norm() * k.norm());
        }
    }
}
