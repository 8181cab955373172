//! Mathematical utilities for thin-walled beam FEA calculations

pub mod eigen;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix4, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

use crate::elements::{Material, Section};
use crate::error::{FEAError, FEAResult};

pub use eigen::{cholesky_factor, generalized_buckling_eigen, reciprocal_condition};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat4 = Matrix4<f64>;
pub type Vec3 = Vector3<f64>;

/// 14x14 matrix for element stiffness (7 DOFs per node)
pub type Mat14 = SMatrix<f64, 14, 14>;
/// 14-element vector for element forces/displacements
pub type Vec14 = SVector<f64, 14>;

/// Elements shorter than this are treated as degenerate
pub const MIN_ELEMENT_LENGTH: f64 = 1e-12;

/// Local slots of the axial pair (u_i, u_j)
pub const AXIAL_DOFS: [usize; 2] = [0, 7];
/// Local slots for bending in the local x-y plane (v_i, θz_i, v_j, θz_j)
pub const BENDING_Z_DOFS: [usize; 4] = [1, 5, 8, 12];
/// Local slots for bending in the local x-z plane (w_i, θy_i, w_j, θy_j)
pub const BENDING_Y_DOFS: [usize; 4] = [2, 4, 9, 11];
/// Local slots for torsion and warping (θx_i, φ′_i, θx_j, φ′_j)
pub const TORSION_DOFS: [usize; 4] = [3, 6, 10, 13];

/// Range of kL for which the closed-form Vlasov element is well conditioned
const EXACT_KL_RANGE: (f64, f64) = (0.05, 40.0);

/// Interpolation used for the coupled torsion-warping block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TorsionFormulation {
    /// Cubic Hermite interpolation of the twist angle
    #[default]
    Hermite,
    /// Closed-form solution of E·Cw·φ'''' − G·J·φ'' = 0 (hyperbolic shape functions)
    Exact,
}

/// Compute the direction cosine matrix of an element.
///
/// Rows are the local axes e1 (along the element), e2 and e3 expressed in
/// global coordinates. The reference "up" vector is global Z; elements
/// parallel to Z use global X instead.
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
pub fn direction_cosines(i_node: &[f64; 3], j_node: &[f64; 3]) -> FEAResult<Mat3> {
    let d = Vec3::from(*j_node) - Vec3::from(*i_node);
    let length = d.norm();
    if !(length > MIN_ELEMENT_LENGTH) {
        return Err(FEAError::Geometry(format!(
            "element has zero length between {:?} and {:?}",
            i_node, j_node
        )));
    }
    let e1 = d / length;

    let mut reference = Vec3::z();
    if reference.cross(&e1).norm() < 1e-6 {
        reference = Vec3::x();
    }
    let e2 = reference.cross(&e1).normalize();
    let e3 = e1.cross(&e2);

    Ok(Mat3::from_rows(&[e1.transpose(), e2.transpose(), e3.transpose()]))
}

/// Build the 14x14 global-to-local transformation matrix.
///
/// The direction cosines rotate the translation and rotation triplets of each
/// node; the warping slot is a scalar and maps to itself.
pub fn beam_transformation_matrix(r: &Mat3) -> Mat14 {
    let mut t = Mat14::zeros();
    for offset in [0, 3, 7, 10] {
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(r);
    }
    t[(6, 6)] = 1.0;
    t[(13, 13)] = 1.0;
    t
}

/// Euler-Bernoulli bending block for (v_i, θ_i, v_j, θ_j) with θ = v′
fn hermite_bending(ei: f64, l: f64) -> Mat4 {
    let l2 = l * l;
    #[rustfmt::skip]
    let k = Mat4::new(
        12.0,     6.0 * l,   -12.0,     6.0 * l,
        6.0 * l,  4.0 * l2,  -6.0 * l,  2.0 * l2,
        -12.0,    -6.0 * l,  12.0,      -6.0 * l,
        6.0 * l,  2.0 * l2,  -6.0 * l,  4.0 * l2,
    );
    k * (ei / (l2 * l))
}

/// Consistent cubic matrix of ∫ c·w′·δw′ dx for (w_i, w′_i, w_j, w′_j).
///
/// Serves both the St. Venant part of the Hermite torsion block and every
/// geometric stiffness block.
fn hermite_slope_energy(c: f64, l: f64) -> Mat4 {
    let l2 = l * l;
    #[rustfmt::skip]
    let k = Mat4::new(
        36.0,     3.0 * l,   -36.0,     3.0 * l,
        3.0 * l,  4.0 * l2,  -3.0 * l,  -l2,
        -36.0,    -3.0 * l,  36.0,      -3.0 * l,
        3.0 * l,  -l2,       -3.0 * l,  4.0 * l2,
    );
    k * (c / (30.0 * l))
}

/// Flip the rotation slots of a bending block for the w′ = −θy convention
fn flip_rotations(k: &Mat4) -> Mat4 {
    let d = Mat4::from_diagonal(&nalgebra::Vector4::new(1.0, -1.0, 1.0, -1.0));
    d * k * d
}

/// Closed-form Vlasov torsion-warping stiffness.
///
/// Shape functions are the homogeneous solutions 1, x, cosh kx, sinh kx.
/// Returns `None` when kL falls outside the range where the coefficient
/// matrix can be inverted reliably.
pub fn exact_torsion_warping(gj: f64, ecw: f64, l: f64) -> Option<Mat4> {
    let k = (gj / ecw).sqrt();
    let kl = k * l;
    if !(kl >= EXACT_KL_RANGE.0 && kl <= EXACT_KL_RANGE.1) {
        return None;
    }
    let (sh, ch) = (kl.sinh(), kl.cosh());

    // Nodal DOFs (θ_i, φ′_i, θ_j, φ′_j) in terms of C1..C4
    #[rustfmt::skip]
    let h = Mat4::new(
        1.0, 0.0, 1.0,     0.0,
        0.0, 1.0, 0.0,     k,
        1.0, l,   ch,      sh,
        0.0, 1.0, k * sh,  k * ch,
    );
    // End torques and bimoments in terms of C1..C4
    #[rustfmt::skip]
    let f = Mat4::new(
        0.0, -gj, 0.0,      0.0,
        0.0, 0.0, -gj,      0.0,
        0.0, gj,  0.0,      0.0,
        0.0, 0.0, gj * ch,  gj * sh,
    );

    let k_tw = f * h.try_inverse()?;
    Some((k_tw + k_tw.transpose()) * 0.5)
}

/// Torsion-warping block for (θx_i, φ′_i, θx_j, φ′_j)
pub fn torsion_warping_stiffness(
    material: &Material,
    section: &Section,
    length: f64,
    formulation: TorsionFormulation,
) -> Mat4 {
    let gj = material.g * section.j;
    let ecw = material.e * section.cw;

    let hermite = || hermite_bending(ecw, length) + hermite_slope_energy(gj, length);

    match formulation {
        TorsionFormulation::Hermite => hermite(),
        TorsionFormulation::Exact => exact_torsion_warping(gj, ecw, length).unwrap_or_else(|| {
            log::debug!(
                "kL = {:.3e} outside exact element range, using Hermite torsion block",
                (gj / ecw).sqrt() * length
            );
            hermite()
        }),
    }
}

fn add_block(k: &mut Mat14, dofs: &[usize; 4], block: &Mat4) {
    for (a, &da) in dofs.iter().enumerate() {
        for (b, &db) in dofs.iter().enumerate() {
            k[(da, db)] += block[(a, b)];
        }
    }
}

/// Compute the 14x14 local elastic stiffness matrix of a thin-walled beam
///
/// # Arguments
/// * `material` - Elastic and shear moduli
/// * `section` - Section properties including the warping constant
/// * `length` - Element length
/// * `formulation` - Torsion-warping interpolation
pub fn beam_local_stiffness(
    material: &Material,
    section: &Section,
    length: f64,
    formulation: TorsionFormulation,
) -> Mat14 {
    let mut k = Mat14::zeros();

    let ea_l = material.e * section.a / length;
    let [ai, aj] = AXIAL_DOFS;
    k[(ai, ai)] = ea_l;
    k[(ai, aj)] = -ea_l;
    k[(aj, ai)] = -ea_l;
    k[(aj, aj)] = ea_l;

    add_block(&mut k, &BENDING_Z_DOFS, &hermite_bending(material.e * section.iz, length));
    add_block(
        &mut k,
        &BENDING_Y_DOFS,
        &flip_rotations(&hermite_bending(material.e * section.iy, length)),
    );
    add_block(
        &mut k,
        &TORSION_DOFS,
        &torsion_warping_stiffness(material, section, length, formulation),
    );

    k
}

/// Compute the 14x14 local geometric stiffness matrix
///
/// # Arguments
/// * `n` - Axial force (positive = tension, negative = compression)
/// * `section` - Section properties (A, Iy, Iz enter through r0²)
/// * `length` - Element length
pub fn beam_geometric_stiffness(n: f64, section: &Section, length: f64) -> Mat14 {
    let mut kg = Mat14::zeros();
    if n == 0.0 {
        return kg;
    }

    let flexural = hermite_slope_energy(n, length);
    add_block(&mut kg, &BENDING_Z_DOFS, &flexural);
    add_block(&mut kg, &BENDING_Y_DOFS, &flip_rotations(&flexural));

    // Wagner term
    let wagner = hermite_slope_energy(n * section.polar_radius_sq(), length);
    add_block(&mut kg, &TORSION_DOFS, &wagner);

    kg
}

/// Extract the square submatrix of `k` on the given index set
pub fn submatrix(k: &Mat, dofs: &[usize]) -> Mat {
    Mat::from_fn(dofs.len(), dofs.len(), |i, j| k[(dofs[i], dofs[j])])
}

/// Extract the entries of `v` on the given index set
pub fn subvector(v: &Vec, dofs: &[usize]) -> Vec {
    Vec::from_iterator(dofs.len(), dofs.iter().map(|&d| v[d]))
}

/// Largest absolute asymmetry |k_ij − k_ji|
pub fn max_asymmetry(k: &Mat) -> f64 {
    (k - k.transpose()).amax()
}
