//! Vlasov FEA - thin-walled 3D beam analysis with warping
//!
//! Every node carries seven degrees of freedom: three translations, three
//! rotations and the rate of twist φ′ that drives cross-section warping.
//! The library provides:
//! - 14-DOF beam elements with coupled St. Venant / warping torsion
//! - Linear static analysis with reactions and element force recovery
//! - Linear buckling analysis (K + λ·K_g)·v = 0 including the Wagner term
//! - A JSON contract for a uniform cantilever
//!
//! ## Example
//! ```rust
//! use vlasov_fea::prelude::*;
//!
//! let mut model = Model::new();
//! let section = Section::new(1e-3, 1e-5, 1e-5, 1e-6, 1e-8);
//!
//! let n = 4;
//! for i in 0..=n {
//!     model.add_node(Node::new(i, 2.0 * i as f64 / n as f64, 0.0, 0.0)).unwrap();
//! }
//! for i in 0..n {
//!     let a = *model.node(i).unwrap();
//!     let b = *model.node(i + 1).unwrap();
//!     model.add_element(Beam3D::new(&a, &b, Material::steel(), section).unwrap()).unwrap();
//! }
//!
//! // Clamped root with warping restrained, torque at the tip
//! model.add_support(0, Support::fixed()).unwrap();
//! model.add_load(n, NodeLoad::torque(1000.0)).unwrap();
//!
//! let result = StaticSolver::new(&model).solve().unwrap();
//! let twist = result.dof(&model, n, Dof::Rx).unwrap();
//! assert!(twist > 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;
pub mod wire;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, BucklingSolver, CancelToken, StaticSolver};
    pub use crate::elements::{Beam3D, Dof, Material, Node, NodeId, Section, Support};
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::loads::NodeLoad;
    pub use crate::math::TorsionFormulation;
    pub use crate::model::{DofPartition, Model};
    pub use crate::results::{
        BucklingMode, BucklingResult, ElementForces, NodeDisplacement, Reactions, StaticResult,
    };
    pub use crate::wire::{solve_cantilever, CantileverRequest, CantileverResponse};
}
