//! JSON contract for the uniform cantilever service
//!
//! A request describes a prismatic cantilever along global X, clamped at
//! x = 0 (warping included) with a vertical tip force. The response carries
//! the deflection and twist at every node.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::analysis::{AnalysisOptions, StaticSolver};
use crate::elements::{Beam3D, Dof, Material, Node, Section, Support};
use crate::error::{FEAError, FEAResult};
use crate::loads::NodeLoad;
use crate::model::Model;

/// Cantilever request. Missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CantileverRequest {
    /// Young's modulus (Pa)
    #[serde(rename = "E")]
    pub e: f64,
    /// Shear modulus (Pa)
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "Iy")]
    pub iy: f64,
    #[serde(rename = "Iz")]
    pub iz: f64,
    /// St. Venant torsion constant
    #[serde(rename = "J")]
    pub j: f64,
    /// Warping constant
    #[serde(rename = "Cw")]
    pub cw: f64,
    pub length: f64,
    /// Element count; integral JSON floats such as `10.0` are accepted
    #[serde(deserialize_with = "integral_count")]
    pub n_elems: usize,
    /// Tip force in +Z (N)
    pub load: f64,
}

impl Default for CantileverRequest {
    fn default() -> Self {
        Self {
            e: 210e9,
            g: 80e9,
            a: 1e-3,
            iy: 1e-5,
            iz: 1e-5,
            j: 1e-6,
            cw: 1e-8,
            length: 2.0,
            n_elems: 10,
            load: 1000.0,
        }
    }
}

fn integral_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(de::Error::custom(format!(
            "expected a non-negative integer, found {}",
            value
        )));
    }
    Ok(value as usize)
}

/// Nodal results along the cantilever, one entry per node from root to tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CantileverResponse {
    pub x: Vec<f64>,
    /// Displacement in Z
    pub uz: Vec<f64>,
    /// Twist about X
    pub tx: Vec<f64>,
}

/// Build the cantilever model described by a request
pub fn cantilever_model(req: &CantileverRequest) -> FEAResult<Model> {
    if req.n_elems == 0 {
        return Err(FEAError::config("n_elems must be at least 1"));
    }
    if req.length <= 0.0 || !req.length.is_finite() {
        return Err(FEAError::config(format!(
            "length must be positive, got {}",
            req.length
        )));
    }

    let material = Material::new(req.e, req.g);
    let section = Section::new(req.a, req.iy, req.iz, req.j, req.cw);
    let n = req.n_elems;

    let mut model = Model::new();
    for i in 0..=n {
        model.add_node(Node::new(i, req.length * i as f64 / n as f64, 0.0, 0.0))?;
    }
    for pair in model.nodes().to_vec().windows(2) {
        model.add_element(Beam3D::new(&pair[0], &pair[1], material, section)?)?;
    }
    model.add_support(0, Support::fixed())?;
    model.add_load(n, NodeLoad::force(0.0, 0.0, req.load))?;
    Ok(model)
}

/// Solve a cantilever request
pub fn solve_cantilever(req: &CantileverRequest) -> FEAResult<CantileverResponse> {
    let model = cantilever_model(req)?;
    let result = StaticSolver::new(&model)
        .with_options(AnalysisOptions::linear())
        .solve()?;

    let mut response = CantileverResponse {
        x: Vec::with_capacity(model.node_count()),
        uz: Vec::with_capacity(model.node_count()),
        tx: Vec::with_capacity(model.node_count()),
    };
    for node in model.nodes() {
        let dofs = model
            .node_dofs(node.id)
            .ok_or_else(|| FEAError::config(format!("node {} not found", node.id)))?;
        response.x.push(node.x);
        response.uz.push(result.displacements[dofs[Dof::Uz.index()]]);
        response.tx.push(result.displacements[dofs[Dof::Rx.index()]]);
    }
    Ok(response)
}
