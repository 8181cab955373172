//! Result types for static and buckling analysis

use serde::{Deserialize, Serialize};

use crate::elements::{Dof, NodeId, DOFS_PER_NODE};
use crate::math::{Vec as FEVec, Vec14};
use crate::model::Model;

/// Generalized displacements at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub ux: f64,
    /// Displacement in Y direction
    pub uy: f64,
    /// Displacement in Z direction
    pub uz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
    /// Rate of twist φ′
    pub warp: f64,
}

impl NodeDisplacement {
    /// Create from array [UX, UY, UZ, RX, RY, RZ, WARP]
    pub fn from_array(arr: [f64; DOFS_PER_NODE]) -> Self {
        Self {
            ux: arr[0],
            uy: arr[1],
            uz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
            warp: arr[6],
        }
    }
}

/// Reaction forces at a supported node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
    /// Reaction bimoment
    pub bimoment: f64,
}

impl Reactions {
    /// Create from array [FX, FY, FZ, MX, MY, MZ, B]
    pub fn from_array(arr: [f64; DOFS_PER_NODE]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            fz: arr[2],
            mx: arr[3],
            my: arr[4],
            mz: arr[5],
            bimoment: arr[6],
        }
    }
}

/// Recovered internal forces of one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementForces {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Local end forces k·T·u in local slot order
    pub end_forces: Vec14,
}

impl ElementForces {
    /// Internal torque GJ·φ′ − E·Cw·φ‴ at the i-end
    pub fn torque_i(&self) -> f64 {
        -self.end_forces[3]
    }

    /// Bimoment E·Cw·φ″ at the i-end
    pub fn bimoment_i(&self) -> f64 {
        -self.end_forces[6]
    }

    /// Bimoment E·Cw·φ″ at the j-end
    pub fn bimoment_j(&self) -> f64 {
        self.end_forces[13]
    }
}

fn gather(model: &Model, v: &FEVec, id: NodeId) -> Option<[f64; DOFS_PER_NODE]> {
    let dofs = model.node_dofs(id)?;
    Some(dofs.map(|d| v[d]))
}

/// Output of a linear static solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticResult {
    /// Full 7N displacement vector, zero on constrained DOFs
    pub displacements: FEVec,
    /// Axial force per element (tension positive), in element order
    pub axial_forces: Vec<f64>,
    /// Recovered forces per element, in element order
    pub element_forces: Vec<ElementForces>,
    /// K·u − f, nonzero only on constrained DOFs
    pub reactions: FEVec,
    /// ‖K_FF·u_F − f_F‖
    pub residual_norm: f64,
    /// Number of free DOFs solved for
    pub free_dofs: usize,
}

impl StaticResult {
    /// Displacements of one node
    pub fn node_displacement(&self, model: &Model, id: NodeId) -> Option<NodeDisplacement> {
        gather(model, &self.displacements, id).map(NodeDisplacement::from_array)
    }

    /// Reactions at one node (zeros on unconstrained DOFs)
    pub fn node_reactions(&self, model: &Model, id: NodeId) -> Option<Reactions> {
        gather(model, &self.reactions, id).map(Reactions::from_array)
    }

    /// Single displacement component
    pub fn dof(&self, model: &Model, id: NodeId, dof: Dof) -> Option<f64> {
        model
            .node_dofs(id)
            .map(|dofs| self.displacements[dofs[dof.index()]])
    }

    /// Largest absolute displacement component
    pub fn max_displacement(&self) -> f64 {
        self.displacements.amax()
    }
}

/// One buckling mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucklingMode {
    /// Critical load factor λ
    pub load_factor: f64,
    /// Full 7N mode shape, largest component +1
    pub shape: FEVec,
}

impl BucklingMode {
    /// Mode shape at one node
    pub fn node_shape(&self, model: &Model, id: NodeId) -> Option<NodeDisplacement> {
        gather(model, &self.shape, id).map(NodeDisplacement::from_array)
    }
}

/// Output of a linear buckling solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucklingResult {
    /// Modes sorted ascending by load factor
    pub modes: Vec<BucklingMode>,
}

impl BucklingResult {
    /// Lowest positive load factor
    pub fn critical_load_factor(&self) -> Option<f64> {
        self.modes.first().map(|m| m.load_factor)
    }

    pub fn load_factors(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.load_factor).collect()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}
