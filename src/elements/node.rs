//! Node element - a labeled point in 3D space owning 7 DOFs

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FEAError, FEAResult};

/// Node identifier, unique within a model
pub type NodeId = usize;

/// Number of degrees of freedom carried by every node
pub const DOFS_PER_NODE: usize = 7;

/// Nodal degree of freedom, in global ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dof {
    /// Translation along X
    Ux,
    /// Translation along Y
    Uy,
    /// Translation along Z
    Uz,
    /// Rotation (twist) about X
    Rx,
    /// Rotation about Y
    Ry,
    /// Rotation about Z
    Rz,
    /// Warping, the rate of twist φ′
    Warp,
}

impl Dof {
    pub const ALL: [Dof; DOFS_PER_NODE] = [
        Dof::Ux,
        Dof::Uy,
        Dof::Uz,
        Dof::Rx,
        Dof::Ry,
        Dof::Rz,
        Dof::Warp,
    ];

    /// Position of this DOF within a node's 7-slot block
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Dof {
    type Error = FEAError;

    fn try_from(index: usize) -> FEAResult<Self> {
        Dof::ALL.get(index).copied().ok_or_else(|| {
            FEAError::config(format!(
                "DOF index {} out of range (expected 0..={})",
                index,
                DOFS_PER_NODE - 1
            ))
        })
    }
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dof::Ux => "UX",
            Dof::Uy => "UY",
            Dof::Uz => "UZ",
            Dof::Rx => "RX",
            Dof::Ry => "RY",
            Dof::Rz => "RZ",
            Dof::Warp => "WARP",
        };
        f.write_str(name)
    }
}

/// A 3D node in the finite element model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: NodeId, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Get the position as a vector
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.position() - self.position()).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1, 10.0, 20.0, 30.0);
        assert_eq!(node.id, 1);
        assert_eq!(node.coords(), [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0, 0.0, 0.0, 0.0);
        let n2 = Node::new(1, 3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_dof_index_roundtrip() {
        for (i, dof) in Dof::ALL.iter().enumerate() {
            assert_eq!(dof.index(), i);
            assert_eq!(Dof::try_from(i).unwrap(), *dof);
        }
        assert!(matches!(Dof::try_from(7), Err(FEAError::Configuration(_))));
    }
}
