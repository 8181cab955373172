//! Node loads - forces, moments and bimoments applied directly to nodes

use serde::{Deserialize, Serialize};

use crate::elements::DOFS_PER_NODE;

/// A load applied directly to a node, conjugate to the 7 nodal DOFs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Force in X direction (N)
    pub fx: f64,
    /// Force in Y direction (N)
    pub fy: f64,
    /// Force in Z direction (N)
    pub fz: f64,
    /// Moment about X axis, i.e. torque for an X-aligned beam (N·m)
    pub mx: f64,
    /// Moment about Y axis (N·m)
    pub my: f64,
    /// Moment about Z axis (N·m)
    pub mz: f64,
    /// Bimoment conjugate to the warping DOF (N·m²)
    pub bimoment: f64,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64, bimoment: f64) -> Self {
        Self {
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
            bimoment,
        }
    }

    /// Create a force-only node load
    pub fn force(fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(fx, fy, fz, 0.0, 0.0, 0.0, 0.0)
    }

    /// Create a moment-only node load
    pub fn moment(mx: f64, my: f64, mz: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, mx, my, mz, 0.0)
    }

    /// Create a torque about global X
    pub fn torque(mx: f64) -> Self {
        Self::moment(mx, 0.0, 0.0)
    }

    /// Create a pure bimoment
    pub fn bimoment(value: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, value)
    }

    /// Get the load as an array [FX, FY, FZ, MX, MY, MZ, B]
    pub fn as_array(&self) -> [f64; DOFS_PER_NODE] {
        [
            self.fx,
            self.fy,
            self.fz,
            self.mx,
            self.my,
            self.mz,
            self.bimoment,
        ]
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::from(self.as_array().map(|v| v * factor))
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

impl From<[f64; DOFS_PER_NODE]> for NodeLoad {
    fn from(arr: [f64; DOFS_PER_NODE]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5], arr[6])
    }
}
