//! Support conditions

use serde::{Deserialize, Serialize};

use super::{Dof, DOFS_PER_NODE};

/// Set of restrained DOFs at a node. All restrained values are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// Restraint flags in DOF order [UX, UY, UZ, RX, RY, RZ, WARP]
    pub restrained: [bool; DOFS_PER_NODE],
}

impl Support {
    /// Create a new support with no restraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully fixed support, warping included
    pub fn fixed() -> Self {
        Self {
            restrained: [true; DOFS_PER_NODE],
        }
    }

    /// Fixed against translation and rotation but free to warp
    pub fn fixed_free_warping() -> Self {
        Self::with_restraints(&[Dof::Ux, Dof::Uy, Dof::Uz, Dof::Rx, Dof::Ry, Dof::Rz])
    }

    /// Pinned support (translations restrained, rotations and warping free)
    pub fn pinned() -> Self {
        Self::with_restraints(&[Dof::Ux, Dof::Uy, Dof::Uz])
    }

    /// Fork support: translations and twist restrained, bending rotations
    /// and warping free
    pub fn fork() -> Self {
        Self::with_restraints(&[Dof::Ux, Dof::Uy, Dof::Uz, Dof::Rx])
    }

    /// Create a support restraining exactly the given DOFs
    pub fn with_restraints(dofs: &[Dof]) -> Self {
        let mut support = Self::new();
        for &dof in dofs {
            support.restrained[dof.index()] = true;
        }
        support
    }

    /// Add a restraint
    pub fn restrain(mut self, dof: Dof) -> Self {
        self.restrained[dof.index()] = true;
        self
    }

    /// Remove a restraint
    pub fn release(mut self, dof: Dof) -> Self {
        self.restrained[dof.index()] = false;
        self
    }

    /// Get list of restrained DOFs
    pub fn restrained_dofs(&self) -> Vec<Dof> {
        Dof::ALL
            .iter()
            .copied()
            .filter(|dof| self.restrained[dof.index()])
            .collect()
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.restrained.iter().any(|&r| r)
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.restrained.iter().filter(|&&r| r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        let support = Support::fixed();
        assert_eq!(support.num_restrained(), 7);
        assert_eq!(support.restrained_dofs(), Dof::ALL.to_vec());
    }

    #[test]
    fn test_free_warping_support() {
        let support = Support::fixed_free_warping();
        assert_eq!(support.num_restrained(), 6);
        assert!(!support.restrained[Dof::Warp.index()]);
        assert_eq!(support, Support::fixed().release(Dof::Warp));
    }

    #[test]
    fn test_fork_support() {
        let support = Support::fork();
        assert_eq!(support.restrained_dofs(), vec![Dof::Ux, Dof::Uy, Dof::Uz, Dof::Rx]);
        assert!(Support::new().restrain(Dof::Uy).is_supported());
        assert!(!Support::new().is_supported());
    }
}
