//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Isotropic linear elastic material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
}

impl Material {
    /// Create a material from elastic and shear moduli
    pub fn new(e: f64, g: f64) -> Self {
        Self { e, g }
    }

    /// Create a material from E and nu.
    /// G is calculated as E / (2 * (1 + nu))
    pub fn from_poisson(e: f64, nu: f64) -> Self {
        Self::new(e, e / (2.0 * (1.0 + nu)))
    }

    /// Structural steel (E = 210 GPa, G = 80 GPa)
    pub fn steel() -> Self {
        Self::new(210e9, 80e9)
    }

    /// Poisson's ratio implied by E and G
    pub fn nu(&self) -> f64 {
        self.e / (2.0 * self.g) - 1.0
    }

    /// Check that both moduli are finite and positive
    pub fn validate(&self) -> FEAResult<()> {
        for (name, value) in [("E", self.e), ("G", self.g)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FEAError::config(format!(
                    "material {} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
