//! Section properties for thin-walled beam elements

use serde::{Deserialize, Serialize};

use super::Material;
use crate::error::{FEAError, FEAResult};

/// Cross-section properties of a thin-walled open section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴ (bending in the local x-z plane)
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴ (bending in the local x-y plane)
    pub iz: f64,
    /// St. Venant torsional constant in m⁴
    pub j: f64,
    /// Warping constant in m⁶
    pub cw: f64,
}

impl Section {
    /// Create a new section
    pub fn new(a: f64, iy: f64, iz: f64, j: f64, cw: f64) -> Self {
        Self { a, iy, iz, j, cw }
    }

    /// Create a doubly symmetric I-section from its plate dimensions.
    ///
    /// Uses the thin-walled approximations J = Σ b·t³/3 and
    /// Cw = Iz_flange · h₀² / 2 with h₀ the distance between flange centroids.
    ///
    /// # Arguments
    /// * `depth` - Total depth of section
    /// * `flange_width` - Width of flange
    /// * `flange_thickness` - Thickness of flange
    /// * `web_thickness` - Thickness of web
    pub fn i_section(
        depth: f64,
        flange_width: f64,
        flange_thickness: f64,
        web_thickness: f64,
    ) -> Self {
        let bf = flange_width;
        let tf = flange_thickness;
        let tw = web_thickness;
        let d = depth;
        let hw = d - 2.0 * tf;
        let h0 = d - tf;

        let a = 2.0 * bf * tf + hw * tw;
        // Strong axis is local y
        let iy = (bf * d.powi(3) - (bf - tw) * hw.powi(3)) / 12.0;
        let iz = (2.0 * tf * bf.powi(3) + hw * tw.powi(3)) / 12.0;
        let j = (2.0 * bf * tf.powi(3) + hw * tw.powi(3)) / 3.0;
        let cw = tf * bf.powi(3) * h0 * h0 / 24.0;

        Self::new(a, iy, iz, j, cw)
    }

    /// Get the polar moment of inertia
    pub fn ip(&self) -> f64 {
        self.iy + self.iz
    }

    /// Squared polar radius of gyration r0² = (Iy + Iz) / A
    pub fn polar_radius_sq(&self) -> f64 {
        self.ip() / self.a
    }

    /// Torsion parameter k = sqrt(GJ / ECw) in 1/m
    pub fn torsion_parameter(&self, material: &Material) -> f64 {
        (material.g * self.j / (material.e * self.cw)).sqrt()
    }

    /// Check that every property is finite and positive
    pub fn validate(&self) -> FEAResult<()> {
        let props = [
            ("A", self.a),
            ("Iy", self.iy),
            ("Iz", self.iz),
            ("J", self.j),
            ("Cw", self.cw),
        ];
        for (name, value) in props {
            if !value.is_finite() || value <= 0.0 {
                return Err(FEAError::config(format!(
                    "section {} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_creation() {
        let s = Section::new(1e-3, 2e-6, 3e-6, 1e-7, 1e-9);
        assert_eq!(s.a, 1e-3);
        assert_eq!(s.iy, 2e-6);
        assert_eq!(s.iz, 3e-6);
        assert_eq!(s.j, 1e-7);
        assert_eq!(s.cw, 1e-9);
        assert!((s.polar_radius_sq() - 5e-3).abs() < 1e-15);
    }

    #[test]
    fn test_i_section_ipe300() {
        // IPE 300: A ≈ 53.8 cm², Iy ≈ 8356 cm⁴, Iz ≈ 604 cm⁴, Cw ≈ 126 000 cm⁶
        let s = Section::i_section(0.300, 0.150, 0.0107, 0.0071);
        assert!((s.a - 53.8e-4).abs() / 53.8e-4 < 0.06);
        assert!((s.iy - 8356e-8).abs() / 8356e-8 < 0.06);
        assert!((s.iz - 604e-8).abs() / 604e-8 < 0.05);
        assert!((s.cw - 1.26e-7).abs() / 1.26e-7 < 0.05);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_invalid_section() {
        let s = Section::new(1e-3, 1e-5, 1e-5, 1e-6, 0.0);
        assert!(matches!(s.validate(), Err(FEAError::Configuration(_))));
    }
}
