//! Beam3D element - 14-DOF thin-walled beam with warping

use serde::{Deserialize, Serialize};

use super::{Material, Node, NodeId, Section, DOFS_PER_NODE};
use crate::error::{FEAError, FEAResult};
use crate::math::{self, Mat14, Mat3, TorsionFormulation, Vec14};
use crate::model::{Model, ELEMENT_DOFS};

/// A straight prismatic thin-walled beam between two nodes.
///
/// Local slots 0..=6 belong to the i-node and 7..=13 to the j-node, each in
/// the order [u, v, w, θx, θy, θz, φ′]. Length and orientation are cached at
/// construction; the element is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BeamRecord", into = "BeamRecord")]
pub struct Beam3D {
    i_node: NodeId,
    j_node: NodeId,
    material: Material,
    section: Section,
    i_coords: [f64; 3],
    j_coords: [f64; 3],
    length: f64,
    /// Direction cosines, rows are the local axes
    rotation: Mat3,
}

/// Serialized form of a [`Beam3D`]: endpoints and properties only, so the
/// cached geometry is always rebuilt and validated by [`Beam3D::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BeamRecord {
    i: Node,
    j: Node,
    material: Material,
    section: Section,
}

impl TryFrom<BeamRecord> for Beam3D {
    type Error = FEAError;

    fn try_from(record: BeamRecord) -> FEAResult<Self> {
        Beam3D::new(&record.i, &record.j, record.material, record.section)
    }
}

impl From<Beam3D> for BeamRecord {
    fn from(beam: Beam3D) -> Self {
        let [xi, yi, zi] = beam.i_coords;
        let [xj, yj, zj] = beam.j_coords;
        Self {
            i: Node::new(beam.i_node, xi, yi, zi),
            j: Node::new(beam.j_node, xj, yj, zj),
            material: beam.material,
            section: beam.section,
        }
    }
}

impl Beam3D {
    /// Create a new element between two nodes
    pub fn new(
        i_node: &Node,
        j_node: &Node,
        material: Material,
        section: Section,
    ) -> FEAResult<Self> {
        material.validate()?;
        section.validate()?;
        let rotation = math::direction_cosines(&i_node.coords(), &j_node.coords())?;

        Ok(Self {
            i_node: i_node.id,
            j_node: j_node.id,
            material,
            section,
            i_coords: i_node.coords(),
            j_coords: j_node.coords(),
            length: i_node.distance_to(j_node),
            rotation,
        })
    }

    /// Start node id
    pub fn i_node(&self) -> NodeId {
        self.i_node
    }

    /// End node id
    pub fn j_node(&self) -> NodeId {
        self.j_node
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Get the element length
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Direction cosine matrix (rows are local e1, e2, e3 in global coordinates)
    pub fn direction_cosines(&self) -> &Mat3 {
        &self.rotation
    }

    /// End coordinates the element was built with
    pub(crate) fn end_coords(&self) -> ([f64; 3], [f64; 3]) {
        (self.i_coords, self.j_coords)
    }

    /// Global DOF indices of the 14 local slots, None if a node is not in `model`
    pub fn dof_indices(&self, model: &Model) -> Option<[usize; ELEMENT_DOFS]> {
        let i = model.node_dofs(self.i_node)?;
        let j = model.node_dofs(self.j_node)?;
        Some(std::array::from_fn(|k| {
            if k < DOFS_PER_NODE {
                i[k]
            } else {
                j[k - DOFS_PER_NODE]
            }
        }))
    }

    /// Axial stiffness EA/L
    pub fn axial_stiffness(&self) -> f64 {
        self.material.e * self.section.a / self.length
    }

    /// 14x14 global-to-local transformation matrix
    pub fn transformation_matrix(&self) -> Mat14 {
        math::beam_transformation_matrix(&self.rotation)
    }

    pub fn local_stiffness(&self, formulation: TorsionFormulation) -> Mat14 {
        math::beam_local_stiffness(&self.material, &self.section, self.length, formulation)
    }

    /// Local geometric stiffness for axial force `n` (tension positive)
    pub fn local_geometric_stiffness(&self, n: f64) -> Mat14 {
        math::beam_geometric_stiffness(n, &self.section, self.length)
    }

    /// Elastic stiffness in global coordinates: Tᵀ·k·T
    pub fn global_stiffness(&self, formulation: TorsionFormulation) -> Mat14 {
        let t = self.transformation_matrix();
        t.transpose() * self.local_stiffness(formulation) * t
    }

    /// Geometric stiffness in global coordinates for axial force `n`
    pub fn global_geometric_stiffness(&self, n: f64) -> Mat14 {
        let t = self.transformation_matrix();
        t.transpose() * self.local_geometric_stiffness(n) * t
    }

    /// Rotate element end displacements from global to local coordinates
    pub fn local_displacements(&self, u_global: &Vec14) -> Vec14 {
        self.transformation_matrix() * u_global
    }

    /// Local end forces k·T·u for global end displacements
    pub fn local_end_forces(&self, u_global: &Vec14, formulation: TorsionFormulation) -> Vec14 {
        self.local_stiffness(formulation) * self.local_displacements(u_global)
    }

    /// Axial force N = EA/L · (u_j − u_i), tension positive
    pub fn axial_force(&self, u_global: &Vec14) -> f64 {
        let u_local = self.local_displacements(u_global);
        self.axial_stiffness() * (u_local[7] - u_local[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basic_element(j: Node) -> FEAResult<Beam3D> {
        let i = Node::new(1, 0.0, 0.0, 0.0);
        Beam3D::new(
            &i,
            &j,
            Material::from_poisson(200e9, 0.3),
            Section::new(0.01, 1e-5, 1e-5, 1e-6, 1e-8),
        )
    }

    #[test]
    fn test_element_creation() {
        let el = basic_element(Node::new(2, 3.0, 4.0, 0.0)).unwrap();
        assert_eq!(el.i_node(), 1);
        assert_eq!(el.j_node(), 2);
        assert_relative_eq!(el.length(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_serde_rebuilds_cached_geometry() {
        let el = basic_element(Node::new(2, 3.0, 4.0, 0.0)).unwrap();
        let json = serde_json::to_value(&el).unwrap();
        assert!(json.get("length").is_none());

        let back: Beam3D = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back.j_node(), 2);
        assert_relative_eq!(back.length(), 5.0, epsilon = 1e-12);
        assert_eq!(back.direction_cosines(), el.direction_cosines());

        let mut collapsed = json;
        collapsed["j"] = serde_json::json!({"id": 2, "x": 0.0, "y": 0.0, "z": 0.0});
        assert!(serde_json::from_value::<Beam3D>(collapsed).is_err());
    }

    #[test]
    fn test_coincident_nodes_rejected() {
        let result = basic_element(Node::new(2, 0.0, 0.0, 0.0));
        assert!(matches!(result, Err(FEAError::Geometry(_))));
    }

    #[test]
    fn test_invalid_section_rejected() {
        let i = Node::new(1, 0.0, 0.0, 0.0);
        let j = Node::new(2, 1.0, 0.0, 0.0);
        let section = Section::new(0.01, 1e-5, -1e-5, 1e-6, 1e-8);
        let result = Beam3D::new(&i, &j, Material::steel(), section);
        assert!(matches!(result, Err(FEAError::Configuration(_))));
    }

    #[test]
    fn test_global_stiffness_symmetric_for_skew_element() {
        let el = basic_element(Node::new(2, 1.0, 2.0, -0.5)).unwrap();
        for k in [
            el.global_stiffness(TorsionFormulation::Hermite),
            el.global_stiffness(TorsionFormulation::Exact),
            el.global_geometric_stiffness(-2500.0),
        ] {
            let scale = k.amax();
            assert!((k - k.transpose()).amax() <= 1e-12 * scale);
        }
    }

    #[test]
    fn test_axial_force_of_rotated_element() {
        // Element along global Y stretched by 1 mm
        let el = basic_element(Node::new(2, 0.0, 2.0, 0.0)).unwrap();
        let mut u = Vec14::zeros();
        u[8] = 0.001;
        let expected = el.axial_stiffness() * 0.001;
        assert_relative_eq!(el.axial_force(&u), expected, max_relative = 1e-12);
        let f = el.local_end_forces(&u, TorsionFormulation::Hermite);
        assert_relative_eq!(f[7], expected, max_relative = 1e-12);
    }

    #[test]
    fn test_global_stiffness_rigid_rotation_free() {
        // Rigid rotation about global Z of a skew element produces no forces
        let el = basic_element(Node::new(2, 1.0, 1.0, 1.0)).unwrap();
        let k = el.global_stiffness(TorsionFormulation::Hermite);
        let omega = 1e-3;
        let mut u = Vec14::zeros();
        // i-node at origin: only rotation; j-node translates by ω × r
        u[5] = omega;
        u[12] = omega;
        u[7] = -omega * 1.0;
        u[8] = omega * 1.0;
        let f = k * u;
        assert!(f.amax() < 1e-9 * k.amax() * omega);
    }
}
