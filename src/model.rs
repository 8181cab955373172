//! FE Model - nodes, elements, constraints and loads, plus global assembly

use std::collections::{BTreeSet, HashMap};

use crate::elements::{Beam3D, Dof, Node, NodeId, Support, DOFS_PER_NODE};
use crate::error::{FEAError, FEAResult};
use crate::loads::NodeLoad;
use crate::math::{Mat, Mat14, TorsionFormulation, Vec as FEVec, Vec14};

/// DOFs per element (two nodes)
pub const ELEMENT_DOFS: usize = 2 * DOFS_PER_NODE;

/// Split of the global DOFs into free and fixed (zero displacement) sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DofPartition {
    /// Unconstrained global DOF indices, ascending
    pub free: Vec<usize>,
    /// Constrained global DOF indices, ascending
    pub fixed: Vec<usize>,
}

/// The 3D thin-walled beam model.
///
/// Nodes live in an arena in insertion order; the k-th node registered owns
/// global DOFs `7k..7k+7`. Elements refer to nodes by id only.
#[derive(Debug, Clone, Default)]
pub struct Model {
    nodes: Vec<Node>,
    node_index: HashMap<NodeId, usize>,
    elements: Vec<Beam3D>,
    element_dofs: Vec<[usize; ELEMENT_DOFS]>,
    constraints: BTreeSet<(NodeId, Dof)>,
    loads: HashMap<NodeId, NodeLoad>,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node to the model
    pub fn add_node(&mut self, node: Node) -> FEAResult<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(FEAError::config(format!("node {} already exists", node.id)));
        }
        if !node.coords().iter().all(|c| c.is_finite()) {
            return Err(FEAError::config(format!(
                "node {} has non-finite coordinates",
                node.id
            )));
        }
        self.node_index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Add an element to the model, returning its index
    pub fn add_element(&mut self, element: Beam3D) -> FEAResult<usize> {
        let (i_coords, j_coords) = element.end_coords();
        let i_base = self.checked_node_base(element.i_node(), i_coords)?;
        let j_base = self.checked_node_base(element.j_node(), j_coords)?;

        let mut dofs = [0; ELEMENT_DOFS];
        for k in 0..DOFS_PER_NODE {
            dofs[k] = i_base + k;
            dofs[DOFS_PER_NODE + k] = j_base + k;
        }

        self.elements.push(element);
        self.element_dofs.push(dofs);
        Ok(self.elements.len() - 1)
    }

    fn checked_node_base(&self, id: NodeId, coords: [f64; 3]) -> FEAResult<usize> {
        let &slot = self
            .node_index
            .get(&id)
            .ok_or_else(|| FEAError::config(format!("element references unknown node {}", id)))?;
        if self.nodes[slot].coords() != coords {
            return Err(FEAError::config(format!(
                "element end at {:?} does not match registered node {} at {:?}",
                coords,
                id,
                self.nodes[slot].coords()
            )));
        }
        Ok(slot * DOFS_PER_NODE)
    }

    /// Constrain one DOF of a node to zero displacement.
    ///
    /// `dof_index` follows the nodal order 0=UX, 1=UY, 2=UZ, 3=RX, 4=RY,
    /// 5=RZ, 6=WARP.
    pub fn add_constraint(&mut self, node_id: NodeId, dof_index: usize) -> FEAResult<()> {
        let dof = Dof::try_from(dof_index)?;
        self.constrain(node_id, dof)
    }

    /// Constrain a typed DOF of a node to zero displacement
    pub fn constrain(&mut self, node_id: NodeId, dof: Dof) -> FEAResult<()> {
        self.require_node(node_id)?;
        if !self.constraints.insert((node_id, dof)) {
            return Err(FEAError::config(format!(
                "duplicate constraint on node {} DOF {}",
                node_id, dof
            )));
        }
        Ok(())
    }

    /// Add every restraint of a support condition
    pub fn add_support(&mut self, node_id: NodeId, support: Support) -> FEAResult<()> {
        self.require_node(node_id)?;
        let dofs = support.restrained_dofs();
        if let Some(dof) = dofs.iter().find(|&&d| self.is_constrained(node_id, d)) {
            return Err(FEAError::config(format!(
                "duplicate constraint on node {} DOF {}",
                node_id, dof
            )));
        }
        for dof in dofs {
            self.constraints.insert((node_id, dof));
        }
        Ok(())
    }

    /// Add a node load. Repeated loads on one node accumulate.
    pub fn add_load(&mut self, node_id: NodeId, load: impl Into<NodeLoad>) -> FEAResult<()> {
        self.require_node(node_id)?;
        let load = load.into();
        if !load.is_finite() {
            return Err(FEAError::config(format!(
                "load on node {} has non-finite components",
                node_id
            )));
        }
        let entry = self.loads.entry(node_id).or_default();
        let mut total = entry.as_array();
        for (t, l) in total.iter_mut().zip(load.as_array()) {
            *t += l;
        }
        *entry = NodeLoad::from(total);
        Ok(())
    }

    fn require_node(&self, node_id: NodeId) -> FEAResult<usize> {
        self.node_index
            .get(&node_id)
            .copied()
            .ok_or_else(|| FEAError::config(format!("node {} not found", node_id)))
    }

    // ========================
    // Accessors
    // ========================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// Nodes in DOF order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Beam3D] {
        &self.elements
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Size of the global system, 7 × node count
    pub fn total_dofs(&self) -> usize {
        self.nodes.len() * DOFS_PER_NODE
    }

    /// Global DOF indices of a node
    pub fn node_dofs(&self, id: NodeId) -> Option<[usize; DOFS_PER_NODE]> {
        let &slot = self.node_index.get(&id)?;
        Some(std::array::from_fn(|k| slot * DOFS_PER_NODE + k))
    }

    /// Global DOF indices of the 14 local slots of element `index`
    pub fn element_dofs(&self, index: usize) -> Option<&[usize; ELEMENT_DOFS]> {
        self.element_dofs.get(index)
    }

    /// Constrained (node, DOF) pairs in node-id order
    pub fn constraints(&self) -> impl Iterator<Item = (NodeId, Dof)> + '_ {
        self.constraints.iter().copied()
    }

    pub fn is_constrained(&self, node_id: NodeId, dof: Dof) -> bool {
        self.constraints.contains(&(node_id, dof))
    }

    /// Accumulated load on a node, if any
    pub fn load(&self, node_id: NodeId) -> Option<NodeLoad> {
        self.loads.get(&node_id).copied()
    }

    /// Gather an element's 14 end displacements from a global vector
    pub fn element_displacements(&self, index: usize, u: &FEVec) -> Option<Vec14> {
        let dofs = self.element_dofs.get(index)?;
        Some(Vec14::from_fn(|k, _| u[dofs[k]]))
    }

    // ========================
    // Assembly
    // ========================

    fn scatter_add(global: &mut Mat, dofs: &[usize; ELEMENT_DOFS], k: &Mat14) {
        for (a, &da) in dofs.iter().enumerate() {
            for (b, &db) in dofs.iter().enumerate() {
                global[(da, db)] += k[(a, b)];
            }
        }
    }

    /// Assemble the global elastic stiffness matrix (7N × 7N)
    pub fn assemble_stiffness(&self, formulation: TorsionFormulation) -> Mat {
        let n_dofs = self.total_dofs();
        let mut k_global = Mat::zeros(n_dofs, n_dofs);

        for (element, dofs) in self.elements.iter().zip(&self.element_dofs) {
            Self::scatter_add(&mut k_global, dofs, &element.global_stiffness(formulation));
        }

        log::debug!(
            "Assembled stiffness: {} elements, {} DOFs",
            self.elements.len(),
            n_dofs
        );
        k_global
    }

    /// Assemble the global geometric stiffness matrix.
    ///
    /// `axial_forces` holds one axial force per element, in element order,
    /// tension positive.
    pub fn assemble_geometric_stiffness(&self, axial_forces: &[f64]) -> FEAResult<Mat> {
        if axial_forces.len() != self.elements.len() {
            return Err(FEAError::config(format!(
                "expected {} axial forces, got {}",
                self.elements.len(),
                axial_forces.len()
            )));
        }
        if let Some(bad) = axial_forces.iter().position(|n| !n.is_finite()) {
            return Err(FEAError::config(format!(
                "axial force of element {} is not finite",
                bad
            )));
        }

        let n_dofs = self.total_dofs();
        let mut kg_global = Mat::zeros(n_dofs, n_dofs);

        for ((element, dofs), &n) in self
            .elements
            .iter()
            .zip(&self.element_dofs)
            .zip(axial_forces)
        {
            if n == 0.0 {
                continue;
            }
            Self::scatter_add(&mut kg_global, dofs, &element.global_geometric_stiffness(n));
        }

        Ok(kg_global)
    }

    /// Assemble the global load vector (length 7N)
    pub fn assemble_load_vector(&self) -> FEVec {
        let mut p = FEVec::zeros(self.total_dofs());
        for (&node_id, load) in &self.loads {
            let base = self.node_index[&node_id] * DOFS_PER_NODE;
            for (k, value) in load.as_array().into_iter().enumerate() {
                p[base + k] += value;
            }
        }
        p
    }

    /// Partition global DOFs into free and fixed sets
    pub fn partition(&self) -> DofPartition {
        let mut is_fixed = vec![false; self.total_dofs()];
        for &(node_id, dof) in &self.constraints {
            let base = self.node_index[&node_id] * DOFS_PER_NODE;
            is_fixed[base + dof.index()] = true;
        }

        let (fixed, free): (Vec<usize>, Vec<usize>) =
            (0..self.total_dofs()).partition(|&d| is_fixed[d]);
        DofPartition { free, fixed }
    }
}
