//! Structural elements module

mod beam;
mod material;
mod node;
mod section;
mod support;

pub use beam::Beam3D;
pub use material::Material;
pub use node::{Dof, Node, NodeId, DOFS_PER_NODE};
pub use section::Section;
pub use support::Support;
