//! Mesh algorithms used by the planarize pipeline.
//!
//! Selection and boundary analysis are read-only; `project`, `weld`,
//! `delete`, `dissolve`, `simplify` and `normals` edit the mesh in place.

pub mod boundary;
pub mod delete;
pub mod dissolve;
pub mod loop_select;
pub mod loops;
pub mod normals;
pub mod plane_estimate;
pub mod project;
pub mod selection;
pub mod simplify;
pub mod weld;

pub use boundary::{BoundaryClassification, boundary_edges, classify_boundary_edges};
pub use loops::{edges_to_loops, walk_loops};
pub use selection::Selection;
