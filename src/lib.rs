/*!
This is a quad mesh modeling library. The mesh is stored as a flat array of
positions, a parallel array of normals, and an array of quadrilateral cells that
index into the positions.

# Overview

+ A [`Mesh`] has no halfedges or other connectivity structures. Adjacency
  between cells is found by scanning the cells, or with a [`PositionCells`]
  snapshot when many queries are made on a mesh that is not changing.

+ Every cell has four distinct corners `a b c d`. The normal of a cell points
  towards the side from which its corners appear in that order, and adjacent
  cells traverse their shared edge in opposite directions.

+ Primitives such as quads and boxes are created with [`QuadOptions`] and the
  box functions on [`Mesh`].

+ Editing operations include splitting cells, insetting and extruding cells,
  splitting and insetting rings of cells, merging coincident positions, and
  mirroring cells.

+ Geometry added by a sequence of edits can be captured with
  [`Mesh::new_geometry`], and the cells can be expanded into index buffers for
  rendering with [`Mesh::elements`].

+ Meshes can be subdivided with any [`Subdivider`]. The builtin
  [`CatmullClark`] subdivider requires the `subdiv` feature, which is enabled
  by default.
*/

mod check;
mod edit;
mod element;
mod elements;
mod error;
mod inset;
mod loops;
mod macros;
mod math;
mod merge;
mod mesh;
mod obj;
mod primitive;
mod subdiv;
mod topol;

pub use element::{CH, Handle, PH};
pub use elements::DrawMode;
pub use error::Error;
pub use inset::InsetCells;
pub use math::NormalCache;
pub use mesh::{Attribute, Geometry, Mesh};
pub use primitive::{Axis, Facing, QuadOptions, Sign};
#[cfg(feature = "subdiv")]
pub use subdiv::CatmullClark;
pub use subdiv::Subdivider;
pub use topol::PositionCells;
