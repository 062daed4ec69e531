use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    element::{CH, PH},
    error::Error,
};

/**
 * Quad mesh stored as flat arrays.
 *
 * `positions` and `normals` are parallel arrays indexed by [`PH`]. Each cell
 * holds four position indices in clockwise order, so the boundary of a cell
 * `[a, b, c, d]` runs `a -> b -> c -> d -> a`. Two cells are neighbours when
 * they share a pair of position indices. Adjacency is not stored, it is
 * recomputed by scanning the cells when an operation needs it.
 */
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawMesh")
)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    cells: Vec<[PH; 4]>,
}

/// Mesh arrays as they are read by the deserializer, before validation.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    cells: Vec<[PH; 4]>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMesh> for Mesh {
    type Error = Error;

    fn try_from(raw: RawMesh) -> Result<Self, Error> {
        Mesh::from_raw(raw.positions, raw.normals, raw.cells)
    }
}

/// Selects one of the arrays of the mesh.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Attribute {
    Positions,
    Normals,
    Cells,
}

/// Values of one attribute, as returned by [`Mesh::new_geometry`] and
/// [`Mesh::get_loop`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Positions(Vec<Vec3>),
    Normals(Vec<Vec3>),
    Cells(Vec<CH>),
}

impl Geometry {
    pub fn len(&self) -> usize {
        match self {
            Geometry::Positions(v) | Geometry::Normals(v) => v.len(),
            Geometry::Cells(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            Geometry::Positions(_) => Attribute::Positions,
            Geometry::Normals(_) => Attribute::Normals,
            Geometry::Cells(_) => Attribute::Cells,
        }
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(npositions: usize, ncells: usize) -> Self {
        Mesh {
            positions: Vec::with_capacity(npositions),
            normals: Vec::with_capacity(npositions),
            cells: Vec::with_capacity(ncells),
        }
    }

    /// Build a mesh from raw arrays. The result is validated with
    /// [`Mesh::check_topology`] before it is returned.
    pub fn from_raw(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        cells: Vec<[PH; 4]>,
    ) -> Result<Self, Error> {
        let mesh = Mesh {
            positions,
            normals,
            cells,
        };
        mesh.check_topology()?;
        Ok(mesh)
    }

    /// Consume the mesh and return its raw arrays.
    pub fn into_raw(self) -> (Vec<Vec3>, Vec<Vec3>, Vec<[PH; 4]>) {
        (self.positions, self.normals, self.cells)
    }

    pub fn num_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Mutable access to the positions. The length cannot be changed through
    /// this slice, so the arrays stay in sync.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn normals_mut(&mut self) -> &mut [Vec3] {
        &mut self.normals
    }

    pub fn raw_cells(&self) -> &[[PH; 4]] {
        &self.cells
    }

    /// Iterator over all cells of the mesh.
    pub fn cells(&self) -> impl Iterator<Item = CH> + use<> {
        (0..self.cells.len() as u32).map(CH::from)
    }

    /// The position indices of a cell.
    pub fn cell(&self, c: CH) -> Result<[PH; 4], Error> {
        self.cells
            .get(c.slot())
            .copied()
            .ok_or(Error::CellOutOfBounds(c))
    }

    pub fn position(&self, p: PH) -> Option<Vec3> {
        self.positions.get(p.slot()).copied()
    }

    pub fn normal(&self, p: PH) -> Option<Vec3> {
        self.normals.get(p.slot()).copied()
    }

    /// The four positions of a cell, in the order of its indices.
    pub fn cell_positions(&self, c: CH) -> Result<[Vec3; 4], Error> {
        let [a, b, cc, d] = self.cell(c)?;
        Ok([
            self.positions[a.slot()],
            self.positions[b.slot()],
            self.positions[cc.slot()],
            self.positions[d.slot()],
        ])
    }

    /// Append a position and its normal.
    pub fn add_position(&mut self, pos: Vec3, normal: Vec3) -> PH {
        let p = PH::from(self.positions.len());
        self.positions.push(pos);
        self.normals.push(normal);
        p
    }

    /// Append a cell. The indices must exist and be distinct.
    pub fn add_cell(&mut self, indices: [PH; 4]) -> Result<CH, Error> {
        let c = CH::from(self.cells.len());
        self.check_cell_indices(c, &indices)?;
        self.cells.push(indices);
        Ok(c)
    }

    /// Append a cell whose indices the caller has already validated.
    pub(crate) fn push_cell(&mut self, indices: [PH; 4]) -> CH {
        let c = CH::from(self.cells.len());
        self.cells.push(indices);
        c
    }

    pub(crate) fn set_cell(&mut self, c: CH, indices: [PH; 4]) {
        self.cells[c.slot()] = indices;
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [[PH; 4]] {
        &mut self.cells
    }

    pub(crate) fn normals_vec_mut(&mut self) -> &mut Vec<Vec3> {
        &mut self.normals
    }

    /// Remove the position slots `p` from both arrays, shifting the later
    /// slots down by one. Cell indices are not touched.
    pub(crate) fn remove_position_slot(&mut self, p: PH) {
        self.positions.remove(p.slot());
        self.normals.remove(p.slot());
    }

    /// Run `edit` on this mesh and return whatever it appended to the chosen
    /// attribute.
    ///
    /// The length of the attribute is recorded before the edit and the tail
    /// past that length is returned after it. This is only meaningful for
    /// edits that purely append to the attribute, such as cloning or
    /// mirroring. If the edit shrinks the array, for example by merging
    /// positions, the result is empty.
    pub fn new_geometry<F>(&mut self, attribute: Attribute, edit: F) -> Result<Geometry, Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let start = match attribute {
            Attribute::Positions => self.positions.len(),
            Attribute::Normals => self.normals.len(),
            Attribute::Cells => self.cells.len(),
        };
        edit(self)?;
        Ok(match attribute {
            Attribute::Positions => {
                Geometry::Positions(self.positions.get(start..).unwrap_or_default().to_vec())
            }
            Attribute::Normals => {
                Geometry::Normals(self.normals.get(start..).unwrap_or_default().to_vec())
            }
            Attribute::Cells => Geometry::Cells(
                (start..self.cells.len().max(start))
                    .map(CH::from)
                    .collect(),
            ),
        })
    }
}
