use crate::{
    element::{CH, PH},
    error::Error,
    mesh::Mesh,
};

/**
 * Map from every position to the cells that reference it.
 *
 * This is a snapshot: it is built for one batch of queries and never updated
 * when the mesh changes. It remembers the size of the mesh it was built for,
 * and using it against a mesh of a different size is an error.
 */
#[derive(Debug, Clone, Default)]
pub struct PositionCells {
    cells: Vec<Vec<CH>>,
    num_cells: usize,
}

impl PositionCells {
    /// The cells referencing `p`. An orphan position has none.
    pub fn get(&self, p: PH) -> &[CH] {
        self.cells.get(p.slot()).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn num_positions(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn check(&self, mesh: &Mesh) -> Result<(), Error> {
        if self.cells.len() != mesh.num_positions() || self.num_cells != mesh.num_cells() {
            Err(Error::StaleAdjacency)
        } else {
            Ok(())
        }
    }
}

impl Mesh {
    /// Build the position to cells map for the current state of the mesh.
    pub fn position_cells(&self) -> PositionCells {
        let mut cells = vec![Vec::new(); self.num_positions()];
        for (c, indices) in self.cells().zip(self.raw_cells().iter()) {
            for p in indices {
                if let Some(list) = cells.get_mut(p.slot()) {
                    list.push(c);
                }
            }
        }
        PositionCells {
            cells,
            num_cells: self.num_cells(),
        }
    }

    /// All cells referencing the position `p`, in cell order.
    pub fn cells_from_position(&self, p: PH) -> Vec<CH> {
        self.cells()
            .zip(self.raw_cells().iter())
            .filter_map(|(c, indices)| indices.contains(&p).then_some(c))
            .collect()
    }

    /// Find the first cell, other than `exclude`, that has an edge between
    /// `a` and `b`. The edge may run in either direction.
    pub fn cell_from_edge(&self, a: PH, b: PH, exclude: Option<CH>) -> Option<CH> {
        self.cells()
            .zip(self.raw_cells().iter())
            .find(|(c, indices)| Some(*c) != exclude && has_edge(indices, a, b))
            .map(|(c, _)| c)
    }
}

/// Local index of `p` within the cell.
pub(crate) fn local_index(indices: &[PH; 4], p: PH) -> Option<usize> {
    indices.iter().position(|q| *q == p)
}

fn has_edge(indices: &[PH; 4], a: PH, b: PH) -> bool {
    match local_index(indices, a) {
        Some(i) => indices[(i + 1) % 4] == b || indices[(i + 3) % 4] == b,
        None => false,
    }
}
