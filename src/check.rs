use std::collections::HashSet;

use crate::{
    element::{CH, PH},
    error::Error,
    mesh::Mesh,
};

impl Mesh {
    pub(crate) fn check_cell_indices(&self, c: CH, indices: &[PH; 4]) -> Result<(), Error> {
        for (i, p) in indices.iter().enumerate() {
            if !p.is_valid(self) {
                return Err(Error::PositionOutOfBounds(c, *p));
            }
            if indices[..i].contains(p) {
                return Err(Error::DuplicateIndex(c, *p));
            }
        }
        Ok(())
    }

    /// Check the structural invariants of the mesh and report the first
    /// violation found.
    ///
    /// The normals array must be as long as the positions array, and every
    /// cell must reference four distinct, existing positions. Geometric
    /// degeneracy, such as a cell with coincident corners, is not an error.
    pub fn check_topology(&self) -> Result<(), Error> {
        if self.num_positions() != self.normals().len() {
            return Err(Error::MismatchedArrayLengths(
                self.num_positions(),
                self.normals().len(),
            ));
        }
        for (c, indices) in self.cells().zip(self.raw_cells().iter()) {
            self.check_cell_indices(c, indices)?;
        }
        Ok(())
    }

    /// Check that no two cells run the same directed edge. Consistently wound
    /// neighbours always traverse their shared edge in opposite directions.
    pub fn check_winding(&self) -> Result<(), Error> {
        let mut edges = HashSet::with_capacity(self.num_cells() * 4);
        for (c, cell) in self.cells().zip(self.raw_cells().iter()) {
            for i in 0..4 {
                if !edges.insert((cell[i], cell[(i + 1) % 4])) {
                    return Err(Error::InconsistentWinding(c));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{element::PH, error::Error, mesh::Mesh};

    #[test]
    fn t_box_topology() {
        let (qbox, _) = Mesh::quad_box(1.0, 1.0, 1.0).expect("Cannot create a box primitive");
        qbox.check_topology().expect("Topological errors found");
        qbox.check_winding().expect("Winding errors found");
        let (dbox, _) = Mesh::box_disjoint(1.0, 2.0, 3.0).expect("Cannot create a box primitive");
        dbox.check_topology().expect("Topological errors found");
    }

    #[test]
    fn t_flipped_cell_breaks_winding() {
        let (mut qbox, cells) =
            Mesh::quad_box(1.0, 1.0, 1.0).expect("Cannot create a box primitive");
        qbox.flip(cells[0]).expect("Cannot flip cell");
        qbox.check_topology().expect("Topological errors found");
        assert!(matches!(
            qbox.check_winding(),
            Err(Error::InconsistentWinding(_))
        ));
    }

    #[test]
    fn t_out_of_range_cell() {
        let (qbox, _) = Mesh::quad_box(1.0, 1.0, 1.0).expect("Cannot create a box primitive");
        let (positions, normals, mut cells) = qbox.into_raw();
        cells[3][2] = PH::from(8u32);
        assert!(matches!(
            Mesh::from_raw(positions, normals, cells),
            Err(Error::PositionOutOfBounds(c, p)) if c == 3u32.into() && p == 8u32.into()
        ));
    }
}
