use tracing::debug;

use crate::{element::PH, error::Error, mesh::Mesh};

impl Mesh {
    /// Delete the position `deleted` and point every reference to it at
    /// `kept`. References to positions after the deleted slot shift down by
    /// one, and `kept` is given as it is before the deletion.
    fn remove_position(&mut self, deleted: PH, kept: PH) {
        let kept = if kept > deleted {
            PH::from(kept.slot() - 1)
        } else {
            kept
        };
        for cell in self.cells_mut() {
            for p in cell.iter_mut() {
                if *p == deleted {
                    *p = kept;
                } else if *p > deleted {
                    *p = PH::from(p.slot() - 1);
                }
            }
        }
        self.remove_position_slot(deleted);
    }

    /// Find a cell with two corners at bit-identical coordinates. Merging
    /// would make such a cell reference the same position twice.
    fn check_coincident_corners(&self) -> Result<(), Error> {
        for (c, cell) in self.cells().zip(self.raw_cells().iter()) {
            for j in 1..4 {
                let pj = self.positions()[cell[j].slot()];
                if cell[..j].iter().any(|p| self.positions()[p.slot()] == pj) {
                    return Err(Error::DuplicateIndex(c, cell[j]));
                }
            }
        }
        Ok(())
    }

    /// Merge all positions with bit-identical coordinates, and return the
    /// number of positions removed.
    ///
    /// Of every pair of coincident positions, the one with the lower index is
    /// removed and its references are redirected to the other. Every normal is
    /// recomputed afterwards. This scans all pairs of positions.
    ///
    /// If any cell has two corners at the same coordinates, the mesh is left
    /// unchanged and [`Error::DuplicateIndex`] is returned with that cell and
    /// the later of the two corners.
    pub fn merge_positions(&mut self) -> Result<usize, Error> {
        self.check_topology()?;
        self.check_coincident_corners()?;
        let mut merged = 0usize;
        let mut a = 0usize;
        while a < self.num_positions() {
            let pa = self.positions()[a];
            match (a + 1..self.num_positions()).find(|b| self.positions()[*b] == pa) {
                Some(b) => {
                    self.remove_position(a.into(), b.into());
                    merged += 1;
                }
                None => a += 1,
            }
        }
        self.update_normals()?;
        debug!(
            merged,
            positions = self.num_positions(),
            "Merged coincident positions"
        );
        Ok(merged)
    }

    /// Merge two positions if their coordinates are bit-identical. The lower
    /// index is kept and the higher one is removed. Returns whether the
    /// positions were merged. Normals are not recomputed.
    ///
    /// Welding two corners of the same cell is refused with
    /// [`Error::DuplicateIndex`], and the mesh is left unchanged.
    pub fn weld_positions(&mut self, a: PH, b: PH) -> Result<bool, Error> {
        let (pa, pb) = match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => (pa, pb),
            (None, _) => return Err(Error::InvalidPosition(a)),
            (_, None) => return Err(Error::InvalidPosition(b)),
        };
        if a == b || pa != pb {
            return Ok(false);
        }
        let (kept, deleted) = if a < b { (a, b) } else { (b, a) };
        if let Some((c, _)) = self
            .cells()
            .zip(self.raw_cells().iter())
            .find(|(_, cell)| cell.contains(&kept) && cell.contains(&deleted))
        {
            return Err(Error::DuplicateIndex(c, deleted));
        }
        self.remove_position(deleted, kept);
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use glam::vec3;

    use crate::{element::PH, error::Error, mesh::Mesh, primitive::QuadOptions};

    fn indices(raw: [u32; 4]) -> [PH; 4] {
        raw.map(PH::from)
    }

    #[test]
    fn t_merge_without_duplicates() {
        let (mut qbox, _) = Mesh::quad_box(1.0, 1.0, 1.0).expect("Cannot create a box primitive");
        let before = qbox.clone();
        assert_eq!(qbox.merge_positions().expect("Cannot merge"), 0);
        assert_eq!(qbox, before);
    }

    #[test]
    fn t_merge_two_quads() {
        // Two quads sharing an edge by coordinates only.
        let left = [
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            vec3(1.0, 0.0, 1.0),
            vec3(1.0, 0.0, 0.0),
        ];
        let right = [
            vec3(1.0, 0.0, 0.0),
            vec3(1.0, 0.0, 1.0),
            vec3(2.0, 0.0, 1.0),
            vec3(2.0, 0.0, 0.0),
        ];
        let (mut mesh, c0) =
            Mesh::quad(&QuadOptions::new().with_positions(left)).expect("Cannot create quad");
        let c1 = mesh
            .add_quad(&QuadOptions::new().with_positions(right))
            .expect("Cannot add quad");
        assert_eq!(mesh.merge_positions().expect("Cannot merge"), 2);
        assert_eq!(mesh.num_positions(), 6);
        // Slots 2 and 3 are removed in favour of the later copies.
        assert_eq!(mesh.cell(c0).expect("Cannot read cell"), indices([0, 1, 3, 2]));
        assert_eq!(mesh.cell(c1).expect("Cannot read cell"), indices([2, 3, 4, 5]));
        assert_eq!(mesh.normals().len(), 6);
        mesh.check_topology().expect("Topological errors found");
        mesh.check_winding().expect("Winding errors found");
    }

    #[test]
    fn t_merge_rejects_coincident_corners() {
        let corners = [
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            vec3(0.0, 0.0, 1.0),
            vec3(1.0, 0.0, 0.0),
        ];
        let (mut mesh, c) =
            Mesh::quad(&QuadOptions::new().with_positions(corners)).expect("Cannot create quad");
        let before = mesh.clone();
        assert!(matches!(
            mesh.merge_positions(),
            Err(Error::DuplicateIndex(cell, p)) if cell == c && p == PH::from(2u32)
        ));
        assert_eq!(mesh, before);
    }

    #[test]
    fn t_merge_after_degenerate_split() {
        let (mut quad, c) = Mesh::quad(&QuadOptions::default()).expect("Cannot create quad");
        quad.split_vertical(c, 0.0).expect("Cannot split");
        let before = quad.clone();
        // The target is now [a, b, bc, ad] with bc on top of b.
        assert!(matches!(
            quad.merge_positions(),
            Err(Error::DuplicateIndex(cell, p)) if cell == c && p == PH::from(4u32)
        ));
        assert_eq!(quad, before);
        quad.check_topology().expect("Mesh must be left intact");
    }

    #[test]
    fn t_weld_corners_of_one_cell() {
        let corners = [
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            vec3(0.0, 0.0, 1.0),
            vec3(1.0, 0.0, 0.0),
        ];
        let (mut mesh, c) =
            Mesh::quad(&QuadOptions::new().with_positions(corners)).expect("Cannot create quad");
        assert!(matches!(
            mesh.weld_positions(PH::from(2u32), PH::from(1u32)),
            Err(Error::DuplicateIndex(cell, p)) if cell == c && p == PH::from(2u32)
        ));
        assert_eq!(mesh.num_positions(), 4);
    }

    #[test]
    fn t_weld_positions() {
        let (mut mesh, c0) = Mesh::quad(&QuadOptions::default()).expect("Cannot create quad");
        let c1 = mesh.clone_cell(c0).expect("Cannot clone cell");
        assert!(
            !mesh
                .weld_positions(PH::from(0u32), PH::from(5u32))
                .expect("Cannot weld")
        );
        assert!(
            mesh.weld_positions(PH::from(5u32), PH::from(1u32))
                .expect("Cannot weld")
        );
        assert_eq!(mesh.num_positions(), 7);
        assert_eq!(mesh.normals().len(), 7);
        assert_eq!(mesh.cell(c1).expect("Cannot read cell"), indices([4, 1, 5, 6]));
        assert_eq!(mesh.cell(c0).expect("Cannot read cell"), indices([0, 1, 2, 3]));
        assert!(matches!(
            mesh.weld_positions(PH::from(0u32), PH::from(7u32)),
            Err(Error::InvalidPosition(_))
        ));
    }
}
