use glam::Vec3;

use crate::{
    element::{CH, PH},
    error::Error,
    mesh::Mesh,
    topol::PositionCells,
};

/// Normal of the plane through three points, following the clockwise winding
/// of the cells. Degenerate input produces the zero vector.
pub(crate) fn plane_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - b).normalize_or_zero()
}

/// Normal for a point interpolated between two positions.
pub(crate) fn lerp_normal(n0: Vec3, n1: Vec3, t: f32) -> Vec3 {
    n0.lerp(n1, t).normalize_or_zero()
}

/**
 * Cache of cell normals, used while averaging normals of several positions
 * that share cells. The cache is meant to live for one batch of updates.
 */
#[derive(Debug, Clone, Default)]
pub struct NormalCache {
    normals: Vec<Option<Vec3>>,
}

impl NormalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a precomputed normal for the cell `c`.
    pub fn seed(&mut self, c: CH, normal: Vec3) {
        let i = c.slot();
        if i >= self.normals.len() {
            self.normals.resize(i + 1, None);
        }
        self.normals[i] = Some(normal);
    }

    pub fn get(&self, c: CH) -> Option<Vec3> {
        self.normals.get(c.slot()).copied().flatten()
    }

    fn get_or_calc(&mut self, mesh: &Mesh, c: CH) -> Result<Vec3, Error> {
        match self.get(c) {
            Some(n) => Ok(n),
            None => {
                let n = mesh.calc_cell_normal(c)?;
                self.seed(c, n);
                Ok(n)
            }
        }
    }
}

impl Mesh {
    /// Face normal of a cell, computed from its first three corners.
    pub fn calc_cell_normal(&self, c: CH) -> Result<Vec3, Error> {
        let [a, b, cc, _] = self.cell_positions(c)?;
        Ok(plane_normal(a, b, cc))
    }

    /// Average of the four corners of a cell.
    pub fn calc_cell_centroid(&self, c: CH) -> Result<Vec3, Error> {
        let [a, b, cc, d] = self.cell_positions(c)?;
        Ok((a + b + cc + d) * 0.25)
    }

    /// Centroids of all cells, in cell order.
    pub fn calc_cell_centroids(&self) -> Vec<Vec3> {
        self.raw_cells()
            .iter()
            .map(|cell| {
                cell.iter()
                    .fold(Vec3::ZERO, |acc, p| acc + self.positions()[p.slot()])
                    * 0.25
            })
            .collect()
    }

    /// Averaged normal of a position, from the normals of all the cells that
    /// reference it. Cell normals are read from and written to `cache`. If
    /// `adjacency` is provided it is used to find the cells, otherwise the
    /// cells are scanned. A position not referenced by any cell gets the zero
    /// vector.
    pub fn calc_position_normal(
        &self,
        p: PH,
        cache: &mut NormalCache,
        adjacency: Option<&PositionCells>,
    ) -> Result<Vec3, Error> {
        let scanned;
        let cells = match adjacency {
            Some(adjacency) => {
                adjacency.check(self)?;
                adjacency.get(p)
            }
            None => {
                scanned = self.cells_from_position(p);
                scanned.as_slice()
            }
        };
        let sum = cells.iter().try_fold(Vec3::ZERO, |acc, c| {
            Ok::<_, Error>(acc + cache.get_or_calc(self, *c)?)
        })?;
        Ok(sum.normalize_or_zero())
    }

    /// Recompute the normal of every position by averaging the normals of the
    /// cells around it. The normals array is resized to match the positions.
    pub fn update_normals(&mut self) -> Result<(), Error> {
        let adjacency = self.position_cells();
        let mut cache = NormalCache::new();
        let normals = (0..self.num_positions() as u32)
            .map(|p| self.calc_position_normal(p.into(), &mut cache, Some(&adjacency)))
            .collect::<Result<Vec<_>, Error>>()?;
        *self.normals_vec_mut() = normals;
        Ok(())
    }

    /// Recompute the normals of a set of positions, sharing one cell normal
    /// cache between them.
    pub(crate) fn update_position_normals(
        &mut self,
        positions: &[PH],
        cache: &mut NormalCache,
    ) -> Result<(), Error> {
        for p in positions {
            let n = self.calc_position_normal(*p, cache, None)?;
            self.normals_mut()[p.slot()] = n;
        }
        Ok(())
    }

    /// Write the face normal of `c` to its four positions. This gives the
    /// cell a flat look when its positions are not shared.
    pub fn update_cell_normals(&mut self, c: CH) -> Result<(), Error> {
        let n = self.calc_cell_normal(c)?;
        for p in self.cell(c)? {
            self.normals_mut()[p.slot()] = n;
        }
        Ok(())
    }
}
