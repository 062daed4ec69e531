use glam::Vec3;
use tracing::debug;

use crate::{element::PH, error::Error, mesh::Mesh};

#[cfg(feature = "subdiv")]
use std::collections::HashMap;

/// A subdivision scheme for quad meshes.
///
/// Given the positions and cells of a mesh, produce the positions and cells
/// of the mesh subdivided `levels` times. The output must only contain quads,
/// and every index must refer to an output position.
pub trait Subdivider {
    fn subdivide(
        &self,
        positions: &[Vec3],
        cells: &[[PH; 4]],
        levels: usize,
    ) -> Result<(Vec<Vec3>, Vec<[PH; 4]>), Error>;
}

impl Mesh {
    /// Replace the geometry of this mesh with the result of `subdivider`, and
    /// recompute all normals. The result of the subdivider is validated before
    /// it replaces anything. Cell handles from before the subdivision are not
    /// valid afterwards.
    pub fn subdivide_with<S>(&mut self, subdivider: &S, levels: usize) -> Result<(), Error>
    where
        S: Subdivider + ?Sized,
    {
        if levels == 0 {
            return Ok(());
        }
        let (positions, cells) = subdivider.subdivide(self.positions(), self.raw_cells(), levels)?;
        let normals = vec![Vec3::ZERO; positions.len()];
        *self = Mesh::from_raw(positions, normals, cells)?;
        self.update_normals()?;
        debug!(
            levels,
            positions = self.num_positions(),
            cells = self.num_cells(),
            "Subdivided mesh"
        );
        Ok(())
    }

    /// Subdivide the mesh according to the [Catmull-Clark
    /// scheme](https://en.wikipedia.org/wiki/Catmull%E2%80%93Clark_subdivision_surface),
    /// `levels` times.
    ///
    /// Each level replaces every cell with four cells, and adds a position
    /// for every edge and every cell.
    ///
    /// ```rust
    /// use quadmesh::Mesh;
    ///
    /// let (mut mesh, _) = Mesh::quad_box(1.0, 1.0, 1.0).expect("Cannot create box");
    /// mesh.subdivide(1).expect("Cannot subdivide");
    /// assert_eq!(mesh.num_positions(), 26);
    /// assert_eq!(mesh.num_cells(), 24);
    /// ```
    #[cfg(feature = "subdiv")]
    pub fn subdivide(&mut self, levels: usize) -> Result<(), Error> {
        self.subdivide_with(&CatmullClark::default(), levels)
    }
}

/// Catmull-Clark subdivision of quad meshes.
///
/// `update_points` determines whether the positions are smoothed. If this is
/// `false`, only the cells are subdivided and the shape is left unchanged.
#[cfg(feature = "subdiv")]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CatmullClark {
    pub update_points: bool,
}

#[cfg(feature = "subdiv")]
impl Default for CatmullClark {
    fn default() -> Self {
        Self {
            update_points: true,
        }
    }
}

#[cfg(feature = "subdiv")]
struct Edge {
    ends: [PH; 2],
    cells: [Option<usize>; 2],
}

#[cfg(feature = "subdiv")]
impl Edge {
    fn is_boundary(&self) -> bool {
        self.cells[1].is_none()
    }
}

#[cfg(feature = "subdiv")]
impl CatmullClark {
    /// Collect the unique edges in the order they are first seen, and for
    /// every cell, the edge following each of its corners.
    fn collect_edges(cells: &[[PH; 4]]) -> Result<(Vec<Edge>, Vec<[usize; 4]>), Error> {
        let mut lookup: HashMap<(PH, PH), usize> = HashMap::with_capacity(cells.len() * 2);
        let mut edges: Vec<Edge> = Vec::with_capacity(cells.len() * 2);
        let mut cell_edges = Vec::with_capacity(cells.len());
        for (ci, cell) in cells.iter().enumerate() {
            let mut local = [0usize; 4];
            for i in 0..4 {
                let (a, b) = (cell[i], cell[(i + 1) % 4]);
                let key = if a < b { (a, b) } else { (b, a) };
                let ei = *lookup.entry(key).or_insert_with(|| {
                    edges.push(Edge {
                        ends: [a, b],
                        cells: [None, None],
                    });
                    edges.len() - 1
                });
                let edge = &mut edges[ei];
                match edge.cells {
                    [None, _] => edge.cells[0] = Some(ci),
                    [Some(_), None] => edge.cells[1] = Some(ci),
                    [Some(_), Some(_)] => return Err(Error::NonManifoldEdge(key.0, key.1)),
                }
                local[i] = ei;
            }
            cell_edges.push(local);
        }
        Ok((edges, cell_edges))
    }

    fn subdivide_once(
        &self,
        positions: &[Vec3],
        cells: &[[PH; 4]],
    ) -> Result<(Vec<Vec3>, Vec<[PH; 4]>), Error> {
        let point = |p: PH| {
            positions
                .get(p.slot())
                .copied()
                .ok_or(Error::InvalidPosition(p))
        };
        let face_points = cells
            .iter()
            .map(|cell| {
                cell.iter()
                    .try_fold(Vec3::ZERO, |acc, p| Ok::<_, Error>(acc + point(*p)?))
                    .map(|sum| sum * 0.25)
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let (edges, cell_edges) = Self::collect_edges(cells)?;
        let edge_points: Vec<Vec3> = edges
            .iter()
            .map(|e| {
                let (p0, p1) = (positions[e.ends[0].slot()], positions[e.ends[1].slot()]);
                match e.cells {
                    [Some(f0), Some(f1)] if self.update_points => {
                        (p0 + p1 + face_points[f0] + face_points[f1]) * 0.25
                    }
                    _ => (p0 + p1) * 0.5,
                }
            })
            .collect();
        let vertex_points = if self.update_points {
            Self::vertex_points(positions, cells, &face_points, &edges, &edge_points)
        } else {
            positions.to_vec()
        };
        let (nv, ne) = (vertex_points.len(), edge_points.len());
        let mut out_positions = vertex_points;
        out_positions.extend(edge_points);
        out_positions.extend(face_points);
        let mut out_cells = Vec::with_capacity(cells.len() * 4);
        for (ci, (cell, local)) in cells.iter().zip(cell_edges.iter()).enumerate() {
            let fp = PH::from(nv + ne + ci);
            for i in 0..4 {
                out_cells.push([
                    cell[i],
                    PH::from(nv + local[i]),
                    fp,
                    PH::from(nv + local[(i + 3) % 4]),
                ]);
            }
        }
        Ok((out_positions, out_cells))
    }

    fn vertex_points(
        positions: &[Vec3],
        cells: &[[PH; 4]],
        face_points: &[Vec3],
        edges: &[Edge],
        edge_points: &[Vec3],
    ) -> Vec<Vec3> {
        let n = positions.len();
        let mut face_sum = vec![Vec3::ZERO; n];
        let mut neighbour_sum = vec![Vec3::ZERO; n];
        let mut valence = vec![0usize; n];
        let mut boundary_sum = vec![Vec3::ZERO; n];
        let mut boundary_count = vec![0usize; n];
        for (cell, fp) in cells.iter().zip(face_points.iter()) {
            for p in cell {
                face_sum[p.slot()] += *fp;
            }
        }
        for (edge, ep) in edges.iter().zip(edge_points.iter()) {
            let [a, b] = edge.ends;
            for (p, q) in [(a, b), (b, a)] {
                neighbour_sum[p.slot()] += positions[q.slot()];
                valence[p.slot()] += 1;
                if edge.is_boundary() {
                    boundary_sum[p.slot()] += *ep;
                    boundary_count[p.slot()] += 1;
                }
            }
        }
        positions
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                if valence[i] == 0 {
                    // Not referenced by any cell.
                    *pos
                } else if boundary_count[i] > 0 {
                    (*pos + boundary_sum[i]) / (boundary_count[i] + 1) as f32
                } else {
                    let n = valence[i] as f32;
                    ((face_sum[i] + neighbour_sum[i]) / n + *pos * (n - 2.0)) / n
                }
            })
            .collect()
    }
}

#[cfg(feature = "subdiv")]
impl Subdivider for CatmullClark {
    fn subdivide(
        &self,
        positions: &[Vec3],
        cells: &[[PH; 4]],
        levels: usize,
    ) -> Result<(Vec<Vec3>, Vec<[PH; 4]>), Error> {
        let mut positions = positions.to_vec();
        let mut cells = cells.to_vec();
        for _ in 0..levels {
            (positions, cells) = self.subdivide_once(&positions, &cells)?;
        }
        Ok((positions, cells))
    }
}
