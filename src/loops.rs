use tracing::{debug, trace};

use crate::{
    element::{CH, PH},
    error::Error,
    mesh::{Attribute, Geometry, Mesh},
    topol::local_index,
};

/// Local corner order of a cell when walking a loop. `opposite` rotates the
/// order by one corner, which turns the walk by 90 degrees.
fn corner_order(opposite: bool) -> [usize; 4] {
    if opposite { [1, 2, 3, 0] } else { [0, 1, 2, 3] }
}

/// One step of a walk across a loop of cells.
struct Crossing {
    /// The cell being entered.
    cell: CH,
    indices: [PH; 4],
    /// Local indices of the corners of the entered edge. The edge runs from
    /// `a` to `d` in the entered cell.
    a: usize,
    d: usize,
    /// Local indices of the corners of the far edge, `b` next to `a` and `c`
    /// next to `d`.
    b: usize,
    c: usize,
}

impl Mesh {
    /// Enter the cell across the edge `left -> right`, which is traversed in
    /// that direction by the cell being left.
    fn cross_edge(&self, left: PH, right: PH, exclude: Option<CH>) -> Result<Option<Crossing>, Error> {
        let Some(cell) = self.cell_from_edge(left, right, exclude) else {
            return Ok(None);
        };
        let indices = self.cell(cell)?;
        let (Some(a), Some(d)) = (local_index(&indices, left), local_index(&indices, right)) else {
            return Err(Error::InconsistentWinding(cell));
        };
        // A consistently wound neighbour runs the shared edge the other way.
        if a != (d + 1) % 4 {
            return Err(Error::InconsistentWinding(cell));
        }
        Ok(Some(Crossing {
            cell,
            indices,
            a,
            d,
            b: (a + 1) % 4,
            c: (d + 3) % 4,
        }))
    }

    /// Keep crossing edges starting from `left -> right`, splitting every
    /// cell entered at `t` along its far edge. `mid` is the position already
    /// inserted on the first edge. Returns the last position inserted.
    fn split_walk(
        &mut self,
        mut left: PH,
        mut mid: PH,
        mut right: PH,
        t: f32,
        limit: usize,
        created: &mut Vec<CH>,
    ) -> Result<Option<PH>, Error> {
        let mut last = None;
        for _ in 0..limit {
            let Some(step) = self.cross_edge(left, right, None)? else {
                return Ok(last);
            };
            let (b, c) = (step.indices[step.b], step.indices[step.c]);
            let far = self.add_lerp_position(b, c, t);
            let mut near_half = step.indices;
            near_half[step.c] = far;
            near_half[step.d] = mid;
            let mut far_half = step.indices;
            far_half[step.a] = mid;
            far_half[step.b] = far;
            self.set_cell(step.cell, near_half);
            created.push(self.push_cell(far_half));
            trace!(cell = %step.cell, position = %far, "Split cell in loop");
            last = Some(far);
            (left, mid, right) = (b, far, c);
        }
        Err(Error::LoopWalkExhausted(limit))
    }

    /// Split a cell in two, and keep splitting its neighbours the same way
    /// until the loop closes or reaches a boundary on both sides.
    ///
    /// With the local corners `[lb, lt, rt, rb]`, either `[a, b, c, d]` or
    /// `[b, c, d, a]` when `opposite` is set, the cell is cut from `t` along
    /// `lt -> rt` to `t` along `lb -> rb`. The target keeps the `lb lt` side.
    /// The walk first crosses the `lt rt` edge. If it comes back around to the
    /// target, the last inserted position coincides with the one on the
    /// `lb rb` edge and the two are merged. Otherwise the walk continues
    /// across the `rb lb` edge. Returns every new cell.
    pub fn split_loop(&mut self, c: CH, t: f32, opposite: bool) -> Result<Vec<CH>, Error> {
        let indices = self.cell(c)?;
        let limit = self.num_cells();
        let i = corner_order(opposite);
        let [lb, lt, rt, rb] = i.map(|k| indices[k]);
        let mt = self.add_lerp_position(lt, rt, t);
        let mb = self.add_lerp_position(lb, rb, t);
        let mut left = indices;
        left[i[2]] = mt;
        left[i[3]] = mb;
        let mut right = indices;
        right[i[0]] = mb;
        right[i[1]] = mt;
        self.set_cell(c, left);
        let mut created = vec![self.push_cell(right)];
        let last = self.split_walk(lt, mt, rt, t, limit, &mut created)?;
        let closed = match last {
            Some(last) => self.weld_positions(mb, last)?,
            None => false,
        };
        if !closed {
            self.split_walk(rb, mb, lb, 1.0 - t, limit, &mut created)?;
        }
        debug!(
            cell = %c,
            closed,
            cells = created.len(),
            "Split loop"
        );
        Ok(created)
    }

    /// Cut a band into the loop through `c`, by splitting the loop twice. The
    /// second split is applied to the part of the loop that keeps the
    /// original cells.
    pub fn inset_loop(&mut self, c: CH, t: f32, opposite: bool) -> Result<Vec<CH>, Error> {
        let ta = 1.0 - 0.5 * t;
        let tb = 0.5 * t + (1.0 - ta) * t;
        let mut created = self.split_loop(c, ta, opposite)?;
        created.extend(self.split_loop(c, tb, opposite)?);
        Ok(created)
    }

    /// Walk from `start` across the edge `left -> right`, collecting the
    /// entered cells and the corners of their far edges. Returns whether the
    /// walk came back to `start`.
    fn walk_loop(
        &self,
        start: CH,
        mut left: PH,
        mut right: PH,
        cells: &mut Vec<CH>,
        far: &mut Vec<[PH; 2]>,
    ) -> Result<bool, Error> {
        let limit = self.num_cells();
        let mut prev = start;
        for _ in 0..limit {
            let Some(step) = self.cross_edge(left, right, Some(prev))? else {
                return Ok(false);
            };
            if step.cell == start {
                return Ok(true);
            }
            let (b, c) = (step.indices[step.b], step.indices[step.c]);
            cells.push(step.cell);
            far.push([b, c]);
            (left, right, prev) = (b, c, step.cell);
        }
        Err(Error::LoopWalkExhausted(limit))
    }

    /// Collect the loop of cells through `c` without modifying the mesh.
    ///
    /// The walk crosses the `a b` and `c d` edges of the cell, or the `b c`
    /// and `d a` edges when `opposite` is set. This is the loop that
    /// [`Mesh::split_loop`] cuts across when called with the other value of
    /// `opposite`. The result runs from one end of the loop, through `c`, to
    /// the other end. A closed loop contains every cell once and ends with
    /// `c`.
    ///
    /// For positions and normals, every other cell of the loop contributes
    /// the two corners of the edge it was left through, and `c` contributes
    /// all four of its corners.
    pub fn get_loop(&self, c: CH, attribute: Attribute, opposite: bool) -> Result<Geometry, Error> {
        let indices = self.cell(c)?;
        let i = corner_order(opposite);
        let mut before_cells = Vec::new();
        let mut before_far = Vec::new();
        let closed = self.walk_loop(
            c,
            indices[i[0]],
            indices[i[1]],
            &mut before_cells,
            &mut before_far,
        )?;
        let mut after_cells = Vec::new();
        let mut after_far = Vec::new();
        if !closed {
            self.walk_loop(
                c,
                indices[i[2]],
                indices[i[3]],
                &mut after_cells,
                &mut after_far,
            )?;
        }
        before_cells.reverse();
        before_far.reverse();
        let cells = before_cells
            .into_iter()
            .chain(std::iter::once(c))
            .chain(after_cells);
        let corners = before_far
            .into_iter()
            .flatten()
            .chain(indices)
            .chain(after_far.into_iter().flatten());
        Ok(match attribute {
            Attribute::Cells => Geometry::Cells(cells.collect()),
            Attribute::Positions => {
                Geometry::Positions(corners.map(|p| self.positions()[p.slot()]).collect())
            }
            Attribute::Normals => {
                Geometry::Normals(corners.map(|p| self.normals()[p.slot()]).collect())
            }
        })
    }
}
