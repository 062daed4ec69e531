use crate::{
    element::{CH, PH},
    error::Error,
    math::NormalCache,
    mesh::Mesh,
};

/// Cells produced by an inset or an extrusion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InsetCells {
    /// The four cells around the inner cell, starting from the side of the
    /// `a -> b` edge and going clockwise.
    pub ring: [CH; 4],
    /// The inner cell. This is always the cell that was inset.
    pub inner: CH,
}

impl InsetCells {
    /// All five cells, ring first.
    pub fn all(&self) -> [CH; 5] {
        [self.ring[0], self.ring[1], self.ring[2], self.ring[3], self.inner]
    }
}

impl Mesh {
    /// Shrink a cell towards its centroid, and fill the gap with a ring of four
    /// cells.
    ///
    /// ```text
    ///   a -------------- b
    ///   | \            / |
    ///   |   e ------ f   |
    ///   |   |        |   |
    ///   |   h ------ g   |
    ///   | /            \ |
    ///   d -------------- c
    /// ```
    ///
    /// The inner positions are at `t` along the way from each corner to the
    /// centroid, and copy the normals of their corners. The target cell
    /// becomes `[e, f, g, h]`.
    pub fn inset(&mut self, c: CH, t: f32) -> Result<InsetCells, Error> {
        let [a, b, cc, d] = self.cell(c)?;
        let centroid = self.calc_cell_centroid(c)?;
        let [e, f, g, h] = [a, b, cc, d].map(|p| {
            let (pos, normal) = (self.positions()[p.slot()], self.normals()[p.slot()]);
            self.add_position(pos.lerp(centroid, t), normal)
        });
        self.set_cell(c, [e, f, g, h]);
        let ring = [
            self.push_cell([a, b, f, e]),
            self.push_cell([f, b, cc, g]),
            self.push_cell([h, g, cc, d]),
            self.push_cell([a, e, h, d]),
        ];
        Ok(InsetCells { ring, inner: c })
    }

    /// Same as [`Mesh::inset`], except none of the five resulting cells share
    /// positions with each other. The original corners stay with the ring
    /// cells on the `a b` and `c d` edges, and every other corner is a new
    /// position. New normals are copied from the first corner of the target.
    pub fn inset_disjoint(&mut self, c: CH, t: f32) -> Result<InsetCells, Error> {
        let [a, b, cc, d] = self.cell(c)?;
        let [pa, pb, pc, pd] = self.cell_positions(c)?;
        let normal = self.normals()[a.slot()];
        let centroid = (pa + pb + pc + pd) * 0.25;
        let [pe, pf, pg, ph] = [pa, pb, pc, pd].map(|p| p.lerp(centroid, t));
        let [
            a_bottom,
            b_top,
            c_top,
            d_bottom,
            e_inner,
            e_bottom,
            e_left,
            f_inner,
            f_left,
            f_top,
            g_inner,
            g_top,
            g_right,
            h_inner,
            h_right,
            h_bottom,
        ] = [
            pa, pb, pc, pd, pe, pe, pe, pf, pf, pf, pg, pg, pg, ph, ph, ph,
        ]
        .map(|pos| self.add_position(pos, normal));
        self.set_cell(c, [e_inner, f_inner, g_inner, h_inner]);
        let ring = [
            self.push_cell([a, b, f_left, e_left]),
            self.push_cell([f_top, b_top, c_top, g_top]),
            self.push_cell([h_right, g_right, cc, d]),
            self.push_cell([a_bottom, e_bottom, h_bottom, d_bottom]),
        ];
        Ok(InsetCells { ring, inner: c })
    }

    /// Inset a cell and push the inner cell along its normal by `distance`.
    ///
    /// Each inner position moves once. The normals of the inner and outer
    /// corners are then averaged again over their cells.
    pub fn extrude(&mut self, c: CH, inset_t: f32, distance: f32) -> Result<InsetCells, Error> {
        let outer = self.cell(c)?;
        let cells = self.inset(c, inset_t)?;
        let inner = self.cell(c)?;
        let normal = self.calc_cell_normal(c)?;
        let offset = normal * distance;
        for p in inner {
            self.positions_mut()[p.slot()] += offset;
        }
        // Translation does not change the normal of the inner cell.
        let mut cache = NormalCache::new();
        cache.seed(c, normal);
        let touched: Vec<PH> = outer.iter().chain(inner.iter()).copied().collect();
        self.update_position_normals(&touched, &mut cache)?;
        Ok(cells)
    }

    /// Same as [`Mesh::extrude`] on a disjoint inset. Every cell of the result
    /// gets flat normals.
    pub fn extrude_disjoint(
        &mut self,
        c: CH,
        inset_t: f32,
        distance: f32,
    ) -> Result<InsetCells, Error> {
        let cells = self.inset_disjoint(c, inset_t)?;
        let normal = self.calc_cell_normal(c)?;
        let offset = normal * distance;
        let inner = self.cell(c)?;
        let [left, top, right, bottom] = cells.ring.map(|r| self.raw_cells()[r.slot()]);
        let moved = [
            inner[0], inner[1], inner[2], inner[3], left[2], left[3], top[0], top[3], right[0],
            right[1], bottom[1], bottom[2],
        ];
        for p in moved {
            self.positions_mut()[p.slot()] += offset;
        }
        for r in cells.all() {
            self.update_cell_normals(r)?;
        }
        Ok(cells)
    }
}
