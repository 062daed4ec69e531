use std::collections::HashMap;

use crate::{
    element::{CH, PH},
    error::Error,
    math::lerp_normal,
    mesh::Mesh,
    primitive::Axis,
};

impl Mesh {
    /// Duplicate a cell. The copy gets four new positions with the same
    /// coordinates and normals as the original, so it shares nothing with the
    /// rest of the mesh.
    pub fn clone_cell(&mut self, c: CH) -> Result<CH, Error> {
        let indices = self.cell(c)?;
        let copied = indices.map(|p| {
            let (pos, normal) = (self.positions()[p.slot()], self.normals()[p.slot()]);
            self.add_position(pos, normal)
        });
        Ok(self.push_cell(copied))
    }

    /// Duplicate a group of cells. A position shared by several cells of the
    /// group is copied once, so the copies are connected to each other the
    /// same way the originals are, but not to anything else.
    pub fn clone_cells(&mut self, cells: &[CH]) -> Result<Vec<CH>, Error> {
        let mut copies: HashMap<PH, PH> = HashMap::new();
        let mut out = Vec::with_capacity(cells.len());
        for c in cells {
            let indices = self.cell(*c)?;
            let mapped = indices.map(|p| {
                *copies.entry(p).or_insert_with(|| {
                    let (pos, normal) = (self.positions()[p.slot()], self.normals()[p.slot()]);
                    self.add_position(pos, normal)
                })
            });
            out.push(self.push_cell(mapped));
        }
        Ok(out)
    }

    /// Reverse the winding of a cell, and negate the normals of its
    /// positions. Neighbouring cells that share these positions see their
    /// normals negated too.
    pub fn flip(&mut self, c: CH) -> Result<(), Error> {
        let mut indices = self.cell(c)?;
        indices.reverse();
        self.set_cell(c, indices);
        for p in indices {
            let n = &mut self.normals_mut()[p.slot()];
            *n = -*n;
        }
        Ok(())
    }

    /// Append a mirrored copy of `cells`, reflected across the plane through
    /// the origin perpendicular to `axis`. Positions shared within the group
    /// are copied once. The copies have reversed winding, so they keep facing
    /// outwards.
    pub fn mirror(&mut self, cells: &[CH], axis: Axis) -> Result<Vec<CH>, Error> {
        let coord = axis.coord();
        let mut copies: HashMap<PH, PH> = HashMap::new();
        let mut out = Vec::with_capacity(cells.len());
        for c in cells {
            let indices = self.cell(*c)?;
            let [a, b, cc, d] = indices.map(|p| {
                *copies.entry(p).or_insert_with(|| {
                    let i = p.slot();
                    let mut pos = self.positions()[i];
                    let mut normal = self.normals()[i];
                    pos[coord] = -pos[coord];
                    normal[coord] = -normal[coord];
                    self.add_position(pos, normal)
                })
            });
            out.push(self.push_cell([d, cc, b, a]));
        }
        Ok(out)
    }

    /// Interpolate a new position between two existing ones, with an
    /// interpolated normal.
    pub(crate) fn add_lerp_position(&mut self, from: PH, to: PH, t: f32) -> PH {
        let (i, j) = (from.slot(), to.slot());
        let pos = self.positions()[i].lerp(self.positions()[j], t);
        let normal = lerp_normal(self.normals()[i], self.normals()[j], t);
        self.add_position(pos, normal)
    }

    /// Split a cell in two, across the edges `b -> c` and `d -> a`.
    ///
    /// ```text
    ///   a ---- b        a ---- b
    ///   |      |        |      |
    ///   |      |   =>   ad -- bc
    ///   |      |        |      |
    ///   d ---- c        d ---- c
    /// ```
    ///
    /// The new positions are at `t` along `b -> c` and `a -> d`. The target
    /// cell keeps the `a b` side, and the returned new cell has the `c d`
    /// side.
    pub fn split_vertical(&mut self, c: CH, t: f32) -> Result<CH, Error> {
        let [a, b, cc, d] = self.cell(c)?;
        let bc = self.add_lerp_position(b, cc, t);
        let ad = self.add_lerp_position(a, d, t);
        self.set_cell(c, [a, b, bc, ad]);
        Ok(self.push_cell([ad, bc, cc, d]))
    }

    /// Same as [`Mesh::split_vertical`], except the two cells do not share
    /// the new positions. Each side gets its own copy, and all new normals
    /// are copied from the first corner.
    pub fn split_vertical_disjoint(&mut self, c: CH, t: f32) -> Result<CH, Error> {
        let [a, b, cc, d] = self.cell(c)?;
        let [pa, pb, pc, pd] = self.cell_positions(c)?;
        let normal = self.normals()[a.slot()];
        let bc_pos = pb.lerp(pc, t);
        let ad_pos = pa.lerp(pd, t);
        let bc1 = self.add_position(bc_pos, normal);
        let ad1 = self.add_position(ad_pos, normal);
        let bc2 = self.add_position(bc_pos, normal);
        let ad2 = self.add_position(ad_pos, normal);
        self.set_cell(c, [a, b, bc1, ad1]);
        Ok(self.push_cell([ad2, bc2, cc, d]))
    }

    /// Split a cell in two, across the edges `a -> b` and `c -> d`.
    ///
    /// ```text
    ///   a -- ab -- b
    ///   |    |     |
    ///   |    |     |
    ///   d -- cd -- c
    /// ```
    ///
    /// The new positions are at `t` along `b -> a` and `c -> d`. The target
    /// cell keeps the `a d` side, and the returned new cell has the `b c`
    /// side.
    pub fn split_horizontal(&mut self, c: CH, t: f32) -> Result<CH, Error> {
        let [a, b, cc, d] = self.cell(c)?;
        let ab = self.add_lerp_position(b, a, t);
        let cd = self.add_lerp_position(cc, d, t);
        self.set_cell(c, [a, ab, cd, d]);
        Ok(self.push_cell([ab, b, cc, cd]))
    }

    /// Disjoint version of [`Mesh::split_horizontal`]. The new positions are
    /// at `t` along `a -> b` and `d -> c`. Here the target cell keeps the
    /// `b c` side and the returned new cell has the `a d` side.
    pub fn split_horizontal_disjoint(&mut self, c: CH, t: f32) -> Result<CH, Error> {
        let [a, b, cc, d] = self.cell(c)?;
        let [pa, pb, pc, pd] = self.cell_positions(c)?;
        let normal = self.normals()[a.slot()];
        let ab_pos = pa.lerp(pb, t);
        let cd_pos = pd.lerp(pc, t);
        let ab1 = self.add_position(ab_pos, normal);
        let cd1 = self.add_position(cd_pos, normal);
        let ab2 = self.add_position(ab_pos, normal);
        let cd2 = self.add_position(cd_pos, normal);
        self.set_cell(c, [ab1, b, cc, cd1]);
        Ok(self.push_cell([a, ab2, cd2, d]))
    }
}
