use crate::{
    element::Handle,
    error::Error,
    mesh::Mesh,
};

/// How the cells are expanded into an index buffer for rendering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Two triangles per cell, `a b c` and `c d a`.
    #[default]
    Triangles,
    /// Four line segments per cell, along its boundary.
    Lines,
}

impl Mesh {
    /// Flat index buffer of all cells, for drawing the mesh with the
    /// positions and normals arrays as vertex buffers. `T` is the integer type
    /// of the index buffer. An index that does not fit in `T` is an error.
    pub fn elements<T>(&self, mode: DrawMode) -> Result<Vec<T>, Error>
    where
        T: TryFrom<u32>,
    {
        let order: &[usize] = match mode {
            DrawMode::Triangles => &[0, 1, 2, 2, 3, 0],
            DrawMode::Lines => &[0, 1, 1, 2, 2, 3, 3, 0],
        };
        let mut out = Vec::with_capacity(self.num_cells() * order.len());
        for cell in self.raw_cells() {
            for i in order {
                let p = cell[*i];
                out.push(T::try_from(p.index()).map_err(|_| Error::IndexOverflow(p))?);
            }
        }
        Ok(out)
    }
}
