use std::fmt::{Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/**
 * Positions and cells of the mesh implement this trait. They are identified
 * by their index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

/**
 * Position handle. The index of a position is its only identity: two slots
 * holding bit-identical coordinates are still two different positions.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct PH {
    idx: u32,
}

/**
 * Cell handle. Cells are never removed, so a cell handle stays valid across
 * edits. Subdivision is the exception: it replaces every cell.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct CH {
    idx: u32,
}

impl Handle for PH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl Handle for CH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for PH {
    fn from(idx: u32) -> Self {
        PH { idx }
    }
}

impl From<&u32> for PH {
    fn from(idx: &u32) -> Self {
        PH { idx: *idx }
    }
}

impl From<usize> for PH {
    fn from(idx: usize) -> Self {
        PH { idx: idx as u32 }
    }
}

impl From<u32> for CH {
    fn from(idx: u32) -> Self {
        CH { idx }
    }
}

impl From<&u32> for CH {
    fn from(idx: &u32) -> Self {
        CH { idx: *idx }
    }
}

impl From<usize> for CH {
    fn from(idx: usize) -> Self {
        CH { idx: idx as u32 }
    }
}

impl Display for PH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PH({})", self.index())
    }
}

impl Display for CH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CH({})", self.index())
    }
}

impl Debug for PH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PH({})", self.index())
    }
}

impl Debug for CH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CH({})", self.index())
    }
}

impl PH {
    /// Index of this position as a `usize`, for indexing into the position
    /// and normal arrays.
    pub(crate) fn slot(self) -> usize {
        self.idx as usize
    }

    /// Check if this position is valid for the `mesh`.
    pub fn is_valid(self, mesh: &crate::Mesh) -> bool {
        self.slot() < mesh.num_positions()
    }
}

impl CH {
    pub(crate) fn slot(self) -> usize {
        self.idx as usize
    }

    /// Check if this cell is valid for the `mesh`.
    pub fn is_valid(self, mesh: &crate::Mesh) -> bool {
        self.slot() < mesh.num_cells()
    }

    /// The four position indices of this cell, in clockwise order.
    pub fn positions(self, mesh: &crate::Mesh) -> Result<[PH; 4], crate::Error> {
        mesh.cell(self)
    }
}

#[cfg(test)]
mod test {
    use super::{CH, Handle, PH};

    #[test]
    fn t_handle_formatting() {
        let p: PH = 3u32.into();
        let c: CH = 12usize.into();
        assert_eq!(format!("{p}"), "PH(3)");
        assert_eq!(format!("{c:?}"), "CH(12)");
        assert_eq!(p.index(), 3);
        assert_eq!(PH::from(&7u32), PH::from(7usize));
    }

    #[test]
    fn t_handle_ordering() {
        let mut handles: Vec<PH> = [5u32, 1, 3].iter().map(PH::from).collect();
        handles.sort();
        assert_eq!(handles, [PH::from(1u32), PH::from(3u32), PH::from(5u32)]);
    }
}
