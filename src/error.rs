use thiserror::Error;

use crate::element::{CH, PH};

#[derive(Debug, Error)]
pub enum Error {
    // Indices.
    #[error("{0} does not exist in the mesh")]
    InvalidPosition(PH),
    #[error("{0} does not exist in the mesh")]
    CellOutOfBounds(CH),
    #[error("{0} references {1}, which does not exist in the mesh")]
    PositionOutOfBounds(CH, PH),
    #[error("{0} references {1} more than once")]
    DuplicateIndex(CH, PH),
    #[error("index {0} does not fit in the requested element type")]
    IndexOverflow(PH),
    // Topology.
    #[error("{0} does not run the shared edge opposite to its neighbour")]
    InconsistentWinding(CH),
    #[error("loop walk did not terminate after visiting {0} cells")]
    LoopWalkExhausted(usize),
    #[error("position adjacency was built for a different mesh state")]
    StaleAdjacency,
    #[error("the edge between {0} and {1} is shared by more than two cells")]
    NonManifoldEdge(PH, PH),
    // Options.
    #[error("invalid facing '{0}', expected one of x+, x-, y+, y-, z+, z-")]
    InvalidFacing(String),
    // Obj.
    #[error("failed to load obj file: {0}")]
    ObjLoadFailed(String),
    #[error("expected the coordinate count to be a multiple of 3, found {0}")]
    IncorrectNumberOfCoordinates(usize),
    #[error("face with {0} vertices found, only quads are supported")]
    NonQuadFace(usize),
    // Other.
    #[error("mismatched array lengths: {0} and {1}")]
    MismatchedArrayLengths(usize, usize),
}
