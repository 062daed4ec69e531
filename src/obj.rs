use std::{io::BufRead, path::Path};

use glam::{Vec3, vec3};
use tracing::debug;

use crate::{element::PH, error::Error, mesh::Mesh};

impl Mesh {
    /// Load a quad mesh from an OBJ file. Every face must have four vertices.
    /// Normals in the file are ignored, and computed from the cells instead.
    pub fn load_obj(path: &Path) -> Result<Self, Error> {
        let options = tobj::LoadOptions::default();
        let (models, _) =
            tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        let mesh = Self::from_models(models)?;
        debug!(
            path = %path.display(),
            positions = mesh.num_positions(),
            cells = mesh.num_cells(),
            "Loaded obj file"
        );
        Ok(mesh)
    }

    /// Same as [`Mesh::load_obj`], reading the OBJ data from `reader`.
    /// Material libraries are not loaded.
    pub fn read_obj<R: BufRead>(reader: &mut R) -> Result<Self, Error> {
        let options = tobj::LoadOptions::default();
        let (models, _) = tobj::load_obj_buf(reader, &options, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        Self::from_models(models)
    }

    fn from_models(models: Vec<tobj::Model>) -> Result<Self, Error> {
        let (npos, ncells) = models.iter().fold((0usize, 0usize), |(npos, ncells), model| {
            let msh = &model.mesh;
            (
                npos + (msh.positions.len() / 3),
                ncells + msh.indices.len() / 4,
            )
        });
        let mut outmesh = Mesh::with_capacity(npos, ncells);
        let mut offset = 0u32;
        for model in models {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::IncorrectNumberOfCoordinates(mesh.positions.len()));
            }
            let nverts = (mesh.positions.len() / 3) as u32;
            for triplet in mesh.positions.chunks_exact(3) {
                outmesh.add_position(vec3(triplet[0], triplet[1], triplet[2]), Vec3::ZERO);
            }
            // No arities means every face is a triangle.
            if mesh.face_arities.is_empty() && !mesh.indices.is_empty() {
                return Err(Error::NonQuadFace(3));
            }
            if let Some(arity) = mesh.face_arities.iter().find(|a| **a != 4) {
                return Err(Error::NonQuadFace(*arity as usize));
            }
            for quad in mesh.indices.chunks_exact(4) {
                outmesh.add_cell([
                    PH::from(quad[0] + offset),
                    PH::from(quad[1] + offset),
                    PH::from(quad[2] + offset),
                    PH::from(quad[3] + offset),
                ])?;
            }
            offset += nverts;
        }
        outmesh.update_normals()?;
        Ok(outmesh)
    }
}
