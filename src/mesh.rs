use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use glam::{Vec2, Vec3};
use log::info;
use crate::error::Result;
use crate::obj;

/// Indexed triangle mesh stored as parallel vertex attribute arrays.
///
/// `positions`, `normals` and `tex_coords` always have the same length; entry `i`
/// of each describes the same vertex. `indices` holds one triangle per consecutive
/// triple.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, tex_coord: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Writes the mesh as an OBJ document.
    ///
    /// The file is created before anything is emitted, so an unopenable path
    /// leaves nothing behind and returns the I/O error.
    pub fn export_obj(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        obj::write_obj(self, &mut writer)?;
        writer.flush()?;

        info!(
            "Wrote {} vertices and {} triangles to {}",
            self.vertex_count(),
            self.triangle_count(),
            path.display()
        );
        Ok(())
    }

    pub fn load_obj(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        obj::read_obj(BufReader::new(file))
    }
}
