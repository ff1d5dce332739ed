use std::f32::consts::TAU;
use std::path::Path;
use glam::{Vec2, Vec3};
use log::info;
use crate::error::{Error, Result};
use crate::mesh::MeshData;

/// Closed cylinder built by revolving a unit square around the z axis.
///
/// The unit shape spans `z = -1` to `z = +1`. Caps and side walls keep separate
/// copies of their ring vertices: caps get the flat face normal, walls get the
/// radial normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    radius: f32,
    segments: u32,
    scale_by_radius: bool,
}

impl Cylinder {
    pub fn new(radius: f32, segments: u32) -> Self {
        Self {
            radius,
            segments,
            scale_by_radius: false,
        }
    }

    /// Multiplies ring coordinates by the radius.
    ///
    /// Off by default: the generated ring always lies on the unit circle and the
    /// radius is only recorded, leaving sizing to the mesh's scale.
    pub fn with_radius_scaling(mut self, enabled: bool) -> Self {
        self.scale_by_radius = enabled;
        self
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Builds the mesh: both caps first (center then ring, `segments + 1` vertices
    /// each), then the bottom and top side rings.
    ///
    /// All triangles wind counter-clockwise seen from outside, so the bottom cap
    /// fans `(center, ring[i + 1], ring[i])`, reversed relative to the top cap.
    pub fn generate(&self) -> Result<MeshData> {
        let segments = self.segments;
        if segments == 0 {
            return Err(Error::InvalidSegmentCount(segments));
        }

        let delta_theta = TAU / segments as f32;
        let ring_radius = if self.scale_by_radius { self.radius } else { 1.0 };
        let ring_point = |i: u32, face: f32| {
            let theta = delta_theta * i as f32;
            Vec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), face)
        };

        let mut mesh = MeshData::new();

        // End caps: a center vertex plus a flat-shaded ring, fanned around the center
        for face in [-1.0f32, 1.0] {
            let normal = Vec3::new(0.0, 0.0, face);
            let center = mesh.push_vertex(Vec3::new(0.0, 0.0, face), normal, Vec2::ZERO);

            for i in 0..segments {
                mesh.push_vertex(ring_point(i, face), normal, Vec2::ZERO);
            }

            for i in 0..segments {
                let first = center + 1 + i;
                let second = center + 1 + (i + 1) % segments;
                if face < 0.0 {
                    mesh.push_triangle(center, second, first);
                } else {
                    mesh.push_triangle(center, first, second);
                }
            }
        }

        // Side walls: a second copy of both rings with radial normals
        let bottom = mesh.vertex_count() as u32;
        for face in [-1.0f32, 1.0] {
            for i in 0..segments {
                let position = ring_point(i, face);
                let normal = Vec3::new(position.x, position.y, 0.0).normalize_or_zero();
                mesh.push_vertex(position, normal, Vec2::ZERO);
            }
        }
        let top = bottom + segments;

        for i in 0..segments {
            let next = (i + 1) % segments;
            let a = bottom + i;
            let b = top + i;
            let c = bottom + next;
            let d = top + next;

            mesh.push_triangle(a, c, d);
            mesh.push_triangle(a, d, b);
        }

        Ok(mesh)
    }

    /// Generates the mesh and writes it to `path` as an OBJ document.
    pub fn save(&self, path: &Path) -> Result<()> {
        info!("Generating geometry and saving to {}", path.display());
        self.generate()?.export_obj(path)
    }
}

pub fn expected_vertex_count(segments: u32) -> usize {
    let segments = segments as usize;
    2 * (segments + 1) + 2 * segments
}

pub fn expected_triangle_count(segments: u32) -> usize {
    4 * segments as usize
}
