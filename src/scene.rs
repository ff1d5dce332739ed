use glam::{Mat4, Vec3};
use log::debug;
use crate::animation::Animation;
use crate::error::{Error, Result};
use crate::mesh::MeshData;
use crate::timeline::Timeline;

/// Stable index of a mesh inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(usize);

impl MeshHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Stable index of a geometry buffer set inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(usize);

impl GeometryHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A drawable instance of a geometry.
///
/// `rotation` is in degrees around x, y and z. `transform` is the model matrix
/// handed to the renderer.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: GeometryHandle,
    pub vertex_count: usize,
    pub color: Vec3,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub transform: Mat4,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: GeometryHandle, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            geometry,
            vertex_count,
            color: Vec3::ZERO,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            transform: Mat4::IDENTITY,
        }
    }

    /// Translation, then rotations about x, y and z, then scale.
    pub fn static_transform(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_scale(self.scale)
    }
}

/// Everything the host loop needs to tick and draw: geometry buffers, mesh
/// instances and the animation playlist.
#[derive(Debug, Default)]
pub struct Scene {
    geometries: Vec<MeshData>,
    meshes: Vec<Mesh>,
    timeline: Timeline,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: MeshData) -> GeometryHandle {
        self.geometries.push(geometry);
        GeometryHandle(self.geometries.len() - 1)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    pub fn add_animation(&mut self, target: MeshHandle, animation: Animation) -> Result<()> {
        if target.0 >= self.meshes.len() {
            return Err(Error::UnknownMesh(format!("#{}", target.0)));
        }
        self.timeline.push(target, animation);
        Ok(())
    }

    pub fn find_mesh(&self, name: &str) -> Option<MeshHandle> {
        self.meshes.iter().position(|m| m.name == name).map(MeshHandle)
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0)
    }

    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(handle.0)
    }

    #[inline]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&MeshData> {
        self.geometries.get(handle.0)
    }

    #[inline]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Computes every mesh's starting model matrix. Must run once before the first
    /// `advance`.
    pub fn initialize(&mut self) {
        let animated = self.timeline.initialize(&mut self.meshes);

        for (i, mesh) in self.meshes.iter_mut().enumerate() {
            if !animated.contains(&MeshHandle(i)) {
                mesh.transform = mesh.static_transform();
            }
        }

        debug!(
            "Scene initialized: {} meshes, {} animated, {} timeline entries",
            self.meshes.len(),
            animated.len(),
            self.timeline.len()
        );
    }

    pub fn advance(&mut self, time: u64) {
        self.timeline.advance(time, &mut self.meshes);
    }

    pub fn model_matrices(&self) -> impl Iterator<Item = (&str, Mat4)> + '_ {
        self.meshes.iter().map(|m| (m.name.as_str(), m.transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Frame;

    #[test]
    fn static_transform_composes_in_order() {
        let mut mesh = Mesh::new("pole", GeometryHandle::new(0), 0);
        mesh.position = Vec3::new(0.0, 0.0, -5.0);
        mesh.rotation = Vec3::new(90.0, 0.0, 0.0);
        mesh.scale = Vec3::new(1.0, 1.0, 5.0);

        let transform = mesh.static_transform();

        // Local +z (the cylinder axis) is stretched by 5 then rotated onto -y
        let tip = transform.transform_point3(Vec3::new(0.0, 0.0, 1.0));
        assert!(tip.abs_diff_eq(Vec3::new(0.0, -5.0, -5.0), 1e-5));

        let origin = transform.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(mesh.position, 1e-6));
    }

    #[test]
    fn rotations_apply_x_then_y_then_z() {
        let mut mesh = Mesh::new("skybox", GeometryHandle::new(0), 0);
        mesh.rotation = Vec3::new(90.0, 90.0, 0.0);

        // Rx * Ry: the point is rotated by y first, then by x
        let p = mesh.static_transform().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn unknown_target_is_rejected() {
        let mut scene = Scene::new();
        let animation = Animation::new(vec![Frame::new(Vec3::ZERO, 0)]);
        assert!(matches!(
            scene.add_animation(MeshHandle::new(3), animation),
            Err(Error::UnknownMesh(_))
        ));
        assert!(scene.timeline().is_empty());
    }

    #[test]
    fn initialize_splits_static_and_animated_meshes() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(MeshData::new());

        let mut base = Mesh::new("base", geometry, 0);
        base.position = Vec3::new(0.0, -2.5, 0.0);
        base.scale = Vec3::new(5.0, 0.5, 15.0);
        let base = scene.add_mesh(base);

        let mut disk = Mesh::new("disk", geometry, 0);
        disk.position = Vec3::new(100.0, 100.0, 100.0);
        disk.scale = Vec3::splat(3.0);
        let disk = scene.add_mesh(disk);

        scene
            .add_animation(
                disk,
                Animation::new(vec![
                    Frame::new(Vec3::new(0.0, -0.8, 0.0), 0),
                    Frame::new(Vec3::new(0.0, 5.0, 0.0), 3000),
                ]),
            )
            .unwrap();
        scene
            .add_animation(disk, Animation::new(vec![Frame::new(Vec3::ZERO, 0)]))
            .unwrap();
        scene.initialize();

        let base_mesh = scene.mesh(base).unwrap();
        assert_eq!(base_mesh.transform, base_mesh.static_transform());

        // Animated meshes ignore their base position and take the first frame
        let disk_mesh = scene.mesh(disk).unwrap();
        let expected = Mat4::from_translation(Vec3::new(0.0, -0.8, 0.0)) * Mat4::from_scale(Vec3::splat(3.0));
        assert!(disk_mesh.transform.abs_diff_eq(expected, 1e-6));

        assert_eq!(scene.find_mesh("disk"), Some(disk));
        assert_eq!(scene.find_mesh("missing"), None);
        assert_eq!(scene.model_matrices().count(), 2);
    }
}
