pub mod error;
pub mod mesh;
pub mod obj;
pub mod cylinder;
pub mod animation;
pub mod timeline;
pub mod scene;

pub use crate::animation::{Animation, AnimationState, Frame};
pub use crate::cylinder::Cylinder;
pub use crate::mesh::MeshData;
pub use crate::scene::{GeometryHandle, Mesh, MeshHandle, Scene};
pub use crate::timeline::Timeline;
