//! Interface to the external scene/renderer collaborator.
//!
//! The core never owns transforms or meshes. Each entity holds an opaque
//! [`PlacementHandle`] and pushes its geometry through [`Scene::set_transform`];
//! free entities read theirs back from the scene after a drag.

use crate::construct::EntityKind;
use crate::geometry::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

pub mod placement;
pub use placement::{canonical_vertices, placement_matrix, shape_from_vertices};

pub mod memory;
pub use memory::MemoryScene;

/// Non-owning reference to a scene instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlacementHandle(pub u64);

/// Result of the renderer's pick query: the instance under the reference
/// point and the sub-object hit on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub handle: PlacementHandle,
    #[serde(default)]
    pub sub_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Directly placed by the user.
    Free,
    /// Derived from other entities.
    Constructed,
}

/// Display state handed to the scene. Hiding never removes geometry, it only
/// thins or fades the instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub highlighted: bool,
    pub hidden: bool,
    pub opacity: f32,
    /// Point radius, or stroke width for segments and lines.
    pub thickness: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            highlighted: false,
            hidden: false,
            opacity: 1.0,
            thickness: 1.0,
        }
    }
}

pub trait Scene {
    /// Creates an instance of the canonical mesh for `kind`.
    fn create_instance(&mut self, kind: EntityKind, material: Material) -> PlacementHandle;

    fn set_transform(&mut self, handle: PlacementHandle, matrix: &Matrix4);

    /// Prepends `matrix` to the instance's current transform.
    fn compose_transform_left(&mut self, handle: PlacementHandle, matrix: &Matrix4);

    /// None for a handle the scene does not know.
    fn world_position(&self, handle: PlacementHandle) -> Option<Point3>;

    /// World positions of the canonical mesh vertices. None for an unknown handle.
    fn vertex_positions(&self, handle: PlacementHandle) -> Option<Vec<Point3>>;

    /// Releases the instance and its GPU-side resources.
    fn delete_instance(&mut self, handle: PlacementHandle);

    fn set_appearance(&mut self, handle: PlacementHandle, appearance: &Appearance);

    /// Instance under the screen-space reference point for this frame.
    fn pick(&self) -> Option<Pick>;
}
