use super::{canonical_vertices, Appearance, Material, Pick, PlacementHandle, Scene};
use crate::construct::EntityKind;
use crate::geometry::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub kind: EntityKind,
    pub material: Material,
    pub transform: Matrix4,
    pub appearance: Appearance,
}

/// A scene that keeps instances in memory. Picking is supplied by the host
/// through [`MemoryScene::set_pick`], standing in for a GPU pick pass.
#[derive(Debug, Default, Clone)]
pub struct MemoryScene {
    instances: HashMap<PlacementHandle, Instance>,
    next_handle: u64,
    pick: Option<Pick>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instance(&self, handle: PlacementHandle) -> Option<&Instance> {
        self.instances.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance behind `handle`. Writing through a released handle is a
    /// caller bug: asserted in debug builds, ignored in release.
    fn live_mut(&mut self, handle: PlacementHandle) -> Option<&mut Instance> {
        let instance = self.instances.get_mut(&handle);
        debug_assert!(instance.is_some(), "stale placement handle {:?}", handle);
        instance
    }

    pub fn set_pick(&mut self, pick: Option<Pick>) {
        self.pick = pick;
    }

    /// Convenience for hosts: pick `handle` with no sub-object.
    pub fn hover(&mut self, handle: Option<PlacementHandle>) {
        self.pick = handle.map(|handle| Pick { handle, sub_id: 0 });
    }
}

impl Scene for MemoryScene {
    fn create_instance(&mut self, kind: EntityKind, material: Material) -> PlacementHandle {
        let handle = PlacementHandle(self.next_handle);
        self.next_handle += 1;
        self.instances.insert(
            handle,
            Instance {
                kind,
                material,
                transform: Matrix4::identity(),
                appearance: Appearance::default(),
            },
        );
        handle
    }

    fn set_transform(&mut self, handle: PlacementHandle, matrix: &Matrix4) {
        if let Some(instance) = self.live_mut(handle) {
            instance.transform = *matrix;
        }
    }

    fn compose_transform_left(&mut self, handle: PlacementHandle, matrix: &Matrix4) {
        if let Some(instance) = self.live_mut(handle) {
            instance.transform = matrix * instance.transform;
        }
    }

    fn world_position(&self, handle: PlacementHandle) -> Option<Point3> {
        self.instances
            .get(&handle)
            .map(|instance| instance.transform.transform_point(&Point3::origin()))
    }

    fn vertex_positions(&self, handle: PlacementHandle) -> Option<Vec<Point3>> {
        self.instances.get(&handle).map(|instance| {
            canonical_vertices(instance.kind)
                .iter()
                .map(|v| instance.transform.transform_point(v))
                .collect()
        })
    }

    fn delete_instance(&mut self, handle: PlacementHandle) {
        self.instances.remove(&handle);
        if self.pick.map(|p| p.handle) == Some(handle) {
            self.pick = None;
        }
    }

    fn set_appearance(&mut self, handle: PlacementHandle, appearance: &Appearance) {
        if let Some(instance) = self.live_mut(handle) {
            instance.appearance = *appearance;
        }
    }

    fn pick(&self) -> Option<Pick> {
        self.pick
    }
}
