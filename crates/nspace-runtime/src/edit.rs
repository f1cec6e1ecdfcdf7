use hashbrown::HashMap;
use nspace_props::{EntityId, PropValue, PropertiesObject, PropertyError};
use nspace_voxel::{
    FaceDir, RenderContext, SubstanceId, VoxelFace, VoxelId, VoxelRender,
};
use thiserror::Error;

use crate::level::Level;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("no entity {0}")]
    NoEntity(EntityId),
    #[error("{0} has no sensor")]
    NoSensor(EntityId),
    #[error("{entity} has no behavior #{index}")]
    NoBehavior { entity: EntityId, index: usize },
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Editor-side view of a level: every write is equality gated and only real changes remesh.
pub struct EditSession {
    level: Level,
    ctx: RenderContext,
    renders: HashMap<VoxelId, VoxelRender>,
    rebuilds: u64,
}

impl EditSession {
    pub fn new(level: Level, ctx: RenderContext) -> Self {
        Self {
            level,
            ctx,
            renders: HashMap::new(),
            rebuilds: 0,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn into_level(self) -> Level {
        self.level
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Total voxel rebuilds so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    pub fn render(&self, voxel: VoxelId) -> Option<&VoxelRender> {
        self.renders.get(&voxel)
    }

    /// Writes one face. Writing an empty face where no voxel exists creates nothing.
    pub fn set_face(&mut self, position: (i32, i32, i32), dir: FaceDir, face: VoxelFace) -> bool {
        let voxels = &mut self.level.voxels;
        let id = match voxels.voxel_at(position) {
            Some(id) => id,
            None if face.is_empty() => return false,
            None => voxels.get_or_create(position),
        };
        voxels.set_face(id, dir, face)
    }

    pub fn set_substance(&mut self, position: (i32, i32, i32), substance: Option<SubstanceId>) -> bool {
        let voxels = &mut self.level.voxels;
        let id = match voxels.voxel_at(position) {
            Some(id) => id,
            None if substance.is_none() => return false,
            None => voxels.get_or_create(position),
        };
        voxels.set_substance(id, substance)
    }

    /// Sets transient selection on a face. Empty faces cannot be selected.
    pub fn select_face(&mut self, position: (i32, i32, i32), dir: FaceDir, selected: bool) -> bool {
        let Some(id) = self.level.voxels.voxel_at(position) else {
            return false;
        };
        self.level.voxels.update_faces(id, |faces| {
            let face = &mut faces[dir.index()];
            if !face.is_empty() {
                face.add_selected = selected;
            }
        })
    }

    pub fn clear_selection(&mut self) -> usize {
        self.level.voxels.clear_selection()
    }

    pub fn store_selection(&mut self) -> usize {
        self.level.voxels.store_selection()
    }

    pub fn clear_stored_selection(&mut self) -> usize {
        self.level.voxels.clear_stored_selection()
    }

    /// Gated entity property write. A substance entity's x-ray change marks its voxels dirty.
    pub fn set_entity_property(
        &mut self,
        id: EntityId,
        name: &str,
        value: PropValue,
    ) -> Result<bool, EditError> {
        let entity = self.level.entity_mut(id).ok_or(EditError::NoEntity(id))?;
        let before = entity.revision();
        let changed = entity.set_property(name, value)?;
        if entity.revision() != before {
            self.level.sync_x_ray(id);
        }
        Ok(changed)
    }

    pub fn set_sensor_property(
        &mut self,
        id: EntityId,
        name: &str,
        value: PropValue,
    ) -> Result<bool, EditError> {
        let entity = self.level.entity_mut(id).ok_or(EditError::NoEntity(id))?;
        let sensor = entity.sensor.as_mut().ok_or(EditError::NoSensor(id))?;
        Ok(sensor.set_property(name, value)?)
    }

    pub fn set_behavior_property(
        &mut self,
        id: EntityId,
        index: usize,
        name: &str,
        value: PropValue,
    ) -> Result<bool, EditError> {
        let entity = self.level.entity_mut(id).ok_or(EditError::NoEntity(id))?;
        let behavior = entity
            .behaviors_mut()
            .get_mut(index)
            .ok_or(EditError::NoBehavior { entity: id, index })?;
        Ok(behavior.set_property(name, value)?)
    }

    /// Regenerates every dirty voxel. Returns how many were rebuilt.
    pub fn rebuild_dirty(&mut self) -> usize {
        let dirty = self.level.voxels.dirty_voxels();
        for &id in &dirty {
            let rev = self.level.voxels.get_rev(id);
            if let Some(out) = self.level.voxels.render(id, &self.ctx) {
                log::debug!(
                    target: "voxel",
                    "rebuilt {:?} rev={} verts={} submeshes={}",
                    id,
                    rev,
                    out.mesh.vertices.len(),
                    out.mesh.submeshes.len()
                );
                self.renders.insert(id, out);
            }
            self.level.voxels.mark_built(id, rev);
        }
        let voxels = &self.level.voxels;
        self.renders.retain(|id, _| voxels.voxel(*id).is_some());
        self.rebuilds += dirty.len() as u64;
        dirty.len()
    }
}
