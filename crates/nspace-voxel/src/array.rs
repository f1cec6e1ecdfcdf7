use std::collections::HashMap;

use crate::face::{FaceDir, VoxelFace};
use crate::render::{RenderContext, VoxelRender, update_voxel};
use crate::substance::{Substance, SubstanceFlags, SubstanceId};
use crate::voxel::{Voxel, VoxelId};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelArrayStats {
    pub voxels: usize,
    pub substances: usize,
    pub dirty: usize,
    pub built_entries: usize,
}

/// Sparse voxel storage keyed by grid position, with per-voxel change tracking.
///
/// Every mutation that can change a voxel's render output bumps its revision; hosts rebuild
/// what [`dirty_voxels`](Self::dirty_voxels) reports and then call
/// [`mark_built`](Self::mark_built).
#[derive(Default, Debug)]
pub struct VoxelArray {
    slots: Vec<Option<Voxel>>,
    free: Vec<u32>,
    by_pos: HashMap<(i32, i32, i32), VoxelId>,
    substances: Vec<Option<Substance>>,
    // Change-tracking
    rev: HashMap<VoxelId, u64>,
    built: HashMap<VoxelId, u64>,
    counter: u64,
}

impl VoxelArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pos.is_empty()
    }

    pub fn stats(&self) -> VoxelArrayStats {
        VoxelArrayStats {
            voxels: self.len(),
            substances: self.substances.iter().flatten().count(),
            dirty: self.dirty_voxels().len(),
            built_entries: self.built.len(),
        }
    }

    // --- Voxels ---

    pub fn voxel_at(&self, position: (i32, i32, i32)) -> Option<VoxelId> {
        self.by_pos.get(&position).copied()
    }

    pub fn voxel(&self, id: VoxelId) -> Option<&Voxel> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Voxels in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (VoxelId, &Voxel)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(ix, v)| v.as_ref().map(|v| (VoxelId(ix as u32), v)))
    }

    pub fn ids(&self) -> Vec<VoxelId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn get_or_create(&mut self, position: (i32, i32, i32)) -> VoxelId {
        if let Some(id) = self.voxel_at(position) {
            return id;
        }
        let voxel = Voxel::new(position);
        let id = match self.free.pop() {
            Some(ix) => {
                self.slots[ix as usize] = Some(voxel);
                VoxelId(ix)
            }
            None => {
                self.slots.push(Some(voxel));
                VoxelId(self.slots.len() as u32 - 1)
            }
        };
        self.by_pos.insert(position, id);
        self.mark_dirty(id);
        id
    }

    /// Writes one face; returns `false` (and leaves the voxel clean) when nothing changed.
    pub fn set_face(&mut self, id: VoxelId, dir: FaceDir, face: VoxelFace) -> bool {
        self.update_faces(id, |faces| faces[dir.index()] = face)
    }

    /// Applies `f` to the faces and marks the voxel dirty only if they changed.
    pub fn update_faces(&mut self, id: VoxelId, f: impl FnOnce(&mut [VoxelFace; 6])) -> bool {
        let Some(voxel) = self.voxel_mut(id) else {
            return false;
        };
        let before = voxel.faces;
        f(&mut voxel.faces);
        if voxel.faces == before {
            return false;
        }
        self.mark_dirty(id);
        true
    }

    /// Clears all faces and detaches the substance. The cell stays allocated.
    pub fn clear_voxel(&mut self, id: VoxelId) -> bool {
        let detached = self.set_substance(id, None);
        let cleared = self.update_faces(id, |faces| *faces = [VoxelFace::EMPTY; 6]);
        detached || cleared
    }

    pub fn remove_voxel(&mut self, id: VoxelId) -> Option<Voxel> {
        self.set_substance(id, None);
        let voxel = self.slots.get_mut(id.0 as usize)?.take()?;
        self.by_pos.remove(&voxel.position);
        self.free.push(id.0);
        self.rev.remove(&id);
        self.built.remove(&id);
        Some(voxel)
    }

    fn voxel_mut(&mut self, id: VoxelId) -> Option<&mut Voxel> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    // --- Substances ---

    /// Adds a substance with no members.
    pub fn add_substance(&mut self, name: impl Into<String>, flags: SubstanceFlags) -> SubstanceId {
        self.substances.push(Some(Substance::new(name, flags)));
        SubstanceId(self.substances.len() as u32 - 1)
    }

    pub fn substance(&self, id: SubstanceId) -> Option<&Substance> {
        self.substances.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn substances(&self) -> impl Iterator<Item = (SubstanceId, &Substance)> {
        self.substances
            .iter()
            .enumerate()
            .filter_map(|(ix, s)| s.as_ref().map(|s| (SubstanceId(ix as u32), s)))
    }

    /// Substance of a voxel, if it has one.
    pub fn substance_of(&self, voxel: VoxelId) -> Option<&Substance> {
        self.voxel(voxel)
            .and_then(Voxel::substance)
            .and_then(|s| self.substance(s))
    }

    /// Moves `voxel` into `substance` (or out of any). This is the only place membership changes.
    ///
    /// Returns `false` when the voxel or the target substance does not exist, or nothing changed.
    pub fn set_substance(&mut self, voxel: VoxelId, substance: Option<SubstanceId>) -> bool {
        if let Some(s) = substance {
            if self.substance(s).is_none() {
                log::warn!(target: "voxel", "set_substance: no substance {:?}", s);
                return false;
            }
        }
        let Some(v) = self.voxel_mut(voxel) else {
            return false;
        };
        let old = v.substance;
        if old == substance {
            return false;
        }
        v.substance = substance;
        v.substance_debug = substance.map_or(0, |s| u64::from(s.0) + 1);

        if let Some(Some(s)) = old.and_then(|o| self.substances.get_mut(o.0 as usize)) {
            s.voxels.remove(&voxel);
        }
        if let Some(Some(s)) = substance.and_then(|n| self.substances.get_mut(n.0 as usize)) {
            s.voxels.insert(voxel);
        }
        self.mark_dirty(voxel);
        true
    }

    /// Edits a substance's flags; members are marked dirty when they changed.
    pub fn update_substance(&mut self, id: SubstanceId, f: impl FnOnce(&mut SubstanceFlags)) -> bool {
        let Some(Some(s)) = self.substances.get_mut(id.0 as usize) else {
            return false;
        };
        let before = s.flags;
        f(&mut s.flags);
        if s.flags == before {
            return false;
        }
        let members: Vec<VoxelId> = s.voxels.iter().copied().collect();
        for v in members {
            self.mark_dirty(v);
        }
        true
    }

    /// Detaches every member, then drops the substance. Its id is not reused.
    pub fn remove_substance(&mut self, id: SubstanceId) -> Option<Substance> {
        let members: Vec<VoxelId> = self.substance(id)?.voxels.iter().copied().collect();
        for v in members {
            self.set_substance(v, None);
        }
        self.substances.get_mut(id.0 as usize)?.take()
    }

    // --- Selection ---

    /// Drops transient selection everywhere. Returns how many voxels changed.
    pub fn clear_selection(&mut self) -> usize {
        self.update_all_faces(|face| face.add_selected = false)
    }

    /// Turns transient selection into stored selection.
    pub fn store_selection(&mut self) -> usize {
        self.update_all_faces(|face| {
            if face.add_selected {
                face.add_selected = false;
                face.stored_selected = true;
            }
        })
    }

    pub fn clear_stored_selection(&mut self) -> usize {
        self.update_all_faces(|face| face.stored_selected = false)
    }

    fn update_all_faces(&mut self, f: impl Fn(&mut VoxelFace)) -> usize {
        let ids = self.ids();
        ids.into_iter()
            .filter(|&id| self.update_faces(id, |faces| faces.iter_mut().for_each(&f)))
            .count()
    }

    // --- Change tracking ---

    /// Bumps the voxel's revision. Returns the new stamp.
    pub fn mark_dirty(&mut self, id: VoxelId) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.rev.insert(id, self.counter);
        self.counter
    }

    pub fn get_rev(&self, id: VoxelId) -> u64 {
        self.rev.get(&id).copied().unwrap_or(0)
    }

    pub fn get_built_rev(&self, id: VoxelId) -> u64 {
        self.built.get(&id).copied().unwrap_or(0)
    }

    pub fn mark_built(&mut self, id: VoxelId, rev: u64) {
        // Only update if this is a newer revision
        let e = self.built.entry(id).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn needs_rebuild(&self, id: VoxelId) -> bool {
        self.get_rev(id) > self.get_built_rev(id)
    }

    /// Dirty voxels in id order.
    pub fn dirty_voxels(&self) -> Vec<VoxelId> {
        let mut out: Vec<VoxelId> = self
            .rev
            .keys()
            .copied()
            .filter(|&id| self.needs_rebuild(id))
            .collect();
        out.sort();
        out
    }

    pub fn render(&self, id: VoxelId, ctx: &RenderContext) -> Option<VoxelRender> {
        let voxel = self.voxel(id)?;
        Some(update_voxel(voxel, self.substance_of(id), ctx))
    }
}
