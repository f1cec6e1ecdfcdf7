use std::collections::BTreeSet;

use crate::voxel::VoxelId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubstanceId(pub u32);

/// Physics and editor flags shared by every voxel of a substance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubstanceFlags {
    pub solid: bool,
    pub visible: bool,
    /// Editor-only transparency.
    pub x_ray: bool,
}

impl Default for SubstanceFlags {
    fn default() -> Self {
        Self {
            solid: true,
            visible: true,
            x_ray: false,
        }
    }
}

/// A named group of voxels. Membership is owned here and only changed by
/// [`VoxelArray::set_substance`](crate::VoxelArray::set_substance).
#[derive(Clone, Debug, Default)]
pub struct Substance {
    pub name: String,
    pub flags: SubstanceFlags,
    pub(crate) voxels: BTreeSet<VoxelId>,
}

impl Substance {
    pub fn new(name: impl Into<String>, flags: SubstanceFlags) -> Self {
        Self {
            name: name.into(),
            flags,
            voxels: BTreeSet::new(),
        }
    }

    pub fn voxels(&self) -> &BTreeSet<VoxelId> {
        &self.voxels
    }

    pub fn contains(&self, voxel: VoxelId) -> bool {
        self.voxels.contains(&voxel)
    }
}
