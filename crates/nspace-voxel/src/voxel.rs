use nspace_geom::{Aabb, Vec3};

use crate::face::{FaceDir, VoxelFace};
use crate::substance::SubstanceId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelId(pub u32);

/// One grid cell. Faces are indexed by [`FaceDir`].
#[derive(Clone, Debug)]
pub struct Voxel {
    pub position: (i32, i32, i32),
    pub faces: [VoxelFace; 6],
    pub(crate) substance: Option<SubstanceId>,
    pub(crate) substance_debug: u64,
}

impl Voxel {
    pub fn new(position: (i32, i32, i32)) -> Self {
        Self {
            position,
            faces: [VoxelFace::EMPTY; 6],
            substance: None,
            substance_debug: 0,
        }
    }

    #[inline]
    pub fn face(&self, dir: FaceDir) -> &VoxelFace {
        &self.faces[dir.index()]
    }

    #[inline]
    pub fn substance(&self) -> Option<SubstanceId> {
        self.substance
    }

    /// Non-zero tag of the current substance, 0 when there is none.
    #[inline]
    pub fn substance_debug(&self) -> u64 {
        self.substance_debug
    }

    #[inline]
    pub fn world_position(&self) -> Vec3 {
        Vec3::from_grid(self.position)
    }

    /// Empty only with all six faces empty and no substance.
    pub fn is_empty(&self) -> bool {
        self.substance.is_none() && self.faces.iter().all(VoxelFace::is_empty)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.world_position() + Vec3::new(0.5, 0.5, 0.5), Vec3::ONE)
    }

    /// Zero-thickness world-space box covering one face.
    pub fn face_bounds(&self, dir: FaceDir) -> Aabb {
        let axis = dir.axis();
        let mut center = [0.5f32; 3];
        let mut size = [1.0f32; 3];
        center[axis] = if dir.is_positive() { 1.0 } else { 0.0 };
        size[axis] = 0.0;
        Aabb::from_center_size(
            Vec3::new(center[0], center[1], center[2]),
            Vec3::new(size[0], size[1], size[2]),
        )
        .translated(self.world_position())
    }
}
