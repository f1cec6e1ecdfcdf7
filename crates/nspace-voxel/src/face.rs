use nspace_geom::Vec3;

use crate::material::MaterialId;

/// The six faces of a voxel, in storage order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum FaceDir {
    NegX = 0,
    PosX = 1,
    NegY = 2,
    PosY = 3,
    NegZ = 4,
    PosZ = 5,
}

impl FaceDir {
    pub const ALL: [FaceDir; 6] = [
        FaceDir::NegX,
        FaceDir::PosX,
        FaceDir::NegY,
        FaceDir::PosY,
        FaceDir::NegZ,
        FaceDir::PosZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index back into a `FaceDir`, or `None` when out of range.
    #[inline]
    pub fn from_index(i: usize) -> Option<FaceDir> {
        Self::ALL.get(i).copied()
    }

    /// 0 = x, 1 = y, 2 = z.
    #[inline]
    pub fn axis(self) -> usize {
        self.index() / 2
    }

    /// Odd faces point along the positive axis.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.index() % 2 == 1
    }

    /// Returns the outward unit vector for this face.
    #[inline]
    pub fn direction(self) -> Vec3 {
        match self {
            FaceDir::NegX => Vec3::LEFT,
            FaceDir::PosX => Vec3::RIGHT,
            FaceDir::NegY => Vec3::DOWN,
            FaceDir::PosY => Vec3::UP,
            FaceDir::NegZ => Vec3::BACK,
            FaceDir::PosZ => Vec3::FORWARD,
        }
    }

    pub fn from_direction(direction: Vec3) -> Option<FaceDir> {
        Self::ALL.into_iter().find(|f| f.direction() == direction)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        let d = self.direction();
        (d.x as i32, d.y as i32, d.z as i32)
    }

    #[inline]
    pub fn opposite(self) -> FaceDir {
        let i = self.index();
        let o = (i / 2) * 2 + if i % 2 == 0 { 1 } else { 0 };
        Self::ALL[o]
    }

    /// The `side`-th face perpendicular to this one; `side` wraps mod 4.
    #[inline]
    pub fn side(self, side: i32) -> FaceDir {
        let side = side.rem_euclid(4) as usize;
        Self::ALL[(self.axis() * 2 + 2 + side) % 6]
    }
}

/// One face of a voxel: base material, overlay, texture orientation and selection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoxelFace {
    pub material: Option<MaterialId>,
    pub overlay: Option<MaterialId>,
    /// Bits 0–1 rotation step, bit 2 mirror.
    pub orientation: u8,
    /// Transient selection (current drag / click).
    pub add_selected: bool,
    /// Selection that persists with the level.
    pub stored_selected: bool,
}

impl VoxelFace {
    pub const EMPTY: VoxelFace = VoxelFace {
        material: None,
        overlay: None,
        orientation: 0,
        add_selected: false,
        stored_selected: false,
    };

    pub fn with_material(material: MaterialId) -> Self {
        Self {
            material: Some(material),
            ..Self::EMPTY
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.material.is_none() && self.overlay.is_none()
    }

    /// Empty faces are never selected, whatever their flags say.
    #[inline]
    pub fn selected(&self) -> bool {
        !self.is_empty() && (self.add_selected || self.stored_selected)
    }

    pub fn clear(&mut self) {
        *self = Self::EMPTY;
    }

    #[inline]
    pub fn rotation(&self) -> u8 {
        Self::orientation_rotation(self.orientation)
    }

    #[inline]
    pub fn mirror(&self) -> bool {
        Self::orientation_mirror(self.orientation)
    }

    #[inline]
    pub fn orientation_rotation(orientation: u8) -> u8 {
        orientation & 3
    }

    #[inline]
    pub fn orientation_mirror(orientation: u8) -> bool {
        orientation & 4 != 0
    }

    /// Packs a rotation (any integer, taken mod 4) and mirror flag.
    #[inline]
    pub fn orientation(rotation: i32, mirror: bool) -> u8 {
        rotation.rem_euclid(4) as u8 + if mirror { 4 } else { 0 }
    }
}
