// surface.rs — Level surfaces and the collision query interface

use crate::shared::{atan2s, Angle, Vec3};

/// Height reported when no floor exists below a point.
pub const FLOOR_LOWER_LIMIT: f32 = -11000.0;

/// Height reported when no ceiling exists above a point.
pub const CEIL_HEIGHT_LIMIT: f32 = 20000.0;

/// Vertical tolerance used by floor and ceiling lookups.
pub const SURFACE_SNAP_OFFSET: f32 = 78.0;

pub const MAX_REFERENCED_WALLS: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    #[default]
    Default,
    Burning,
    Hangable,
    Slippery,
    VerySlippery,
    NotSlippery,
    Ice,
    Hard,
    HardSlippery,
    HardVerySlippery,
    HardNotSlippery,
    NoiseSlippery,
    NoiseVerySlippery,
    Switch,
    ShallowQuicksand,
    ShallowMovingQuicksand,
    Quicksand,
    MovingQuicksand,
    DeepQuicksand,
    DeepMovingQuicksand,
    InstantQuicksand,
    InstantMovingQuicksand,
    HorizontalWind,
    VerticalWind,
}

/// Slipperiness class of a floor, ordered from least to most slippery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FloorClass {
    NotSlippery,
    Default,
    Slippery,
    VerySlippery,
}

impl SurfaceType {
    pub fn floor_class(self) -> FloorClass {
        match self {
            SurfaceType::NotSlippery | SurfaceType::HardNotSlippery | SurfaceType::Switch => {
                FloorClass::NotSlippery
            }
            SurfaceType::Slippery | SurfaceType::NoiseSlippery | SurfaceType::HardSlippery => {
                FloorClass::Slippery
            }
            SurfaceType::VerySlippery
            | SurfaceType::Ice
            | SurfaceType::HardVerySlippery
            | SurfaceType::NoiseVerySlippery => FloorClass::VerySlippery,
            _ => FloorClass::Default,
        }
    }

    pub fn is_hard(self) -> bool {
        matches!(
            self,
            SurfaceType::Hard
                | SurfaceType::HardSlippery
                | SurfaceType::HardVerySlippery
                | SurfaceType::HardNotSlippery
        )
    }

    pub fn is_quicksand(self) -> bool {
        matches!(
            self,
            SurfaceType::ShallowQuicksand
                | SurfaceType::ShallowMovingQuicksand
                | SurfaceType::Quicksand
                | SurfaceType::MovingQuicksand
                | SurfaceType::DeepQuicksand
                | SurfaceType::DeepMovingQuicksand
                | SurfaceType::InstantQuicksand
                | SurfaceType::InstantMovingQuicksand
        )
    }

    /// Quicksand variants that also push the actor along the surface.
    pub fn is_moving_sand(self) -> bool {
        matches!(
            self,
            SurfaceType::ShallowMovingQuicksand
                | SurfaceType::MovingQuicksand
                | SurfaceType::DeepMovingQuicksand
                | SurfaceType::InstantMovingQuicksand
        )
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SurfaceFlags: u8 {
        /// Belongs to a moving object rather than static level geometry.
        const DYNAMIC          = 0x01;
        const NO_CAM_COLLISION = 0x02;
    }
}

/// A level polygon as seen by the physics: type, push force, and plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub surface_type: SurfaceType,
    pub flags: SurfaceFlags,
    /// Packed push parameter. The high byte selects a speed bucket for moving
    /// quicksand; shifted left by 8 it is the push direction for wind.
    pub force: i16,
    pub normal: Vec3,
    pub lower_y: f32,
    pub upper_y: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            surface_type: SurfaceType::Default,
            flags: SurfaceFlags::empty(),
            force: 0,
            normal: [0.0, 1.0, 0.0],
            lower_y: 0.0,
            upper_y: 0.0,
        }
    }
}

impl Surface {
    pub fn new(surface_type: SurfaceType, normal: Vec3) -> Self {
        Self {
            surface_type,
            normal,
            ..Default::default()
        }
    }

    pub fn with_force(mut self, force: i16) -> Self {
        self.force = force;
        self
    }

    pub fn with_flags(mut self, flags: SurfaceFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Direction the surface pushes along, for wind and moving sand.
    pub fn push_angle(&self) -> Angle {
        ((self.force as i32) << 8) as Angle
    }

    /// Yaw of the surface normal projected onto the horizontal plane.
    pub fn normal_yaw(&self) -> Angle {
        atan2s(self.normal[2], self.normal[0])
    }

    pub fn is_dynamic(&self) -> bool {
        self.flags.contains(SurfaceFlags::DYNAMIC)
    }
}

/// Flat very-slippery floor standing in for a water surface while an actor
/// rides a shell across it.
pub fn water_pseudo_floor(water_level: f32) -> Surface {
    Surface {
        surface_type: SurfaceType::VerySlippery,
        lower_y: water_level,
        upper_y: water_level,
        ..Default::default()
    }
}

// ============================================================
// Wall collision results
// ============================================================

/// Walls touched while resolving a probe sphere, in discovery order.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallCollisionData {
    walls: [Surface; MAX_REFERENCED_WALLS],
    num_walls: usize,
}

impl WallCollisionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a wall. Walls past the reference limit are pushed out of but
    /// not remembered.
    pub fn push(&mut self, wall: Surface) {
        if self.num_walls < MAX_REFERENCED_WALLS {
            self.walls[self.num_walls] = wall;
            self.num_walls += 1;
        }
    }

    pub fn walls(&self) -> &[Surface] {
        &self.walls[..self.num_walls]
    }

    pub fn is_empty(&self) -> bool {
        self.num_walls == 0
    }

    pub fn len(&self) -> usize {
        self.num_walls
    }

    pub fn last(&self) -> Option<&Surface> {
        self.walls().last()
    }
}

// ============================================================
// Collision query interface
// ============================================================

/// Read-only spatial queries against level geometry.
///
/// Implementations must be pure with respect to the queried point: the same
/// arguments always produce the same answer within a tick.
pub trait SurfaceQuery {
    /// Highest floor at or just above `y`. Returns `FLOOR_LOWER_LIMIT` and
    /// `None` when nothing is below.
    fn find_floor(&self, x: f32, y: f32, z: f32) -> (f32, Option<Surface>);

    /// Lowest ceiling at or just below `y`. Returns `CEIL_HEIGHT_LIMIT` and
    /// `None` when nothing is above.
    fn find_ceil(&self, x: f32, y: f32, z: f32) -> (f32, Option<Surface>);

    /// Water surface height at a column, or `FLOOR_LOWER_LIMIT` if dry.
    fn find_water_level(&self, x: f32, z: f32) -> f32;

    /// Pushes a sphere of `radius`, centered `offset_y` above `pos`, out of
    /// every wall it overlaps and reports the walls touched.
    fn resolve_wall_collisions(&self, pos: &mut Vec3, offset_y: f32, radius: f32)
        -> WallCollisionData;
}
