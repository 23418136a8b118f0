// collision_map.rs — In-memory level geometry answering surface queries
//
// Floors and ceilings are flat axis-aligned patches; walls are vertical
// segments. The patch normal is carried for slope classification only and
// does not tilt the patch height.

use crate::shared::Vec3;
use crate::surface::{
    Surface, SurfaceQuery, SurfaceType, WallCollisionData, CEIL_HEIGHT_LIMIT, FLOOR_LOWER_LIMIT,
    SURFACE_SNAP_OFFSET,
};

#[derive(Clone, Copy, Debug)]
pub struct Patch {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
    pub height: f32,
    pub surface: Surface,
}

impl Patch {
    fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WallSegment {
    start: [f32; 2],
    dir: [f32; 2],
    length: f32,
    origin_offset: f32,
    surface: Surface,
}

impl WallSegment {
    /// Vertical wall from `start` to `end` (x, z). The wall faces along
    /// `(dz, -dx)`, so a segment running towards +z faces +x.
    pub fn new(start: [f32; 2], end: [f32; 2], lower_y: f32, upper_y: f32, surface_type: SurfaceType) -> Self {
        let dx = end[0] - start[0];
        let dz = end[1] - start[1];
        let length = (dx * dx + dz * dz).sqrt();
        let dir = if length > 0.0 { [dx / length, dz / length] } else { [0.0, 0.0] };
        let normal: Vec3 = [dir[1], 0.0, -dir[0]];
        let origin_offset = -(normal[0] * start[0] + normal[2] * start[1]);
        let surface = Surface {
            surface_type,
            normal,
            lower_y,
            upper_y,
            ..Default::default()
        };
        Self { start, dir, length, origin_offset, surface }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[derive(Clone, Copy, Debug)]
struct WaterBox {
    min_x: f32,
    max_x: f32,
    min_z: f32,
    max_z: f32,
    height: f32,
}

/// A small static level built from patches, walls, and water boxes.
#[derive(Clone, Debug, Default)]
pub struct CollisionMap {
    floors: Vec<Patch>,
    ceilings: Vec<Patch>,
    walls: Vec<WallSegment>,
    water: Vec<WaterBox>,
}

const UNBOUNDED: f32 = 1.0e6;

impl CollisionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single unbounded flat floor.
    pub fn flat(height: f32, surface_type: SurfaceType) -> Self {
        Self::new().with_floor_patch(-UNBOUNDED, UNBOUNDED, -UNBOUNDED, UNBOUNDED, height, Surface::new(surface_type, [0.0, 1.0, 0.0]))
    }

    pub fn with_floor_patch(mut self, min_x: f32, max_x: f32, min_z: f32, max_z: f32, height: f32, surface: Surface) -> Self {
        self.floors.push(Patch { min_x, max_x, min_z, max_z, height, surface });
        self
    }

    pub fn with_ceiling_patch(mut self, min_x: f32, max_x: f32, min_z: f32, max_z: f32, height: f32, surface: Surface) -> Self {
        let mut surface = surface;
        surface.normal = [0.0, -1.0, 0.0];
        self.ceilings.push(Patch { min_x, max_x, min_z, max_z, height, surface });
        self
    }

    /// An unbounded ceiling.
    pub fn with_ceiling(self, height: f32, surface_type: SurfaceType) -> Self {
        self.with_ceiling_patch(-UNBOUNDED, UNBOUNDED, -UNBOUNDED, UNBOUNDED, height, Surface::new(surface_type, [0.0, -1.0, 0.0]))
    }

    pub fn with_wall(mut self, wall: WallSegment) -> Self {
        self.walls.push(wall);
        self
    }

    pub fn with_water(mut self, min_x: f32, max_x: f32, min_z: f32, max_z: f32, height: f32) -> Self {
        self.water.push(WaterBox { min_x, max_x, min_z, max_z, height });
        self
    }

    pub fn floors(&self) -> &[Patch] {
        &self.floors
    }

    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }
}

impl SurfaceQuery for CollisionMap {
    fn find_floor(&self, x: f32, y: f32, z: f32) -> (f32, Option<Surface>) {
        let mut best: Option<&Patch> = None;
        for patch in &self.floors {
            if !patch.contains(x, z) || patch.height > y + SURFACE_SNAP_OFFSET {
                continue;
            }
            if best.map_or(true, |b| patch.height > b.height) {
                best = Some(patch);
            }
        }
        match best {
            Some(p) => {
                let mut surface = p.surface;
                surface.lower_y = p.height;
                surface.upper_y = p.height;
                (p.height, Some(surface))
            }
            None => (FLOOR_LOWER_LIMIT, None),
        }
    }

    fn find_ceil(&self, x: f32, y: f32, z: f32) -> (f32, Option<Surface>) {
        let mut best: Option<&Patch> = None;
        for patch in &self.ceilings {
            if !patch.contains(x, z) || patch.height < y - SURFACE_SNAP_OFFSET {
                continue;
            }
            if best.map_or(true, |b| patch.height < b.height) {
                best = Some(patch);
            }
        }
        match best {
            Some(p) => (p.height, Some(p.surface)),
            None => (CEIL_HEIGHT_LIMIT, None),
        }
    }

    fn find_water_level(&self, x: f32, z: f32) -> f32 {
        self.water
            .iter()
            .filter(|w| x >= w.min_x && x <= w.max_x && z >= w.min_z && z <= w.max_z)
            .map(|w| w.height)
            .fold(FLOOR_LOWER_LIMIT, f32::max)
    }

    fn resolve_wall_collisions(&self, pos: &mut Vec3, offset_y: f32, radius: f32) -> WallCollisionData {
        let mut data = WallCollisionData::new();
        let y = pos[1] + offset_y;

        for wall in &self.walls {
            let s = &wall.surface;
            if y < s.lower_y || y > s.upper_y {
                continue;
            }

            let offset = s.normal[0] * pos[0] + s.normal[2] * pos[2] + wall.origin_offset;
            if offset < -radius || offset > radius {
                continue;
            }

            let along = (pos[0] - wall.start[0]) * wall.dir[0] + (pos[2] - wall.start[1]) * wall.dir[1];
            if along < 0.0 || along > wall.length {
                continue;
            }

            pos[0] += s.normal[0] * (radius - offset);
            pos[2] += s.normal[2] * (radius - offset);
            data.push(*s);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_floor_lookup() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default);
        let (h, floor) = map.find_floor(10.0, 50.0, -20.0);
        assert_eq!(h, 0.0);
        assert!(floor.is_some());
    }

    #[test]
    fn test_floor_snap_tolerance() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default)
            .with_floor_patch(0.0, 100.0, 0.0, 100.0, 70.0, Surface::default());
        assert_eq!(map.find_floor(50.0, 0.0, 50.0).0, 70.0);
        assert_eq!(map.find_floor(50.0, -10.0, 50.0).0, 0.0);
    }

    #[test]
    fn test_missing_geometry_limits() {
        let map = CollisionMap::new();
        assert_eq!(map.find_floor(0.0, 0.0, 0.0), (FLOOR_LOWER_LIMIT, None));
        assert_eq!(map.find_ceil(0.0, 0.0, 0.0).0, CEIL_HEIGHT_LIMIT);
        assert_eq!(map.find_water_level(0.0, 0.0), FLOOR_LOWER_LIMIT);
    }

    #[test]
    fn test_ceiling_picks_lowest_above() {
        let map = CollisionMap::new()
            .with_ceiling(400.0, SurfaceType::Default)
            .with_ceiling(300.0, SurfaceType::Hangable);
        let (h, ceil) = map.find_ceil(0.0, 100.0, 0.0);
        assert_eq!(h, 300.0);
        assert_eq!(ceil.map(|c| c.surface_type), Some(SurfaceType::Hangable));
    }

    #[test]
    fn test_wall_pushes_out_to_radius() {
        // Runs towards -z, so it faces -x.
        let wall = WallSegment::new([100.0, 100.0], [100.0, -100.0], 0.0, 200.0, SurfaceType::Default);
        let map = CollisionMap::new().with_wall(wall);
        let mut pos = [80.0, 0.0, 0.0];
        let data = map.resolve_wall_collisions(&mut pos, 30.0, 50.0);
        assert_eq!(data.len(), 1);
        assert!((pos[0] - 50.0).abs() < 1e-4);
        assert!((data.walls()[0].normal[0] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wall_ignored_outside_vertical_span() {
        let wall = WallSegment::new([100.0, 100.0], [100.0, -100.0], 0.0, 100.0, SurfaceType::Default);
        let map = CollisionMap::new().with_wall(wall);
        let mut pos = [80.0, 0.0, 0.0];
        assert!(map.resolve_wall_collisions(&mut pos, 150.0, 50.0).is_empty());
        assert_eq!(pos[0], 80.0);
    }

    #[test]
    fn test_water_level() {
        let map = CollisionMap::new().with_water(-50.0, 50.0, -50.0, 50.0, -300.0);
        assert_eq!(map.find_water_level(0.0, 0.0), -300.0);
        assert_eq!(map.find_water_level(100.0, 0.0), FLOOR_LOWER_LIMIT);
    }
}
