// step.rs — Collision stepper: quarter-step movement, gravity, and floor effects

use hopcore_common::cvar::{BouncyBounds, PhysicsSettings};
use hopcore_common::shared::{
    coss, dot_product, sins, vector_is_finite, vector_normalize, Angle, Vec3, ANGLE_HALF,
};
use hopcore_common::surface::{water_pseudo_floor, FloorClass, Surface, SurfaceType, WallCollisionData};
use tracing::warn;

use crate::actions::{Action, ActionFlags};
use crate::actor::{ActorFlags, ActorState, InputFlags};
use crate::env::Env;
use crate::fx::TerrainSound;
use crate::hooks::HazardType;
use crate::interaction::restore_default_camera;
use crate::movement::set_forward_vel;
use crate::transition::{drop_and_set_action, set_action};

/// Outcome of one air step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirStep {
    None,
    Landed,
    HitWall,
    GrabbedLedge,
    GrabbedCeiling,
    HitLavaWall,
}

/// Outcome of one ground step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundStep {
    None,
    LeftGround,
    HitWall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GroundQuarterStep {
    None,
    LeftGround,
    HitWallStop,
    HitWallContinue,
}

bitflags::bitflags! {
    /// Optional detections an air step performs.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct AirStepCheck: u32 {
        const LEDGE_GRAB = 0x1;
        const HANG       = 0x2;
    }
}

/// Push speed of moving quicksand, indexed by the high byte of the force.
const MOVING_SAND_SPEEDS: [f32; 4] = [12.0, 8.0, 4.0, 0.0];

/// Ledge floors flatter than ~25 degrees from level count as real ledges.
const LEDGE_MIN_NORMAL_Y: f32 = 0.906_307_8;

const BOUNCY_BOUNDS_CAP: f32 = 500.0;

// ============================================================
// Shared probes
// ============================================================

/// Ceiling above `pos`, probed from just above the floor so that a ceiling
/// the actor has already clipped into is still found.
pub(crate) fn find_actor_ceil(env: &Env<'_>, pos: &Vec3, floor_height: f32) -> (f32, Option<Surface>) {
    let probe_y = if env.settings.fix_collision_bugs {
        (floor_height + 80.0).max(pos[1] - 2.0)
    } else {
        floor_height + 80.0
    };
    env.surfaces.find_ceil(pos[0], probe_y, pos[2])
}

fn adopt_floor(m: &mut ActorState, floor: Surface, floor_height: f32) {
    m.floor = Some(floor);
    m.floor_height = floor_height;
    m.floor_angle = floor.normal_yaw();
}

fn rides_over_water(m: &ActorState, env: &Env<'_>, floor_height: f32, water_level: f32) -> bool {
    m.action.flags().contains(ActionFlags::RIDING_SHELL)
        && floor_height < water_level
        && env.hooks.allow_force_water_action(m, false)
}

/// Walls a sub-step reacts to: every touched wall with the collision fixes
/// on, otherwise only the last one found.
fn wall_candidates(wcd: &WallCollisionData, fix_collision_bugs: bool) -> &[Surface] {
    let walls = wcd.walls();
    if fix_collision_bugs || walls.is_empty() {
        walls
    } else {
        &walls[walls.len() - 1..]
    }
}

/// Picks the wall the actor references after a sub-step.
///
/// The legacy policy keeps the last wall found. The fixed policy keeps the
/// wall whose normal points most directly against the facing direction.
pub fn update_wall(m: &mut ActorState, settings: &PhysicsSettings, wcd: &WallCollisionData) {
    if !settings.fix_collision_bugs {
        m.wall = wcd.last().copied();
        return;
    }

    let mut facing: Vec3 = [
        coss(m.face_angle[0]) * sins(m.face_angle[1]),
        sins(m.face_angle[0]),
        coss(m.face_angle[0]) * coss(m.face_angle[1]),
    ];
    vector_normalize(&mut facing);

    m.wall = None;
    for wall in wcd.walls() {
        match m.wall {
            None => m.wall = Some(*wall),
            Some(current) => {
                if dot_product(&current.normal, &facing) > dot_product(&wall.normal, &facing) {
                    m.wall = Some(*wall);
                }
            }
        }
    }
}

fn collide_level_bounds(m: &mut ActorState, env: &Env<'_>) {
    match env.settings.bouncy_bounds {
        BouncyBounds::Off => {}
        BouncyBounds::On => {
            m.face_angle[1] = m.face_angle[1].wrapping_add(ANGLE_HALF);
            set_forward_vel(m, 1.5 * m.forward_vel);
        }
        BouncyBounds::OnCapped => {
            m.face_angle[1] = m.face_angle[1].wrapping_add(ANGLE_HALF);
            let forward_vel = (1.5 * m.forward_vel).clamp(-BOUNCY_BOUNDS_CAP, BOUNCY_BOUNDS_CAP);
            set_forward_vel(m, forward_vel);
        }
    }
    env.hooks.on_collide_level_bounds(m);
}

/// Terrain sound for the current floor and water state.
pub fn terrain_sound_for(m: &ActorState) -> TerrainSound {
    let Some(floor) = m.floor else {
        return TerrainSound::Default;
    };

    if m.floor_height < m.water_level - 10.0 {
        return TerrainSound::Water;
    }
    if floor.surface_type.is_quicksand() {
        return TerrainSound::Sand;
    }
    if floor.surface_type.is_hard() {
        return TerrainSound::Stone;
    }
    if floor.surface_type.floor_class() == FloorClass::VerySlippery {
        return TerrainSound::Ice;
    }
    TerrainSound::for_terrain(m.terrain)
}

/// Zeroes any non-finite velocity component so a bad step cannot poison
/// later ticks.
fn sanitize_velocity(m: &mut ActorState) {
    if vector_is_finite(&m.vel) && m.forward_vel.is_finite() {
        return;
    }

    warn!(
        slot = m.slot,
        action = ?m.action,
        vel = ?m.vel,
        forward_vel = m.forward_vel,
        "non-finite velocity after step, zeroing"
    );
    for v in m.vel.iter_mut() {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
    if !m.forward_vel.is_finite() {
        m.forward_vel = 0.0;
    }
}

fn commit_gfx(m: &mut ActorState) {
    m.gfx.pos = m.pos;
    m.gfx.angle = [0, m.face_angle[1], 0];
}

/// Re-reads floor, ceiling, and water at the current position ahead of a
/// tick. A missing floor keeps the last one known.
pub fn refresh_geometry(m: &mut ActorState, env: &Env<'_>) {
    let (floor_height, floor) = env.surfaces.find_floor(m.pos[0], m.pos[1], m.pos[2]);
    if let Some(floor) = floor {
        adopt_floor(m, floor, floor_height);
    }

    let (ceil_height, ceil) = find_actor_ceil(env, &m.pos, m.floor_height);
    m.ceil = ceil;
    m.ceil_height = ceil_height;
    m.water_level = env.surfaces.find_water_level(m.pos[0], m.pos[2]);

    let off_floor = m.pos[1] > m.floor_height + 100.0;
    m.input.buttons.set(InputFlags::OFF_FLOOR, off_floor);
    let in_water = m.pos[1] < m.water_level - 10.0;
    m.input.buttons.set(InputFlags::IN_WATER, in_water);
}

// ============================================================
// Air stepping
// ============================================================

fn check_ledge_grab(m: &mut ActorState, env: &Env<'_>, wall: &Surface, intended: &Vec3, next: &Vec3) -> bool {
    if m.vel[1] > 0.0 {
        return false;
    }

    // The wall must have pushed the actor back against its motion.
    let displacement_x = next[0] - intended[0];
    let displacement_z = next[2] - intended[2];
    if m.vel[0] * displacement_x + m.vel[2] * displacement_z > 0.0 {
        return false;
    }

    let ledge_x = next[0] - wall.normal[0] * 60.0;
    let ledge_z = next[2] - wall.normal[2] * 60.0;
    let (ledge_y, ledge_floor) = env.surfaces.find_floor(ledge_x, next[1] + m.hitbox_height, ledge_z);
    let Some(ledge_floor) = ledge_floor else {
        return false;
    };

    let settings = env.settings;
    if settings.fix_collision_bugs && settings.fix_false_ledge_grab && ledge_floor.normal[1] < LEDGE_MIN_NORMAL_Y {
        return false;
    }

    if ledge_y - next[1] <= 100.0 {
        return false;
    }

    m.pos = [ledge_x, ledge_y, ledge_z];
    adopt_floor(m, ledge_floor, ledge_y);
    m.face_angle[0] = 0;
    m.face_angle[1] = wall.normal_yaw().wrapping_add(ANGLE_HALF);
    true
}

fn perform_air_quarter_step(
    m: &mut ActorState,
    env: &Env<'_>,
    intended: Vec3,
    check: AirStepCheck,
    start_ceil: Option<Surface>,
) -> AirStep {
    let mut next = intended;
    let upper = env.surfaces.resolve_wall_collisions(&mut next, 150.0, 50.0);
    let lower = env.surfaces.resolve_wall_collisions(&mut next, 30.0, 50.0);

    let (mut floor_height, floor) = env.surfaces.find_floor(next[0], next[1], next[2]);
    let (ceil_height, ceil) = find_actor_ceil(env, &next, floor_height);
    let water_level = env.surfaces.find_water_level(next[0], next[2]);

    m.ceil = ceil;
    m.ceil_height = ceil_height;
    m.water_level = water_level;
    m.wall = None;

    let Some(mut floor) = floor else {
        // Out of bounds: fall back to the last known floor height.
        if next[1] <= m.floor_height {
            m.pos[1] = m.floor_height;
            return AirStep::Landed;
        }

        m.pos[1] = next[1];
        collide_level_bounds(m, env);
        return AirStep::HitWall;
    };

    if rides_over_water(m, env, floor_height, water_level) {
        floor_height = water_level;
        floor = water_pseudo_floor(water_level);
    }

    if next[1] <= floor_height {
        // Horizontal motion is discarded when the gap is too tight to stand in.
        if ceil_height - floor_height > m.hitbox_height {
            m.pos[0] = next[0];
            m.pos[2] = next[2];
            adopt_floor(m, floor, floor_height);
        }

        m.pos[1] = floor_height;
        return AirStep::Landed;
    }

    if next[1] + m.hitbox_height > ceil_height {
        if m.vel[1] >= 0.0 {
            m.vel[1] = 0.0;

            // Hanging reads the ceiling referenced when the step began.
            let hangable = start_ceil.map_or(false, |c| c.surface_type == SurfaceType::Hangable);
            if check.contains(AirStepCheck::HANG) && hangable {
                return AirStep::GrabbedCeiling;
            }
            return AirStep::None;
        }

        if next[1] <= m.floor_height {
            m.pos[1] = m.floor_height;
            return AirStep::Landed;
        }

        m.pos[1] = next[1];
        return AirStep::HitWall;
    }

    let fix = env.settings.fix_collision_bugs;

    if check.contains(AirStepCheck::LEDGE_GRAB) && upper.is_empty() && !lower.is_empty() {
        for wall in wall_candidates(&lower, fix) {
            if check_ledge_grab(m, env, wall, &intended, &next) {
                return AirStep::GrabbedLedge;
            }
        }

        m.pos = next;
        adopt_floor(m, floor, floor_height);
        return AirStep::None;
    }

    m.pos = next;
    adopt_floor(m, floor, floor_height);

    let wcd = if !upper.is_empty() {
        &upper
    } else if !lower.is_empty() {
        &lower
    } else {
        return AirStep::None;
    };

    update_wall(m, env.settings, wcd);

    for wall in wall_candidates(wcd, fix) {
        if wall.surface_type == SurfaceType::Burning {
            m.wall = Some(*wall);
            return AirStep::HitLavaWall;
        }

        // Only walls faced head-on (within ~45 degrees of straight on) stop the actor.
        let wall_dyaw = wall.normal_yaw().wrapping_sub(m.face_angle[1]);
        if wall_dyaw < -0x6000 || wall_dyaw > 0x6000 {
            m.wall = Some(*wall);
            m.flags.insert(ActorFlags::WALL_BONKED);
            return AirStep::HitWall;
        }
    }

    AirStep::None
}

/// Moves an airborne actor by its velocity in four sub-steps, then applies
/// gravity and vertical wind.
///
/// The result is the last non-`None` sub-step outcome. Landing, grabbing,
/// or touching a lava wall ends the step early.
pub fn perform_air_step(m: &mut ActorState, env: &Env<'_>, check: AirStepCheck) -> AirStep {
    if let Some(result) = env.hooks.before_air_step(m, check) {
        return result;
    }

    m.wall = None;
    let start_ceil = m.ceil;

    let mut step_result = AirStep::None;
    for _ in 0..4 {
        let intended = [
            m.pos[0] + m.vel[0] / 4.0,
            m.pos[1] + m.vel[1] / 4.0,
            m.pos[2] + m.vel[2] / 4.0,
        ];

        let quarter = perform_air_quarter_step(m, env, intended, check, start_ceil);
        if quarter != AirStep::None {
            step_result = quarter;
        }

        if matches!(
            quarter,
            AirStep::Landed | AirStep::GrabbedLedge | AirStep::GrabbedCeiling | AirStep::HitLavaWall
        ) {
            break;
        }
    }

    if m.vel[1] >= 0.0 {
        m.peak_height = m.pos[1];
    }

    m.terrain_sound = terrain_sound_for(m);

    if m.action != Action::Flying && m.action != Action::Bubbled {
        apply_gravity(m, env);
    }
    apply_vertical_wind(m, env);

    sanitize_velocity(m);
    commit_gfx(m);

    step_result
}

// ============================================================
// Gravity and vertical wind
// ============================================================

fn apply_twirl_gravity(m: &mut ActorState) {
    let mut heaviness = 1.0;
    if m.angle_vel[1] > 1024 {
        heaviness = 1024.0 / m.angle_vel[1] as f32;
    }

    let terminal_velocity = -75.0 * heaviness;

    m.vel[1] -= 4.0 * heaviness;
    if m.vel[1] < terminal_velocity {
        m.vel[1] = terminal_velocity;
    }
}

fn should_strengthen_gravity_for_jump_ascent(m: &ActorState) -> bool {
    if !m.flags.contains(ActorFlags::JUMP_HELD) {
        return false;
    }

    let flags = m.action.flags();
    if flags.intersects(ActionFlags::INTANGIBLE | ActionFlags::INVULNERABLE) {
        return false;
    }

    if !m.has_input(InputFlags::A_DOWN) && m.vel[1] > 20.0 {
        return flags.contains(ActionFlags::CONTROL_JUMP_HEIGHT);
    }

    false
}

#[inline]
fn fall_with_terminal(m: &mut ActorState, accel: f32, terminal: f32) {
    m.vel[1] -= accel;
    if m.vel[1] < terminal {
        m.vel[1] = terminal;
    }
}

/// Per-action vertical acceleration, each rule clamped once to its own
/// terminal velocity.
pub fn apply_gravity(m: &mut ActorState, env: &Env<'_>) {
    if env.hooks.gravity(m) {
        return;
    }

    match m.action {
        Action::Twirling if m.vel[1] < 0.0 => apply_twirl_gravity(m),
        Action::ShotFromCannon => fall_with_terminal(m, 1.0, -75.0),
        Action::LongJump | Action::SlideKick | Action::BbhEnterSpin => fall_with_terminal(m, 2.0, -75.0),
        Action::LavaBoost | Action::FallAfterStarGrab => fall_with_terminal(m, 3.2, -65.0),
        Action::GettingBlown => {
            let blown_gravity = m.blown_gravity;
            fall_with_terminal(m, blown_gravity, -75.0);
        }
        _ if should_strengthen_gravity_for_jump_ascent(m) => m.vel[1] /= 4.0,
        _ if m.action.flags().contains(ActionFlags::METAL_WATER) => fall_with_terminal(m, 1.6, -16.0),
        _ if m.flags.contains(ActorFlags::WING_CAP) && m.vel[1] < 0.0 && m.has_input(InputFlags::A_DOWN) => {
            m.body.wing_flutter = true;

            m.vel[1] -= 2.0;
            if m.vel[1] < -37.5 {
                m.vel[1] += 4.0;
                if m.vel[1] > -37.5 {
                    m.vel[1] = -37.5;
                }
            }
        }
        _ => fall_with_terminal(m, 4.0, -75.0),
    }
}

/// Lifts an actor standing in a vertical-wind column.
pub fn apply_vertical_wind(m: &mut ActorState, env: &Env<'_>) {
    if m.action == Action::GroundPound {
        return;
    }
    if !env.hooks.allow_hazard_surface(m, HazardType::VerticalWind) {
        return;
    }

    let Some(floor) = m.floor else {
        return;
    };

    let offset_y = m.pos[1] + 1500.0;
    if floor.surface_type == SurfaceType::VerticalWind && -3000.0 < offset_y && offset_y < 2000.0 {
        let max_vel_y = if offset_y >= 0.0 { 10000.0 / (offset_y + 200.0) } else { 50.0 };

        if m.vel[1] < max_vel_y {
            m.vel[1] += max_vel_y / 8.0;
            if m.vel[1] > max_vel_y {
                m.vel[1] = max_vel_y;
            }
        }
    }
}

// ============================================================
// Ground stepping
// ============================================================

fn perform_ground_quarter_step(m: &mut ActorState, env: &Env<'_>, intended: Vec3) -> GroundQuarterStep {
    let mut next = intended;
    env.surfaces.resolve_wall_collisions(&mut next, 30.0, 24.0);
    let upper = env.surfaces.resolve_wall_collisions(&mut next, 60.0, 50.0);

    let (mut floor_height, floor) = env.surfaces.find_floor(next[0], next[1], next[2]);
    let (ceil_height, ceil) = find_actor_ceil(env, &next, floor_height);
    let water_level = env.surfaces.find_water_level(next[0], next[2]);

    m.ceil = ceil;
    m.ceil_height = ceil_height;
    m.water_level = water_level;
    update_wall(m, env.settings, &upper);

    let Some(mut floor) = floor else {
        collide_level_bounds(m, env);
        return GroundQuarterStep::HitWallStop;
    };

    if rides_over_water(m, env, floor_height, water_level) {
        floor_height = water_level;
        floor = water_pseudo_floor(water_level);
    }

    if next[1] > floor_height + 100.0 {
        if next[1] + m.hitbox_height >= ceil_height {
            return GroundQuarterStep::HitWallStop;
        }

        m.pos = next;
        adopt_floor(m, floor, floor_height);
        return GroundQuarterStep::LeftGround;
    }

    if floor_height + m.hitbox_height >= ceil_height {
        return GroundQuarterStep::HitWallStop;
    }

    m.pos = [next[0], floor_height, next[2]];
    adopt_floor(m, floor, floor_height);

    for wall in wall_candidates(&upper, env.settings.fix_collision_bugs) {
        // Walls running alongside the actor are slid along, not bonked.
        let wall_dyaw = wall.normal_yaw().wrapping_sub(m.face_angle[1]);
        if (0x2AAA..=0x5555).contains(&wall_dyaw) || (-0x5555..=-0x2AAA).contains(&wall_dyaw) {
            continue;
        }
        return GroundQuarterStep::HitWallContinue;
    }

    GroundQuarterStep::None
}

/// Moves a grounded actor horizontally in four sub-steps, scaled by the
/// floor's slope. An actor with no floor stays in place.
pub fn perform_ground_step(m: &mut ActorState, env: &Env<'_>) -> GroundStep {
    if let Some(result) = env.hooks.before_ground_step(m) {
        return result;
    }

    let mut step_result = GroundQuarterStep::None;
    for _ in 0..4 {
        // Without a floor the actor does not move; the quarter-step then
        // reports the missing floor as a wall.
        let intended = match m.floor {
            Some(floor) => {
                let slope = env.hooks.ground_step_speed(m).unwrap_or(floor.normal[1]);
                [m.pos[0] + slope * (m.vel[0] / 4.0), m.pos[1], m.pos[2] + slope * (m.vel[2] / 4.0)]
            }
            None => m.pos,
        };

        step_result = perform_ground_quarter_step(m, env, intended);
        if matches!(step_result, GroundQuarterStep::LeftGround | GroundQuarterStep::HitWallStop) {
            break;
        }
    }

    m.terrain_sound = terrain_sound_for(m);
    sanitize_velocity(m);
    commit_gfx(m);

    match step_result {
        GroundQuarterStep::None => GroundStep::None,
        GroundQuarterStep::LeftGround => GroundStep::LeftGround,
        GroundQuarterStep::HitWallStop | GroundQuarterStep::HitWallContinue => GroundStep::HitWall,
    }
}

/// Holds a standing actor on the floor, letting moving sand or wind carry
/// it if present.
pub fn stationary_ground_step(m: &mut ActorState, env: &Env<'_>) -> GroundStep {
    set_forward_vel(m, 0.0);

    let moved_by_sand = update_moving_sand(m);
    let moved_by_wind = update_windy_ground(m, env);

    if moved_by_sand || moved_by_wind {
        return perform_ground_step(m, env);
    }

    m.pos[1] = m.floor_height;
    commit_gfx(m);
    GroundStep::None
}

pub fn stop_and_set_height_to_floor(m: &mut ActorState) {
    set_forward_vel(m, 0.0);
    m.vel[1] = 0.0;
    m.pos[1] = m.floor_height;
    commit_gfx(m);
}

// ============================================================
// Floor effects
// ============================================================

/// Sinks the actor into quicksand by `sinking_speed`. Returns true if the
/// actor was swallowed and transitioned to the death action.
pub fn update_quicksand(m: &mut ActorState, env: &mut Env<'_>, sinking_speed: f32) -> bool {
    if m.action.flags().contains(ActionFlags::RIDING_SHELL)
        || !env.hooks.allow_hazard_surface(m, HazardType::Quicksand)
    {
        m.quicksand_depth = 0.0;
        return false;
    }

    if m.quicksand_depth < 1.1 {
        m.quicksand_depth = 1.1;
    }

    let floor_type = m.floor.map_or(SurfaceType::Default, |f| f.surface_type);
    match floor_type {
        SurfaceType::ShallowQuicksand => {
            m.quicksand_depth = (m.quicksand_depth + sinking_speed).min(10.0);
        }
        SurfaceType::ShallowMovingQuicksand => {
            m.quicksand_depth = (m.quicksand_depth + sinking_speed).min(25.0);
        }
        SurfaceType::Quicksand | SurfaceType::MovingQuicksand => {
            m.quicksand_depth = (m.quicksand_depth + sinking_speed).min(60.0);
        }
        SurfaceType::DeepQuicksand | SurfaceType::DeepMovingQuicksand => {
            m.quicksand_depth += sinking_speed;
            if m.quicksand_depth >= m.hitbox_height {
                restore_default_camera(m, env);
                return drop_and_set_action(m, env.objects, Action::QuicksandDeath, 0);
            }
        }
        SurfaceType::InstantQuicksand | SurfaceType::InstantMovingQuicksand => {
            restore_default_camera(m, env);
            return drop_and_set_action(m, env.objects, Action::QuicksandDeath, 0);
        }
        _ => m.quicksand_depth = 0.0,
    }

    false
}

/// Pushes the actor along moving quicksand. Returns true if a push applied.
pub fn update_moving_sand(m: &mut ActorState) -> bool {
    let Some(floor) = m.floor else {
        return false;
    };
    if !floor.surface_type.is_moving_sand() {
        return false;
    }

    let push_angle = floor.push_angle();
    let push_speed = usize::try_from(floor.force >> 8)
        .ok()
        .and_then(|i| MOVING_SAND_SPEEDS.get(i).copied())
        .unwrap_or(0.0);

    m.vel[0] += push_speed * sins(push_angle);
    m.vel[2] += push_speed * coss(push_angle);
    true
}

/// Pushes the actor along a horizontal-wind floor. Moving actors are pushed
/// relative to their own speed; standing actors drift with a small
/// oscillation.
pub fn update_windy_ground(m: &mut ActorState, env: &Env<'_>) -> bool {
    if !env.hooks.allow_hazard_surface(m, HazardType::HorizontalWind) {
        return false;
    }

    let Some(floor) = m.floor else {
        return false;
    };
    if floor.surface_type != SurfaceType::HorizontalWind {
        return false;
    }

    let push_angle = floor.push_angle();
    let push_speed = if m.action.flags().contains(ActionFlags::MOVING) {
        let push_dyaw: Angle = m.face_angle[1].wrapping_sub(push_angle);

        let mut speed = if m.forward_vel > 0.0 { -m.forward_vel * 0.5 } else { -8.0 };
        if push_dyaw > -0x4000 && push_dyaw < 0x4000 {
            speed *= -1.0;
        }
        speed * coss(push_dyaw)
    } else {
        3.2 + (env.global_timer % 4) as f32
    };

    m.vel[0] += push_speed * sins(push_angle);
    m.vel[2] += push_speed * coss(push_angle);
    true
}

/// Ejects the actor off a floor too steep to stand on, forwards if facing
/// downhill and backwards otherwise.
pub fn push_off_steep_floor(m: &mut ActorState, action: Action, arg: u32) -> bool {
    let floor_dyaw = m.floor_angle.wrapping_sub(m.face_angle[1]);

    if floor_dyaw > -0x4000 && floor_dyaw < 0x4000 {
        m.forward_vel = 16.0;
        m.face_angle[1] = m.floor_angle;
    } else {
        m.forward_vel = -16.0;
        m.face_angle[1] = m.floor_angle.wrapping_add(ANGLE_HALF);
    }

    set_action(m, action, arg)
}

// ============================================================
// Two-body speed transfer
// ============================================================

/// One side of a two-body collision in the horizontal plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BullyCollisionData {
    pub pos_x: f32,
    pub pos_z: f32,
    pub vel_x: f32,
    pub vel_z: f32,
    pub radius: f32,
    pub conversion_ratio: f32,
}

pub fn init_bully_collision_data(
    pos_x: f32,
    pos_z: f32,
    forward_vel: f32,
    yaw: Angle,
    conversion_ratio: f32,
    radius: f32,
) -> BullyCollisionData {
    let (forward_vel, yaw) = if forward_vel < 0.0 {
        (-forward_vel, yaw.wrapping_add(ANGLE_HALF))
    } else {
        (forward_vel, yaw)
    };

    BullyCollisionData {
        pos_x,
        pos_z,
        vel_x: forward_vel * sins(yaw),
        vel_z: forward_vel * coss(yaw),
        radius,
        conversion_ratio,
    }
}

/// Cancels each body's speed along the line between them and hands it to
/// the other, scaled by the receiver's conversion ratio.
///
/// Coincident bodies have no separating line; the transfer is skipped.
pub fn transfer_bully_speed(obj1: &mut BullyCollisionData, obj2: &mut BullyCollisionData) {
    let rx = obj2.pos_x - obj1.pos_x;
    let rz = obj2.pos_z - obj1.pos_z;
    let dist_sq = rx * rx + rz * rz;

    if !dist_sq.is_finite() || dist_sq < 1.0e-6 {
        warn!(dist_sq, "degenerate speed transfer between coincident bodies, skipping");
        return;
    }

    let projected_v1 = (rx * obj1.vel_x + rz * obj1.vel_z) / dist_sq;
    let projected_v2 = (-rx * obj2.vel_x - rz * obj2.vel_z) / dist_sq;

    obj2.vel_x += obj2.conversion_ratio * projected_v1 * rx - projected_v2 * -rx;
    obj2.vel_z += obj2.conversion_ratio * projected_v1 * rz - projected_v2 * -rz;

    obj1.vel_x += -projected_v1 * rx + obj1.conversion_ratio * projected_v2 * -rx;
    obj1.vel_z += -projected_v1 * rz + obj1.conversion_ratio * projected_v2 * -rz;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::NullPresentation;
    use crate::hooks::{NoHooks, PhysicsHooks};
    use crate::objects::DefaultObjects;
    use hopcore_common::collision_map::{CollisionMap, WallSegment};
    use std::cell::Cell;
    use hopcore_common::cvar::PhysicsSettings;

    fn falling_actor(pos: Vec3, vel: Vec3) -> ActorState {
        let mut m = ActorState::new(0).with_position(pos);
        m.action = Action::Freefall;
        m.vel = vel;
        m
    }

    fn ledge_map() -> CollisionMap {
        CollisionMap::new()
            .with_floor_patch(-1000.0, 99.0, -1000.0, 1000.0, 0.0, Surface::default())
            .with_floor_patch(100.0, 300.0, -1000.0, 1000.0, 200.0, Surface::default())
            .with_wall(WallSegment::new([100.0, 100.0], [100.0, -100.0], 0.0, 200.0, SurfaceType::Default))
    }

    #[test]
    fn test_air_step_lands_on_floor() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default);
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0, 5.0, 0.0], [0.0, -10.0, 0.0]);
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::empty()), AirStep::Landed);
        assert_eq!(m.pos[1], 0.0);
        assert_eq!(m.vel[1], -14.0);
        assert_eq!(m.gfx.pos, m.pos);
    }

    #[test]
    fn test_landing_under_low_ceiling_discards_horizontal_motion() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default).with_ceiling(150.0, SurfaceType::Default);
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0, 5.0, 0.0], [40.0, -10.0, 0.0]);
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::empty()), AirStep::Landed);
        assert_eq!(m.pos, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ledge_grab() {
        let map = ledge_map();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([52.0, 60.0, 0.0], [20.0, 0.0, 0.0]);
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::LEDGE_GRAB), AirStep::GrabbedLedge);
        assert_eq!(m.pos, [110.0, 200.0, 0.0]);
        assert_eq!(m.face_angle[1], 0x4000);
        assert_eq!(m.floor_height, 200.0);
    }

    #[test]
    fn test_ledge_grab_rejected_while_rising() {
        let map = ledge_map();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([52.0, 60.0, 0.0], [20.0, 1.0, 0.0]);
        assert_ne!(perform_air_step(&mut m, &env, AirStepCheck::LEDGE_GRAB), AirStep::GrabbedLedge);
        assert_eq!(m.pos[0], 50.0);
    }

    #[test]
    fn test_ceiling_grab_uses_referenced_ceiling() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default).with_ceiling(300.0, SurfaceType::Hangable);
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0, 100.0, 0.0], [0.0, 60.0, 0.0]);
        refresh_geometry(&mut m, &env);
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::HANG), AirStep::GrabbedCeiling);
        assert_eq!(m.pos[1], 130.0);

        let mut m = falling_actor([0.0, 100.0, 0.0], [0.0, 60.0, 0.0]);
        refresh_geometry(&mut m, &env);
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::empty()), AirStep::None);
    }

    #[test]
    fn test_ceiling_grab_reads_ceiling_from_step_start() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default).with_ceiling(300.0, SurfaceType::Hangable);
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        // Sub-steps find the hangable ceiling, but the step began under a plain one.
        let mut m = falling_actor([0.0, 100.0, 0.0], [0.0, 60.0, 0.0]);
        m.ceil = Some(Surface::new(SurfaceType::Default, [0.0, -1.0, 0.0]));
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::HANG), AirStep::None);
        assert_eq!(m.pos[1], 130.0);
        assert_eq!(m.ceil.map(|c| c.surface_type), Some(SurfaceType::Hangable));

        // The next step starts from the ceiling the last one found.
        m.vel[1] = 60.0;
        assert_eq!(perform_air_step(&mut m, &env, AirStepCheck::HANG), AirStep::GrabbedCeiling);
    }

    #[test]
    fn test_out_of_bounds_reports_wall() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings { bouncy_bounds: BouncyBounds::OnCapped, ..Default::default() };
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0, 500.0, 0.0], [0.0, 0.0, 0.0]);
        m.floor_height = 0.0;
        m.forward_vel = 400.0;
        let result = perform_air_quarter_step(&mut m, &env, [0.0, 500.0, 0.0], AirStepCheck::empty(), None);
        assert_eq!(result, AirStep::HitWall);
        assert_eq!(m.forward_vel, 500.0);
        assert_eq!(m.face_angle[1], ANGLE_HALF);
    }

    #[test]
    fn test_default_gravity_clamps_once() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0; 3], [0.0, -20.0, 0.0]);
        apply_gravity(&mut m, &env);
        assert_eq!(m.vel[1], -24.0);

        m.vel[1] = -73.0;
        apply_gravity(&mut m, &env);
        assert_eq!(m.vel[1], -75.0);
    }

    #[test]
    fn test_jump_ascent_gravity() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0; 3], [0.0, 40.0, 0.0]);
        m.action = Action::Jump;
        m.flags.insert(ActorFlags::JUMP_HELD);
        apply_gravity(&mut m, &env);
        assert_eq!(m.vel[1], 10.0);

        m.vel[1] = 40.0;
        m.input.buttons = InputFlags::A_DOWN;
        apply_gravity(&mut m, &env);
        assert_eq!(m.vel[1], 36.0);
    }

    #[test]
    fn test_twirl_gravity_lightens_with_spin() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0; 3], [0.0, -10.0, 0.0]);
        m.action = Action::Twirling;
        m.angle_vel[1] = 2048;
        apply_gravity(&mut m, &env);
        assert_eq!(m.vel[1], -12.0);
    }

    #[test]
    fn test_wing_cap_flutter() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0; 3], [0.0, -50.0, 0.0]);
        m.flags.insert(ActorFlags::WING_CAP);
        m.input.buttons = InputFlags::A_DOWN;
        apply_gravity(&mut m, &env);
        assert_eq!(m.vel[1], -48.0);
        assert!(m.body.wing_flutter);
    }

    #[test]
    fn test_vertical_wind_lift() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = falling_actor([0.0, -1700.0, 0.0], [0.0, 0.0, 0.0]);
        m.floor = Some(Surface::new(SurfaceType::VerticalWind, [0.0, 1.0, 0.0]));
        apply_vertical_wind(&mut m, &env);
        assert_eq!(m.vel[1], 50.0 / 8.0);

        m.action = Action::GroundPound;
        m.vel[1] = 0.0;
        apply_vertical_wind(&mut m, &env);
        assert_eq!(m.vel[1], 0.0);
    }

    #[test]
    fn test_ground_step_hits_wall() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default)
            .with_wall(WallSegment::new([100.0, 100.0], [100.0, -100.0], -100.0, 200.0, SurfaceType::Default));
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0).with_position([40.0, 0.0, 0.0]);
        m.action = Action::Walking;
        m.floor = Some(Surface::default());
        m.face_angle[1] = 0x4000;
        set_forward_vel(&mut m, 40.0);
        assert_eq!(perform_ground_step(&mut m, &env), GroundStep::HitWall);
        assert!(m.pos[0] <= 50.0);
        assert!(m.wall.is_some());
    }

    #[test]
    fn test_ground_step_leaves_ground() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default)
            .with_floor_patch(-1000.0, 100.0, -1000.0, 1000.0, 200.0, Surface::default());
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0).with_position([95.0, 200.0, 0.0]);
        m.action = Action::Walking;
        m.floor = Some(Surface::default());
        m.floor_height = 200.0;
        m.face_angle[1] = 0x4000;
        set_forward_vel(&mut m, 40.0);
        assert_eq!(perform_ground_step(&mut m, &env), GroundStep::LeftGround);
        assert_eq!(m.pos[1], 200.0);
        assert_eq!(m.floor_height, 0.0);
    }

    #[test]
    fn test_floorless_ground_step_stays_put() {
        let map = CollisionMap::new().with_floor_patch(0.0, 1000.0, -1000.0, 1000.0, 0.0, Surface::default());
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0).with_position([-10.0, 0.0, 0.0]);
        m.action = Action::Walking;
        m.vel = [80.0, 0.0, 0.0];
        assert_eq!(perform_ground_step(&mut m, &env), GroundStep::HitWall);
        assert_eq!(m.pos, [-10.0, 0.0, 0.0]);
        assert!(m.floor.is_none());
    }

    #[test]
    fn test_ground_step_speed_hook_needs_floor() {
        struct HalfSpeed {
            asked: Cell<u32>,
        }
        impl PhysicsHooks for HalfSpeed {
            fn ground_step_speed(&self, _m: &ActorState) -> Option<f32> {
                self.asked.set(self.asked.get() + 1);
                Some(0.5)
            }
        }

        let map = CollisionMap::new().with_floor_patch(0.0, 1000.0, -1000.0, 1000.0, 0.0, Surface::default());
        let settings = PhysicsSettings::default();
        let hooks = HalfSpeed { asked: Cell::new(0) };
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &hooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0).with_position([100.0, 0.0, 0.0]);
        m.action = Action::Walking;
        m.floor = Some(Surface::default());
        m.vel = [40.0, 0.0, 0.0];
        assert_eq!(perform_ground_step(&mut m, &env), GroundStep::None);
        assert_eq!(m.pos, [120.0, 0.0, 0.0]);
        assert_eq!(hooks.asked.get(), 4);

        let mut m = ActorState::new(0).with_position([-10.0, 0.0, 0.0]);
        m.action = Action::Walking;
        m.vel = [40.0, 0.0, 0.0];
        assert_eq!(perform_ground_step(&mut m, &env), GroundStep::HitWall);
        assert_eq!(m.pos, [-10.0, 0.0, 0.0]);
        assert_eq!(hooks.asked.get(), 4);
    }

    #[test]
    fn test_deep_quicksand_swallows_at_hitbox_height() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0);
        m.action = Action::Walking;
        m.floor = Some(Surface::new(SurfaceType::DeepQuicksand, [0.0, 1.0, 0.0]));
        m.quicksand_depth = 159.0;

        assert!(!update_quicksand(&mut m, &mut env, 0.5));
        assert_eq!(m.action, Action::Walking);
        assert!(update_quicksand(&mut m, &mut env, 0.5));
        assert_eq!(m.action, Action::QuicksandDeath);
    }

    #[test]
    fn test_shallow_quicksand_caps_depth() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0);
        m.floor = Some(Surface::new(SurfaceType::ShallowQuicksand, [0.0, 1.0, 0.0]));
        for _ in 0..10 {
            update_quicksand(&mut m, &mut env, 4.0);
        }
        assert_eq!(m.quicksand_depth, 10.0);

        m.floor = Some(Surface::default());
        update_quicksand(&mut m, &mut env, 4.0);
        assert_eq!(m.quicksand_depth, 0.0);
    }

    #[test]
    fn test_moving_sand_push() {
        let mut m = ActorState::new(0);
        // Speed bucket 1, push towards +x.
        m.floor = Some(Surface::new(SurfaceType::MovingQuicksand, [0.0, 1.0, 0.0]).with_force(0x140));
        assert!(update_moving_sand(&mut m));
        assert_eq!(m.vel[0], 8.0);

        m.floor = Some(Surface::new(SurfaceType::MovingQuicksand, [0.0, 1.0, 0.0]).with_force(-0x100));
        m.vel = [0.0; 3];
        assert!(update_moving_sand(&mut m));
        assert_eq!(m.vel, [0.0; 3]);
    }

    #[test]
    fn test_moving_sand_ignores_quicksand_veto() {
        struct NoQuicksand;
        impl PhysicsHooks for NoQuicksand {
            fn allow_hazard_surface(&self, _m: &ActorState, hazard: HazardType) -> bool {
                hazard != HazardType::Quicksand
            }
        }

        let map = CollisionMap::flat(0.0, SurfaceType::MovingQuicksand);
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoQuicksand, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0);
        m.action = Action::Idle;
        m.floor = Some(Surface::new(SurfaceType::MovingQuicksand, [0.0, 1.0, 0.0]).with_force(0x140));
        assert_eq!(stationary_ground_step(&mut m, &env), GroundStep::None);
        assert_eq!(m.vel[0], 8.0);
        assert_eq!(m.pos[0], 8.0);
    }

    #[test]
    fn test_idle_windy_ground_oscillates() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings).with_global_timer(6);

        let mut m = ActorState::new(0);
        m.action = Action::Idle;
        m.floor = Some(Surface::new(SurfaceType::HorizontalWind, [0.0, 1.0, 0.0]));
        assert!(update_windy_ground(&mut m, &env));
        assert!((m.vel[2] - 5.2).abs() < 1e-5);
    }

    #[test]
    fn test_push_off_steep_floor() {
        let mut m = ActorState::new(0);
        m.floor_angle = 0x1000;
        m.face_angle[1] = 0;
        push_off_steep_floor(&mut m, Action::Freefall, 0);
        assert_eq!(m.forward_vel, 16.0);
        assert_eq!(m.face_angle[1], 0x1000);

        m.face_angle[1] = 0x6000;
        push_off_steep_floor(&mut m, Action::Freefall, 0);
        assert_eq!(m.forward_vel, -16.0);
        assert_eq!(m.face_angle[1], (0x1000 as Angle).wrapping_add(ANGLE_HALF));
    }

    #[test]
    fn test_stationary_step_snaps_to_floor() {
        let map = CollisionMap::flat(0.0, SurfaceType::Default);
        let settings = PhysicsSettings::default();
        let (mut fx, mut objects) = (NullPresentation, DefaultObjects);
        let env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0).with_position([0.0, 3.0, 0.0]);
        m.floor = Some(Surface::default());
        m.forward_vel = 10.0;
        assert_eq!(stationary_ground_step(&mut m, &env), GroundStep::None);
        assert_eq!(m.pos[1], 0.0);
        assert_eq!(m.forward_vel, 0.0);
    }

    #[test]
    fn test_bully_transfer_swaps_head_on_speed() {
        let mut a = BullyCollisionData { pos_x: 0.0, vel_x: 10.0, conversion_ratio: 1.0, ..Default::default() };
        let mut b = BullyCollisionData { pos_x: 100.0, vel_x: 0.0, conversion_ratio: 1.0, ..Default::default() };
        transfer_bully_speed(&mut a, &mut b);
        assert!((a.vel_x).abs() < 1e-4);
        assert!((b.vel_x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_bully_transfer_coincident_is_noop() {
        let mut a = BullyCollisionData { vel_x: 10.0, ..Default::default() };
        let mut b = BullyCollisionData::default();
        transfer_bully_speed(&mut a, &mut b);
        assert_eq!(a.vel_x, 10.0);
        assert!(b.vel_x.is_finite());
    }

    #[test]
    fn test_init_bully_negative_speed_flips_yaw() {
        let data = init_bully_collision_data(0.0, 0.0, -10.0, 0, 1.0, 50.0);
        assert!((data.vel_z + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_update_wall_policies() {
        let mut wcd = WallCollisionData::new();
        wcd.push(Surface::new(SurfaceType::Default, [-1.0, 0.0, 0.0]));
        wcd.push(Surface::new(SurfaceType::Default, [0.0, 0.0, -1.0]));

        let mut m = ActorState::new(0);
        m.face_angle[1] = 0x4000;

        update_wall(&mut m, &PhysicsSettings::default(), &wcd);
        assert_eq!(m.wall.map(|w| w.normal), Some([0.0, 0.0, -1.0]));

        let fixed = PhysicsSettings { fix_collision_bugs: true, ..Default::default() };
        update_wall(&mut m, &fixed, &wcd);
        assert_eq!(m.wall.map(|w| w.normal), Some([-1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_terrain_sound_selection() {
        let mut m = ActorState::new(0);
        assert_eq!(terrain_sound_for(&m), TerrainSound::Default);
        m.floor = Some(Surface::new(SurfaceType::Hard, [0.0, 1.0, 0.0]));
        assert_eq!(terrain_sound_for(&m), TerrainSound::Stone);
        m.water_level = 100.0;
        assert_eq!(terrain_sound_for(&m), TerrainSound::Water);
    }
}
