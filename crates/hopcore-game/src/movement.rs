// movement.rs — Input-driven velocity updaters for airborne actions
//
// None of these move the actor; they only rewrite forward speed, facing and
// the velocity vector ahead of a stepper call.

use hopcore_common::shared::{
    angle_add_f32, approach_f32, approach_s32, atan2s, coss, horizontal_length, sins, Angle,
    ANGLE_HALF, ANGLE_QUARTER,
};
use hopcore_common::surface::SurfaceType;

use crate::actions::Action;
use crate::actor::{ActorState, InputFlags};
use crate::env::Env;
use crate::hooks::HazardType;

const FLIGHT_PITCH_LIMIT: Angle = 0x2AAA;

// ============================================================
// Velocity helpers
// ============================================================

/// Sets forward speed and derives horizontal velocity from the facing yaw.
pub fn set_forward_vel(m: &mut ActorState, forward_vel: f32) {
    m.forward_vel = forward_vel;
    m.slide_vel_x = sins(m.face_angle[1]) * m.forward_vel;
    m.slide_vel_z = coss(m.face_angle[1]) * m.forward_vel;
    m.vel[0] = m.slide_vel_x;
    m.vel[2] = m.slide_vel_z;
}

/// Full 3D velocity from forward speed along pitch and yaw.
pub fn set_vel_from_pitch_and_yaw(m: &mut ActorState) {
    m.vel[0] = m.forward_vel * coss(m.face_angle[0]) * sins(m.face_angle[1]);
    m.vel[1] = m.forward_vel * sins(m.face_angle[0]);
    m.vel[2] = m.forward_vel * coss(m.face_angle[0]) * coss(m.face_angle[1]);
}

/// Horizontal velocity from forward speed and yaw, with no vertical part.
pub fn set_vel_from_yaw(m: &mut ActorState) {
    m.slide_vel_x = m.forward_vel * sins(m.face_angle[1]);
    m.slide_vel_z = m.forward_vel * coss(m.face_angle[1]);
    m.vel[0] = m.slide_vel_x;
    m.vel[1] = 0.0;
    m.vel[2] = m.slide_vel_z;
}

// ============================================================
// Horizontal wind
// ============================================================

/// Pushes the actor along a horizontal-wind floor. Returns true when the
/// wind took over horizontal movement for this tick.
pub fn check_horizontal_wind(m: &mut ActorState, env: &Env<'_>) -> bool {
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
    m.slide_vel_x += 1.2 * sins(push_angle);
    m.slide_vel_z += 1.2 * coss(push_angle);

    let mut speed = horizontal_length(m.slide_vel_x, m.slide_vel_z);
    if speed > 48.0 {
        m.slide_vel_x = m.slide_vel_x * 48.0 / speed;
        m.slide_vel_z = m.slide_vel_z * 48.0 / speed;
        // Reported speed stays at 32 even though the cap is 48.
        speed = 32.0;
    } else if speed > 32.0 {
        speed = 32.0;
    }

    m.vel[0] = m.slide_vel_x;
    m.vel[2] = m.slide_vel_z;
    m.slide_yaw = atan2s(m.slide_vel_z, m.slide_vel_x);
    m.forward_vel = speed * coss(m.face_angle[1].wrapping_sub(m.slide_yaw));
    true
}

// ============================================================
// Jump-family air control
// ============================================================

fn air_drag(m: &mut ActorState) {
    let drag_threshold = if m.action == Action::LongJump { 48.0 } else { 32.0 };

    // Speed above the threshold only bleeds by 1, so forward input still
    // gains net speed.
    if m.forward_vel > drag_threshold {
        m.forward_vel -= 1.0;
    }
    if m.forward_vel < -16.0 {
        m.forward_vel += 2.0;
    }
}

/// Air control that steers the facing towards the stick.
pub fn update_air_with_turn(m: &mut ActorState, env: &Env<'_>) {
    if check_horizontal_wind(m, env) {
        return;
    }

    m.forward_vel = approach_f32(m.forward_vel, 0.0, 0.35, 0.35);

    if m.has_input(InputFlags::NONZERO_ANALOG) {
        let intended_dyaw = m.input.intended_yaw.wrapping_sub(m.face_angle[1]);
        let intended_mag = m.input.intended_mag / 32.0;

        m.forward_vel += 1.5 * coss(intended_dyaw) * intended_mag;
        m.face_angle[1] = angle_add_f32(m.face_angle[1], 512.0 * sins(intended_dyaw) * intended_mag);
    }

    air_drag(m);
    set_vel_from_yaw_keep_y(m);
}

/// Air control that strafes sideways without changing the facing.
pub fn update_air_without_turn(m: &mut ActorState, env: &Env<'_>) {
    if check_horizontal_wind(m, env) {
        return;
    }

    let mut sideways_speed = 0.0;
    m.forward_vel = approach_f32(m.forward_vel, 0.0, 0.35, 0.35);

    if m.has_input(InputFlags::NONZERO_ANALOG) {
        let intended_dyaw = m.input.intended_yaw.wrapping_sub(m.face_angle[1]);
        let intended_mag = m.input.intended_mag / 32.0;

        m.forward_vel += intended_mag * coss(intended_dyaw) * 1.5;
        sideways_speed = intended_mag * sins(intended_dyaw) * 10.0;
    }

    air_drag(m);

    let yaw = m.face_angle[1];
    let side_yaw = yaw.wrapping_add(ANGLE_QUARTER);
    m.slide_vel_x = m.forward_vel * sins(yaw) + sideways_speed * sins(side_yaw);
    m.slide_vel_z = m.forward_vel * coss(yaw) + sideways_speed * coss(side_yaw);

    m.vel[0] = m.slide_vel_x;
    m.vel[2] = m.slide_vel_z;
}

/// Restricted control for lava boost and twirling: no backwards motion and
/// a slow bleed above 32.
pub fn update_lava_boost_or_twirling(m: &mut ActorState) {
    if m.has_input(InputFlags::NONZERO_ANALOG) {
        let intended_dyaw = m.input.intended_yaw.wrapping_sub(m.face_angle[1]);
        let intended_mag = m.input.intended_mag / 32.0;

        m.forward_vel += coss(intended_dyaw) * intended_mag;
        m.face_angle[1] = angle_add_f32(m.face_angle[1], sins(intended_dyaw) * intended_mag * 1024.0);

        if m.forward_vel < 0.0 {
            m.face_angle[1] = m.face_angle[1].wrapping_add(ANGLE_HALF);
            m.forward_vel *= -1.0;
        }

        if m.forward_vel > 32.0 {
            m.forward_vel -= 2.0;
        }
    }

    set_vel_from_yaw_keep_y(m);
}

fn set_vel_from_yaw_keep_y(m: &mut ActorState) {
    m.slide_vel_x = m.forward_vel * sins(m.face_angle[1]);
    m.slide_vel_z = m.forward_vel * coss(m.face_angle[1]);
    m.vel[0] = m.slide_vel_x;
    m.vel[2] = m.slide_vel_z;
}

// ============================================================
// Flight
// ============================================================

/// Rate-limited approach of an angular velocity towards `target`. Reversing
/// direction first brakes by 0x40, clamped to `brake_limit`.
fn approach_angle_vel(current: Angle, target: Angle, brake_limit: i32, toward: (i32, i32), away: (i32, i32)) -> Angle {
    let current = current as i32;
    let target = target as i32;
    let next = if target > 0 {
        if current < 0 {
            (current + 0x40).min(brake_limit)
        } else {
            approach_s32(current, target, toward.0, toward.1)
        }
    } else if target < 0 {
        if current > 0 {
            (current - 0x40).max(-brake_limit)
        } else {
            approach_s32(current, target, away.0, away.1)
        }
    } else {
        approach_s32(current, 0, 0x40, 0x40)
    };
    next as Angle
}

pub fn update_flying_yaw(m: &mut ActorState) {
    let target_yaw_vel = ((m.input.stick_x * (m.forward_vel / 4.0)) as i32 as Angle).wrapping_neg();

    m.angle_vel[1] = approach_angle_vel(m.angle_vel[1], target_yaw_vel, 0x10, (0x10, 0x20), (0x20, 0x10));

    m.face_angle[1] = m.face_angle[1].wrapping_add(m.angle_vel[1]);
    m.face_angle[2] = (20 * -(m.angle_vel[1] as i32)) as Angle;
}

pub fn update_flying_pitch(m: &mut ActorState) {
    let target_pitch_vel = ((m.input.stick_y * (m.forward_vel / 5.0)) as i32 as Angle).wrapping_neg();

    m.angle_vel[0] = approach_angle_vel(m.angle_vel[0], target_pitch_vel, 0x20, (0x20, 0x40), (0x40, 0x20));
}

/// Wing-cap flight: pitch and yaw controllers, speed traded against
/// climb, and banking from the yaw rate.
pub fn update_flying(m: &mut ActorState) {
    update_flying_pitch(m);
    update_flying_yaw(m);

    m.forward_vel -= 2.0 * (m.face_angle[0] as f32 / 16384.0) + 0.1;
    m.forward_vel -= 0.5 * (1.0 - coss(m.angle_vel[1]));

    if m.forward_vel < 0.0 {
        m.forward_vel = 0.0;
    }

    if m.forward_vel > 16.0 {
        m.face_angle[0] = angle_add_f32(m.face_angle[0], (m.forward_vel - 32.0) * 6.0);
    } else if m.forward_vel > 4.0 {
        m.face_angle[0] = angle_add_f32(m.face_angle[0], (m.forward_vel - 32.0) * 10.0);
    } else {
        m.face_angle[0] = m.face_angle[0].wrapping_sub(0x400);
    }

    m.face_angle[0] = m.face_angle[0].wrapping_add(m.angle_vel[0]);
    m.face_angle[0] = m.face_angle[0].clamp(-FLIGHT_PITCH_LIMIT, FLIGHT_PITCH_LIMIT);

    set_vel_from_pitch_and_yaw(m);

    m.slide_vel_x = m.vel[0];
    m.slide_vel_z = m.vel[2];
}
