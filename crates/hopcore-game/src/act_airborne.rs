// act_airborne.rs — Airborne action handlers
//
// Every handler has the same shape: react to input, update velocity, take one
// air step, and branch on its outcome. A handler returns true when it changed
// action and the new action should run in the same tick.

use hopcore_common::cvar::BouncyBounds;
use hopcore_common::shared::{
    angle_from_f32, approach_f32, approach_s32, atan2s, coss, sins, ANGLE_HALF, ANGLE_QUARTER,
};
use hopcore_common::surface::SurfaceType;

use crate::actions::{Action, GettingBlownPhase, GroundPoundPhase, IntroPhase, RolloutPhase};
use crate::actor::{
    ActorFlags, ActorState, GrabPos, InputFlags, InteractStatus, TerrainType, KNOCKBACK_TIMER_DEFAULT,
};
use crate::dispatch::ActionFn;
use crate::env::Env;
use crate::fx::{Animation, CameraEvent, CameraMode, CameraShake, ParticleFlags, Sound, Voice};
use crate::interaction::{
    anim_frame, bonk_reflection, check_fall_damage, check_fall_damage_or_get_stuck,
    check_kick_or_dive_in_air, check_wall_kick, lava_boost_on_wall, play_actor_sound,
    play_heavy_landing_sound, play_jump_sound, play_knockback_sound, play_landing_sound, play_flip_sounds,
    play_sound, play_sound_if_no_flag, play_voice, play_voice_if_no_flag, queue_rumble, reset_rumble,
    restore_default_camera, set_anim, set_particles, shake_camera, should_get_stuck_in_ground, terrain_jump,
    VoiceCue,
};
use crate::movement::{
    set_forward_vel, update_air_with_turn, update_air_without_turn, update_flying,
    update_lava_boost_or_twirling,
};
use crate::step::{perform_air_step, AirStep, AirStepCheck};
use crate::transition::{drop_and_set_action, set_action, turn_around};

const DIVE_PITCH_LIMIT: i16 = 0x2AAA;

/// Floors at least this flat bounce a butt slide back into the air.
const BUTT_SLIDE_BOUNCE_NORMAL_Y: f32 = 0.984_807_7;

/// Health never drops below this from burning; remote actors stay one
/// unit higher so only the local player can die.
const BURN_HEALTH_FLOOR: i16 = 0x100;

// ============================================================
// Shared pieces
// ============================================================

#[inline]
fn stop_rising(m: &mut ActorState) {
    if m.vel[1] > 0.0 {
        m.vel[1] = 0.0;
    }
}

/// Wall hit caused by bouncing off the level boundary rather than a wall.
#[inline]
fn bounced_off_bounds(m: &ActorState, env: &Env<'_>) -> bool {
    m.wall.is_none() && env.settings.bouncy_bounds != BouncyBounds::Off
}

#[inline]
fn holding_npc(m: &ActorState) -> bool {
    m.held_object.map_or(false, |held| held.holdable_npc)
}

fn play_terrain_jump(m: &mut ActorState, env: &mut Env<'_>, cue: VoiceCue) {
    let sound = terrain_jump(m);
    play_actor_sound(m, env, sound, cue);
}

fn use_behind_camera(m: &ActorState, env: &mut Env<'_>) {
    if m.is_local && env.fx.camera_mode(m.slot) != CameraMode::BehindActor {
        env.fx.set_camera_mode(m.slot, CameraMode::BehindActor);
    }
}

fn burn_health(m: &mut ActorState) {
    m.burn_timer = m.burn_timer.saturating_add(3);
    m.health -= 10;
    if m.health < BURN_HEALTH_FLOOR {
        m.health = if m.is_local { BURN_HEALTH_FLOOR - 1 } else { BURN_HEALTH_FLOOR };
    }
}

/// Air step shared by the jump family: strafing air control, then landing,
/// bonking, ledge and ceiling grabs, and lava walls.
pub fn common_air_action_step(
    m: &mut ActorState,
    env: &mut Env<'_>,
    land_action: Action,
    anim: Animation,
    check: AirStepCheck,
) -> AirStep {
    update_air_without_turn(m, env);

    let mut step = perform_air_step(m, env, check);
    if m.action == Action::Bubbled && step == AirStep::HitLavaWall {
        step = AirStep::HitWall;
    }

    match step {
        AirStep::None => {
            set_anim(m, env, anim);
        }
        AirStep::Landed => {
            if !check_fall_damage_or_get_stuck(m, env, Action::HardBackwardGroundKb) {
                set_action(m, land_action, 0);
            }
        }
        AirStep::HitWall => {
            set_anim(m, env, anim);

            if m.forward_vel > 16.0 {
                let bounds_off = env.settings.bouncy_bounds == BouncyBounds::Off;
                if bounds_off || m.wall.is_some() {
                    queue_rumble(m, env, 5, 40);
                    bonk_reflection(m, env, false);
                    turn_around(m);
                }

                if m.wall.is_some() {
                    set_action(m, Action::AirHitWall, 0);
                } else {
                    stop_rising(m);

                    // No wall referenced: a ceiling edge or the level boundary.
                    // Anything held stays in hand through the bonk.
                    if bounds_off {
                        if m.forward_vel >= 38.0 {
                            set_particles(m, env, ParticleFlags::VERTICAL_STAR);
                            set_action(m, Action::BackwardAirKb, 0);
                        } else {
                            if m.forward_vel > 8.0 {
                                set_forward_vel(m, -8.0);
                            }
                            set_action(m, Action::SoftBonk, 0);
                        }
                    }
                }
            } else {
                set_forward_vel(m, 0.0);
            }
        }
        AirStep::GrabbedLedge => {
            set_anim(m, env, Animation::IdleOnLedge);
            drop_and_set_action(m, env.objects, Action::LedgeGrab, 0);
        }
        AirStep::GrabbedCeiling => {
            set_action(m, Action::StartHanging, 0);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
    }

    step
}

/// Air step shared by the knockback family. Forces `speed` unless the
/// knockback timer says otherwise, and bounces back off walls.
pub fn common_air_knockback_step(
    m: &mut ActorState,
    env: &mut Env<'_>,
    land_action: Action,
    hard_fall_action: Action,
    anim: Animation,
    speed: f32,
) -> AirStep {
    match m.knockback_timer {
        0 => {
            // A player's hit already set the speed it wants.
            if !m.hit_by_player {
                set_forward_vel(m, speed);
            }
        }
        t if t < 0 => {}
        _ => m.knockback_timer = KNOCKBACK_TIMER_DEFAULT,
    }

    let step = perform_air_step(m, env, AirStepCheck::empty());
    match step {
        AirStep::None => {
            set_anim(m, env, anim);
        }
        AirStep::Landed => {
            if m.action == Action::SoftBonk {
                queue_rumble(m, env, 5, 40);
            }

            if !check_fall_damage_or_get_stuck(m, env, hard_fall_action) {
                let arg = if matches!(m.action, Action::ThrownForward | Action::ThrownBackward) {
                    u32::from(m.hurt_counter)
                } else {
                    m.action_arg
                };
                set_action(m, land_action, arg);
            }
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => {
            set_anim(m, env, Animation::BackwardAirKb);
            bonk_reflection(m, env, false);
            stop_rising(m);
            set_forward_vel(m, -speed);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    step
}

// ============================================================
// Jump family
// ============================================================

pub fn act_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if check_kick_or_dive_in_air(m) {
        return true;
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Jump);
    common_air_action_step(
        m,
        env,
        Action::JumpLand,
        Animation::SingleJump,
        AirStepCheck::LEDGE_GRAB | AirStepCheck::HANG,
    );
    false
}

pub fn act_double_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let anim = if m.vel[1] >= 0.0 { Animation::DoubleJumpRise } else { Animation::DoubleJumpFall };

    if check_kick_or_dive_in_air(m) {
        return true;
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Say(Voice::Hoohoo));
    common_air_action_step(
        m,
        env,
        Action::DoubleJumpLand,
        anim,
        AirStepCheck::LEDGE_GRAB | AirStepCheck::HANG,
    );
    false
}

pub fn act_triple_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.is_local && m.special_triple_jump {
        return set_action(m, Action::SpecialTripleJump, 0);
    }
    if m.has_input(InputFlags::B_PRESSED) {
        return set_action(m, Action::Dive, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Jump);
    common_air_action_step(m, env, Action::TripleJumpLand, Animation::TripleJump, AirStepCheck::empty());
    if m.action == Action::TripleJumpLand {
        queue_rumble(m, env, 5, 40);
    }
    play_flip_sounds(m, env, [2, 8, 20]);
    false
}

pub fn act_backflip(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Say(Voice::YahWahHoo(0)));
    common_air_action_step(m, env, Action::BackflipLand, Animation::Backflip, AirStepCheck::empty());
    if m.action == Action::BackflipLand {
        queue_rumble(m, env, 5, 40);
    }
    play_flip_sounds(m, env, [2, 3, 17]);
    false
}

pub fn act_freefall(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::B_PRESSED) {
        return set_action(m, Action::Dive, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    let anim = match m.action_arg {
        1 => Animation::FallFromSlide,
        2 => Animation::FallFromSlideKick,
        _ => Animation::GeneralFall,
    };
    common_air_action_step(m, env, Action::FreefallLand, anim, AirStepCheck::LEDGE_GRAB);
    false
}

pub fn act_hold_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.interact_status.contains(InteractStatus::DROP_OBJECT) {
        return drop_and_set_action(m, env.objects, Action::Freefall, 0);
    }
    if m.has_input(InputFlags::B_PRESSED) && !holding_npc(m) {
        return set_action(m, Action::AirThrow, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return drop_and_set_action(m, env.objects, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Jump);
    common_air_action_step(
        m,
        env,
        Action::HoldJumpLand,
        Animation::JumpWithLightObj,
        AirStepCheck::LEDGE_GRAB,
    );
    false
}

pub fn act_hold_freefall(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let anim = if m.action_arg == 0 {
        Animation::FallWithLightObj
    } else {
        Animation::FallFromSlidingWithLightObj
    };

    if m.interact_status.contains(InteractStatus::DROP_OBJECT) {
        return drop_and_set_action(m, env.objects, Action::Freefall, 0);
    }
    if m.has_input(InputFlags::B_PRESSED) && !holding_npc(m) {
        return set_action(m, Action::AirThrow, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return drop_and_set_action(m, env.objects, Action::GroundPound, 0);
    }

    common_air_action_step(m, env, Action::HoldFreefallLand, anim, AirStepCheck::LEDGE_GRAB);
    false
}

pub fn act_side_flip(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::B_PRESSED) {
        return set_action(m, Action::Dive, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Jump);
    let step = common_air_action_step(
        m,
        env,
        Action::SideFlipLand,
        Animation::SlideFlip,
        AirStepCheck::LEDGE_GRAB,
    );
    // The flip animation is authored facing backwards.
    if step != AirStep::GrabbedLedge {
        m.gfx.angle[1] = m.gfx.angle[1].wrapping_add(ANGLE_HALF);
    }

    if anim_frame(m, env) == 6 {
        play_sound(m, env, Sound::SideFlip);
    }
    false
}

pub fn act_wall_kick_air(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::B_PRESSED) {
        return set_action(m, Action::Dive, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_jump_sound(m, env);
    common_air_action_step(m, env, Action::JumpLand, Animation::SlideJump, AirStepCheck::LEDGE_GRAB);
    false
}

pub fn act_long_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let anim = if m.long_jump_is_slow { Animation::SlowLongJump } else { Animation::FastLongJump };

    play_terrain_jump(m, env, VoiceCue::Say(Voice::Yahoo));

    let on_vertical_wind = m.floor.map_or(false, |f| f.surface_type == SurfaceType::VerticalWind);
    if on_vertical_wind && m.action_state == 0 {
        play_voice(m, env, Voice::HereWeGo);
        m.action_state = 1;
    }

    common_air_action_step(m, env, Action::LongJumpLand, anim, AirStepCheck::LEDGE_GRAB);
    if m.action == Action::LongJumpLand {
        queue_rumble(m, env, 5, 40);
    }
    false
}

/// Shared by the shell jump and shell fall.
pub fn act_riding_shell_air(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    play_terrain_jump(m, env, VoiceCue::Jump);
    set_anim(m, env, Animation::JumpRidingShell);

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            set_action(m, Action::RidingShellGround, 1);
        }
        AirStep::HitWall => set_forward_vel(m, 0.0),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    // Sit on top of the shell.
    m.gfx.pos[1] += 42.0;
    false
}

pub fn act_twirling(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let start_twirl_yaw = m.twirl_yaw;
    let yaw_vel_target = if m.has_input(InputFlags::A_DOWN) { 0x2000 } else { 0x1800 };

    m.angle_vel[1] = approach_s32(i32::from(m.angle_vel[1]), yaw_vel_target, 0x200, 0x200) as i16;
    m.twirl_yaw = m.twirl_yaw.wrapping_add(m.angle_vel[1]);

    let anim = if m.action_arg == 0 { Animation::StartTwirl } else { Animation::Twirl };
    set_anim(m, env, anim);
    if env.fx.is_anim_past_end(m.slot) {
        m.action_arg = 1;
    }

    // One whoosh per revolution.
    if start_twirl_yaw > m.twirl_yaw {
        play_sound(m, env, Sound::Twirl);
    }

    update_lava_boost_or_twirling(m);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            set_action(m, Action::TwirlLand, 0);
        }
        AirStep::HitWall => bonk_reflection(m, env, false),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    m.gfx.angle[1] = m.gfx.angle[1].wrapping_add(m.twirl_yaw);
    reset_rumble(m, env);
    false
}

pub fn act_dive(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.action_arg == 0 {
        play_actor_sound(m, env, Sound::Throw, VoiceCue::Say(Voice::Hoohoo));
    } else {
        play_terrain_jump(m, env, VoiceCue::Jump);
    }

    set_anim(m, env, Animation::Dive);

    if env.objects.check_object_grab(m) {
        env.objects.grab_used_object(m);
        if m.held_object.is_some() {
            m.body.grab_pos = GrabPos::LightObject;
            if m.action != Action::Dive {
                return true;
            }
        }
    }

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::None => {
            if m.vel[1] < 0.0 && m.face_angle[0] > -DIVE_PITCH_LIMIT {
                m.face_angle[0] = m.face_angle[0].saturating_sub(0x200).max(-DIVE_PITCH_LIMIT);
            }
            m.gfx.angle[0] = m.face_angle[0].wrapping_neg();
        }
        AirStep::Landed => {
            if should_get_stuck_in_ground(m) && m.face_angle[0] == -DIVE_PITCH_LIMIT {
                queue_rumble(m, env, 5, 80);
                play_voice(m, env, Voice::Oof);
                set_particles(m, env, ParticleFlags::MIST_CIRCLE);
                drop_and_set_action(m, env.objects, Action::HeadStuckInGround, 0);
            } else if !check_fall_damage(m, env, Action::HardForwardGroundKb) {
                let action = if m.held_object.is_none() { Action::DiveSlide } else { Action::DivePickingUp };
                set_action(m, action, 0);
            }
            m.face_angle[0] = 0;
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => {
            bonk_reflection(m, env, true);
            m.face_angle[0] = 0;
            stop_rising(m);
            set_particles(m, env, ParticleFlags::VERTICAL_STAR);
            drop_and_set_action(m, env.objects, Action::BackwardAirKb, 0);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
    false
}

pub fn act_air_throw(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    m.action_timer += 1;
    if m.action_timer == 4 {
        env.objects.throw_held_object(m);
    }

    play_voice_if_no_flag(m, env, Voice::Wah, ActorFlags::VOICE_PLAYED);
    set_anim(m, env, Animation::ThrowLightObject);

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if !check_fall_damage_or_get_stuck(m, env, Action::HardBackwardGroundKb) {
                // Assigned directly: the landing keeps this action's timer and state.
                m.action = Action::AirThrowLand;
            }
        }
        AirStep::HitWall => set_forward_vel(m, 0.0),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
    false
}

pub fn act_water_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.forward_vel < 15.0 {
        set_forward_vel(m, 15.0);
    }

    play_actor_sound(m, env, Sound::WaterJump, VoiceCue::Jump);
    set_anim(m, env, Animation::SingleJump);

    match perform_air_step(m, env, AirStepCheck::LEDGE_GRAB) {
        AirStep::Landed => {
            set_action(m, Action::JumpLand, 0);
            restore_default_camera(m, env);
        }
        AirStep::HitWall => set_forward_vel(m, 15.0),
        AirStep::GrabbedLedge => {
            set_anim(m, env, Animation::IdleOnLedge);
            set_action(m, Action::LedgeGrab, 0);
            restore_default_camera(m, env);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
    false
}

pub fn act_hold_water_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.interact_status.contains(InteractStatus::DROP_OBJECT) {
        return drop_and_set_action(m, env.objects, Action::Freefall, 0);
    }

    if m.forward_vel < 15.0 {
        set_forward_vel(m, 15.0);
    }

    play_actor_sound(m, env, Sound::WaterJump, VoiceCue::Jump);
    set_anim(m, env, Animation::JumpWithLightObj);

    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            set_action(m, Action::HoldJumpLand, 0);
            restore_default_camera(m, env);
        }
        AirStep::HitWall => set_forward_vel(m, 15.0),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
    false
}

pub fn act_steep_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::B_PRESSED) {
        return set_action(m, Action::Dive, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Jump);
    let forward_vel = 0.98 * m.forward_vel;
    set_forward_vel(m, forward_vel);

    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if !check_fall_damage_or_get_stuck(m, env, Action::HardBackwardGroundKb) {
                m.face_angle[0] = 0;
                let action = if m.forward_vel < 0.0 { Action::BeginSliding } else { Action::JumpLand };
                set_action(m, action, 0);
            }
        }
        AirStep::HitWall => set_forward_vel(m, 0.0),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    set_anim(m, env, Animation::SingleJump);
    m.gfx.angle[1] = m.steep_jump_yaw;
    false
}

pub fn act_top_of_pole_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    play_jump_sound(m, env);
    common_air_action_step(m, env, Action::FreefallLand, Animation::HandstandJump, AirStepCheck::LEDGE_GRAB);
    false
}

pub fn act_special_triple_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::B_PRESSED) {
        return set_action(m, Action::Dive, 0);
    }
    if m.has_input(InputFlags::Z_PRESSED) {
        return set_action(m, Action::GroundPound, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Say(Voice::Yahoo));

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            // Bounces once before landing for good.
            let bounces = m.action_state;
            m.action_state += 1;
            if bounces == 0 {
                m.vel[1] = 42.0;
            } else {
                set_action(m, Action::FreefallLandStop, 0);
            }
            play_landing_sound(m, env);
        }
        AirStep::HitWall => bonk_reflection(m, env, true),
        _ => {}
    }

    if m.action_state == 0 || m.vel[1] > 0.0 {
        if set_anim(m, env, Animation::ForwardSpinning) == 0 {
            play_sound(m, env, Sound::Spin);
        }
    } else {
        set_anim(m, env, Animation::GeneralFall);
    }

    set_particles(m, env, ParticleFlags::SPARKLES);
    false
}

// ============================================================
// Ground pound
// ============================================================

pub fn act_ground_pound(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    play_sound_if_no_flag(m, env, Sound::Throw, ActorFlags::ACTION_SOUND_PLAYED);

    match m.phase::<GroundPoundPhase>() {
        GroundPoundPhase::Rise => {
            if m.action_timer < 10 {
                let y_offset = 20.0 - 2.0 * f32::from(m.action_timer);
                if m.pos[1] + y_offset + 160.0 < m.ceil_height {
                    m.pos[1] += y_offset;
                    m.peak_height = m.pos[1];
                    m.gfx.pos = m.pos;
                }
            }

            m.vel[1] = -50.0;
            set_forward_vel(m, 0.0);

            let anim = if m.action_arg == 0 {
                Animation::StartGroundPound
            } else {
                Animation::TripleJumpGroundPound
            };
            set_anim(m, env, anim);
            if m.action_timer == 0 {
                play_sound(m, env, Sound::Spin);
            }

            m.action_timer += 1;
            if i32::from(m.action_timer) >= i32::from(env.fx.anim_loop_end(m.slot)) + 4 {
                play_voice(m, env, Voice::GroundPoundWah);
                m.set_phase(GroundPoundPhase::Plunge);
            }
        }
        GroundPoundPhase::Plunge => {
            set_anim(m, env, Animation::GroundPound);

            match perform_air_step(m, env, AirStepCheck::empty()) {
                AirStep::Landed => {
                    if should_get_stuck_in_ground(m) {
                        queue_rumble(m, env, 5, 80);
                        play_voice(m, env, Voice::Oof);
                        set_particles(m, env, ParticleFlags::MIST_CIRCLE);
                        set_action(m, Action::ButtStuckInGround, 0);
                    } else {
                        let sound = Sound::TerrainHeavyLanding(m.terrain_sound);
                        play_heavy_landing_sound(m, env, sound);
                        if !check_fall_damage(m, env, Action::HardBackwardGroundKb) {
                            set_particles(m, env, ParticleFlags::MIST_CIRCLE | ParticleFlags::HORIZONTAL_STAR);
                            set_action(m, Action::GroundPoundLand, 0);
                        }
                    }
                    shake_camera(m, env, CameraShake::GroundPound);
                }
                AirStep::HitWall => {
                    let settings = env.settings;
                    if !(settings.fix_collision_bugs && settings.fix_ground_pound_bonks) {
                        set_forward_vel(m, -16.0);
                        stop_rising(m);
                        set_particles(m, env, ParticleFlags::VERTICAL_STAR);
                        set_action(m, Action::BackwardAirKb, 0);
                    }
                }
                _ => {}
            }
        }
    }
    false
}

// ============================================================
// Hazards
// ============================================================

pub fn act_burning_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let cue = if m.action_arg == 0 { VoiceCue::Jump } else { VoiceCue::None };
    play_terrain_jump(m, env, cue);

    let forward_vel = m.forward_vel;
    set_forward_vel(m, forward_vel);

    if perform_air_step(m, env, AirStepCheck::empty()) == AirStep::Landed {
        play_landing_sound(m, env);
        set_action(m, Action::BurningGround, 0);
    }

    let anim = if m.action_arg == 0 { Animation::SingleJump } else { Animation::FireLavaBurn };
    set_anim(m, env, anim);
    set_particles(m, env, ParticleFlags::FIRE);
    play_sound(m, env, Sound::LavaBurn);

    burn_health(m);
    reset_rumble(m, env);
    false
}

pub fn act_burning_fall(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let forward_vel = m.forward_vel;
    set_forward_vel(m, forward_vel);

    if perform_air_step(m, env, AirStepCheck::empty()) == AirStep::Landed {
        play_landing_sound(m, env);
        set_action(m, Action::BurningGround, 0);
    }

    set_anim(m, env, Animation::GeneralFall);
    set_particles(m, env, ParticleFlags::FIRE);

    burn_health(m);
    reset_rumble(m, env);
    false
}

pub fn act_lava_boost(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if !m.flags.contains(ActorFlags::VOICE_PLAYED) {
        play_voice_if_no_flag(m, env, Voice::OnFire, ActorFlags::VOICE_PLAYED);
        queue_rumble(m, env, 5, 80);
    }

    if !m.has_input(InputFlags::NONZERO_ANALOG) {
        m.forward_vel = approach_f32(m.forward_vel, 0.0, 0.35, 0.35);
    }

    update_lava_boost_or_twirling(m);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            let burning = m.floor.map_or(false, |f| f.surface_type == SurfaceType::Burning);
            if burning {
                m.action_state = 0;
                if !m.flags.contains(ActorFlags::METAL_CAP) {
                    let damage = if m.flags.contains(ActorFlags::CAP_ON_HEAD) { 12 } else { 18 };
                    m.hurt_counter = m.hurt_counter.saturating_add(damage);
                }
                m.vel[1] = 84.0;
                play_voice(m, env, Voice::OnFire);
                queue_rumble(m, env, 5, 80);
            } else {
                let sound = Sound::TerrainBodyHitGround(m.terrain_sound);
                play_heavy_landing_sound(m, env, sound);
                if m.action_state < 2 && m.vel[1] < 0.0 {
                    m.vel[1] = -m.vel[1] * 0.4;
                    let forward_vel = m.forward_vel * 0.5;
                    set_forward_vel(m, forward_vel);
                    m.action_state += 1;
                } else {
                    set_action(m, Action::LavaBoostLand, 0);
                }
            }
        }
        AirStep::HitWall => bonk_reflection(m, env, false),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    set_anim(m, env, Animation::FireLavaBurn);
    if m.terrain != TerrainType::Snow && !m.flags.contains(ActorFlags::METAL_CAP) && m.vel[1] > 0.0 {
        set_particles(m, env, ParticleFlags::FIRE);
        if m.action_state == 0 {
            play_sound(m, env, Sound::LavaBurn);
        }
    }

    if m.health < BURN_HEALTH_FLOOR {
        if !m.is_local {
            m.health = BURN_HEALTH_FLOOR;
        } else {
            if !env.hooks.allow_death(m) {
                reset_rumble(m, env);
                return false;
            }

            if env.objects.can_bubble(m) {
                m.health = BURN_HEALTH_FLOOR - 1;
                set_action(m, Action::Bubbled, 0);
            } else {
                env.objects.trigger_death_warp(m);
            }
        }
    }

    m.body.eyes_dead = true;
    reset_rumble(m, env);
    false
}

pub fn act_getting_blown(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    match m.phase::<GettingBlownPhase>() {
        GettingBlownPhase::PushedBack => {
            if m.forward_vel > -60.0 {
                m.forward_vel -= 6.0;
            } else {
                m.set_phase(GettingBlownPhase::Drifting);
            }
        }
        GettingBlownPhase::Drifting => {
            if m.forward_vel < -16.0 {
                m.forward_vel += 0.8;
            }
            if m.vel[1] < 0.0 && m.blown_gravity < 4.0 {
                m.blown_gravity += 0.05;
            }
        }
    }

    m.action_timer += 1;
    if m.action_timer == 20 {
        env.objects.blow_off_cap(m, 50.0);
    }

    let forward_vel = m.forward_vel;
    set_forward_vel(m, forward_vel);
    set_anim(m, env, Animation::BackwardAirKb);

    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            set_action(m, Action::HardBackwardAirKb, 0);
        }
        AirStep::HitWall => {
            set_anim(m, env, Animation::AirForwardKb);
            bonk_reflection(m, env, false);
            stop_rising(m);
            let reversed = -m.forward_vel;
            set_forward_vel(m, reversed);
        }
        _ => {}
    }
    false
}

pub fn act_crazy_box_bounce(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.action_timer == 0 {
        let min_speed = match m.action_arg {
            0 => {
                m.vel[1] = 45.0;
                32.0
            }
            1 => {
                m.vel[1] = 60.0;
                36.0
            }
            2 => {
                m.vel[1] = 100.0;
                48.0
            }
            _ => 32.0,
        };

        let sound = if min_speed < 40.0 { Sound::Boing1 } else { Sound::Boing2 };
        play_sound(m, env, sound);

        if m.forward_vel < min_speed {
            set_forward_vel(m, min_speed);
        }
        m.action_timer = 1;
    }

    play_terrain_jump(m, env, VoiceCue::Jump);
    set_anim(m, env, Animation::Dive);

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if m.action_arg < 2 {
                let next = m.action_arg + 1;
                set_action(m, Action::CrazyBoxBounce, next);
            } else {
                if m.held_object.is_some() && m.is_local {
                    env.objects.stop_riding(m);
                    m.held_object = None;
                }
                set_action(m, Action::StomachSlide, 0);
            }
            queue_rumble(m, env, 5, 80);
            set_particles(m, env, ParticleFlags::MIST_CIRCLE);
        }
        AirStep::HitWall => bonk_reflection(m, env, false),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    m.gfx.angle[0] = atan2s(m.forward_vel, -m.vel[1]);
    false
}

// ============================================================
// Knockback
// ============================================================

pub fn act_backward_air_kb(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if check_wall_kick(m) {
        return true;
    }

    play_knockback_sound(m, env);
    common_air_knockback_step(
        m,
        env,
        Action::BackwardGroundKb,
        Action::HardBackwardGroundKb,
        Animation::BackwardAirKb,
        -16.0,
    );
    false
}

pub fn act_forward_air_kb(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if check_wall_kick(m) {
        return true;
    }

    play_knockback_sound(m, env);
    common_air_knockback_step(
        m,
        env,
        Action::ForwardGroundKb,
        Action::HardForwardGroundKb,
        Animation::AirForwardKb,
        16.0,
    );
    false
}

pub fn act_hard_backward_air_kb(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    play_knockback_sound(m, env);
    common_air_knockback_step(
        m,
        env,
        Action::HardBackwardGroundKb,
        Action::HardBackwardGroundKb,
        Animation::BackwardAirKb,
        -16.0,
    );
    false
}

pub fn act_hard_forward_air_kb(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    play_knockback_sound(m, env);
    common_air_knockback_step(
        m,
        env,
        Action::HardForwardGroundKb,
        Action::HardForwardGroundKb,
        Animation::AirForwardKb,
        16.0,
    );
    false
}

pub fn act_thrown_backward(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let land_action = if m.action_arg != 0 { Action::HardBackwardGroundKb } else { Action::BackwardGroundKb };

    play_voice_if_no_flag(m, env, Voice::Waaaooow, ActorFlags::VOICE_PLAYED);
    let speed = m.forward_vel;
    common_air_knockback_step(m, env, land_action, Action::HardBackwardGroundKb, Animation::BackwardAirKb, speed);

    m.forward_vel *= 0.98;
    false
}

pub fn act_thrown_forward(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let land_action = if m.action_arg != 0 { Action::HardForwardGroundKb } else { Action::ForwardGroundKb };

    play_voice_if_no_flag(m, env, Voice::Waaaooow, ActorFlags::VOICE_PLAYED);
    let speed = m.forward_vel;
    let step =
        common_air_knockback_step(m, env, land_action, Action::HardForwardGroundKb, Animation::AirForwardKb, speed);
    if step == AirStep::None {
        let pitch = atan2s(m.forward_vel, -m.vel[1]).min(0x1800);
        m.gfx.angle[0] = pitch.wrapping_add(0x1800);
    }

    m.forward_vel *= 0.98;
    false
}

pub fn act_soft_bonk(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if check_wall_kick(m) {
        return true;
    }

    play_knockback_sound(m, env);
    let speed = m.forward_vel;
    common_air_knockback_step(
        m,
        env,
        Action::FreefallLand,
        Action::HardBackwardGroundKb,
        Animation::GeneralFall,
        speed,
    );
    false
}

/// Two-tick window after touching a wall in which jump kicks off it.
///
/// With `air_hit_wall_reentry` set, the first tick reports a transition
/// without changing action, so the dispatcher runs the handler a second time
/// in the same tick and the window closes a tick early.
pub fn act_air_hit_wall(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.held_object.is_some() {
        env.objects.drop_held_object(m);
    }

    m.action_timer += 1;
    if m.action_timer <= 2 {
        if m.has_input(InputFlags::A_PRESSED) {
            m.vel[1] = 52.0;
            turn_around(m);
            return set_action(m, Action::WallKickAir, 0);
        }
    } else if m.forward_vel >= 38.0 {
        m.wall_kick_timer = 5;
        stop_rising(m);
        set_particles(m, env, ParticleFlags::VERTICAL_STAR);
        return set_action(m, Action::BackwardAirKb, 0);
    } else {
        m.wall_kick_timer = 5;
        stop_rising(m);
        if m.forward_vel > 8.0 {
            set_forward_vel(m, -8.0);
        }
        return set_action(m, Action::SoftBonk, 0);
    }

    set_anim(m, env, Animation::StartWallKick);
    env.settings.air_hit_wall_reentry && m.action_timer == 1
}

// ============================================================
// Rollouts and slides
// ============================================================

fn rollout(m: &mut ActorState, env: &mut Env<'_>, spin_anim: Animation) {
    if m.phase::<RolloutPhase>() == RolloutPhase::Start {
        m.vel[1] = 30.0;
        m.set_phase(RolloutPhase::Spinning);
    }

    play_terrain_jump(m, env, VoiceCue::Jump);

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::None => {
            if m.phase::<RolloutPhase>() == RolloutPhase::Spinning {
                if set_anim(m, env, spin_anim) == 4 {
                    play_sound(m, env, Sound::Spin);
                }
            } else {
                set_anim(m, env, Animation::GeneralFall);
            }
        }
        AirStep::Landed => {
            set_action(m, Action::FreefallLandStop, 0);
            play_landing_sound(m, env);
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => set_forward_vel(m, 0.0),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
}

pub fn act_forward_rollout(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    rollout(m, env, Animation::ForwardSpinning);

    if m.phase::<RolloutPhase>() == RolloutPhase::Spinning && env.fx.is_anim_past_end(m.slot) {
        m.set_phase(RolloutPhase::Falling);
    }
    false
}

pub fn act_backward_rollout(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    rollout(m, env, Animation::BackwardSpinning);

    if m.phase::<RolloutPhase>() == RolloutPhase::Spinning && anim_frame(m, env) == 2 {
        m.set_phase(RolloutPhase::Falling);
    }
    false
}

/// Bounce a butt slide back up once if the floor is flat enough.
/// Returns true when it bounced instead of landing.
fn butt_slide_bounce(m: &mut ActorState) -> bool {
    let flat = m.floor.map_or(false, |f| f.normal[1] >= BUTT_SLIDE_BOUNCE_NORMAL_Y);
    if m.action_state == 0 && m.vel[1] < 0.0 && flat {
        m.vel[1] = -m.vel[1] / 2.0;
        m.action_state = 1;
        return true;
    }
    false
}

pub fn act_butt_slide_air(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    m.action_timer += 1;
    if m.action_timer > 30 && m.pos[1] - m.floor_height > 500.0 {
        return set_action(m, Action::Freefall, 1);
    }

    update_air_with_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if !butt_slide_bounce(m) {
                set_action(m, Action::ButtSlide, 0);
            }
            play_landing_sound(m, env);
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => {
            stop_rising(m);
            set_particles(m, env, ParticleFlags::VERTICAL_STAR);
            set_action(m, Action::BackwardAirKb, 0);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    set_anim(m, env, Animation::Slide);
    false
}

pub fn act_hold_butt_slide_air(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.interact_status.contains(InteractStatus::DROP_OBJECT) {
        return drop_and_set_action(m, env.objects, Action::HoldFreefall, 1);
    }

    m.action_timer += 1;
    if m.action_timer > 30 && m.pos[1] - m.floor_height > 500.0 {
        return set_action(m, Action::HoldFreefall, 1);
    }

    update_air_with_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if !butt_slide_bounce(m) {
                set_action(m, Action::HoldButtSlide, 0);
            }
            play_landing_sound(m, env);
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => {
            stop_rising(m);
            env.objects.drop_held_object(m);
            set_particles(m, env, ParticleFlags::VERTICAL_STAR);
            set_action(m, Action::BackwardAirKb, 0);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    set_anim(m, env, Animation::SlidingOnBottomWithLightObj);
    false
}

pub fn act_slide_kick(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.action_timer == 0 {
        play_terrain_jump(m, env, VoiceCue::Say(Voice::Hoohoo));
        set_anim(m, env, Animation::SlideKick);
    }

    m.action_timer += 1;
    if m.action_timer > 30 && m.pos[1] - m.floor_height > 500.0 {
        return set_action(m, Action::Freefall, 2);
    }

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::None => {
            if m.action_state == 0 {
                m.gfx.angle[0] = atan2s(m.forward_vel, -m.vel[1]).min(0x1800);
            }
        }
        AirStep::Landed => {
            if m.action_state == 0 && m.vel[1] < 0.0 {
                m.vel[1] = -m.vel[1] / 2.0;
                m.action_state = 1;
                m.action_timer = 0;
            } else {
                set_action(m, Action::SlideKickSlide, 0);
            }
            play_landing_sound(m, env);
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => {
            stop_rising(m);
            set_particles(m, env, ParticleFlags::VERTICAL_STAR);
            set_action(m, Action::BackwardAirKb, 0);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
    false
}

pub fn act_jump_kick(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.action_state == 0 {
        play_voice_if_no_flag(m, env, Voice::PunchHoo, ActorFlags::ACTION_SOUND_PLAYED);
        m.gfx.restart_anim = true;
        set_anim(m, env, Animation::AirKick);
        m.action_state = 1;
    }

    let frame = anim_frame(m, env);
    if frame == 0 {
        m.body.punch_state = (2 << 6) | 6;
    }
    if (0..8).contains(&frame) {
        m.flags.insert(ActorFlags::KICKING);
    }

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if !check_fall_damage_or_get_stuck(m, env, Action::HardBackwardGroundKb) {
                set_action(m, Action::FreefallLand, 0);
            }
        }
        AirStep::HitWall if !bounced_off_bounds(m, env) => set_forward_vel(m, 0.0),
        _ => {}
    }
    false
}

// ============================================================
// Cannon, flight and wind
// ============================================================

pub fn act_shot_from_cannon(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.is_local && env.fx.camera_mode(m.slot) != CameraMode::BehindActor {
        env.fx.camera_event(m.slot, CameraEvent::ShotFromCannon);
    }

    let forward_vel = m.forward_vel;
    set_forward_vel(m, forward_vel);
    play_voice_if_no_flag(m, env, Voice::Yahoo, ActorFlags::VOICE_PLAYED);

    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::None => {
            set_anim(m, env, Animation::AirborneOnStomach);
            m.face_angle[0] = atan2s(m.forward_vel, m.vel[1]);
            m.gfx.angle[0] = m.face_angle[0].wrapping_neg();
        }
        AirStep::Landed => {
            set_action(m, Action::DiveSlide, 0);
            m.face_angle[0] = 0;
            restore_default_camera(m, env);
            queue_rumble(m, env, 5, 80);
        }
        AirStep::HitWall => {
            set_forward_vel(m, -16.0);
            m.face_angle[0] = 0;
            stop_rising(m);
            set_particles(m, env, ParticleFlags::VERTICAL_STAR);
            set_action(m, Action::BackwardAirKb, 0);
            restore_default_camera(m, env);
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    if m.flags.contains(ActorFlags::WING_CAP) && m.vel[1] < 0.0 {
        set_action(m, Action::Flying, 0);
    }

    m.forward_vel -= 0.05;
    if m.forward_vel < 10.0 {
        set_forward_vel(m, 10.0);
    }

    if m.vel[1] > 0.0 {
        set_particles(m, env, ParticleFlags::DUST);
    }

    reset_rumble(m, env);
    false
}

pub fn act_flying(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let start_pitch = m.face_angle[0];

    if m.has_input(InputFlags::Z_PRESSED) {
        restore_default_camera(m, env);
        return set_action(m, Action::GroundPound, 1);
    }

    if !m.flags.contains(ActorFlags::WING_CAP) {
        restore_default_camera(m, env);
        return set_action(m, Action::Freefall, 0);
    }

    use_behind_camera(m, env);

    if m.phase::<IntroPhase>() == IntroPhase::Intro {
        if m.action_arg == 0 {
            set_anim(m, env, Animation::FlyFromCannon);
        } else {
            set_anim(m, env, Animation::ForwardSpinningFlip);
            if anim_frame(m, env) == 1 {
                play_sound(m, env, Sound::Spin);
            }
        }

        if env.fx.is_anim_at_end(m.slot) {
            // Arg 2 is flight entered at level start.
            if m.action_arg == 2 {
                if m.is_local {
                    env.fx.show_level_intro_text(m.slot);
                }
                m.action_arg = 1;
            }

            set_anim(m, env, Animation::WingCapFly);
            m.set_phase(IntroPhase::Looping);
        }
    }

    update_flying(m);

    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::None => {
            m.gfx.angle[0] = m.face_angle[0].wrapping_neg();
            m.gfx.angle[2] = m.face_angle[2];
            m.action_timer = 0;
        }
        AirStep::Landed => {
            set_action(m, Action::DiveSlide, 0);
            set_anim(m, env, Animation::Dive);
            env.fx.set_anim_to_frame(m.slot, 7);
            m.face_angle[0] = 0;
            restore_default_camera(m, env);
            queue_rumble(m, env, 5, 60);
        }
        AirStep::HitWall => {
            if m.wall.is_some() {
                set_forward_vel(m, -16.0);
                m.face_angle[0] = 0;
                stop_rising(m);

                let sound = if m.flags.contains(ActorFlags::METAL_CAP) { Sound::MetalBonk } else { Sound::Bonk };
                play_sound(m, env, sound);
                set_particles(m, env, ParticleFlags::VERTICAL_STAR);
                set_action(m, Action::BackwardAirKb, 0);
                restore_default_camera(m, env);
            } else {
                // Scraping along a ceiling: dip the nose and keep flying.
                if m.action_timer == 0 {
                    play_sound(m, env, Sound::Hit);
                }
                m.action_timer += 1;
                if m.action_timer == 30 {
                    m.action_timer = 0;
                }

                m.face_angle[0] = m.face_angle[0].saturating_sub(0x200).max(-DIVE_PITCH_LIMIT);
                m.gfx.angle[0] = m.face_angle[0].wrapping_neg();
                m.gfx.angle[2] = m.face_angle[2];
            }
        }
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }

    if m.face_angle[0] > 0x800 && m.forward_vel >= 48.0 {
        set_particles(m, env, ParticleFlags::DUST);
    }

    if start_pitch <= 0 && m.face_angle[0] > 0 && m.forward_vel >= 48.0 {
        play_sound(m, env, Sound::FlyingFast);
        let cheer = Voice::YahooWahaYippee(m.next_voice_variant(5));
        play_voice(m, env, cheer);
        queue_rumble(m, env, 50, 40);
    }

    play_sound(m, env, Sound::Flying);
    false
}

pub fn act_flying_triple_jump(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.has_input(InputFlags::B_PRESSED | InputFlags::Z_PRESSED) {
        restore_default_camera(m, env);
        let action = if m.has_input(InputFlags::B_PRESSED) { Action::Dive } else { Action::GroundPound };
        return set_action(m, action, 0);
    }

    play_terrain_jump(m, env, VoiceCue::Say(Voice::Yahoo));

    if m.phase::<IntroPhase>() == IntroPhase::Intro {
        set_anim(m, env, Animation::TripleJumpFly);
        if anim_frame(m, env) == 7 {
            play_sound(m, env, Sound::Spin);
        }

        if env.fx.is_anim_past_end(m.slot) {
            set_anim(m, env, Animation::ForwardSpinning);
            queue_rumble(m, env, 8, 80);
            m.set_phase(IntroPhase::Looping);
        }
    }

    if m.phase::<IntroPhase>() == IntroPhase::Looping && anim_frame(m, env) == 1 {
        play_sound(m, env, Sound::Spin);
    }

    // Near the apex the jump turns into flight, but this tick still finishes
    // as a jump.
    if m.vel[1] < 4.0 {
        use_behind_camera(m, env);
        if m.forward_vel < 32.0 {
            set_forward_vel(m, 32.0);
        }
        set_action(m, Action::Flying, 1);
    }

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            if !check_fall_damage_or_get_stuck(m, env, Action::HardBackwardGroundKb) {
                set_action(m, Action::DoubleJumpLand, 0);
            }
        }
        AirStep::HitWall => bonk_reflection(m, env, false),
        AirStep::HitLavaWall => {
            lava_boost_on_wall(m, env);
        }
        _ => {}
    }
    false
}

/// Hangs from a hoot for as long as jump is held.
pub fn act_riding_hoot(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let hoot = match m.used_object {
        Some(used) if used.is_hoot => used,
        _ => match env.objects.nearest_hoot(m) {
            Some(hoot) => {
                m.used_object = Some(hoot);
                hoot
            }
            None => return false,
        },
    };

    if !m.has_input(InputFlags::A_DOWN) || m.interact_status.contains(InteractStatus::RELEASE_HOOT) {
        let global_timer = env.global_timer;
        env.objects.release_hoot(m, global_timer);
        if let Some(used) = m.used_object.as_mut() {
            used.release_time = Some(global_timer);
        }

        play_voice_if_no_flag(m, env, Voice::Uh, ActorFlags::VOICE_PLAYED);
        queue_rumble(m, env, 4, 40);
        return set_action(m, Action::Freefall, 0);
    }

    m.pos = [hoot.pos[0], hoot.pos[1] - 92.5, hoot.pos[2]];
    m.face_angle[1] = ANGLE_QUARTER.wrapping_sub(hoot.move_yaw);

    if m.phase::<IntroPhase>() == IntroPhase::Intro {
        set_anim(m, env, Animation::HangOnCeiling);
        if env.fx.is_anim_at_end(m.slot) {
            set_anim(m, env, Animation::HangOnOwl);
            m.set_phase(IntroPhase::Looping);
        }
    }

    m.vel = [0.0; 3];
    m.gfx.pos = m.pos;
    m.gfx.angle = [0, ANGLE_QUARTER.wrapping_sub(m.face_angle[1]), 0];
    false
}

pub fn act_vertical_wind(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    let intended_dyaw = m.input.intended_yaw.wrapping_sub(m.face_angle[1]);
    let intended_mag = m.input.intended_mag / 32.0;

    play_voice_if_no_flag(m, env, Voice::HereWeGo, ActorFlags::VOICE_PLAYED);

    if m.phase::<IntroPhase>() == IntroPhase::Intro {
        set_anim(m, env, Animation::ForwardSpinningFlip);
        if anim_frame(m, env) == 1 {
            play_sound(m, env, Sound::Spin);
            queue_rumble(m, env, 8, 80);
        }

        if env.fx.is_anim_past_end(m.slot) {
            m.set_phase(IntroPhase::Looping);
        }
    } else {
        set_anim(m, env, Animation::AirborneOnStomach);
    }

    update_air_without_turn(m, env);
    match perform_air_step(m, env, AirStepCheck::empty()) {
        AirStep::Landed => {
            set_action(m, Action::DiveSlide, 0);
        }
        AirStep::HitWall => set_forward_vel(m, -16.0),
        _ => {}
    }

    // Tilt the body with the stick.
    m.gfx.angle[0] = angle_from_f32(6144.0 * intended_mag * coss(intended_dyaw));
    m.gfx.angle[2] = angle_from_f32(-4096.0 * intended_mag * sins(intended_dyaw));
    false
}

/// Handlers for every airborne action, in `Action` order.
pub const AIRBORNE_HANDLERS: &[(Action, ActionFn)] = &[
    (Action::Jump, act_jump),
    (Action::DoubleJump, act_double_jump),
    (Action::TripleJump, act_triple_jump),
    (Action::Backflip, act_backflip),
    (Action::Freefall, act_freefall),
    (Action::HoldJump, act_hold_jump),
    (Action::HoldFreefall, act_hold_freefall),
    (Action::SideFlip, act_side_flip),
    (Action::WallKickAir, act_wall_kick_air),
    (Action::Twirling, act_twirling),
    (Action::WaterJump, act_water_jump),
    (Action::HoldWaterJump, act_hold_water_jump),
    (Action::SteepJump, act_steep_jump),
    (Action::BurningJump, act_burning_jump),
    (Action::BurningFall, act_burning_fall),
    (Action::LongJump, act_long_jump),
    (Action::RidingShellJump, act_riding_shell_air),
    (Action::RidingShellFall, act_riding_shell_air),
    (Action::Dive, act_dive),
    (Action::AirThrow, act_air_throw),
    (Action::BackwardAirKb, act_backward_air_kb),
    (Action::ForwardAirKb, act_forward_air_kb),
    (Action::HardForwardAirKb, act_hard_forward_air_kb),
    (Action::HardBackwardAirKb, act_hard_backward_air_kb),
    (Action::SoftBonk, act_soft_bonk),
    (Action::AirHitWall, act_air_hit_wall),
    (Action::ForwardRollout, act_forward_rollout),
    (Action::BackwardRollout, act_backward_rollout),
    (Action::ShotFromCannon, act_shot_from_cannon),
    (Action::ButtSlideAir, act_butt_slide_air),
    (Action::HoldButtSlideAir, act_hold_butt_slide_air),
    (Action::LavaBoost, act_lava_boost),
    (Action::GettingBlown, act_getting_blown),
    (Action::CrazyBoxBounce, act_crazy_box_bounce),
    (Action::SpecialTripleJump, act_special_triple_jump),
    (Action::GroundPound, act_ground_pound),
    (Action::ThrownForward, act_thrown_forward),
    (Action::ThrownBackward, act_thrown_backward),
    (Action::FlyingTripleJump, act_flying_triple_jump),
    (Action::SlideKick, act_slide_kick),
    (Action::JumpKick, act_jump_kick),
    (Action::Flying, act_flying),
    (Action::RidingHoot, act_riding_hoot),
    (Action::TopOfPoleJump, act_top_of_pole_jump),
    (Action::VerticalWind, act_vertical_wind),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{HeldObject, UsedObject};
    use crate::fx::{FxEvent, RecordingPresentation};
    use crate::hooks::NoHooks;
    use crate::objects::DefaultObjects;
    use hopcore_common::collision_map::{CollisionMap, WallSegment};
    use hopcore_common::cvar::PhysicsSettings;
    use hopcore_common::shared::Vec3;

    struct Rig {
        map: CollisionMap,
        settings: PhysicsSettings,
        fx: RecordingPresentation,
        objects: DefaultObjects,
    }

    impl Rig {
        fn new(map: CollisionMap) -> Self {
            Self {
                map,
                settings: PhysicsSettings::default(),
                fx: RecordingPresentation::new(),
                objects: DefaultObjects,
            }
        }

        fn run(&mut self, m: &mut ActorState, handler: ActionFn) -> bool {
            let mut env = Env::new(&self.map, &NoHooks, &mut self.fx, &mut self.objects, &self.settings);
            handler(m, &mut env)
        }
    }

    fn airborne(action: Action, pos: Vec3, vel: Vec3) -> ActorState {
        let mut m = ActorState::new(0).with_position(pos);
        m.action = action;
        m.vel = vel;
        m.ceil_height = 20000.0;
        m
    }

    /// Floor at 0 with a wall at x = 100 facing -x.
    fn wall_map() -> CollisionMap {
        CollisionMap::flat(0.0, SurfaceType::Default)
            .with_wall(WallSegment::new([100.0, 100.0], [100.0, -100.0], 0.0, 1000.0, SurfaceType::Default))
    }

    #[test]
    fn test_handler_table_covers_airborne_group() {
        for action in Action::ALL.iter().filter(|a| a.is_airborne_group()) {
            let count = AIRBORNE_HANDLERS.iter().filter(|(a, _)| a == action).count();
            assert_eq!(count, 1, "{:?}", action);
        }
        assert_eq!(AIRBORNE_HANDLERS.len(), 45);
    }

    #[test]
    fn test_jump_lands() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::Jump, [0.0, 5.0, 0.0], [0.0, -10.0, 0.0]);

        assert!(!rig.run(&mut m, act_jump));
        assert_eq!(m.action, Action::JumpLand);
        assert_eq!(m.pos[1], 0.0);
    }

    #[test]
    fn test_jump_dive_skips_step() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::Jump, [0.0, 300.0, 0.0], [0.0, 10.0, 0.0]);
        m.forward_vel = 40.0;
        m.input.buttons = InputFlags::B_PRESSED;

        assert!(rig.run(&mut m, act_jump));
        assert_eq!(m.action, Action::Dive);
        assert_eq!(m.pos, [0.0, 300.0, 0.0]);
        assert_eq!(m.forward_vel, 48.0);
    }

    #[test]
    fn test_jump_into_wall_bonks() {
        let mut rig = Rig::new(wall_map());
        let mut m = airborne(Action::Jump, [50.0, 300.0, 0.0], [0.0, 0.0, 0.0]);
        m.face_angle[1] = ANGLE_QUARTER;
        m.forward_vel = 40.0;

        rig.run(&mut m, act_jump);
        assert_eq!(m.action, Action::AirHitWall);
        assert!(m.wall.is_some());
        assert!(m.pos[0] <= 50.0);
        assert!(rig.fx.contains(&FxEvent::Sound(Sound::Bonk)));
    }

    #[test]
    fn test_slow_wall_touch_stops() {
        let mut rig = Rig::new(wall_map());
        let mut m = airborne(Action::Jump, [50.0, 300.0, 0.0], [0.0, 0.0, 0.0]);
        m.face_angle[1] = ANGLE_QUARTER;
        m.forward_vel = 10.0;

        rig.run(&mut m, act_jump);
        assert_eq!(m.action, Action::Jump);
        assert!(m.wall.is_some());
        assert_eq!(m.forward_vel, 0.0);
    }

    #[test]
    fn test_air_hit_wall_reenters_once() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::AirHitWall, [0.0, 300.0, 0.0], [0.0, 0.0, 0.0]);

        assert!(rig.run(&mut m, act_air_hit_wall));
        assert_eq!(m.action, Action::AirHitWall);
        assert!(!rig.run(&mut m, act_air_hit_wall));
        assert_eq!(m.action_timer, 2);

        // Window over, no speed: soft bonk.
        assert!(rig.run(&mut m, act_air_hit_wall));
        assert_eq!(m.action, Action::SoftBonk);
        assert_eq!(m.wall_kick_timer, 5);
    }

    #[test]
    fn test_air_hit_wall_without_reentry() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        rig.settings.air_hit_wall_reentry = false;
        let mut m = airborne(Action::AirHitWall, [0.0, 300.0, 0.0], [0.0, 0.0, 0.0]);

        assert!(!rig.run(&mut m, act_air_hit_wall));
        assert_eq!(m.action_timer, 1);
    }

    #[test]
    fn test_air_hit_wall_kick() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::AirHitWall, [0.0, 300.0, 0.0], [0.0, -20.0, 0.0]);
        m.face_angle[1] = ANGLE_QUARTER;
        m.input.buttons = InputFlags::A_PRESSED;
        m.held_object = Some(HeldObject { id: 4, holdable_npc: false });

        assert!(rig.run(&mut m, act_air_hit_wall));
        assert_eq!(m.action, Action::WallKickAir);
        assert_eq!(m.face_angle[1], ANGLE_QUARTER.wrapping_add(ANGLE_HALF));
        assert_eq!(m.vel[1], 62.0);
        assert_eq!(m.forward_vel, 24.0);
        assert_eq!(m.held_object, None);
    }

    #[test]
    fn test_knockback_forces_speed() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::BackwardAirKb, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        m.forward_vel = 30.0;

        rig.run(&mut m, act_backward_air_kb);
        assert_eq!(m.forward_vel, -16.0);
        // Sound is picked from the speed before the knockback took over.
        assert_eq!(rig.fx.voices().next(), Some(Voice::Doh));
    }

    #[test]
    fn test_knockback_timer_rearms() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::ForwardAirKb, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        m.forward_vel = 30.0;
        m.knockback_timer = 3;

        rig.run(&mut m, act_forward_air_kb);
        assert_eq!(m.knockback_timer, KNOCKBACK_TIMER_DEFAULT);
        assert_eq!(m.forward_vel, 30.0);
    }

    #[test]
    fn test_thrown_landing_passes_hurt_counter() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::ThrownForward, [0.0, 5.0, 0.0], [0.0, -10.0, 0.0]);
        m.hurt_counter = 6;

        rig.run(&mut m, act_thrown_forward);
        assert_eq!(m.action, Action::ForwardGroundKb);
        assert_eq!(m.action_arg, 6);
    }

    #[test]
    fn test_ground_pound_rise_then_plunge() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::GroundPound, [0.0, 500.0, 0.0], [0.0, 0.0, 0.0]);

        for _ in 0..4 {
            rig.run(&mut m, act_ground_pound);
        }
        assert_eq!(m.phase::<GroundPoundPhase>(), GroundPoundPhase::Plunge);
        assert_eq!(m.pos[1], 500.0 + 20.0 + 18.0 + 16.0 + 14.0);
        assert_eq!(m.peak_height, m.pos[1]);
        assert_eq!(rig.fx.voices().last(), Some(Voice::GroundPoundWah));

        rig.run(&mut m, act_ground_pound);
        assert_eq!(m.pos[1], 518.0);
        assert_eq!(m.vel[1], -54.0);
    }

    #[test]
    fn test_ground_pound_landing() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::GroundPound, [0.0, 20.0, 0.0], [0.0, -50.0, 0.0]);
        m.set_phase(GroundPoundPhase::Plunge);

        rig.run(&mut m, act_ground_pound);
        assert_eq!(m.action, Action::GroundPoundLand);
        assert!(rig.fx.contains(&FxEvent::Shake(CameraShake::GroundPound)));
    }

    #[test]
    fn test_burning_jump_drains_health() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::BurningJump, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        m.health = 0x105;

        rig.run(&mut m, act_burning_jump);
        assert_eq!(m.health, 0xFF);
        assert_eq!(m.burn_timer, 3);

        let mut remote = airborne(Action::BurningFall, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        remote.is_local = false;
        remote.health = 0x105;
        rig.run(&mut remote, act_burning_fall);
        assert_eq!(remote.health, 0x100);
    }

    #[test]
    fn test_lava_boost_bounces_then_lands() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::LavaBoost, [0.0, 5.0, 0.0], [0.0, -20.0, 0.0]);

        rig.run(&mut m, act_lava_boost);
        assert_eq!(m.action, Action::LavaBoost);
        assert_eq!(m.action_state, 1);
        // 20 * 0.4 up, then lava-boost gravity.
        assert_eq!(m.vel[1], 8.0 - 3.2);
        assert!(m.body.eyes_dead);
    }

    #[test]
    fn test_getting_blown_builds_backwards_speed() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::GettingBlown, [0.0, 5000.0, 0.0], [0.0, 0.0, 0.0]);

        for _ in 0..10 {
            rig.run(&mut m, act_getting_blown);
        }
        assert_eq!(m.forward_vel, -60.0);
        assert_eq!(m.phase::<GettingBlownPhase>(), GettingBlownPhase::PushedBack);

        rig.run(&mut m, act_getting_blown);
        assert_eq!(m.phase::<GettingBlownPhase>(), GettingBlownPhase::Drifting);
    }

    #[test]
    fn test_flying_without_wing_cap_falls() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::Flying, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        m.flags.remove(ActorFlags::WING_CAP);

        assert!(rig.run(&mut m, act_flying));
        assert_eq!(m.action, Action::Freefall);
    }

    #[test]
    fn test_flying_switches_camera() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::Flying, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        m.flags.insert(ActorFlags::WING_CAP);
        m.forward_vel = 40.0;

        assert!(!rig.run(&mut m, act_flying));
        assert_eq!(rig.fx.camera, CameraMode::BehindActor);
        assert!(rig.fx.contains(&FxEvent::Sound(Sound::Flying)));
    }

    #[test]
    fn test_riding_hoot_follows_and_releases() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::RidingHoot, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        m.used_object = Some(UsedObject {
            id: 9,
            pos: [10.0, 500.0, 20.0],
            move_yaw: 0,
            is_hoot: true,
            release_time: None,
        });
        m.input.buttons = InputFlags::A_DOWN;

        assert!(!rig.run(&mut m, act_riding_hoot));
        assert_eq!(m.pos, [10.0, 407.5, 20.0]);
        assert_eq!(m.face_angle[1], ANGLE_QUARTER);

        m.input.buttons = InputFlags::empty();
        assert!(rig.run(&mut m, act_riding_hoot));
        assert_eq!(m.action, Action::Freefall);
        assert_eq!(m.used_object.and_then(|u| u.release_time), Some(0));
    }

    #[test]
    fn test_hold_jump_cannot_throw_npc() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::HoldJump, [0.0, 1000.0, 0.0], [0.0, 0.0, 0.0]);
        m.held_object = Some(HeldObject { id: 2, holdable_npc: true });
        m.input.buttons = InputFlags::B_PRESSED;

        assert!(!rig.run(&mut m, act_hold_jump));
        assert_eq!(m.action, Action::HoldJump);

        m.held_object = Some(HeldObject { id: 2, holdable_npc: false });
        assert!(rig.run(&mut m, act_hold_jump));
        assert_eq!(m.action, Action::AirThrow);
    }

    #[test]
    fn test_air_throw_releases_on_fourth_tick() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::AirThrow, [0.0, 5000.0, 0.0], [0.0, 0.0, 0.0]);
        m.held_object = Some(HeldObject { id: 2, holdable_npc: false });

        for _ in 0..3 {
            rig.run(&mut m, act_air_throw);
        }
        assert!(m.held_object.is_some());
        rig.run(&mut m, act_air_throw);
        assert_eq!(m.held_object, None);
    }

    #[test]
    fn test_crazy_box_chain() {
        let mut rig = Rig::new(CollisionMap::flat(0.0, SurfaceType::Default));
        let mut m = airborne(Action::CrazyBoxBounce, [0.0, 5.0, 0.0], [0.0, 0.0, 0.0]);
        m.action_arg = 1;
        m.action_timer = 1;
        m.vel[1] = -20.0;

        rig.run(&mut m, act_crazy_box_bounce);
        assert_eq!(m.action, Action::CrazyBoxBounce);
        assert_eq!(m.action_arg, 2);

        rig.run(&mut m, act_crazy_box_bounce);
        assert_eq!(m.vel[1], 100.0 - 4.0);
        assert!(m.forward_vel >= 47.0);
    }
}
