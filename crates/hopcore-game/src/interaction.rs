// interaction.rs — Helpers shared by action handlers: effects, damage, and checks

use hopcore_common::shared::ANGLE_HALF;
use hopcore_common::surface::{FloorClass, SurfaceType};

use crate::actions::{Action, ActionFlags};
use crate::actor::{ActorFlags, ActorState, InputFlags, TerrainType};
use crate::env::Env;
use crate::fx::{Animation, CameraMode, CameraShake, ParticleFlags, Sound, TerrainSound, Voice};
use crate::hooks::HazardType;
use crate::movement::set_forward_vel;
use crate::transition::{drop_and_set_action, set_action};

/// Peak-to-current drop that plays the long-fall scream.
pub const FAR_FALL_HEIGHT: f32 = 1150.0;

const HARD_FALL_HEIGHT: f32 = 3000.0;
const STUCK_IN_GROUND_HEIGHT: f32 = 1000.0;

// ============================================================
// Presentation helpers
// ============================================================

/// Returns the local camera to its default mode after a scripted shot.
pub fn restore_default_camera(m: &ActorState, env: &mut Env<'_>) {
    if m.is_local && env.fx.camera_mode(m.slot) != CameraMode::Default {
        env.fx.set_camera_mode(m.slot, CameraMode::Default);
    }
}

/// Rumble is felt only by the local player.
pub fn queue_rumble(m: &ActorState, env: &mut Env<'_>, time: u8, level: u8) {
    if m.is_local {
        env.fx.queue_rumble(m.slot, time, level);
    }
}

pub fn reset_rumble(m: &ActorState, env: &mut Env<'_>) {
    if m.is_local {
        env.fx.reset_rumble(m.slot);
    }
}

pub fn shake_camera(m: &ActorState, env: &mut Env<'_>, shake: CameraShake) {
    if m.is_local {
        env.fx.shake_camera(m.slot, shake);
    }
}

pub fn set_particles(m: &ActorState, env: &mut Env<'_>, particles: ParticleFlags) {
    env.fx.set_particles(m.slot, particles);
}

/// Sets the actor's animation, restarting it if an entry rule asked for a
/// restart. Returns the current frame.
pub fn set_anim(m: &mut ActorState, env: &mut Env<'_>, anim: Animation) -> i16 {
    if m.gfx.restart_anim {
        env.fx.restart_animation(m.slot);
        m.gfx.restart_anim = false;
    }
    env.fx.set_animation(m.slot, anim);
    env.fx.anim_frame(m.slot)
}

#[inline]
pub fn anim_frame(m: &ActorState, env: &Env<'_>) -> i16 {
    env.fx.anim_frame(m.slot)
}

pub fn play_sound(m: &ActorState, env: &mut Env<'_>, sound: Sound) {
    env.fx.play_sound(m.slot, sound);
}

pub fn play_voice(m: &ActorState, env: &mut Env<'_>, voice: Voice) {
    env.fx.play_voice(m.slot, voice);
}

/// Plays `sound` unless `flag` is already latched, then latches it.
pub fn play_sound_if_no_flag(m: &mut ActorState, env: &mut Env<'_>, sound: Sound, flag: ActorFlags) {
    if !m.flags.contains(flag) {
        env.fx.play_sound(m.slot, sound);
        m.flags.insert(flag);
    }
}

/// Plays `voice` unless `flag` is already latched, then latches it.
pub fn play_voice_if_no_flag(m: &mut ActorState, env: &mut Env<'_>, voice: Voice, flag: ActorFlags) {
    if !m.flags.contains(flag) {
        env.fx.play_voice(m.slot, voice);
        m.flags.insert(flag);
    }
}

/// Voice line accompanying an action sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceCue {
    None,
    /// A random jump grunt.
    Jump,
    Say(Voice),
}

/// Terrain jump sound under the actor's current floor.
#[inline]
pub fn terrain_jump(m: &ActorState) -> Sound {
    Sound::TerrainJump(m.terrain_sound)
}

/// Plays an action sound and voice cue, each at most once per action.
pub fn play_actor_sound(m: &mut ActorState, env: &mut Env<'_>, sound: Sound, cue: VoiceCue) {
    let sound = match sound {
        Sound::TerrainJump(_) if m.flags.contains(ActorFlags::METAL_CAP) => Sound::MetalJump,
        Sound::TerrainJump(TerrainSound::Water) => Sound::WaterJump,
        other => other,
    };
    play_sound_if_no_flag(m, env, sound, ActorFlags::ACTION_SOUND_PLAYED);

    match cue {
        VoiceCue::None => {}
        VoiceCue::Jump => play_jump_sound(m, env),
        VoiceCue::Say(voice) => play_voice_if_no_flag(m, env, voice, ActorFlags::VOICE_PLAYED),
    }
}

pub fn play_jump_sound(m: &mut ActorState, env: &mut Env<'_>) {
    if m.flags.contains(ActorFlags::VOICE_PLAYED) {
        return;
    }

    let voice = if m.action == Action::TripleJump {
        Voice::YahooWahaYippee(m.next_voice_variant(5))
    } else {
        Voice::YahWahHoo(m.next_voice_variant(3))
    };
    env.fx.play_voice(m.slot, voice);
    m.flags.insert(ActorFlags::VOICE_PLAYED);
}

pub fn play_landing_sound(m: &mut ActorState, env: &mut Env<'_>) {
    let sound = if m.flags.contains(ActorFlags::METAL_CAP) {
        Sound::MetalLanding
    } else {
        Sound::TerrainLanding(m.terrain_sound)
    };
    play_sound_if_no_flag(m, env, sound, ActorFlags::ACTION_SOUND_PLAYED);
}

pub fn play_heavy_landing_sound(m: &ActorState, env: &mut Env<'_>, sound: Sound) {
    let sound = if m.flags.contains(ActorFlags::METAL_CAP) { Sound::MetalHeavyLanding } else { sound };
    env.fx.play_sound(m.slot, sound);
}

/// Screams once per fall when the drop from peak height gets long.
pub fn play_far_fall_sound(m: &mut ActorState, env: &mut Env<'_>) {
    if m.action.flags().contains(ActionFlags::INVULNERABLE)
        || m.action == Action::Twirling
        || m.action == Action::Flying
        || m.flags.contains(ActorFlags::FALL_SOUND_PLAYED)
    {
        return;
    }

    if m.peak_height - m.pos[1] > FAR_FALL_HEIGHT {
        env.fx.play_voice(m.slot, Voice::Waaaooow);
        m.flags.insert(ActorFlags::FALL_SOUND_PLAYED);
    }
}

pub fn play_knockback_sound(m: &mut ActorState, env: &mut Env<'_>) {
    let voice = if m.action_arg == 0 && (m.forward_vel <= -28.0 || m.forward_vel >= 28.0) {
        Voice::Doh
    } else {
        Voice::Uh
    };
    play_voice_if_no_flag(m, env, voice, ActorFlags::VOICE_PLAYED);
}

/// Spin whoosh on any of the given animation frames.
pub fn play_flip_sounds(m: &ActorState, env: &mut Env<'_>, frames: [i16; 3]) {
    let frame = env.fx.anim_frame(m.slot);
    if frames.contains(&frame) {
        env.fx.play_sound(m.slot, Sound::Spin);
    }
}

// ============================================================
// Wall and floor reactions
// ============================================================

/// Reflects the facing off the referenced wall, then either reverses speed
/// or turns around.
pub fn bonk_reflection(m: &mut ActorState, env: &mut Env<'_>, negate_speed: bool) {
    if let Some(wall) = m.wall {
        let wall_angle = wall.normal_yaw();
        m.face_angle[1] = wall_angle.wrapping_sub(m.face_angle[1].wrapping_sub(wall_angle));

        let sound = if m.flags.contains(ActorFlags::METAL_CAP) { Sound::MetalBonk } else { Sound::Bonk };
        env.fx.play_sound(m.slot, sound);
    } else {
        env.fx.play_sound(m.slot, Sound::Hit);
    }

    if negate_speed {
        let reversed = -m.forward_vel;
        set_forward_vel(m, reversed);
    } else {
        m.face_angle[1] = m.face_angle[1].wrapping_add(ANGLE_HALF);
    }
}

/// Launches the actor off a lava wall. Returns true if it transitioned.
pub fn lava_boost_on_wall(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if !env.hooks.allow_hazard_surface(m, HazardType::LavaWall) {
        return false;
    }

    if let Some(wall) = m.wall {
        m.face_angle[1] = wall.normal_yaw();
    }

    if m.forward_vel < 24.0 {
        m.forward_vel = 24.0;
    }

    if !m.flags.contains(ActorFlags::METAL_CAP) {
        let damage = if m.flags.contains(ActorFlags::CAP_ON_HEAD) { 12 } else { 18 };
        m.hurt_counter = m.hurt_counter.saturating_add(damage);
    }

    env.fx.play_voice(m.slot, Voice::OnFire);
    restore_default_camera(m, env);
    drop_and_set_action(m, env.objects, Action::LavaBoost, 1)
}

/// Slipperiness of the floor under the actor, with slide terrain promoting
/// ordinary floors to very slippery.
pub fn floor_class(m: &ActorState) -> FloorClass {
    let class = m.floor.map_or(FloorClass::Default, |f| f.surface_type.floor_class());
    if class == FloorClass::Default && m.terrain == TerrainType::Slide {
        FloorClass::VerySlippery
    } else {
        class
    }
}

pub fn floor_is_slippery(m: &ActorState) -> bool {
    let Some(floor) = m.floor else {
        return false;
    };

    if m.terrain == TerrainType::Slide && floor.normal[1] < 0.999_847_7 {
        return true;
    }

    let normal_y = match floor_class(m) {
        FloorClass::VerySlippery => 0.984_807_7,
        FloorClass::Slippery => 0.939_692_6,
        FloorClass::Default => 0.788_010_8,
        FloorClass::NotSlippery => 0.0,
    };

    floor.normal[1] <= normal_y
}

/// Applies landing damage for long falls. Returns true if the actor was
/// sent to `hard_fall_action`; shorter damaging falls only hurt and squish.
pub fn check_fall_damage(m: &mut ActorState, env: &mut Env<'_>, hard_fall_action: Action) -> bool {
    let fall_height = m.peak_height - m.pos[1];

    let Some(floor) = m.floor else {
        return false;
    };
    if m.action == Action::Twirling || floor.surface_type == SurfaceType::Burning || m.vel[1] >= -55.0 {
        return false;
    }

    let cap_on_head = m.flags.contains(ActorFlags::CAP_ON_HEAD);

    if fall_height > HARD_FALL_HEIGHT {
        m.hurt_counter = m.hurt_counter.saturating_add(if cap_on_head { 16 } else { 24 });
        queue_rumble(m, env, 5, 80);
        shake_camera(m, env, CameraShake::FallDamage);
        env.fx.play_voice(m.slot, Voice::Attacked);
        return drop_and_set_action(m, env.objects, hard_fall_action, 4);
    }

    if fall_height > FAR_FALL_HEIGHT && !floor_is_slippery(m) {
        m.hurt_counter = m.hurt_counter.saturating_add(if cap_on_head { 8 } else { 12 });
        m.squish_timer = 30;
        queue_rumble(m, env, 5, 80);
        shake_camera(m, env, CameraShake::FallDamage);
        env.fx.play_voice(m.slot, Voice::Attacked);
    }

    false
}

/// Soft snow or sand swallows the feet of an actor landing from high up.
pub fn should_get_stuck_in_ground(m: &ActorState) -> bool {
    let Some(floor) = m.floor else {
        return false;
    };

    matches!(m.terrain, TerrainType::Snow | TerrainType::Sand)
        && floor.surface_type != SurfaceType::Burning
        && !floor.surface_type.is_hard()
        && !floor.is_dynamic()
        && m.peak_height - m.pos[1] > STUCK_IN_GROUND_HEIGHT
        && floor.normal[1] >= 0.866_025_4
}

pub fn check_fall_damage_or_get_stuck(m: &mut ActorState, env: &mut Env<'_>, hard_fall_action: Action) -> bool {
    if should_get_stuck_in_ground(m) {
        env.fx.play_voice(m.slot, Voice::Oof);
        set_particles(m, env, ParticleFlags::MIST_CIRCLE);
        drop_and_set_action(m, env.objects, Action::FeetStuckInGround, 0);
        queue_rumble(m, env, 5, 80);
        return true;
    }

    check_fall_damage(m, env, hard_fall_action)
}

// ============================================================
// Input checks
// ============================================================

pub fn check_kick_or_dive_in_air(m: &mut ActorState) -> bool {
    if m.has_input(InputFlags::B_PRESSED) {
        let action = if m.forward_vel > 28.0 { Action::Dive } else { Action::JumpKick };
        return set_action(m, action, 0);
    }
    false
}

/// Kicks off the wall just bonked if jump is pressed in the grace window.
pub fn check_wall_kick(m: &mut ActorState) -> bool {
    if m.has_input(InputFlags::A_PRESSED) && m.wall_kick_timer != 0 && m.prev_action == Action::AirHitWall {
        m.face_angle[1] = m.face_angle[1].wrapping_add(ANGLE_HALF);
        return set_action(m, Action::WallKickAir, 0);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{FxEvent, RecordingPresentation};
    use crate::hooks::NoHooks;
    use crate::objects::DefaultObjects;
    use hopcore_common::collision_map::CollisionMap;
    use hopcore_common::cvar::PhysicsSettings;
    use hopcore_common::surface::Surface;

    fn landing_actor(fall_height: f32) -> ActorState {
        let mut m = ActorState::new(0);
        m.action = Action::Freefall;
        m.floor = Some(Surface::default());
        m.peak_height = fall_height;
        m.pos = [0.0; 3];
        m.vel[1] = -60.0;
        m
    }

    #[test]
    fn test_hard_fall_damage() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = landing_actor(3001.0);
        assert!(check_fall_damage(&mut m, &mut env, Action::HardBackwardGroundKb));
        assert_eq!(m.action, Action::HardBackwardGroundKb);
        assert_eq!(m.action_arg, 4);
        assert_eq!(m.hurt_counter, 16);
        drop(env);
        assert!(fx.contains(&FxEvent::Shake(CameraShake::FallDamage)));
    }

    #[test]
    fn test_hard_fall_damage_without_cap() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = landing_actor(3001.0);
        m.flags.remove(ActorFlags::CAP_ON_HEAD);
        check_fall_damage(&mut m, &mut env, Action::HardBackwardGroundKb);
        assert_eq!(m.hurt_counter, 24);
    }

    #[test]
    fn test_minor_fall_damage_squishes_only() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = landing_actor(1150.01);
        assert!(!check_fall_damage(&mut m, &mut env, Action::HardBackwardGroundKb));
        assert_eq!(m.action, Action::Freefall);
        assert_eq!(m.hurt_counter, 8);
        assert_eq!(m.squish_timer, 30);
    }

    #[test]
    fn test_no_fall_damage_on_burning_floor() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = landing_actor(5000.0);
        m.floor = Some(Surface::new(SurfaceType::Burning, [0.0, 1.0, 0.0]));
        assert!(!check_fall_damage(&mut m, &mut env, Action::HardBackwardGroundKb));
        assert_eq!(m.hurt_counter, 0);
    }

    #[test]
    fn test_stuck_in_snow() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = landing_actor(1200.0);
        m.terrain = TerrainType::Snow;
        assert!(check_fall_damage_or_get_stuck(&mut m, &mut env, Action::HardBackwardGroundKb));
        assert_eq!(m.action, Action::FeetStuckInGround);
        assert_eq!(m.hurt_counter, 0);
    }

    #[test]
    fn test_slide_terrain_is_slippery() {
        let mut m = ActorState::new(0);
        m.floor = Some(Surface::new(SurfaceType::Default, [0.0, 0.99, 0.141]));
        assert!(!floor_is_slippery(&m));
        m.terrain = TerrainType::Slide;
        assert!(floor_is_slippery(&m));
        assert_eq!(floor_class(&m), FloorClass::VerySlippery);
    }

    #[test]
    fn test_bonk_reflection_off_wall() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0);
        m.wall = Some(Surface::new(SurfaceType::Default, [-1.0, 0.0, 0.0]));
        m.face_angle[1] = 0x4000;
        m.forward_vel = 20.0;
        bonk_reflection(&mut m, &mut env, true);
        // A head-on wall reflects to the same yaw; the actor backs away.
        assert_eq!(m.face_angle[1], 0x4000);
        assert_eq!(m.forward_vel, -20.0);
        drop(env);
        assert!(fx.contains(&FxEvent::Sound(Sound::Bonk)));
    }

    #[test]
    fn test_jump_sound_plays_once() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0);
        m.action = Action::Jump;
        play_actor_sound(&mut m, &mut env, Sound::TerrainJump(TerrainSound::Grass), VoiceCue::Jump);
        play_actor_sound(&mut m, &mut env, Sound::TerrainJump(TerrainSound::Grass), VoiceCue::Jump);
        drop(env);
        assert_eq!(fx.events.len(), 2);
        assert!(matches!(fx.voices().next(), Some(Voice::YahWahHoo(v)) if v < 3));
    }

    #[test]
    fn test_far_fall_sound_latched() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = landing_actor(2000.0);
        play_far_fall_sound(&mut m, &mut env);
        play_far_fall_sound(&mut m, &mut env);
        drop(env);
        assert_eq!(fx.voices().count(), 1);
    }

    #[test]
    fn test_kick_or_dive() {
        let mut m = ActorState::new(0);
        m.action = Action::Jump;
        m.input.buttons = InputFlags::B_PRESSED;
        m.forward_vel = 10.0;
        assert!(check_kick_or_dive_in_air(&mut m));
        assert_eq!(m.action, Action::JumpKick);
    }

    #[test]
    fn test_wall_kick_window() {
        let mut m = ActorState::new(0);
        m.action = Action::SoftBonk;
        m.prev_action = Action::AirHitWall;
        m.wall_kick_timer = 3;
        m.input.buttons = InputFlags::A_PRESSED;
        assert!(check_wall_kick(&mut m));
        assert_eq!(m.action, Action::WallKickAir);
        assert_eq!(m.face_angle[1], ANGLE_HALF);
    }

    #[test]
    fn test_lava_wall_boost() {
        let map = CollisionMap::new();
        let settings = PhysicsSettings::default();
        let mut fx = RecordingPresentation::new();
        let mut objects = DefaultObjects;
        let mut env = Env::new(&map, &NoHooks, &mut fx, &mut objects, &settings);

        let mut m = ActorState::new(0);
        m.action = Action::Jump;
        m.wall = Some(Surface::new(SurfaceType::Burning, [0.0, 0.0, 1.0]));
        m.face_angle[1] = ANGLE_HALF;
        assert!(lava_boost_on_wall(&mut m, &mut env));
        assert_eq!(m.action, Action::LavaBoost);
        assert_eq!(m.face_angle[1], 0);
        assert_eq!(m.forward_vel, 24.0);
        assert_eq!(m.vel[1], 84.0);
        assert_eq!(m.hurt_counter, 12);
    }
}
