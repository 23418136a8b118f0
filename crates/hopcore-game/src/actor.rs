// actor.rs — Per-actor physics state and controller input

use hopcore_common::shared::{Angle, Vec3};
use hopcore_common::surface::Surface;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::actions::{Action, ActionFlags, ActionPhase};
use crate::fx::TerrainSound;

/// Full health: eight wedges of 0x100 plus the 0x80 sub-unit.
pub const FULL_HEALTH: i16 = 0x880;

pub const DEFAULT_HITBOX_HEIGHT: f32 = 160.0;

/// Value the knockback timer is re-armed to while it is running.
pub const KNOCKBACK_TIMER_DEFAULT: i8 = 10;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ActorFlags: u32 {
        const NORMAL_CAP         = 0x0000_0001;
        const VANISH_CAP         = 0x0000_0002;
        const METAL_CAP          = 0x0000_0004;
        const WING_CAP           = 0x0000_0008;
        const CAP_ON_HEAD        = 0x0000_0010;
        const CAP_IN_HAND        = 0x0000_0020;
        /// Set on jump entry; lets a released jump button cut the ascent.
        const JUMP_HELD          = 0x0000_0100;
        const ACTION_SOUND_PLAYED = 0x0001_0000;
        const VOICE_PLAYED       = 0x0002_0000;
        /// Long-fall scream already played this fall.
        const FALL_SOUND_PLAYED  = 0x0004_0000;
        const KICKING            = 0x0020_0000;
        const WALL_BONKED        = 0x4000_0000;
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InputFlags: u16 {
        const NONZERO_ANALOG = 0x0001;
        const A_PRESSED      = 0x0002;
        const OFF_FLOOR      = 0x0004;
        const ABOVE_SLIDE    = 0x0008;
        const FIRST_PERSON   = 0x0010;
        const SQUISHED       = 0x0040;
        const A_DOWN         = 0x0080;
        const IN_WATER       = 0x0200;
        const B_PRESSED      = 0x2000;
        const Z_DOWN         = 0x4000;
        const Z_PRESSED      = 0x8000;
    }
}

bitflags::bitflags! {
    /// Requests raised on the actor by object interactions.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct InteractStatus: u32 {
        const DROP_OBJECT  = 0x0001;
        const RELEASE_HOOT = 0x0002;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActorInput {
    pub buttons: InputFlags,
    /// Analog magnitude in [0, 32].
    pub intended_mag: f32,
    pub intended_yaw: Angle,
    pub stick_x: f32,
    pub stick_y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainType {
    #[default]
    Grass,
    Stone,
    Snow,
    Sand,
    Spooky,
    Water,
    Slide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeldObject {
    pub id: u32,
    /// Held characters cannot be thrown mid-air.
    pub holdable_npc: bool,
}

/// Object the actor is riding or otherwise attached to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsedObject {
    pub id: u32,
    pub pos: Vec3,
    pub move_yaw: Angle,
    pub is_hoot: bool,
    pub release_time: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrabPos {
    #[default]
    None,
    LightObject,
}

/// Cosmetic body state consumed by the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BodyState {
    pub wing_flutter: bool,
    pub eyes_dead: bool,
    pub punch_state: u8,
    pub grab_pos: GrabPos,
}

/// Final pose handed to presentation after a step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GfxState {
    pub pos: Vec3,
    pub angle: [Angle; 3],
    /// Next animation request restarts even if it names the current one.
    pub restart_anim: bool,
}

#[derive(Clone, Debug)]
pub struct ActorState {
    pub slot: usize,
    /// The actor driven by this machine's controller. Only the local actor
    /// touches the camera and may die.
    pub is_local: bool,

    pub pos: Vec3,
    pub vel: Vec3,
    pub forward_vel: f32,
    pub slide_vel_x: f32,
    pub slide_vel_z: f32,
    pub slide_yaw: Angle,
    /// Pitch, yaw, roll.
    pub face_angle: [Angle; 3],
    pub angle_vel: [Angle; 3],
    pub twirl_yaw: Angle,

    pub action: Action,
    pub prev_action: Action,
    pub action_arg: u32,
    pub action_state: u16,
    pub action_timer: u16,

    pub input: ActorInput,
    pub flags: ActorFlags,
    pub interact_status: InteractStatus,
    /// Last hit came from another player, whose knockback speed wins.
    pub hit_by_player: bool,

    pub floor: Option<Surface>,
    pub ceil: Option<Surface>,
    pub wall: Option<Surface>,
    pub floor_height: f32,
    pub ceil_height: f32,
    pub water_level: f32,
    pub floor_angle: Angle,
    pub terrain: TerrainType,
    pub terrain_sound: TerrainSound,

    pub health: i16,
    pub hurt_counter: u8,
    pub squish_timer: u8,
    pub peak_height: f32,
    pub quicksand_depth: f32,
    pub knockback_timer: i8,
    pub wall_kick_timer: u8,
    pub hitbox_height: f32,
    /// Gravity applied while being blown away.
    pub blown_gravity: f32,
    pub burn_timer: u16,

    pub held_object: Option<HeldObject>,
    pub used_object: Option<UsedObject>,

    pub long_jump_is_slow: bool,
    pub steep_jump_yaw: Angle,
    pub special_triple_jump: bool,

    pub body: BodyState,
    pub gfx: GfxState,

    pub(crate) rng: StdRng,
}

impl ActorState {
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            is_local: slot == 0,
            pos: [0.0; 3],
            vel: [0.0; 3],
            forward_vel: 0.0,
            slide_vel_x: 0.0,
            slide_vel_z: 0.0,
            slide_yaw: 0,
            face_angle: [0; 3],
            angle_vel: [0; 3],
            twirl_yaw: 0,
            action: Action::Freefall,
            prev_action: Action::Freefall,
            action_arg: 0,
            action_state: 0,
            action_timer: 0,
            input: ActorInput::default(),
            flags: ActorFlags::NORMAL_CAP | ActorFlags::CAP_ON_HEAD,
            interact_status: InteractStatus::empty(),
            hit_by_player: false,
            floor: None,
            ceil: None,
            wall: None,
            floor_height: 0.0,
            ceil_height: 0.0,
            water_level: hopcore_common::surface::FLOOR_LOWER_LIMIT,
            floor_angle: 0,
            terrain: TerrainType::Grass,
            terrain_sound: TerrainSound::Default,
            health: FULL_HEALTH,
            hurt_counter: 0,
            squish_timer: 0,
            peak_height: 0.0,
            quicksand_depth: 0.0,
            knockback_timer: 0,
            wall_kick_timer: 0,
            hitbox_height: DEFAULT_HITBOX_HEIGHT,
            blown_gravity: 0.0,
            burn_timer: 0,
            held_object: None,
            used_object: None,
            long_jump_is_slow: false,
            steep_jump_yaw: 0,
            special_triple_jump: false,
            body: BodyState::default(),
            gfx: GfxState::default(),
            rng: StdRng::seed_from_u64(slot as u64),
        }
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self.peak_height = pos[1];
        self.gfx.pos = pos;
        self
    }

    /// Reseeds the voice-variant generator.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ============================================================
    // Read-only queries
    // ============================================================

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn action_flags(&self) -> ActionFlags {
        self.action.flags()
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn velocity(&self) -> Vec3 {
        self.vel
    }

    pub fn health(&self) -> i16 {
        self.health
    }

    pub fn flags(&self) -> ActorFlags {
        self.flags
    }

    pub fn has_input(&self, buttons: InputFlags) -> bool {
        self.input.buttons.intersects(buttons)
    }

    pub fn phase<P: ActionPhase>(&self) -> P {
        P::from_state(self.action_state)
    }

    pub fn set_phase<P: ActionPhase>(&mut self, phase: P) {
        self.action_state = phase.to_state();
    }

    pub(crate) fn next_voice_variant(&mut self, count: u8) -> u8 {
        use rand::Rng;
        self.rng.gen_range(0..count)
    }
}
