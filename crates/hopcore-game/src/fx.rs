// fx.rs — Presentation side effects: animation, audio, camera, rumble, particles
//
// The physics never reads back anything it emits here except animation frame
// queries, which some handlers use to time phase changes.

use crate::actor::TerrainType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Animation {
    AirborneOnStomach,
    AirForwardKb,
    AirKick,
    Backflip,
    BackwardAirKb,
    BackwardSpinning,
    Dive,
    DoubleJumpFall,
    DoubleJumpRise,
    FallFromSlide,
    FallFromSlideKick,
    FallFromSlidingWithLightObj,
    FallWithLightObj,
    FastLongJump,
    FireLavaBurn,
    FlyFromCannon,
    ForwardSpinning,
    ForwardSpinningFlip,
    GeneralFall,
    GroundPound,
    HandstandJump,
    HangOnCeiling,
    HangOnOwl,
    IdleOnLedge,
    JumpRidingShell,
    JumpWithLightObj,
    SingleJump,
    Slide,
    SlideFlip,
    SlideJump,
    SlideKick,
    SlidingOnBottomWithLightObj,
    SlowLongJump,
    StartGroundPound,
    StartTwirl,
    StartWallKick,
    ThrowLightObject,
    TripleJump,
    TripleJumpFly,
    TripleJumpGroundPound,
    Twirl,
    WingCapFly,
}

/// Terrain-dependent sound selection, derived from the floor and area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainSound {
    #[default]
    Default,
    Grass,
    Water,
    Stone,
    Spooky,
    Snow,
    Ice,
    Sand,
}

impl TerrainSound {
    pub fn for_terrain(terrain: TerrainType) -> Self {
        match terrain {
            TerrainType::Grass => TerrainSound::Grass,
            TerrainType::Stone => TerrainSound::Stone,
            TerrainType::Snow => TerrainSound::Snow,
            TerrainType::Sand => TerrainSound::Sand,
            TerrainType::Spooky => TerrainSound::Spooky,
            TerrainType::Water => TerrainSound::Water,
            TerrainType::Slide => TerrainSound::Ice,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    TerrainJump(TerrainSound),
    TerrainLanding(TerrainSound),
    TerrainHeavyLanding(TerrainSound),
    TerrainBodyHitGround(TerrainSound),
    MetalJump,
    MetalLanding,
    MetalHeavyLanding,
    WaterJump,
    Bonk,
    MetalBonk,
    Hit,
    Spin,
    SideFlip,
    Throw,
    Twirl,
    FlyingFast,
    Flying,
    LavaBurn,
    Boing1,
    Boing2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Voice {
    /// One of three jump grunts.
    YahWahHoo(u8),
    /// One of five triple-jump cheers.
    YahooWahaYippee(u8),
    Hoohoo,
    Yahoo,
    Waaaooow,
    Doh,
    Uh,
    OnFire,
    Attacked,
    Oof,
    HereWeGo,
    GroundPoundWah,
    PunchHoo,
    Wah,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ParticleFlags: u32 {
        const DUST            = 0x0001;
        const VERTICAL_STAR   = 0x0002;
        const SPARKLES        = 0x0008;
        const HORIZONTAL_STAR = 0x0010;
        const MIST_CIRCLE     = 0x0020;
        const FIRE            = 0x0800;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    #[default]
    Default,
    BehindActor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraEvent {
    ShotFromCannon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraShake {
    FallDamage,
    GroundPound,
}

/// Sink for everything the physics wants seen, heard, or felt.
///
/// Every method has a no-op default, so implementors only override what
/// their frontend renders. Calls are made per actor with its slot index.
pub trait Presentation {
    fn set_animation(&mut self, _slot: usize, _anim: Animation) {}
    /// Forces the next `set_animation` to restart even if unchanged.
    fn restart_animation(&mut self, _slot: usize) {}
    fn set_anim_to_frame(&mut self, _slot: usize, _frame: i16) {}
    fn anim_frame(&self, _slot: usize) -> i16 {
        0
    }
    fn anim_loop_end(&self, _slot: usize) -> i16 {
        0
    }
    fn is_anim_at_end(&self, _slot: usize) -> bool {
        false
    }
    fn is_anim_past_end(&self, _slot: usize) -> bool {
        false
    }

    fn play_sound(&mut self, _slot: usize, _sound: Sound) {}
    fn play_voice(&mut self, _slot: usize, _voice: Voice) {}

    fn camera_mode(&self, _slot: usize) -> CameraMode {
        CameraMode::Default
    }
    fn set_camera_mode(&mut self, _slot: usize, _mode: CameraMode) {}
    fn camera_event(&mut self, _slot: usize, _event: CameraEvent) {}
    fn shake_camera(&mut self, _slot: usize, _shake: CameraShake) {}

    fn queue_rumble(&mut self, _slot: usize, _time: u8, _level: u8) {}
    fn reset_rumble(&mut self, _slot: usize) {}
    fn set_particles(&mut self, _slot: usize, _particles: ParticleFlags) {}
    fn show_level_intro_text(&mut self, _slot: usize) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FxEvent {
    Animation(Animation),
    AnimFrame(i16),
    Sound(Sound),
    Voice(Voice),
    CameraMode(CameraMode),
    CameraEvent(CameraEvent),
    Shake(CameraShake),
    Rumble { time: u8, level: u8 },
    Particles(ParticleFlags),
    IntroText,
}

/// Records every emitted effect in order, with scriptable animation state.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    pub events: Vec<(usize, FxEvent)>,
    pub anim_frame: i16,
    pub anim_loop_end: i16,
    pub anim_at_end: bool,
    pub anim_past_end: bool,
    pub camera: CameraMode,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn contains(&self, event: &FxEvent) -> bool {
        self.events.iter().any(|(_, e)| e == event)
    }

    pub fn voices(&self) -> impl Iterator<Item = Voice> + '_ {
        self.events.iter().filter_map(|(_, e)| match e {
            FxEvent::Voice(v) => Some(*v),
            _ => None,
        })
    }

    pub fn last_animation(&self) -> Option<Animation> {
        self.events.iter().rev().find_map(|(_, e)| match e {
            FxEvent::Animation(a) => Some(*a),
            _ => None,
        })
    }
}

impl Presentation for RecordingPresentation {
    fn set_animation(&mut self, slot: usize, anim: Animation) {
        self.events.push((slot, FxEvent::Animation(anim)));
    }

    fn set_anim_to_frame(&mut self, slot: usize, frame: i16) {
        self.anim_frame = frame;
        self.events.push((slot, FxEvent::AnimFrame(frame)));
    }

    fn anim_frame(&self, _slot: usize) -> i16 {
        self.anim_frame
    }

    fn anim_loop_end(&self, _slot: usize) -> i16 {
        self.anim_loop_end
    }

    fn is_anim_at_end(&self, _slot: usize) -> bool {
        self.anim_at_end
    }

    fn is_anim_past_end(&self, _slot: usize) -> bool {
        self.anim_past_end
    }

    fn play_sound(&mut self, slot: usize, sound: Sound) {
        self.events.push((slot, FxEvent::Sound(sound)));
    }

    fn play_voice(&mut self, slot: usize, voice: Voice) {
        self.events.push((slot, FxEvent::Voice(voice)));
    }

    fn camera_mode(&self, _slot: usize) -> CameraMode {
        self.camera
    }

    fn set_camera_mode(&mut self, slot: usize, mode: CameraMode) {
        self.camera = mode;
        self.events.push((slot, FxEvent::CameraMode(mode)));
    }

    fn camera_event(&mut self, slot: usize, event: CameraEvent) {
        self.events.push((slot, FxEvent::CameraEvent(event)));
    }

    fn shake_camera(&mut self, slot: usize, shake: CameraShake) {
        self.events.push((slot, FxEvent::Shake(shake)));
    }

    fn queue_rumble(&mut self, slot: usize, time: u8, level: u8) {
        self.events.push((slot, FxEvent::Rumble { time, level }));
    }

    fn set_particles(&mut self, slot: usize, particles: ParticleFlags) {
        self.events.push((slot, FxEvent::Particles(particles)));
    }

    fn show_level_intro_text(&mut self, slot: usize) {
        self.events.push((slot, FxEvent::IntroText));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order() {
        let mut fx = RecordingPresentation::new();
        fx.set_animation(0, Animation::Dive);
        fx.play_voice(0, Voice::Hoohoo);
        fx.set_animation(1, Animation::Twirl);
        assert_eq!(fx.events.len(), 3);
        assert_eq!(fx.last_animation(), Some(Animation::Twirl));
        assert_eq!(fx.voices().collect::<Vec<_>>(), vec![Voice::Hoohoo]);
    }

    #[test]
    fn test_null_presentation_queries() {
        let fx = NullPresentation;
        assert_eq!(fx.anim_frame(0), 0);
        assert!(!fx.is_anim_at_end(0));
        assert_eq!(fx.camera_mode(0), CameraMode::Default);
    }
}
