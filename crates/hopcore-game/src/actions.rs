// actions.rs — Action identifiers, per-action flags, and typed phase views

bitflags::bitflags! {
    /// Static properties of an action, queried by the stepper and handlers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ActionFlags: u32 {
        const STATIONARY                  = 0x0000_0200;
        const MOVING                      = 0x0000_0400;
        const AIR                         = 0x0000_0800;
        const INTANGIBLE                  = 0x0000_1000;
        const SWIMMING                    = 0x0000_2000;
        const METAL_WATER                 = 0x0000_4000;
        const SHORT_HITBOX                = 0x0000_8000;
        const RIDING_SHELL                = 0x0001_0000;
        const INVULNERABLE                = 0x0002_0000;
        const BUTT_OR_STOMACH_SLIDE       = 0x0004_0000;
        const DIVING                      = 0x0008_0000;
        const ON_POLE                     = 0x0010_0000;
        const HANGING                     = 0x0020_0000;
        const IDLE                        = 0x0040_0000;
        const ATTACKING                   = 0x0080_0000;
        const ALLOW_VERTICAL_WIND_ACTION  = 0x0100_0000;
        const CONTROL_JUMP_HEIGHT         = 0x0200_0000;
        const ALLOW_FIRST_PERSON          = 0x0400_0000;
        const PAUSE_EXIT                  = 0x0800_0000;
        const SWIMMING_OR_FLYING          = 0x1000_0000;
        const WATER_OR_TEXT               = 0x2000_0000;
        const THROWING                    = 0x8000_0000;
    }
}

/// Every action an actor can be in. Airborne actions have handlers in the
/// default table; the rest are transition targets owned by other handler
/// groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    // Airborne
    Jump,
    DoubleJump,
    TripleJump,
    Backflip,
    #[default]
    Freefall,
    HoldJump,
    HoldFreefall,
    SideFlip,
    WallKickAir,
    Twirling,
    WaterJump,
    HoldWaterJump,
    SteepJump,
    BurningJump,
    BurningFall,
    LongJump,
    RidingShellJump,
    RidingShellFall,
    Dive,
    AirThrow,
    BackwardAirKb,
    ForwardAirKb,
    HardForwardAirKb,
    HardBackwardAirKb,
    SoftBonk,
    AirHitWall,
    ForwardRollout,
    BackwardRollout,
    ShotFromCannon,
    ButtSlideAir,
    HoldButtSlideAir,
    LavaBoost,
    GettingBlown,
    CrazyBoxBounce,
    SpecialTripleJump,
    GroundPound,
    ThrownForward,
    ThrownBackward,
    FlyingTripleJump,
    SlideKick,
    JumpKick,
    Flying,
    RidingHoot,
    TopOfPoleJump,
    VerticalWind,

    // Landings
    JumpLand,
    DoubleJumpLand,
    TripleJumpLand,
    BackflipLand,
    FreefallLand,
    FreefallLandStop,
    HoldJumpLand,
    HoldFreefallLand,
    SideFlipLand,
    LongJumpLand,
    TwirlLand,
    AirThrowLand,
    GroundPoundLand,
    LavaBoostLand,

    // Ground and slides
    Idle,
    Walking,
    BeginSliding,
    ButtSlide,
    HoldButtSlide,
    StomachSlide,
    DiveSlide,
    DivePickingUp,
    SlideKickSlide,
    RidingShellGround,
    BurningGround,

    // Ground knockback
    BackwardGroundKb,
    ForwardGroundKb,
    HardBackwardGroundKb,
    HardForwardGroundKb,

    // Hanging and stuck
    LedgeGrab,
    StartHanging,
    FeetStuckInGround,
    HeadStuckInGround,
    ButtStuckInGround,

    // Hazards, water, cutscenes
    QuicksandDeath,
    Squished,
    Bubbled,
    WaterPlunge,
    MetalWaterFalling,
    BbhEnterSpin,
    FallAfterStarGrab,
}

impl Action {
    pub const COUNT: usize = Action::FallAfterStarGrab as usize + 1;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Jump,
        Action::DoubleJump,
        Action::TripleJump,
        Action::Backflip,
        Action::Freefall,
        Action::HoldJump,
        Action::HoldFreefall,
        Action::SideFlip,
        Action::WallKickAir,
        Action::Twirling,
        Action::WaterJump,
        Action::HoldWaterJump,
        Action::SteepJump,
        Action::BurningJump,
        Action::BurningFall,
        Action::LongJump,
        Action::RidingShellJump,
        Action::RidingShellFall,
        Action::Dive,
        Action::AirThrow,
        Action::BackwardAirKb,
        Action::ForwardAirKb,
        Action::HardForwardAirKb,
        Action::HardBackwardAirKb,
        Action::SoftBonk,
        Action::AirHitWall,
        Action::ForwardRollout,
        Action::BackwardRollout,
        Action::ShotFromCannon,
        Action::ButtSlideAir,
        Action::HoldButtSlideAir,
        Action::LavaBoost,
        Action::GettingBlown,
        Action::CrazyBoxBounce,
        Action::SpecialTripleJump,
        Action::GroundPound,
        Action::ThrownForward,
        Action::ThrownBackward,
        Action::FlyingTripleJump,
        Action::SlideKick,
        Action::JumpKick,
        Action::Flying,
        Action::RidingHoot,
        Action::TopOfPoleJump,
        Action::VerticalWind,
        Action::JumpLand,
        Action::DoubleJumpLand,
        Action::TripleJumpLand,
        Action::BackflipLand,
        Action::FreefallLand,
        Action::FreefallLandStop,
        Action::HoldJumpLand,
        Action::HoldFreefallLand,
        Action::SideFlipLand,
        Action::LongJumpLand,
        Action::TwirlLand,
        Action::AirThrowLand,
        Action::GroundPoundLand,
        Action::LavaBoostLand,
        Action::Idle,
        Action::Walking,
        Action::BeginSliding,
        Action::ButtSlide,
        Action::HoldButtSlide,
        Action::StomachSlide,
        Action::DiveSlide,
        Action::DivePickingUp,
        Action::SlideKickSlide,
        Action::RidingShellGround,
        Action::BurningGround,
        Action::BackwardGroundKb,
        Action::ForwardGroundKb,
        Action::HardBackwardGroundKb,
        Action::HardForwardGroundKb,
        Action::LedgeGrab,
        Action::StartHanging,
        Action::FeetStuckInGround,
        Action::HeadStuckInGround,
        Action::ButtStuckInGround,
        Action::QuicksandDeath,
        Action::Squished,
        Action::Bubbled,
        Action::WaterPlunge,
        Action::MetalWaterFalling,
        Action::BbhEnterSpin,
        Action::FallAfterStarGrab,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn flags(self) -> ActionFlags {
        use ActionFlags as F;
        let jump = F::AIR | F::ALLOW_VERTICAL_WIND_ACTION;
        let controlled = jump | F::CONTROL_JUMP_HEIGHT;
        let knockback = jump | F::INVULNERABLE;

        match self {
            Action::Jump
            | Action::DoubleJump
            | Action::HoldJump
            | Action::SteepJump
            | Action::WallKickAir
            | Action::LongJump
            | Action::TopOfPoleJump
            | Action::ButtSlideAir
            | Action::FlyingTripleJump
            | Action::SpecialTripleJump => controlled,
            Action::TripleJump
            | Action::Backflip
            | Action::SideFlip
            | Action::WaterJump
            | Action::HoldWaterJump
            | Action::Freefall
            | Action::HoldFreefall
            | Action::HoldButtSlideAir
            | Action::ForwardRollout
            | Action::BackwardRollout => jump,
            Action::Dive => jump | F::ATTACKING | F::DIVING,
            Action::SlideKick | Action::JumpKick => jump | F::ATTACKING,
            Action::AirThrow => controlled | F::THROWING,
            Action::ShotFromCannon => F::AIR | F::ATTACKING | F::DIVING,
            Action::Flying => F::AIR | F::ATTACKING | F::DIVING | F::SWIMMING_OR_FLYING,
            Action::RidingShellJump => F::AIR | F::ATTACKING | F::RIDING_SHELL | F::CONTROL_JUMP_HEIGHT,
            Action::RidingShellFall => F::AIR | F::ATTACKING | F::RIDING_SHELL,
            Action::VerticalWind => F::AIR | F::DIVING | F::SWIMMING_OR_FLYING,
            Action::Twirling => F::AIR | F::ATTACKING | F::SWIMMING_OR_FLYING,
            Action::GroundPound => F::AIR | F::ATTACKING,
            Action::AirHitWall | Action::CrazyBoxBounce => F::AIR,
            Action::BackwardAirKb
            | Action::ForwardAirKb
            | Action::HardForwardAirKb
            | Action::HardBackwardAirKb
            | Action::SoftBonk
            | Action::BurningJump
            | Action::BurningFall
            | Action::LavaBoost
            | Action::GettingBlown
            | Action::ThrownForward
            | Action::ThrownBackward => knockback,
            Action::RidingHoot => F::MOVING,

            Action::JumpLand
            | Action::DoubleJumpLand
            | Action::TripleJumpLand
            | Action::BackflipLand
            | Action::FreefallLand
            | Action::HoldJumpLand
            | Action::HoldFreefallLand
            | Action::SideFlipLand
            | Action::LongJumpLand
            | Action::TwirlLand => F::MOVING | F::ALLOW_FIRST_PERSON,
            Action::FreefallLandStop | Action::AirThrowLand | Action::DivePickingUp => F::STATIONARY,
            Action::GroundPoundLand => F::STATIONARY | F::ATTACKING,
            Action::LavaBoostLand => F::STATIONARY | F::INVULNERABLE,

            Action::Idle => F::STATIONARY | F::IDLE | F::ALLOW_FIRST_PERSON | F::PAUSE_EXIT,
            Action::Walking => F::MOVING | F::ALLOW_FIRST_PERSON,
            Action::BeginSliding => F::MOVING,
            Action::ButtSlide
            | Action::HoldButtSlide
            | Action::StomachSlide
            | Action::SlideKickSlide => F::MOVING | F::BUTT_OR_STOMACH_SLIDE,
            Action::DiveSlide => F::MOVING | F::DIVING | F::ATTACKING,
            Action::RidingShellGround => F::MOVING | F::ATTACKING | F::RIDING_SHELL,
            Action::BurningGround => F::MOVING | F::INVULNERABLE,

            Action::BackwardGroundKb
            | Action::ForwardGroundKb
            | Action::HardBackwardGroundKb
            | Action::HardForwardGroundKb => F::MOVING | F::INVULNERABLE,

            Action::LedgeGrab | Action::StartHanging => F::STATIONARY | F::HANGING,
            Action::FeetStuckInGround | Action::HeadStuckInGround | Action::ButtStuckInGround => {
                F::STATIONARY | F::INTANGIBLE
            }

            Action::QuicksandDeath => F::STATIONARY | F::INTANGIBLE | F::INVULNERABLE,
            Action::Squished => F::STATIONARY | F::INVULNERABLE,
            Action::Bubbled => F::INTANGIBLE | F::INVULNERABLE,
            Action::WaterPlunge => F::SWIMMING | F::SWIMMING_OR_FLYING | F::WATER_OR_TEXT,
            Action::MetalWaterFalling => F::STATIONARY | F::METAL_WATER,
            Action::BbhEnterSpin | Action::FallAfterStarGrab => F::INTANGIBLE,
        }
    }

    #[inline]
    pub fn is_airborne(self) -> bool {
        self.flags().contains(ActionFlags::AIR)
    }

    /// Whether the action is dispatched through the airborne handler group.
    /// Unlike `is_airborne` this includes hanging from a hoot.
    #[inline]
    pub fn is_airborne_group(self) -> bool {
        self.index() <= Action::VerticalWind.index()
    }
}

// ============================================================
// Typed phase views over the raw action_state counter
// ============================================================

/// A named reading of `action_state` for a multi-phase action.
pub trait ActionPhase: Copy {
    fn from_state(state: u16) -> Self;
    fn to_state(self) -> u16;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundPoundPhase {
    /// Hovering upwards while the wind-up animation plays.
    Rise,
    Plunge,
}

impl ActionPhase for GroundPoundPhase {
    fn from_state(state: u16) -> Self {
        if state == 0 { GroundPoundPhase::Rise } else { GroundPoundPhase::Plunge }
    }

    fn to_state(self) -> u16 {
        match self {
            GroundPoundPhase::Rise => 0,
            GroundPoundPhase::Plunge => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RolloutPhase {
    Start,
    Spinning,
    Falling,
}

impl ActionPhase for RolloutPhase {
    fn from_state(state: u16) -> Self {
        match state {
            0 => RolloutPhase::Start,
            1 => RolloutPhase::Spinning,
            _ => RolloutPhase::Falling,
        }
    }

    fn to_state(self) -> u16 {
        match self {
            RolloutPhase::Start => 0,
            RolloutPhase::Spinning => 1,
            RolloutPhase::Falling => 2,
        }
    }
}

/// Shared by flight, flying triple jump, vertical wind, and hoot riding:
/// an intro animation followed by a steady loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntroPhase {
    Intro,
    Looping,
}

impl ActionPhase for IntroPhase {
    fn from_state(state: u16) -> Self {
        if state == 0 { IntroPhase::Intro } else { IntroPhase::Looping }
    }

    fn to_state(self) -> u16 {
        match self {
            IntroPhase::Intro => 0,
            IntroPhase::Looping => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GettingBlownPhase {
    /// Backwards speed still building towards -60.
    PushedBack,
    Drifting,
}

impl ActionPhase for GettingBlownPhase {
    fn from_state(state: u16) -> Self {
        if state == 0 { GettingBlownPhase::PushedBack } else { GettingBlownPhase::Drifting }
    }

    fn to_state(self) -> u16 {
        match self {
            GettingBlownPhase::PushedBack => 0,
            GettingBlownPhase::Drifting => 1,
        }
    }
}
