// hooks.rs — Scripting hook capability consulted from inside the physics
//
// Every hook defaults to the behavior the engine has without any script
// loaded, so `NoHooks` reproduces stock physics exactly.

use crate::actor::ActorState;
use crate::step::{AirStep, AirStepCheck, GroundStep};

/// Surface effects a script may switch off for an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HazardType {
    LavaFloor,
    LavaWall,
    Quicksand,
    HorizontalWind,
    VerticalWind,
}

/// Decision points a scripting layer can veto or override.
///
/// Hooks run synchronously on the ticking thread and must not start another
/// tick. Returned overrides are taken at face value.
pub trait PhysicsHooks {
    fn allow_hazard_surface(&self, _m: &ActorState, _hazard: HazardType) -> bool {
        true
    }

    /// Whether the engine may force a water transition. `in_water_action`
    /// is true only when asked from an action already in the water group;
    /// the airborne and stepper call sites always pass false.
    fn allow_force_water_action(&self, _m: &ActorState, _in_water_action: bool) -> bool {
        true
    }

    /// Replaces a whole air step when it returns a result.
    fn before_air_step(&self, _m: &mut ActorState, _check: AirStepCheck) -> Option<AirStep> {
        None
    }

    /// Replaces a whole ground step when it returns a result.
    fn before_ground_step(&self, _m: &mut ActorState) -> Option<GroundStep> {
        None
    }

    /// Replaces the floor-normal slope factor of ground quarter-steps.
    fn ground_step_speed(&self, _m: &ActorState) -> Option<f32> {
        None
    }

    fn on_collide_level_bounds(&self, _m: &mut ActorState) {}

    /// Applies custom gravity. Returning true skips the built-in rules.
    fn gravity(&self, _m: &mut ActorState) -> bool {
        false
    }

    /// Handles the whole action tick when it returns a result.
    fn every_frame(&self, _m: &mut ActorState) -> Option<bool> {
        None
    }

    fn allow_death(&self, _m: &ActorState) -> bool {
        true
    }
}

/// No scripts loaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl PhysicsHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoLava;

    impl PhysicsHooks for NoLava {
        fn allow_hazard_surface(&self, _m: &ActorState, hazard: HazardType) -> bool {
            !matches!(hazard, HazardType::LavaFloor | HazardType::LavaWall)
        }
    }

    #[test]
    fn test_defaults_allow_everything() {
        let m = ActorState::new(0);
        assert!(NoHooks.allow_hazard_surface(&m, HazardType::Quicksand));
        assert!(NoHooks.allow_death(&m));
        assert_eq!(NoHooks.ground_step_speed(&m), None);
    }

    #[test]
    fn test_partial_override() {
        let m = ActorState::new(0);
        assert!(!NoLava.allow_hazard_surface(&m, HazardType::LavaWall));
        assert!(NoLava.allow_hazard_surface(&m, HazardType::VerticalWind));
    }
}
