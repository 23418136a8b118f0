// objects.rs — Held and used object capability
//
// The physics only knows object ids. Whatever owns the objects implements
// this trait to observe grabs, throws, drops and releases.

use crate::actor::{ActorFlags, ActorState, GrabPos, HeldObject, UsedObject};

pub trait ObjectInteractions {
    /// Whether a grabbable object is within reach of a diving actor.
    fn check_object_grab(&mut self, _m: &mut ActorState) -> bool {
        false
    }

    /// Picks up the object the actor is interacting with.
    fn grab_used_object(&mut self, m: &mut ActorState) {
        if m.held_object.is_none() {
            if let Some(used) = m.used_object {
                m.held_object = Some(HeldObject { id: used.id, holdable_npc: false });
            }
        }
    }

    fn throw_held_object(&mut self, m: &mut ActorState) {
        m.held_object = None;
        m.body.grab_pos = GrabPos::None;
    }

    fn drop_held_object(&mut self, m: &mut ActorState) {
        m.held_object = None;
        m.body.grab_pos = GrabPos::None;
    }

    /// Releases whatever the actor rides, such as a shell.
    fn stop_riding(&mut self, _m: &mut ActorState) {}

    /// Knocks the cap off the actor's head at `speed`.
    fn blow_off_cap(&mut self, m: &mut ActorState, _speed: f32) {
        m.flags.remove(ActorFlags::CAP_ON_HEAD);
    }

    /// Whether a dying actor may be bubbled instead of warped out.
    fn can_bubble(&self, _m: &ActorState) -> bool {
        false
    }

    fn trigger_death_warp(&mut self, _m: &mut ActorState) {}

    /// Closest hoot the actor can hang from, if any.
    fn nearest_hoot(&mut self, _m: &ActorState) -> Option<UsedObject> {
        None
    }

    /// Lets go of a hoot at `global_timer`.
    fn release_hoot(&mut self, _m: &mut ActorState, _global_timer: u32) {}
}

/// Object handling with no level objects behind it.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultObjects;

impl ObjectInteractions for DefaultObjects {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_clears_held_object() {
        let mut m = ActorState::new(0);
        m.held_object = Some(HeldObject { id: 7, holdable_npc: false });
        m.body.grab_pos = GrabPos::LightObject;
        DefaultObjects.drop_held_object(&mut m);
        assert_eq!(m.held_object, None);
        assert_eq!(m.body.grab_pos, GrabPos::None);
    }

    #[test]
    fn test_grab_takes_used_object() {
        let mut m = ActorState::new(0);
        m.used_object = Some(UsedObject {
            id: 3,
            pos: [0.0; 3],
            move_yaw: 0,
            is_hoot: false,
            release_time: None,
        });
        DefaultObjects.grab_used_object(&mut m);
        assert_eq!(m.held_object.map(|h| h.id), Some(3));
    }

    #[test]
    fn test_blow_off_cap() {
        let mut m = ActorState::new(0);
        assert!(m.flags.contains(ActorFlags::CAP_ON_HEAD));
        DefaultObjects.blow_off_cap(&mut m, 50.0);
        assert!(!m.flags.contains(ActorFlags::CAP_ON_HEAD));
    }
}
