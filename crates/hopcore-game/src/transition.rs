// transition.rs — Action changes and the launch rules applied on entry

use hopcore_common::shared::ANGLE_HALF;
use tracing::trace;

use crate::actions::{Action, ActionFlags};
use crate::actor::{ActorFlags, ActorState};
use crate::movement::set_forward_vel;
use crate::objects::ObjectInteractions;

/// Sets the vertical launch speed from a base plus a share of forward speed.
/// Squished or sinking actors launch at half speed.
pub fn set_y_vel_based_on_fspeed(m: &mut ActorState, initial_vel_y: f32, multiplier: f32) {
    m.vel[1] = initial_vel_y + m.forward_vel * multiplier;

    if m.squish_timer != 0 || m.quicksand_depth > 1.0 {
        m.vel[1] *= 0.5;
    }
}

/// Launch kinematics for airborne actions. Returns the action actually
/// entered, which differs when a squished or sinking actor cannot double
/// jump or twirl.
fn enter_airborne(m: &mut ActorState, action: Action, arg: u32) -> Action {
    let mut action = action;
    if (m.squish_timer != 0 || m.quicksand_depth >= 1.0)
        && (action == Action::DoubleJump || action == Action::Twirling)
    {
        action = Action::Jump;
    }

    match action {
        Action::DoubleJump => {
            set_y_vel_based_on_fspeed(m, 52.0, 0.25);
            m.forward_vel *= 0.8;
        }
        Action::Backflip => {
            m.gfx.restart_anim = true;
            m.forward_vel = -16.0;
            set_y_vel_based_on_fspeed(m, 62.0, 0.0);
        }
        Action::TripleJump => {
            set_y_vel_based_on_fspeed(m, 69.0, 0.0);
            m.forward_vel *= 0.8;
        }
        Action::FlyingTripleJump => set_y_vel_based_on_fspeed(m, 82.0, 0.0),
        Action::WaterJump | Action::HoldWaterJump => {
            if arg == 0 {
                set_y_vel_based_on_fspeed(m, 42.0, 0.0);
            }
        }
        Action::BurningJump => {
            m.vel[1] = 31.5;
            m.forward_vel = 8.0;
        }
        Action::RidingShellJump => set_y_vel_based_on_fspeed(m, 42.0, 0.25),
        Action::Jump | Action::HoldJump => {
            m.gfx.restart_anim = true;
            set_y_vel_based_on_fspeed(m, 42.0, 0.25);
            m.forward_vel *= 0.8;
        }
        Action::WallKickAir | Action::TopOfPoleJump => {
            set_y_vel_based_on_fspeed(m, 62.0, 0.0);
            if m.forward_vel < 24.0 {
                m.forward_vel = 24.0;
            }
            m.wall_kick_timer = 0;
        }
        Action::SideFlip => {
            set_y_vel_based_on_fspeed(m, 62.0, 0.0);
            m.forward_vel = 8.0;
            m.face_angle[1] = m.input.intended_yaw;
        }
        Action::SteepJump => {
            m.gfx.restart_anim = true;
            set_y_vel_based_on_fspeed(m, 42.0, 0.25);
            m.face_angle[0] = -0x2000;
        }
        Action::LavaBoost => {
            m.vel[1] = 84.0;
            if arg == 0 {
                m.forward_vel = 0.0;
            }
        }
        Action::Dive => {
            let forward_vel = (m.forward_vel + 15.0).min(48.0);
            set_forward_vel(m, forward_vel);
        }
        Action::LongJump => {
            m.gfx.restart_anim = true;
            set_y_vel_based_on_fspeed(m, 30.0, 0.0);
            m.long_jump_is_slow = m.forward_vel <= 16.0;

            // Only the forward direction is capped.
            m.forward_vel *= 1.5;
            if m.forward_vel > 48.0 {
                m.forward_vel = 48.0;
            }
        }
        Action::SlideKick => {
            m.vel[1] = 12.0;
            if m.forward_vel < 32.0 {
                m.forward_vel = 32.0;
            }
        }
        Action::JumpKick => m.vel[1] = 20.0,
        _ => {}
    }

    m.peak_height = m.pos[1];
    m.flags.insert(ActorFlags::JUMP_HELD);

    action
}

/// Switches the actor to `action`, applying its entry rule.
///
/// State and timer are always reset, even when re-entering the same
/// action. Always returns true so handlers can `return set_action(..)`.
pub fn set_action(m: &mut ActorState, action: Action, arg: u32) -> bool {
    let action = if action.is_airborne() { enter_airborne(m, action, arg) } else { action };

    m.flags.remove(ActorFlags::ACTION_SOUND_PLAYED | ActorFlags::VOICE_PLAYED);
    if !m.action.flags().contains(ActionFlags::AIR) {
        m.flags.remove(ActorFlags::FALL_SOUND_PLAYED);
    }

    trace!(slot = m.slot, from = ?m.action, to = ?action, arg, "action transition");

    m.prev_action = m.action;
    m.action = action;
    m.action_arg = arg;
    m.action_state = 0;
    m.action_timer = 0;

    true
}

/// Lets go of anything held or ridden, then transitions.
pub fn drop_and_set_action(
    m: &mut ActorState,
    objects: &mut dyn ObjectInteractions,
    action: Action,
    arg: u32,
) -> bool {
    if m.held_object.is_some() {
        objects.drop_held_object(m);
    }
    objects.stop_riding(m);
    set_action(m, action, arg)
}

/// Converts a fall through the water surface into a plunge, slowing the
/// actor and placing it just under the surface.
pub fn set_water_plunge_action(m: &mut ActorState) -> bool {
    m.forward_vel /= 4.0;
    m.vel[1] /= 2.0;
    m.pos[1] = m.water_level - 100.0;

    m.face_angle[2] = 0;
    m.angle_vel = [0; 3];

    if !m.action.flags().contains(ActionFlags::DIVING) {
        m.face_angle[0] = 0;
    }

    set_action(m, Action::WaterPlunge, 0)
}

/// Turns the actor around in place.
pub(crate) fn turn_around(m: &mut ActorState) {
    m.face_angle[1] = m.face_angle[1].wrapping_add(ANGLE_HALF);
}
