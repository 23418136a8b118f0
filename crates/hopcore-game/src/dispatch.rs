// dispatch.rs — Action handler table and the per-tick state machine
//
// Handlers are plain function pointers looked up by action index. The table
// is built once and handed to the state machine; nothing in it changes while
// actors are ticking.

use hopcore_common::surface::SurfaceType;
use tracing::{debug, error, warn};

use crate::act_airborne::AIRBORNE_HANDLERS;
use crate::actions::{Action, ActionFlags};
use crate::actor::{ActorState, InputFlags};
use crate::env::Env;
use crate::hooks::HazardType;
use crate::interaction::play_far_fall_sound;

pub use crate::transition::{drop_and_set_action, set_action, set_water_plunge_action};

/// Runs one tick of an action. Returns true when the actor changed action
/// and the new action should run before the tick ends.
pub type ActionFn = fn(&mut ActorState, &mut Env<'_>) -> bool;

/// Where a tick starts when its action has no handler.
pub const FALLBACK_ACTION: Action = Action::Freefall;

// ============================================================
// Handler table
// ============================================================

/// Immutable mapping from action to handler.
#[derive(Clone)]
pub struct ActionTable {
    handlers: Vec<Option<ActionFn>>,
}

impl ActionTable {
    pub fn empty() -> Self {
        Self { handlers: vec![None; Action::COUNT] }
    }

    /// Every airborne action. Other groups are added with `with`.
    pub fn airborne() -> Self {
        AIRBORNE_HANDLERS
            .iter()
            .fold(Self::empty(), |table, &(action, handler)| table.with(action, handler))
    }

    /// Registers or replaces the handler for `action`.
    pub fn with(mut self, action: Action, handler: ActionFn) -> Self {
        self.handlers[action.index()] = Some(handler);
        self
    }

    #[inline]
    pub fn get(&self, action: Action) -> Option<ActionFn> {
        self.handlers[action.index()]
    }

    pub fn contains(&self, action: Action) -> bool {
        self.get(action).is_some()
    }

    /// Number of actions with a handler.
    pub fn len(&self) -> usize {
        self.handlers.iter().filter(|h| h.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::airborne()
    }
}

impl std::fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<Action> = Action::ALL.iter().copied().filter(|&a| self.contains(a)).collect();
        f.debug_struct("ActionTable").field("registered", &registered).finish()
    }
}

// ============================================================
// Tick-level cancels
// ============================================================

/// Interrupts any airborne action for water entry, squishing or a vertical
/// wind column, in that order. Returns true if one fired.
pub fn check_common_airborne_cancels(m: &mut ActorState, env: &mut Env<'_>) -> bool {
    if m.pos[1] < m.water_level - 100.0 && env.hooks.allow_force_water_action(m, false) {
        return set_water_plunge_action(m);
    }

    if m.has_input(InputFlags::SQUISHED) {
        return drop_and_set_action(m, env.objects, Action::Squished, 0);
    }

    let on_vertical_wind = m.floor.map_or(false, |f| f.surface_type == SurfaceType::VerticalWind);
    if on_vertical_wind
        && m.action.flags().contains(ActionFlags::ALLOW_VERTICAL_WIND_ACTION)
        && env.hooks.allow_hazard_surface(m, HazardType::VerticalWind)
    {
        return drop_and_set_action(m, env.objects, Action::VerticalWind, 0);
    }

    m.quicksand_depth = 0.0;
    false
}

// ============================================================
// State machine
// ============================================================

/// Runs an actor's current action each tick, following transitions that
/// ask to be handled within the same tick.
#[derive(Clone, Debug, Default)]
pub struct ActionStateMachine {
    table: ActionTable,
}

impl ActionStateMachine {
    pub fn new(table: ActionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ActionTable {
        &self.table
    }

    /// One dispatch: cancels, the per-tick hook, then the action's handler.
    ///
    /// An action without a handler is reset to `FALLBACK_ACTION` and the
    /// tick ends there.
    pub fn execute_action(&self, m: &mut ActorState, env: &mut Env<'_>) -> bool {
        if m.action.is_airborne_group() {
            if check_common_airborne_cancels(m, env) {
                return true;
            }
            play_far_fall_sound(m, env);
        }

        if let Some(result) = env.hooks.every_frame(m) {
            return result;
        }

        match self.table.get(m.action) {
            Some(handler) => handler(m, env),
            None => {
                error!(slot = m.slot, action = ?m.action, fallback = ?FALLBACK_ACTION, "no handler for action");
                set_action(m, FALLBACK_ACTION, 0);
                false
            }
        }
    }

    /// Full tick for one actor. Returns how many times a handler ran.
    ///
    /// Stops after `max_redispatch` dispatches, or when a transition lands
    /// in an action this table does not handle.
    pub fn update(&self, m: &mut ActorState, env: &mut Env<'_>) -> u32 {
        let limit = env.settings.max_redispatch.max(1);
        let mut dispatches = 0;

        loop {
            if dispatches > 0 && !self.table.contains(m.action) {
                debug!(slot = m.slot, action = ?m.action, "transitioned to unhandled action, ending tick");
                break;
            }

            let again = self.execute_action(m, env);
            dispatches += 1;
            if !again {
                break;
            }

            if dispatches >= limit {
                warn!(slot = m.slot, action = ?m.action, dispatches, "re-dispatch limit reached");
                break;
            }
        }

        dispatches
    }
}
