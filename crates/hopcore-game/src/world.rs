// world.rs — Player slots and the multi-actor tick
//
// Each slot owns its actor and the presentation/object sinks that belong to
// it, so actors never borrow each other's state during a tick.

use hopcore_common::cvar::PhysicsSettings;
use hopcore_common::surface::SurfaceQuery;
use rayon::prelude::*;
use tracing::trace;

use crate::actor::ActorState;
use crate::dispatch::ActionStateMachine;
use crate::env::Env;
use crate::fx::{NullPresentation, Presentation};
use crate::hooks::PhysicsHooks;
use crate::objects::{DefaultObjects, ObjectInteractions};

/// One player in the session.
pub struct PlayerSlot {
    pub actor: ActorState,
    pub fx: Box<dyn Presentation + Send>,
    pub objects: Box<dyn ObjectInteractions + Send>,
}

impl PlayerSlot {
    pub fn new(actor: ActorState) -> Self {
        Self { actor, fx: Box::new(NullPresentation), objects: Box::new(DefaultObjects) }
    }

    pub fn with_presentation(mut self, fx: Box<dyn Presentation + Send>) -> Self {
        self.fx = fx;
        self
    }

    pub fn with_objects(mut self, objects: Box<dyn ObjectInteractions + Send>) -> Self {
        self.objects = objects;
        self
    }

    fn update(
        &mut self,
        machine: &ActionStateMachine,
        surfaces: &dyn SurfaceQuery,
        hooks: &dyn PhysicsHooks,
        settings: &PhysicsSettings,
        global_timer: u32,
    ) -> u32 {
        let mut env =
            Env::new(surfaces, hooks, &mut *self.fx, &mut *self.objects, settings).with_global_timer(global_timer);
        machine.update(&mut self.actor, &mut env)
    }
}

/// All player slots plus the state shared by every actor's tick.
pub struct World {
    machine: ActionStateMachine,
    settings: PhysicsSettings,
    slots: Vec<PlayerSlot>,
    global_timer: u32,
}

impl World {
    pub fn new(machine: ActionStateMachine, settings: PhysicsSettings) -> Self {
        Self { machine, settings, slots: Vec::new(), global_timer: 0 }
    }

    /// Adds a slot and returns its index. Slot indices are never reused.
    pub fn add_slot(&mut self, slot: PlayerSlot) -> usize {
        self.slots.push(slot);
        self.slots.len() - 1
    }

    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&PlayerSlot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut PlayerSlot> {
        self.slots.get_mut(index)
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Takes effect from the next tick.
    pub fn set_settings(&mut self, settings: PhysicsSettings) {
        self.settings = settings;
    }

    pub fn global_timer(&self) -> u32 {
        self.global_timer
    }

    /// Advances every actor one tick in slot order.
    pub fn tick(&mut self, surfaces: &dyn SurfaceQuery, hooks: &dyn PhysicsHooks) {
        let global_timer = self.global_timer;
        for slot in &mut self.slots {
            slot.update(&self.machine, surfaces, hooks, &self.settings, global_timer);
        }
        self.finish_tick();
    }

    /// Same as `tick`, with actors updated in parallel. Results match the
    /// sequential tick since no actor reads another's state.
    pub fn par_tick(&mut self, surfaces: &(dyn SurfaceQuery + Sync), hooks: &(dyn PhysicsHooks + Sync)) {
        let global_timer = self.global_timer;
        let machine = &self.machine;
        let settings = &self.settings;

        self.slots.par_iter_mut().for_each(|slot| {
            slot.update(machine, surfaces, hooks, settings, global_timer);
        });
        self.finish_tick();
    }

    fn finish_tick(&mut self) {
        trace!(global_timer = self.global_timer, slots = self.slots.len(), "tick complete");
        self.global_timer = self.global_timer.wrapping_add(1);
    }
}
