// env.rs — Collaborators handed to every action handler for one tick

use hopcore_common::cvar::PhysicsSettings;
use hopcore_common::surface::SurfaceQuery;

use crate::fx::Presentation;
use crate::hooks::PhysicsHooks;
use crate::objects::ObjectInteractions;

/// Everything outside the actor that a tick may read or notify.
///
/// Geometry, hooks and settings are shared read-only; presentation and
/// objects belong to the actor being updated.
pub struct Env<'a> {
    pub surfaces: &'a dyn SurfaceQuery,
    pub hooks: &'a dyn PhysicsHooks,
    pub fx: &'a mut dyn Presentation,
    pub objects: &'a mut dyn ObjectInteractions,
    pub settings: &'a PhysicsSettings,
    /// Frames since session start. Drives idle wind oscillation.
    pub global_timer: u32,
}

impl<'a> Env<'a> {
    pub fn new(
        surfaces: &'a dyn SurfaceQuery,
        hooks: &'a dyn PhysicsHooks,
        fx: &'a mut dyn Presentation,
        objects: &'a mut dyn ObjectInteractions,
        settings: &'a PhysicsSettings,
    ) -> Self {
        Self { surfaces, hooks, fx, objects, settings, global_timer: 0 }
    }

    pub fn with_global_timer(mut self, global_timer: u32) -> Self {
        self.global_timer = global_timer;
        self
    }
}
