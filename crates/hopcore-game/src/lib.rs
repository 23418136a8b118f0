#![allow(clippy::collapsible_if, clippy::collapsible_else_if, clippy::manual_range_contains,
         clippy::float_cmp, clippy::comparison_chain, clippy::too_many_arguments,
         clippy::unnecessary_lazy_evaluations, clippy::new_without_default)]
// lib.rs — Actor physics core: action state machine, airborne handlers and the
// collision stepper they drive.

pub mod actor;
pub mod actions;
pub mod fx;
pub mod hooks;
pub mod objects;
pub mod env;
pub mod transition;
pub mod movement;
pub mod step;
pub mod interaction;
pub mod act_airborne;
pub mod dispatch;
pub mod world;

pub use actions::Action;
pub use actor::{ActorFlags, ActorInput, ActorState, InputFlags};
pub use dispatch::{ActionFn, ActionStateMachine, ActionTable};
pub use env::Env;
pub use fx::{NullPresentation, Presentation, RecordingPresentation};
pub use hooks::{NoHooks, PhysicsHooks};
pub use objects::{DefaultObjects, ObjectInteractions};
pub use step::{AirStep, AirStepCheck, GroundStep};
pub use world::{PlayerSlot, World};
