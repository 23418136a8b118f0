#![allow(clippy::collapsible_if, clippy::collapsible_else_if, clippy::manual_range_contains,
         clippy::float_cmp, clippy::comparison_chain, clippy::needless_range_loop)]

pub mod shared;
pub mod surface;
pub mod collision_map;
pub mod cvar;
