//! GoChi: shoot fireballs at the targets drifting across the arena.
//!
//! The [`world::World`] owns every object and keeps their triangles flattened
//! in one vertex buffer; [`game::Game`] wires it to the engine's frame loop,
//! the free-look [`controls::Controls`] and a single mesh renderer.

pub mod config;
pub mod controls;
pub mod game;
pub mod world;

pub use config::{ControlsConfig, GameConfig};
pub use controls::{Controls, Motion};
pub use game::Game;
pub use world::{Body, FireCommand, Shard, StepReport, World};
