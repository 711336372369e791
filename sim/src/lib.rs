//! Rapier-backed runtime for the hoopshot game core: physics adapter, room
//! geometry, a scripted bot hand and the fixed-tick game loop.

pub mod bot;
pub mod config;
pub mod game_loop;
pub mod physics;
pub mod room;
