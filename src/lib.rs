//! Meltgrid - Grid-Discovery Game over a Thermal Simulation Backend

pub mod backend;
pub mod core;
pub mod game;
pub mod levels;
pub mod progress;
pub mod render;
pub mod session;
