//! Simulation backend contract and HTTP client
//!
//! The backend owns the physics: it produces the temperature field, judges
//! moves, and computes accuracy. The game never recomputes any of that
//! locally; it only caches what the backend has answered.

mod client;

pub use client::HttpBackend;

use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// Temperature readings for the whole board, row-major
pub type ValueMap = Vec<Vec<f64>>;

/// Backend verdict on a single move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub success: bool,
    pub message: String,
}

/// Capability set the session consumes
///
/// One implementation talks HTTP ([`HttpBackend`]); tests drive sessions with
/// scripted implementations. At most one call per session is in flight at any
/// time, so `&mut self` is the honest signature.
#[allow(async_fn_in_trait)]
pub trait SimulationBackend {
    /// Start a simulation sized to `grid_size`, returning the initial field
    async fn init(&mut self, grid_size: usize) -> Result<ValueMap>;

    /// Submit a move by 1-based linear index (`row * size + col + 1`)
    async fn make_move(&mut self, index: usize) -> Result<MoveOutcome>;

    /// Whether the current play-through has reached its end condition
    async fn is_complete(&mut self) -> Result<bool>;

    /// Accuracy of the revealed pattern so far, in [0, 1]
    async fn get_accuracy(&mut self) -> Result<f64>;

    /// Snapshot of the current temperature field
    async fn current_value_map(&mut self) -> Result<ValueMap>;
}
