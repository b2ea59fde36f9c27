//! One live game instance
//!
//! A session owns the board for a single play-through and is the only thing
//! that talks to the simulation backend. Phase transitions:
//! `Uninitialized → Loading → Ready ⇄ MoveInFlight → {Ready, Complete, Failed}`.
//! `Complete` and `Failed` are terminal; playing again means constructing a
//! new session.

use crate::backend::SimulationBackend;
use crate::core::error::{GameError, Result};
use crate::core::types::SessionId;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    MoveInFlight,
    Complete,
    Failed,
}

/// One cell of the board
///
/// `revealed` only ever flips false → true. `value` is present only once the
/// backend has answered a successful move for this cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardCell {
    pub row: usize,
    pub col: usize,
    pub revealed: bool,
    pub value: Option<f64>,
}

/// A single play-through against the simulation backend
pub struct SimulationSession<B: SimulationBackend> {
    id: SessionId,
    grid_size: usize,
    cells: Vec<Vec<BoardCell>>,
    last_revealed: Option<(usize, usize)>,
    accuracy: Option<f64>,
    phase: Phase,
    backend: B,
}

impl<B: SimulationBackend> SimulationSession<B> {
    pub fn new(grid_size: usize, backend: B) -> Self {
        let cells = (0..grid_size)
            .map(|row| {
                (0..grid_size)
                    .map(|col| BoardCell {
                        row,
                        col,
                        revealed: false,
                        value: None,
                    })
                    .collect()
            })
            .collect();

        Self {
            id: SessionId::new(),
            grid_size,
            cells,
            last_revealed: None,
            accuracy: None,
            phase: Phase::Uninitialized,
            backend,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn last_revealed(&self) -> Option<(usize, usize)> {
        self.last_revealed
    }

    /// Backend-derived accuracy in [0, 1]; None until the first reveal
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Read-only board projection; unrevealed cells carry no value
    pub fn snapshot(&self) -> &[Vec<BoardCell>] {
        &self.cells
    }

    /// Ask the backend for the initial field and open the session
    ///
    /// Allowed only from `Uninitialized`. A backend failure leaves the
    /// session in `Failed`; there is no automatic retry.
    pub async fn init(&mut self) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            return Err(GameError::InvalidPhase(self.phase));
        }
        self.phase = Phase::Loading;

        match self.backend.init(self.grid_size).await {
            Ok(_field) => {
                // The field stays with the backend; cells reveal one by one.
                self.phase = Phase::Ready;
                tracing::info!(
                    session = %self.id.0,
                    size = self.grid_size,
                    "Session initialized"
                );
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Failed;
                tracing::error!(session = %self.id.0, "Init failed: {}", e);
                Err(e)
            }
        }
    }

    /// Reveal one cell
    ///
    /// Allowed only from `Ready`; a call while `MoveInFlight` or on an
    /// already-revealed cell is rejected before any backend traffic. The cell
    /// counts as revealed even when the backend rejects the move or the
    /// transport fails mid-call (see DESIGN.md on this compatibility rule).
    pub async fn make_move(&mut self, row: usize, col: usize) -> Result<()> {
        if self.phase != Phase::Ready {
            return Err(GameError::InvalidPhase(self.phase));
        }
        if row >= self.grid_size || col >= self.grid_size {
            return Err(GameError::OutOfBounds { row, col });
        }
        if self.cells[row][col].revealed {
            return Err(GameError::AlreadyRevealed { row, col });
        }

        // 1-based linear index expected by the backend
        let index = row * self.grid_size + col + 1;
        self.phase = Phase::MoveInFlight;
        tracing::debug!(session = %self.id.0, row, col, index, "Submitting move");

        let outcome = match self.backend.make_move(index).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.cells[row][col].revealed = true;
                self.phase = Phase::Failed;
                tracing::error!(session = %self.id.0, "Move transport failure: {}", e);
                return Err(e);
            }
        };

        if outcome.success {
            let field = match self.backend.current_value_map().await {
                Ok(field) => field,
                Err(e) => {
                    self.cells[row][col].revealed = true;
                    self.phase = Phase::Failed;
                    return Err(e);
                }
            };
            let value = field.get(row).and_then(|r| r.get(col)).copied();
            let cell = &mut self.cells[row][col];
            cell.revealed = true;
            cell.value = value;
            self.last_revealed = Some((row, col));

            match self.backend.get_accuracy().await {
                Ok(acc) => self.accuracy = Some(clamp_accuracy(acc)),
                Err(e) => {
                    self.phase = Phase::Failed;
                    return Err(e);
                }
            }
            tracing::debug!(session = %self.id.0, "{}", outcome.message);
        } else {
            // Rejected move still consumes the reveal; no value to show.
            self.cells[row][col].revealed = true;
            tracing::warn!(session = %self.id.0, "Move rejected: {}", outcome.message);
        }

        self.phase = Phase::Ready;
        Ok(())
    }

    /// Query the backend's completion predicate
    ///
    /// On completion the accuracy is fetched one final time and frozen.
    /// Idempotent once `Complete`.
    pub async fn check_completion(&mut self) -> Result<bool> {
        match self.phase {
            Phase::Complete => return Ok(true),
            Phase::Ready => {}
            other => return Err(GameError::InvalidPhase(other)),
        }

        let complete = match self.backend.is_complete().await {
            Ok(complete) => complete,
            Err(e) => {
                self.phase = Phase::Failed;
                return Err(e);
            }
        };
        if !complete {
            return Ok(false);
        }

        match self.backend.get_accuracy().await {
            Ok(acc) => self.accuracy = Some(clamp_accuracy(acc)),
            Err(e) => {
                self.phase = Phase::Failed;
                return Err(e);
            }
        }
        self.phase = Phase::Complete;
        tracing::info!(
            session = %self.id.0,
            accuracy = ?self.accuracy,
            "Session complete"
        );
        Ok(true)
    }
}

fn clamp_accuracy(acc: f64) -> f64 {
    if !(0.0..=1.0).contains(&acc) {
        tracing::warn!("Backend accuracy {} outside [0, 1], clamping", acc);
    }
    acc.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::backend::MoveOutcome;

    async fn ready_session(size: usize) -> SimulationSession<ScriptedBackend> {
        let backend = ScriptedBackend::with_uniform_field(size, 480.0);
        let mut session = SimulationSession::new(size, backend);
        session.init().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_init_transitions_to_ready() {
        let session = ready_session(3).await;
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session
            .snapshot()
            .iter()
            .flatten()
            .all(|c| !c.revealed && c.value.is_none()));
    }

    #[tokio::test]
    async fn test_init_failure_is_terminal() {
        let backend = ScriptedBackend::with_uniform_field(3, 480.0);
        backend.script().borrow_mut().init_fails = true;
        let mut session = SimulationSession::new(3, backend);
        assert!(session.init().await.is_err());
        assert_eq!(session.phase(), Phase::Failed);
        // No retry from Failed
        assert!(matches!(
            session.init().await,
            Err(GameError::InvalidPhase(Phase::Failed))
        ));
    }

    #[tokio::test]
    async fn test_move_reveals_cell_with_value() {
        let mut session = ready_session(3).await;
        session.make_move(1, 2).await.unwrap();

        let cell = session.snapshot()[1][2];
        assert!(cell.revealed);
        assert_eq!(cell.value, Some(480.0));
        assert_eq!(session.last_revealed(), Some((1, 2)));
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_already_revealed_skips_backend() {
        let mut session = ready_session(3).await;
        let script = session.backend.script();
        session.make_move(0, 0).await.unwrap();
        let calls_before = script.borrow().move_calls;

        let result = session.make_move(0, 0).await;
        assert!(matches!(
            result,
            Err(GameError::AlreadyRevealed { row: 0, col: 0 })
        ));
        assert_eq!(script.borrow().move_calls, calls_before);
        assert_eq!(session.last_revealed(), Some((0, 0)));
    }

    #[tokio::test]
    async fn test_out_of_bounds_rejected() {
        let mut session = ready_session(3).await;
        let script = session.backend.script();
        assert!(matches!(
            session.make_move(3, 0).await,
            Err(GameError::OutOfBounds { .. })
        ));
        assert_eq!(script.borrow().move_calls, 0);
    }

    #[tokio::test]
    async fn test_rejected_move_still_reveals() {
        let mut session = ready_session(3).await;
        session
            .backend
            .script()
            .borrow_mut()
            .move_outcomes
            .push_back(Ok(MoveOutcome {
                success: false,
                message: "cell outside melt zone".into(),
            }));

        session.make_move(2, 2).await.unwrap();

        let cell = session.snapshot()[2][2];
        assert!(cell.revealed);
        assert!(cell.value.is_none());
        // last_revealed tracks successful reveals only
        assert_eq!(session.last_revealed(), None);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_transport_failure_fails_session() {
        let mut session = ready_session(3).await;
        let script = session.backend.script();
        script
            .borrow_mut()
            .move_outcomes
            .push_back(Err(GameError::Backend("timeout".into())));

        assert!(session.make_move(0, 1).await.is_err());
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.snapshot()[0][1].revealed);

        // Terminal: further moves are rejected without backend calls
        let calls = script.borrow().move_calls;
        assert!(session.make_move(1, 1).await.is_err());
        assert_eq!(script.borrow().move_calls, calls);
    }

    #[tokio::test]
    async fn test_completion_freezes_accuracy() {
        let mut session = ready_session(3).await;
        let script = session.backend.script();
        session.make_move(0, 0).await.unwrap();
        script.borrow_mut().complete = true;
        script.borrow_mut().accuracy = 0.6;

        assert!(session.check_completion().await.unwrap());
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.accuracy(), Some(0.6));

        // Idempotent from Complete, even if the backend later disagrees
        script.borrow_mut().accuracy = 0.1;
        assert!(session.check_completion().await.unwrap());
        assert_eq!(session.accuracy(), Some(0.6));
    }

    #[tokio::test]
    async fn test_accuracy_clamped_to_unit_range() {
        let mut session = ready_session(3).await;
        session.backend.script().borrow_mut().accuracy = 1.7;
        session.make_move(0, 0).await.unwrap();
        assert_eq!(session.accuracy(), Some(1.0));
    }

    #[tokio::test]
    async fn test_sessions_have_distinct_ids() {
        let a = ready_session(3).await;
        let b = ready_session(3).await;
        assert_ne!(a.id(), b.id());
    }
}
