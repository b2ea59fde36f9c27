//! Game coordination
//!
//! Binds at most one live session to the selected level and the progress
//! store. The coordinator is the only writer of persisted progression and the
//! only owner of a session; starting a level drops the previous session whole,
//! and nothing from a replaced session is ever applied to shared state.

use crate::backend::SimulationBackend;
use crate::core::error::{GameError, Result};
use crate::levels::{LevelCatalog, LevelDefinition};
use crate::progress::ProgressStore;
use crate::session::{Phase, SimulationSession};

/// Read-only projection of the running game for a rendering surface
#[derive(Debug, Clone)]
pub struct GameView {
    pub level: u32,
    pub grid_size: usize,
    /// Revealed temperatures, row-major; None for unrevealed cells
    pub values: Vec<Vec<Option<f64>>>,
    pub revealed: Vec<Vec<bool>>,
    pub last_revealed: Option<(usize, usize)>,
    pub accuracy: Option<f64>,
    pub required_score: f64,
    pub complete: bool,
    pub phase: Phase,
}

/// One catalog entry joined with the persisted record, for level select
#[derive(Debug, Clone, Copy)]
pub struct LevelStatus {
    pub definition: LevelDefinition,
    pub completed: bool,
    pub active: bool,
}

/// Orchestrates sessions, levels, and persisted progression
pub struct GameCoordinator<B, F>
where
    B: SimulationBackend,
    F: FnMut() -> Result<B>,
{
    catalog: LevelCatalog,
    store: ProgressStore,
    make_backend: F,
    session: Option<SimulationSession<B>>,
    active: Option<LevelDefinition>,
}

impl<B, F> GameCoordinator<B, F>
where
    B: SimulationBackend,
    F: FnMut() -> Result<B>,
{
    pub fn new(catalog: LevelCatalog, store: ProgressStore, make_backend: F) -> Self {
        Self {
            catalog,
            store,
            make_backend,
            session: None,
            active: None,
        }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Catalog joined with the persisted record; never mutates catalog entries
    pub fn level_statuses(&self) -> Result<Vec<LevelStatus>> {
        let record = self.store.load()?;
        Ok(self
            .catalog
            .all()
            .iter()
            .map(|definition| LevelStatus {
                definition: *definition,
                completed: record.completed[definition.number as usize - 1],
                active: record.active == definition.number,
            })
            .collect())
    }

    /// Start (or restart) a level with a fresh session
    ///
    /// The previous session is discarded before the new one is built. The
    /// persisted active level is only advanced once the new session has
    /// initialized; an init failure leaves the failed session visible so the
    /// UI can offer a retry.
    pub async fn start_level(&mut self, number: u32) -> Result<()> {
        let level = *self.catalog.get(number)?;

        self.session = None;
        self.active = Some(level);

        let backend = (self.make_backend)()?;
        let mut session = SimulationSession::new(level.grid_size, backend);
        let init_result = session.init().await;
        self.session = Some(session);
        init_result?;

        self.store.set_active_level(number)?;
        tracing::info!(level = number, size = level.grid_size, "Level started");
        Ok(())
    }

    /// Apply one reveal to the active session
    ///
    /// A move on an already-revealed cell (or while one is in flight) is a
    /// silent no-op. After the move, completion is checked; an accuracy
    /// strictly above the level's required score marks the level completed.
    /// Meeting the threshold exactly does not unlock.
    pub async fn apply_move(&mut self, row: usize, col: usize) -> Result<()> {
        let level = self.active.ok_or(GameError::InvalidPhase(Phase::Uninitialized))?;
        let session = self
            .session
            .as_mut()
            .ok_or(GameError::InvalidPhase(Phase::Uninitialized))?;
        let session_id = session.id();

        match session.make_move(row, col).await {
            Ok(()) => {}
            Err(GameError::AlreadyRevealed { .. }) => {
                tracing::debug!(row, col, "Ignoring move on revealed cell");
                return Ok(());
            }
            Err(GameError::InvalidPhase(Phase::MoveInFlight)) => {
                tracing::debug!(row, col, "Ignoring move while one is in flight");
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        let complete = match self.session.as_mut() {
            Some(session) if session.id() == session_id && session.phase() == Phase::Ready => {
                session.check_completion().await?
            }
            _ => return Ok(()),
        };
        if !complete {
            return Ok(());
        }

        // Stale-result guard: only the still-active session may touch the store
        let accuracy = match self.session.as_ref() {
            Some(session) if session.id() == session_id => session.accuracy(),
            _ => return Ok(()),
        };

        if let Some(accuracy) = accuracy {
            if accuracy * 100.0 > level.required_score {
                self.store.mark_completed(level.number)?;
            } else {
                tracing::info!(
                    accuracy = accuracy * 100.0,
                    required = level.required_score,
                    "Completed below threshold"
                );
            }
        }
        Ok(())
    }

    /// Restart the active level, discarding all revealed state and accuracy
    pub async fn reset(&mut self) -> Result<()> {
        let level = self.active.ok_or(GameError::InvalidPhase(Phase::Uninitialized))?;
        self.start_level(level.number).await
    }

    /// Derived view for rendering, recomputed from the session snapshot
    pub fn view(&self) -> Option<GameView> {
        let level = self.active?;
        let session = self.session.as_ref()?;
        let snapshot = session.snapshot();

        Some(GameView {
            level: level.number,
            grid_size: session.grid_size(),
            values: snapshot
                .iter()
                .map(|row| row.iter().map(|c| c.value).collect())
                .collect(),
            revealed: snapshot
                .iter()
                .map(|row| row.iter().map(|c| c.revealed).collect())
                .collect(),
            last_revealed: session.last_revealed(),
            accuracy: session.accuracy(),
            required_score: level.required_score,
            complete: session.is_complete(),
            phase: session.phase(),
        })
    }
}
