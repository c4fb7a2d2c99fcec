use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::formation::{ColorId, Formation, FormationKind, Position};
use crate::playfield::{Cell, Playfield, GRID_HEIGHT, GRID_WIDTH};

// ============================================================================
// Configuration
// ============================================================================

// Timing (in milliseconds)
pub const BASE_FALL_INTERVAL_MS: u64 = 500;
pub const MIN_FALL_INTERVAL_MS: u64 = 50;
pub const SPEED_INCREASE_PER_LEVEL: u64 = 50;
pub const LINES_PER_LEVEL: u32 = 10;

// Scoring, indexed by rows cleared at once
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];
pub const SOFT_DROP_SCORE: u32 = 1;
pub const HARD_DROP_SCORE_PER_ROW: u32 = 2;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    GameOver,
}

/// Outgoing notifications for the render layer. Nothing in the engine reads them back.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked {
        cells: Vec<Position>,
        color: ColorId,
    },
    HardDropped {
        distance: u32,
        cells: Vec<Position>,
        color: ColorId,
    },
    LinesCleared {
        rows: Vec<usize>,
    },
    LevelUp(u32),
    GameRestarted,
    GameOver,
}

pub fn line_clear_score(rows: usize, level: u32) -> u32 {
    LINE_SCORES[rows.min(LINE_SCORES.len() - 1)] * level
}

pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

pub fn fall_interval_for_level(level: u32) -> u64 {
    let speed_reduction = u64::from(level.saturating_sub(1)) * SPEED_INCREASE_PER_LEVEL;
    BASE_FALL_INTERVAL_MS
        .saturating_sub(speed_reduction)
        .max(MIN_FALL_INTERVAL_MS)
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> FormationKind;
}

pub struct RandomPieceProvider;

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> FormationKind {
        FormationKind::random(&mut rand::thread_rng())
    }
}

/// Reproducible draws for a given seed.
pub struct SeededPieceProvider {
    rng: StdRng,
}

impl SeededPieceProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PieceProvider for SeededPieceProvider {
    fn next_piece(&mut self) -> FormationKind {
        FormationKind::random(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<FormationKind>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<FormationKind>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> FormationKind {
        if self.pieces.is_empty() {
            return FormationKind::O;
        }
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    field: Playfield,
    current: Formation,
    next: Formation,
    score: u32,
    level: u32,
    lines_cleared: u32,
    fall_interval_ms: u64,
    fall_accumulator_ms: u64,
    pending_clear_rows: Vec<usize>,
    state: GameState,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_provider(Box::new(SeededPieceProvider::new(seed)))
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        let mut game = Self::blank(Playfield::new(), provider);
        game.spawn_initial();
        game
    }

    /// Starts from a prepared field with `current` already in play. `next` is drawn
    /// from `provider`.
    pub fn with_field(
        field: Playfield,
        current: Formation,
        mut provider: Box<dyn PieceProvider>,
    ) -> Self {
        let next = Formation::spawn(provider.next_piece());
        let mut game = Self::blank(field, provider);
        game.current = current;
        game.next = next;
        game
    }

    fn blank(field: Playfield, provider: Box<dyn PieceProvider>) -> Self {
        Self {
            field,
            current: Formation::spawn(FormationKind::O),
            next: Formation::spawn(FormationKind::O),
            score: 0,
            level: 1,
            lines_cleared: 0,
            fall_interval_ms: fall_interval_for_level(1),
            fall_accumulator_ms: 0,
            pending_clear_rows: Vec::new(),
            state: GameState::Playing,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Draws a fresh current and next formation.
    pub fn spawn_initial(&mut self) {
        self.current = Formation::spawn(self.piece_provider.next_piece());
        self.next = Formation::spawn(self.piece_provider.next_piece());
    }

    /// Player move. A successful downward move scores as a soft drop.
    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if !self.current.try_move(&self.field, dx, dy) {
            return false;
        }
        if dy > 0 {
            self.score += SOFT_DROP_SCORE;
        }
        self.events.push(GameEvent::PieceMoved);
        true
    }

    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        if self.current.try_rotate(&self.field) {
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    pub fn hard_drop(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        let mut distance = 0;
        while self.current.try_move(&self.field, 0, 1) {
            distance += 1;
        }
        self.score += HARD_DROP_SCORE_PER_ROW * distance;
        if distance > 0 {
            self.events.push(GameEvent::HardDropped {
                distance,
                cells: self.current.cells(),
                color: self.current.color,
            });
        }
        self.land();
    }

    /// Advances gravity by `elapsed_ms`, one row per elapsed fall interval.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.state != GameState::Playing {
            return;
        }
        self.fall_accumulator_ms += elapsed_ms;
        while self.state == GameState::Playing
            && self.fall_accumulator_ms >= self.fall_interval_ms
        {
            self.fall_accumulator_ms -= self.fall_interval_ms;
            if !self.current.try_move(&self.field, 0, 1) {
                self.land();
            }
        }
    }

    pub fn restart(&mut self) {
        self.field = Playfield::new();
        self.score = 0;
        self.level = 1;
        self.lines_cleared = 0;
        self.fall_interval_ms = fall_interval_for_level(1);
        self.fall_accumulator_ms = 0;
        self.pending_clear_rows.clear();
        self.state = GameState::Playing;
        self.events.clear();
        self.spawn_initial();
        self.events.push(GameEvent::GameRestarted);
        info!("game restarted");
    }

    /// Ends the line-clear highlight. The rows left the field when they were detected.
    pub fn dismiss_pending_clear(&mut self) {
        self.pending_clear_rows.clear();
    }

    fn land(&mut self) {
        let cells = self.current.cells();
        self.field.commit(&cells, self.current.color);
        debug!("{:?} locked at {:?}", self.current.kind, self.current.origin);
        self.events.push(GameEvent::PieceLocked {
            cells,
            color: self.current.color,
        });

        let rows = self.field.full_rows();
        if !rows.is_empty() {
            self.field.clear_rows(&rows);
            self.lines_cleared += rows.len() as u32;
            self.score += line_clear_score(rows.len(), self.level);
            debug!("cleared rows {:?}, {} lines total", rows, self.lines_cleared);
            self.events.push(GameEvent::LinesCleared { rows: rows.clone() });
            self.pending_clear_rows = rows;
        }

        let level = level_for_lines(self.lines_cleared);
        if level > self.level {
            debug!("level up to {}", level);
            self.events.push(GameEvent::LevelUp(level));
        }
        self.level = level;
        self.fall_interval_ms = fall_interval_for_level(level);

        self.spawn_next_piece();
    }

    fn spawn_next_piece(&mut self) {
        let upcoming = Formation::spawn(self.piece_provider.next_piece());
        let promoted = std::mem::replace(&mut self.next, upcoming);
        self.current = Formation::spawn(promoted.kind);

        if !self.field.is_valid_placement(&self.current.cells()) {
            self.state = GameState::GameOver;
            self.events.push(GameEvent::GameOver);
            info!(
                "game over: score {}, level {}, lines {}",
                self.score, self.level, self.lines_cleared
            );
        }
    }

    // ------------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------------

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    pub fn current(&self) -> &Formation {
        &self.current
    }

    pub fn next(&self) -> &Formation {
        &self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn fall_interval_ms(&self) -> u64 {
        self.fall_interval_ms
    }

    pub fn pending_clear_rows(&self) -> &[usize] {
        &self.pending_clear_rows
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Where the current formation would come to rest if dropped now.
    pub fn ghost_cells(&self) -> Vec<Position> {
        let mut ghost = self.current.clone();
        while ghost.try_move(&self.field, 0, 1) {}
        ghost.cells()
    }

    /// Returns the visual grid state with the current piece overlaid
    pub fn render_grid(&self) -> Vec<[Cell; GRID_WIDTH]> {
        let mut visual_grid = self.field.rows().to_vec();

        for block in self.current.cells() {
            if block.y >= 0
                && block.y < GRID_HEIGHT as i16
                && block.x >= 0
                && block.x < GRID_WIDTH as i16
            {
                visual_grid[block.y as usize][block.x as usize] =
                    Cell::Filled(self.current.color);
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub const FILL: Cell = Cell::Filled(ColorId(2));

    pub fn fill_row(field: &mut Playfield, y: usize) {
        for x in 0..GRID_WIDTH {
            field.set(x, y, FILL);
        }
    }

    pub fn fill_row_with_gap(field: &mut Playfield, y: usize, gap_x: usize) {
        for x in 0..GRID_WIDTH {
            if x != gap_x {
                field.set(x, y, FILL);
            }
        }
    }

    pub fn sequence(pieces: &[FormationKind]) -> Box<dyn PieceProvider> {
        Box::new(SequencePieceProvider::new(pieces.to_vec()))
    }
}
