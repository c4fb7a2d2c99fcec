//! App: terminal init, frame loop, command dispatch and cosmetic timers.

use std::io::{self, stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::Settings;
use crate::formation::{ColorId, Position};
use crate::game::{Game, GameEvent};
use crate::input::{command_for, Command};
use crate::ui;

const DROP_FLASH: Duration = Duration::from_millis(150);

/// Cells briefly highlighted where a hard-dropped formation came to rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropFlash {
    pub cells: Vec<Position>,
    pub color: ColorId,
    pub remaining: Duration,
}

pub struct App {
    pub game: Game,
    pub settings: Settings,
    pub drop_flashes: Vec<DropFlash>,
    clear_elapsed: Duration,
    /// Set when rows were cleared since the last frame; that frame's time predates them.
    clear_started: bool,
    unticked: Duration,
    quit: bool,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let game = match settings.seed {
            Some(seed) => Game::seeded(seed),
            None => Game::new(),
        };
        Self::with_game(game, settings)
    }

    pub fn with_game(game: Game, settings: Settings) -> Self {
        Self {
            game,
            settings,
            drop_flashes: Vec::new(),
            clear_elapsed: Duration::ZERO,
            clear_started: false,
            unticked: Duration::ZERO,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.quit = true,
            Command::Restart => {
                self.game.restart();
                self.drop_flashes.clear();
                self.clear_elapsed = Duration::ZERO;
                self.clear_started = false;
                self.unticked = Duration::ZERO;
            }
            // The engine ignores these after game over.
            Command::MoveLeft => {
                self.game.move_piece(-1, 0);
            }
            Command::MoveRight => {
                self.game.move_piece(1, 0);
            }
            Command::SoftDrop => {
                self.game.move_piece(0, 1);
            }
            Command::Rotate => {
                self.game.rotate();
            }
            Command::HardDrop => self.game.hard_drop(),
        }
        self.drain_events();
    }

    /// One frame step: gravity, then the clear highlight and drop flashes.
    pub fn update(&mut self, elapsed: Duration) {
        self.unticked += elapsed;
        let ms = self.unticked.as_millis() as u64;
        self.unticked -= Duration::from_millis(ms);
        self.game.tick(ms);
        self.drain_events();

        if self.game.pending_clear_rows().is_empty() {
            self.clear_elapsed = Duration::ZERO;
        } else if self.clear_started {
            self.clear_started = false;
        } else {
            self.clear_elapsed += elapsed;
            if self.clear_elapsed >= self.settings.clear_flash {
                self.game.dismiss_pending_clear();
                self.clear_elapsed = Duration::ZERO;
            }
        }

        for flash in &mut self.drop_flashes {
            flash.remaining = flash.remaining.saturating_sub(elapsed);
        }
        self.drop_flashes.retain(|flash| !flash.remaining.is_zero());
    }

    fn drain_events(&mut self) {
        for event in self.game.take_events() {
            match event {
                GameEvent::HardDropped { cells, color, .. } => self.drop_flashes.push(DropFlash {
                    cells,
                    color,
                    remaining: DROP_FLASH,
                }),
                // A new clear restarts the highlight timer.
                GameEvent::LinesCleared { .. } => {
                    self.clear_elapsed = Duration::ZERO;
                    self.clear_started = true;
                }
                _ => {}
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        info!("starting with {:?}", self.settings);
        let mut terminal = setup_terminal().context("failed to set up terminal")?;
        let result = self.run_loop(&mut terminal);
        restore_terminal(&mut terminal).context("failed to restore terminal")?;
        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut last_frame = Instant::now();

        while !self.quit {
            terminal.draw(|frame| ui::render(frame, &*self))?;

            let timeout = self
                .settings
                .frame_duration
                .checked_sub(last_frame.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(command) = command_for(key) {
                        self.apply(command);
                    }
                }
            }

            let elapsed = last_frame.elapsed();
            if elapsed >= self.settings.frame_duration {
                last_frame = Instant::now();
                self.update(elapsed);
            }
        }
        info!("quit with score {}", self.game.score());
        Ok(())
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()
}
