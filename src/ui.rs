use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::formation::{ColorId, FormationKind, Position};
use crate::playfield::{Cell, GRID_HEIGHT, GRID_WIDTH};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const GHOST_CHAR: &str = "░░";
const EMPTY_CHAR: &str = " ·";

// ============================================================================
// Color Mapping
// ============================================================================

pub fn color_for(color: ColorId) -> Color {
    match FormationKind::ALL.get(color.0 as usize) {
        Some(FormationKind::I) => Color::Rgb(0, 240, 255),
        Some(FormationKind::O) => Color::Rgb(255, 220, 0),
        Some(FormationKind::T) => Color::Rgb(160, 80, 255),
        Some(FormationKind::S) => Color::Rgb(80, 255, 80),
        Some(FormationKind::Z) => Color::Rgb(255, 80, 80),
        Some(FormationKind::J) => Color::Rgb(80, 120, 255),
        Some(FormationKind::L) => Color::Rgb(255, 160, 0),
        None => Color::Gray,
    }
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    render_game(frame, app, area);
    if app.game.is_game_over() {
        render_game_over(frame, app, area);
    }
}

fn render_game(frame: &mut Frame, app: &App, area: Rect) {
    let grid_display_width = (GRID_WIDTH as u16 * CELL_WIDTH) + 2;
    let grid_display_height = GRID_HEIGHT as u16 + 2;
    let side_width = 20;
    let total_width = grid_display_width + side_width + 2;

    let main_area = centered_rect(total_width, grid_display_height, area);

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(main_area);

    render_grid(frame, app, horizontal[0]);

    let side = Layout::vertical([
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    render_next(frame, app, side[0]);
    render_stats(frame, app, side[1]);
    render_controls(frame, side[2]);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let game = &app.game;
    let visual_grid = game.render_grid();
    let ghost: Vec<Position> = if app.settings.show_ghost && !game.is_game_over() {
        game.ghost_cells()
    } else {
        Vec::new()
    };
    let flashed = |x: usize, y: usize| {
        app.drop_flashes.iter().any(|flash| {
            flash
                .cells
                .contains(&Position::new(x as i16, y as i16))
        })
    };

    let mut lines: Vec<Line> = Vec::new();

    for (y, row) in visual_grid.iter().enumerate() {
        let clearing = game.pending_clear_rows().contains(&y);
        let mut spans: Vec<Span> = Vec::new();

        for (x, cell) in row.iter().enumerate() {
            let span = match *cell {
                Cell::Filled(color) => {
                    let mut style = Style::default().fg(color_for(color));
                    if flashed(x, y) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    Span::styled(BLOCK_CHAR, style)
                }
                Cell::Empty if ghost.contains(&Position::new(x as i16, y as i16)) => Span::styled(
                    GHOST_CHAR,
                    Style::default().fg(color_for(game.current().color)),
                ),
                Cell::Empty => Span::styled(EMPTY_CHAR, Style::default().fg(Color::DarkGray)),
            };
            spans.push(span);
        }

        let mut line = Line::from(spans);
        if clearing {
            line.style = Style::default().bg(Color::White);
        }
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_next(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let next = app.game.next();
    let style = Style::default().fg(color_for(next.color));
    let mask = next.kind.layouts()[0];

    let lines: Vec<Line> = mask
        .iter()
        .filter(|row| row.contains('#'))
        .map(|row| {
            let spans: Vec<Span> = row
                .chars()
                .map(|c| {
                    if c == '#' {
                        Span::styled(BLOCK_CHAR, style)
                    } else {
                        Span::raw("  ")
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stats ")
        .title_alignment(Alignment::Center);

    let game = &app.game;
    let lines = vec![
        Line::from(Span::styled("Score", Style::default().fg(Color::Green))),
        Line::from(format!("{}", game.score())),
        Line::from(Span::styled("Level", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", game.level())),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", game.lines_cleared())),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Controls ")
        .title_alignment(Alignment::Center);

    let lines: Vec<Line> = [
        "←→/AD  Move",
        "↓/S    Soft drop",
        "↑/W    Rotate",
        "Space  Hard drop",
        "",
        "R      Restart",
        "Esc/Q  Quit",
    ]
    .into_iter()
    .map(Line::from)
    .collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_game_over(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Final Score: {}", app.game.score())),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to restart",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(26, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}
