use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::app::App;
use wordle_core::session::{Notification, SuggestionView, WordList};
use wordle_core::{Cell, Position, Status, COLS, ROWS};

// ── Constants ────────────────────────────────────────────────────────────────

const TILE_WIDTH: u16 = 7;
const TILE_HEIGHT: u16 = 3;
const TILE_GAP: u16 = 1;
const GRID_WIDTH: u16 = COLS as u16 * TILE_WIDTH + (COLS as u16 - 1) * TILE_GAP;
const GRID_HEIGHT: u16 = ROWS as u16 * TILE_HEIGHT;
const PANEL_WIDTH: u16 = 44;
const NOTICE_WIDTH: u16 = 40;

// ── Layout ───────────────────────────────────────────────────────────────────

struct Screen {
    grid: Rect,
    panel: Rect,
    hints: Rect,
}

fn screen(area: Rect) -> Screen {
    let outer = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);

    let h_chunks = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(GRID_WIDTH + 2),
        Constraint::Length(2),
        Constraint::Length(PANEL_WIDTH),
        Constraint::Min(0),
    ])
    .split(outer[0]);

    let grid_v = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(GRID_HEIGHT + 2),
        Constraint::Min(0),
    ])
    .split(h_chunks[1]);

    Screen {
        grid: grid_v[1],
        panel: h_chunks[3],
        hints: outer[1],
    }
}

/// Area inside the grid border where tiles are drawn.
pub fn grid_inner(viewport: Rect) -> Rect {
    screen(viewport).grid.inner(Margin::new(1, 1))
}

/// Tile under a terminal coordinate, if any. Gaps between tiles hit nothing.
pub fn cell_at(viewport: Rect, x: u16, y: u16) -> Option<Position> {
    let inner = grid_inner(viewport);
    if x < inner.x || y < inner.y || x >= inner.right() || y >= inner.bottom() {
        return None;
    }
    let dx = x - inner.x;
    if dx % (TILE_WIDTH + TILE_GAP) >= TILE_WIDTH {
        return None;
    }
    let col = (dx / (TILE_WIDTH + TILE_GAP)) as usize;
    let row = ((y - inner.y) / TILE_HEIGHT) as usize;
    Position::new(row, col).ok()
}

// ── Public entry point ───────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let layout = screen(f.area());
    draw_grid(f, app, layout.grid);
    draw_panel(f, app, layout.panel);
    draw_key_hints(f, layout.hints);

    if let Some(notice) = app.session.notification() {
        draw_notification(f, notice);
    }
}

// ── Grid ─────────────────────────────────────────────────────────────────────

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let board = app.controller.board();
    let mut lines: Vec<Line> = Vec::with_capacity(GRID_HEIGHT as usize);

    for (r, row) in board.rows().iter().enumerate() {
        for sub_row in 0..TILE_HEIGHT {
            let mut spans: Vec<Span> = Vec::new();
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    spans.push(Span::raw(" ".repeat(TILE_GAP as usize)));
                }
                let focused = app.cursor == Some(Position { row: r, col: c });
                spans.extend(render_tile(*cell, focused, sub_row));
            }
            lines.push(Line::from(spans));
        }
    }

    let block = Block::bordered()
        .title(" Wordle ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::White));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_color(status: Status) -> Option<Color> {
    match status {
        Status::None => None,
        Status::Absent => Some(Color::DarkGray),
        Status::Present => Some(Color::Yellow),
        Status::Correct => Some(Color::Green),
    }
}

fn render_tile(cell: Cell, focused: bool, sub_row: u16) -> Vec<Span<'static>> {
    let fill = status_color(cell.status);
    let bg = fill.unwrap_or(Color::Reset);
    let letter_fg = match cell.status {
        Status::Present | Status::Correct => Color::Black,
        _ => Color::White,
    };
    let letter_style = Style::default()
        .fg(letter_fg)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let letter = cell.letter.unwrap_or(' ');

    // Solid colored tile when unfocused, outlined otherwise.
    if fill.is_some() && !focused {
        return vec![if sub_row == 1 {
            Span::styled(format!("   {}   ", letter), letter_style)
        } else {
            Span::styled("       ", Style::default().bg(bg))
        }];
    }

    let border = Style::default()
        .fg(if focused { Color::Yellow } else { Color::DarkGray })
        .bg(bg)
        .add_modifier(if focused {
            Modifier::BOLD
        } else {
            Modifier::empty()
        });

    match sub_row {
        0 => vec![Span::styled("┌─────┐", border)],
        1 => vec![
            Span::styled("│  ", border),
            Span::styled(letter.to_string(), letter_style),
            Span::styled("  │", border),
        ],
        _ => vec![Span::styled("└─────┘", border)],
    }
}

// ── Side panel ───────────────────────────────────────────────────────────────

fn checkbox(label: &str, on: bool, shortcut: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            if on { " [x] " } else { " [ ] " },
            Style::default().fg(if on { Color::Green } else { Color::Gray }),
        ),
        Span::styled(label.to_string(), Style::default().fg(Color::White)),
        Span::styled(format!("  {}", shortcut), Style::default().fg(Color::DarkGray)),
    ])
}

fn draw_panel(f: &mut Frame, app: &App, area: Rect) {
    let options = app.session.options();
    let mut lines = vec![
        Line::from(""),
        checkbox("Hard mode", options.hard_mode, "^T"),
        checkbox("Exclude known letters", options.exclude_known_letters, "^X"),
        Line::from(""),
    ];

    if app.session.is_busy() {
        lines.push(Line::from(Span::styled(
            " ⏳ Solving…",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled(" ^S", Style::default().fg(Color::Yellow)),
            Span::styled(" Solve", Style::default().fg(Color::Gray)),
        ]));
    }

    if let Some(plan) = app.session.results() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Possible words: ", Style::default().fg(Color::Gray)),
            Span::styled(
                plan.word_count.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));

        match &plan.suggestions {
            SuggestionView::Answer { word, message } => {
                lines.push(Line::from(Span::styled(
                    format!(" 🎉 {} 🎉", word),
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!(" {}", message),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            SuggestionView::Ranked { note, words } => {
                if let Some(note) = note {
                    lines.push(Line::from(Span::styled(
                        format!(" 💡 {}", note),
                        Style::default().fg(Color::Yellow),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    " Suggestions",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )));
                for (i, word) in words.iter().enumerate() {
                    lines.push(Line::from(vec![
                        Span::styled(format!(" {:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                        Span::styled(word.clone(), Style::default().fg(Color::Cyan)),
                    ]));
                }
            }
            SuggestionView::Empty => {
                lines.push(Line::from(Span::styled(
                    " No suggestions available",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        match &plan.word_list {
            WordList::Hidden => {}
            WordList::Words(words) => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    " All possible words",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    format!(" {}", words.join(" ")),
                    Style::default().fg(Color::Gray),
                )));
            }
            WordList::TooMany => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    " Too many words to display (showing suggestions only)",
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let block = Block::bordered()
        .title(" Solver ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

// ── Key hints (bottom status bar) ────────────────────────────────────────────

fn draw_key_hints(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" A-Z", Style::default().fg(Color::Yellow)),
        Span::styled(" Type  ", Style::default().fg(Color::Gray)),
        Span::styled("Spc/Enter/Click", Style::default().fg(Color::Yellow)),
        Span::styled(" Color  ", Style::default().fg(Color::Gray)),
        Span::styled("Bksp", Style::default().fg(Color::Yellow)),
        Span::styled(" Erase  ", Style::default().fg(Color::Gray)),
        Span::styled("←↑↓→", Style::default().fg(Color::Yellow)),
        Span::styled(" Move  ", Style::default().fg(Color::Gray)),
        Span::styled("^S", Style::default().fg(Color::Yellow)),
        Span::styled(" Solve  ", Style::default().fg(Color::Gray)),
        Span::styled("^L", Style::default().fg(Color::Yellow)),
        Span::styled(" Clear  ", Style::default().fg(Color::Gray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" Quit", Style::default().fg(Color::Gray)),
    ]);

    let bar = Paragraph::new(hints).style(Style::default().bg(Color::DarkGray));
    f.render_widget(bar, area);
}

// ── Notification ─────────────────────────────────────────────────────────────

/// Bordered height needed to wrap `text` at `width`, capped at `max`.
fn notice_height(text: &str, width: u16, max: u16) -> u16 {
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let text_rows = text.chars().count().div_ceil(inner_width).max(1);
    u16::try_from(text_rows)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(max)
}

fn draw_notification(f: &mut Frame, notice: &Notification) {
    let area = f.area();
    let width = NOTICE_WIDTH.min(area.width);
    let height = notice_height(&notice.text, width, area.height);
    let popup = Rect::new(
        area.right().saturating_sub(width + 1),
        area.y + 1u16.min(area.height.saturating_sub(height)),
        width,
        height,
    );

    f.render_widget(Clear, popup);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::White).bg(Color::Red));

    let text = Paragraph::new(notice.text.clone())
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(text, popup);
}
