use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::net::SolverClient;
use crate::ui;
use wordle_core::{
    Controller, FocusTransfer, InputEvent, InputRouter, Key, Platform, Position, SolveRequest,
    SolveResult, SolveSession,
};

/// A focus move waiting out the touch delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingFocus {
    pub target: Position,
    pub due: Instant,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    Submit(SolveRequest),
}

pub struct App {
    pub controller: Controller,
    pub router: InputRouter,
    pub session: SolveSession,
    /// Tile that owns input. `None` while a deferred focus is pending.
    pub cursor: Option<Position>,
    pub pending_focus: Option<PendingFocus>,
    /// Terminal area of the last frame, for mouse hit-testing.
    pub viewport: Rect,
}

impl App {
    pub fn new(platform: Platform) -> Self {
        Self {
            controller: Controller::new(),
            router: InputRouter::new(platform),
            session: SolveSession::new(),
            cursor: Some(Position::ORIGIN),
            pending_focus: None,
            viewport: Rect::default(),
        }
    }

    /// Where the next keystroke lands.
    fn input_target(&self) -> Position {
        self.cursor
            .or(self.pending_focus.map(|p| p.target))
            .unwrap_or(Position::ORIGIN)
    }

    pub fn handle_event(&mut self, event: Event) -> Control {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Control::Continue
            }
            Event::Paste(text) => {
                self.dispatch(InputEvent::Paste {
                    at: self.input_target(),
                    text,
                });
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Control {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl {
            return self.handle_shortcut(key);
        }

        let at = self.input_target();
        let key = match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char(c)
                if c.is_ascii_alphabetic() && self.router.platform() == Platform::Touch =>
            {
                // Touch input methods report committed text, not keystrokes.
                self.dispatch(InputEvent::Compose {
                    at,
                    raw: c.to_string(),
                });
                return Control::Continue;
            }
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Enter => Key::Enter,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            _ => return Control::Continue,
        };
        self.dispatch(InputEvent::Key { at, key });
        Control::Continue
    }

    fn handle_shortcut(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => return self.request_solve(),
            KeyCode::Backspace if key.modifiers.contains(KeyModifiers::SHIFT) => self.clear_all(),
            KeyCode::Char('l') => self.clear_all(),
            KeyCode::Char('t') => self.session.toggle_hard_mode(),
            KeyCode::Char('x') => self.session.toggle_exclude_known(),
            KeyCode::Char('d') => self.dump_state(),
            KeyCode::Char('c') => return Control::Quit,
            _ => {}
        }
        Control::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(at) = ui::cell_at(self.viewport, mouse.column, mouse.row) {
            self.dispatch(InputEvent::Click(at));
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        match self.router.route(&mut self.controller, event) {
            Ok(routed) => {
                if let Some(transfer) = routed.focus {
                    self.apply_focus(transfer, Instant::now());
                }
            }
            // Every event is built from a hit-tested or existing position.
            Err(e) => warn!(error = %e, "input event rejected"),
        }
    }

    fn apply_focus(&mut self, transfer: FocusTransfer, now: Instant) {
        match transfer {
            FocusTransfer::Immediate(target) => {
                self.pending_focus = None;
                self.cursor = Some(target);
            }
            FocusTransfer::Deferred { target, delay } => {
                self.cursor = None;
                self.pending_focus = Some(PendingFocus {
                    target,
                    due: now + delay,
                });
            }
        }
    }

    /// Land a deferred focus move. Does nothing if the target went away.
    pub fn activate_pending_focus(&mut self) {
        let Some(pending) = self.pending_focus.take() else {
            return;
        };
        if self.controller.board().get_at(pending.target).is_ok() {
            debug!(at = %pending.target, "deferred focus activated");
            self.cursor = Some(pending.target);
        }
    }

    pub fn request_solve(&mut self) -> Control {
        match self.session.begin(self.controller.board()) {
            Ok(request) => Control::Submit(request),
            Err(_) => Control::Continue,
        }
    }

    pub fn finish_solve(&mut self, result: SolveResult) {
        if let Err(e) = self.session.finish(result, Instant::now()) {
            warn!(error = %e, "dropping unexpected solve result");
        }
    }

    pub fn clear_all(&mut self) {
        info!("clearing board");
        self.controller.reset_all();
        self.session.reset();
        self.pending_focus = None;
        self.cursor = Some(Position::ORIGIN);
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.expire(now);
    }

    fn dump_state(&self) {
        let board = self.controller.board();
        let options = self.session.options();
        info!(
            invalid_letters = ?board.derive_invalid_letters(),
            hard_mode = options.hard_mode,
            exclude_known = options.exclude_known_letters,
            platform = ?self.router.platform(),
            cursor = ?self.cursor,
            "grid state\n{}",
            board
        );
    }
}

pub fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_run(settings))
}

async fn async_run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let client = SolverClient::new(&settings)?;
    info!(url = client.solve_url(), platform = ?settings.platform, "starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings.platform);
    let result = run_loop(&mut terminal, &mut app, &client).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &SolverClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut event_stream = EventStream::new();
    let tick_rate = Duration::from_millis(250);
    let (solve_tx, mut solve_rx) = mpsc::unbounded_channel::<SolveResult>();

    loop {
        let frame_area = terminal.draw(|f| ui::draw(f, app))?.area;
        app.viewport = frame_area;

        let focus_pending = app.pending_focus.is_some();
        let focus_due = tokio::time::Instant::from_std(
            app.pending_focus
                .map(|p| p.due)
                .unwrap_or_else(Instant::now),
        );

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) => match app.handle_event(event) {
                        Control::Quit => return Ok(()),
                        Control::Submit(request) => {
                            spawn_solve(client.clone(), request, solve_tx.clone());
                        }
                        Control::Continue => {}
                    },
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
            Some(result) = solve_rx.recv() => app.finish_solve(result),
            _ = tokio::time::sleep_until(focus_due), if focus_pending => {
                app.activate_pending_focus();
            }
            _ = tokio::time::sleep(tick_rate) => {}
        }

        app.tick(Instant::now());
    }
}

/// Run one solve on its own task so the board stays editable meanwhile.
fn spawn_solve(client: SolverClient, request: SolveRequest, tx: mpsc::UnboundedSender<SolveResult>) {
    tokio::spawn(async move {
        let result = client.submit(&request).await;
        let _ = tx.send(result);
    });
}
