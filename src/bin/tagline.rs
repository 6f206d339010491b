use std::{
    env, fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

use tagline_tui::config::Config;
use tagline_tui::editor::{KeyOutcome, NavKey, TagEditor};
use tagline_tui::render::{self, HitTarget, RenderResult};
use tagline_tui::surface::{NativeKey, Surface};
use tagline_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const SUGGESTION_BAR_HEIGHT: u16 = 3;
const USAGE: &str = "Usage: tagline [--config <path>] [--tag <label>]...

Options:
  --config <path>  Read suggested tags from <path> (default ~/.config/tagline/config.toml)
  --tag <label>    Suggest <label>; repeat to suggest several. Replaces configured tags.
  --help           Print this message

Set TAGLINE_LOG=<file> to write a log (level from RUST_LOG, default info).";

fn main() -> Result<()> {
    run()
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    tags: Vec<String>,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    bail!("--config needs a path\n\n{USAGE}");
                };
                parsed.config = Some(PathBuf::from(path));
            }
            "--tag" => {
                let Some(label) = args.next() else {
                    bail!("--tag needs a label\n\n{USAGE}");
                };
                parsed.tags.push(label);
            }
            "-h" | "--help" => parsed.help = true,
            other => bail!("unknown argument: {other}\n\n{USAGE}"),
        }
    }
    Ok(parsed)
}

/// Logging goes to a file because the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let Ok(path) = env::var("TAGLINE_LOG") else {
        return Ok(());
    };
    let file =
        fs::File::create(&path).with_context(|| format!("failed to create log file {path}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    init_logging()?;

    let mut config =
        Config::load_or_default(args.config.as_deref()).context("failed to load configuration")?;
    config.override_tags(args.tags);
    info!("starting with {} suggested tags", config.suggested_tags.len());

    let mut app = App::new(config.suggested_tags);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to initialize terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    clear_screen(&mut terminal);

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if res.is_ok() {
        println!("{}", app.editor.document().plain_text());
    }
    res
}

/// A failed clear only leaves stale cells until the first draw.
fn clear_screen<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>) -> bool {
    match terminal.clear() {
        Ok(()) => true,
        Err(err) => {
            debug!("failed to clear terminal: {err}");
            false
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit {
        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt);
            needs_redraw = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let had_message_before = app.status_message.is_some();
            app.prune_status_message();
            last_tick = Instant::now();
            if had_message_before && app.status_message.is_none() {
                needs_redraw = true;
            }
        }
    }

    Ok(())
}

/// Which part of the screen receives keyboard input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FocusZone {
    Board,
    Suggestions,
}

struct App {
    editor: TagEditor<Surface>,
    theme: Theme,
    zone: FocusZone,
    selected_suggestion: usize,
    should_quit: bool,
    status_message: Option<(String, Instant)>,
    scroll_top: usize,
    board_area: Rect,
    board_inner: Rect,
    suggestion_inner: Rect,
    board_render: Option<RenderResult>,
    suggestion_render: Option<RenderResult>,
}

impl App {
    fn new(suggested_tags: Vec<String>) -> Self {
        let mut editor = TagEditor::new(Surface::new(), suggested_tags);
        editor.focus_end();
        Self {
            editor,
            theme: Theme::new(),
            zone: FocusZone::Board,
            selected_suggestion: 0,
            should_quit: false,
            status_message: None,
            scroll_top: 0,
            board_area: Rect::default(),
            board_inner: Rect::default(),
            suggestion_inner: Rect::default(),
            board_render: None,
            suggestion_render: None,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message
            && instant.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }
        frame.render_widget(Block::default().style(self.theme.background_style()), area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(SUGGESTION_BAR_HEIGHT),
                Constraint::Length(1),
            ])
            .split(area);
        let board_area = vertical[0];
        let suggestion_area = vertical[1];
        let status_area = vertical[2];

        let board_block = Block::default()
            .borders(Borders::ALL)
            .title(" Tags ")
            .border_style(
                self.theme
                    .board_border_style(self.zone == FocusZone::Board),
            );
        let board_inner = board_block.inner(board_area);
        let render = render::render_board(
            self.editor.document(),
            self.editor.registry(),
            self.editor.platform(),
            self.editor.platform().caret(),
            &self.theme,
            board_inner.width.max(1) as usize,
        );
        let viewport_height = board_inner.height as usize;
        self.adjust_scroll(&render, viewport_height);

        let paragraph = Paragraph::new(Text::from(render.lines.clone()))
            .block(board_block)
            .scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, board_area);

        if self.zone == FocusZone::Board
            && let Some(cursor) = render.cursor
            && cursor.line >= self.scroll_top
            && cursor.line < self.scroll_top + viewport_height
            && board_inner.width > 0
        {
            let cursor_y = board_inner.y + (cursor.line - self.scroll_top) as u16;
            let cursor_x = board_inner.x + cursor.column.min(board_inner.width - 1);
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }

        let suggestion_block = Block::default()
            .borders(Borders::ALL)
            .title(" Suggestions (Tab, Alt+1..9) ")
            .border_style(
                self.theme
                    .board_border_style(self.zone == FocusZone::Suggestions),
            );
        let suggestion_inner = suggestion_block.inner(suggestion_area);
        let selected = (self.zone == FocusZone::Suggestions).then_some(self.selected_suggestion);
        let suggestions = render::render_suggestions(
            self.editor.suggested_tags(),
            selected,
            &self.theme,
            suggestion_inner.width.max(1) as usize,
        );
        let paragraph =
            Paragraph::new(Text::from(suggestions.lines.clone())).block(suggestion_block);
        frame.render_widget(paragraph, suggestion_area);

        let status_line = self.status_line(status_area.width as usize);
        let status_widget = Paragraph::new(status_line)
            .block(Block::default().borders(Borders::NONE))
            .style(self.theme.status_bar_style());
        frame.render_widget(status_widget, status_area);

        self.board_area = board_area;
        self.board_inner = board_inner;
        self.suggestion_inner = suggestion_inner;
        self.board_render = Some(render);
        self.suggestion_render = Some(suggestions);
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if let Some(cursor) = render.cursor {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            } else if cursor.line >= self.scroll_top + viewport {
                self.scroll_top = cursor.line + 1 - viewport;
            }
        }
        self.scroll_top = self.scroll_top.min(max_scroll);
    }

    fn status_line(&mut self, terminal_width: usize) -> Line<'static> {
        self.prune_status_message();
        if let Some((message, _)) = &self.status_message {
            return Line::from(Span::raw(message.clone()));
        }

        let document = self.editor.document();
        let tags = document.tag_count();
        let summary = format!(
            "{} tag{}: {}",
            tags,
            if tags == 1 { "" } else { "s" },
            document.plain_text()
        );
        let shortcuts = "Tab:Switch ^Q:Quit";
        let summary_width = summary.chars().count();
        let shortcuts_width = shortcuts.chars().count();
        if summary_width + 1 + shortcuts_width <= terminal_width {
            let padding = terminal_width - summary_width - shortcuts_width;
            Line::from(vec![
                Span::raw(summary),
                Span::raw(" ".repeat(padding)),
                Span::raw(shortcuts),
            ])
        } else {
            Line::from(Span::raw(summary))
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match (code, modifiers) {
            (KeyCode::Char('q'), m) | (KeyCode::Char('c'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
            }
            (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => self.toggle_zone(),
            (KeyCode::Char(digit @ '1'..='9'), m) if m.contains(KeyModifiers::ALT) => {
                let index = digit as usize - '1' as usize;
                self.activate_suggestion(index);
            }
            _ => match self.zone {
                FocusZone::Board => self.handle_board_key(code, modifiers),
                FocusZone::Suggestions => self.handle_suggestion_key(code),
            },
        }
    }

    fn toggle_zone(&mut self) {
        self.zone = match self.zone {
            FocusZone::Board => FocusZone::Suggestions,
            FocusZone::Suggestions => {
                if self.editor.platform().caret().is_none() {
                    self.editor.focus_end();
                }
                FocusZone::Board
            }
        };
    }

    fn handle_board_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Left => self.navigate(NavKey::ArrowLeft, NativeKey::Left),
            KeyCode::Right => self.navigate(NavKey::ArrowRight, NativeKey::Right),
            KeyCode::Backspace => self.navigate(NavKey::Backspace, NativeKey::Backspace),
            KeyCode::Delete => self.navigate(NavKey::Delete, NativeKey::Delete),
            KeyCode::Home => self.native(NativeKey::Home),
            KeyCode::End => self.native(NativeKey::End),
            KeyCode::Char(ch)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.native(NativeKey::Char(ch));
            }
            _ => {}
        }
    }

    fn handle_suggestion_key(&mut self, code: KeyCode) {
        let count = self.editor.suggested_tags().len();
        match code {
            KeyCode::Left => {
                self.selected_suggestion = self.selected_suggestion.saturating_sub(1);
            }
            KeyCode::Right if count > 0 => {
                self.selected_suggestion = (self.selected_suggestion + 1).min(count - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.activate_suggestion(self.selected_suggestion);
            }
            _ => {}
        }
    }

    /// Lets the editor intercept the key first; otherwise it edits natively.
    fn navigate(&mut self, key: NavKey, native: NativeKey) {
        if self.editor.handle_key(key) == KeyOutcome::PassThrough {
            self.native(native);
        }
    }

    fn native(&mut self, key: NativeKey) {
        if let Some(region) = self.editor.platform_mut().apply_native(key) {
            self.editor.capture_input(region);
        }
    }

    fn activate_suggestion(&mut self, index: usize) {
        let Some(label) = self.editor.suggested_tags().get(index).cloned() else {
            debug!("no suggestion at {index}");
            return;
        };
        if self.editor.activate_suggestion(index) {
            self.selected_suggestion = index;
            self.zone = FocusZone::Board;
            self.set_status(format!("Inserted tag {label}"));
        }
    }

    fn handle_mouse_event(&mut self, event: MouseEvent) {
        if !matches!(event.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let position = Position::new(event.column, event.row);

        if self.suggestion_inner.contains(position) {
            let target = self.suggestion_render.as_ref().map(|render| {
                render.hit_test(
                    (event.row - self.suggestion_inner.y) as usize,
                    event.column - self.suggestion_inner.x,
                )
            });
            if let Some(HitTarget::Suggestion(index)) = target {
                self.activate_suggestion(index);
            }
            return;
        }

        if !self.board_area.contains(position) {
            return;
        }
        self.zone = FocusZone::Board;
        let target = if self.board_inner.contains(position) {
            self.board_render.as_ref().map(|render| {
                render.hit_test(
                    (event.row - self.board_inner.y) as usize + self.scroll_top,
                    event.column - self.board_inner.x,
                )
            })
        } else {
            None
        };

        match target.unwrap_or(HitTarget::Board) {
            HitTarget::Text { region, offset } => {
                self.editor.platform_mut().click(region, offset);
            }
            HitTarget::ChipDelete(id) => {
                if self.editor.delete_tag_by_id(id) {
                    self.set_status("Tag removed");
                }
            }
            HitTarget::Chip(_) | HitTarget::Suggestion(_) => {}
            HitTarget::Board => {
                self.editor.focus_end();
            }
        }
    }
}
