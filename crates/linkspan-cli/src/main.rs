use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use linkspan_config::Config;
use linkspan_engine::{
    LinkClick, LinkClickHandler, LinkifyCache, Segment, TextUnit, extract_otp, linkify_markdown,
    resolve_link_at_in,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    num::NonZeroUsize,
    path::PathBuf,
    process,
    sync::Arc,
};
use unicode_width::UnicodeWidthChar;

const USAGE: &str = "Usage: linkspan-cli [--config <path>] [segments <text> | click <text> <offset> | otp <message>]";

const CHECKED_TERMS: &str = concat!(
    "I accept the [Terms](https://example.com/terms) ",
    "and [Privacy Policy](https://example.com/privacy).",
);
const UNCHECKED_TERMS: &str = "Please accept the [Terms](https://example.com/terms) to continue.";

/// State of the terms demo: a checkbox that swaps between two linkified
/// texts, and a caret that can "click" inside the rendered text.
struct App {
    checked: bool,
    cache: LinkifyCache,
    segments: Arc<[Segment]>,
    /// Caret position in chars, `0..=len`.
    caret: usize,
    status: String,
    /// Where the linkified text was last drawn, for mouse hit-testing.
    text_area: Rect,
}

impl App {
    fn new(cache_capacity: NonZeroUsize) -> Self {
        let cache = LinkifyCache::new(cache_capacity);
        let segments = cache.get_or_tokenize(UNCHECKED_TERMS);
        Self {
            checked: false,
            cache,
            segments,
            caret: 0,
            status: String::new(),
            text_area: Rect::default(),
        }
    }

    fn text_len(&self) -> usize {
        self.segments.iter().map(|s| s.len_in(TextUnit::Chars)).sum()
    }

    fn toggle_checked(&mut self) {
        self.checked = !self.checked;
        let input = if self.checked {
            CHECKED_TERMS
        } else {
            UNCHECKED_TERMS
        };
        self.segments = self.cache.get_or_tokenize(input);
        self.caret = self.caret.min(self.text_len());
        log::debug!("terms checkbox is now {}", self.checked);
    }

    fn move_caret_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    fn move_caret_right(&mut self) {
        self.caret = (self.caret + 1).min(self.text_len());
    }

    /// Clicks the glyph under the caret.
    fn click_at_caret(&mut self) -> Option<LinkClick> {
        self.click_glyph(self.caret)
    }

    /// Clicks the glyph at char `index`, updating the status line.
    fn click_glyph(&mut self, index: usize) -> Option<LinkClick> {
        let mut opened = None;
        let click = LinkClickHandler::new(Arc::clone(&self.segments), |target: &str, tag: &str| {
            opened = Some(format!("Clicked on {target} (tag: {tag})"));
        })
        .click_glyph(index);

        match (&click, opened) {
            (Some(click), Some(message)) => {
                log::info!("{message} at offset {}", click.offset);
                self.status = message;
            }
            _ => self.status = format!("No link at offset {index}"),
        }
        click
    }

    /// Clicks at a terminal cell, if it falls on the linkified text.
    fn click_at_cell(&mut self, column: u16, row: u16) -> Option<LinkClick> {
        let index = self.glyph_for_cell(column, row)?;
        self.caret = index;
        self.click_glyph(index)
    }

    /// Maps a terminal cell to the index of the glyph drawn there, accounting
    /// for wide glyphs. Cells past the text map to the text length.
    fn glyph_for_cell(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.text_area;
        if row != area.y || column < area.x || column >= area.x + area.width {
            return None;
        }

        let target = usize::from(column - area.x);
        let mut x = 0;
        let mut offset = 0;
        for segment in self.segments.iter() {
            for c in segment.text.chars() {
                let width = c.width().unwrap_or(0);
                if target < x + width {
                    return Some(offset);
                }
                x += width;
                offset += 1;
            }
        }
        Some(offset)
    }

    fn text_line(&self) -> Line<'static> {
        let link_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED);
        let mut spans = Vec::new();
        let mut offset = 0;

        for segment in self.segments.iter() {
            let style = if segment.is_link() {
                link_style
            } else {
                Style::default()
            };
            for c in segment.text.chars() {
                let style = if offset == self.caret {
                    style.add_modifier(Modifier::REVERSED)
                } else {
                    style
                };
                spans.push(Span::styled(c.to_string(), style));
                offset += 1;
            }
        }
        if self.caret == offset {
            spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        }

        Line::from(spans)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            if i + 1 >= args.len() {
                eprintln!("Error: --config needs a path");
                eprintln!("{USAGE}");
                process::exit(1);
            }
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            path
        }
        None => Config::config_path(),
    };

    let config = match Config::load_from_path(&config_path) {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] => run_tui(&config),
        ["segments", text] => {
            print_segments(text);
            Ok(())
        }
        ["click", text, offset] => {
            let offset: usize = offset
                .parse()
                .with_context(|| format!("invalid offset '{offset}'"))?;
            print_click(text, offset, &config);
            Ok(())
        }
        ["otp", message] => match extract_otp(message) {
            Some(code) => {
                println!("{code}");
                Ok(())
            }
            None => {
                eprintln!("No one-time password found");
                process::exit(1);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    }
}

fn print_segments(text: &str) {
    for segment in linkify_markdown(text) {
        match &segment.link {
            Some(link) => println!("link  {:?} -> {} (tag: {:?})", segment.text, link.target, link.tag),
            None => println!("text  {:?}", segment.text),
        }
    }
}

fn print_click(text: &str, offset: usize, config: &Config) {
    let segments = linkify_markdown(text);
    match resolve_link_at_in(&segments, None, offset, config.offset_unit)
        .and_then(|s| s.link.as_ref())
    {
        Some(link) => println!("{} (tag: {:?})", link.target, link.tag),
        None => println!("no link at offset {offset}"),
    }
}

fn run_tui(config: &Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.cache_capacity());

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char(' ') => app.toggle_checked(),
                KeyCode::Left => app.move_caret_left(),
                KeyCode::Right => app.move_caret_right(),
                KeyCode::Enter => {
                    app.click_at_caret();
                }
                _ => {}
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                app.click_at_cell(mouse.column, mouse.row);
            }
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let checkbox = if app.checked { "[x]" } else { "[ ]" };
    let terms = Paragraph::new(vec![app.text_line()])
        .block(Block::default().borders(Borders::ALL).title(format!("{checkbox} Terms")));
    f.render_widget(terms, chunks[0]);
    app.text_area = Rect {
        x: chunks[0].x + 1,
        y: chunks[0].y + 1,
        width: chunks[0].width.saturating_sub(2),
        height: 1,
    };

    let status = Paragraph::new(vec![Line::from(app.status.clone())])
        .block(Block::default().borders(Borders::ALL).title("Last click"));
    f.render_widget(status, chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("Space: Toggle checkbox | "),
        Span::raw("←/→: Move caret | "),
        Span::raw("Enter/mouse: Click"),
    ]);
    f.render_widget(Paragraph::new(vec![help_text]), chunks[3]);
}
