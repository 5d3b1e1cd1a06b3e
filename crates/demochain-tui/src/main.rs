//! Terminal UI for the demochain demo ledger.
use std::{io, time::Duration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use demochain_core::chain::Chain;
use demochain_core::constants::POW_DIFFICULTY;
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    prelude::*,
    widgets::*,
    Frame,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
struct Args {
    /// Leading zero hex characters required of every mined block hash
    #[arg(short, long, default_value_t = POW_DIFFICULTY)]
    difficulty: u32,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    #[default]
    Compose,
    Chain,
}

/// Outcome of the last chain operation, colour-coded in the status bar.
#[derive(Debug, Clone)]
enum Feedback {
    Success(String),
    Error(String),
}

#[derive(Debug)]
struct App {
    chain: Chain,
    tab: Tab,
    // compose form
    input: String,
    // chain table
    cursor: usize,
    table_state: TableState,
    popup: bool,
    status: Option<Feedback>,
}

impl App {
    fn new(difficulty: u32) -> Self {
        Self {
            chain: Chain::new(difficulty),
            tab: Tab::Compose,
            input: String::new(),
            cursor: 0,
            table_state: TableState::default(),
            popup: false,
            status: None,
        }
    }

    fn add_block(&mut self) {
        // Mining runs on the calling thread; the draw loop stalls until
        // the nonce search lands.
        match self.chain.add_block(&self.input) {
            Ok(block) => {
                self.status = Some(Feedback::Success(format!(
                    "mined block {} with nonce {}",
                    block.index, block.nonce
                )));
                self.input.clear();
            }
            Err(e) => self.status = Some(Feedback::Error(e.to_string())),
        }
    }

    fn verify(&mut self) {
        self.status = Some(match self.chain.verify() {
            Ok(()) => Feedback::Success("chain is valid".to_string()),
            Err(e) => Feedback::Error(format!("chain invalid: {e}")),
        });
    }

    fn next_row(&mut self) {
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.chain.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.cursor = i;
        self.table_state.select(Some(i));
    }

    fn previous_row(&mut self) {
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.chain.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.cursor = i;
        self.table_state.select(Some(i));
    }
}

fn main() -> Result<()> {
    // tracing
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();
    tracing::info!("starting demochain-tui at difficulty {}", args.difficulty);

    // terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(args.difficulty);

    let res = run_app(&mut terminal, &mut app);

    // restore
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if crossterm::event::poll(Duration::from_millis(200))? {
            if let CEvent::Key(key) = event::read()? {
                if handle_key(app, key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return true,
        KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::BackTab => {
            app.tab = match app.tab {
                Tab::Compose => Tab::Chain,
                Tab::Chain => Tab::Compose,
            };
        }
        // Chain view navigation
        KeyCode::Down if app.tab == Tab::Chain => app.next_row(),
        KeyCode::Up if app.tab == Tab::Chain => app.previous_row(),
        KeyCode::Char('p') if app.tab == Tab::Chain => app.popup = !app.popup,
        KeyCode::Char('v') if app.tab == Tab::Chain => app.verify(),
        _ => {
            if app.tab == Tab::Compose {
                match key.code {
                    KeyCode::Char(c) if !c.is_control() => app.input.push(c),
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Enter => app.add_block(),
                    _ => {}
                }
            }
        }
    }
    false
}

fn ui(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(size);

    // Tabs
    let titles = ["Compose", "Chain"]
        .iter()
        .map(|t| Line::from(*t))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.tab as usize)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("demochain-tui"),
        )
        .style(Style::default().fg(Color::Green))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    // Main area
    match app.tab {
        Tab::Compose => render_compose(f, chunks[1], app),
        Tab::Chain => render_chain(f, chunks[1], app),
    }

    render_status(f, chunks[2], app);

    // Footer
    let help = Paragraph::new(
        "ESC/Ctrl-C quit • TAB switch view • Compose: type data, Enter to mine • Chain: ↑/↓ select, p details, v verify",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL).title("help"));
    f.render_widget(help, chunks[3]);
}

fn render_compose(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = Paragraph::new(app.input.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Block data (type, Backspace, Enter to mine)"),
    );
    f.render_widget(input, chunks[0]);

    let tip = app.chain.tip();
    let overview = Paragraph::new(vec![
        Line::from(format!("Blocks     : {}", app.chain.len())),
        Line::from(format!("Difficulty : {}", app.chain.difficulty())),
        Line::from(format!("Tip hash   : {}", tip.hash)),
    ])
    .block(Block::default().title("Overview").borders(Borders::ALL));
    f.render_widget(overview, chunks[1]);
}

fn render_chain(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.chain.blocks().iter().enumerate().map(|(i, b)| {
        Row::new(vec![
            Cell::from(b.index.to_string()),
            Cell::from(b.timestamp.to_string()),
            Cell::from(b.nonce.to_string()),
            Cell::from(b.hash.clone()),
            Cell::from(b.previous_hash.clone()),
            Cell::from(b.data.clone()),
        ])
        .style(if i == app.cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        })
    });
    let table = Table::new(
        rows,
        vec![
            Constraint::Length(6),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(66),
            Constraint::Length(66),
            Constraint::Min(12),
        ],
    )
    .header(
        Row::new(vec!["idx", "ts", "nonce", "hash", "prev", "data"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("Chain blocks"));
    f.render_stateful_widget(table, area, &mut app.table_state);

    if app.popup {
        // Populate popup with details of the block under the cursor
        let popup = Block::bordered()
            .style(Style::default().bg(Color::Black).fg(Color::Yellow))
            .title("Block details")
            .title_style(Style::new().yellow().bold())
            .border_style(Style::new().red().bold());
        let blocks = app.chain.blocks();
        let items = if app.cursor >= blocks.len() {
            vec!["No block selected".to_string()]
        } else {
            let b = &blocks[app.cursor];
            vec![
                format!(" Index     : {}", b.index),
                format!(" Timestamp : {}", b.timestamp),
                format!(" Data      : {}", b.data),
                format!(" Prev hash : {}", b.previous_hash),
                format!(" Hash      : {}", b.hash),
                format!(" Nonce     : {}", b.nonce),
            ]
        };
        let list = List::new(items).block(popup.clone());
        let popup_area = centered_area(area, 60, 25);
        // clears out any background in the area before rendering the popup
        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
        f.render_widget(list, popup_area);
    }
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match &app.status {
        Some(Feedback::Success(msg)) => (msg.clone(), Style::default().fg(Color::Green)),
        Some(Feedback::Error(msg)) => (msg.clone(), Style::default().fg(Color::Red)),
        None => (String::new(), Style::default()),
    };
    let status = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

/// Create a centered rect using the given percentage of the available rect
fn centered_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    // vertically center a strip that's percent_y tall
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let [area] = vertical.areas(area);

    // horizontally center a strip that's percent_x wide within that strip
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = horizontal.areas(area);

    area
}
