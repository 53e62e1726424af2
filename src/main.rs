use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

use football_dashboard::binder::FetchCycle;
use football_dashboard::config::Config;
use football_dashboard::http_client::ApiClient;
use football_dashboard::provider::spawn_provider;
use football_dashboard::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};

mod ui;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    team_columns: usize,
}

impl App {
    fn new(config: &Config, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        let mut app = Self {
            state: AppState::new(config.start_screen),
            should_quit: false,
            cmd_tx,
            team_columns: 1,
        };
        app.state
            .push_log(format!("[INFO] API base URL {}", config.api_url));
        let cycle = app.state.mount(config.start_screen);
        app.dispatch(cycle);
        app
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.screen == Screen::Teams && self.state.teams.searching {
            self.on_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.show(Screen::Dashboard),
            KeyCode::Char('2') => self.show(Screen::Competitions),
            KeyCode::Char('3') => self.show(Screen::Teams),
            KeyCode::Char('4') => self.show(Screen::Insights),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let cycle = self.state.reload();
                self.dispatch(cycle);
            }
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else if self.state.teams.selection.is_open() {
                    self.state.close_overlay();
                }
            }
            _ => match self.state.screen {
                Screen::Teams => self.on_teams_key(key),
                Screen::Insights => self.on_insights_key(key),
                Screen::Dashboard | Screen::Competitions => self.on_list_key(key),
            },
        }
    }

    fn on_teams_key(&mut self, key: KeyEvent) {
        if self.state.teams.selection.is_open() {
            match key.code {
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                    self.state.teams.selection.next_tab()
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                    self.state.teams.selection.prev_tab()
                }
                KeyCode::Char('b') => self.state.close_overlay(),
                _ => {}
            }
            return;
        }

        let columns = self.team_columns.max(1);
        match key.code {
            KeyCode::Char('/') => self.state.teams.searching = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.teams.move_cursor(columns as isize),
            KeyCode::Char('k') | KeyCode::Up => self.state.teams.move_cursor(-(columns as isize)),
            KeyCode::Char('l') | KeyCode::Right => self.state.teams.move_cursor(1),
            KeyCode::Char('h') | KeyCode::Left => self.state.teams.move_cursor(-1),
            KeyCode::Enter | KeyCode::Char('d') => {
                let cycle = self.state.open_selected_team();
                self.dispatch(cycle);
            }
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.teams.searching = false,
            KeyCode::Backspace => self.state.teams.pop_query(),
            KeyCode::Char(ch) => self.state.teams.push_query(ch),
            _ => {}
        }
    }

    fn on_insights_key(&mut self, key: KeyEvent) {
        let cycle = match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.state.next_insight(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.state.prev_insight(),
            _ => {
                self.on_list_key(key);
                None
            }
        };
        self.dispatch(cycle);
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            _ => {}
        }
    }

    fn show(&mut self, screen: Screen) {
        let cycle = self.state.mount(screen);
        self.dispatch(cycle);
    }

    fn dispatch(&mut self, cycle: Option<FetchCycle>) {
        let Some(cycle) = cycle else {
            return;
        };
        let label = cycle.binder.label();
        let generation = cycle.generation;
        if self.cmd_tx.send(ProviderCommand::Fetch(cycle)).is_err() {
            self.state
                .push_log(format!("[WARN] {label} request failed: provider stopped"));
        } else {
            self.state
                .push_log(format!("[INFO] Loading {label} (cycle {generation})"));
        }
    }
}

fn main() -> Result<()> {
    let config = Config::from_env();
    let client = ApiClient::from_config(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let provider = spawn_provider(client, config.fetch_parallelism, tx, cmd_rx);

    let mut app = App::new(&config, cmd_tx.clone());
    let res = run_app(&mut terminal, &mut app, rx, config.tick_rate);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let _ = cmd_tx.send(ProviderCommand::Shutdown);
    drop(app);
    let _ = provider.join();

    if let Err(err) = res {
        eprintln!("error: {err:#}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        let mut team_columns = app.team_columns;
        terminal.draw(|f| team_columns = ui::draw(f, &app.state))?;
        app.team_columns = team_columns;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
