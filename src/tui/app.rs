//! Application state and event loop
//!
//! Rendering and input run on the main thread; all HTTP goes through a
//! worker thread that owns the tokio runtime and the `ApiClient`. Requests
//! carry a generation counter so a response from a superseded reload is
//! discarded instead of clobbering newer state.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget, DefaultTerminal, Frame};

use crate::services::{load_profile, ApiClient, DriverDataService, DriverProfile, DriverSession};
use crate::types::RaceDetail;

use super::theme::Theme;
use super::widgets::{
    help::HelpPopup, overview::Overview, qualifying::QualifyingView, races::RacesView,
    results::ResultsView, spinner::Spinner, sprint::SprintView, standings::StandingsView,
    tabs::Tab,
};

/// Application state
pub enum AppState {
    /// Profile load in flight
    Loading { spinner_frame: usize },
    /// Profile loaded, session active
    Ready { session: Box<DriverSession> },
    /// Profile load failed
    Error { message: String },
}

/// Requests sent to the worker thread
#[derive(Debug, PartialEq, Eq)]
pub enum WorkerMsg {
    LoadProfile {
        generation: u64,
        driver_id: u32,
    },
    LoadRaceDetail {
        generation: u64,
        driver_id: u32,
        race_id: u32,
    },
}

/// Responses sent back from the worker thread
pub enum AppMsg {
    ProfileLoaded {
        generation: u64,
        result: Result<Box<DriverProfile>, String>,
    },
    RaceDetailLoaded {
        generation: u64,
        race_id: u32,
        result: Result<RaceDetail, String>,
    },
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    current_tab: Tab,
    races_cursor: usize,
    results_scroll: usize,
    qualifying_scroll: usize,
    standings_scroll: usize,
    sprint_scroll: usize,
    detail_loading: bool,
    show_help: bool,
    /// Bumped on every reload; responses from older generations are dropped
    generation: u64,
    driver_id: u32,
    theme: Theme,
    worker_tx: mpsc::Sender<WorkerMsg>,
}

impl App {
    /// Create a new app in loading state
    pub fn new(driver_id: u32, theme: Theme, worker_tx: mpsc::Sender<WorkerMsg>) -> Self {
        Self {
            state: AppState::Loading { spinner_frame: 0 },
            should_quit: false,
            current_tab: Tab::default(),
            races_cursor: 0,
            results_scroll: 0,
            qualifying_scroll: 0,
            standings_scroll: 0,
            sprint_scroll: 0,
            detail_loading: false,
            show_help: false,
            generation: 0,
            driver_id,
            theme,
            worker_tx,
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.should_quit = true;
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') => {
                        self.should_quit = true;
                    }
                    KeyCode::Esc => {
                        self.handle_escape();
                    }
                    KeyCode::Tab => {
                        self.current_tab = self.current_tab.next();
                    }
                    KeyCode::BackTab => {
                        self.current_tab = self.current_tab.prev();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.scroll_up();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.scroll_down();
                    }
                    KeyCode::Char(c @ '1'..='6') => {
                        if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                            self.current_tab = tab;
                        }
                    }
                    KeyCode::Enter => {
                        self.handle_enter();
                    }
                    KeyCode::Char('s') => {
                        if let AppState::Ready { session } = &mut self.state {
                            session.cycle_season_filter();
                            self.races_cursor = 0;
                            self.results_scroll = 0;
                        }
                    }
                    KeyCode::Char('r') => {
                        self.reload();
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Esc clears an active drill-down; with no selection it quits
    fn handle_escape(&mut self) {
        if let AppState::Ready { session } = &mut self.state {
            if session.selected_race().is_some() {
                session.deselect_race();
                self.detail_loading = false;
                return;
            }
        }
        self.should_quit = true;
    }

    /// Enter on the Races tab starts a drill-down for the race under the cursor
    fn handle_enter(&mut self) {
        if self.current_tab != Tab::Races {
            return;
        }
        let AppState::Ready { session } = &mut self.state else {
            return;
        };
        let Some(race_id) = session.races().get(self.races_cursor).map(|r| r.race_id) else {
            return;
        };

        session.select_race(race_id);
        self.detail_loading = true;
        let _ = self.worker_tx.send(WorkerMsg::LoadRaceDetail {
            generation: self.generation,
            driver_id: self.driver_id,
            race_id,
        });
    }

    /// Drop the current session and start a fresh profile load
    fn reload(&mut self) {
        self.generation += 1;
        self.state = AppState::Loading { spinner_frame: 0 };
        self.detail_loading = false;
        self.races_cursor = 0;
        self.results_scroll = 0;
        self.qualifying_scroll = 0;
        self.standings_scroll = 0;
        self.sprint_scroll = 0;
        let _ = self.worker_tx.send(WorkerMsg::LoadProfile {
            generation: self.generation,
            driver_id: self.driver_id,
        });
    }

    fn scroll_up(&mut self) {
        match self.current_tab {
            Tab::Races => self.races_cursor = self.races_cursor.saturating_sub(1),
            Tab::Results => self.results_scroll = self.results_scroll.saturating_sub(1),
            Tab::Qualifying => self.qualifying_scroll = self.qualifying_scroll.saturating_sub(1),
            Tab::Standings => self.standings_scroll = self.standings_scroll.saturating_sub(1),
            Tab::Sprint => self.sprint_scroll = self.sprint_scroll.saturating_sub(1),
            Tab::Overview => {}
        }
    }

    fn scroll_down(&mut self) {
        let AppState::Ready { session } = &self.state else {
            return;
        };
        match self.current_tab {
            Tab::Races => {
                let max = session.races().len().saturating_sub(1);
                self.races_cursor = (self.races_cursor + 1).min(max);
            }
            Tab::Results => {
                let max = session.results().len().saturating_sub(1);
                self.results_scroll = (self.results_scroll + 1).min(max);
            }
            Tab::Qualifying => {
                let max = session.qualifying().len().saturating_sub(1);
                self.qualifying_scroll = (self.qualifying_scroll + 1).min(max);
            }
            Tab::Standings => {
                let max = session.standings().len().saturating_sub(1);
                self.standings_scroll = (self.standings_scroll + 1).min(max);
            }
            Tab::Sprint => {
                let max = session.sprint_results().len().saturating_sub(1);
                self.sprint_scroll = (self.sprint_scroll + 1).min(max);
            }
            Tab::Overview => {}
        }
    }

    /// Apply a worker response
    pub fn handle_message(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::ProfileLoaded { generation, result } => {
                if generation != self.generation {
                    return;
                }
                match result {
                    Ok(profile) => {
                        self.state = AppState::Ready {
                            session: Box::new(DriverSession::new(self.driver_id, *profile)),
                        };
                    }
                    Err(message) => self.state = AppState::Error { message },
                }
            }
            AppMsg::RaceDetailLoaded {
                generation,
                race_id,
                result,
            } => {
                if generation != self.generation {
                    return;
                }
                if let AppState::Ready { session } = &mut self.state {
                    if session.selected_race() == Some(race_id) {
                        self.detail_loading = false;
                    }
                    match result {
                        Ok(detail) => session.apply_race_detail(race_id, detail),
                        Err(message) => {
                            if session.selected_race() == Some(race_id) {
                                session.record_detail_failure(message);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame } = &self.state {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(*spinner_frame),
            };
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Whether a profile load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.state, AppState::Loading { .. })
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading { spinner_frame } => {
                Spinner::new(*spinner_frame).render(area, buf);
            }
            AppState::Ready { session } => {
                match self.current_tab {
                    Tab::Overview => {
                        Overview::new(session, self.current_tab, self.theme).render(area, buf);
                    }
                    Tab::Races => {
                        RacesView::new(
                            session,
                            self.races_cursor,
                            self.detail_loading,
                            self.current_tab,
                            self.theme,
                        )
                        .render(area, buf);
                    }
                    Tab::Results => {
                        ResultsView::new(session, self.results_scroll, self.current_tab, self.theme)
                            .render(area, buf);
                    }
                    Tab::Qualifying => {
                        QualifyingView::new(
                            session,
                            self.qualifying_scroll,
                            self.current_tab,
                            self.theme,
                        )
                        .render(area, buf);
                    }
                    Tab::Standings => {
                        StandingsView::new(
                            session,
                            self.standings_scroll,
                            self.current_tab,
                            self.theme,
                        )
                        .render(area, buf);
                    }
                    Tab::Sprint => {
                        SprintView::new(session, self.sprint_scroll, self.current_tab, self.theme)
                            .render(area, buf);
                    }
                }

                // Render help popup overlay if active
                if self.show_help {
                    let popup_area = HelpPopup::centered_area(area);
                    HelpPopup::new(self.theme).render(popup_area, buf);
                }
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.error()));
            }
        }
    }
}

/// Worker thread: owns the runtime and the HTTP client, serves requests
/// until the channel closes
fn run_worker(api_url: String, rx: mpsc::Receiver<WorkerMsg>, tx: mpsc::Sender<AppMsg>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let runtime = match runtime {
        Ok(rt) => rt,
        Err(e) => {
            for msg in rx {
                let generation = match msg {
                    WorkerMsg::LoadProfile { generation, .. }
                    | WorkerMsg::LoadRaceDetail { generation, .. } => generation,
                };
                let _ = tx.send(AppMsg::ProfileLoaded {
                    generation,
                    result: Err(format!("failed to start runtime: {}", e)),
                });
            }
            return;
        }
    };

    let client = match ApiClient::new(&api_url) {
        Ok(client) => client,
        Err(e) => {
            for msg in rx {
                let generation = match msg {
                    WorkerMsg::LoadProfile { generation, .. }
                    | WorkerMsg::LoadRaceDetail { generation, .. } => generation,
                };
                let _ = tx.send(AppMsg::ProfileLoaded {
                    generation,
                    result: Err(format!("failed to build HTTP client: {}", e)),
                });
            }
            return;
        }
    };

    for msg in rx {
        let response = match msg {
            WorkerMsg::LoadProfile {
                generation,
                driver_id,
            } => {
                let result = runtime
                    .block_on(load_profile(&client, driver_id))
                    .map(Box::new)
                    .map_err(|e| e.to_string());
                AppMsg::ProfileLoaded { generation, result }
            }
            WorkerMsg::LoadRaceDetail {
                generation,
                driver_id,
                race_id,
            } => {
                let result = runtime
                    .block_on(client.race_detail(driver_id, race_id))
                    .map_err(|e| e.to_string());
                AppMsg::RaceDetailLoaded {
                    generation,
                    race_id,
                    result,
                }
            }
        };
        if tx.send(response).is_err() {
            break;
        }
    }
}

/// Run the TUI application
pub fn run(api_url: String, driver_id: u32) -> anyhow::Result<()> {
    // Theme detection must happen before raw mode
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, api_url, driver_id, theme);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    api_url: String,
    driver_id: u32,
    theme: Theme,
) -> anyhow::Result<()> {
    let (worker_tx, worker_rx) = mpsc::channel();
    let (msg_tx, msg_rx) = mpsc::channel();
    thread::spawn(move || run_worker(api_url, worker_rx, msg_tx));

    let mut app = App::new(driver_id, theme, worker_tx);
    let _ = app.worker_tx.send(WorkerMsg::LoadProfile {
        generation: app.generation,
        driver_id,
    });

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Drain worker responses (non-blocking)
        while let Ok(msg) = msg_rx.try_recv() {
            app.handle_message(msg);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}
