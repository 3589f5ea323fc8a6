use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::Color,
    widgets::ListState,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::browse::{BrowseState, FetchTicket};
use crate::catalog::{AnimeDetail, AnimeSummary, CatalogProvider, JikanClient};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::ui::{render_browse_view, render_detail_view, widgets};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse,
    Detail,
}

pub enum AppMessage {
    PageLoaded {
        ticket: FetchTicket,
        items: Vec<AnimeSummary>,
    },
    PageFailed {
        ticket: FetchTicket,
        error: String,
    },
    DetailLoaded(Box<AnimeDetail>),
    DetailFailed(String),
}

pub struct App {
    pub config: Config,
    pub running: bool,
    pub view: View,
    pub accent: Color,

    pub query_input: String,
    pub browse: BrowseState,
    pub list_state: ListState,
    pub debounce: Debouncer,

    pub detail: Option<AnimeDetail>,
    pub detail_loading: bool,
    pub detail_error: Option<String>,
    pub detail_scroll: u16,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub catalog: Arc<dyn CatalogProvider + Send + Sync>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let debounce = Debouncer::new(Duration::from_millis(config.search.debounce_ms));
        let catalog = Arc::new(JikanClient::new(config.api.base_url.clone()));

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            config,
            running: true,
            view: View::Browse,
            accent,

            query_input: String::new(),
            browse: BrowseState::new(),
            list_state: ListState::default(),
            debounce,

            detail: None,
            detail_loading: false,
            detail_error: None,
            detail_scroll: 0,

            msg_tx,
            msg_rx,

            catalog,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        // The empty query is a valid search: after one quiet period the
        // default catalog ordering populates the list
        self.debounce.schedule();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            if self.debounce.fire_if_due(Instant::now()) {
                self.submit_query();
            }
            self.process_messages();
        }

        Ok(())
    }

    /// Debounce fired: start a new lineage for whatever is in the input box
    /// and request its first page.
    fn submit_query(&mut self) {
        info!(query = %self.query_input, "Submitting search");
        self.browse.reset(self.query_input.clone());
        self.list_state.select(None);
        self.request_next_page();
    }

    /// Single entry point for page requests. `begin_fetch` decides whether
    /// a request may go out; duplicate triggers while loading and triggers
    /// past exhaustion fall through as no-ops.
    fn request_next_page(&mut self) {
        let Some(ticket) = self.browse.begin_fetch() else {
            return;
        };

        debug!(query = %self.browse.query, page = ticket.page, "Requesting page");

        let query = self.browse.query.clone();
        let catalog = self.catalog.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match catalog.search_page(&query, ticket.page).await {
                Ok(items) => {
                    let _ = tx.send(AppMessage::PageLoaded { ticket, items });
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::PageFailed {
                        ticket,
                        error: e.to_string(),
                    });
                }
            }
        });
    }

    fn open_detail(&mut self) {
        let Some(anime) = self
            .list_state
            .selected()
            .and_then(|i| self.browse.items.get(i))
        else {
            return;
        };

        let id = anime.mal_id;
        info!(id, title = %anime.title, "Opening detail view");

        // Leaving the browse view tears down its pending timer
        self.debounce.cancel();
        self.view = View::Detail;
        self.detail_scroll = 0;
        self.detail_loading = true;
        self.detail_error = None;

        let catalog = self.catalog.clone();
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            match catalog.fetch_by_id(id).await {
                Ok(detail) => {
                    let _ = tx.send(AppMessage::DetailLoaded(Box::new(detail)));
                }
                Err(e) => {
                    let _ = tx.send(AppMessage::DetailFailed(e.to_string()));
                }
            }
        });
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg {
                AppMessage::PageLoaded { ticket, items } => {
                    debug!(page = ticket.page, count = items.len(), "Page loaded");
                    self.browse.apply_success(ticket, items);
                    if self.list_state.selected().is_none() && !self.browse.items.is_empty() {
                        self.list_state.select(Some(0));
                    }
                }
                AppMessage::PageFailed { ticket, error } => {
                    error!(page = ticket.page, error = %error, "Page fetch failed");
                    self.browse.apply_failure(ticket, error);
                }
                AppMessage::DetailLoaded(detail) => {
                    info!(id = detail.mal_id, "Detail loaded");
                    self.detail = Some(*detail);
                    self.detail_loading = false;
                    self.detail_error = None;
                }
                AppMessage::DetailFailed(e) => {
                    // The previous record stays in the slot; the error is
                    // shown in the detail view only
                    error!(error = %e, "Detail fetch failed");
                    self.detail_loading = false;
                    self.detail_error = Some(e);
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let main_area = chunks[0];
        let help_area = chunks[1];

        match self.view {
            View::Browse => {
                render_browse_view(
                    frame,
                    main_area,
                    &self.query_input,
                    &self.browse,
                    &mut self.list_state,
                    self.accent,
                );

                let help = widgets::help_bar(&[
                    ("type", "search"),
                    ("↑/↓", "navigate"),
                    ("Enter", "details"),
                    ("Esc", "quit"),
                ]);
                frame.render_widget(help, help_area);
            }
            View::Detail => {
                render_detail_view(
                    frame,
                    main_area,
                    self.detail.as_ref(),
                    self.detail_loading,
                    self.detail_error.as_deref(),
                    self.detail_scroll,
                    self.accent,
                );

                let help = widgets::help_bar(&[("j/k", "scroll"), ("Esc", "back"), ("q", "quit")]);
                frame.render_widget(help, help_area);
            }
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(EVENT_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.running = false;
                    return Ok(());
                }

                match self.view {
                    View::Browse => self.handle_browse_input(key),
                    View::Detail => self.handle_detail_input(key.code),
                }
            }
        }
        Ok(())
    }

    fn handle_browse_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.debounce.cancel();
                self.running = false;
            }
            KeyCode::Down => {
                self.move_selection_down();
            }
            KeyCode::Up => {
                self.move_selection_up();
            }
            KeyCode::Enter => {
                self.open_detail();
            }
            KeyCode::Backspace => {
                if self.query_input.pop().is_some() {
                    self.debounce.schedule();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query_input.push(c);
                self.debounce.schedule();
            }
            _ => {}
        }
    }

    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                // Back to the list as it was; no re-fetch, and the detail
                // slot stays populated until the next fetch overwrites it
                self.view = View::Browse;
                self.detail_error = None;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn move_selection_down(&mut self) {
        let len = self.browse.items.len();
        if len == 0 {
            return;
        }

        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(next));

        // End-of-list trigger: landing on the last loaded row asks for the
        // next page. Eligibility is checked inside request_next_page.
        if next == len - 1 {
            self.request_next_page();
        }
    }

    fn move_selection_up(&mut self) {
        let len = self.browse.items.len();
        if len == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        App::new(Config::default())
    }

    fn summary(id: u64) -> AnimeSummary {
        AnimeSummary {
            mal_id: id,
            title: format!("title {}", id),
            ..Default::default()
        }
    }

    #[test]
    fn first_page_selects_first_row() {
        let mut app = test_app();
        app.browse.reset("naruto");
        let ticket = app.browse.begin_fetch().unwrap();

        app.msg_tx
            .send(AppMessage::PageLoaded {
                ticket,
                items: vec![summary(1), summary(2)],
            })
            .unwrap();
        app.process_messages();

        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.browse.items.len(), 2);
    }

    #[test]
    fn failed_detail_fetch_keeps_previous_record() {
        let mut app = test_app();
        app.detail = Some(AnimeDetail {
            mal_id: 20,
            title: "Naruto".to_string(),
            ..Default::default()
        });
        app.detail_loading = true;

        app.msg_tx
            .send(AppMessage::DetailFailed(
                "No anime found with id 9999".to_string(),
            ))
            .unwrap();
        app.process_messages();

        assert!(!app.detail_loading);
        assert_eq!(
            app.detail_error.as_deref(),
            Some("No anime found with id 9999")
        );
        assert_eq!(app.detail.as_ref().map(|d| d.mal_id), Some(20));
    }

    #[test]
    fn page_failure_surfaces_one_message_and_halts() {
        let mut app = test_app();
        app.browse.reset("naruto");
        let ticket = app.browse.begin_fetch().unwrap();

        app.msg_tx
            .send(AppMessage::PageFailed {
                ticket,
                error: "Network error: connection refused".to_string(),
            })
            .unwrap();
        app.process_messages();

        assert!(!app.browse.has_more);
        assert!(app.browse.error.is_some());
        assert!(app.browse.begin_fetch().is_none());
    }

    #[test]
    fn selection_moves_clamp_to_list() {
        let mut app = test_app();
        app.browse.reset("q");
        let ticket = app.browse.begin_fetch().unwrap();
        app.browse
            .apply_success(ticket, vec![summary(1), summary(2)]);
        // Exhaust the lineage so landing on the last row cannot start a
        // fetch (no runtime in this test)
        let ticket = app.browse.begin_fetch().unwrap();
        app.browse.apply_success(ticket, Vec::new());

        app.list_state.select(Some(0));
        app.move_selection_down();
        assert_eq!(app.list_state.selected(), Some(1));
        app.move_selection_down();
        assert_eq!(app.list_state.selected(), Some(1));
        app.move_selection_up();
        assert_eq!(app.list_state.selected(), Some(0));
        app.move_selection_up();
        assert_eq!(app.list_state.selected(), Some(0));
    }
}
