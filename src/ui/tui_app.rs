use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    widgets::TableState,
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, info, warn};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::api::post_board::{NewPost, Post, PostBoardClient};
use crate::config::config::Config;
use crate::data::data_exporter::DataExporter;
use crate::data::data_view::DataView;
use crate::data::source_catalog::{Category, Selection};
use crate::drafts::{Draft, DraftStore};
use crate::services::DataLoaderService;
use crate::state::{AppState, BackgroundEvent, StateCommand, StateEvent, TableStatus, Transition};
use crate::ui::tui_renderer::{RenderContext, TuiRenderer};
use crate::utils::app_paths::AppPaths;

const TICK: Duration = Duration::from_millis(100);
const PAGE_ROWS: usize = 10;

/// Which widget receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Title,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Logs,
}

pub struct TuiApp {
    config: Config,
    state: AppState,
    view: DataView,
    loader: DataLoaderService,
    post_client: Option<PostBoardClient>,
    drafts: Option<DraftStore>,
    tx: Sender<BackgroundEvent>,
    rx: Receiver<BackgroundEvent>,

    focus: Focus,
    compose_field: ComposeField,
    overlay: Overlay,
    search_input: Input,
    title_input: Input,
    body_input: Input,
    table_state: TableState,
    column_cursor: usize,

    posts: Vec<Post>,
    posts_loading: bool,
    /// Post sent to the board and not yet acknowledged
    in_flight_post: Option<NewPost>,
    show_posts: bool,
    status_message: String,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(
        config: Config,
        loader: DataLoaderService,
        selection: Selection,
        drafts: Option<DraftStore>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let post_client = config
            .posts
            .enabled
            .then(|| PostBoardClient::new(&config.posts.url));
        let draft = drafts.as_ref().map(DraftStore::load).unwrap_or_default();
        let Transition { state, command } = AppState::start(selection);
        let show_posts = config.display.show_posts;

        let mut app = Self {
            view: state.view(),
            state,
            loader,
            post_client,
            drafts,
            tx,
            rx,
            focus: Focus::Table,
            compose_field: ComposeField::Title,
            overlay: Overlay::None,
            search_input: Input::default(),
            title_input: Input::from(draft.title),
            body_input: Input::from(draft.body),
            table_state: TableState::default(),
            column_cursor: 0,
            posts: Vec::new(),
            posts_loading: false,
            in_flight_post: None,
            show_posts,
            status_message: String::new(),
            should_quit: false,
            config,
        };

        if let Some(command) = command {
            app.run_command(command);
        }
        app.fetch_posts();
        app
    }

    /// Start with a search already typed
    pub fn with_search(mut self, search: &str) -> Self {
        if !search.is_empty() {
            self.search_input = Input::from(search.to_string());
            self.dispatch(StateEvent::SearchChanged(search.to_string()));
        }
        self
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.drain_background();
            terminal.draw(|f| self.ui(f))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    fn drain_background(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_background(event);
        }
    }

    pub fn handle_background(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::TableLoaded {
                generation,
                outcome,
            } => {
                let current = generation == self.state.generation();
                self.dispatch(StateEvent::TableLoaded {
                    generation,
                    outcome,
                });
                if current {
                    self.status_message = match self.state.status() {
                        TableStatus::Ready => format!(
                            "Loaded {} players from {}",
                            self.state.table().row_count(),
                            self.loader.describe_source()
                        ),
                        TableStatus::Empty => "The data file has no rows".to_string(),
                        TableStatus::MappingError => {
                            format!("No data file mapped for {}", self.state.selection())
                        }
                        TableStatus::LoadFailed(reason) => format!("Load failed: {}", reason),
                        TableStatus::Loading => String::new(),
                    };
                }
            }
            BackgroundEvent::PostsFetched(result) => {
                self.posts_loading = false;
                match result {
                    Ok(posts) => self.posts = posts,
                    Err(e) => {
                        self.posts.clear();
                        self.status_message = format!("Could not load posts: {}", e);
                    }
                }
            }
            BackgroundEvent::PostCreated(result) => {
                let submitted = self.in_flight_post.take();
                match result {
                    Ok(id) => {
                        info!("Post {} submitted", id);
                        // Text typed while the post was in flight stays put
                        if submitted.is_some_and(|post| self.compose_holds(&post)) {
                            self.title_input.reset();
                            self.body_input.reset();
                            self.save_draft();
                            self.compose_field = ComposeField::Title;
                        }
                        self.status_message = "Column posted".to_string();
                        self.fetch_posts();
                    }
                    Err(e) => self.status_message = format!("Post failed: {}", e),
                }
            }
        }
    }

    /// Apply a state event and act on the command it returns
    fn dispatch(&mut self, event: StateEvent) {
        let Transition { state, command } = self.state.apply(event);
        self.state = state;
        if let Some(command) = command {
            self.run_command(command);
        }
        self.refresh_view();
    }

    fn run_command(&mut self, command: StateCommand) {
        match command {
            StateCommand::Load {
                generation,
                selection,
            } => {
                self.status_message = format!("Loading {}...", selection);
                self.loader.spawn_load(generation, selection, self.tx.clone());
            }
        }
    }

    fn refresh_view(&mut self) {
        self.view = self.state.view();

        let rows = self.view.row_count();
        if rows == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(rows - 1);
            self.table_state.select(Some(selected));
        }

        let columns = self.view.headers().len();
        self.column_cursor = self.column_cursor.min(columns.saturating_sub(1));
    }

    fn fetch_posts(&mut self) {
        if let Some(client) = &self.post_client {
            self.posts_loading = true;
            client.spawn_fetch(self.tx.clone());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.overlay != Overlay::None {
            self.handle_overlay_key(key);
            return;
        }

        match self.focus {
            Focus::Table => self.handle_table_key(key),
            Focus::Search => self.handle_search_key(key),
            Focus::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match (self.overlay, key.code) {
            (Overlay::Help, KeyCode::F(1)) | (Overlay::Logs, KeyCode::F(5)) => {
                self.overlay = Overlay::None
            }
            (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => self.overlay = Overlay::None,
            (_, KeyCode::F(1)) => self.overlay = Overlay::Help,
            (_, KeyCode::F(5)) => self.overlay = Overlay::Logs,
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let selection = *self.state.selection();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(StateEvent::Reload);
                self.fetch_posts();
            }
            KeyCode::Char('b') => self.dispatch(StateEvent::SelectCategory(Category::Batter)),
            KeyCode::Char('p') => self.dispatch(StateEvent::SelectCategory(Category::Pitcher)),
            KeyCode::Char('r') => {
                if selection.category == Category::Pitcher {
                    self.dispatch(StateEvent::SelectRole(selection.role.other()));
                } else {
                    self.status_message = "Starter/relief applies to pitchers (p)".to_string();
                }
            }
            KeyCode::Char('l') => self.dispatch(StateEvent::SelectLeague(selection.league.other())),
            KeyCode::Char('m') => self.dispatch(StateEvent::SelectMode(selection.mode.other())),
            KeyCode::Char('s') | KeyCode::Enter => self.sort_by_cursor(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Tab => {
                self.show_posts = true;
                self.focus = Focus::Compose;
            }
            KeyCode::F(1) => self.overlay = Overlay::Help,
            KeyCode::F(2) => self.show_posts = !self.show_posts,
            KeyCode::F(5) => self.overlay = Overlay::Logs,
            KeyCode::Left => self.column_cursor = self.column_cursor.saturating_sub(1),
            KeyCode::Right => {
                let last = self.view.headers().len().saturating_sub(1);
                self.column_cursor = (self.column_cursor + 1).min(last);
            }
            KeyCode::Up => self.move_rows(-1),
            KeyCode::Down => self.move_rows(1),
            KeyCode::PageUp => self.move_rows(-(PAGE_ROWS as isize)),
            KeyCode::PageDown => self.move_rows(PAGE_ROWS as isize),
            KeyCode::Home => self.move_rows(isize::MIN),
            KeyCode::End => self.move_rows(isize::MAX),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.focus = Focus::Table,
            _ => {
                let changed = self
                    .search_input
                    .handle_event(&Event::Key(key))
                    .is_some_and(|change| change.value);
                if changed {
                    let search = self.search_input.value().to_string();
                    self.dispatch(StateEvent::SearchChanged(search));
                }
            }
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Tab => {
                self.compose_field = match self.compose_field {
                    ComposeField::Title => ComposeField::Body,
                    ComposeField::Body => ComposeField::Title,
                }
            }
            KeyCode::Enter => match self.compose_field {
                ComposeField::Title => self.compose_field = ComposeField::Body,
                ComposeField::Body => self.submit_post(),
            },
            _ => {
                let input = match self.compose_field {
                    ComposeField::Title => &mut self.title_input,
                    ComposeField::Body => &mut self.body_input,
                };
                let changed = input
                    .handle_event(&Event::Key(key))
                    .is_some_and(|change| change.value);
                if changed {
                    self.save_draft();
                }
            }
        }
    }

    fn sort_by_cursor(&mut self) {
        if let Some(header) = self.view.headers().get(self.column_cursor).cloned() {
            debug!("Sorting by {}", header);
            self.dispatch(StateEvent::SortBy(header));
        }
    }

    fn move_rows(&mut self, delta: isize) {
        let rows = self.view.row_count();
        if rows == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let target = current.saturating_add(delta).clamp(0, rows as isize - 1);
        self.table_state.select(Some(target as usize));
    }

    fn save_draft(&mut self) {
        let Some(store) = &self.drafts else {
            return;
        };
        let draft = Draft {
            title: self.title_input.value().to_string(),
            body: self.body_input.value().to_string(),
        };
        if let Err(e) = store.save(&draft) {
            warn!("Could not save draft: {:#}", e);
        }
    }

    fn submit_post(&mut self) {
        let post = match NewPost::new(self.title_input.value(), self.body_input.value()) {
            Ok(post) => post,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };

        match &self.post_client {
            Some(client) => {
                self.status_message = "Posting...".to_string();
                client.spawn_create(post.clone(), self.tx.clone());
                self.in_flight_post = Some(post);
            }
            None => self.status_message = "Post board is disabled in config".to_string(),
        }
    }

    fn compose_holds(&self, post: &NewPost) -> bool {
        self.title_input.value().trim() == post.title && self.body_input.value().trim() == post.body
    }

    fn export_csv(&mut self) {
        let result = AppPaths::export_dir().and_then(|dir| {
            let path = dir.join(DataExporter::default_file_name(&self.view, "csv"));
            DataExporter::export_view_to_csv(&self.view, &path)
        });
        self.status_message = match result {
            Ok(message) => message,
            Err(e) => format!("Export failed: {:#}", e),
        };
    }

    fn ui(&mut self, f: &mut Frame) {
        let ctx = RenderContext {
            state: &self.state,
            view: &self.view,
            icons: &self.config.display.icons,
            column_cursor: self.column_cursor,
            focus: self.focus,
            compose_field: self.compose_field,
            search_input: &self.search_input,
            title_input: &self.title_input,
            body_input: &self.body_input,
            posts: &self.posts,
            posts_loading: self.posts_loading,
            posts_enabled: self.post_client.is_some(),
            show_posts: self.show_posts,
            overlay: self.overlay,
            status_message: &self.status_message,
        };
        TuiRenderer::render(f, &ctx, &mut self.table_state);
    }
}

pub fn run_tui_app(
    config: Config,
    loader: DataLoaderService,
    selection: Selection,
    search: &str,
) -> Result<()> {
    let drafts = match DraftStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Drafts disabled: {:#}", e);
            None
        }
    };
    let mut app = TuiApp::new(config, loader, selection, drafts).with_search(search);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
