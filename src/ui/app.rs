use std::mem;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, warn};

use crate::api::{GenreService, SearchService, Services};
use crate::controller::{AdvancedSearch, GenreManager};
use crate::error::ServiceError;
use crate::models::{Actor, Director, Film};

use super::events::{AppEvent, Dispatcher, GenreEvent, ListEvent};
use super::forms::{ConfirmDelete, EditForm};
use super::helpers::{centered_rect, key_hints, surface_error};
use super::screens::{ListPane, ListScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Page size change per `+` / `-` press.
const PAGE_SIZE_STEP: isize = 5;

/// Top-level screens, one per destination on the home menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Home,
    Actors,
    Films,
    Directors,
    Genres,
    AdvancedSearch,
}

const HOME_ENTRIES: [(Screen, &str); 5] = [
    (Screen::Actors, "Actors"),
    (Screen::Films, "Films"),
    (Screen::Directors, "Directors"),
    (Screen::Genres, "Genres"),
    (Screen::AdvancedSearch, "Advanced search"),
];

/// The three paginated entity screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Actors,
    Films,
    Directors,
}

impl ListKind {
    fn of(screen: Screen) -> Option<Self> {
        match screen {
            Screen::Actors => Some(ListKind::Actors),
            Screen::Films => Some(ListKind::Films),
            Screen::Directors => Some(ListKind::Directors),
            _ => None,
        }
    }
}

enum DeleteTarget {
    List(ListKind),
    Genre,
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    /// Live name filter on a list screen.
    Searching(String),
    Editing {
        list: ListKind,
        form: EditForm,
    },
    ConfirmSave {
        list: ListKind,
        form: EditForm,
    },
    ConfirmDelete {
        target: DeleteTarget,
        confirm: ConfirmDelete,
    },
    AddingGenre(EditForm),
    RenamingGenre {
        id: i64,
        form: EditForm,
    },
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    home_selected: usize,
    actors: ListScreen<Actor>,
    films: ListScreen<Film>,
    directors: ListScreen<Director>,
    genres: GenreManager,
    genre_service: Arc<dyn GenreService>,
    genres_requested: bool,
    search: AdvancedSearch,
    search_service: Arc<dyn SearchService>,
    tasks: Dispatcher,
    events: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Build the app around `services`. Requests run on `runtime` and report
    /// back through a channel drained by [`App::drain_events`].
    pub fn new(services: Services, page_size: usize, runtime: Handle) -> Self {
        let (tasks, events) = Dispatcher::new(runtime);
        Self {
            screen: Screen::Home,
            mode: Mode::Normal,
            status: None,
            home_selected: 0,
            actors: ListScreen::new(services.actors, page_size, AppEvent::Actors),
            films: ListScreen::new(services.films, page_size, AppEvent::Films),
            directors: ListScreen::new(services.directors, page_size, AppEvent::Directors),
            genres: GenreManager::new(),
            genre_service: services.genres,
            genres_requested: false,
            search: AdvancedSearch::new(),
            search_service: services.search,
            tasks,
            events,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(query) => self.handle_search(code, query),
            Mode::Editing { list, form } => self.handle_edit(code, list, form),
            Mode::ConfirmSave { list, form } => self.handle_confirm_save(code, list, form),
            Mode::ConfirmDelete { target, confirm } => {
                self.handle_confirm_delete(code, target, confirm)
            }
            Mode::AddingGenre(form) => self.handle_genre_form(code, None, form),
            Mode::RenamingGenre { id, form } => self.handle_genre_form(code, Some(id), form),
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Apply every task result that has arrived since the last frame.
    pub(crate) fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
        }
    }

    fn pane(&mut self, list: ListKind) -> &mut dyn ListPane {
        match list {
            ListKind::Actors => &mut self.actors,
            ListKind::Films => &mut self.films,
            ListKind::Directors => &mut self.directors,
        }
    }

    fn pane_ref(&self, list: ListKind) -> &dyn ListPane {
        match list {
            ListKind::Actors => &self.actors,
            ListKind::Films => &self.films,
            ListKind::Directors => &self.directors,
        }
    }

    fn open_screen(&mut self, screen: Screen) {
        debug!(?screen, "opening screen");
        self.screen = screen;
        self.clear_status();
        let tasks = self.tasks.clone();
        if let Some(list) = ListKind::of(screen) {
            self.pane(list).open(&tasks);
        } else if screen == Screen::Genres && !self.genres_requested {
            self.load_genres();
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Home => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                    KeyCode::Up => self.home_selected = self.home_selected.saturating_sub(1),
                    KeyCode::Down => {
                        self.home_selected = (self.home_selected + 1).min(HOME_ENTRIES.len() - 1)
                    }
                    KeyCode::Enter => self.open_screen(HOME_ENTRIES[self.home_selected].0),
                    KeyCode::Char(ch @ '1'..='5') => {
                        let idx = ch as usize - '1' as usize;
                        self.home_selected = idx;
                        self.open_screen(HOME_ENTRIES[idx].0);
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Actors => Ok(self.handle_list_key(code, ListKind::Actors)),
            Screen::Films => Ok(self.handle_list_key(code, ListKind::Films)),
            Screen::Directors => Ok(self.handle_list_key(code, ListKind::Directors)),
            Screen::Genres => Ok(self.handle_genres_key(code)),
            Screen::AdvancedSearch => Ok(self.handle_advanced_search_key(code)),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode, list: ListKind) -> Mode {
        let tasks = self.tasks.clone();
        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                if self.pane_ref(list).detail_open() {
                    self.pane(list).close_detail();
                } else {
                    self.open_screen(Screen::Home);
                }
            }
            KeyCode::Up => self.pane(list).cursor_up(),
            KeyCode::Down => self.pane(list).cursor_down(),
            KeyCode::Left | KeyCode::PageUp => {
                if !self.pane(list).previous_page(&tasks) {
                    self.set_status("Already on the first page.", StatusKind::Info);
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                if !self.pane(list).next_page(&tasks) {
                    self.set_status("Already on the last page.", StatusKind::Info);
                }
            }
            KeyCode::Char('+') => self.resize_page(list, PAGE_SIZE_STEP),
            KeyCode::Char('-') => self.resize_page(list, -PAGE_SIZE_STEP),
            KeyCode::Char('r') => {
                self.pane(list).reload(&tasks);
                self.set_status("Reloading...", StatusKind::Info);
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                return Mode::Searching(self.pane_ref(list).filter().to_string());
            }
            KeyCode::Enter => {
                if let Err(err) = self.pane(list).select_highlighted(&tasks) {
                    self.report("Select", &err);
                }
            }
            KeyCode::Char('e') => match self.pane(list).start_edit(&tasks) {
                Ok(form) => return Mode::Editing { list, form },
                Err(err) => self.report("Edit", &err),
            },
            KeyCode::Char('d') => match self.pane_ref(list).delete_candidate() {
                Some(confirm) => {
                    return Mode::ConfirmDelete {
                        target: DeleteTarget::List(list),
                        confirm,
                    }
                }
                None => self.set_status("Nothing deletable is highlighted.", StatusKind::Error),
            },
            KeyCode::Char('o') => self.open_profile(list),
            _ => {}
        }
        Mode::Normal
    }

    fn resize_page(&mut self, list: ListKind, delta: isize) {
        let tasks = self.tasks.clone();
        if let Some(size) = self.pane(list).resize_page(delta, &tasks) {
            self.set_status(format!("Page size {size}."), StatusKind::Info);
        }
    }

    fn open_profile(&mut self, list: ListKind) {
        match self.pane_ref(list).profile_link() {
            None => self.set_status("Nothing highlighted.", StatusKind::Error),
            Some((name, None)) => {
                self.set_status(format!("{name} has no profile link."), StatusKind::Error)
            }
            Some((name, Some(url))) => {
                if let Err(err) = open_link(&url) {
                    warn!(%url, error = %err, "failed to open profile link");
                    self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
                } else {
                    self.set_status(format!("Opened {name}."), StatusKind::Info);
                }
            }
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Mode {
        let Some(list) = ListKind::of(self.screen) else {
            return Mode::Normal;
        };
        match code {
            KeyCode::Esc => {
                self.pane(list).search("");
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.pane(list).cursor_up(),
            KeyCode::Down => self.pane(list).cursor_down(),
            KeyCode::Backspace => {
                query.pop();
                self.pane(list).search(&query);
            }
            KeyCode::Char(ch) => {
                query.push(ch);
                self.pane(list).search(&query);
            }
            _ => {}
        }
        Mode::Searching(query)
    }

    fn handle_edit(&mut self, code: KeyCode, list: ListKind, mut form: EditForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.pane(list).close_edit();
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => return Mode::ConfirmSave { list, form },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Editing { list, form }
    }

    fn handle_confirm_save(&mut self, code: KeyCode, list: ListKind, mut form: EditForm) -> Mode {
        let confirmed = match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => false,
            _ => return Mode::ConfirmSave { list, form },
        };
        let tasks = self.tasks.clone();
        match self.pane(list).submit_edit(&form, confirmed, &tasks) {
            Ok(()) => {
                form.error = None;
                self.set_status("Saving...", StatusKind::Info);
            }
            Err(err) if !confirmed => {
                debug!(error = %err, "save declined");
                self.set_status("Save cancelled.", StatusKind::Info);
            }
            Err(err) => {
                let message = surface_error(&err);
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
            }
        }
        Mode::Editing { list, form }
    }

    fn handle_confirm_delete(
        &mut self,
        code: KeyCode,
        target: DeleteTarget,
        confirm: ConfirmDelete,
    ) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match target {
                    DeleteTarget::List(list) => {
                        let tasks = self.tasks.clone();
                        if let Err(err) = self.pane(list).delete(confirm.id, &tasks) {
                            self.report("Delete", &err);
                        }
                    }
                    DeleteTarget::Genre => {
                        let service = Arc::clone(&self.genre_service);
                        let id = confirm.id;
                        self.tasks.spawn(async move {
                            AppEvent::Genres(GenreEvent::Deleted(id, service.delete_genre(id).await))
                        });
                    }
                }
                self.set_status(format!("Deleting {}...", confirm.label), StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete { target, confirm },
        }
    }

    fn load_genres(&mut self) {
        self.genres_requested = true;
        let service = Arc::clone(&self.genre_service);
        self.tasks.spawn(async move { AppEvent::Genres(GenreEvent::Listed(service.list_genres().await)) });
    }

    fn handle_genres_key(&mut self, code: KeyCode) -> Mode {
        if self.genres.films_modal().is_some() {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.genres.close_films();
            }
            return Mode::Normal;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.open_screen(Screen::Home),
            KeyCode::Up => self.genres.cursor_up(),
            KeyCode::Down => self.genres.cursor_down(),
            KeyCode::Char('r') => {
                self.load_genres();
                self.set_status("Reloading...", StatusKind::Info);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                return Mode::AddingGenre(EditForm::name_only(""));
            }
            KeyCode::Char('e') => match self.genres.highlighted().cloned() {
                Some(genre) => match genre.id {
                    Some(id) => {
                        return Mode::RenamingGenre {
                            id,
                            form: EditForm::name_only(&genre.name),
                        }
                    }
                    None => self.set_status("This genre has no identifier.", StatusKind::Error),
                },
                None => self.set_status("No genre highlighted.", StatusKind::Error),
            },
            KeyCode::Char('d') => {
                if let Some(genre) = self.genres.highlighted() {
                    if let Some(id) = genre.id {
                        return Mode::ConfirmDelete {
                            target: DeleteTarget::Genre,
                            confirm: ConfirmDelete {
                                id,
                                label: genre.name.clone(),
                            },
                        };
                    }
                }
                self.set_status("Nothing deletable is highlighted.", StatusKind::Error);
            }
            KeyCode::Enter => match self.genres.highlighted().cloned() {
                Some(genre) => match genre.id {
                    Some(id) => {
                        let service = Arc::clone(&self.genre_service);
                        self.tasks.spawn(async move {
                            let result = service.films_in_genre(id).await;
                            AppEvent::Genres(GenreEvent::Films(genre.name, result))
                        });
                    }
                    None => self.set_status("This genre has no identifier.", StatusKind::Error),
                },
                None => self.set_status("No genre highlighted.", StatusKind::Error),
            },
            _ => {}
        }
        Mode::Normal
    }

    fn handle_genre_form(&mut self, code: KeyCode, rename: Option<i64>, mut form: EditForm) -> Mode {
        let keep = |form: EditForm| match rename {
            Some(id) => Mode::RenamingGenre { id, form },
            None => Mode::AddingGenre(form),
        };
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match GenreManager::check_name(form.value(0)) {
                Ok(name) => {
                    let service = Arc::clone(&self.genre_service);
                    match rename {
                        Some(id) => self.tasks.spawn(async move {
                            let result = service.rename_genre(id, &name).await;
                            AppEvent::Genres(GenreEvent::Renamed(id, name, result))
                        }),
                        None => self.tasks.spawn(async move {
                            let result = service.create_genre(&name).await;
                            AppEvent::Genres(GenreEvent::Created(name, result))
                        }),
                    }
                    self.set_status("Saving genre...", StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => {
                    form.error = Some(err.to_string());
                    self.set_status(err.to_string(), StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        keep(form)
    }

    fn handle_advanced_search_key(&mut self, code: KeyCode) -> Mode {
        if self.search.results().is_some() {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.search.close_results();
            }
            return Mode::Normal;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.open_screen(Screen::Home),
            KeyCode::Up => self.search.previous_panel(),
            KeyCode::Down => self.search.next_panel(),
            KeyCode::Tab => self.search.active_panel_mut().next_field(),
            KeyCode::BackTab => self.search.active_panel_mut().previous_field(),
            KeyCode::Backspace => self.search.active_panel_mut().backspace(),
            KeyCode::Enter => match self.search.begin_submit() {
                Ok(query) => {
                    let service = Arc::clone(&self.search_service);
                    self.tasks.spawn(async move {
                        let result = query.execute(service.as_ref()).await;
                        AppEvent::Searched(query, result)
                    });
                    self.set_status("Searching...", StatusKind::Info);
                }
                Err(err) => self.report("Search", &err),
            },
            KeyCode::Char(ch) => {
                self.search.active_panel_mut().push_char(ch);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_event(&mut self, event: AppEvent) {
        let is_save = matches!(
            &event,
            AppEvent::Actors(ListEvent::Saved(..))
                | AppEvent::Films(ListEvent::Saved(..))
                | AppEvent::Directors(ListEvent::Saved(..))
        );
        let (operation, outcome) = match event {
            AppEvent::Actors(event) => ("Actors request", self.actors.apply(event)),
            AppEvent::Films(event) => ("Films request", self.films.apply(event)),
            AppEvent::Directors(event) => ("Directors request", self.directors.apply(event)),
            AppEvent::Genres(event) => ("Genres request", self.apply_genre_event(event)),
            AppEvent::Searched(query, result) => (
                "Search",
                self.search.apply_results(query, result).map(|_| None),
            ),
        };

        match outcome {
            Ok(Some(message)) => self.set_status(message, StatusKind::Info),
            Ok(None) => {
                if matches!(self.status, Some(StatusMessage { kind: StatusKind::Info, .. })) {
                    self.clear_status();
                }
            }
            Err(err) => {
                self.report(operation, &err);
                if is_save {
                    if let Mode::Editing { form, .. } = &mut self.mode {
                        form.error = Some(err.to_string());
                    }
                }
            }
        }

        if let Mode::Editing { list, .. } = self.mode {
            if !self.pane_ref(list).is_edit_open() {
                self.mode = Mode::Normal;
            }
        }
    }

    fn apply_genre_event(&mut self, event: GenreEvent) -> Result<Option<String>, ServiceError> {
        match event {
            GenreEvent::Listed(result) => {
                let outcome = self.genres.apply_list(result);
                if outcome.is_err() {
                    self.genres_requested = false;
                }
                outcome.map(|_| None)
            }
            GenreEvent::Created(name, result) => self
                .genres
                .apply_created(&name, result)
                .map(|_| Some("Genre added.".to_string())),
            GenreEvent::Renamed(id, name, result) => self
                .genres
                .apply_renamed(id, &name, result)
                .map(|_| Some("Genre renamed.".to_string())),
            GenreEvent::Deleted(id, result) => self
                .genres
                .apply_deleted(id, result)
                .map(|_| Some("Genre deleted.".to_string())),
            GenreEvent::Films(genre, result) => self.genres.apply_films(genre, result).map(|_| None),
        }
    }

    /// Log a failure and mirror it in the footer.
    fn report(&mut self, operation: &str, err: &ServiceError) {
        match err {
            ServiceError::Precondition(_) => warn!(operation, error = %err, "operation refused"),
            _ => error!(operation, kind = err.kind(), error = %err, "request failed"),
        }
        let text = match err {
            ServiceError::Precondition(message) => message.clone(),
            _ => format!("{operation} failed: {err}"),
        };
        self.set_status(text, StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Home => self.draw_home(frame, content_area),
            Screen::Actors => self.actors.draw(frame, content_area),
            Screen::Films => self.films.draw(frame, content_area),
            Screen::Directors => self.directors.draw(frame, content_area),
            Screen::Genres => self.draw_genres(frame, content_area),
            Screen::AdvancedSearch => self.draw_advanced_search(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Editing { list, form } => {
                let title = format!("Edit {}", self.pane_ref(*list).title());
                self.draw_form(frame, area, &title, form, 70, 60);
            }
            Mode::ConfirmSave { list, form } => {
                let title = format!("Edit {}", self.pane_ref(*list).title());
                self.draw_form(frame, area, &title, form, 70, 60);
                self.draw_confirm(frame, area, "Save Changes", "Save the changes to this record?");
            }
            Mode::ConfirmDelete { confirm, .. } => {
                let question = format!("Delete {}?", confirm.label);
                self.draw_confirm(frame, area, "Confirm Removal", &question);
            }
            Mode::AddingGenre(form) => self.draw_form(frame, area, "Add Genre", form, 50, 25),
            Mode::RenamingGenre { form, .. } => {
                self.draw_form(frame, area, "Rename Genre", form, 50, 25)
            }
            Mode::Searching(query) => self.draw_search_bar(frame, area, query),
            Mode::Normal => {}
        }
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Moviestar",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::raw("Browse and edit the movie catalog.")),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = HOME_ENTRIES
            .iter()
            .enumerate()
            .map(|(idx, (_, label))| ListItem::new(format!("{}. {label}", idx + 1)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Go to"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.home_selected));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_genres(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Genres ({})", self.genres.genres().len()));

        if self.genres.genres().is_empty() {
            let text = if self.genres.needs_load() {
                "Loading genres..."
            } else {
                "No genres yet. Press 'a' to add one."
            };
            let message = Paragraph::new(text).alignment(Alignment::Center).block(block);
            frame.render_widget(message, area);
        } else {
            let items: Vec<ListItem> = self
                .genres
                .genres()
                .iter()
                .map(|genre| ListItem::new(genre.name.clone()))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().fg(Color::Yellow))
                .highlight_symbol("▶ ");
            let mut state = ListState::default();
            state.select(Some(self.genres.cursor()));
            frame.render_stateful_widget(list, area, &mut state);
        }

        if let Some(modal) = self.genres.films_modal() {
            let rows: Vec<String> = modal.films.iter().map(ToString::to_string).collect();
            let title = format!("Films in {}", modal.genre);
            self.draw_rows_popup(frame, area, &title, &rows, "No films in this genre.");
        }
    }

    fn draw_advanced_search(&self, frame: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = self
            .search
            .panels()
            .iter()
            .map(|panel| Constraint::Length(panel.inputs().len() as u16 + 2))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, panel) in self.search.panels().iter().enumerate() {
            let is_active = idx == self.search.active_index();
            let mut block = Block::default()
                .borders(Borders::ALL)
                .title(panel.kind().title());
            if is_active {
                block = block.border_style(Style::default().fg(Color::Yellow));
            }
            let lines: Vec<Line> = panel
                .kind()
                .fields()
                .iter()
                .zip(panel.inputs())
                .enumerate()
                .map(|(field_idx, (label, value))| {
                    let style = if is_active && field_idx == panel.active_field() {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::raw(format!("{label}: ")),
                        Span::styled(value.clone(), style),
                    ])
                })
                .collect();
            frame.render_widget(Paragraph::new(lines).block(block), chunks[idx]);
        }

        if let Some(results) = self.search.results() {
            self.draw_rows_popup(frame, area, &results.caption, &results.rows, "No results.");
        }
    }

    fn draw_rows_popup(&self, frame: &mut Frame, area: Rect, title: &str, rows: &[String], empty: &str) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);
        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL);

        if rows.is_empty() {
            let message = Paragraph::new(empty.to_string())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, popup_area);
            return;
        }

        let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row.clone())).collect();
        frame.render_widget(List::new(items).block(block), popup_area);
    }

    fn draw_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        form: &EditForm,
        percent_x: u16,
        percent_y: u16,
    ) {
        let popup_area = centered_rect(percent_x, percent_y, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.fields.len()).map(|idx| form.build_line(idx)).collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset() as u16;
        let cursor_y = inner.y + form.active as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, question: &str) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(question.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, query: &str) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Filter this page");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {query}")))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.mode, self.screen) {
            (Mode::Searching(_), _) => {
                key_hints(&[("↑↓", "Navigate"), ("Enter", "Keep filter"), ("Esc", "Clear")])
            }
            (Mode::Editing { .. }, _) | (Mode::AddingGenre(_), _) | (Mode::RenamingGenre { .. }, _) => {
                key_hints(&[("Tab", "Next field"), ("Enter", "Save"), ("Esc", "Cancel")])
            }
            (Mode::ConfirmSave { .. }, _) | (Mode::ConfirmDelete { .. }, _) => {
                key_hints(&[("y", "Confirm"), ("n", "Cancel")])
            }
            (Mode::Normal, Screen::Home) => {
                key_hints(&[("↑↓", "Navigate"), ("Enter", "Open"), ("1-5", "Jump"), ("q", "Quit")])
            }
            (Mode::Normal, Screen::Genres) => key_hints(&[
                ("↑↓", "Select"),
                ("Enter", "Films"),
                ("a", "Add"),
                ("e", "Rename"),
                ("d", "Delete"),
                ("r", "Reload"),
                ("Esc", "Home"),
            ]),
            (Mode::Normal, Screen::AdvancedSearch) => key_hints(&[
                ("↑↓", "Panel"),
                ("Tab", "Field"),
                ("Enter", "Search"),
                ("Esc", "Home"),
            ]),
            (Mode::Normal, _) => key_hints(&[
                ("↑↓", "Select"),
                ("←→", "Page"),
                ("+/-", "Page size"),
                ("Enter", "Details"),
                ("/", "Filter"),
                ("e", "Edit"),
                ("d", "Delete"),
                ("o", "Profile"),
                ("Esc", "Back"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EntityService, MockGenreService, MockSearchService};
    use crate::controller::FakeService;
    use crate::models::Genre;
    use mockall::predicate::eq;

    fn actor(id: i64, name: &str) -> Actor {
        Actor {
            id: Some(id),
            name: name.into(),
            ..Actor::default()
        }
    }

    fn services(genres: MockGenreService, search: MockSearchService) -> Services {
        let actors: Arc<dyn EntityService<Actor>> =
            Arc::new(FakeService::new(vec![actor(1, "Tom Hanks"), actor(2, "Tom Hardy")]));
        Services {
            actors,
            films: Arc::new(FakeService::<Film>::new(Vec::new())),
            directors: Arc::new(FakeService::<Director>::new(Vec::new())),
            genres: Arc::new(genres),
            search: Arc::new(search),
        }
    }

    fn app(genres: MockGenreService, search: MockSearchService) -> App {
        App::new(services(genres, search), 10, Handle::current())
    }

    impl App {
        /// Wait for the next task result and apply it.
        async fn next_event(&mut self) {
            let event = self.events.recv().await.expect("dispatcher alive");
            self.handle_event(event);
        }

        fn status_text(&self) -> Option<&str> {
            self.status.as_ref().map(|status| status.text.as_str())
        }
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[tokio::test]
    async fn quit_from_home() {
        let mut app = app(MockGenreService::new(), MockSearchService::new());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[tokio::test]
    async fn opening_actors_loads_the_first_page() {
        let mut app = app(MockGenreService::new(), MockSearchService::new());
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.screen, Screen::Actors);
        app.next_event().await;
        assert_eq!(app.actors.controller.current_page().len(), 2);
    }

    #[tokio::test]
    async fn filter_mode_narrows_the_list_live() {
        let mut app = app(MockGenreService::new(), MockSearchService::new());
        press(&mut app, &[KeyCode::Char('1')]);
        app.next_event().await;

        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "hardy");
        let names: Vec<&str> = app
            .actors
            .controller
            .visible()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Tom Hardy"]);

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.actors.controller.visible().len(), 2);
    }

    #[tokio::test]
    async fn edit_flow_confirms_before_saving() {
        let mut app = app(MockGenreService::new(), MockSearchService::new());
        press(&mut app, &[KeyCode::Char('1')]);
        app.next_event().await;

        press(&mut app, &[KeyCode::Char('e')]);
        app.next_event().await;
        assert!(matches!(app.mode, Mode::Editing { .. }));

        type_text(&mut app, " Jr");
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('n')]);
        assert_eq!(app.status_text(), Some("Save cancelled."));
        assert!(matches!(app.mode, Mode::Editing { .. }));

        press(&mut app, &[KeyCode::Enter, KeyCode::Char('y')]);
        app.next_event().await;
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.actors.controller.current_page()[0].name, "Tom Hanks Jr");
        assert_eq!(app.status_text(), Some("Saved actor 1."));
    }

    #[tokio::test]
    async fn failed_genre_load_is_reported_in_the_footer() {
        let mut genres = MockGenreService::new();
        genres.expect_list_genres().times(1).returning(|| {
            Err(ServiceError::Server {
                status: 500,
                body: "down".into(),
            })
        });
        let mut app = app(genres, MockSearchService::new());

        press(&mut app, &[KeyCode::Char('4')]);
        app.next_event().await;
        assert_eq!(
            app.status_text(),
            Some("Genres request failed: backend returned 500: down")
        );
        assert!(app.genres.needs_load());
    }

    #[tokio::test]
    async fn blank_genre_name_stays_in_the_dialog() {
        let mut genres = MockGenreService::new();
        genres.expect_list_genres().returning(|| Ok(Vec::new()));
        genres.expect_create_genre().never();
        let mut app = app(genres, MockSearchService::new());
        press(&mut app, &[KeyCode::Char('4')]);
        app.next_event().await;

        press(&mut app, &[KeyCode::Char('a'), KeyCode::Char(' '), KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::AddingGenre(_)));
        assert_eq!(app.status_text(), Some("Genre name is required."));
    }

    #[tokio::test]
    async fn genre_films_modal_opens_and_closes() {
        let mut genres = MockGenreService::new();
        genres.expect_list_genres().returning(|| {
            Ok(vec![Genre {
                id: Some(9),
                name: "Western".into(),
            }])
        });
        genres
            .expect_films_in_genre()
            .with(eq(9))
            .returning(|_| Ok(Vec::new()));
        let mut app = app(genres, MockSearchService::new());
        press(&mut app, &[KeyCode::Char('4')]);
        app.next_event().await;

        press(&mut app, &[KeyCode::Enter]);
        app.next_event().await;
        assert!(app.genres.films_modal().unwrap().films.is_empty());

        press(&mut app, &[KeyCode::Esc]);
        assert!(app.genres.films_modal().is_none());
        assert_eq!(app.screen, Screen::Genres);
    }

    #[tokio::test]
    async fn advanced_search_shows_results() {
        let mut search = MockSearchService::new();
        search
            .expect_actors_in_films()
            .with(eq(3), eq(4))
            .returning(|_, _| Ok(vec!["Meg Ryan".into()]));
        let mut app = app(MockGenreService::new(), search);

        press(&mut app, &[KeyCode::Char('5')]);
        type_text(&mut app, "3");
        press(&mut app, &[KeyCode::Tab]);
        type_text(&mut app, "4");
        press(&mut app, &[KeyCode::Enter]);
        app.next_event().await;

        let results = app.search.results().unwrap();
        assert_eq!(results.rows, vec!["Meg Ryan"]);
    }
}
