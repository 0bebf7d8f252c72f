use std::sync::Arc;

use anyhow::{anyhow, Result};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::EntityService;
use crate::controller::{ListController, LoadRequest};
use crate::error::ServiceError;
use crate::models::{Actor, Director, DirectorFilm, Entity, Film, FilmYear, Role};

use super::events::{AppEvent, Dispatcher, ListEvent};
use super::forms::{ConfirmDelete, EditForm, Editable};

/// Smallest page size reachable with the resize keys.
const MIN_PAGE_SIZE: usize = 5;

/// How a list entity is presented in the list and detail panes.
pub(crate) trait EntityView: Editable {
    /// Plural heading of the list screen.
    const TITLE: &'static str;
    /// Heading above the relationship rows in the detail pane.
    const RELATED_TITLE: &'static str;

    fn list_label(&self) -> String;
    fn detail_lines(&self) -> Vec<Line<'static>>;
    fn related_line(row: &Self::Related) -> Line<'static>;
}

fn field_line(label: &str, value: Option<&str>) -> Line<'static> {
    let value = value.filter(|v| !v.trim().is_empty()).unwrap_or("-");
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Cyan)),
        Span::raw(value.to_string()),
    ])
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

impl EntityView for Actor {
    const TITLE: &'static str = "Actors";
    const RELATED_TITLE: &'static str = "Films";

    fn list_label(&self) -> String {
        self.name.clone()
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        vec![
            heading(&self.name),
            field_line("Born", self.birth_date.as_deref()),
            field_line("Birth place", self.birth_place.as_deref()),
            field_line("IMDb", self.imdb_id.as_deref()),
            field_line("Profile", self.profile_url.as_deref()),
        ]
    }

    fn related_line(row: &FilmYear) -> Line<'static> {
        Line::from(row.to_string())
    }
}

impl EntityView for Film {
    const TITLE: &'static str = "Films";
    const RELATED_TITLE: &'static str = "Cast";

    fn list_label(&self) -> String {
        self.to_string()
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let year = self.release_year.map(|y| y.to_string());
        let genres = self.genres.join(", ");
        vec![
            heading(&self.name),
            field_line("Released", year.as_deref()),
            field_line("Rating", self.rating.as_deref()),
            field_line("Genres", Some(genres.as_str())),
            field_line("Language", self.language.as_deref()),
            field_line("Country", self.country.as_deref()),
            field_line("Shot in", self.shooting_location.as_deref()),
            field_line("IMDb", self.imdb_id.as_deref()),
            field_line("Profile", self.profile_url.as_deref()),
            field_line("Summary", self.summary.as_deref()),
        ]
    }

    fn related_line(row: &Role) -> Line<'static> {
        Line::from(vec![
            Span::raw(row.actor_name.clone()),
            Span::styled(" as ", Style::default().fg(Color::Gray)),
            Span::raw(row.character_name.clone()),
        ])
    }
}

impl EntityView for Director {
    const TITLE: &'static str = "Directors";
    const RELATED_TITLE: &'static str = "Filmography";

    fn list_label(&self) -> String {
        self.name.clone()
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        vec![
            heading(&self.name),
            field_line("Born", self.birth_date.as_deref()),
            field_line("Birth place", self.birth_place.as_deref()),
            field_line("IMDb", self.imdb_id.as_deref()),
            field_line("Profile", self.profile_url.as_deref()),
        ]
    }

    fn related_line(row: &DirectorFilm) -> Line<'static> {
        let mut text = match row.year {
            Some(year) => format!("{} ({year})", row.title),
            None => row.title.clone(),
        };
        let extras: Vec<&str> = [&row.language, &row.country, &row.rating]
            .into_iter()
            .filter_map(|cell| cell.as_deref())
            .collect();
        if !extras.is_empty() {
            text.push_str(&format!("  {}", extras.join(" / ")));
        }
        Line::from(text)
    }
}

/// A list screen: its controller plus the service its requests go to.
pub(crate) struct ListScreen<E: Entity> {
    pub(crate) controller: ListController<E>,
    service: Arc<dyn EntityService<E>>,
    wrap: fn(ListEvent<E>) -> AppEvent,
    opened: bool,
}

impl<E: EntityView> ListScreen<E> {
    pub(crate) fn new(
        service: Arc<dyn EntityService<E>>,
        page_size: usize,
        wrap: fn(ListEvent<E>) -> AppEvent,
    ) -> Self {
        Self {
            controller: ListController::new(page_size),
            service,
            wrap,
            opened: false,
        }
    }

    fn dispatch_load(&self, request: LoadRequest, tasks: &Dispatcher) {
        let service = Arc::clone(&self.service);
        let wrap = self.wrap;
        tasks.spawn(async move {
            let result = service.list(request.page, request.size).await;
            wrap(ListEvent::Loaded(request, result))
        });
    }

    /// Fold a task result into the controller. Returns a status line for
    /// completed writes.
    pub(crate) fn apply(&mut self, event: ListEvent<E>) -> Result<Option<String>, ServiceError> {
        match event {
            ListEvent::Loaded(request, result) => {
                self.controller.apply_load(request, result)?;
                Ok(None)
            }
            ListEvent::Related(request, result) => {
                self.controller.apply_related(request, result)?;
                Ok(None)
            }
            ListEvent::Saved(request, result) => {
                let id = request.id;
                self.controller.apply_save(request, result)?;
                Ok(Some(format!("Saved {} {id}.", E::KIND)))
            }
            ListEvent::Deleted(request, result) => {
                let id = request.id;
                self.controller.apply_delete(request, result)?;
                Ok(Some(format!("Deleted {} {id}.", E::KIND)))
            }
        }
    }
}

/// Object-safe view of a [`ListScreen`] so the key handlers can drive any of
/// the three list screens the same way.
pub(crate) trait ListPane {
    fn title(&self) -> &'static str;
    /// Load the first page the first time the screen is shown.
    fn open(&mut self, tasks: &Dispatcher);
    fn reload(&mut self, tasks: &Dispatcher);
    fn cursor_up(&mut self);
    fn cursor_down(&mut self);
    fn next_page(&mut self, tasks: &Dispatcher) -> bool;
    fn previous_page(&mut self, tasks: &Dispatcher) -> bool;
    /// Grow or shrink the page size, returning the new size when it changed.
    fn resize_page(&mut self, delta: isize, tasks: &Dispatcher) -> Option<usize>;
    fn filter(&self) -> &str;
    fn search(&mut self, term: &str);
    fn select_highlighted(&mut self, tasks: &Dispatcher) -> Result<(), ServiceError>;
    /// Select the highlighted record and seed an edit form from it.
    fn start_edit(&mut self, tasks: &Dispatcher) -> Result<EditForm, ServiceError>;
    fn is_edit_open(&self) -> bool;
    fn close_edit(&mut self);
    fn detail_open(&self) -> bool;
    fn close_detail(&mut self);
    fn submit_edit(&mut self, form: &EditForm, confirmed: bool, tasks: &Dispatcher) -> Result<()>;
    fn delete_candidate(&self) -> Option<ConfirmDelete>;
    fn delete(&mut self, id: i64, tasks: &Dispatcher) -> Result<(), ServiceError>;
    /// Name and profile URL of the selected record, else the highlighted one.
    fn profile_link(&self) -> Option<(String, Option<String>)>;
    fn draw(&self, frame: &mut Frame, area: Rect);
}

impl<E: EntityView> ListScreen<E> {
    fn dispatch_related(&mut self, entity: &E, tasks: &Dispatcher) -> Result<(), ServiceError> {
        let request = self.controller.begin_select(entity)?;
        let service = Arc::clone(&self.service);
        let wrap = self.wrap;
        tasks.spawn(async move {
            let result = service.related(request.id).await;
            wrap(ListEvent::Related(request, result))
        });
        Ok(())
    }

    fn highlighted_or_err(&self) -> Result<E, ServiceError> {
        self.controller
            .highlighted()
            .cloned()
            .ok_or_else(|| ServiceError::precondition(format!("No {} highlighted.", E::KIND)))
    }
}

impl<E: EntityView> ListPane for ListScreen<E> {
    fn title(&self) -> &'static str {
        E::TITLE
    }

    fn open(&mut self, tasks: &Dispatcher) {
        if !self.opened {
            self.opened = true;
            self.reload(tasks);
        }
    }

    fn reload(&mut self, tasks: &Dispatcher) {
        let request = self.controller.reload();
        self.dispatch_load(request, tasks);
    }

    fn cursor_up(&mut self) {
        self.controller.cursor_up();
    }

    fn cursor_down(&mut self) {
        self.controller.cursor_down();
    }

    fn next_page(&mut self, tasks: &Dispatcher) -> bool {
        match self.controller.next_page() {
            Some(request) => {
                self.dispatch_load(request, tasks);
                true
            }
            None => false,
        }
    }

    fn previous_page(&mut self, tasks: &Dispatcher) -> bool {
        match self.controller.previous_page() {
            Some(request) => {
                self.dispatch_load(request, tasks);
                true
            }
            None => false,
        }
    }

    fn resize_page(&mut self, delta: isize, tasks: &Dispatcher) -> Option<usize> {
        let size = self
            .controller
            .page_size()
            .saturating_add_signed(delta)
            .max(MIN_PAGE_SIZE);
        let request = self.controller.set_page_size(size)?;
        self.dispatch_load(request, tasks);
        Some(request.size)
    }

    fn filter(&self) -> &str {
        self.controller.filter()
    }

    fn search(&mut self, term: &str) {
        self.controller.search(term);
    }

    fn select_highlighted(&mut self, tasks: &Dispatcher) -> Result<(), ServiceError> {
        let entity = self.highlighted_or_err()?;
        self.dispatch_related(&entity, tasks)
    }

    fn start_edit(&mut self, tasks: &Dispatcher) -> Result<EditForm, ServiceError> {
        let entity = self.highlighted_or_err()?;
        self.controller.request_edit();
        if let Err(err) = self.dispatch_related(&entity, tasks) {
            self.controller.close_edit();
            return Err(err);
        }
        Ok(entity.edit_form())
    }

    fn is_edit_open(&self) -> bool {
        self.controller.is_edit_modal_open()
    }

    fn close_edit(&mut self) {
        self.controller.close_edit();
    }

    fn detail_open(&self) -> bool {
        self.controller.detail_open()
    }

    fn close_detail(&mut self) {
        self.controller.close_detail();
    }

    fn submit_edit(&mut self, form: &EditForm, confirmed: bool, tasks: &Dispatcher) -> Result<()> {
        if !form.is_dirty() {
            return Err(anyhow!("No changes to save."));
        }
        let patch = E::parse_patch(form)?;
        let request = self.controller.begin_save(patch, confirmed)?;
        let service = Arc::clone(&self.service);
        let wrap = self.wrap;
        tasks.spawn(async move {
            let result = service.update(request.id, &request.patch).await;
            wrap(ListEvent::Saved(request, result))
        });
        Ok(())
    }

    fn delete_candidate(&self) -> Option<ConfirmDelete> {
        let entity = self.controller.highlighted()?;
        Some(ConfirmDelete {
            id: entity.id()?,
            label: entity.list_label(),
        })
    }

    fn delete(&mut self, id: i64, tasks: &Dispatcher) -> Result<(), ServiceError> {
        let entity = self
            .controller
            .current_page()
            .iter()
            .find(|record| record.id() == Some(id))
            .cloned()
            .ok_or_else(|| ServiceError::precondition(format!("{} {id} is not loaded.", E::KIND)))?;
        let request = self.controller.begin_delete(&entity)?;
        let service = Arc::clone(&self.service);
        let wrap = self.wrap;
        tasks.spawn(async move {
            let result = service.delete(request.id).await;
            wrap(ListEvent::Deleted(request, result))
        });
        Ok(())
    }

    fn profile_link(&self) -> Option<(String, Option<String>)> {
        let entity = self
            .controller
            .selected()
            .or_else(|| self.controller.highlighted())?;
        Some((
            entity.name().to_string(),
            entity.profile_url().map(str::to_string),
        ))
    }

    fn draw(&self, frame: &mut Frame, area: Rect) {
        let controller = &self.controller;
        let (list_area, detail_area) = if controller.detail_open() {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        let mut title = format!(
            "{}  page {}/{}  size {}",
            E::TITLE,
            controller.page_index() + 1,
            controller.total_pages().max(1),
            controller.page_size()
        );
        if !controller.filter().is_empty() {
            title.push_str(&format!("  filter \"{}\"", controller.filter()));
        }
        let block = Block::default().borders(Borders::ALL).title(title);

        if controller.visible().is_empty() {
            let text = if controller.current_page().is_empty() {
                "Nothing loaded yet. Press r to reload."
            } else {
                "No records on this page match the filter."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, list_area);
        } else {
            let items: Vec<ListItem> = controller
                .visible()
                .iter()
                .map(|record| ListItem::new(record.list_label()))
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");
            let mut state = ListState::default();
            state.select(Some(controller.cursor()));
            frame.render_stateful_widget(list, list_area, &mut state);
        }

        if let (Some(area), Some(selected)) = (detail_area, controller.selected()) {
            let mut lines = selected.detail_lines();
            lines.push(Line::from(""));
            lines.push(heading(E::RELATED_TITLE));
            match selected.related() {
                None if controller.related_failed() => lines.push(Line::from(Span::styled(
                    "Could not load. Press Enter to retry.",
                    Style::default().fg(Color::Red),
                ))),
                None => lines.push(Line::from(Span::styled(
                    "Loading...",
                    Style::default().fg(Color::DarkGray),
                ))),
                Some([]) => lines.push(Line::from(Span::styled(
                    "None.",
                    Style::default().fg(Color::DarkGray),
                ))),
                Some(rows) => lines.extend(rows.iter().map(E::related_line)),
            }
            let detail = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Details"))
                .wrap(Wrap { trim: true });
            frame.render_widget(detail, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::FakeService;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn actor(id: i64, name: &str) -> Actor {
        Actor {
            id: Some(id),
            name: name.into(),
            ..Actor::default()
        }
    }

    async fn open_actors(
        records: Vec<Actor>,
    ) -> (
        ListScreen<Actor>,
        Dispatcher,
        tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let service: Arc<dyn EntityService<Actor>> = Arc::new(FakeService::new(records));
        let mut screen = ListScreen::new(service, 10, AppEvent::Actors);
        let (tasks, mut rx) = Dispatcher::new(tokio::runtime::Handle::current());
        screen.open(&tasks);
        apply_next(&mut screen, &mut rx).await;
        (screen, tasks, rx)
    }

    async fn apply_next(
        screen: &mut ListScreen<Actor>,
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) -> Option<String> {
        match rx.recv().await {
            Some(AppEvent::Actors(event)) => screen.apply(event).unwrap(),
            _ => panic!("expected an actor event"),
        }
    }

    #[test]
    fn film_detail_joins_genres_and_marks_missing_fields() {
        let film = Film {
            id: Some(7),
            name: "X".into(),
            genres: vec!["Drama".into(), "Crime".into()],
            ..Film::default()
        };
        let lines: Vec<String> = film.detail_lines().iter().map(line_text).collect();
        assert!(lines.contains(&"Genres: Drama, Crime".to_string()));
        assert!(lines.contains(&"Rating: -".to_string()));
    }

    #[test]
    fn director_film_line_lists_present_columns() {
        let row = DirectorFilm {
            title: "Cléo de 5 à 7".into(),
            year: Some(1962),
            language: Some("French".into()),
            country: None,
            rating: Some("7.8".into()),
        };
        assert_eq!(
            line_text(&Director::related_line(&row)),
            "Cléo de 5 à 7 (1962)  French / 7.8"
        );
    }

    #[tokio::test]
    async fn opening_twice_loads_once() {
        let (mut screen, tasks, mut rx) = open_actors(vec![actor(1, "Tom Hanks")]).await;
        assert_eq!(screen.controller.current_page().len(), 1);
        screen.open(&tasks);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn edit_round_trip_patches_the_row() {
        let (mut screen, tasks, mut rx) =
            open_actors(vec![actor(1, "Tom Hanks"), actor(2, "Tom Hardy")]).await;
        screen.cursor_down();

        let mut form = screen.start_edit(&tasks).unwrap();
        assert!(screen.is_edit_open());
        apply_next(&mut screen, &mut rx).await;

        form.toggle_field();
        form.toggle_field();
        for ch in "London".chars() {
            form.push_char(ch);
        }
        screen.submit_edit(&form, true, &tasks).unwrap();
        let status = apply_next(&mut screen, &mut rx).await;

        assert_eq!(status.as_deref(), Some("Saved actor 2."));
        assert_eq!(
            screen.controller.current_page()[1].birth_place.as_deref(),
            Some("London")
        );
        assert!(!screen.is_edit_open());
    }

    #[tokio::test]
    async fn declined_save_keeps_the_form_open() {
        let (mut screen, tasks, mut rx) = open_actors(vec![actor(1, "Tom Hanks")]).await;
        let mut form = screen.start_edit(&tasks).unwrap();
        apply_next(&mut screen, &mut rx).await;
        form.push_char('!');

        let err = screen.submit_edit(&form, false, &tasks).unwrap_err();
        assert_eq!(err.to_string(), "Save was not confirmed.");
        assert!(screen.is_edit_open());
    }

    #[tokio::test]
    async fn failed_relationship_fetch_replaces_the_loading_line() {
        use ratatui::backend::TestBackend;
        use ratatui::Terminal;

        let (mut screen, _tasks, _rx) = open_actors(vec![actor(1, "Tom Hanks")]).await;
        let first = screen.controller.current_page()[0].clone();
        let request = screen.controller.begin_select(&first).unwrap();
        let err = screen
            .apply(ListEvent::Related(
                request,
                Err(ServiceError::Server {
                    status: 500,
                    body: "boom".into(),
                }),
            ))
            .unwrap_err();
        assert_eq!(err.kind(), "server");

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| screen.draw(frame, frame.area()))
            .unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Could not load."));
        assert!(!rendered.contains("Loading..."));
    }

    #[tokio::test]
    async fn untouched_form_is_not_sent() {
        let (mut screen, tasks, mut rx) = open_actors(vec![actor(1, "Tom Hanks")]).await;
        let form = screen.start_edit(&tasks).unwrap();
        apply_next(&mut screen, &mut rx).await;

        let err = screen.submit_edit(&form, true, &tasks).unwrap_err();
        assert_eq!(err.to_string(), "No changes to save.");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn delete_candidate_skips_records_without_id() {
        let (screen, _tasks, _rx) = open_actors(vec![Actor {
            name: "Nobody".into(),
            ..Actor::default()
        }])
        .await;
        assert!(screen.delete_candidate().is_none());
        assert_eq!(
            screen.profile_link(),
            Some(("Nobody".to_string(), None))
        );
    }
}
