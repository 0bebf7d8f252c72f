use tracing::info;

use crate::api::GenreService;
use crate::error::ServiceError;
use crate::models::{FilmYear, Genre};

/// Films tagged with one genre, shown in a popup.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreFilms {
    pub genre: String,
    pub films: Vec<FilmYear>,
}

/// State behind the genres screen. The list is small and unpaginated, so each
/// operation edits it in place rather than going through a list controller.
#[derive(Debug, Clone, Default)]
pub struct GenreManager {
    genres: Vec<Genre>,
    loaded: bool,
    cursor: usize,
    films: Option<GenreFilms>,
}

impl GenreManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// The list is fetched once, the first time the screen opens.
    pub fn needs_load(&self) -> bool {
        !self.loaded
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn highlighted(&self) -> Option<&Genre> {
        self.genres.get(self.cursor)
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.genres.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn films_modal(&self) -> Option<&GenreFilms> {
        self.films.as_ref()
    }

    pub fn close_films(&mut self) {
        self.films = None;
    }

    /// Trimmed genre name, or a precondition error when blank.
    pub fn check_name(raw: &str) -> Result<String, ServiceError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ServiceError::precondition("Genre name is required."));
        }
        Ok(name.to_string())
    }

    pub fn apply_list(&mut self, result: Result<Vec<Genre>, ServiceError>) -> Result<(), ServiceError> {
        self.genres = result?;
        self.loaded = true;
        self.clamp_cursor();
        Ok(())
    }

    /// `name` is the label that was sent; it stands in when the echo has none.
    pub fn apply_created(
        &mut self,
        name: &str,
        result: Result<Genre, ServiceError>,
    ) -> Result<(), ServiceError> {
        let mut genre = result?;
        if genre.name.trim().is_empty() {
            genre.name = name.to_string();
        }
        info!(id = ?genre.id, name = %genre.name, "genre created");
        self.genres.push(genre);
        self.cursor = self.genres.len() - 1;
        Ok(())
    }

    pub fn apply_renamed(
        &mut self,
        id: i64,
        name: &str,
        result: Result<Genre, ServiceError>,
    ) -> Result<(), ServiceError> {
        let mut renamed = result?;
        renamed.id.get_or_insert(id);
        if renamed.name.trim().is_empty() {
            renamed.name = name.to_string();
        }
        if let Some(slot) = self.genres.iter_mut().find(|g| g.id == Some(id)) {
            info!(id, name = %renamed.name, "genre renamed");
            *slot = renamed;
        }
        Ok(())
    }

    pub fn apply_deleted(&mut self, id: i64, result: Result<(), ServiceError>) -> Result<(), ServiceError> {
        result?;
        self.genres.retain(|g| g.id != Some(id));
        self.clamp_cursor();
        info!(id, "genre deleted");
        Ok(())
    }

    pub fn apply_films(
        &mut self,
        genre: String,
        result: Result<Vec<FilmYear>, ServiceError>,
    ) -> Result<(), ServiceError> {
        let films = result?;
        self.films = Some(GenreFilms { genre, films });
        Ok(())
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.genres.len() {
            self.cursor = self.genres.len().saturating_sub(1);
        }
    }

    pub async fn load(&mut self, service: &dyn GenreService) -> Result<(), ServiceError> {
        let result = service.list_genres().await;
        self.apply_list(result)
    }

    pub async fn add(&mut self, service: &dyn GenreService, raw: &str) -> Result<(), ServiceError> {
        let name = Self::check_name(raw)?;
        let result = service.create_genre(&name).await;
        self.apply_created(&name, result)
    }

    pub async fn rename(
        &mut self,
        service: &dyn GenreService,
        id: i64,
        raw: &str,
    ) -> Result<(), ServiceError> {
        let name = Self::check_name(raw)?;
        let result = service.rename_genre(id, &name).await;
        self.apply_renamed(id, &name, result)
    }

    pub async fn delete(&mut self, service: &dyn GenreService, id: i64) -> Result<(), ServiceError> {
        let result = service.delete_genre(id).await;
        self.apply_deleted(id, result)
    }

    pub async fn show_films(
        &mut self,
        service: &dyn GenreService,
        genre: &Genre,
    ) -> Result<(), ServiceError> {
        let id = genre
            .id
            .ok_or_else(|| ServiceError::precondition("This genre has no identifier."))?;
        let result = service.films_in_genre(id).await;
        self.apply_films(genre.name.clone(), result)
    }
}
