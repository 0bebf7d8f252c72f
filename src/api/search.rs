//! The four advanced-search queries. Raw form inputs are parsed into integers
//! here, at the service boundary, so the panels only ever hold text.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use super::client::BackendClient;
use super::films::FILMS;
use crate::error::ServiceError;
use crate::models::{Film, FilmYear};

/// Which advanced search a panel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    CommonActors,
    CommonFilms,
    FilmsBetweenYears,
    FilmsBetweenYearsWithActor,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::CommonActors,
        SearchKind::CommonFilms,
        SearchKind::FilmsBetweenYears,
        SearchKind::FilmsBetweenYearsWithActor,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SearchKind::CommonActors => "Actors common to two films",
            SearchKind::CommonFilms => "Films common to two actors",
            SearchKind::FilmsBetweenYears => "Films released between two years",
            SearchKind::FilmsBetweenYearsWithActor => "Films between two years with an actor",
        }
    }

    /// Labels of the text inputs, in submission order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            SearchKind::CommonActors => &["Film id 1", "Film id 2"],
            SearchKind::CommonFilms => &["Actor id 1", "Actor id 2"],
            SearchKind::FilmsBetweenYears => &["Start year", "End year"],
            SearchKind::FilmsBetweenYearsWithActor => &["Start year", "End year", "Actor id"],
        }
    }
}

/// A fully parsed advanced-search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuery {
    CommonActors { film_a: i64, film_b: i64 },
    CommonFilms { actor_a: i64, actor_b: i64 },
    FilmsBetweenYears { start: i32, end: i32 },
    FilmsBetweenYearsWithActor { start: i32, end: i32, actor: i64 },
}

impl SearchQuery {
    /// Parse the raw inputs of a panel. Inputs are matched to
    /// [`SearchKind::fields`] by position.
    pub fn parse(kind: SearchKind, inputs: &[String]) -> Result<Self, ServiceError> {
        let labels = kind.fields();
        if inputs.len() < labels.len() {
            return Err(ServiceError::precondition(format!(
                "{} needs {} values.",
                kind.title(),
                labels.len()
            )));
        }
        let int = |idx: usize| parse_int::<i64>(labels[idx], &inputs[idx]);
        let year = |idx: usize| parse_int::<i32>(labels[idx], &inputs[idx]);

        Ok(match kind {
            SearchKind::CommonActors => SearchQuery::CommonActors {
                film_a: int(0)?,
                film_b: int(1)?,
            },
            SearchKind::CommonFilms => SearchQuery::CommonFilms {
                actor_a: int(0)?,
                actor_b: int(1)?,
            },
            SearchKind::FilmsBetweenYears => SearchQuery::FilmsBetweenYears {
                start: year(0)?,
                end: year(1)?,
            },
            SearchKind::FilmsBetweenYearsWithActor => SearchQuery::FilmsBetweenYearsWithActor {
                start: year(0)?,
                end: year(1)?,
                actor: int(2)?,
            },
        })
    }

    /// Caption shown above the results.
    pub fn caption(&self) -> String {
        match self {
            SearchQuery::CommonActors { film_a, film_b } => {
                format!("Actors in films {film_a} and {film_b}")
            }
            SearchQuery::CommonFilms { actor_a, actor_b } => {
                format!("Films with actors {actor_a} and {actor_b}")
            }
            SearchQuery::FilmsBetweenYears { start, end } => {
                format!("Films released between {start} and {end}")
            }
            SearchQuery::FilmsBetweenYearsWithActor { start, end, actor } => {
                format!("Films between {start} and {end} with actor {actor}")
            }
        }
    }

    /// Issue exactly one backend query and render its rows as display lines.
    pub async fn execute(&self, service: &dyn SearchService) -> Result<Vec<String>, ServiceError> {
        let rows = match *self {
            SearchQuery::CommonActors { film_a, film_b } => {
                service.actors_in_films(film_a, film_b).await?
            }
            SearchQuery::CommonFilms { actor_a, actor_b } => service
                .films_by_two_actors(actor_a, actor_b)
                .await?
                .iter()
                .map(FilmYear::to_string)
                .collect(),
            SearchQuery::FilmsBetweenYears { start, end } => service
                .films_between_years(start, end)
                .await?
                .iter()
                .map(FilmYear::to_string)
                .collect(),
            SearchQuery::FilmsBetweenYearsWithActor { start, end, actor } => service
                .films_between_years_with_actor(start, end, actor)
                .await?
                .iter()
                .map(FilmYear::to_string)
                .collect(),
        };
        Ok(rows)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.caption())
    }
}

fn parse_int<T: std::str::FromStr>(label: &str, raw: &str) -> Result<T, ServiceError> {
    raw.trim()
        .parse()
        .map_err(|_| ServiceError::precondition(format!("{label} must be an integer.")))
}

/// Backend queries behind the advanced-search panels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Names of the actors playing in both films.
    async fn actors_in_films(&self, film_a: i64, film_b: i64) -> Result<Vec<String>, ServiceError>;
    async fn films_by_two_actors(
        &self,
        actor_a: i64,
        actor_b: i64,
    ) -> Result<Vec<FilmYear>, ServiceError>;
    async fn films_between_years(&self, start: i32, end: i32)
        -> Result<Vec<FilmYear>, ServiceError>;
    async fn films_between_years_with_actor(
        &self,
        start: i32,
        end: i32,
        actor: i64,
    ) -> Result<Vec<FilmYear>, ServiceError>;
}

/// [`SearchService`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSearchService {
    client: BackendClient,
}

impl HttpSearchService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.request(Method::GET, path)
    }

    fn actors_in_films_request(&self, film_a: i64, film_b: i64) -> RequestBuilder {
        self.get("/acteurs/in-films")
            .query(&[("filmId1", film_a), ("filmId2", film_b)])
    }

    fn films_by_two_actors_request(&self, actor_a: i64, actor_b: i64) -> RequestBuilder {
        self.get(&format!("{FILMS}/by-two-actors"))
            .query(&[("acteurId1", actor_a), ("acteurId2", actor_b)])
    }

    fn films_between_years_request(&self, start: i32, end: i32) -> RequestBuilder {
        self.get(&format!("{FILMS}/released-between-years"))
            .query(&[("startYear", start), ("endYear", end)])
    }

    fn films_with_actor_request(&self, start: i32, end: i32, actor: i64) -> RequestBuilder {
        self.get(&format!("{FILMS}/betweenYearsAndByActeur"))
            .query(&[("startYear", i64::from(start)), ("endYear", i64::from(end)), ("acteurId", actor)])
    }
}

/// The common-actors query selects a single column, which the backend
/// serializes either as bare strings or as one-cell rows.
fn actor_names(rows: Vec<Value>) -> Result<Vec<String>, ServiceError> {
    rows.into_iter()
        .map(|row| match row {
            Value::String(name) => Ok(name),
            Value::Array(cells) => match cells.into_iter().next() {
                Some(Value::String(name)) => Ok(name),
                other => Err(ServiceError::Shape(format!("unexpected actor cell {other:?}"))),
            },
            other => Err(ServiceError::Shape(format!("unexpected actor row {other}"))),
        })
        .collect()
}

#[async_trait]
impl SearchService for HttpSearchService {
    async fn actors_in_films(&self, film_a: i64, film_b: i64) -> Result<Vec<String>, ServiceError> {
        let rows: Vec<Value> = self
            .client
            .send_json(self.actors_in_films_request(film_a, film_b))
            .await?;
        actor_names(rows)
    }

    async fn films_by_two_actors(
        &self,
        actor_a: i64,
        actor_b: i64,
    ) -> Result<Vec<FilmYear>, ServiceError> {
        self.client
            .send_json(self.films_by_two_actors_request(actor_a, actor_b))
            .await
    }

    async fn films_between_years(
        &self,
        start: i32,
        end: i32,
    ) -> Result<Vec<FilmYear>, ServiceError> {
        let films: Vec<Film> = self
            .client
            .send_json(self.films_between_years_request(start, end))
            .await?;
        Ok(films
            .into_iter()
            .map(|film| FilmYear {
                title: film.name,
                year: film.release_year,
            })
            .collect())
    }

    async fn films_between_years_with_actor(
        &self,
        start: i32,
        end: i32,
        actor: i64,
    ) -> Result<Vec<FilmYear>, ServiceError> {
        self.client
            .send_json(self.films_with_actor_request(start, end, actor))
            .await
    }
}
