use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;

use super::client::BackendClient;
use super::films::FILMS;
use crate::error::ServiceError;
use crate::models::{FilmYear, Genre};

const GENRES: &str = "/genres";

/// Body accepted by the genre write endpoints.
#[derive(Debug, Serialize)]
struct GenreBody<'a> {
    name: &'a str,
}

/// Operations behind the genre manager screen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreService: Send + Sync {
    async fn list_genres(&self) -> Result<Vec<Genre>, ServiceError>;
    async fn create_genre(&self, name: &str) -> Result<Genre, ServiceError>;
    async fn rename_genre(&self, id: i64, name: &str) -> Result<Genre, ServiceError>;
    async fn delete_genre(&self, id: i64) -> Result<(), ServiceError>;
    /// `[title, year]` rows for every film tagged with the genre.
    async fn films_in_genre(&self, id: i64) -> Result<Vec<FilmYear>, ServiceError>;
}

/// [`GenreService`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGenreService {
    client: BackendClient,
}

impl HttpGenreService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn create_request(&self, name: &str) -> RequestBuilder {
        self.client
            .json_request(Method::POST, GENRES, &GenreBody { name })
    }

    fn rename_request(&self, id: i64, name: &str) -> RequestBuilder {
        self.client
            .json_request(Method::PUT, &format!("{GENRES}/{id}"), &GenreBody { name })
    }

    fn films_request(&self, id: i64) -> RequestBuilder {
        self.client
            .request(Method::GET, &format!("{FILMS}/by-genre"))
            .query(&[("genreId", id)])
    }
}

#[async_trait]
impl GenreService for HttpGenreService {
    async fn list_genres(&self) -> Result<Vec<Genre>, ServiceError> {
        self.client
            .send_json(self.client.request(Method::GET, GENRES))
            .await
    }

    async fn create_genre(&self, name: &str) -> Result<Genre, ServiceError> {
        self.client.send_json(self.create_request(name)).await
    }

    async fn rename_genre(&self, id: i64, name: &str) -> Result<Genre, ServiceError> {
        self.client.send_json(self.rename_request(id, name)).await
    }

    async fn delete_genre(&self, id: i64) -> Result<(), ServiceError> {
        self.client
            .send_empty(self.client.request(Method::DELETE, &format!("{GENRES}/{id}")))
            .await
    }

    async fn films_in_genre(&self, id: i64) -> Result<Vec<FilmYear>, ServiceError> {
        self.client.send_json(self.films_request(id)).await
    }
}
