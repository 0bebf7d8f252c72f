use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use tracing::info;

use super::client::BackendClient;
use super::EntityService;
use crate::error::ServiceError;
use crate::models::{Film, FilmPatch, Page, Role};

pub(crate) const FILMS: &str = "/films";

/// Client for the `/films` resource.
#[derive(Debug, Clone)]
pub struct FilmService {
    client: BackendClient,
}

impl FilmService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<Film, ServiceError> {
        self.client
            .send_json(self.client.request(Method::GET, &format!("{FILMS}/{id}")))
            .await
    }

    pub async fn create(&self, film: &Film) -> Result<Film, ServiceError> {
        let created: Film = self
            .client
            .send_json(self.client.json_request(Method::POST, FILMS, film))
            .await?;
        info!(id = ?created.id, name = %created.name, "film created");
        Ok(created)
    }

    fn roles_request(&self, id: i64) -> RequestBuilder {
        self.client.request(
            Method::GET,
            &format!("{FILMS}/{id}/actors-and-characters"),
        )
    }

    fn update_request(&self, id: i64, patch: &FilmPatch) -> RequestBuilder {
        self.client
            .json_request(Method::PUT, &format!("{FILMS}/{id}"), patch)
    }
}

#[async_trait]
impl EntityService<Film> for FilmService {
    async fn list(&self, page: usize, size: usize) -> Result<Page<Film>, ServiceError> {
        self.client.fetch_page(FILMS, page, size).await
    }

    async fn related(&self, id: i64) -> Result<Vec<Role>, ServiceError> {
        self.client.send_json(self.roles_request(id)).await
    }

    async fn update(&self, id: i64, patch: &FilmPatch) -> Result<(), ServiceError> {
        self.client.send_empty(self.update_request(id, patch)).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.client
            .send_empty(self.client.request(Method::DELETE, &format!("{FILMS}/{id}")))
            .await
    }
}
