use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use tracing::info;

use super::client::BackendClient;
use super::EntityService;
use crate::error::ServiceError;
use crate::models::{Actor, ActorPatch, FilmYear, Page};

const ACTORS: &str = "/acteurs";

/// Client for the `/acteurs` resource.
#[derive(Debug, Clone)]
pub struct ActorService {
    client: BackendClient,
}

impl ActorService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<Actor, ServiceError> {
        self.client.send_json(self.get_request(id)).await
    }

    pub async fn create(&self, actor: &Actor) -> Result<Actor, ServiceError> {
        let created: Actor = self
            .client
            .send_json(self.client.json_request(Method::POST, ACTORS, actor))
            .await?;
        info!(id = ?created.id, name = %created.name, "actor created");
        Ok(created)
    }

    fn get_request(&self, id: i64) -> RequestBuilder {
        self.client.request(Method::GET, &format!("{ACTORS}/{id}"))
    }

    fn films_request(&self, id: i64) -> RequestBuilder {
        self.client.request(Method::GET, &format!("{ACTORS}/{id}/films"))
    }

    fn update_request(&self, id: i64, patch: &ActorPatch) -> RequestBuilder {
        self.client
            .json_request(Method::PUT, &format!("{ACTORS}/{id}"), patch)
    }

    fn delete_request(&self, id: i64) -> RequestBuilder {
        self.client.request(Method::DELETE, &format!("{ACTORS}/{id}"))
    }
}

#[async_trait]
impl EntityService<Actor> for ActorService {
    async fn list(&self, page: usize, size: usize) -> Result<Page<Actor>, ServiceError> {
        self.client.fetch_page(ACTORS, page, size).await
    }

    async fn related(&self, id: i64) -> Result<Vec<FilmYear>, ServiceError> {
        self.client.send_json(self.films_request(id)).await
    }

    async fn update(&self, id: i64, patch: &ActorPatch) -> Result<(), ServiceError> {
        self.client.send_empty(self.update_request(id, patch)).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.client.send_empty(self.delete_request(id)).await
    }
}
