//! HTTP services for the movie backend, one module per resource family.

mod actors;
mod client;
mod directors;
mod films;
mod genres;
mod search;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{Actor, Director, Entity, Film, Page};

pub use actors::ActorService;
pub use client::BackendClient;
pub use directors::DirectorService;
pub use films::FilmService;
pub use genres::{GenreService, HttpGenreService};
pub use search::{HttpSearchService, SearchKind, SearchQuery, SearchService};

#[cfg(test)]
pub use genres::MockGenreService;
#[cfg(test)]
pub use search::MockSearchService;

/// Capability the generic list controller needs from a resource.
#[async_trait]
pub trait EntityService<E: Entity>: Send + Sync {
    /// One page of records, zero-based.
    async fn list(&self, page: usize, size: usize) -> Result<Page<E>, ServiceError>;

    /// Relationship collection of the record with `id`.
    async fn related(&self, id: i64) -> Result<Vec<E::Related>, ServiceError>;

    /// Send a partial update. The response body is ignored.
    async fn update(&self, id: i64, patch: &E::Patch) -> Result<(), ServiceError>;

    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// One handle per backend resource, shared by the screens and their tasks.
#[derive(Clone)]
pub struct Services {
    pub actors: Arc<dyn EntityService<Actor>>,
    pub films: Arc<dyn EntityService<Film>>,
    pub directors: Arc<dyn EntityService<Director>>,
    pub genres: Arc<dyn GenreService>,
    pub search: Arc<dyn SearchService>,
}

impl Services {
    /// HTTP-backed services sharing one connection pool.
    pub fn http(client: BackendClient) -> Self {
        Self {
            actors: Arc::new(ActorService::new(client.clone())),
            films: Arc::new(FilmService::new(client.clone())),
            directors: Arc::new(DirectorService::new(client.clone())),
            genres: Arc::new(HttpGenreService::new(client.clone())),
            search: Arc::new(HttpSearchService::new(client)),
        }
    }
}
