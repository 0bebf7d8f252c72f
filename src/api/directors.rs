use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use tracing::info;

use super::client::BackendClient;
use super::EntityService;
use crate::error::ServiceError;
use crate::models::{Director, DirectorFilm, DirectorPatch, Page};

const DIRECTORS: &str = "/realisateurs";

/// Client for the `/realisateurs` resource.
#[derive(Debug, Clone)]
pub struct DirectorService {
    client: BackendClient,
}

impl DirectorService {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: i64) -> Result<Director, ServiceError> {
        self.client.send_json(self.path_request(Method::GET, id)).await
    }

    pub async fn create(&self, director: &Director) -> Result<Director, ServiceError> {
        let created: Director = self
            .client
            .send_json(self.client.json_request(Method::POST, DIRECTORS, director))
            .await?;
        info!(id = ?created.id, name = %created.name, "director created");
        Ok(created)
    }

    fn path_request(&self, method: Method, id: i64) -> RequestBuilder {
        self.client.request(method, &format!("{DIRECTORS}/{id}"))
    }

    fn films_request(&self, id: i64) -> RequestBuilder {
        self.client
            .request(Method::GET, &format!("{DIRECTORS}/{id}/films"))
    }

    fn update_request(&self, id: i64, patch: &DirectorPatch) -> RequestBuilder {
        self.client
            .json_request(Method::PUT, &format!("{DIRECTORS}/{id}"), patch)
    }
}

#[async_trait]
impl EntityService<Director> for DirectorService {
    async fn list(&self, page: usize, size: usize) -> Result<Page<Director>, ServiceError> {
        self.client.fetch_page(DIRECTORS, page, size).await
    }

    async fn related(&self, id: i64) -> Result<Vec<DirectorFilm>, ServiceError> {
        self.client.send_json(self.films_request(id)).await
    }

    async fn update(&self, id: i64, patch: &DirectorPatch) -> Result<(), ServiceError> {
        self.client.send_empty(self.update_request(id, patch)).await
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.client
            .send_empty(self.path_request(Method::DELETE, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::test_client;

    #[test]
    fn director_paths_use_realisateurs() {
        let service = DirectorService::new(test_client());
        let request = service.path_request(Method::GET, 4).build().unwrap();
        assert_eq!(request.url().as_str(), "http://backend.test/realisateurs/4");

        let films = service.films_request(4).build().unwrap();
        assert_eq!(films.method(), Method::GET);
        assert_eq!(films.url().as_str(), "http://backend.test/realisateurs/4/films");
    }

    #[test]
    fn director_update_puts_the_record_fields() {
        let service = DirectorService::new(test_client());
        let patch = DirectorPatch {
            name: Some("Agnès Varda".into()),
            birth_place: Some("Ixelles".into()),
            ..DirectorPatch::default()
        };
        let request = service.update_request(4, &patch).build().unwrap();
        assert_eq!(request.method(), Method::PUT);
        assert_eq!(request.url().path(), "/realisateurs/4");
        assert_eq!(
            request.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            body,
            r#"{"nom":"Agnès Varda","lieuNaissance":"Ixelles"}"#.as_bytes()
        );
    }
}
