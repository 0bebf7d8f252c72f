//! Paginated, filterable, selectable list of one entity kind.
//!
//! Every network step is split in two: a `begin_*` call validates and returns
//! a ticket describing the request to issue, and an `apply_*` call folds the
//! service result back in. The terminal front end runs the request on the
//! runtime in between; tests and scripts can use the async wrappers at the
//! bottom of the impl, which do both halves against an [`EntityService`].

use tracing::{debug, info, warn};

use crate::api::EntityService;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::ServiceError;
use crate::models::{Entity, Page, Patch};

/// A page fetch to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub page: usize,
    pub size: usize,
    generation: u64,
}

/// A relationship fetch for the freshly selected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedRequest {
    pub id: i64,
    generation: u64,
}

/// A confirmed update of the selected record.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest<P> {
    pub id: i64,
    pub patch: P,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: i64,
}

#[derive(Debug, Clone)]
pub struct ListController<E: Entity> {
    current_page: Vec<E>,
    visible: Vec<E>,
    filter: String,
    page_index: usize,
    page_size: usize,
    total_pages: usize,
    selected: Option<E>,
    edit_requested: bool,
    detail_open: bool,
    related_failed: bool,
    cursor: usize,
    load_generation: u64,
    select_generation: u64,
}

impl<E: Entity> Default for ListController<E> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<E: Entity> ListController<E> {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: Vec::new(),
            visible: Vec::new(),
            filter: String::new(),
            page_index: 0,
            page_size: page_size.max(1),
            total_pages: 0,
            selected: None,
            edit_requested: false,
            detail_open: false,
            related_failed: false,
            cursor: 0,
            load_generation: 0,
            select_generation: 0,
        }
    }

    pub fn current_page(&self) -> &[E] {
        &self.current_page
    }

    /// The filtered view of the loaded page.
    pub fn visible(&self) -> &[E] {
        &self.visible
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn selected(&self) -> Option<&E> {
        self.selected.as_ref()
    }

    pub fn edit_requested(&self) -> bool {
        self.edit_requested
    }

    pub fn detail_open(&self) -> bool {
        self.detail_open
    }

    /// The relationship fetch for the current selection failed.
    pub fn related_failed(&self) -> bool {
        self.related_failed
    }

    /// The edit form is shown only once a record is selected.
    pub fn is_edit_modal_open(&self) -> bool {
        self.edit_requested && self.selected.is_some()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Record under the highlight cursor.
    pub fn highlighted(&self) -> Option<&E> {
        self.visible.get(self.cursor)
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Ticket for (re)loading the current page. Any load still in flight
    /// becomes stale.
    pub fn reload(&mut self) -> LoadRequest {
        self.begin_load(self.page_index, self.page_size)
    }

    pub fn begin_load(&mut self, page: usize, size: usize) -> LoadRequest {
        self.load_generation += 1;
        LoadRequest {
            page,
            size: size.max(1),
            generation: self.load_generation,
        }
    }

    /// Jump to `page`. Nothing to do when already there or out of range.
    pub fn set_page(&mut self, page: usize) -> Option<LoadRequest> {
        if page == self.page_index || page >= self.total_pages {
            return None;
        }
        Some(self.begin_load(page, self.page_size))
    }

    pub fn next_page(&mut self) -> Option<LoadRequest> {
        self.set_page(self.page_index + 1)
    }

    pub fn previous_page(&mut self) -> Option<LoadRequest> {
        let page = self.page_index.checked_sub(1)?;
        self.set_page(page)
    }

    /// Changing the page size restarts from the first page.
    pub fn set_page_size(&mut self, size: usize) -> Option<LoadRequest> {
        if size == 0 || size == self.page_size {
            return None;
        }
        Some(self.begin_load(0, size))
    }

    /// Fold a page response in. Responses to superseded requests are dropped,
    /// errors included; a failure on the live request leaves state untouched.
    pub fn apply_load(
        &mut self,
        request: LoadRequest,
        result: Result<Page<E>, ServiceError>,
    ) -> Result<(), ServiceError> {
        if request.generation != self.load_generation {
            debug!(
                kind = E::KIND,
                page = request.page,
                "discarding stale page response"
            );
            return Ok(());
        }
        let page = result?;
        debug!(
            kind = E::KIND,
            page = request.page,
            records = page.content.len(),
            total_pages = page.total_pages,
            "page loaded"
        );
        self.current_page = page.content;
        self.total_pages = page.total_pages;
        self.page_index = request.page;
        self.page_size = request.size;
        self.refilter();
        Ok(())
    }

    /// Narrow the visible rows to names containing `term`, ignoring case.
    /// Only the loaded page is searched.
    pub fn search(&mut self, term: &str) {
        self.filter = term.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .current_page
            .iter()
            .filter(|record| needle.is_empty() || record.name().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    /// Select `entity` and open its detail panel. The relationship rows are
    /// fetched afresh on every selection.
    pub fn begin_select(&mut self, entity: &E) -> Result<RelatedRequest, ServiceError> {
        let id = entity.id().ok_or_else(|| {
            ServiceError::precondition(format!("This {} has no identifier.", E::KIND))
        })?;
        let mut selected = entity.clone();
        selected.set_related(None);
        self.selected = Some(selected);
        self.detail_open = true;
        self.related_failed = false;
        self.select_generation += 1;
        Ok(RelatedRequest {
            id,
            generation: self.select_generation,
        })
    }

    pub fn apply_related(
        &mut self,
        request: RelatedRequest,
        result: Result<Vec<E::Related>, ServiceError>,
    ) -> Result<(), ServiceError> {
        let current = self.selected.as_ref().and_then(Entity::id);
        if request.generation != self.select_generation || current != Some(request.id) {
            debug!(kind = E::KIND, id = request.id, "discarding stale relationship response");
            return Ok(());
        }
        let rows = match result {
            Ok(rows) => rows,
            Err(err) => {
                self.related_failed = true;
                return Err(err);
            }
        };
        if let Some(selected) = self.selected.as_mut() {
            selected.set_related(Some(rows));
        }
        Ok(())
    }

    pub fn request_edit(&mut self) {
        self.edit_requested = true;
    }

    pub fn close_edit(&mut self) {
        self.edit_requested = false;
    }

    /// Hide the detail panel and drop the selection along with its
    /// relationship rows.
    pub fn close_detail(&mut self) {
        self.detail_open = false;
        self.edit_requested = false;
        self.related_failed = false;
        self.selected = None;
        self.select_generation += 1;
    }

    pub fn begin_save(
        &self,
        patch: E::Patch,
        confirmed: bool,
    ) -> Result<SaveRequest<E::Patch>, ServiceError> {
        if !confirmed {
            return Err(ServiceError::precondition("Save was not confirmed."));
        }
        let selected = self
            .selected
            .as_ref()
            .ok_or_else(|| ServiceError::precondition(format!("No {} selected.", E::KIND)))?;
        let id = selected.id().ok_or_else(|| {
            ServiceError::precondition(format!("This {} has no identifier.", E::KIND))
        })?;
        Ok(SaveRequest { id, patch })
    }

    /// Merge a confirmed update into the loaded page instead of re-fetching.
    pub fn apply_save(
        &mut self,
        request: SaveRequest<E::Patch>,
        result: Result<(), ServiceError>,
    ) -> Result<(), ServiceError> {
        result?;
        match self
            .current_page
            .iter_mut()
            .find(|record| record.id() == Some(request.id))
        {
            Some(record) => request.patch.apply_to(record),
            None => warn!(kind = E::KIND, id = request.id, "saved record is no longer on the page"),
        }
        self.refilter();
        // A late response must not close a selection made since.
        if self.selected.as_ref().and_then(Entity::id) == Some(request.id) {
            self.close_detail();
        }
        info!(kind = E::KIND, id = request.id, "record updated");
        Ok(())
    }

    pub fn begin_delete(&self, entity: &E) -> Result<DeleteRequest, ServiceError> {
        let id = entity.id().ok_or_else(|| {
            ServiceError::precondition(format!("This {} has no identifier.", E::KIND))
        })?;
        Ok(DeleteRequest { id })
    }

    pub fn apply_delete(
        &mut self,
        request: DeleteRequest,
        result: Result<(), ServiceError>,
    ) -> Result<(), ServiceError> {
        result?;
        self.current_page.retain(|record| record.id() != Some(request.id));
        self.refilter();
        if self.selected.as_ref().and_then(Entity::id) == Some(request.id) {
            self.close_detail();
        }
        info!(kind = E::KIND, id = request.id, "record deleted");
        Ok(())
    }

    pub async fn load<S>(&mut self, service: &S, page: usize, size: usize) -> Result<(), ServiceError>
    where
        S: EntityService<E> + ?Sized,
    {
        let request = self.begin_load(page, size);
        let result = service.list(request.page, request.size).await;
        self.apply_load(request, result)
    }

    pub async fn select<S>(&mut self, service: &S, entity: &E) -> Result<(), ServiceError>
    where
        S: EntityService<E> + ?Sized,
    {
        let request = self.begin_select(entity)?;
        let result = service.related(request.id).await;
        self.apply_related(request, result)
    }

    pub async fn save<S>(
        &mut self,
        service: &S,
        patch: E::Patch,
        confirmed: bool,
    ) -> Result<(), ServiceError>
    where
        S: EntityService<E> + ?Sized,
    {
        let request = self.begin_save(patch, confirmed)?;
        let result = service.update(request.id, &request.patch).await;
        self.apply_save(request, result)
    }

    pub async fn delete<S>(&mut self, service: &S, entity: &E) -> Result<(), ServiceError>
    where
        S: EntityService<E> + ?Sized,
    {
        let request = self.begin_delete(entity)?;
        let result = service.delete(request.id).await;
        self.apply_delete(request, result)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Actor, ActorPatch, Film, FilmPatch, FilmYear};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory backend paging over a fixed record set.
    pub(crate) struct FakeService<E: Entity> {
        pub(crate) records: Vec<E>,
        pub(crate) related: Vec<E::Related>,
        pub(crate) fail_writes: bool,
        pub(crate) updates: Mutex<Vec<i64>>,
    }

    impl<E: Entity> FakeService<E> {
        pub(crate) fn new(records: Vec<E>) -> Self {
            Self {
                records,
                related: Vec::new(),
                fail_writes: false,
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl<E: Entity> EntityService<E> for FakeService<E> {
        async fn list(&self, page: usize, size: usize) -> Result<Page<E>, ServiceError> {
            let total_pages = self.records.len().div_ceil(size);
            let content = self
                .records
                .chunks(size)
                .nth(page)
                .map(<[E]>::to_vec)
                .unwrap_or_default();
            Ok(Page {
                content,
                total_pages,
            })
        }

        async fn related(&self, _id: i64) -> Result<Vec<E::Related>, ServiceError> {
            Ok(self.related.clone())
        }

        async fn update(&self, id: i64, _patch: &E::Patch) -> Result<(), ServiceError> {
            if self.fail_writes {
                return Err(ServiceError::Server {
                    status: 500,
                    body: "boom".into(),
                });
            }
            self.updates.lock().unwrap().push(id);
            Ok(())
        }

        async fn delete(&self, _id: i64) -> Result<(), ServiceError> {
            if self.fail_writes {
                return Err(ServiceError::Server {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(())
        }
    }

    fn actor(id: i64, name: &str) -> Actor {
        Actor {
            id: Some(id),
            name: name.into(),
            ..Actor::default()
        }
    }

    fn actors(count: i64) -> Vec<Actor> {
        (1..=count).map(|id| actor(id, &format!("Actor {id}"))).collect()
    }

    async fn loaded(service: &FakeService<Actor>) -> ListController<Actor> {
        let mut controller = ListController::new(10);
        controller.load(service, 0, 10).await.unwrap();
        controller
    }

    #[tokio::test]
    async fn twenty_five_actors_span_three_pages() {
        let service = FakeService::new(actors(25));
        let mut controller = loaded(&service).await;
        assert_eq!(controller.total_pages(), 3);
        assert_eq!(controller.current_page().len(), 10);

        controller.load(&service, 2, 10).await.unwrap();
        assert_eq!(controller.current_page().len(), 5);
        assert_eq!(controller.page_index(), 2);
        assert_eq!(controller.total_pages(), 3);
        assert!(controller.next_page().is_none());
    }

    #[tokio::test]
    async fn every_page_in_range_is_non_empty_and_bounded() {
        let service = FakeService::new(actors(25));
        let mut controller = loaded(&service).await;
        for page in 0..controller.total_pages() {
            controller.load(&service, page, 10).await.unwrap();
            assert!(!controller.current_page().is_empty());
            assert!(controller.current_page().len() <= 10);
        }
    }

    #[tokio::test]
    async fn page_transitions_only_fire_on_change() {
        let service = FakeService::new(actors(25));
        let mut controller = loaded(&service).await;

        assert!(controller.previous_page().is_none());
        assert!(controller.set_page(0).is_none());
        assert!(controller.set_page(3).is_none());
        assert!(controller.set_page_size(10).is_none());
        assert!(controller.set_page_size(0).is_none());

        let next = controller.next_page().unwrap();
        assert_eq!((next.page, next.size), (1, 10));
        let resized = controller.set_page_size(20).unwrap();
        assert_eq!((resized.page, resized.size), (0, 20));
    }

    #[tokio::test]
    async fn search_filters_the_loaded_page_case_insensitively() {
        let service = FakeService::new(vec![actor(1, "Tom Hanks"), actor(2, "Tom Hardy")]);
        let mut controller = loaded(&service).await;

        controller.search("hardy");
        let names: Vec<&str> = controller.visible().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Tom Hardy"]);
        assert_eq!(controller.current_page().len(), 2);

        controller.search("TOM");
        assert!(controller
            .visible()
            .iter()
            .all(|a| a.name.to_lowercase().contains("tom")
                && controller.current_page().contains(a)));

        controller.search("");
        assert_eq!(controller.visible(), controller.current_page());
    }

    #[tokio::test]
    async fn filter_survives_a_page_change() {
        let service = FakeService::new(actors(25));
        let mut controller = loaded(&service).await;
        controller.search("actor 2");
        controller.load(&service, 2, 10).await.unwrap();
        let names: Vec<&str> = controller.visible().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Actor 21", "Actor 22", "Actor 23", "Actor 24", "Actor 25"]);
    }

    #[tokio::test]
    async fn selecting_a_record_without_id_is_refused() {
        let service = FakeService::new(actors(3));
        let mut controller = loaded(&service).await;
        let anonymous = Actor {
            name: "Nobody".into(),
            ..Actor::default()
        };

        let err = controller.select(&service, &anonymous).await.unwrap_err();
        assert_eq!(err.kind(), "precondition");
        assert!(controller.selected().is_none());
        assert!(!controller.detail_open());
    }

    #[tokio::test]
    async fn selection_fetches_relationship_rows() {
        let mut service = FakeService::new(actors(3));
        service.related = vec![FilmYear {
            title: "Big".into(),
            year: Some(1988),
        }];
        let mut controller = loaded(&service).await;
        let first = controller.current_page()[0].clone();

        controller.select(&service, &first).await.unwrap();
        let selected = controller.selected().unwrap();
        assert_eq!(selected.id, Some(1));
        assert_eq!(selected.films.as_ref().map(Vec::len), Some(1));
        assert!(controller.detail_open());
        assert!(controller.current_page()[0].films.is_none());
    }

    #[tokio::test]
    async fn edit_modal_needs_both_request_and_selection() {
        let service = FakeService::new(actors(3));
        let mut controller = loaded(&service).await;
        controller.request_edit();
        assert!(!controller.is_edit_modal_open());

        let first = controller.current_page()[0].clone();
        controller.select(&service, &first).await.unwrap();
        assert!(controller.is_edit_modal_open());

        controller.close_edit();
        assert!(!controller.is_edit_modal_open());
        assert_eq!(controller.current_page().len(), 3);
    }

    #[tokio::test]
    async fn confirmed_save_merges_only_patched_fields() {
        let service = FakeService::new(vec![
            Actor {
                birth_place: Some("London".into()),
                ..actor(2, "Tom Hardy")
            },
            actor(3, "Emily Blunt"),
        ]);
        let mut controller = loaded(&service).await;
        let target = controller.current_page()[0].clone();
        controller.select(&service, &target).await.unwrap();
        controller.request_edit();

        let patch = ActorPatch {
            imdb_id: Some("nm0362766".into()),
            ..ActorPatch::default()
        };
        controller.save(&service, patch, true).await.unwrap();

        let saved = &controller.current_page()[0];
        assert_eq!(saved.imdb_id.as_deref(), Some("nm0362766"));
        assert_eq!(saved.name, "Tom Hardy");
        assert_eq!(saved.birth_place.as_deref(), Some("London"));
        assert_eq!(controller.current_page()[1], actor(3, "Emily Blunt"));
        assert_eq!(controller.visible(), controller.current_page());
        assert!(controller.selected().is_none());
        assert!(!controller.is_edit_modal_open());
        assert_eq!(*service.updates.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn unconfirmed_save_is_a_no_op() {
        let service = FakeService::new(actors(2));
        let mut controller = loaded(&service).await;
        let target = controller.current_page()[0].clone();
        controller.select(&service, &target).await.unwrap();
        let before = controller.current_page().to_vec();

        let patch = ActorPatch {
            name: Some("Renamed".into()),
            ..ActorPatch::default()
        };
        assert!(controller.save(&service, patch, false).await.is_err());
        assert_eq!(controller.current_page(), before.as_slice());
        assert!(controller.selected().is_some());
        assert!(service.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_without_selection_is_refused() {
        let service = FakeService::new(actors(2));
        let mut controller = loaded(&service).await;
        let err = controller
            .save(&service, ActorPatch::default(), true)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "precondition");
    }

    #[tokio::test]
    async fn failed_update_leaves_state_alone() {
        let mut service = FakeService::new(actors(2));
        service.fail_writes = true;
        let mut controller = loaded(&service).await;
        let target = controller.current_page()[0].clone();
        controller.select(&service, &target).await.unwrap();
        controller.request_edit();

        let patch = ActorPatch {
            name: Some("Renamed".into()),
            ..ActorPatch::default()
        };
        let err = controller.save(&service, patch, true).await.unwrap_err();
        assert_eq!(err.kind(), "server");
        assert_eq!(controller.current_page()[0].name, "Actor 1");
        assert!(controller.is_edit_modal_open());
    }

    #[tokio::test]
    async fn late_save_response_keeps_a_newer_selection() {
        let service = FakeService::new(actors(3));
        let mut controller = loaded(&service).await;
        let first = controller.current_page()[0].clone();
        let second = controller.current_page()[1].clone();

        controller.select(&service, &first).await.unwrap();
        controller.request_edit();
        let request = controller
            .begin_save(
                ActorPatch {
                    name: Some("Renamed".into()),
                    ..ActorPatch::default()
                },
                true,
            )
            .unwrap();
        controller.close_edit();
        controller.select(&service, &second).await.unwrap();

        controller.apply_save(request, Ok(())).unwrap();
        assert_eq!(controller.current_page()[0].name, "Renamed");
        assert_eq!(controller.selected().and_then(|a| a.id), Some(2));
        assert!(controller.detail_open());
    }

    #[tokio::test]
    async fn failed_relationship_fetch_is_flagged_until_the_next_selection() {
        let service = FakeService::new(actors(2));
        let mut controller = loaded(&service).await;
        let first = controller.current_page()[0].clone();

        let request = controller.begin_select(&first).unwrap();
        let err = controller
            .apply_related(
                request,
                Err(ServiceError::Shape("expected an array".into())),
            )
            .unwrap_err();
        assert_eq!(err.kind(), "shape");
        assert!(controller.related_failed());
        assert!(controller.selected().unwrap().films.is_none());

        controller.select(&service, &first).await.unwrap();
        assert!(!controller.related_failed());
    }

    #[tokio::test]
    async fn film_rating_edit_keeps_the_name() {
        let service = FakeService::new(vec![Film {
            id: Some(7),
            name: "X".into(),
            rating: Some("7.0".into()),
            ..Film::default()
        }]);
        let mut controller: ListController<Film> = ListController::new(10);
        controller.load(&service, 0, 10).await.unwrap();
        let film = controller.current_page()[0].clone();
        controller.select(&service, &film).await.unwrap();

        let patch = FilmPatch {
            rating: Some("8.5".into()),
            ..FilmPatch::default()
        };
        controller.save(&service, patch, true).await.unwrap();
        let film = &controller.current_page()[0];
        assert_eq!(film.rating.as_deref(), Some("8.5"));
        assert_eq!(film.name, "X");
    }

    #[tokio::test]
    async fn stale_page_responses_are_discarded() {
        let service = FakeService::new(actors(25));
        let mut controller = loaded(&service).await;

        let slow = controller.set_page(1).unwrap();
        let fast = controller.set_page(2).unwrap();
        let fast_page = service.list(fast.page, fast.size).await;
        controller.apply_load(fast, fast_page).unwrap();
        let slow_page = service.list(slow.page, slow.size).await;
        controller.apply_load(slow, slow_page).unwrap();

        assert_eq!(controller.page_index(), 2);
        assert_eq!(controller.current_page().len(), 5);
    }

    #[tokio::test]
    async fn stale_relationship_responses_are_discarded() {
        let service = FakeService::new(actors(3));
        let mut controller = loaded(&service).await;
        let first = controller.current_page()[0].clone();
        let second = controller.current_page()[1].clone();

        let old = controller.begin_select(&first).unwrap();
        let new = controller.begin_select(&second).unwrap();
        let rows = vec![FilmYear {
            title: "Wrong".into(),
            year: None,
        }];
        controller.apply_related(old, Ok(rows)).unwrap();
        assert!(controller.selected().unwrap().films.is_none());

        controller.apply_related(new, Ok(Vec::new())).unwrap();
        assert_eq!(controller.selected().unwrap().id, Some(2));
        assert_eq!(controller.selected().unwrap().films, Some(Vec::new()));
    }

    #[tokio::test]
    async fn failed_load_keeps_the_previous_page() {
        let service = FakeService::new(actors(12));
        let mut controller = loaded(&service).await;
        let request = controller.next_page().unwrap();
        let err = controller
            .apply_load(
                request,
                Err(ServiceError::Shape("expected an object".into())),
            )
            .unwrap_err();
        assert_eq!(err.kind(), "shape");
        assert_eq!(controller.page_index(), 0);
        assert_eq!(controller.current_page().len(), 10);
    }

    #[tokio::test]
    async fn delete_removes_the_record_and_its_selection() {
        let service = FakeService::new(actors(3));
        let mut controller = loaded(&service).await;
        let target = controller.current_page()[1].clone();
        controller.select(&service, &target).await.unwrap();

        controller.delete(&service, &target).await.unwrap();
        assert_eq!(controller.current_page().len(), 2);
        assert!(controller.visible().iter().all(|a| a.id != Some(2)));
        assert!(controller.selected().is_none());
    }

    #[tokio::test]
    async fn cursor_stays_inside_the_visible_rows() {
        let service = FakeService::new(vec![actor(1, "Tom Hanks"), actor(2, "Tom Hardy")]);
        let mut controller = loaded(&service).await;
        controller.cursor_down();
        controller.cursor_down();
        assert_eq!(controller.cursor(), 1);

        controller.search("hanks");
        assert_eq!(controller.cursor(), 0);
        assert_eq!(controller.highlighted().map(|a| a.name.as_str()), Some("Tom Hanks"));
    }
}
