use std::future::Future;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::api::SearchQuery;
use crate::controller::{DeleteRequest, LoadRequest, RelatedRequest, SaveRequest};
use crate::error::ServiceError;
use crate::models::{Actor, Director, Entity, Film, FilmYear, Genre, Page};

/// Result of a background request made on behalf of a list screen.
pub(crate) enum ListEvent<E: Entity> {
    Loaded(LoadRequest, Result<Page<E>, ServiceError>),
    Related(RelatedRequest, Result<Vec<E::Related>, ServiceError>),
    Saved(SaveRequest<E::Patch>, Result<(), ServiceError>),
    Deleted(DeleteRequest, Result<(), ServiceError>),
}

pub(crate) enum GenreEvent {
    Listed(Result<Vec<Genre>, ServiceError>),
    /// Carries the name that was sent along with the echoed record.
    Created(String, Result<Genre, ServiceError>),
    Renamed(i64, String, Result<Genre, ServiceError>),
    Deleted(i64, Result<(), ServiceError>),
    Films(String, Result<Vec<FilmYear>, ServiceError>),
}

/// Everything background tasks report back to the event loop.
pub(crate) enum AppEvent {
    Actors(ListEvent<Actor>),
    Films(ListEvent<Film>),
    Directors(ListEvent<Director>),
    Genres(GenreEvent),
    Searched(SearchQuery, Result<Vec<String>, ServiceError>),
}

/// Runs requests on the tokio runtime and funnels their results into the
/// channel the event loop drains between frames.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    handle: Handle,
    tx: UnboundedSender<AppEvent>,
}

impl Dispatcher {
    pub(crate) fn new(handle: Handle) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { handle, tx }, rx)
    }

    pub(crate) fn spawn<F>(&self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            if tx.send(task.await).is_err() {
                debug!("event loop closed, dropping task result");
            }
        });
    }
}
