//! Screen state that sits between the HTTP services and the terminal UI. None
//! of it touches the terminal, so every transition is unit tested directly.

mod genres;
mod list;
mod search;

pub use genres::{GenreFilms, GenreManager};
pub use list::{DeleteRequest, ListController, LoadRequest, RelatedRequest, SaveRequest};
pub use search::{AdvancedSearch, ResultsModal, SearchPanel};

#[cfg(test)]
pub(crate) use list::tests::FakeService;
