//! Domain models mirroring the backend's JSON payloads. The structs stay plain
//! data holders; the list controller only reaches into them through the
//! [`Entity`] and [`Patch`] traits so one controller serves every entity kind.

mod actor;
mod director;
mod film;
mod genre;
mod wire;

pub use actor::{Actor, ActorPatch};
pub use director::{Director, DirectorFilm, DirectorPatch};
pub use film::{Film, FilmPatch, FilmYear, Role};
pub use genre::Genre;

use serde::{Deserialize, Serialize};

/// One server-side page of records.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: usize,
}

/// A record that can be listed, selected and edited through the generic list
/// controller.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Partial update payload sent with `PUT`.
    type Patch: Patch<Self>;
    /// Row type of the lazily fetched relationship collection.
    type Related: Clone + Send + Sync + 'static;

    /// Human readable kind, used in log lines and status messages.
    const KIND: &'static str;

    /// Backend identifier. Records may arrive without one.
    fn id(&self) -> Option<i64>;

    /// Field matched by the substring filter.
    fn name(&self) -> &str;

    fn profile_url(&self) -> Option<&str> {
        None
    }

    /// Relationship collection, present only while the record is selected.
    fn related(&self) -> Option<&[Self::Related]>;

    fn set_related(&mut self, related: Option<Vec<Self::Related>>);
}

/// Partial edit of an entity. Only fields present in the patch are written;
/// everything else on the target is left untouched.
pub trait Patch<E>: Clone + Send + Sync + Serialize + 'static {
    fn apply_to(&self, target: &mut E);

    /// True when the patch carries no field at all.
    fn is_empty(&self) -> bool;
}

/// Copy `value` into `slot` when the patch carries it.
pub(crate) fn patch_field<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

/// Same as [`patch_field`] for optional target fields.
pub(crate) fn patch_optional<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_decodes_content_and_total_pages() {
        let json = r#"{"content":[{"genreId":1,"type":"Drama"}],"totalPages":3,"number":0}"#;
        let page: Page<Genre> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Drama");
    }

    #[test]
    fn null_name_in_one_row_keeps_the_rest_of_the_page() {
        let json = r#"{"content":[{"acteurId":1,"nom":"Tom Hanks"},{"acteurId":2,"nom":null}],"totalPages":1}"#;
        let page: Page<Actor> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].name, "Tom Hanks");
        assert_eq!(page.content[1].id, Some(2));
        assert_eq!(page.content[1].name, "");
    }

    #[test]
    fn page_without_content_is_empty() {
        let page: Page<Genre> = serde_json::from_str(r#"{"totalPages":0}"#).unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
