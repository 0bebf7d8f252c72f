use std::fmt;

use serde::{Deserialize, Serialize};

use super::film::FilmYear;
use super::wire::{lenient_name, lenient_text};
use super::{patch_field, patch_optional, Entity, Patch};

/// An actor as returned by `GET /acteurs`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Actor {
    /// Missing on some legacy rows; selecting such a record is refused.
    #[serde(rename = "acteurId", alias = "id", default)]
    pub id: Option<i64>,
    #[serde(rename = "nom", default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(rename = "dateNaissance", default, deserialize_with = "lenient_text")]
    pub birth_date: Option<String>,
    #[serde(rename = "lieuNaissance", default, deserialize_with = "lenient_text")]
    pub birth_place: Option<String>,
    #[serde(rename = "idIMDB", default, deserialize_with = "lenient_text")]
    pub imdb_id: Option<String>,
    #[serde(rename = "urlProfile", default, deserialize_with = "lenient_text")]
    pub profile_url: Option<String>,
    /// Films for this actor, fetched when the actor is selected.
    #[serde(skip)]
    pub films: Option<Vec<FilmYear>>,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Entity for Actor {
    type Patch = ActorPatch;
    type Related = FilmYear;

    const KIND: &'static str = "actor";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn profile_url(&self) -> Option<&str> {
        self.profile_url.as_deref()
    }

    fn related(&self) -> Option<&[FilmYear]> {
        self.films.as_deref()
    }

    fn set_related(&mut self, related: Option<Vec<FilmYear>>) {
        self.films = related;
    }
}

/// Fields the actor edit form may send back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActorPatch {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "dateNaissance", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "lieuNaissance", skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(rename = "idIMDB", skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(rename = "urlProfile", skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl Patch<Actor> for ActorPatch {
    fn apply_to(&self, target: &mut Actor) {
        patch_field(&mut target.name, &self.name);
        patch_optional(&mut target.birth_date, &self.birth_date);
        patch_optional(&mut target.birth_place, &self.birth_place);
        patch_optional(&mut target.imdb_id, &self.imdb_id);
        patch_optional(&mut target.profile_url, &self.profile_url);
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.birth_date.is_none()
            && self.birth_place.is_none()
            && self.imdb_id.is_none()
            && self.profile_url.is_none()
    }
}
