use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::{cell_text, cell_year, expect_cells, genre_names, lenient_name, lenient_text};
use super::{patch_field, patch_optional, Entity, Patch};

/// A film as returned by `GET /films`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Film {
    #[serde(rename = "filmId", alias = "id", default)]
    pub id: Option<i64>,
    #[serde(rename = "nom", default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(rename = "anneeSortie", default)]
    pub release_year: Option<i32>,
    #[serde(rename = "lieuTournage", default, deserialize_with = "lenient_text")]
    pub shooting_location: Option<String>,
    #[serde(rename = "idIMDB", default, deserialize_with = "lenient_text")]
    pub imdb_id: Option<String>,
    /// Kept textual: the backend stores ratings such as `"8.5"` as strings.
    #[serde(default, deserialize_with = "lenient_text")]
    pub rating: Option<String>,
    #[serde(rename = "urlProfile", default, deserialize_with = "lenient_text")]
    pub profile_url: Option<String>,
    #[serde(rename = "langue", default, deserialize_with = "lenient_text")]
    pub language: Option<String>,
    #[serde(rename = "resume", default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(rename = "pays", default, deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "genre_names")]
    pub genres: Vec<String>,
    /// Cast of the film, fetched when the film is selected.
    #[serde(skip)]
    pub roles: Option<Vec<Role>>,
}

impl fmt::Display for Film {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.release_year {
            Some(year) => write!(f, "{} ({year})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Entity for Film {
    type Patch = FilmPatch;
    type Related = Role;

    const KIND: &'static str = "film";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn profile_url(&self) -> Option<&str> {
        self.profile_url.as_deref()
    }

    fn related(&self) -> Option<&[Role]> {
        self.roles.as_deref()
    }

    fn set_related(&mut self, related: Option<Vec<Role>>) {
        self.roles = related;
    }
}

/// `[actorName, characterName]` row from `GET /films/{id}/actors-and-characters`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct Role {
    pub actor_name: String,
    pub character_name: String,
}

impl TryFrom<Vec<Value>> for Role {
    type Error = String;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        expect_cells(&row, 2, "role")?;
        Ok(Self {
            actor_name: cell_text(&row[0]).unwrap_or_default(),
            character_name: cell_text(&row[1]).unwrap_or_default(),
        })
    }
}

/// `[title, year]` row shared by the actor filmography, the genre drill-down
/// and most advanced-search queries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct FilmYear {
    pub title: String,
    pub year: Option<i32>,
}

impl TryFrom<Vec<Value>> for FilmYear {
    type Error = String;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        expect_cells(&row, 1, "film")?;
        Ok(Self {
            title: cell_text(&row[0]).unwrap_or_default(),
            year: row.get(1).and_then(cell_year),
        })
    }
}

impl fmt::Display for FilmYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({year})", self.title),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Fields the film edit form may send back. `genres` goes over the wire as a
/// plain list of names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilmPatch {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "anneeSortie", skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(rename = "lieuTournage", skip_serializing_if = "Option::is_none")]
    pub shooting_location: Option<String>,
    #[serde(rename = "idIMDB", skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "urlProfile", skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(rename = "langue", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "resume", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "pays", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl Patch<Film> for FilmPatch {
    fn apply_to(&self, target: &mut Film) {
        patch_field(&mut target.name, &self.name);
        patch_optional(&mut target.release_year, &self.release_year);
        patch_optional(&mut target.shooting_location, &self.shooting_location);
        patch_optional(&mut target.imdb_id, &self.imdb_id);
        patch_optional(&mut target.rating, &self.rating);
        patch_optional(&mut target.profile_url, &self.profile_url);
        patch_optional(&mut target.language, &self.language);
        patch_optional(&mut target.summary, &self.summary);
        patch_optional(&mut target.country, &self.country);
        patch_field(&mut target.genres, &self.genres);
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.release_year.is_none()
            && self.shooting_location.is_none()
            && self.imdb_id.is_none()
            && self.rating.is_none()
            && self.profile_url.is_none()
            && self.language.is_none()
            && self.summary.is_none()
            && self.country.is_none()
            && self.genres.is_none()
    }
}
