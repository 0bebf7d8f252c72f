use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::{cell_text, cell_year, expect_cells, lenient_name, lenient_text};
use super::{patch_field, patch_optional, Entity, Patch};

/// A director as returned by `GET /realisateurs`. The backend has used three
/// different names for the key over time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Director {
    #[serde(
        rename = "idRealisateur",
        alias = "realisateurId",
        alias = "id",
        default
    )]
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
    #[serde(skip)]
    pub films: Option<Vec<DirectorFilm>>,
}

impl fmt::Display for Director {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Entity for Director {
    type Patch = DirectorPatch;
    type Related = DirectorFilm;

    const KIND: &'static str = "director";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn profile_url(&self) -> Option<&str> {
        self.profile_url.as_deref()
    }

    fn related(&self) -> Option<&[DirectorFilm]> {
        self.films.as_deref()
    }

    fn set_related(&mut self, related: Option<Vec<DirectorFilm>>) {
        self.films = related;
    }
}

/// `[title, year, language, country, rating]` row from
/// `GET /realisateurs/{id}/films`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct DirectorFilm {
    pub title: String,
    pub year: Option<i32>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub rating: Option<String>,
}

impl TryFrom<Vec<Value>> for DirectorFilm {
    type Error = String;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        expect_cells(&row, 1, "director film")?;
        Ok(Self {
            title: cell_text(&row[0]).unwrap_or_default(),
            year: row.get(1).and_then(cell_year),
            language: row.get(2).and_then(cell_text),
            country: row.get(3).and_then(cell_text),
            rating: row.get(4).and_then(cell_text),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectorPatch {
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

impl Patch<Director> for DirectorPatch {
    fn apply_to(&self, target: &mut Director) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn director_accepts_every_identifier_spelling() {
        for key in ["idRealisateur", "realisateurId", "id"] {
            let json = format!(r#"{{"{key}": 4, "nom": "Agnès Varda"}}"#);
            let director: Director = serde_json::from_str(&json).unwrap();
            assert_eq!(director.id, Some(4), "key {key}");
        }
    }

    #[test]
    fn director_film_rows_keep_optional_columns() {
        let rows: Vec<DirectorFilm> = serde_json::from_str(
            r#"[["Cléo de 5 à 7", 1962, "French", "France", "7.8"], ["Untitled"]]"#,
        )
        .unwrap();
        assert_eq!(rows[0].year, Some(1962));
        assert_eq!(rows[0].country.as_deref(), Some("France"));
        assert_eq!(rows[0].rating.as_deref(), Some("7.8"));
        assert_eq!(rows[1].year, None);
        assert_eq!(rows[1].language, None);
    }
}
