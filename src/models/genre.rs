use std::fmt;

use serde::{Deserialize, Serialize};

use super::wire::lenient_name;

/// A genre from `GET /genres`. The list endpoint names the label `type`, the
/// write endpoints take `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Genre {
    #[serde(rename = "genreId", alias = "id", default)]
    pub id: Option<i64>,
    #[serde(rename = "type", alias = "name", default, deserialize_with = "lenient_name")]
    pub name: String,
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
