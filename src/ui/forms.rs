use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Actor, ActorPatch, Director, DirectorPatch, Entity, Film, FilmPatch};

/// One labelled text input, remembering the value it was seeded with so only
/// edited fields end up in the patch.
#[derive(Clone)]
pub(crate) struct FormField {
    pub(crate) label: &'static str,
    pub(crate) value: String,
    original: String,
}

/// Modal form state shared by the entity editors and the genre dialogs. The
/// first field is always the record's name and is required.
#[derive(Default, Clone)]
pub(crate) struct EditForm {
    pub(crate) fields: Vec<FormField>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl EditForm {
    pub(crate) fn new(fields: Vec<(&'static str, String)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(label, value)| FormField {
                    label,
                    original: value.clone(),
                    value,
                })
                .collect(),
            active: 0,
            error: None,
        }
    }

    /// A single empty name input, as used by the genre dialogs.
    pub(crate) fn name_only(value: &str) -> Self {
        Self::new(vec![("Name", value.to_string())])
    }

    /// Move focus to the next field, wrapping around.
    pub(crate) fn toggle_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = self
                .active
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.fields.get_mut(self.active) {
            Some(field) => {
                field.value.push(ch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    /// Trimmed current value of a field.
    pub(crate) fn value(&self, idx: usize) -> &str {
        self.fields
            .get(idx)
            .map(|field| field.value.trim())
            .unwrap_or_default()
    }

    /// Trimmed value of a field the user actually changed.
    pub(crate) fn changed(&self, idx: usize) -> Option<String> {
        let field = self.fields.get(idx)?;
        let value = field.value.trim();
        (value != field.original.trim()).then(|| value.to_string())
    }

    /// Whether any field differs from the value it was seeded with.
    pub(crate) fn is_dirty(&self) -> bool {
        (0..self.fields.len()).any(|idx| self.changed(idx).is_some())
    }

    /// Value to send for a field. Updates replace the whole record on the
    /// server, so untouched non-empty values are resent; an edited field is
    /// sent even when cleared.
    pub(crate) fn submitted(&self, idx: usize) -> Option<String> {
        self.changed(idx).or_else(|| {
            let value = self.value(idx);
            (!value.is_empty()).then(|| value.to_string())
        })
    }

    /// The name field, refusing blanks.
    pub(crate) fn required_name(&self) -> Result<String> {
        let name = self.value(0);
        if name.is_empty() {
            return Err(anyhow!("Name is required."));
        }
        Ok(name.to_string())
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, idx: usize) -> Line<'static> {
        let Some(field) = self.fields.get(idx) else {
            return Line::from("");
        };
        let is_active = idx == self.active;

        let display = if field.value.is_empty() {
            let placeholder = if idx == 0 { "<required>" } else { "<optional>" };
            placeholder.to_string()
        } else {
            field.value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if field.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label)),
            Span::styled(display, style),
        ])
    }

    /// Column of the text cursor within the active line.
    pub(crate) fn cursor_offset(&self) -> usize {
        self.fields
            .get(self.active)
            .map(|field| field.label.chars().count() + 2 + field.value.chars().count())
            .unwrap_or_default()
    }
}

/// Entities that can be edited through an [`EditForm`].
pub(crate) trait Editable: Entity {
    fn edit_form(&self) -> EditForm;

    /// Build the update body from the form. The name is always included and
    /// validated.
    fn parse_patch(form: &EditForm) -> Result<Self::Patch>;
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Editable for Actor {
    fn edit_form(&self) -> EditForm {
        EditForm::new(vec![
            ("Name", self.name.clone()),
            ("Birth date", text(&self.birth_date)),
            ("Birth place", text(&self.birth_place)),
            ("IMDb id", text(&self.imdb_id)),
            ("Profile URL", text(&self.profile_url)),
        ])
    }

    fn parse_patch(form: &EditForm) -> Result<ActorPatch> {
        Ok(ActorPatch {
            name: Some(form.required_name()?),
            birth_date: form.submitted(1),
            birth_place: form.submitted(2),
            imdb_id: form.submitted(3),
            profile_url: form.submitted(4),
        })
    }
}

impl Editable for Director {
    fn edit_form(&self) -> EditForm {
        EditForm::new(vec![
            ("Name", self.name.clone()),
            ("Birth date", text(&self.birth_date)),
            ("Birth place", text(&self.birth_place)),
            ("IMDb id", text(&self.imdb_id)),
            ("Profile URL", text(&self.profile_url)),
        ])
    }

    fn parse_patch(form: &EditForm) -> Result<DirectorPatch> {
        Ok(DirectorPatch {
            name: Some(form.required_name()?),
            birth_date: form.submitted(1),
            birth_place: form.submitted(2),
            imdb_id: form.submitted(3),
            profile_url: form.submitted(4),
        })
    }
}

impl Editable for Film {
    fn edit_form(&self) -> EditForm {
        EditForm::new(vec![
            ("Name", self.name.clone()),
            (
                "Release year",
                self.release_year.map(|y| y.to_string()).unwrap_or_default(),
            ),
            ("Shooting location", text(&self.shooting_location)),
            ("IMDb id", text(&self.imdb_id)),
            ("Rating", text(&self.rating)),
            ("Profile URL", text(&self.profile_url)),
            ("Language", text(&self.language)),
            ("Summary", text(&self.summary)),
            ("Country", text(&self.country)),
            ("Genres", self.genres.join(", ")),
        ])
    }

    fn parse_patch(form: &EditForm) -> Result<FilmPatch> {
        let release_year = match form.submitted(1) {
            Some(raw) if !raw.is_empty() => Some(
                raw.parse::<i32>()
                    .map_err(|_| anyhow!("Release year must be an integer."))?,
            ),
            _ => None,
        };
        let genres = form.submitted(9).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_string)
                .collect()
        });
        Ok(FilmPatch {
            name: Some(form.required_name()?),
            release_year,
            shooting_location: form.submitted(2),
            imdb_id: form.submitted(3),
            rating: form.submitted(4),
            profile_url: form.submitted(5),
            language: form.submitted(6),
            summary: form.submitted(7),
            country: form.submitted(8),
            genres,
        })
    }
}

/// Record awaiting a yes/no before it is deleted.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: i64,
    pub(crate) label: String,
}
