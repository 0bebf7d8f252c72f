use tracing::{info, warn};

use crate::api::{SearchKind, SearchQuery, SearchService};
use crate::error::ServiceError;

/// Caption and display rows of a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsModal {
    pub caption: String,
    pub rows: Vec<String>,
}

/// Raw text inputs of one advanced-search form.
#[derive(Debug, Clone)]
pub struct SearchPanel {
    kind: SearchKind,
    inputs: Vec<String>,
    active: usize,
}

impl SearchPanel {
    pub fn new(kind: SearchKind) -> Self {
        Self {
            kind,
            inputs: vec![String::new(); kind.fields().len()],
            active: 0,
        }
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn active_field(&self) -> usize {
        self.active
    }

    pub fn next_field(&mut self) {
        self.active = (self.active + 1) % self.inputs.len();
    }

    pub fn previous_field(&mut self) {
        self.active = self
            .active
            .checked_sub(1)
            .unwrap_or(self.inputs.len() - 1);
    }

    /// Every input is an id or a year, so only digits are accepted.
    pub fn push_char(&mut self, ch: char) -> bool {
        if !ch.is_ascii_digit() {
            return false;
        }
        self.inputs[self.active].push(ch);
        true
    }

    pub fn backspace(&mut self) {
        self.inputs[self.active].pop();
    }

    pub fn query(&self) -> Result<SearchQuery, ServiceError> {
        SearchQuery::parse(self.kind, &self.inputs)
    }
}

/// The advanced-search screen: four independent panels sharing one results
/// popup.
#[derive(Debug, Clone)]
pub struct AdvancedSearch {
    panels: Vec<SearchPanel>,
    active: usize,
    results: Option<ResultsModal>,
}

impl Default for AdvancedSearch {
    fn default() -> Self {
        Self {
            panels: SearchKind::ALL.into_iter().map(SearchPanel::new).collect(),
            active: 0,
            results: None,
        }
    }
}

impl AdvancedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panels(&self) -> &[SearchPanel] {
        &self.panels
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_panel(&self) -> &SearchPanel {
        &self.panels[self.active]
    }

    pub fn active_panel_mut(&mut self) -> &mut SearchPanel {
        &mut self.panels[self.active]
    }

    pub fn next_panel(&mut self) {
        self.active = (self.active + 1) % self.panels.len();
    }

    pub fn previous_panel(&mut self) {
        self.active = self
            .active
            .checked_sub(1)
            .unwrap_or(self.panels.len() - 1);
    }

    pub fn results(&self) -> Option<&ResultsModal> {
        self.results.as_ref()
    }

    pub fn close_results(&mut self) {
        self.results = None;
    }

    /// Parse the active panel. Its inputs are kept whatever the outcome.
    pub fn begin_submit(&self) -> Result<SearchQuery, ServiceError> {
        self.active_panel().query()
    }

    pub fn apply_results(
        &mut self,
        query: SearchQuery,
        result: Result<Vec<String>, ServiceError>,
    ) -> Result<(), ServiceError> {
        match result {
            Ok(rows) => {
                info!(query = %query, rows = rows.len(), "advanced search finished");
                self.results = Some(ResultsModal {
                    caption: query.caption(),
                    rows,
                });
                Ok(())
            }
            Err(err) => {
                warn!(query = %query, error = %err, "advanced search failed");
                Err(err)
            }
        }
    }

    pub async fn submit(&mut self, service: &dyn SearchService) -> Result<(), ServiceError> {
        let query = self.begin_submit()?;
        let result = query.execute(service).await;
        self.apply_results(query, result)
    }
}
