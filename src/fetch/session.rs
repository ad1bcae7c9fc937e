use std::sync::Arc;

use super::{QueryCache, Records};
use crate::apod::{ApodRecord, FetchError};
use crate::core::types::ApodBackend;
use crate::query::QueryParameters;
use crate::search::{SearchFormState, ValidationError};

/// A submitted search, stamped with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub params: QueryParameters,
}

/// A finished request waiting to be applied to the session.
#[derive(Debug)]
pub struct Completed {
    pub ticket: Ticket,
    pub result: Result<Records, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results replaced the gallery; carries the number of records.
    Loaded(usize),
    /// A newer search was submitted meanwhile; the response was dropped.
    Superseded,
}

/// Runs requests for tickets without borrowing the session, so a search can
/// be in flight while the user keeps editing the form.
#[derive(Clone)]
pub struct Fetcher {
    backend: Arc<dyn ApodBackend>,
    cache: Arc<QueryCache>,
}

impl Fetcher {
    pub async fn fetch(&self, ticket: Ticket) -> Completed {
        let result = self
            .cache
            .get_or_fetch(&ticket.params, self.backend.as_ref())
            .await;
        Completed { ticket, result }
    }
}

/// The search page: form, current results, and the open detail view.
pub struct SearchSession {
    fetcher: Fetcher,
    pub form: SearchFormState,
    results: Records,
    selected: Option<usize>,
    generation: u64,
    pending: Option<Ticket>,
    last_params: Option<QueryParameters>,
}

impl SearchSession {
    pub fn new(backend: Arc<dyn ApodBackend>) -> Self {
        Self {
            fetcher: Fetcher {
                backend,
                cache: Arc::new(QueryCache::new()),
            },
            form: SearchFormState::new(),
            results: Arc::new(Vec::new()),
            selected: None,
            generation: 0,
            pending: None,
            last_params: None,
        }
    }

    pub fn fetcher(&self) -> Fetcher {
        self.fetcher.clone()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.fetcher.cache
    }

    /// Starts a search for `params`. Any earlier ticket still in flight is
    /// superseded by the returned one.
    pub fn begin(&mut self, params: QueryParameters) -> Ticket {
        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            params,
        };
        log::debug!(
            "Search #{} started for {}",
            ticket.generation,
            ticket.params
        );
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Submits the form. Validation failures stay on the form and no ticket is
    /// issued.
    pub fn submit_form(&mut self) -> Result<Ticket, ValidationError> {
        let params = self.form.submit()?;
        Ok(self.begin(params))
    }

    /// Applies a finished request. Responses for superseded tickets never touch
    /// the session.
    pub fn apply(&mut self, completed: Completed) -> Result<SearchOutcome, FetchError> {
        let Completed { ticket, result } = completed;
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping response for search #{} ({}), current is #{}",
                ticket.generation,
                ticket.params,
                self.generation
            );
            return Ok(SearchOutcome::Superseded);
        }

        self.pending = None;
        self.selected = None;
        self.last_params = Some(ticket.params);
        match result {
            Ok(records) => {
                let count = records.len();
                self.results = records;
                Ok(SearchOutcome::Loaded(count))
            }
            Err(e) => {
                self.results = Arc::new(Vec::new());
                Err(e)
            }
        }
    }

    /// Begin, fetch and apply in one step.
    pub async fn search(&mut self, params: QueryParameters) -> Result<SearchOutcome, FetchError> {
        let ticket = self.begin(params);
        let completed = self.fetcher.fetch(ticket).await;
        self.apply(completed)
    }

    /// Loads today's picture, the page's initial query.
    pub async fn load_today(&mut self) -> Result<SearchOutcome, FetchError> {
        self.search(QueryParameters::default()).await
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_params(&self) -> Option<&QueryParameters> {
        self.last_params.as_ref()
    }

    pub fn results(&self) -> &[ApodRecord] {
        &self.results
    }

    /// Opens the detail view for the record at `index`.
    pub fn select(&mut self, index: usize) -> Option<&ApodRecord> {
        if index < self.results.len() {
            self.selected = Some(index);
            self.results.get(index)
        } else {
            None
        }
    }

    pub fn selected(&self) -> Option<&ApodRecord> {
        self.selected.and_then(|i| self.results.get(i))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}
