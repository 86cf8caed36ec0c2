use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::query::{Change, Field, QueryState};
use crate::sources::{FetchResult, ListSource};

/// How a successful page is merged into the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// The page becomes the whole list
    Replace,
    /// Fetch `page + 1` and add it after the current items
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
}

/// What the caller should do after editing the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Nothing changed
    None,
    /// Search box edits; wait for an explicit search
    Deferred,
    /// Filters, sort or page changed; fetch page 1 now
    Refetch,
}

impl From<Change> for Intent {
    fn from(change: Change) -> Self {
        match change {
            Change::None => Intent::None,
            Change::Deferred => Intent::Deferred,
            Change::Live => Intent::Refetch,
        }
    }
}

/// Result of one `fetch` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response became the visible list
    Applied,
    /// A newer fetch was issued meanwhile; the response was dropped
    Stale,
    /// No request was made
    Skipped,
}

struct ListState<T> {
    query: QueryState,
    result: FetchResult<T>,
    in_flight: usize,
    generation: u64,
    last_error: Option<String>,
}

/// Owns the query and the visible result of one list view.
///
/// Fetches may overlap. Each fetch takes a new generation number and only a
/// response whose generation is still the latest is applied, so a slow answer
/// to an old query never overwrites a newer one. The lock is never held across
/// an await.
pub struct ListController<S: ListSource> {
    source: S,
    state: Mutex<ListState<S::Item>>,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S) -> Self {
        Self::with_query(source, QueryState::default())
    }

    /// Start from a query restored from a URL
    pub fn with_query(source: S, query: QueryState) -> Self {
        Self {
            source,
            state: Mutex::new(ListState {
                query,
                result: FetchResult::default(),
                in_flight: 0,
                generation: 0,
                last_error: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState<S::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn query(&self) -> QueryState {
        self.state().query.clone()
    }

    pub fn result(&self) -> FetchResult<S::Item> {
        self.state().result.clone()
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.state().result.items.clone()
    }

    pub fn total_count(&self) -> u64 {
        self.state().result.total_count
    }

    pub fn page_count(&self) -> u32 {
        self.state().result.page_count
    }

    pub fn phase(&self) -> Phase {
        if self.state().in_flight > 0 {
            Phase::Fetching
        } else {
            Phase::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Fetching
    }

    /// User-facing message of the last failed fetch, cleared by the next success
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn can_load_more(&self) -> bool {
        let state = self.state();
        state.in_flight == 0 && state.result.page_count > state.query.page()
    }

    /// Shareable query string of the current state
    pub fn query_string(&self) -> String {
        self.state().query.serialize()
    }

    /// Apply `edit` to the query and report whether it needs a fetch.
    /// Nothing is sent until the caller passes the intent to [`Self::run`],
    /// but a `Refetch` edit already turns every in-flight response stale.
    pub fn edit(&self, edit: impl FnOnce(&QueryState) -> QueryState) -> Intent {
        let mut state = self.state();
        let next = edit(&state.query);
        let intent = Intent::from(state.query.change_to(&next));
        state.query = next;
        if intent == Intent::Refetch {
            state.generation += 1;
        }
        intent
    }

    pub async fn run(&self, intent: Intent) -> Result<Outcome> {
        match intent {
            Intent::Refetch => self.fetch(FetchMode::Replace).await,
            Intent::None | Intent::Deferred => Ok(Outcome::Skipped),
        }
    }

    /// Explicit search: applies pending text edits from page 1
    pub async fn search(&self) -> Result<Outcome> {
        self.edit(|q| q.set_field(Field::Page(1)));
        self.fetch(FetchMode::Replace).await
    }

    /// Append the next page, if the server reported one
    pub async fn load_more(&self) -> Result<Outcome> {
        {
            let state = self.state();
            if state.result.page_count <= state.query.page() {
                debug!("No more {} pages after {}", self.source.source_name(), state.query.page());
                return Ok(Outcome::Skipped);
            }
        }
        self.fetch(FetchMode::Append).await
    }

    pub async fn fetch(&self, mode: FetchMode) -> Result<Outcome> {
        let (query, generation) = {
            let mut state = self.state();
            let query = match mode {
                FetchMode::Replace => state.query.clone(),
                FetchMode::Append => state.query.next_page(),
            };
            state.generation += 1;
            state.in_flight += 1;
            (query, state.generation)
        };
        debug!(
            "Fetching {} page {} ({:?}, generation {})",
            self.source.source_name(),
            query.page(),
            mode,
            generation
        );

        let response = self.source.fetch_page(&query).await;

        let mut state = self.state();
        state.in_flight -= 1;
        if generation != state.generation {
            debug!(
                "Dropping {} response for generation {}; latest is {}",
                self.source.source_name(),
                generation,
                state.generation
            );
            return Ok(Outcome::Stale);
        }

        let page = match response {
            Ok(page) => page,
            Err(e) => {
                warn!("Fetching {} failed: {}", self.source.source_name(), e);
                state.last_error = Some(e.user_message());
                return Err(e);
            }
        };

        state.last_error = None;
        state.result = match mode {
            FetchMode::Replace => page,
            FetchMode::Append => {
                let mut items = state.result.items.clone();
                items.extend(page.items);
                // Only the page moves; text edits made meanwhile are kept
                state.query = state.query.set_field(Field::Page(query.page()));
                FetchResult::new(items, page.total_count, page.page_count)
            }
        };
        info!(
            "Showing {} of {} {}",
            state.result.items.len(),
            state.result.total_count,
            self.source.source_name()
        );
        Ok(Outcome::Applied)
    }
}
