//! Remote collection fetching with generation-tagged responses.
//!
//! Reads never fail loudly: a transport or query error is logged and the
//! collection resolves to an empty list. Callers that render the list keep a
//! [`LoadState`] so "still loading" and "loaded, nothing there" stay distinct.
//!
//! A [`Fetcher`] tracks which key (e.g. a project id) the view currently
//! shows. Every [`Fetcher::begin`] issues a new generation; a response is
//! applied only when its ticket is still current, so a slow response for a
//! previous key can never overwrite the list after the view has moved on.
//!
//! Callers that let fetches overlap hold the fetcher only around
//! [`Fetcher::begin`] and [`Fetcher::complete`], never across the await in
//! between. [`Fetcher::refresh`] borrows the fetcher for the whole fetch and
//! suits a single sequential caller such as the dashboard.

pub mod catalog;

use crate::error::Result;
use crate::store::{DataStore, FromRow, Query, row};

/// What a list view should render.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is outstanding
    Loading,
    /// The last fetch completed (possibly with no rows)
    Loaded(Vec<T>),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// True only for a completed fetch that returned nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadState::Loaded(items) if items.is_empty())
    }

    /// Loaded items; empty while idle or loading.
    pub fn items(&self) -> &[T] {
        match self {
            LoadState::Loaded(items) => items,
            _ => &[],
        }
    }
}

/// Proof that a fetch was started for `key` at `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    pub key: K,
    pub generation: u64,
}

/// Local list state for one keyed collection.
#[derive(Debug, Clone)]
pub struct Fetcher<K, T> {
    key: Option<K>,
    generation: u64,
    state: LoadState<T>,
}

impl<K, T> Default for Fetcher<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            state: LoadState::Idle,
        }
    }
}

impl<K: Clone + PartialEq, T> Fetcher<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fetch for `key`, superseding any fetch still in flight.
    pub fn begin(&mut self, key: K) -> FetchTicket<K> {
        self.generation += 1;
        self.key = Some(key.clone());
        self.state = LoadState::Loading;
        FetchTicket {
            key,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket<K>) -> bool {
        ticket.generation == self.generation && self.key.as_ref() == Some(&ticket.key)
    }

    /// Apply a response. Returns `false` (and leaves the state untouched)
    /// when the ticket has been superseded.
    pub fn complete(&mut self, ticket: FetchTicket<K>, items: Vec<T>) -> bool {
        if !self.is_current(&ticket) {
            tracing::debug!(
                "discarding stale response (generation {} superseded by {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.state = LoadState::Loaded(items);
        true
    }

    /// Edit the loaded list in place (e.g. drop a row after a delete).
    /// Does nothing unless a list is loaded.
    pub fn update_items(&mut self, f: impl FnOnce(&mut Vec<T>)) {
        if let LoadState::Loaded(items) = &mut self.state {
            f(items);
        }
    }

    /// Start, run and apply a fetch in one step.
    ///
    /// Holds `&mut self` across the fetch, so nothing can supersede it.
    /// Use [`begin`](Self::begin) and [`complete`](Self::complete) when
    /// another fetch may start while this one is in flight.
    pub async fn refresh<S: DataStore>(&mut self, store: &S, key: K, query: &Query) -> bool
    where
        T: FromRow,
    {
        let ticket = self.begin(key);
        let items = fetch_collection(store, query).await;
        self.complete(ticket, items)
    }
}

/// Fetch and map a collection, propagating failures.
pub async fn try_fetch_collection<S, T>(store: &S, query: &Query) -> Result<Vec<T>>
where
    S: DataStore,
    T: FromRow,
{
    let rows = store.select(query).await?;
    Ok(row::map_rows(&rows))
}

/// Fetch and map a collection; failures are logged and yield an empty list.
pub async fn fetch_collection<S, T>(store: &S, query: &Query) -> Vec<T>
where
    S: DataStore,
    T: FromRow,
{
    match try_fetch_collection(store, query).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {e}", query.table);
            Vec::new()
        }
    }
}

/// Fetch the first matching record, or `None` on no match or failure.
pub async fn fetch_one<S, T>(store: &S, query: Query) -> Option<T>
where
    S: DataStore,
    T: FromRow,
{
    fetch_collection(store, &query.limit(1)).await.into_iter().next()
}
