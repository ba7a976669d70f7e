//! Client-side list view: one fully loaded collection, filtered by a text
//! query and an optional status label, then sliced into fixed-size pages.
//!
//! Filtering always runs over the canonical collection, never over the
//! previous filtered view. Page numbers are 1-based.

use std::cmp::Ordering;
use std::future::Future;

use crate::error::AppResult;

/// A record that can be shown in a [`ListView`]
pub trait Listable {
    /// Fields the text query is matched against (OR across fields)
    fn search_fields(&self) -> Vec<&str>;

    /// Derived status label matched exactly by the status filter
    fn status_label(&self) -> Option<&'static str> {
        None
    }

    /// Case-insensitive substring match against any search field.
    /// `needle` must already be lowercased.
    fn matches_query(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Lifecycle of one list view instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    /// Display-ready message; terminal until the view is rebuilt
    Failed(String),
}

/// Current filter inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub status: Option<String>,
}

/// Handle for one issued load; only the newest ticket may complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct ListView<T> {
    items: Vec<T>,
    filtered: Vec<T>,
    filter: FilterState,
    page: usize,
    page_size: usize,
    state: LoadState,
    order: Option<fn(&T, &T) -> Ordering>,
    issued: u64,
}

impl<T: Listable + Clone> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            filtered: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            page_size: page_size.max(1),
            state: LoadState::Idle,
            order: None,
            issued: 0,
        }
    }

    /// Sort applied to every loaded collection (stable, so backend order
    /// survives among equal items)
    pub fn with_order(mut self, order: fn(&T, &T) -> Ordering) -> Self {
        self.order = Some(order);
        self
    }

    /// Run `fetch` and store its result. Returns `false` when a newer load
    /// was started while this one was in flight and the result was dropped.
    pub async fn load<F>(&mut self, fetch: F) -> bool
    where
        F: Future<Output = AppResult<Vec<T>>>,
    {
        let ticket = self.begin_load();
        let result = fetch.await;
        self.finish_load(ticket, result)
    }

    /// Mark the view as loading and issue a ticket for the pending result
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.issued)
    }

    /// Apply a fetch result. Results from any ticket other than the newest
    /// are discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: AppResult<Vec<T>>) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Discarding stale list response"
            );
            return false;
        }

        match result {
            Ok(mut items) => {
                if let Some(order) = self.order {
                    items.sort_by(order);
                }
                self.filtered = items.clone();
                self.items = items;
                self.filter = FilterState::default();
                self.page = 1;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!("List load failed: {}", e);
                self.filtered.clear();
                self.state = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    /// Recompute the filtered view: status (exact) AND query (any field,
    /// case-insensitive). A blank query or empty status disables that
    /// predicate. Resets to page 1. No-op unless loaded.
    pub fn filter(&mut self, query: &str, status: Option<&str>) {
        if self.state != LoadState::Loaded {
            return;
        }

        let status = status.filter(|s| !s.is_empty());
        let needle = query.to_lowercase();
        let use_query = !query.trim().is_empty();

        self.filtered = self
            .items
            .iter()
            .filter(|item| status.map_or(true, |s| item.status_label() == Some(s)))
            .filter(|item| !use_query || item.matches_query(&needle))
            .cloned()
            .collect();

        self.filter = FilterState {
            query: query.to_string(),
            status: status.map(str::to_string),
        };
        self.page = 1;
    }

    /// Jump to page `n`, clamped to `[1, max(1, total_pages)]`
    pub fn go_to_page(&mut self, n: usize) {
        self.page = n.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Drop matching items from both collections without re-fetching.
    /// The current page index is kept even if it ends up short or empty.
    pub fn remove_item<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&T) -> bool,
    {
        self.items.retain(|item| !predicate(item));
        self.filtered.retain(|item| !predicate(item));
    }

    /// Replace matching items in place in both collections
    pub fn replace_item<P>(&mut self, mut predicate: P, replacement: &T)
    where
        P: FnMut(&T) -> bool,
    {
        for item in self.items.iter_mut().chain(self.filtered.iter_mut()) {
            if predicate(item) {
                *item = replacement.clone();
            }
        }
    }

    /// Items visible on the current page
    pub fn page_items(&self) -> &[T] {
        let start = ((self.page - 1) * self.page_size).min(self.filtered.len());
        let end = (start + self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filtered(&self) -> &[T] {
        &self.filtered
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
