//! Content loading controller
//!
//! Owns the per-kind browsing state and decides, for every user intent,
//! whether results are replaced (reset-fetch) or extended (append-fetch).
//!
//! Operations take `&self` and only lock the state for synchronous
//! transitions, so a new operation may start while an earlier fetch is still
//! in flight. Every fetch is stamped with its kind's generation; a completion
//! whose generation is no longer current is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::core::catalog::{CatalogClient, CatalogResult};
use crate::error::ControllerError;
use crate::types::{ContentState, ErrorInfo, Item, MediaKind, RetrievalMode};

/// What became of a fetch once it resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response landed in the buffer
    Applied { received: usize },
    /// Request failed; recorded in the kind's `error`
    Failed(ErrorInfo),
    /// A newer request for the same kind started first; response dropped
    Superseded,
}

/// Why a load-more request was not issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Loading,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMore {
    Fetched(FetchOutcome),
    Skipped(SkipReason),
}

/// A fetch that has been started but not yet resolved
#[derive(Debug)]
struct Ticket {
    kind: MediaKind,
    mode: RetrievalMode,
    query: String,
    page: u32,
    generation: u64,
    append: bool,
}

#[derive(Debug)]
struct Inner {
    active: MediaKind,
    query: String,
    photos: ContentState,
    videos: ContentState,
}

impl Inner {
    fn state(&self, kind: MediaKind) -> &ContentState {
        match kind {
            MediaKind::Photo => &self.photos,
            MediaKind::Video => &self.videos,
        }
    }

    fn state_mut(&mut self, kind: MediaKind) -> &mut ContentState {
        match kind {
            MediaKind::Photo => &mut self.photos,
            MediaKind::Video => &mut self.videos,
        }
    }

    /// Mark `kind` as loading from page 1 and hand out the request ticket
    fn begin_reset(&mut self, kind: MediaKind, clear: bool) -> Ticket {
        let query = self.query.clone();
        let state = self.state_mut(kind);

        state.generation += 1;
        state.loading = true;
        state.error = None;
        state.page = 1;
        state.retry_pending = false;
        state.reset_pending = false;
        if clear {
            state.items.clear();
            state.has_more = true;
        }

        debug!(
            %kind,
            mode = %state.mode,
            generation = state.generation,
            "reset fetch"
        );

        Ticket {
            kind,
            mode: state.mode,
            query,
            page: 1,
            generation: state.generation,
            append: false,
        }
    }
}

/// Coordinates retrieval mode, pagination and result buffers for both kinds
pub struct ContentController<C: ?Sized> {
    catalog: Arc<C>,
    page_size: u32,
    inner: Mutex<Inner>,
}

impl<C: ?Sized> std::fmt::Debug for ContentController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentController")
            .field("page_size", &self.page_size)
            .field("inner", &self.inner)
            .finish()
    }
}

impl<C: CatalogClient + ?Sized> ContentController<C> {
    /// Photos start active; both kinds start in their listing mode
    pub fn new(catalog: Arc<C>, page_size: u32) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
            inner: Mutex::new(Inner {
                active: MediaKind::Photo,
                query: String::new(),
                photos: ContentState::new(MediaKind::Photo),
                videos: ContentState::new(MediaKind::Video),
            }),
        }
    }

    /// Start with `kind` presented. No fetch; call before `initialize`.
    pub fn with_active_kind(self, kind: MediaKind) -> Self {
        self.lock().active = kind;
        self
    }

    /// Start `kind` in `mode`. No fetch; call before `initialize`.
    pub fn with_mode(
        self,
        kind: MediaKind,
        mode: RetrievalMode,
    ) -> Result<Self, ControllerError> {
        if !mode.is_valid_for(kind) {
            return Err(ControllerError::InvalidMode { kind, mode });
        }
        self.lock().state_mut(kind).mode = mode;
        Ok(self)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn active_kind(&self) -> MediaKind {
        self.lock().active
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    /// Copy of the current state for `kind`
    pub fn snapshot(&self, kind: MediaKind) -> ContentState {
        let inner = self.lock();
        let mut state = inner.state(kind).clone();
        state.query = inner.query.clone();
        state
    }

    pub fn active_snapshot(&self) -> ContentState {
        let kind = self.active_kind();
        self.snapshot(kind)
    }

    /// Initial load of both kinds in their current modes
    pub async fn initialize(&self) -> (FetchOutcome, FetchOutcome) {
        let (photos, videos) = {
            let mut inner = self.lock();
            (
                inner.begin_reset(MediaKind::Photo, false),
                inner.begin_reset(MediaKind::Video, false),
            )
        };
        tokio::join!(self.run(photos), self.run(videos))
    }

    /// Present `kind` and reload it from scratch with its existing mode.
    ///
    /// The previously active kind keeps any request it has in flight.
    pub async fn set_active_kind(&self, kind: MediaKind) -> FetchOutcome {
        let ticket = {
            let mut inner = self.lock();
            inner.active = kind;
            inner.begin_reset(kind, true)
        };
        self.run(ticket).await
    }

    pub async fn set_mode(
        &self,
        kind: MediaKind,
        mode: RetrievalMode,
    ) -> Result<FetchOutcome, ControllerError> {
        if !mode.is_valid_for(kind) {
            return Err(ControllerError::InvalidMode { kind, mode });
        }

        let ticket = {
            let mut inner = self.lock();
            inner.state_mut(kind).mode = mode;
            inner.begin_reset(kind, false)
        };
        Ok(self.run(ticket).await)
    }

    /// Update the shared query box without fetching
    pub fn set_query(&self, text: impl Into<String>) {
        self.lock().query = text.into();
    }

    /// Switch the active kind to search mode and search for the current query
    pub async fn submit_search(&self) -> FetchOutcome {
        let ticket = {
            let mut inner = self.lock();
            let kind = inner.active;
            inner.state_mut(kind).mode = RetrievalMode::Search;
            inner.begin_reset(kind, false)
        };
        self.run(ticket).await
    }

    /// Re-run the active kind's current mode from page 1
    pub async fn refresh(&self) -> FetchOutcome {
        let ticket = {
            let mut inner = self.lock();
            let kind = inner.active;
            inner.begin_reset(kind, false)
        };
        self.run(ticket).await
    }

    /// Fetch the next page of the active kind and append it.
    ///
    /// After a failed append the same page is requested again; after a
    /// failed reset page 1 is requested again and replaces the buffer.
    pub async fn load_more(&self) -> Result<LoadMore, ControllerError> {
        let ticket = {
            let mut inner = self.lock();
            let kind = inner.active;
            let query = inner.query.clone();
            let state = inner.state_mut(kind);

            if !state.mode.is_paginated() {
                return Err(ControllerError::NotSupported { mode: state.mode });
            }
            if state.loading {
                debug!(%kind, "load more skipped: request in flight");
                return Ok(LoadMore::Skipped(SkipReason::Loading));
            }
            if state.reset_pending {
                debug!(%kind, "load more reissues failed reset");
                inner.begin_reset(kind, false)
            } else {
                if !state.has_more {
                    debug!(%kind, "load more skipped: no more pages");
                    return Ok(LoadMore::Skipped(SkipReason::Exhausted));
                }

                if !state.retry_pending {
                    state.page += 1;
                }
                state.retry_pending = false;
                state.generation += 1;
                state.loading = true;
                state.error = None;

                debug!(
                    %kind,
                    mode = %state.mode,
                    page = state.page,
                    generation = state.generation,
                    "append fetch"
                );

                Ticket {
                    kind,
                    mode: state.mode,
                    query,
                    page: state.page,
                    generation: state.generation,
                    append: true,
                }
            }
        };

        Ok(LoadMore::Fetched(self.run(ticket).await))
    }

    async fn run(&self, ticket: Ticket) -> FetchOutcome {
        let result = self.dispatch(&ticket).await;
        self.complete(ticket, result)
    }

    async fn dispatch(&self, ticket: &Ticket) -> CatalogResult<Vec<Item>> {
        match ticket.mode {
            RetrievalMode::Search => {
                self.catalog
                    .search(ticket.kind, &ticket.query, ticket.page, self.page_size)
                    .await
            }
            RetrievalMode::Curated | RetrievalMode::Popular => {
                self.catalog
                    .curated_or_popular(ticket.kind, ticket.page, self.page_size)
                    .await
            }
            RetrievalMode::Random => self
                .catalog
                .random(ticket.kind)
                .await
                .map(|item| vec![item]),
        }
    }

    fn complete(&self, ticket: Ticket, result: CatalogResult<Vec<Item>>) -> FetchOutcome {
        let mut inner = self.lock();
        let state = inner.state_mut(ticket.kind);

        if state.generation != ticket.generation {
            debug!(
                kind = %ticket.kind,
                generation = ticket.generation,
                current = state.generation,
                "dropping superseded response"
            );
            return FetchOutcome::Superseded;
        }

        state.loading = false;

        match result {
            Ok(items) => {
                let received = items.len();
                if ticket.append {
                    state.items.extend(items);
                } else {
                    state.items = items;
                }
                state.has_more =
                    ticket.mode.is_paginated() && received == self.page_size as usize;

                debug!(
                    kind = %ticket.kind,
                    page = ticket.page,
                    received,
                    total = state.items.len(),
                    has_more = state.has_more,
                    "fetch applied"
                );
                FetchOutcome::Applied { received }
            }
            Err(err) => {
                let info = ErrorInfo::from(&err);
                warn!(
                    kind = %ticket.kind,
                    mode = %ticket.mode,
                    page = ticket.page,
                    error = %err,
                    "fetch failed"
                );
                if ticket.append {
                    state.retry_pending = true;
                } else {
                    state.reset_pending = true;
                }
                state.error = Some(info.clone());
                FetchOutcome::Failed(info)
            }
        }
    }
}
