//! Lookup-or-fetch orchestration on top of [`EventCache`].
//!
//! The coordinator is single-threaded: the cache lives in a `RefCell` and is
//! never borrowed across an `.await`. The callback entry point
//! [`QueryCoordinator::get_events`] runs on the current `LocalSet`.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::cache::EventCache;
use crate::error::CalendarError;
use crate::types::RangeInfo;

/// Cache keyed by UTC range bounds, as used by the coordinator.
pub type RangeCache<E> = EventCache<DateTime<Utc>, E>;

/// Source of events for a cache miss.
pub trait EventFetcher {
    type Event: Clone;

    /// Fetch events for `key` over `range`. Called at most once per miss.
    fn fetch(
        &self,
        key: &str,
        range: &RangeInfo,
    ) -> impl Future<Output = Result<Vec<Self::Event>, CalendarError>>;
}

/// Serves event queries from the cache, fetching on a miss.
///
/// Concurrent misses for the same key and range are not deduplicated: each
/// one fetches and stores its own result.
pub struct QueryCoordinator<F: EventFetcher> {
    fetcher: F,
    cache: RefCell<RangeCache<F::Event>>,
}

impl<F: EventFetcher> QueryCoordinator<F> {
    /// Create a coordinator with an empty cache.
    pub fn new(fetcher: F) -> Self {
        Self::with_cache(fetcher, EventCache::new())
    }

    /// Create a coordinator around an existing cache.
    pub fn with_cache(fetcher: F, cache: RangeCache<F::Event>) -> Self {
        Self {
            fetcher,
            cache: RefCell::new(cache),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Read-only view of the cache. Do not hold it across an `.await`.
    pub fn cache(&self) -> Ref<'_, RangeCache<F::Event>> {
        self.cache.borrow()
    }

    pub fn reset_cache(&self) {
        self.cache.borrow_mut().reset();
        tracing::debug!("Event cache reset");
    }

    /// Return events for `key` over `range`.
    ///
    /// An empty key yields no events without touching the cache or the
    /// fetcher. A covered range returns the cached pool for the key, which
    /// may include events outside `range`. Otherwise one fetch is issued;
    /// on success its events are stored and returned, on failure the error
    /// is returned and the cache is left unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidDate`/`InvalidRange` for unparseable bounds, or whatever the
    /// fetcher reports.
    #[instrument(skip(self), level = "info")]
    pub async fn request(
        &self,
        key: &str,
        range: &RangeInfo,
    ) -> Result<Vec<F::Event>, CalendarError> {
        if key.is_empty() {
            return Ok(Vec::new());
        }

        let interval = range.parse()?;

        let cached = self
            .cache
            .borrow()
            .lookup(key, &interval.start, &interval.end)
            .map(<[F::Event]>::to_vec);
        if let Some(events) = cached {
            tracing::debug!(count = events.len(), "Cache hit");
            return Ok(events);
        }

        tracing::debug!("Cache miss, fetching");
        let events = match self.fetcher.fetch(key, range).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                return Err(e);
            }
        };

        self.cache
            .borrow_mut()
            .put(key, interval.start, interval.end, events.clone());
        Ok(events)
    }
}

impl<F> QueryCoordinator<F>
where
    F: EventFetcher + 'static,
    F::Event: 'static,
{
    /// Callback-style entry point for a calendar view.
    ///
    /// Exactly one of `on_success` or `on_failure` is invoked. A missing or
    /// empty key calls `on_success` with no events before returning and
    /// yields `None`. Otherwise the request is spawned on the current
    /// `tokio::task::LocalSet` and its handle returned without waiting.
    pub fn get_events<S, X>(
        self: Rc<Self>,
        key: Option<String>,
        info: RangeInfo,
        on_success: S,
        on_failure: X,
    ) -> Option<JoinHandle<()>>
    where
        S: FnOnce(Vec<F::Event>) + 'static,
        X: FnOnce(CalendarError) + 'static,
    {
        let key = match key {
            Some(key) if !key.is_empty() => key,
            _ => {
                on_success(Vec::new());
                return None;
            }
        };

        Some(tokio::task::spawn_local(async move {
            match self.request(&key, &info).await {
                Ok(events) => on_success(events),
                Err(e) => on_failure(e),
            }
        }))
    }
}
