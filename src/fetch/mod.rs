mod session;
pub use session::{Completed, Fetcher, SearchOutcome, SearchSession, Ticket};

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use crate::apod::{ApodRecord, FetchError};
use crate::core::types::ApodBackend;
use crate::query::QueryParameters;

pub type Records = Arc<Vec<ApodRecord>>;

type Slot = Arc<OnceCell<Records>>;

/// Entries kept before the oldest finished result sets are dropped.
pub const DEFAULT_CAPACITY: usize = 64;

/// Results keyed by the content of their query parameters.
///
/// Callers asking for the same parameters while a request is running wait on
/// that request instead of issuing another. A failed request leaves its slot
/// uninitialized, so the next caller on that slot runs the request again.
pub struct QueryCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

#[derive(Default)]
struct Entries {
    slots: HashMap<QueryParameters, Slot>,
    order: VecDeque<QueryParameters>,
}

impl Entries {
    fn slot(&mut self, params: &QueryParameters, capacity: usize) -> Slot {
        if let Some(slot) = self.slots.get(params) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        self.slots.insert(params.clone(), Arc::clone(&slot));
        self.order.push_back(params.clone());
        self.evict(capacity);
        slot
    }

    /// Drops the oldest finished entries above `capacity`. Slots still being
    /// filled stay so their waiters keep sharing one request.
    fn evict(&mut self, capacity: usize) {
        while self.order.len() > capacity {
            let Some(pos) = self
                .order
                .iter()
                .position(|key| self.slots.get(key).is_some_and(|slot| slot.initialized()))
            else {
                break;
            };
            if let Some(key) = self.order.remove(pos) {
                log::debug!("Evicting cached results for {}", key);
                self.slots.remove(&key);
            }
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub async fn get_or_fetch(
        &self,
        params: &QueryParameters,
        backend: &dyn ApodBackend,
    ) -> Result<Records, FetchError> {
        let slot = self.entries.lock().await.slot(params, self.capacity);

        if let Some(records) = slot.get() {
            log::debug!("Cache hit for {}", params);
            return Ok(Arc::clone(records));
        }

        slot.get_or_try_init(|| async {
            log::debug!("Cache miss for {}, fetching", params);
            backend.fetch(params).await.map(Arc::new)
        })
        .await
        .map(Arc::clone)
    }

    pub async fn get(&self, params: &QueryParameters) -> Option<Records> {
        let entries = self.entries.lock().await;
        entries.slots.get(params).and_then(|slot| slot.get().cloned())
    }

    pub async fn len(&self) -> usize {
        self.entries
            .lock()
            .await
            .slots
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }
}
