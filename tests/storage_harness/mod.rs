//! Shared test harness for store and coordinator testing
//!
//! Provides order fixtures plus wrappers around the in-memory stores that
//! count calls, inject failures, or pause a read mid-flight, so the
//! coordinator's cache-aside behavior can be observed from the outside.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod order_store_tests;

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use orders::core::error::{CacheError, PersistenceError};
use orders::core::order::{Amount, NewOrder, Order};
use orders::core::service::{CacheStore, OrderStore};
use orders::orders::CacheAsideCoordinator;
use orders::storage::{InMemoryCacheStore, InMemoryOrderStore};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn new_order(customer: &str, product: &str, cents: i64) -> NewOrder {
    NewOrder::new(customer, product, Amount::from_cents(cents))
}

pub fn sample_order() -> NewOrder {
    new_order("Ada Lovelace", "Analytical Engine", 12_50)
}

// ---------------------------------------------------------------------------
// CountingOrderStore: records how often each operation reached the store
// ---------------------------------------------------------------------------

pub struct CountingOrderStore<S> {
    inner: S,
    creates: AtomicUsize,
    gets: AtomicUsize,
    lists: AtomicUsize,
    deletes: AtomicUsize,
}

impl<S> CountingOrderStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            creates: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: OrderStore> OrderStore for CountingOrderStore<S> {
    async fn create(&self, order: NewOrder) -> Result<Order, PersistenceError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(order).await
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Order>, PersistenceError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_id(id).await
    }

    async fn get_all(&self) -> Result<Vec<Order>, PersistenceError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.get_all().await
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool, PersistenceError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }
}

// ---------------------------------------------------------------------------
// FlakyCacheStore: in-memory cache with switchable outages and call counts
// ---------------------------------------------------------------------------

pub struct FlakyCacheStore {
    inner: InMemoryCacheStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

impl FlakyCacheStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryCacheStore::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    /// The backing cache, for direct inspection and raw writes
    pub fn inner(&self) -> &InMemoryCacheStore {
        &self.inner
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn outage() -> CacheError {
        CacheError::unavailable("flaky", "connection refused")
    }
}

#[async_trait]
impl CacheStore for FlakyCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.get(key).await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::outage());
        }
        self.inner.delete(key).await
    }
}

// ---------------------------------------------------------------------------
// GatedOrderStore: holds one armed read between fetch and return
// ---------------------------------------------------------------------------

/// Lets a test interleave another operation between the store fetch of a
/// `get_by_id` and the cache write that follows it.
pub struct GatedOrderStore {
    inner: InMemoryOrderStore,
    armed: AtomicBool,
    pub fetched: Notify,
    pub release: Notify,
}

impl GatedOrderStore {
    pub fn new(inner: InMemoryOrderStore) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            fetched: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Pause the next `get_by_id` after it has read the store
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for GatedOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, PersistenceError> {
        self.inner.create(order).await
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Order>, PersistenceError> {
        let result = self.inner.get_by_id(id).await;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.fetched.notify_one();
            self.release.notified().await;
        }
        result
    }

    async fn get_all(&self) -> Result<Vec<Order>, PersistenceError> {
        self.inner.get_all().await
    }

    async fn delete_by_id(&self, id: &Uuid) -> Result<bool, PersistenceError> {
        self.inner.delete_by_id(id).await
    }
}

// ---------------------------------------------------------------------------
// UnreachableOrderStore: every call fails like a dropped connection
// ---------------------------------------------------------------------------

pub struct UnreachableOrderStore;

impl UnreachableOrderStore {
    fn failure() -> PersistenceError {
        PersistenceError::connection("PostgreSQL", "connection refused")
    }
}

#[async_trait]
impl OrderStore for UnreachableOrderStore {
    async fn create(&self, _order: NewOrder) -> Result<Order, PersistenceError> {
        Err(Self::failure())
    }

    async fn get_by_id(&self, _id: &Uuid) -> Result<Option<Order>, PersistenceError> {
        Err(Self::failure())
    }

    async fn get_all(&self) -> Result<Vec<Order>, PersistenceError> {
        Err(Self::failure())
    }

    async fn delete_by_id(&self, _id: &Uuid) -> Result<bool, PersistenceError> {
        Err(Self::failure())
    }
}

// ---------------------------------------------------------------------------
// Coordinator fixture
// ---------------------------------------------------------------------------

pub struct Harness {
    pub coordinator: CacheAsideCoordinator,
    pub store: Arc<CountingOrderStore<InMemoryOrderStore>>,
    pub cache: Arc<FlakyCacheStore>,
}

/// Coordinator over a counting in-memory store and a flaky in-memory cache
pub fn harness(ttl: Duration) -> Harness {
    let store = Arc::new(CountingOrderStore::new(InMemoryOrderStore::new()));
    let cache = Arc::new(FlakyCacheStore::new());
    let coordinator = CacheAsideCoordinator::new(store.clone(), cache.clone()).with_ttl(ttl);

    Harness {
        coordinator,
        store,
        cache,
    }
}
