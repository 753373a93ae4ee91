//! The synchronization core.
//!
//! One generic repository, instantiated per entity type, owns the refresh
//! protocol: fetch the full remote collection, map it, and atomically
//! replace the local table. Reads never touch the network; refreshes never
//! leave a partially written table behind.

use futures::stream::{self, Stream};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::api::RemoteSource;
use crate::entities::CacheEntity;
use crate::error::Result;
use crate::store::Store;

/// Offline-first access to one entity type.
///
/// Cloning shares the remote source and the store. Repositories for
/// different entity types are fully independent: no cross-entity locking,
/// ordering, or atomicity.
pub struct Repository<E: CacheEntity> {
    remote: Arc<dyn RemoteSource<E>>,
    store: Store,
    _entity: PhantomData<fn() -> E>,
}

impl<E: CacheEntity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: CacheEntity> Repository<E> {
    pub fn new(remote: Arc<dyn RemoteSource<E>>, store: Store) -> Self {
        Self {
            remote,
            store,
            _entity: PhantomData,
        }
    }

    /// Fetch the full remote collection and atomically replace the cache.
    ///
    /// On any fetch or decode failure the error is returned and the local
    /// cache is left exactly as it was: stale-but-consistent data is
    /// preferred over partial data. Concurrent refreshes of the same entity
    /// type are tolerated; SQLite serializes the replaces, so the final
    /// state is always one complete refresh's output.
    pub async fn refresh(&self) -> Result<()> {
        let dtos = self.remote.fetch_all().await.map_err(|err| {
            log::warn!("{}: refresh failed: {err}", E::TABLE.name());
            err
        })?;

        let rows: Vec<E> = dtos.into_iter().map(E::from_dto).collect();
        let count = rows.len();
        self.store.replace_all(rows).await?;

        log::info!("{}: refreshed {count} rows", E::TABLE.name());
        Ok(())
    }

    /// Live view of the cached collection.
    ///
    /// Yields the current cache contents immediately (possibly an empty
    /// list), then re-yields the full list every time the table changes.
    /// Pure cache read - never performs network I/O. The stream only ends
    /// when the subscriber drops it.
    ///
    /// The table subscription is taken before the first read, so a write
    /// racing the initial snapshot still triggers a re-emission; snapshots
    /// are therefore monotone for every subscriber.
    pub fn observe(&self) -> impl Stream<Item = Result<Vec<E>>> + Send {
        let store = self.store.clone();
        let rx = store.notifier().subscribe(E::TABLE);

        stream::unfold((store, rx, true), |(store, mut rx, first)| async move {
            if !first {
                loop {
                    match rx.recv().await {
                        Ok(()) => break,
                        // Missed signals coalesce into one re-read.
                        Err(RecvError::Lagged(_)) => break,
                        Err(RecvError::Closed) => return None,
                    }
                }
            }
            let snapshot = store.load_all::<E>().await;
            Some((snapshot, (store, rx, false)))
        })
    }

    /// One-shot cache lookup by upstream id; absent rows are `Ok(None)`
    pub async fn get_by_id(&self, id: &str) -> Result<Option<E>> {
        self.store.load_by_id(id).await
    }

    /// One-shot read of the full cached collection, in display order.
    /// Pure cache read, same as a single `observe()` snapshot.
    pub async fn get_all(&self) -> Result<Vec<E>> {
        self.store.load_all().await
    }
}
