//! Local SQLite cache.
//!
//! One table per entity type, primary-keyed by the upstream id. Nested and
//! list-valued fields are stored as JSON text columns; no foreign keys are
//! enforced between tables (upstream data can reference ids that were never
//! fetched). Every write is a whole-table replace inside one transaction,
//! and the matching table channel is notified only after the commit.

mod notify;

pub use notify::{Notifier, Table};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tokio::task;

use crate::entities::CacheEntity;
use crate::error::{Error, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS launches (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    flight_number INTEGER NOT NULL,
    date_utc TEXT NOT NULL,
    date_unix INTEGER NOT NULL,
    upcoming INTEGER NOT NULL DEFAULT 0,
    success INTEGER,
    details TEXT,
    rocket TEXT,
    launchpad TEXT,
    crew TEXT NOT NULL DEFAULT '[]',
    capsules TEXT NOT NULL DEFAULT '[]',
    payloads TEXT NOT NULL DEFAULT '[]',
    ships TEXT NOT NULL DEFAULT '[]',
    failures TEXT NOT NULL DEFAULT '[]',
    links TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS rockets (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    rocket_type TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 0,
    stages INTEGER NOT NULL DEFAULT 0,
    boosters INTEGER NOT NULL DEFAULT 0,
    cost_per_launch INTEGER NOT NULL DEFAULT 0,
    success_rate_pct INTEGER NOT NULL DEFAULT 0,
    first_flight TEXT,
    country TEXT,
    company TEXT,
    description TEXT,
    wikipedia TEXT,
    height TEXT NOT NULL DEFAULT '{}',
    diameter TEXT NOT NULL DEFAULT '{}',
    mass TEXT NOT NULL DEFAULT '{}',
    flickr_images TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS capsules (
    id TEXT PRIMARY KEY,
    serial TEXT NOT NULL,
    capsule_type TEXT NOT NULL,
    status TEXT NOT NULL,
    last_update TEXT,
    reuse_count INTEGER NOT NULL DEFAULT 0,
    water_landings INTEGER NOT NULL DEFAULT 0,
    land_landings INTEGER NOT NULL DEFAULT 0,
    dragon TEXT,
    launches TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS cores (
    id TEXT PRIMARY KEY,
    serial TEXT NOT NULL,
    block INTEGER,
    status TEXT NOT NULL,
    reuse_count INTEGER NOT NULL DEFAULT 0,
    rtls_attempts INTEGER NOT NULL DEFAULT 0,
    rtls_landings INTEGER NOT NULL DEFAULT 0,
    asds_attempts INTEGER NOT NULL DEFAULT 0,
    asds_landings INTEGER NOT NULL DEFAULT 0,
    last_update TEXT,
    launches TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS crew (
    id TEXT PRIMARY KEY,
    name TEXT,
    agency TEXT,
    image TEXT,
    wikipedia TEXT,
    status TEXT NOT NULL,
    launches TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS ships (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    ship_type TEXT,
    active INTEGER NOT NULL DEFAULT 0,
    home_port TEXT,
    year_built INTEGER,
    mass_kg REAL,
    image TEXT,
    link TEXT,
    roles TEXT NOT NULL DEFAULT '[]',
    launches TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS dragons (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    dragon_type TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 0,
    crew_capacity INTEGER NOT NULL DEFAULT 0,
    dry_mass_kg INTEGER NOT NULL DEFAULT 0,
    first_flight TEXT,
    description TEXT,
    wikipedia TEXT,
    heat_shield TEXT NOT NULL DEFAULT 'null',
    thrusters TEXT NOT NULL DEFAULT '[]',
    flickr_images TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS landpads (
    id TEXT PRIMARY KEY,
    name TEXT,
    full_name TEXT,
    status TEXT NOT NULL,
    pad_type TEXT,
    locality TEXT,
    region TEXT,
    latitude REAL,
    longitude REAL,
    landing_attempts INTEGER NOT NULL DEFAULT 0,
    landing_successes INTEGER NOT NULL DEFAULT 0,
    wikipedia TEXT,
    details TEXT,
    launches TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS launchpads (
    id TEXT PRIMARY KEY,
    name TEXT,
    full_name TEXT,
    status TEXT NOT NULL,
    locality TEXT,
    region TEXT,
    latitude REAL,
    longitude REAL,
    launch_attempts INTEGER NOT NULL DEFAULT 0,
    launch_successes INTEGER NOT NULL DEFAULT 0,
    details TEXT,
    rockets TEXT NOT NULL DEFAULT '[]',
    launches TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS payloads (
    id TEXT PRIMARY KEY,
    name TEXT,
    payload_type TEXT,
    reused INTEGER NOT NULL DEFAULT 0,
    mass_kg REAL,
    mass_lbs REAL,
    orbit TEXT,
    reference_system TEXT,
    launch TEXT,
    customers TEXT NOT NULL DEFAULT '[]',
    nationalities TEXT NOT NULL DEFAULT '[]',
    manufacturers TEXT NOT NULL DEFAULT '[]'
);

-- Last successful refresh per table, Unix seconds
CREATE TABLE IF NOT EXISTS refresh_log (
    table_name TEXT PRIMARY KEY,
    refreshed_at INTEGER NOT NULL
);
"#;

/// Handle to the local cache.
///
/// Cheap to clone; all clones share one connection and one notifier.
/// SQLite work runs on the blocking pool so async callers never stall the
/// runtime on disk I/O.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    notifier: Notifier,
}

impl Store {
    /// Open (or create) the cache database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory cache, used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            notifier: Notifier::new(),
        })
    }

    /// Change-signal source for observe streams
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Atomically replace every row of `E`'s table with `rows`.
    ///
    /// Delete and inserts run in a single transaction: readers see either
    /// the full old set or the full new set, never a mix. The table channel
    /// is notified only after the commit, so a failed replace leaves both
    /// the table and its subscribers untouched.
    pub async fn replace_all<E: CacheEntity>(&self, rows: Vec<E>) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || -> Result<()> {
            let mut guard = conn.lock();
            let tx = guard.transaction()?;
            tx.execute(&format!("DELETE FROM {}", E::TABLE.name()), [])?;
            {
                let mut stmt = tx.prepare(E::insert_sql())?;
                for row in &rows {
                    row.bind_insert(&mut stmt)?;
                }
            }
            tx.execute(
                "INSERT OR REPLACE INTO refresh_log (table_name, refreshed_at) VALUES (?1, ?2)",
                params![E::TABLE.name(), Utc::now().timestamp()],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await??;

        self.notifier.notify(E::TABLE);
        Ok(())
    }

    /// Read the full table in the entity's display order
    pub async fn load_all<E: CacheEntity>(&self) -> Result<Vec<E>> {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || -> Result<Vec<E>> {
            let guard = conn.lock();
            let mut stmt = guard.prepare(E::select_all_sql())?;
            let rows = stmt
                .query_map([], |row| E::from_row(row))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await?
    }

    /// Read a single row by upstream id; absent rows are `Ok(None)`
    pub async fn load_by_id<E: CacheEntity>(&self, id: &str) -> Result<Option<E>> {
        let conn = Arc::clone(&self.conn);
        let id = id.to_string();
        task::spawn_blocking(move || -> Result<Option<E>> {
            let guard = conn.lock();
            let mut stmt = guard.prepare(E::select_by_id_sql())?;
            let row = stmt
                .query_row(params![id], |row| E::from_row(row))
                .optional()?;
            Ok(row)
        })
        .await?
    }

    /// Last successful refresh of `table`, if it has ever been refreshed
    pub async fn last_refreshed(&self, table: Table) -> Result<Option<DateTime<Utc>>> {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || -> Result<Option<i64>> {
            let guard = conn.lock();
            let ts = guard
                .query_row(
                    "SELECT refreshed_at FROM refresh_log WHERE table_name = ?1",
                    params![table.name()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(ts)
        })
        .await?
        .map(|ts| ts.and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    /// Drop every cached row in every table and notify all subscribers
    pub async fn clear(&self) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || -> Result<()> {
            let mut guard = conn.lock();
            let tx = guard.transaction()?;
            for table in Table::ALL {
                tx.execute(&format!("DELETE FROM {}", table.name()), [])?;
            }
            tx.execute("DELETE FROM refresh_log", [])?;
            tx.commit()?;
            Ok(())
        })
        .await??;

        for table in Table::ALL {
            self.notifier.notify(table);
        }
        Ok(())
    }

    /// Run `f` with the raw connection. Test hook for injecting bad rows.
    #[cfg(test)]
    pub(crate) fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        f(&self.conn.lock())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::launch::{Launch, LaunchDto};
    use crate::entities::rocket::{Rocket, RocketDto};

    fn launch(id: &str, date_unix: i64) -> Launch {
        let dto: LaunchDto = serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Mission {id}"),
            "flight_number": 1,
            "date_utc": "2022-01-01T00:00:00.000Z",
            "date_unix": date_unix,
            "upcoming": false,
        }))
        .unwrap();
        Launch::from_dto(dto)
    }

    #[tokio::test]
    async fn test_replace_all_swaps_whole_table() {
        let store = Store::open_in_memory().unwrap();

        store
            .replace_all(vec![launch("a", 3), launch("b", 2), launch("c", 1)])
            .await
            .unwrap();
        let first: Vec<Launch> = store.load_all().await.unwrap();
        assert_eq!(first.len(), 3);

        store
            .replace_all(vec![launch("d", 9), launch("b", 8)])
            .await
            .unwrap();
        let second: Vec<Launch> = store.load_all().await.unwrap();
        let ids: Vec<&str> = second.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b"]);
        assert!(!ids.contains(&"a"));
        assert!(!ids.contains(&"c"));
    }

    #[tokio::test]
    async fn test_load_all_orders_launches_by_descending_date() {
        let store = Store::open_in_memory().unwrap();
        store
            .replace_all(vec![launch("old", 100), launch("new", 300), launch("mid", 200)])
            .await
            .unwrap();

        let launches: Vec<Launch> = store.load_all().await.unwrap();
        let ids: Vec<&str> = launches.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_load_by_id_absent_is_none() {
        let store = Store::open_in_memory().unwrap();
        let missing: Option<Launch> = store.load_by_id("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_replace_notifies_only_own_table() {
        let store = Store::open_in_memory().unwrap();
        let mut launches_rx = store.notifier().subscribe(Table::Launches);
        let mut rockets_rx = store.notifier().subscribe(Table::Rockets);

        store.replace_all(vec![launch("a", 1)]).await.unwrap();

        assert!(launches_rx.recv().await.is_ok());
        assert!(rockets_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_clear_empties_every_table() {
        let store = Store::open_in_memory().unwrap();
        store.replace_all(vec![launch("a", 1)]).await.unwrap();
        assert!(store.last_refreshed(Table::Launches).await.unwrap().is_some());

        store.clear().await.unwrap();

        let launches: Vec<Launch> = store.load_all().await.unwrap();
        assert!(launches.is_empty());
        assert!(store.last_refreshed(Table::Launches).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_nested_blob_degrades_to_default() {
        let store = Store::open_in_memory().unwrap();
        store.replace_all(vec![launch("a", 1)]).await.unwrap();

        store.with_connection(|conn| {
            conn.execute("UPDATE launches SET crew = '{broken', links = 'nope' WHERE id = 'a'", [])
                .unwrap();
        });

        let loaded: Option<Launch> = store.load_by_id("a").await.unwrap();
        let loaded = loaded.unwrap();
        assert!(loaded.crew.is_empty());
        assert_eq!(loaded.links, Default::default());
    }

    #[tokio::test]
    async fn test_scalar_round_trip_through_cache() {
        let store = Store::open_in_memory().unwrap();
        let dto: RocketDto = serde_json::from_value(serde_json::json!({
            "id": "falcon9",
            "name": "Falcon 9",
            "type": "rocket",
            "active": true,
            "stages": 2,
            "boosters": 0,
            "cost_per_launch": 50000000,
            "success_rate_pct": 98,
            "first_flight": "2010-06-04",
            "country": "United States",
            "company": "SpaceX",
            "description": "Reusable two-stage rocket",
            "height": { "meters": 70.0, "feet": 229.6 },
            "mass": { "kg": 549054.0, "lb": 1207920.0 },
            "flickr_images": ["https://example.com/f9.jpg"]
        }))
        .unwrap();
        let rocket = Rocket::from_dto(dto);

        store.replace_all(vec![rocket.clone()]).await.unwrap();
        let loaded: Option<Rocket> = store.load_by_id("falcon9").await.unwrap();
        let loaded = loaded.unwrap();

        assert_eq!(loaded.name, rocket.name);
        assert_eq!(loaded.active, rocket.active);
        assert_eq!(loaded.cost_per_launch, rocket.cost_per_launch);
        assert_eq!(loaded.success_rate_pct, rocket.success_rate_pct);
        assert_eq!(loaded.height.meters, rocket.height.meters);
        assert_eq!(loaded.mass.kg, rocket.mass.kg);
        assert_eq!(loaded.flickr_images, rocket.flickr_images);
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache.db");
        let store = Store::open(&path).unwrap();
        store.replace_all(vec![launch("a", 1)]).await.unwrap();
        assert!(path.exists());
    }
}
