//! Catalog - the application-facing facade.
//!
//! Owns the local store, the shared HTTP client, and one repository per
//! entity type. Screens take the repository they need; shell commands use
//! the aggregate operations.

use std::sync::Arc;

use crate::api::HttpSource;
use crate::config::AppConfig;
use crate::entities::{
    Capsule, Core, CrewMember, Dragon, Landpad, Launch, Launchpad, Payload, Rocket, Ship,
};
use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::store::{Store, Table};

/// Outcome of a `refresh_all` fan-out.
#[derive(Debug)]
pub struct RefreshReport {
    /// Tables whose refresh committed
    pub refreshed: Vec<Table>,
    /// Tables whose refresh failed, with the cause
    pub failed: Vec<(Table, Error)>,
}

impl RefreshReport {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// All ten entity repositories over one cache and one HTTP client.
pub struct Catalog {
    store: Store,
    launches: Repository<Launch>,
    rockets: Repository<Rocket>,
    capsules: Repository<Capsule>,
    cores: Repository<Core>,
    crew: Repository<CrewMember>,
    ships: Repository<Ship>,
    dragons: Repository<Dragon>,
    landpads: Repository<Landpad>,
    launchpads: Repository<Launchpad>,
    payloads: Repository<Payload>,
}

impl Catalog {
    /// Open the cache at the configured path and wire up the live API.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Store::open(&config.db_path)?;
        let source = Arc::new(HttpSource::new(config)?);
        Ok(Self::assemble(store, source))
    }

    fn assemble(store: Store, source: Arc<HttpSource>) -> Self {
        Self {
            launches: Repository::new(source.clone(), store.clone()),
            rockets: Repository::new(source.clone(), store.clone()),
            capsules: Repository::new(source.clone(), store.clone()),
            cores: Repository::new(source.clone(), store.clone()),
            crew: Repository::new(source.clone(), store.clone()),
            ships: Repository::new(source.clone(), store.clone()),
            dragons: Repository::new(source.clone(), store.clone()),
            landpads: Repository::new(source.clone(), store.clone()),
            launchpads: Repository::new(source.clone(), store.clone()),
            payloads: Repository::new(source, store.clone()),
            store,
        }
    }

    pub fn launches(&self) -> &Repository<Launch> {
        &self.launches
    }

    pub fn rockets(&self) -> &Repository<Rocket> {
        &self.rockets
    }

    pub fn capsules(&self) -> &Repository<Capsule> {
        &self.capsules
    }

    pub fn cores(&self) -> &Repository<Core> {
        &self.cores
    }

    pub fn crew(&self) -> &Repository<CrewMember> {
        &self.crew
    }

    pub fn ships(&self) -> &Repository<Ship> {
        &self.ships
    }

    pub fn dragons(&self) -> &Repository<Dragon> {
        &self.dragons
    }

    pub fn landpads(&self) -> &Repository<Landpad> {
        &self.landpads
    }

    pub fn launchpads(&self) -> &Repository<Launchpad> {
        &self.launchpads
    }

    pub fn payloads(&self) -> &Repository<Payload> {
        &self.payloads
    }

    /// Refresh every entity type concurrently.
    ///
    /// Entity refreshes are independent: one failure never blocks or rolls
    /// back the others.
    pub async fn refresh_all(&self) -> RefreshReport {
        let (launches, rockets, capsules, cores, crew, ships, dragons, landpads, launchpads, payloads) = tokio::join!(
            self.launches.refresh(),
            self.rockets.refresh(),
            self.capsules.refresh(),
            self.cores.refresh(),
            self.crew.refresh(),
            self.ships.refresh(),
            self.dragons.refresh(),
            self.landpads.refresh(),
            self.launchpads.refresh(),
            self.payloads.refresh(),
        );

        let outcomes = [
            (Table::Launches, launches),
            (Table::Rockets, rockets),
            (Table::Capsules, capsules),
            (Table::Cores, cores),
            (Table::Crew, crew),
            (Table::Ships, ships),
            (Table::Dragons, dragons),
            (Table::Landpads, landpads),
            (Table::Launchpads, launchpads),
            (Table::Payloads, payloads),
        ];

        let mut report = RefreshReport {
            refreshed: Vec::new(),
            failed: Vec::new(),
        };
        for (table, outcome) in outcomes {
            match outcome {
                Ok(()) => report.refreshed.push(table),
                Err(err) => report.failed.push((table, err)),
            }
        }
        report
    }

    /// Drop every cached row in every table
    pub async fn clear_cache(&self) -> Result<()> {
        self.store.clear().await
    }

    /// Last successful refresh per table
    pub async fn status(&self) -> Result<Vec<(Table, Option<chrono::DateTime<chrono::Utc>>)>> {
        let mut rows = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            rows.push((table, self.store.last_refreshed(table).await?));
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let store = Store::open_in_memory().unwrap();
        let source = Arc::new(HttpSource::new(&AppConfig::default()).unwrap());
        Catalog::assemble(store, source)
    }

    #[tokio::test]
    async fn test_fresh_catalog_has_empty_status() {
        let catalog = catalog();
        let status = catalog.status().await.unwrap();
        assert_eq!(status.len(), Table::ALL.len());
        assert!(status.iter().all(|(_, last)| last.is_none()));
    }

    #[tokio::test]
    async fn test_clear_cache_on_empty_catalog_is_ok() {
        let catalog = catalog();
        catalog.clear_cache().await.unwrap();
    }
}
