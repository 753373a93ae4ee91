//! launchdeck - Offline-first SpaceX data client
//!
//! Mirrors launch, vehicle, and facility data from the public SpaceX REST
//! API into a local SQLite cache and exposes reactive, offline-first reads.
//! Refreshes are atomic whole-table replaces; readers always see either the
//! full old set or the full new set.

pub mod api;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod refresh_bus;
pub mod repo;
pub mod store;
pub mod viewmodel;

// Re-export commonly used types
pub use catalog::{Catalog, RefreshReport};
pub use config::AppConfig;
pub use entities::{
    CacheEntity, Capsule, Core, CrewMember, Dragon, Landpad, Launch, Launchpad, Payload, Rocket,
    Ship,
};
pub use error::{Error, Result};
pub use refresh_bus::{RefreshBus, RefreshCommand};
pub use repo::Repository;
pub use store::{Store, Table};
pub use viewmodel::{ListState, ListViewModel, UiState};
