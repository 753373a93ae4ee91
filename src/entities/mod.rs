//! Domain entities and their cache mappings.
//!
//! Each entity module defines three things: the transfer object decoded from
//! the upstream API (`*Dto`), the domain model handed to callers, and the
//! `CacheEntity` impl that maps the model onto its SQLite table. Nested
//! structures are stored as JSON text columns; cross-references to other
//! entities are plain id strings and are never enforced across tables.

use rusqlite::{Row, Statement};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::Table;

pub mod capsule;
pub mod core;
pub mod crew;
pub mod dragon;
pub mod landpad;
pub mod launch;
pub mod launchpad;
pub mod payload;
pub mod rocket;
pub mod ship;

pub use capsule::Capsule;
pub use core::Core;
pub use crew::CrewMember;
pub use dragon::Dragon;
pub use landpad::Landpad;
pub use launch::Launch;
pub use launchpad::Launchpad;
pub use payload::Payload;
pub use rocket::Rocket;
pub use ship::Ship;

/// One cached entity type: its wire shape, table identity, and row mapping.
///
/// The mapping from DTO to domain model is pure and total - optional
/// upstream fields become `None` or empty defaults, never a failure.
pub trait CacheEntity: Sized + Clone + Send + Sync + 'static {
    /// Transfer object decoded from the upstream response
    type Dto: DeserializeOwned + Send + 'static;

    /// Cache table this entity lives in
    const TABLE: Table;

    /// Upstream collection endpoint, relative to the API base URL
    const ENDPOINT: &'static str;

    /// Convert a transfer object into the domain model
    fn from_dto(dto: Self::Dto) -> Self;

    /// Stable upstream identifier, the cache primary key
    fn id(&self) -> &str;

    /// Parameterized INSERT statement for this entity's table
    fn insert_sql() -> &'static str;

    /// Bind this entity's fields to a prepared insert and execute it
    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()>;

    /// SELECT of the full table in the entity's documented display order
    fn select_all_sql() -> &'static str;

    /// SELECT of a single row by id
    fn select_by_id_sql() -> &'static str;

    /// Decode one cache row back into the domain model
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Encode a nested structure for storage as a text column.
pub(crate) fn to_json<T: Serialize>(value: &T) -> String {
    // Our own model types serialize infallibly; fall back to null rather
    // than poisoning the whole row if that ever stops holding.
    serde_json::to_string(value).unwrap_or_else(|_| String::from("null"))
}

/// Decode a nested structure from a text column.
///
/// A corrupt blob degrades to the empty default so a single damaged column
/// cannot take down the whole list view, but the corruption is logged
/// rather than swallowed.
pub(crate) fn json_or_default<T: DeserializeOwned + Default>(
    table: Table,
    id: &str,
    column: &str,
    raw: &str,
) -> T {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("{table}: discarding corrupt `{column}` blob for row {id}: {err}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_or_default_decodes_valid_blob() {
        let ids: Vec<String> =
            json_or_default(Table::Launches, "x", "crew", r#"["a","b"]"#);
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_json_or_default_degrades_on_corrupt_blob() {
        let ids: Vec<String> = json_or_default(Table::Launches, "x", "crew", "{not json");
        assert!(ids.is_empty());
    }
}
