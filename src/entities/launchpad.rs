//! Launch pads.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one launchpad from `GET /launchpads`
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchpadDto {
    pub id: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub status: String,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub launch_attempts: i64,
    #[serde(default)]
    pub launch_successes: i64,
    pub details: Option<String>,
    #[serde(default)]
    pub rockets: Vec<String>,
    #[serde(default)]
    pub launches: Vec<String>,
}

/// A cached launchpad, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Launchpad {
    pub id: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub status: String,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub launch_attempts: i64,
    pub launch_successes: i64,
    pub details: Option<String>,
    pub rockets: Vec<String>,
    pub launches: Vec<String>,
}

impl CacheEntity for Launchpad {
    type Dto = LaunchpadDto;

    const TABLE: Table = Table::Launchpads;
    const ENDPOINT: &'static str = "launchpads";

    fn from_dto(dto: LaunchpadDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            full_name: dto.full_name,
            status: dto.status,
            locality: dto.locality,
            region: dto.region,
            latitude: dto.latitude,
            longitude: dto.longitude,
            launch_attempts: dto.launch_attempts,
            launch_successes: dto.launch_successes,
            details: dto.details,
            rockets: dto.rockets,
            launches: dto.launches,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO launchpads (id, name, full_name, status, locality, region, latitude, \
         longitude, launch_attempts, launch_successes, details, rockets, launches) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.full_name,
            self.status,
            self.locality,
            self.region,
            self.latitude,
            self.longitude,
            self.launch_attempts,
            self.launch_successes,
            self.details,
            to_json(&self.rockets),
            to_json(&self.launches),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, full_name, status, locality, region, latitude, longitude, \
         launch_attempts, launch_successes, details, rockets, launches \
         FROM launchpads ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, full_name, status, locality, region, latitude, longitude, \
         launch_attempts, launch_successes, details, rockets, launches \
         FROM launchpads WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let rockets: String = row.get(11)?;
        let launches: String = row.get(12)?;

        Ok(Self {
            name: row.get(1)?,
            full_name: row.get(2)?,
            status: row.get(3)?,
            locality: row.get(4)?,
            region: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
            launch_attempts: row.get(8)?,
            launch_successes: row.get(9)?,
            details: row.get(10)?,
            rockets: json_or_default(Self::TABLE, &id, "rockets", &rockets),
            launches: json_or_default(Self::TABLE, &id, "launches", &launches),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_decodes_wire_shape() {
        let dto: LaunchpadDto = serde_json::from_str(
            r#"{
                "id": "5e9e4502f509094188566f88",
                "name": "SLC 40",
                "full_name": "Space Launch Complex 40",
                "status": "active",
                "locality": "Cape Canaveral",
                "region": "Florida",
                "latitude": 28.5618571,
                "longitude": -80.577366,
                "launch_attempts": 99,
                "launch_successes": 97,
                "rockets": ["5e9d0d95eda69955f709d1eb"],
                "launches": ["5eb87cddffd86e000604b32f"]
            }"#,
        )
        .unwrap();

        let pad = Launchpad::from_dto(dto);
        assert_eq!(pad.full_name.as_deref(), Some("Space Launch Complex 40"));
        assert_eq!(pad.launch_attempts, 99);
        assert_eq!(pad.rockets.len(), 1);
    }
}
