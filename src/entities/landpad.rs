//! Landing pads and drone ships.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one landpad from `GET /landpads`
#[derive(Debug, Clone, Deserialize)]
pub struct LandpadDto {
    pub id: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type")]
    pub pad_type: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub landing_attempts: i64,
    #[serde(default)]
    pub landing_successes: i64,
    pub wikipedia: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub launches: Vec<String>,
}

/// A cached landpad, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landpad {
    pub id: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub status: String,
    pub pad_type: Option<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub landing_attempts: i64,
    pub landing_successes: i64,
    pub wikipedia: Option<String>,
    pub details: Option<String>,
    pub launches: Vec<String>,
}

impl CacheEntity for Landpad {
    type Dto = LandpadDto;

    const TABLE: Table = Table::Landpads;
    const ENDPOINT: &'static str = "landpads";

    fn from_dto(dto: LandpadDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            full_name: dto.full_name,
            status: dto.status,
            pad_type: dto.pad_type,
            locality: dto.locality,
            region: dto.region,
            latitude: dto.latitude,
            longitude: dto.longitude,
            landing_attempts: dto.landing_attempts,
            landing_successes: dto.landing_successes,
            wikipedia: dto.wikipedia,
            details: dto.details,
            launches: dto.launches,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO landpads (id, name, full_name, status, pad_type, locality, region, \
         latitude, longitude, landing_attempts, landing_successes, wikipedia, details, launches) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.full_name,
            self.status,
            self.pad_type,
            self.locality,
            self.region,
            self.latitude,
            self.longitude,
            self.landing_attempts,
            self.landing_successes,
            self.wikipedia,
            self.details,
            to_json(&self.launches),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, full_name, status, pad_type, locality, region, latitude, longitude, \
         landing_attempts, landing_successes, wikipedia, details, launches \
         FROM landpads ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, full_name, status, pad_type, locality, region, latitude, longitude, \
         landing_attempts, landing_successes, wikipedia, details, launches \
         FROM landpads WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let launches: String = row.get(13)?;

        Ok(Self {
            name: row.get(1)?,
            full_name: row.get(2)?,
            status: row.get(3)?,
            pad_type: row.get(4)?,
            locality: row.get(5)?,
            region: row.get(6)?,
            latitude: row.get(7)?,
            longitude: row.get(8)?,
            landing_attempts: row.get(9)?,
            landing_successes: row.get(10)?,
            wikipedia: row.get(11)?,
            details: row.get(12)?,
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
        let dto: LandpadDto = serde_json::from_str(
            r#"{
                "id": "5e9e3032383ecb267a34e7c7",
                "name": "OCISLY",
                "full_name": "Of Course I Still Love You",
                "status": "active",
                "type": "ASDS",
                "locality": "Port Canaveral",
                "region": "Florida",
                "latitude": 28.4104,
                "longitude": -80.6188,
                "landing_attempts": 66,
                "landing_successes": 58,
                "launches": ["5eb87cefffd86e000604b342"]
            }"#,
        )
        .unwrap();

        let pad = Landpad::from_dto(dto);
        assert_eq!(pad.pad_type.as_deref(), Some("ASDS"));
        assert_eq!(pad.landing_successes, 58);
    }
}
