//! First-stage booster cores.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one core from `GET /cores`
#[derive(Debug, Clone, Deserialize)]
pub struct CoreDto {
    pub id: String,
    pub serial: String,
    pub block: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reuse_count: i64,
    #[serde(default)]
    pub rtls_attempts: i64,
    #[serde(default)]
    pub rtls_landings: i64,
    #[serde(default)]
    pub asds_attempts: i64,
    #[serde(default)]
    pub asds_landings: i64,
    pub last_update: Option<String>,
    #[serde(default)]
    pub launches: Vec<String>,
}

/// A cached core, displayed by serial number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Core {
    pub id: String,
    pub serial: String,
    pub block: Option<i64>,
    pub status: String,
    pub reuse_count: i64,
    pub rtls_attempts: i64,
    pub rtls_landings: i64,
    pub asds_attempts: i64,
    pub asds_landings: i64,
    pub last_update: Option<String>,
    pub launches: Vec<String>,
}

impl CacheEntity for Core {
    type Dto = CoreDto;

    const TABLE: Table = Table::Cores;
    const ENDPOINT: &'static str = "cores";

    fn from_dto(dto: CoreDto) -> Self {
        Self {
            id: dto.id,
            serial: dto.serial,
            block: dto.block,
            status: dto.status,
            reuse_count: dto.reuse_count,
            rtls_attempts: dto.rtls_attempts,
            rtls_landings: dto.rtls_landings,
            asds_attempts: dto.asds_attempts,
            asds_landings: dto.asds_landings,
            last_update: dto.last_update,
            launches: dto.launches,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO cores (id, serial, block, status, reuse_count, rtls_attempts, \
         rtls_landings, asds_attempts, asds_landings, last_update, launches) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.serial,
            self.block,
            self.status,
            self.reuse_count,
            self.rtls_attempts,
            self.rtls_landings,
            self.asds_attempts,
            self.asds_landings,
            self.last_update,
            to_json(&self.launches),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, serial, block, status, reuse_count, rtls_attempts, rtls_landings, \
         asds_attempts, asds_landings, last_update, launches FROM cores ORDER BY serial ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, serial, block, status, reuse_count, rtls_attempts, rtls_landings, \
         asds_attempts, asds_landings, last_update, launches FROM cores WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let launches: String = row.get(10)?;

        Ok(Self {
            serial: row.get(1)?,
            block: row.get(2)?,
            status: row.get(3)?,
            reuse_count: row.get(4)?,
            rtls_attempts: row.get(5)?,
            rtls_landings: row.get(6)?,
            asds_attempts: row.get(7)?,
            asds_landings: row.get(8)?,
            last_update: row.get(9)?,
            launches: json_or_default(Self::TABLE, &id, "launches", &launches),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_block_maps_to_none() {
        let dto: CoreDto = serde_json::from_str(
            r#"{
                "id": "5e9e289df35918033d3b2623",
                "serial": "Merlin1A",
                "block": null,
                "status": "lost",
                "reuse_count": 0,
                "rtls_attempts": 0,
                "rtls_landings": 0,
                "asds_attempts": 0,
                "asds_landings": 0,
                "launches": ["5eb87cd9ffd86e000604b32a"]
            }"#,
        )
        .unwrap();

        let core = Core::from_dto(dto);
        assert!(core.block.is_none());
        assert_eq!(core.status, "lost");
    }
}
