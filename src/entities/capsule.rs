//! Dragon capsules (the individual airframes, not the vehicle design).

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one capsule from `GET /capsules`
#[derive(Debug, Clone, Deserialize)]
pub struct CapsuleDto {
    pub id: String,
    pub serial: String,
    #[serde(rename = "type", default)]
    pub capsule_type: String,
    #[serde(default)]
    pub status: String,
    pub last_update: Option<String>,
    #[serde(default)]
    pub reuse_count: i64,
    #[serde(default)]
    pub water_landings: i64,
    #[serde(default)]
    pub land_landings: i64,
    pub dragon: Option<String>,
    #[serde(default)]
    pub launches: Vec<String>,
}

/// A cached capsule, displayed by serial number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capsule {
    pub id: String,
    pub serial: String,
    pub capsule_type: String,
    pub status: String,
    pub last_update: Option<String>,
    pub reuse_count: i64,
    pub water_landings: i64,
    pub land_landings: i64,
    pub dragon: Option<String>,
    pub launches: Vec<String>,
}

impl CacheEntity for Capsule {
    type Dto = CapsuleDto;

    const TABLE: Table = Table::Capsules;
    const ENDPOINT: &'static str = "capsules";

    fn from_dto(dto: CapsuleDto) -> Self {
        Self {
            id: dto.id,
            serial: dto.serial,
            capsule_type: dto.capsule_type,
            status: dto.status,
            last_update: dto.last_update,
            reuse_count: dto.reuse_count,
            water_landings: dto.water_landings,
            land_landings: dto.land_landings,
            dragon: dto.dragon,
            launches: dto.launches,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO capsules (id, serial, capsule_type, status, last_update, reuse_count, \
         water_landings, land_landings, dragon, launches) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.serial,
            self.capsule_type,
            self.status,
            self.last_update,
            self.reuse_count,
            self.water_landings,
            self.land_landings,
            self.dragon,
            to_json(&self.launches),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, serial, capsule_type, status, last_update, reuse_count, water_landings, \
         land_landings, dragon, launches FROM capsules ORDER BY serial ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, serial, capsule_type, status, last_update, reuse_count, water_landings, \
         land_landings, dragon, launches FROM capsules WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let launches: String = row.get(9)?;

        Ok(Self {
            serial: row.get(1)?,
            capsule_type: row.get(2)?,
            status: row.get(3)?,
            last_update: row.get(4)?,
            reuse_count: row.get(5)?,
            water_landings: row.get(6)?,
            land_landings: row.get(7)?,
            dragon: row.get(8)?,
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
        let dto: CapsuleDto = serde_json::from_str(
            r#"{
                "id": "5e9e2c5bf35918ed873b2664",
                "serial": "C101",
                "type": "Dragon 1.0",
                "status": "retired",
                "last_update": "Hanging in atrium",
                "reuse_count": 0,
                "water_landings": 1,
                "land_landings": 0,
                "dragon": "5e9d058759b1ff74a7ad5f8f",
                "launches": ["5eb87cdeffd86e000604b330"]
            }"#,
        )
        .unwrap();

        let capsule = Capsule::from_dto(dto);
        assert_eq!(capsule.serial, "C101");
        assert_eq!(capsule.water_landings, 1);
        assert_eq!(capsule.launches.len(), 1);
    }
}
