//! Recovery and support ships.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one ship from `GET /ships`
#[derive(Debug, Clone, Deserialize)]
pub struct ShipDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ship_type: Option<String>,
    #[serde(default)]
    pub active: bool,
    pub home_port: Option<String>,
    pub year_built: Option<i64>,
    pub mass_kg: Option<f64>,
    pub image: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub launches: Vec<String>,
}

/// A cached ship, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ship {
    pub id: String,
    pub name: String,
    pub ship_type: Option<String>,
    pub active: bool,
    pub home_port: Option<String>,
    pub year_built: Option<i64>,
    pub mass_kg: Option<f64>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub roles: Vec<String>,
    pub launches: Vec<String>,
}

impl CacheEntity for Ship {
    type Dto = ShipDto;

    const TABLE: Table = Table::Ships;
    const ENDPOINT: &'static str = "ships";

    fn from_dto(dto: ShipDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            ship_type: dto.ship_type,
            active: dto.active,
            home_port: dto.home_port,
            year_built: dto.year_built,
            mass_kg: dto.mass_kg,
            image: dto.image,
            link: dto.link,
            roles: dto.roles,
            launches: dto.launches,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO ships (id, name, ship_type, active, home_port, year_built, mass_kg, \
         image, link, roles, launches) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.ship_type,
            self.active,
            self.home_port,
            self.year_built,
            self.mass_kg,
            self.image,
            self.link,
            to_json(&self.roles),
            to_json(&self.launches),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, ship_type, active, home_port, year_built, mass_kg, image, link, \
         roles, launches FROM ships ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, ship_type, active, home_port, year_built, mass_kg, image, link, \
         roles, launches FROM ships WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let roles: String = row.get(9)?;
        let launches: String = row.get(10)?;

        Ok(Self {
            name: row.get(1)?,
            ship_type: row.get(2)?,
            active: row.get(3)?,
            home_port: row.get(4)?,
            year_built: row.get(5)?,
            mass_kg: row.get(6)?,
            image: row.get(7)?,
            link: row.get(8)?,
            roles: json_or_default(Self::TABLE, &id, "roles", &roles),
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
        let dto: ShipDto = serde_json::from_str(
            r#"{
                "id": "5ea6ed2d080df4000697c901",
                "name": "American Champion",
                "type": "Tug",
                "active": false,
                "home_port": "Port of Los Angeles",
                "year_built": 1976,
                "mass_kg": 266712.0,
                "roles": ["Support Ship", "Barge Tug"],
                "launches": ["5eb87cdfffd86e000604b331"]
            }"#,
        )
        .unwrap();

        let ship = Ship::from_dto(dto);
        assert_eq!(ship.ship_type.as_deref(), Some("Tug"));
        assert_eq!(ship.roles.len(), 2);
        assert_eq!(ship.year_built, Some(1976));
    }
}
