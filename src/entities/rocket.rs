//! Rockets.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// A height or diameter measurement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub meters: Option<f64>,
    pub feet: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub kg: Option<f64>,
    pub lb: Option<f64>,
}

/// Wire shape of one rocket from `GET /rockets`
#[derive(Debug, Clone, Deserialize)]
pub struct RocketDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub rocket_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub stages: i64,
    #[serde(default)]
    pub boosters: i64,
    #[serde(default)]
    pub cost_per_launch: i64,
    #[serde(default)]
    pub success_rate_pct: i64,
    pub first_flight: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub wikipedia: Option<String>,
    #[serde(default)]
    pub height: Dimension,
    #[serde(default)]
    pub diameter: Dimension,
    #[serde(default)]
    pub mass: Mass,
    #[serde(default)]
    pub flickr_images: Vec<String>,
}

/// A cached rocket, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rocket {
    pub id: String,
    pub name: String,
    pub rocket_type: String,
    pub active: bool,
    pub stages: i64,
    pub boosters: i64,
    pub cost_per_launch: i64,
    pub success_rate_pct: i64,
    pub first_flight: Option<String>,
    pub country: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub wikipedia: Option<String>,
    pub height: Dimension,
    pub diameter: Dimension,
    pub mass: Mass,
    pub flickr_images: Vec<String>,
}

impl CacheEntity for Rocket {
    type Dto = RocketDto;

    const TABLE: Table = Table::Rockets;
    const ENDPOINT: &'static str = "rockets";

    fn from_dto(dto: RocketDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            rocket_type: dto.rocket_type,
            active: dto.active,
            stages: dto.stages,
            boosters: dto.boosters,
            cost_per_launch: dto.cost_per_launch,
            success_rate_pct: dto.success_rate_pct,
            first_flight: dto.first_flight,
            country: dto.country,
            company: dto.company,
            description: dto.description,
            wikipedia: dto.wikipedia,
            height: dto.height,
            diameter: dto.diameter,
            mass: dto.mass,
            flickr_images: dto.flickr_images,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO rockets (id, name, rocket_type, active, stages, boosters, \
         cost_per_launch, success_rate_pct, first_flight, country, company, description, \
         wikipedia, height, diameter, mass, flickr_images) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.rocket_type,
            self.active,
            self.stages,
            self.boosters,
            self.cost_per_launch,
            self.success_rate_pct,
            self.first_flight,
            self.country,
            self.company,
            self.description,
            self.wikipedia,
            to_json(&self.height),
            to_json(&self.diameter),
            to_json(&self.mass),
            to_json(&self.flickr_images),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, rocket_type, active, stages, boosters, cost_per_launch, \
         success_rate_pct, first_flight, country, company, description, wikipedia, \
         height, diameter, mass, flickr_images FROM rockets ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, rocket_type, active, stages, boosters, cost_per_launch, \
         success_rate_pct, first_flight, country, company, description, wikipedia, \
         height, diameter, mass, flickr_images FROM rockets WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let height: String = row.get(13)?;
        let diameter: String = row.get(14)?;
        let mass: String = row.get(15)?;
        let flickr_images: String = row.get(16)?;

        Ok(Self {
            name: row.get(1)?,
            rocket_type: row.get(2)?,
            active: row.get(3)?,
            stages: row.get(4)?,
            boosters: row.get(5)?,
            cost_per_launch: row.get(6)?,
            success_rate_pct: row.get(7)?,
            first_flight: row.get(8)?,
            country: row.get(9)?,
            company: row.get(10)?,
            description: row.get(11)?,
            wikipedia: row.get(12)?,
            height: json_or_default(Self::TABLE, &id, "height", &height),
            diameter: json_or_default(Self::TABLE, &id, "diameter", &diameter),
            mass: json_or_default(Self::TABLE, &id, "mass", &mass),
            flickr_images: json_or_default(Self::TABLE, &id, "flickr_images", &flickr_images),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_field_maps_to_rocket_type() {
        let dto: RocketDto = serde_json::from_str(
            r#"{
                "id": "falconheavy",
                "name": "Falcon Heavy",
                "type": "rocket",
                "active": true,
                "stages": 2,
                "boosters": 2,
                "cost_per_launch": 90000000,
                "success_rate_pct": 100,
                "height": { "meters": 70.0, "feet": 229.6 },
                "diameter": { "meters": 12.2, "feet": 39.9 },
                "mass": { "kg": 1420788.0, "lb": 3125735.0 }
            }"#,
        )
        .unwrap();

        let rocket = Rocket::from_dto(dto);
        assert_eq!(rocket.rocket_type, "rocket");
        assert_eq!(rocket.boosters, 2);
        assert_eq!(rocket.diameter.meters, Some(12.2));
    }
}
