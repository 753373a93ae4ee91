//! Dragon vehicle designs.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatShield {
    #[serde(default)]
    pub material: String,
    pub size_meters: Option<f64>,
    pub temp_degrees: Option<f64>,
    pub dev_partner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thrust {
    #[serde(rename = "kN")]
    pub kn: Option<f64>,
    pub lbf: Option<f64>,
}

/// One thruster group on a Dragon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thruster {
    #[serde(rename = "type", default)]
    pub thruster_type: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub pods: i64,
    pub fuel_1: Option<String>,
    pub fuel_2: Option<String>,
    pub isp: Option<f64>,
    #[serde(default)]
    pub thrust: Thrust,
}

/// Wire shape of one dragon from `GET /dragons`
#[derive(Debug, Clone, Deserialize)]
pub struct DragonDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub dragon_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub crew_capacity: i64,
    #[serde(default)]
    pub dry_mass_kg: i64,
    pub first_flight: Option<String>,
    pub description: Option<String>,
    pub wikipedia: Option<String>,
    pub heat_shield: Option<HeatShield>,
    #[serde(default)]
    pub thrusters: Vec<Thruster>,
    #[serde(default)]
    pub flickr_images: Vec<String>,
}

/// A cached dragon design, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dragon {
    pub id: String,
    pub name: String,
    pub dragon_type: String,
    pub active: bool,
    pub crew_capacity: i64,
    pub dry_mass_kg: i64,
    pub first_flight: Option<String>,
    pub description: Option<String>,
    pub wikipedia: Option<String>,
    pub heat_shield: Option<HeatShield>,
    pub thrusters: Vec<Thruster>,
    pub flickr_images: Vec<String>,
}

impl CacheEntity for Dragon {
    type Dto = DragonDto;

    const TABLE: Table = Table::Dragons;
    const ENDPOINT: &'static str = "dragons";

    fn from_dto(dto: DragonDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            dragon_type: dto.dragon_type,
            active: dto.active,
            crew_capacity: dto.crew_capacity,
            dry_mass_kg: dto.dry_mass_kg,
            first_flight: dto.first_flight,
            description: dto.description,
            wikipedia: dto.wikipedia,
            heat_shield: dto.heat_shield,
            thrusters: dto.thrusters,
            flickr_images: dto.flickr_images,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO dragons (id, name, dragon_type, active, crew_capacity, dry_mass_kg, \
         first_flight, description, wikipedia, heat_shield, thrusters, flickr_images) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.dragon_type,
            self.active,
            self.crew_capacity,
            self.dry_mass_kg,
            self.first_flight,
            self.description,
            self.wikipedia,
            to_json(&self.heat_shield),
            to_json(&self.thrusters),
            to_json(&self.flickr_images),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, dragon_type, active, crew_capacity, dry_mass_kg, first_flight, \
         description, wikipedia, heat_shield, thrusters, flickr_images \
         FROM dragons ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, dragon_type, active, crew_capacity, dry_mass_kg, first_flight, \
         description, wikipedia, heat_shield, thrusters, flickr_images \
         FROM dragons WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let heat_shield: String = row.get(9)?;
        let thrusters: String = row.get(10)?;
        let flickr_images: String = row.get(11)?;

        Ok(Self {
            name: row.get(1)?,
            dragon_type: row.get(2)?,
            active: row.get(3)?,
            crew_capacity: row.get(4)?,
            dry_mass_kg: row.get(5)?,
            first_flight: row.get(6)?,
            description: row.get(7)?,
            wikipedia: row.get(8)?,
            heat_shield: json_or_default(Self::TABLE, &id, "heat_shield", &heat_shield),
            thrusters: json_or_default(Self::TABLE, &id, "thrusters", &thrusters),
            flickr_images: json_or_default(Self::TABLE, &id, "flickr_images", &flickr_images),
            id,
        })
    }
}
