//! Payloads.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one payload from `GET /payloads`
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadDto {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub payload_type: Option<String>,
    #[serde(default)]
    pub reused: bool,
    pub mass_kg: Option<f64>,
    pub mass_lbs: Option<f64>,
    pub orbit: Option<String>,
    pub reference_system: Option<String>,
    pub launch: Option<String>,
    #[serde(default)]
    pub customers: Vec<String>,
    #[serde(default)]
    pub nationalities: Vec<String>,
    #[serde(default)]
    pub manufacturers: Vec<String>,
}

/// A cached payload, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub id: String,
    pub name: Option<String>,
    pub payload_type: Option<String>,
    pub reused: bool,
    pub mass_kg: Option<f64>,
    pub mass_lbs: Option<f64>,
    pub orbit: Option<String>,
    pub reference_system: Option<String>,
    pub launch: Option<String>,
    pub customers: Vec<String>,
    pub nationalities: Vec<String>,
    pub manufacturers: Vec<String>,
}

impl CacheEntity for Payload {
    type Dto = PayloadDto;

    const TABLE: Table = Table::Payloads;
    const ENDPOINT: &'static str = "payloads";

    fn from_dto(dto: PayloadDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            payload_type: dto.payload_type,
            reused: dto.reused,
            mass_kg: dto.mass_kg,
            mass_lbs: dto.mass_lbs,
            orbit: dto.orbit,
            reference_system: dto.reference_system,
            launch: dto.launch,
            customers: dto.customers,
            nationalities: dto.nationalities,
            manufacturers: dto.manufacturers,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO payloads (id, name, payload_type, reused, mass_kg, mass_lbs, orbit, \
         reference_system, launch, customers, nationalities, manufacturers) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.payload_type,
            self.reused,
            self.mass_kg,
            self.mass_lbs,
            self.orbit,
            self.reference_system,
            self.launch,
            to_json(&self.customers),
            to_json(&self.nationalities),
            to_json(&self.manufacturers),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, payload_type, reused, mass_kg, mass_lbs, orbit, reference_system, \
         launch, customers, nationalities, manufacturers FROM payloads ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, payload_type, reused, mass_kg, mass_lbs, orbit, reference_system, \
         launch, customers, nationalities, manufacturers FROM payloads WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let customers: String = row.get(9)?;
        let nationalities: String = row.get(10)?;
        let manufacturers: String = row.get(11)?;

        Ok(Self {
            name: row.get(1)?,
            payload_type: row.get(2)?,
            reused: row.get(3)?,
            mass_kg: row.get(4)?,
            mass_lbs: row.get(5)?,
            orbit: row.get(6)?,
            reference_system: row.get(7)?,
            launch: row.get(8)?,
            customers: json_or_default(Self::TABLE, &id, "customers", &customers),
            nationalities: json_or_default(Self::TABLE, &id, "nationalities", &nationalities),
            manufacturers: json_or_default(Self::TABLE, &id, "manufacturers", &manufacturers),
            id,
        })
    }
}
