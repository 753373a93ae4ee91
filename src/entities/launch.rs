//! Launches - the primary entity of the app.
//!
//! A launch references its rocket, launchpad, crew, capsules, payloads and
//! ships by upstream id. Those are weak references: the referenced row may
//! not be cached (or may not exist upstream at all), and a missing lookup is
//! an absent value, not an error.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Patch images and media links attached to a launch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchLinks {
    #[serde(default)]
    pub patch: LaunchPatch,
    pub webcast: Option<String>,
    pub article: Option<String>,
    pub wikipedia: Option<String>,
    #[serde(default)]
    pub flickr: LaunchFlickr,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchPatch {
    pub small: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchFlickr {
    #[serde(default)]
    pub original: Vec<String>,
}

/// One recorded failure during a launch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchFailure {
    pub time: Option<i64>,
    pub altitude: Option<f64>,
    #[serde(default)]
    pub reason: String,
}

/// Wire shape of one launch from `GET /launches`
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flight_number: i64,
    pub date_utc: String,
    pub date_unix: i64,
    #[serde(default)]
    pub upcoming: bool,
    pub success: Option<bool>,
    pub details: Option<String>,
    pub rocket: Option<String>,
    pub launchpad: Option<String>,
    #[serde(default)]
    pub crew: Vec<String>,
    #[serde(default)]
    pub capsules: Vec<String>,
    #[serde(default)]
    pub payloads: Vec<String>,
    #[serde(default)]
    pub ships: Vec<String>,
    #[serde(default)]
    pub failures: Vec<LaunchFailure>,
    #[serde(default)]
    pub links: LaunchLinks,
}

/// A cached launch, displayed newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Launch {
    pub id: String,
    pub name: String,
    pub flight_number: i64,
    pub date_utc: String,
    pub date_unix: i64,
    pub upcoming: bool,
    pub success: Option<bool>,
    pub details: Option<String>,
    pub rocket: Option<String>,
    pub launchpad: Option<String>,
    pub crew: Vec<String>,
    pub capsules: Vec<String>,
    pub payloads: Vec<String>,
    pub ships: Vec<String>,
    pub failures: Vec<LaunchFailure>,
    pub links: LaunchLinks,
}

impl CacheEntity for Launch {
    type Dto = LaunchDto;

    const TABLE: Table = Table::Launches;
    const ENDPOINT: &'static str = "launches";

    fn from_dto(dto: LaunchDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            flight_number: dto.flight_number,
            date_utc: dto.date_utc,
            date_unix: dto.date_unix,
            upcoming: dto.upcoming,
            success: dto.success,
            details: dto.details,
            rocket: dto.rocket,
            launchpad: dto.launchpad,
            crew: dto.crew,
            capsules: dto.capsules,
            payloads: dto.payloads,
            ships: dto.ships,
            failures: dto.failures,
            links: dto.links,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO launches (id, name, flight_number, date_utc, date_unix, upcoming, \
         success, details, rocket, launchpad, crew, capsules, payloads, ships, failures, links) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.flight_number,
            self.date_utc,
            self.date_unix,
            self.upcoming,
            self.success,
            self.details,
            self.rocket,
            self.launchpad,
            to_json(&self.crew),
            to_json(&self.capsules),
            to_json(&self.payloads),
            to_json(&self.ships),
            to_json(&self.failures),
            to_json(&self.links),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, flight_number, date_utc, date_unix, upcoming, success, details, \
         rocket, launchpad, crew, capsules, payloads, ships, failures, links \
         FROM launches ORDER BY date_unix DESC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, flight_number, date_utc, date_unix, upcoming, success, details, \
         rocket, launchpad, crew, capsules, payloads, ships, failures, links \
         FROM launches WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let crew: String = row.get(10)?;
        let capsules: String = row.get(11)?;
        let payloads: String = row.get(12)?;
        let ships: String = row.get(13)?;
        let failures: String = row.get(14)?;
        let links: String = row.get(15)?;

        Ok(Self {
            name: row.get(1)?,
            flight_number: row.get(2)?,
            date_utc: row.get(3)?,
            date_unix: row.get(4)?,
            upcoming: row.get(5)?,
            success: row.get(6)?,
            details: row.get(7)?,
            rocket: row.get(8)?,
            launchpad: row.get(9)?,
            crew: json_or_default(Self::TABLE, &id, "crew", &crew),
            capsules: json_or_default(Self::TABLE, &id, "capsules", &capsules),
            payloads: json_or_default(Self::TABLE, &id, "payloads", &payloads),
            ships: json_or_default(Self::TABLE, &id, "ships", &ships),
            failures: json_or_default(Self::TABLE, &id, "failures", &failures),
            links: json_or_default(Self::TABLE, &id, "links", &links),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_decodes_wire_shape() {
        let dto: LaunchDto = serde_json::from_str(
            r#"{
                "id": "5eb87cd9ffd86e000604b32a",
                "name": "FalconSat",
                "flight_number": 1,
                "date_utc": "2006-03-24T22:30:00.000Z",
                "date_unix": 1143239400,
                "upcoming": false,
                "success": false,
                "failures": [{ "time": 33, "altitude": null, "reason": "merlin engine failure" }],
                "links": {
                    "patch": { "small": "https://images2.imgbox.com/94/f2/small.png", "large": null },
                    "webcast": "https://www.youtube.com/watch?v=0a_00nJ_Y88",
                    "article": null,
                    "wikipedia": "https://en.wikipedia.org/wiki/DemoSat",
                    "flickr": { "original": [] }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(dto.name, "FalconSat");
        assert_eq!(dto.success, Some(false));
        assert_eq!(dto.failures[0].reason, "merlin engine failure");
        assert!(dto.crew.is_empty());
    }

    #[test]
    fn test_mapping_preserves_scalars() {
        let dto = LaunchDto {
            id: "abc".into(),
            name: "Starlink 4-1".into(),
            flight_number: 131,
            date_utc: "2021-11-13T12:19:00.000Z".into(),
            date_unix: 1636805940,
            upcoming: false,
            success: Some(true),
            details: Some("Routine batch".into()),
            rocket: Some("falcon9".into()),
            launchpad: None,
            crew: vec!["c1".into()],
            capsules: vec![],
            payloads: vec!["p1".into()],
            ships: vec![],
            failures: vec![],
            links: LaunchLinks::default(),
        };

        let launch = Launch::from_dto(dto.clone());
        assert_eq!(launch.id, dto.id);
        assert_eq!(launch.flight_number, dto.flight_number);
        assert_eq!(launch.date_unix, dto.date_unix);
        assert_eq!(launch.success, dto.success);
        assert_eq!(launch.crew, dto.crew);
    }

    #[test]
    fn test_missing_optional_fields_map_to_defaults() {
        let dto: LaunchDto = serde_json::from_str(
            r#"{
                "id": "x",
                "name": "Upcoming Mission",
                "date_utc": "2030-01-01T00:00:00.000Z",
                "date_unix": 1893456000,
                "success": null
            }"#,
        )
        .unwrap();

        let launch = Launch::from_dto(dto);
        assert!(launch.success.is_none());
        assert!(launch.rocket.is_none());
        assert!(launch.payloads.is_empty());
        assert_eq!(launch.links, LaunchLinks::default());
    }
}
