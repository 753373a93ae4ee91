//! Crew members.

use rusqlite::{params, Row, Statement};
use serde::{Deserialize, Serialize};

use super::{json_or_default, to_json, CacheEntity};
use crate::store::Table;

/// Wire shape of one crew member from `GET /crew`
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMemberDto {
    pub id: String,
    pub name: Option<String>,
    pub agency: Option<String>,
    pub image: Option<String>,
    pub wikipedia: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub launches: Vec<String>,
}

/// A cached crew member, displayed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewMember {
    pub id: String,
    pub name: Option<String>,
    pub agency: Option<String>,
    pub image: Option<String>,
    pub wikipedia: Option<String>,
    pub status: String,
    pub launches: Vec<String>,
}

impl CacheEntity for CrewMember {
    type Dto = CrewMemberDto;

    const TABLE: Table = Table::Crew;
    const ENDPOINT: &'static str = "crew";

    fn from_dto(dto: CrewMemberDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            agency: dto.agency,
            image: dto.image,
            wikipedia: dto.wikipedia,
            status: dto.status,
            launches: dto.launches,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO crew (id, name, agency, image, wikipedia, status, launches) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    }

    fn bind_insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<()> {
        stmt.execute(params![
            self.id,
            self.name,
            self.agency,
            self.image,
            self.wikipedia,
            self.status,
            to_json(&self.launches),
        ])?;
        Ok(())
    }

    fn select_all_sql() -> &'static str {
        "SELECT id, name, agency, image, wikipedia, status, launches \
         FROM crew ORDER BY name ASC"
    }

    fn select_by_id_sql() -> &'static str {
        "SELECT id, name, agency, image, wikipedia, status, launches FROM crew WHERE id = ?1"
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let id: String = row.get(0)?;
        let launches: String = row.get(6)?;

        Ok(Self {
            name: row.get(1)?,
            agency: row.get(2)?,
            image: row.get(3)?,
            wikipedia: row.get(4)?,
            status: row.get(5)?,
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
        let dto: CrewMemberDto = serde_json::from_str(
            r#"{
                "id": "5ebf1a6e23a9a60006e03a7a",
                "name": "Robert Behnken",
                "agency": "NASA",
                "image": "https://imgur.com/0smMgMH.png",
                "wikipedia": "https://en.wikipedia.org/wiki/Robert_L._Behnken",
                "status": "active",
                "launches": ["5eb87d46ffd86e000604b388"]
            }"#,
        )
        .unwrap();

        let member = CrewMember::from_dto(dto);
        assert_eq!(member.name.as_deref(), Some("Robert Behnken"));
        assert_eq!(member.status, "active");
    }
}
