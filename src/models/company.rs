use crate::errors::ApiError;
use crate::models::now;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub owner_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
}

impl Company {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
        Ok(Company {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            website: row.get("website")?,
            owner_id: row.get("owner_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, input: &CompanyInput, owner_id: i64) -> Result<Company, ApiError> {
        let ts = now();
        conn.execute(
            "INSERT INTO companies (name, description, website, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![input.name, input.description, input.website, owner_id, ts, ts],
        )?;
        Ok(Company {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            website: input.website.clone(),
            owner_id,
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Company>, ApiError> {
        conn.query_row(
            "SELECT * FROM companies WHERE id = ?1",
            params![id],
            |row| Company::from_row(row),
        )
        .optional()
        .map_err(ApiError::from)
    }

    pub fn list(conn: &Connection) -> Result<Vec<Company>, ApiError> {
        let mut stmt = conn.prepare("SELECT * FROM companies ORDER BY created_at DESC, id DESC")?;
        let companies = stmt
            .query_map([], |row| Company::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(companies)
    }

    pub fn update(conn: &Connection, id: i64, input: &CompanyInput) -> Result<(), ApiError> {
        conn.execute(
            "UPDATE companies SET name = ?1, description = ?2, website = ?3, updated_at = ?4
             WHERE id = ?5",
            params![input.name, input.description, input.website, now(), id],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<(), ApiError> {
        conn.execute("DELETE FROM companies WHERE id = ?1", params![id])?;
        Ok(())
    }
}
