use crate::enums::ApplicationStatus;
use crate::errors::ApiError;
use crate::models::{now, Job};
use crate::visibility::ApplicationScope;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub applicant_id: i64,
    pub status: ApplicationStatus,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Application {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
        Ok(Application {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            applicant_id: row.get("applicant_id")?,
            status: row.get("status")?,
            resume: row.get("resume")?,
            cover_letter: row.get("cover_letter")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Creates an application for `applicant_id` (always the acting user; any
    /// client-supplied applicant is ignored upstream). Applying to an
    /// inactive job is a validation failure, not a permission one. The
    /// (job, applicant) UNIQUE constraint turns a duplicate into a Conflict
    /// even when two identical requests race.
    pub fn create(
        conn: &Connection,
        job: &Job,
        applicant_id: i64,
        resume: Option<String>,
        cover_letter: Option<String>,
    ) -> Result<Application, ApiError> {
        if !job.is_active {
            return Err(ApiError::Validation(
                "This job is no longer accepting applications".to_string(),
            ));
        }
        let ts = now();
        conn.execute(
            "INSERT INTO applications (job_id, applicant_id, status, resume, cover_letter, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                job.id,
                applicant_id,
                ApplicationStatus::Applied,
                resume,
                cover_letter,
                ts,
                ts
            ],
        )
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("You have already applied to this job".to_string())
            }
            other => other,
        })?;
        Ok(Application {
            id: conn.last_insert_rowid(),
            job_id: job.id,
            applicant_id,
            status: ApplicationStatus::Applied,
            resume,
            cover_letter,
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Application>, ApiError> {
        conn.query_row(
            "SELECT * FROM applications WHERE id = ?1",
            params![id],
            |row| Application::from_row(row),
        )
        .optional()
        .map_err(ApiError::from)
    }

    /// The owner of the company behind this application's job, needed for
    /// policy decisions on the application.
    pub fn company_owner(conn: &Connection, application_id: i64) -> Result<Option<i64>, ApiError> {
        conn.query_row(
            "SELECT c.owner_id
             FROM applications a
             JOIN jobs j ON a.job_id = j.id
             JOIN companies c ON j.company_id = c.id
             WHERE a.id = ?1",
            params![application_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(ApiError::from)
    }

    /// Listing under the visibility filter: exactly the union of "applications
    /// I submitted" and "applications to jobs of companies I own" for regular
    /// users; everything for admins; nothing for anonymous actors.
    pub fn list_visible(
        conn: &Connection,
        scope: ApplicationScope,
    ) -> Result<Vec<Application>, ApiError> {
        let collect = |sql: &str, bind: &[&dyn rusqlite::ToSql]| -> Result<Vec<Application>, ApiError> {
            let mut stmt = conn.prepare(sql)?;
            let apps = stmt
                .query_map(bind, |row| Application::from_row(row))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(apps)
        };

        match scope {
            ApplicationScope::Nothing => Ok(Vec::new()),
            ApplicationScope::All => collect(
                "SELECT * FROM applications ORDER BY created_at DESC, id DESC",
                &[],
            ),
            ApplicationScope::Participant(user_id) => collect(
                "SELECT a.* FROM applications a
                 JOIN jobs j ON a.job_id = j.id
                 JOIN companies c ON j.company_id = c.id
                 WHERE a.applicant_id = ?1 OR c.owner_id = ?1
                 ORDER BY a.created_at DESC, a.id DESC",
                &[&user_id],
            ),
        }
    }

    pub fn set_status(
        conn: &Connection,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        conn.execute(
            "UPDATE applications SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status, now(), id],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<(), ApiError> {
        conn.execute("DELETE FROM applications WHERE id = ?1", params![id])?;
        Ok(())
    }
}
