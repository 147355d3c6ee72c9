use crate::enums::{Currency, ExperienceLevel, JobMode};
use crate::errors::ApiError;
use crate::models::now;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub company_id: i64,
    pub location: String,
    pub posted_by: i64,
    pub is_active: bool,
    pub experience: Option<ExperienceLevel>,
    pub min_experience_years: Option<i64>,
    pub max_experience_years: Option<i64>,
    pub mode: Option<JobMode>,
    pub salary: Option<i64>,
    pub salary_currency: Option<Currency>,
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub company: i64,
    pub location: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub experience: Option<ExperienceLevel>,
    pub min_experience_years: Option<i64>,
    pub max_experience_years: Option<i64>,
    pub mode: Option<JobMode>,
    pub salary: Option<i64>,
    pub salary_currency: Option<Currency>,
    pub category: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Search/filter parameters for the public job list. Every filter narrows the
/// already-visibility-filtered (active-only) set; none of them can widen it.
#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub company_id: Option<i64>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub experience: Option<ExperienceLevel>,
    pub mode: Option<JobMode>,
    pub salary_currency: Option<Currency>,
    pub salary_gt: Option<i64>,
    pub salary_lt: Option<i64>,
    pub salary_gte: Option<i64>,
    pub salary_lte: Option<i64>,
    pub min_experience_years_gte: Option<i64>,
    pub min_experience_years_lte: Option<i64>,
    pub max_experience_years_gte: Option<i64>,
    pub max_experience_years_lte: Option<i64>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Job title must not be empty".to_string()));
        }
        if let Some(salary) = self.salary {
            if salary < 0 {
                return Err(ApiError::Validation(
                    "Salary must be a non-negative integer".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Job {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            company_id: row.get("company_id")?,
            location: row.get("location")?,
            posted_by: row.get("posted_by")?,
            is_active: row.get("is_active")?,
            experience: row.get("experience")?,
            min_experience_years: row.get("min_experience_years")?,
            max_experience_years: row.get("max_experience_years")?,
            mode: row.get("mode")?,
            salary: row.get("salary")?,
            salary_currency: row.get("salary_currency")?,
            category: row.get("category")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, new: &NewJob, posted_by: i64) -> Result<Job, ApiError> {
        new.validate()?;
        let ts = now();
        conn.execute(
            "INSERT INTO jobs (title, description, company_id, location, posted_by, is_active,
                               experience, min_experience_years, max_experience_years, mode,
                               salary, salary_currency, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                new.title,
                new.description,
                new.company,
                new.location,
                posted_by,
                new.is_active,
                new.experience,
                new.min_experience_years,
                new.max_experience_years,
                new.mode,
                new.salary,
                new.salary_currency,
                new.category,
                ts,
                ts
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Job {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            company_id: new.company,
            location: new.location.clone(),
            posted_by,
            is_active: new.is_active,
            experience: new.experience,
            min_experience_years: new.min_experience_years,
            max_experience_years: new.max_experience_years,
            mode: new.mode,
            salary: new.salary,
            salary_currency: new.salary_currency,
            category: new.category.clone(),
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    /// Detail lookup by id. Deliberately does not filter on is_active: a job
    /// someone already has a link to stays retrievable after deactivation.
    pub fn get(conn: &Connection, id: i64) -> Result<Option<Job>, ApiError> {
        conn.query_row("SELECT * FROM jobs WHERE id = ?1", params![id], |row| {
            Job::from_row(row)
        })
        .optional()
        .map_err(ApiError::from)
    }

    /// Public listing: active jobs only, newest first, ten per page.
    pub fn list(conn: &Connection, filters: &JobFilters) -> Result<Vec<Job>, ApiError> {
        let mut sql = String::from("SELECT * FROM jobs WHERE is_active = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        let mut push = |sql: &mut String, clause: &str, value: Box<dyn ToSql>| {
            sql.push_str(clause);
            values.push(value);
        };

        if let Some(id) = filters.company_id {
            push(&mut sql, " AND company_id = ?", Box::new(id));
        }
        if let Some(location) = &filters.location {
            push(&mut sql, " AND location = ?", Box::new(location.clone()));
        }
        if let Some(category) = &filters.category {
            push(&mut sql, " AND category = ?", Box::new(category.clone()));
        }
        if let Some(experience) = filters.experience {
            push(&mut sql, " AND experience = ?", Box::new(experience));
        }
        if let Some(mode) = filters.mode {
            push(&mut sql, " AND mode = ?", Box::new(mode));
        }
        if let Some(currency) = filters.salary_currency {
            push(&mut sql, " AND salary_currency = ?", Box::new(currency));
        }
        if let Some(v) = filters.salary_gt {
            push(&mut sql, " AND salary > ?", Box::new(v));
        }
        if let Some(v) = filters.salary_lt {
            push(&mut sql, " AND salary < ?", Box::new(v));
        }
        if let Some(v) = filters.salary_gte {
            push(&mut sql, " AND salary >= ?", Box::new(v));
        }
        if let Some(v) = filters.salary_lte {
            push(&mut sql, " AND salary <= ?", Box::new(v));
        }
        if let Some(v) = filters.min_experience_years_gte {
            push(&mut sql, " AND min_experience_years >= ?", Box::new(v));
        }
        if let Some(v) = filters.min_experience_years_lte {
            push(&mut sql, " AND min_experience_years <= ?", Box::new(v));
        }
        if let Some(v) = filters.max_experience_years_gte {
            push(&mut sql, " AND max_experience_years >= ?", Box::new(v));
        }
        if let Some(v) = filters.max_experience_years_lte {
            push(&mut sql, " AND max_experience_years <= ?", Box::new(v));
        }
        if let Some(term) = &filters.search {
            let like = format!("%{}%", term);
            sql.push_str(" AND (title LIKE ? OR description LIKE ? OR category LIKE ?)");
            values.push(Box::new(like.clone()));
            values.push(Box::new(like.clone()));
            values.push(Box::new(like));
        }

        // widen before multiplying: page is client-controlled and u32 offset
        // arithmetic would wrap on large values
        let page = i64::from(filters.page.unwrap_or(1).max(1));
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        values.push(Box::new(i64::from(PAGE_SIZE)));
        values.push(Box::new((page - 1) * i64::from(PAGE_SIZE)));

        let mut stmt = conn.prepare(&sql)?;
        let jobs = stmt
            .query_map(params_from_iter(values), |row| Job::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    pub fn update(conn: &Connection, id: i64, new: &NewJob) -> Result<(), ApiError> {
        new.validate()?;
        conn.execute(
            "UPDATE jobs SET title = ?1, description = ?2, company_id = ?3, location = ?4,
                             is_active = ?5, experience = ?6, min_experience_years = ?7,
                             max_experience_years = ?8, mode = ?9, salary = ?10,
                             salary_currency = ?11, category = ?12, updated_at = ?13
             WHERE id = ?14",
            params![
                new.title,
                new.description,
                new.company,
                new.location,
                new.is_active,
                new.experience,
                new.min_experience_years,
                new.max_experience_years,
                new.mode,
                new.salary,
                new.salary_currency,
                new.category,
                now(),
                id
            ],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<(), ApiError> {
        conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_test_db;
    use crate::test_support::{seed_company, seed_job, seed_user};

    #[test]
    fn listing_only_returns_active_jobs_newest_first() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "alice@x.com");
        let company = seed_company(&conn, owner);
        let first = seed_job(&conn, company, owner, "Old");
        let second = seed_job(&conn, company, owner, "New");
        let inactive = seed_job(&conn, company, owner, "Hidden");
        conn.execute("UPDATE jobs SET is_active = 0 WHERE id = ?1", params![inactive])
            .unwrap();

        let jobs = Job::list(&conn, &JobFilters::default()).unwrap();
        let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn detail_lookup_ignores_is_active() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "alice@x.com");
        let company = seed_company(&conn, owner);
        let job = seed_job(&conn, company, owner, "Engineer");
        conn.execute("UPDATE jobs SET is_active = 0 WHERE id = ?1", params![job])
            .unwrap();
        assert!(Job::get(&conn, job).unwrap().is_some());
    }

    #[test]
    fn filters_narrow_the_active_set() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "alice@x.com");
        let company = seed_company(&conn, owner);
        let cheap = seed_job(&conn, company, owner, "Junior");
        let expensive = seed_job(&conn, company, owner, "Principal");
        conn.execute(
            "UPDATE jobs SET salary = 50000, salary_currency = 'USD' WHERE id = ?1",
            params![cheap],
        )
        .unwrap();
        conn.execute(
            "UPDATE jobs SET salary = 200000, salary_currency = 'KES' WHERE id = ?1",
            params![expensive],
        )
        .unwrap();

        let filters = JobFilters {
            salary_gte: Some(100_000),
            ..JobFilters::default()
        };
        let jobs = Job::list(&conn, &filters).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, expensive);

        let filters = JobFilters {
            salary_currency: Some(Currency::USD),
            ..JobFilters::default()
        };
        let jobs = Job::list(&conn, &filters).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, cheap);

        // a filter can never resurrect an inactive job
        conn.execute("UPDATE jobs SET is_active = 0 WHERE id = ?1", params![expensive])
            .unwrap();
        let filters = JobFilters {
            salary_gte: Some(100_000),
            ..JobFilters::default()
        };
        assert!(Job::list(&conn, &filters).unwrap().is_empty());
    }

    #[test]
    fn search_matches_title_description_and_category() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "alice@x.com");
        let company = seed_company(&conn, owner);
        let job = seed_job(&conn, company, owner, "Backend Engineer");
        seed_job(&conn, company, owner, "Designer");

        let filters = JobFilters {
            search: Some("Backend".to_string()),
            ..JobFilters::default()
        };
        let jobs = Job::list(&conn, &filters).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, job);
    }

    #[test]
    fn pagination_is_ten_per_page() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "alice@x.com");
        let company = seed_company(&conn, owner);
        for i in 0..15 {
            seed_job(&conn, company, owner, &format!("Job {}", i));
        }
        let first = Job::list(&conn, &JobFilters::default()).unwrap();
        assert_eq!(first.len(), 10);
        let second = Job::list(
            &conn,
            &JobFilters {
                page: Some(2),
                ..JobFilters::default()
            },
        )
        .unwrap();
        assert_eq!(second.len(), 5);
        assert!(first.iter().all(|j| second.iter().all(|k| k.id != j.id)));
    }

    #[test]
    fn an_absurdly_large_page_number_yields_an_empty_page() {
        let conn = open_test_db();
        let owner = seed_user(&conn, "alice@x.com");
        let company = seed_company(&conn, owner);
        seed_job(&conn, company, owner, "Engineer");

        let filters = JobFilters {
            page: Some(u32::MAX),
            ..JobFilters::default()
        };
        assert!(Job::list(&conn, &filters).unwrap().is_empty());
    }

    #[test]
    fn negative_salary_is_rejected() {
        let new = NewJob {
            title: "Engineer".to_string(),
            description: "d".to_string(),
            company: 1,
            location: "Remote".to_string(),
            is_active: true,
            experience: None,
            min_experience_years: None,
            max_experience_years: None,
            mode: None,
            salary: Some(-1),
            salary_currency: Some(Currency::USD),
            category: None,
        };
        assert!(matches!(new.validate(), Err(ApiError::Validation(_))));
    }
}
