use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed enumerations for role/status/mode style fields. Values outside the
/// set are rejected at the boundary (serde or `FromStr`), never stored.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Intern,
    Entry,
    Mid,
    Senior,
    Lead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    Remote,
    Onsite,
    Hybrid,
    #[serde(rename = "full-time")]
    FullTime,
    Contract,
    #[serde(rename = "part-time")]
    PartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    USD,
    KES,
    NGN,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Review,
    Interview,
    Rejected,
    Hired,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Role, String> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Intern => "intern",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<ExperienceLevel, String> {
        match s {
            "intern" => Ok(ExperienceLevel::Intern),
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            other => Err(format!("Unknown experience level: {}", other)),
        }
    }
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Remote => "remote",
            JobMode::Onsite => "onsite",
            JobMode::Hybrid => "hybrid",
            JobMode::FullTime => "full-time",
            JobMode::Contract => "contract",
            JobMode::PartTime => "part-time",
        }
    }
}

impl FromStr for JobMode {
    type Err = String;

    fn from_str(s: &str) -> Result<JobMode, String> {
        match s {
            "remote" => Ok(JobMode::Remote),
            "onsite" => Ok(JobMode::Onsite),
            "hybrid" => Ok(JobMode::Hybrid),
            "full-time" => Ok(JobMode::FullTime),
            "contract" => Ok(JobMode::Contract),
            "part-time" => Ok(JobMode::PartTime),
            other => Err(format!("Unknown job mode: {}", other)),
        }
    }
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::KES => "KES",
            Currency::NGN => "NGN",
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Currency, String> {
        match s {
            "USD" => Ok(Currency::USD),
            "KES" => Ok(Currency::KES),
            "NGN" => Ok(Currency::NGN),
            other => Err(format!("Unknown currency: {}", other)),
        }
    }
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Review => "review",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<ApplicationStatus, String> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "review" => Ok(ApplicationStatus::Review),
            "interview" => Ok(ApplicationStatus::Interview),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "hired" => Ok(ApplicationStatus::Hired),
            other => Err(format!("Unknown application status: {}", other)),
        }
    }
}

macro_rules! text_column {
    ($t:ty) => {
        impl ToSql for $t {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl FromSql for $t {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<$t> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: String| FromSqlError::Other(e.into()))
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_column!(Role);
text_column!(ExperienceLevel);
text_column!(JobMode);
text_column!(Currency);
text_column!(ApplicationStatus);
