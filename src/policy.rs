//! Role & ownership policy. Every handler funnels its write (and protected
//! read) decisions through [`can_perform`] so the rules live in one place
//! instead of drifting per resource.

use crate::auth::AuthUser;
use crate::enums::Role;
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// The ownership facts the policy needs about the thing being acted on.
/// `None` ids mean the record does not exist yet (a create).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Company { owner_id: Option<i64> },
    /// For create, `company_owner_id` is the owner of the company the job is
    /// being posted under; for update/delete it is the owner of the job's
    /// company.
    Job { company_owner_id: i64 },
    JobRead,
    Application {
        applicant_id: Option<i64>,
        company_owner_id: Option<i64>,
    },
    Favorite { owner_id: Option<i64> },
    /// The full user directory (admin-only listing).
    UserDirectory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
    NotAuthenticated,
}

impl Decision {
    /// Converts a decision into the error the boundary reports: 401 for a
    /// missing actor, 403 for an actor that lacks the required relation.
    pub fn require(self) -> Result<(), ApiError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::NotAuthenticated => Err(ApiError::not_authenticated()),
            Decision::Forbidden => Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            )),
        }
    }
}

fn is_admin(user: &AuthUser) -> bool {
    user.is_superuser || user.role == Role::Admin
}

/// The decision function. Rules are evaluated in order, first match wins:
///
/// 1. admin/superuser override for everything except favorites;
/// 2. public reads (companies, jobs);
/// 3. everything else requires an actor, then an ownership relation.
pub fn can_perform(actor: Option<&AuthUser>, action: Action, target: Target) -> Decision {
    if let Some(user) = actor {
        let admin_override = !matches!(target, Target::Favorite { .. });
        if admin_override && is_admin(user) {
            return Decision::Allow;
        }
    }

    // public reads, anonymous included
    match (target, action) {
        (Target::Company { .. }, Action::Read) | (Target::JobRead, Action::Read) => {
            return Decision::Allow;
        }
        _ => {}
    }

    let Some(user) = actor else {
        return Decision::NotAuthenticated;
    };

    match (target, action) {
        // any authenticated user may start a company (they become its owner)
        (Target::Company { owner_id: None }, Action::Create) => Decision::Allow,
        (Target::Company { owner_id: Some(owner) }, Action::Update | Action::Delete) => {
            owned(owner, user)
        }

        // posting a job requires owning the company it is posted under; an
        // authenticated non-owner is Forbidden, not NotAuthenticated
        (Target::Job { company_owner_id }, Action::Create) => owned(company_owner_id, user),
        (Target::Job { company_owner_id }, Action::Update | Action::Delete) => {
            owned(company_owner_id, user)
        }

        // anyone signed in may apply; the applicant is forced to the actor
        // and job-active checking is a validation concern elsewhere
        (
            Target::Application {
                applicant_id: None,
                company_owner_id: None,
            },
            Action::Create,
        ) => Decision::Allow,
        // an application is readable by its applicant or the hiring side
        (
            Target::Application {
                applicant_id: Some(applicant),
                company_owner_id: Some(owner),
            },
            Action::Read,
        ) => {
            if user.id == applicant || user.id == owner {
                Decision::Allow
            } else {
                Decision::Forbidden
            }
        }
        // only the hiring side moves an application through the pipeline;
        // the applicant may never change status, not even on their own record
        (
            Target::Application {
                company_owner_id: Some(owner),
                ..
            },
            Action::Update | Action::Delete,
        ) => owned(owner, user),

        // favorites are strictly personal, with no admin override
        (Target::Favorite { owner_id: None }, Action::Create | Action::Read) => Decision::Allow,
        (Target::Favorite { owner_id: Some(owner) }, _) => owned(owner, user),

        (Target::UserDirectory, Action::Read) => {
            if is_admin(user) {
                Decision::Allow
            } else {
                Decision::Forbidden
            }
        }

        _ => Decision::Forbidden,
    }
}

fn owned(owner_id: i64, user: &AuthUser) -> Decision {
    if owner_id == user.id {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}
