use crate::auth::AuthUser;
use crate::enums::Role;

/// Read-path narrowing for application listings, decided once per request and
/// interpreted by the persistence layer.
///
/// Company and job reads are public and need no scope. Favorites are always
/// scoped to the actor (there is no admin override for favorites), so their
/// narrowing is just the actor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    /// Anonymous actors see no applications at all.
    Nothing,
    /// A regular user sees applications they submitted plus applications to
    /// jobs whose company they own.
    Participant(i64),
    /// Admins and superusers see everything.
    All,
}

pub fn application_scope(actor: Option<&AuthUser>) -> ApplicationScope {
    match actor {
        None => ApplicationScope::Nothing,
        Some(user) if user.is_superuser || user.role == Role::Admin => ApplicationScope::All,
        Some(user) => ApplicationScope::Participant(user.id),
    }
}
