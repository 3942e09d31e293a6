//! Session context resolved once from local storage.
//!
//! Callers receive the resolved `SessionContext` explicitly instead of
//! reading storage themselves. The core rules only read it.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreDeskError;
use crate::local_storage::{LocalStorage, CUSTOMER_KEY, USER_KEY};
use crate::queries::TicketCriteria;

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operador,
    Gestor,
    Admin,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operador => "operador",
            Role::Gestor => "gestor",
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreDeskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "operador" => Ok(Role::Operador),
            "gestor" => Ok(Role::Gestor),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            other => Err(CoreDeskError::Session(format!("unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

/// Identity of whoever is using the helpdesk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    Customer { username: String },
    Staff { username: String, role: Role },
}

impl SessionContext {
    pub fn username(&self) -> &str {
        match self {
            SessionContext::Customer { username } | SessionContext::Staff { username, .. } => {
                username
            }
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            SessionContext::Customer { .. } => None,
            SessionContext::Staff { role, .. } => Some(*role),
        }
    }

    /// Narrow criteria to what this session may browse.
    ///
    /// Customers only see the tickets they requested; staff see everything.
    pub fn scope(&self, criteria: TicketCriteria) -> TicketCriteria {
        match self {
            SessionContext::Customer { username } => criteria.with_requester(username.clone()),
            SessionContext::Staff { .. } => criteria,
        }
    }
}

impl Display for SessionContext {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SessionContext::Customer { username } => write!(formatter, "{username} (customer)"),
            SessionContext::Staff { username, role } => write!(formatter, "{username} ({role})"),
        }
    }
}

fn parse_identity(key: &str, raw: &str) -> Result<StoredIdentity, CoreDeskError> {
    let identity: StoredIdentity = serde_json::from_str(raw)
        .map_err(|error| CoreDeskError::Session(format!("invalid {key} entry: {error}")))?;
    if identity.username.trim().is_empty() {
        return Err(CoreDeskError::Session(format!(
            "{key} entry has an empty username"
        )));
    }
    Ok(identity)
}

/// Resolve the session from storage.
///
/// The staff entry wins when both entries are present.
///
/// # Errors
/// Returns `CoreDeskError::Session` if an entry is malformed or a staff
/// entry carries no role.
pub fn resolve_session(storage: &LocalStorage) -> Result<Option<SessionContext>, CoreDeskError> {
    if let Some(raw) = storage.get(USER_KEY) {
        let identity = parse_identity(USER_KEY, raw)?;
        let role = identity
            .role
            .ok_or_else(|| CoreDeskError::Session(format!("{USER_KEY} entry has no role")))?;
        return Ok(Some(SessionContext::Staff {
            username: identity.username,
            role,
        }));
    }
    if let Some(raw) = storage.get(CUSTOMER_KEY) {
        let identity = parse_identity(CUSTOMER_KEY, raw)?;
        return Ok(Some(SessionContext::Customer {
            username: identity.username,
        }));
    }
    Ok(None)
}

/// Record a session in storage, replacing any previous one.
///
/// # Errors
/// Returns `CoreDeskError::Session` if the username is blank.
pub fn store_session(storage: &mut LocalStorage, session: &SessionContext) -> Result<(), CoreDeskError> {
    let username = session.username().trim();
    if username.is_empty() {
        return Err(CoreDeskError::Session("username is required".to_string()));
    }
    let identity = StoredIdentity {
        username: username.to_string(),
        role: session.role(),
    };
    let json = serde_json::to_string(&identity).map_err(|error| CoreDeskError::Io(error.to_string()))?;
    clear_session(storage);
    let key = match session {
        SessionContext::Customer { .. } => CUSTOMER_KEY,
        SessionContext::Staff { .. } => USER_KEY,
    };
    storage.set(key, json);
    Ok(())
}

/// Remove both session entries.
pub fn clear_session(storage: &mut LocalStorage) {
    storage.remove(CUSTOMER_KEY);
    storage.remove(USER_KEY);
}
