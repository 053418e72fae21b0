use crate::model::Time;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identity of a caller, as handed over by the transport.
///
/// Unauthenticated callers are [`Principal::Anonymous`], a variant of its own, so no
/// identity text can ever be mistaken for it. Blank text never authenticates anyone
/// and also yields `Anonymous`. On the wire `Anonymous` is `null`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Principal {
    Anonymous,
    Authenticated(String),
}

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::Anonymous
        } else {
            Self::Authenticated(text)
        }
    }

    /// The identity of an unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("<anonymous>"),
            Self::Authenticated(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Principal {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<Option<String>> for Principal {
    fn from(text: Option<String>) -> Self {
        text.map_or(Self::Anonymous, Self::new)
    }
}

impl From<Principal> for Option<String> {
    fn from(principal: Principal) -> Self {
        match principal {
            Principal::Anonymous => None,
            Principal::Authenticated(text) => Some(text),
        }
    }
}

/// Profile a user saves about themselves. Replaced wholesale on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, room_number: Option<String>) -> Self {
        Self {
            name: name.into(),
            room_number,
        }
    }
}

/// Access level of a principal.
///
/// Anonymous callers are always `Guest`; authenticated callers without an assignment
/// are `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        };
        f.write_str(name)
    }
}

/// Explicit role assignment for one principal, managed by the role actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub principal: Principal,
    pub role: UserRole,
    /// `None` for admins seeded from configuration at startup.
    pub assigned_by: Option<Principal>,
    pub assigned_at: Time,
}

/// Payload for assigning (or re-assigning) a role.
#[derive(Debug, Clone)]
pub struct RoleAssign {
    pub role: UserRole,
    pub assigned_by: Option<Principal>,
    pub assigned_at: Time,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"guest\"").unwrap();
        assert_eq!(role, UserRole::Guest);
    }

    #[test]
    fn test_profile_without_room_omits_field() {
        let json = serde_json::to_value(UserProfile::new("Asha", None)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Asha" }));
    }

    #[test]
    fn test_anonymous_principal() {
        assert!(Principal::anonymous().is_anonymous());
        assert!(!Principal::new("aaaaa-aa").is_anonymous());
        // no text collides with the anonymous variant
        assert!(!Principal::new("anonymous").is_anonymous());
        assert!(Principal::new("").is_anonymous());
        assert!(Principal::new("   ").is_anonymous());
    }

    #[test]
    fn test_principal_wire_form() {
        assert_eq!(serde_json::to_value(Principal::anonymous()).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Principal::new("aaaaa-aa")).unwrap(), serde_json::json!("aaaaa-aa"));
        let back: Principal = serde_json::from_str("null").unwrap();
        assert!(back.is_anonymous());
    }
}
