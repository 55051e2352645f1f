//! Entity types for the resource collections.

use serde::{Deserialize, Serialize};

use super::Entity;
use crate::types::EntityId;

/// Role reference embedded in a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub name: String,
}

/// An application user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
    /// Only sent when creating or changing a password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl User {
    /// Returns true if the user holds the named role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }
}

impl Entity for User {
    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

/// A role and the permissions it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Entity for Role {
    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

/// A grantable permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
}

impl Entity for Permission {
    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}

/// A schema-agnostic entity: an id plus arbitrary JSON fields.
///
/// Customers, leads, projects and tasks are handled as records; their shape
/// is left to higher layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }
}

impl Entity for Record {
    fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }
}
