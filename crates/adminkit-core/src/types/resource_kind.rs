//! REST resource collections exposed by the admin API.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A CRUD resource collection on the admin API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Roles,
    Permissions,
    Customers,
    Leads,
    Projects,
    Tasks,
}

impl ResourceKind {
    /// Every resource collection.
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Users,
        ResourceKind::Roles,
        ResourceKind::Permissions,
        ResourceKind::Customers,
        ResourceKind::Leads,
        ResourceKind::Projects,
        ResourceKind::Tasks,
    ];

    /// Returns the endpoint path segment for this collection.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Users => "users",
            ResourceKind::Roles => "roles",
            ResourceKind::Permissions => "permissions",
            ResourceKind::Customers => "customers",
            ResourceKind::Leads => "leads",
            ResourceKind::Projects => "projects",
            ResourceKind::Tasks => "tasks",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.path() == s)
            .ok_or_else(|| {
                InvalidInputError::Other {
                    message: format!("unknown resource '{}'", s),
                }
                .into()
            })
    }
}
