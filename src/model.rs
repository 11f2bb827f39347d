//! Permission and Role records

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::new_id;

/// An atomic named capability, e.g. `users.edit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Permission {
    /// Create a permission with a fresh id from user input. The category is
    /// trimmed and a blank one becomes `None`.
    pub fn new(name: &str, description: &str, category: Option<&str>) -> Result<Self> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        Ok(Self::with_id(new_id()?, name, description, category))
    }

    /// Create a permission with a caller-chosen id. Fields are stored as given.
    pub fn with_id(id: impl Into<String>, name: &str, description: &str, category: Option<&str>) -> Self {
        Permission {
            id: id.into(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.map(str::to_string),
        }
    }

    /// The explicit category, if set and non-blank
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// A named bundle of permission snapshots.
///
/// `permissions` holds copies taken at assignment time; editing or deleting
/// the source permission does not touch them (deletion is cascaded by the
/// store). No two entries share an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

impl Role {
    /// Create an empty role with a fresh id
    pub fn new(name: &str, description: &str) -> Result<Self> {
        Ok(Self::with_id(new_id()?, name, description))
    }

    /// Create an empty role with a caller-chosen id
    pub fn with_id(id: impl Into<String>, name: &str, description: &str) -> Self {
        Role {
            id: id.into(),
            name: name.to_string(),
            description: description.to_string(),
            permissions: Vec::new(),
        }
    }

    #[inline]
    pub fn has_permission(&self, id: &str) -> bool {
        self.permissions.iter().any(|p| p.id == id)
    }

    /// Drop repeated permission ids, keeping the first. Returns how many
    /// entries were removed.
    pub fn dedup_permissions(&mut self) -> usize {
        let before = self.permissions.len();
        let mut seen = HashSet::new();
        self.permissions.retain(|p| seen.insert(p.id.clone()));
        before - self.permissions.len()
    }
}

/// The persisted document: `{ permissions: [...], roles: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
}
