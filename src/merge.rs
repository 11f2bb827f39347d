//! Drag transfer payloads and the drop merge resolver.
//!
//! A drag carries either one permission or a list of them, under two keys of
//! the same [`Transfer`]. The list key takes precedence when both are present.
//! Dropping onto a role is a set union keyed by permission id, so repeating a
//! drop changes nothing.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::constants::{TRANSFER_MANY, TRANSFER_ONE};
use crate::error::{malformed, Result};
use crate::model::{Permission, Role};
use crate::selection::Selection;

/// Keyed string data carried by one drag event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transfer {
    data: HashMap<String, String>,
}

impl Transfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, key: &str, value: impl Into<String>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Data under `key`; empty strings count as absent
    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str).filter(|s| !s.is_empty())
    }

    /// Transfer carrying one permission
    pub fn single(p: &Permission) -> Result<Self> {
        let mut t = Self::new();
        t.set_data(TRANSFER_ONE, serde_json::to_string(p).map_err(|e| malformed(e.to_string()))?);
        Ok(t)
    }

    /// Transfer carrying a list of permissions
    pub fn many(ps: &[&Permission]) -> Result<Self> {
        let mut t = Self::new();
        t.set_data(TRANSFER_MANY, serde_json::to_string(ps).map_err(|e| malformed(e.to_string()))?);
        Ok(t)
    }

    /// Start a drag of `dragged`.
    ///
    /// If `dragged` is part of a selection of two or more, every selected
    /// permission travels (in `permissions` order). Otherwise only `dragged`.
    pub fn from_selection(selection: &Selection, dragged: &Permission, permissions: &[Permission]) -> Result<Self> {
        if selection.is_selected(&dragged.id) && selection.len() > 1 {
            let picked = selection.selected_in(permissions);
            if picked.len() > 1 {
                return Self::many(&picked);
            }
        }
        Self::single(dragged)
    }
}

/// What a drop delivers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    One(Permission),
    Many(Vec<Permission>),
}

impl DropPayload {
    /// Decode a transfer: the list key first, then the single key.
    /// `Ok(None)` when the transfer carries neither.
    pub fn from_transfer(t: &Transfer) -> Result<Option<Self>> {
        if let Some(raw) = t.get_data(TRANSFER_MANY) {
            let ps: Vec<Permission> = serde_json::from_str(raw)
                .map_err(|e| malformed(format!("drag payload list: {}", e)))?;
            return Ok(Some(DropPayload::Many(ps)));
        }
        if let Some(raw) = t.get_data(TRANSFER_ONE) {
            let p: Permission = serde_json::from_str(raw)
                .map_err(|e| malformed(format!("drag payload: {}", e)))?;
            return Ok(Some(DropPayload::One(p)));
        }
        Ok(None)
    }

    pub fn permissions(&self) -> &[Permission] {
        match self {
            DropPayload::One(p) => std::slice::from_ref(p),
            DropPayload::Many(ps) => ps,
        }
    }
}

/// Merge a payload into `role`.
///
/// Returns the full updated role, or `None` when every payload permission is
/// already present (nothing to emit).
pub fn resolve_drop(payload: &DropPayload, role: &Role) -> Option<Role> {
    let mut seen: HashSet<&str> = role.permissions.iter().map(|p| p.id.as_str()).collect();
    let additions: Vec<Permission> = payload
        .permissions()
        .iter()
        .filter(|p| seen.insert(p.id.as_str()))
        .cloned()
        .collect();
    if additions.is_empty() {
        debug!(role = %role.id, "drop adds nothing");
        return None;
    }
    debug!(role = %role.id, added = additions.len(), "drop merged");
    let mut updated = role.clone();
    updated.permissions.extend(additions);
    Some(updated)
}

/// Remove permission `id` from `role`. Always yields an updated role, even if
/// `id` was not assigned.
pub fn remove_permission_from_role(role: &Role, id: &str) -> Role {
    let mut updated = role.clone();
    updated.permissions.retain(|p| p.id != id);
    updated
}
