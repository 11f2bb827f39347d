//! In-memory role/permission store.
//!
//! Holds the canonical collections. Every mutation is synchronous and visible
//! to the next read of any derived view.

use tracing::{info, warn};

use crate::model::{Permission, Role, State};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    permissions: Vec<Permission>,
    roles: Vec<Role>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: State) -> Self {
        let mut roles = state.roles;
        roles.iter_mut().for_each(dedup);
        Store { permissions: state.permissions, roles }
    }

    /// Snapshot of the collections in persisted shape
    pub fn to_state(&self) -> State {
        State { permissions: self.permissions.clone(), roles: self.roles.clone() }
    }

    #[inline]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    #[inline]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn permission(&self, id: &str) -> Option<&Permission> {
        self.permissions.iter().find(|p| p.id == id)
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    /// Append. The caller guarantees `p.id` is unique.
    pub fn add_permission(&mut self, p: Permission) {
        info!(id = %p.id, name = %p.name, "permission added");
        self.permissions.push(p);
    }

    /// Replace by id in the global collection only; role snapshots keep their
    /// copy. Returns whether a record was replaced.
    pub fn update_permission(&mut self, p: Permission) -> bool {
        match self.permissions.iter_mut().find(|x| x.id == p.id) {
            Some(slot) => {
                info!(id = %p.id, "permission updated");
                *slot = p;
                true
            }
            None => false,
        }
    }

    /// Remove from the global collection and from every role.
    /// Returns whether the permission existed globally.
    pub fn delete_permission(&mut self, id: &str) -> bool {
        self.delete_permission_cascade(id).0
    }

    /// `delete_permission`, also returning the ids of roles that lost it
    pub fn delete_permission_cascade(&mut self, id: &str) -> (bool, Vec<String>) {
        let before = self.permissions.len();
        self.permissions.retain(|p| p.id != id);
        let mut touched = Vec::new();
        for r in &mut self.roles {
            let n = r.permissions.len();
            r.permissions.retain(|p| p.id != id);
            if r.permissions.len() != n {
                touched.push(r.id.clone());
            }
        }
        let existed = self.permissions.len() != before;
        info!(id, existed, cascaded = touched.len(), "permission deleted");
        (existed, touched)
    }

    /// Append. The caller guarantees `r.id` is unique. Repeated permission
    /// ids in `r` are collapsed, first wins.
    pub fn add_role(&mut self, mut r: Role) {
        dedup(&mut r);
        info!(id = %r.id, name = %r.name, "role added");
        self.roles.push(r);
    }

    /// Remove a role; the global permission collection is untouched
    pub fn delete_role(&mut self, id: &str) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| r.id != id);
        let existed = self.roles.len() != before;
        info!(id, existed, "role deleted");
        existed
    }

    /// Replace by id; no-op if absent. Returns whether a record was replaced.
    /// Repeated permission ids in `r` are collapsed, first wins.
    pub fn update_role(&mut self, mut r: Role) -> bool {
        dedup(&mut r);
        match self.roles.iter_mut().find(|x| x.id == r.id) {
            Some(slot) => {
                info!(id = %r.id, permissions = r.permissions.len(), "role updated");
                *slot = r;
                true
            }
            None => false,
        }
    }
}

fn dedup(r: &mut Role) {
    let dropped = r.dedup_permissions();
    if dropped > 0 {
        warn!(role = %r.id, dropped, "collapsed duplicate role permissions");
    }
}
