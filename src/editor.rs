//! Editor session.
//!
//! Owns the store, the palette selection and the persistence backend, and
//! wires them together: every mutation updates the store, notifies role
//! listeners once per role whose value changed (drops, removals, explicit
//! updates, the permission-deletion cascade, imports), then saves. Storage
//! failures are logged and switch the session to memory-only mode; they
//! never surface as errors from a mutation.

use std::path::Path;

use tracing::{info, warn};

use crate::config::EditorConfig;
use crate::db::{MemoryStore, StateStore};
use crate::error::{Error, Result};
use crate::grouping::{self, Groups};
use crate::interchange::{deserialize, serialize};
use crate::merge::{remove_permission_from_role, resolve_drop, DropPayload, Transfer};
use crate::model::{Permission, Role};
use crate::selection::Selection;
use crate::store::Store;

/// Called with the full new value of every updated role
pub type RoleListener = Box<dyn FnMut(&Role)>;

pub struct Editor<S: StateStore = MemoryStore> {
    config: EditorConfig,
    store: Store,
    selection: Selection,
    backend: S,
    memory_only: bool,
    listeners: Vec<RoleListener>,
}

impl Editor<MemoryStore> {
    /// Session backed by a fresh in-process store
    pub fn in_memory(config: EditorConfig) -> Self {
        Self::open(config, MemoryStore::new())
    }
}

impl<S: StateStore> Editor<S> {
    /// Start a session from whatever `backend` holds.
    ///
    /// An unavailable backend or unreadable saved data yields an empty
    /// memory-only session, so the saved document is never overwritten.
    /// Importing a document re-enables saving.
    pub fn open(config: EditorConfig, backend: S) -> Self {
        let mut memory_only = false;
        let store = match backend.load() {
            Ok(Some(state)) => {
                info!(permissions = state.permissions.len(), roles = state.roles.len(), "loaded saved state");
                Store::from_state(state)
            }
            Ok(None) => Store::new(),
            Err(e @ Error::PersistenceUnavailable(_)) => {
                warn!(error = %e, "storage unavailable, continuing in memory only");
                memory_only = true;
                Store::new()
            }
            Err(e) => {
                warn!(error = %e, "unreadable saved state left untouched, continuing in memory only");
                memory_only = true;
                Store::new()
            }
        };
        Editor { config, store, selection: Selection::new(), backend, memory_only, listeners: Vec::new() }
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[inline]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[inline]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Whether saving has been given up for this session
    #[inline]
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Role) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // Views

    pub fn groups_by_action(&self) -> Groups {
        grouping::group_by_action_with(self.store.permissions(), &self.config.action_fallback)
    }

    pub fn groups_by_category(&self) -> Groups {
        grouping::group_by_category_with(self.store.permissions(), &self.config.uncategorized_label)
    }

    /// Action groups over permissions matching `query`
    pub fn search_by_action(&self, query: &str) -> Groups {
        let hits = grouping::filter(self.store.permissions(), query);
        grouping::group_by_action_with(hits, &self.config.action_fallback)
    }

    /// Category groups over permissions matching `query`
    pub fn search_by_category(&self, query: &str) -> Groups {
        let hits = grouping::filter(self.store.permissions(), query);
        grouping::group_by_category_with(hits, &self.config.uncategorized_label)
    }

    /// Category groups over one role's assigned permissions
    pub fn role_groups(&self, role_id: &str) -> Option<Groups> {
        let role = self.store.role(role_id)?;
        Some(grouping::group_by_category_with(&role.permissions, &self.config.uncategorized_label))
    }

    // Permissions

    /// Create and add a permission with a fresh id
    pub fn create_permission(&mut self, name: &str, description: &str, category: Option<&str>) -> Result<Permission> {
        let p = Permission::new(name, description, category)?;
        self.add_permission(p.clone());
        Ok(p)
    }

    pub fn add_permission(&mut self, p: Permission) {
        self.store.add_permission(p);
        self.persist();
    }

    pub fn update_permission(&mut self, p: Permission) -> bool {
        let replaced = self.store.update_permission(p);
        if replaced {
            self.persist();
        }
        replaced
    }

    /// Delete globally, from every role, and from the selection. Each role
    /// that lost the permission is announced to listeners.
    pub fn delete_permission(&mut self, id: &str) -> bool {
        let (existed, touched) = self.store.delete_permission_cascade(id);
        self.selection.remove(id);
        for role_id in &touched {
            if let Some(role) = self.store.role(role_id) {
                notify(&mut self.listeners, role);
            }
        }
        self.persist();
        existed
    }

    // Roles

    /// Create and add an empty role with a fresh id
    pub fn create_role(&mut self, name: &str, description: &str) -> Result<Role> {
        let r = Role::new(name, description)?;
        self.add_role(r.clone());
        Ok(r)
    }

    pub fn add_role(&mut self, r: Role) {
        self.store.add_role(r);
        self.persist();
    }

    pub fn delete_role(&mut self, id: &str) -> bool {
        let existed = self.store.delete_role(id);
        if existed {
            self.persist();
        }
        existed
    }

    /// Replace by id and notify; no-op if the role does not exist
    pub fn update_role(&mut self, r: Role) -> bool {
        if self.store.role(&r.id).is_none() {
            return false;
        }
        self.emit(r);
        true
    }

    // Drag and drop

    /// Build the transfer for dragging permission `id` from the palette
    pub fn begin_drag(&self, id: &str) -> Result<Option<Transfer>> {
        match self.store.permission(id) {
            Some(p) => Transfer::from_selection(&self.selection, p, self.store.permissions()).map(Some),
            None => Ok(None),
        }
    }

    /// Decode `transfer` and merge it into role `role_id`.
    /// Returns whether the role changed.
    pub fn drop_on_role(&mut self, role_id: &str, transfer: &Transfer) -> Result<bool> {
        match DropPayload::from_transfer(transfer)? {
            Some(payload) => Ok(self.drop_payload(role_id, &payload)),
            None => Ok(false),
        }
    }

    /// Merge `payload` into role `role_id`; emits only if something was added
    pub fn drop_payload(&mut self, role_id: &str, payload: &DropPayload) -> bool {
        let updated = match self.store.role(role_id) {
            Some(role) => resolve_drop(payload, role),
            None => return false,
        };
        match updated {
            Some(role) => {
                self.emit(role);
                true
            }
            None => false,
        }
    }

    /// Drop the current selection onto a role, clearing the selection if it
    /// changed the role
    pub fn assign_selected(&mut self, role_id: &str) -> bool {
        let picked: Vec<Permission> =
            self.selection.selected_in(self.store.permissions()).into_iter().cloned().collect();
        if picked.is_empty() {
            return false;
        }
        let changed = self.drop_payload(role_id, &DropPayload::Many(picked));
        if changed {
            self.selection.clear();
        }
        changed
    }

    /// Remove a permission from one role. Emits even if it was not assigned;
    /// returns false only when the role does not exist.
    pub fn remove_from_role(&mut self, role_id: &str, permission_id: &str) -> bool {
        let updated = match self.store.role(role_id) {
            Some(role) => remove_permission_from_role(role, permission_id),
            None => return false,
        };
        self.emit(updated);
        true
    }

    // Import / export

    pub fn export_json(&self) -> Result<String> {
        serialize(&self.store.to_state())
    }

    /// Replace the whole state with an imported document and announce every
    /// imported role. On error nothing changes. A successful import leaves
    /// memory-only mode caused by unreadable saved data.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let state = deserialize(text)?;
        info!(permissions = state.permissions.len(), roles = state.roles.len(), "imported state");
        self.store = Store::from_state(state);
        self.selection.clear();
        for role in self.store.roles() {
            notify(&mut self.listeners, role);
        }
        if self.memory_only && self.backend.revision().is_ok() {
            info!("storage reachable, saving imported state");
            self.memory_only = false;
        }
        self.persist();
        Ok(())
    }

    pub fn export_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }

    pub fn import_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.import_json(&text)
    }

    fn emit(&mut self, mut role: Role) {
        role.dedup_permissions();
        self.store.update_role(role.clone());
        notify(&mut self.listeners, &role);
        self.persist();
    }

    fn persist(&mut self) {
        if self.memory_only {
            return;
        }
        if let Err(e) = self.backend.save(&self.store.to_state()) {
            warn!(error = %e, "save failed, continuing in memory only");
            self.memory_only = true;
        }
    }
}

fn notify(listeners: &mut [RoleListener], role: &Role) {
    for listener in listeners.iter_mut() {
        listener(role);
    }
}
