//! roledeck - role and permission modeling core
//!
//! Groups a flat permission collection into named views, tracks
//! multi-selection, and merges drag-and-drop payloads into roles as
//! id-keyed set unions. State persists as one JSON document in an LMDB
//! environment (or in memory) and imports from three historical shapes.

pub mod config;
pub mod constants;
pub mod db;
pub mod editor;
pub mod error;
pub mod grouping;
pub mod id;
pub mod interchange;
pub mod merge;
pub mod model;
pub mod selection;
pub mod store;

pub use config::{ActionFallback, EditorConfig};
pub use constants::*;
pub use db::{LmdbStore, MemoryStore, StateStore};
pub use editor::{Editor, RoleListener};
pub use error::{Error, Result};
pub use grouping::{
    collate, filter, group_by, group_by_action, group_by_action_with, group_by_category, group_by_category_with,
    Group, Groups,
};
pub use id::new_id;
pub use interchange::{deserialize, serialize};
pub use merge::{remove_permission_from_role, resolve_drop, DropPayload, Transfer};
pub use model::{Permission, Role, State};
pub use selection::Selection;
pub use store::Store;
