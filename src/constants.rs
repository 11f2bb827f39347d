//! Sentinels, transfer keys and storage names

/// Category group for permissions without an explicit category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Namespace delimiter inside permission names ("users.edit")
pub const NAME_DELIMITER: char = '.';

// Drag transfer keys. The multi-item key is always checked first.
pub const TRANSFER_MANY: &str = "application/x-roledeck-permissions";
pub const TRANSFER_ONE: &str = "application/x-roledeck-permission";

// Storage layout
pub const DEFAULT_STORAGE_KEY: &str = "roledeck.state";
pub const STATE_DB: &str = "state";
pub const META_DB: &str = "meta";
pub const REVISION_KEY: &str = "revision";
pub const DEFAULT_MAP_SIZE: usize = 16 << 20;
