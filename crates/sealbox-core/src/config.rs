//! Runtime configuration for a [`Vault`](crate::Vault).

/// Default number of identifier candidates tried before giving up.
pub const DEFAULT_MAX_ID_ATTEMPTS: usize = 64;

/// Default capacity of the vault event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Tunables for vault behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Upper bound on identifier allocation attempts per insert.
    pub max_id_attempts: usize,
    /// Surface an unreadable index as an error instead of starting empty.
    ///
    /// When `false`, a blob that fails to decrypt or parse is logged and
    /// treated as an empty vault. A missing blob is always treated as empty.
    pub strict_index_load: bool,
    /// Number of undelivered events buffered per subscriber.
    pub event_capacity: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            max_id_attempts: DEFAULT_MAX_ID_ATTEMPTS,
            strict_index_load: false,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl VaultConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_id_attempts(mut self, attempts: usize) -> Self {
        self.max_id_attempts = attempts.max(1);
        self
    }

    pub fn with_strict_index_load(mut self, strict: bool) -> Self {
        self.strict_index_load = strict;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}
