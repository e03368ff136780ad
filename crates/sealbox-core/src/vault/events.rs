/// Lifecycle notifications broadcast to [`Vault::subscribe`](super::Vault::subscribe) receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultEvent {
    /// Both keys were loaded; fired once per successful unlock.
    Unlocked,
    /// Key material and the cached index were dropped.
    Locked,
}
