//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Any failure without a more specific code.
    pub const GENERAL: i32 = 1;

    /// Resource not found (config, vault, account).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase, too many attempts).
    pub const AUTH_FAILED: i32 = 5;
}

/// Environment variable holding the passphrase for non-interactive use.
pub const PASSPHRASE_ENV: &str = "SEALBOX_PASSPHRASE";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SEALBOX_CONFIG";

/// Passphrase attempts allowed at an interactive prompt.
pub const MAX_PROMPT_ATTEMPTS: u32 = 3;
