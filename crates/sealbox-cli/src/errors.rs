//! Mapping failures onto exit codes.
//!
//! Handlers return `anyhow::Error`. `main` reports it once and takes the exit
//! code from the first [`CliError`] or classifiable [`VaultError`] in the
//! error chain, so core errors propagate with `?` untouched.

use std::fmt;

use sealbox_core::VaultError;

use crate::constants::exit_codes;

/// Class of failure a script can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotFound,
    InvalidInput,
    AuthFailed,
}

impl Failure {
    pub fn exit_code(self) -> i32 {
        match self {
            Failure::NotFound => exit_codes::NOT_FOUND,
            Failure::InvalidInput => exit_codes::INVALID_INPUT,
            Failure::AuthFailed => exit_codes::AUTH_FAILED,
        }
    }

    /// The class of a core error, or `None` for internal failures.
    pub fn of_vault(err: &VaultError) -> Option<Self> {
        match err {
            VaultError::IncorrectPassphrase => Some(Failure::AuthFailed),
            VaultError::NotInitialized => Some(Failure::NotFound),
            VaultError::AlreadyInitialized
            | VaultError::InvalidInput(_)
            | VaultError::IdSpaceExhausted(_) => Some(Failure::InvalidInput),
            _ => None,
        }
    }
}

/// A CLI-level failure with an optional hint line.
#[derive(Debug)]
pub struct CliError {
    failure: Failure,
    message: String,
    hint: Option<String>,
}

impl CliError {
    pub fn new(failure: Failure, message: impl Into<String>) -> Self {
        Self {
            failure,
            message: message.into(),
            hint: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Failure::NotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(Failure::InvalidInput, message)
    }

    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(Failure::AuthFailed, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn failure(&self) -> Failure {
        self.failure
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n\n{}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Exit code for an error returned from a command handler.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| {
            if let Some(cli_err) = cause.downcast_ref::<CliError>() {
                return Some(cli_err.failure());
            }
            cause.downcast_ref::<VaultError>().and_then(Failure::of_vault)
        })
        .map_or(exit_codes::GENERAL, Failure::exit_code)
}

/// Print `err` to stderr and return the exit code to use.
pub fn report(err: &anyhow::Error) -> i32 {
    eprintln!("Error: {:#}", err);
    exit_code(err)
}
