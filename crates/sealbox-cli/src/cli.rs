use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use sealbox_core::VERSION;

/// Sealbox - an encrypted account vault unlocked by a single passphrase
#[derive(Parser)]
#[command(name = "sealbox")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault directory
    #[arg(long, global = true, env = "SEALBOX_PATH")]
    pub vault: Option<String>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new vault and its key pair
    Init(InitArgs),

    /// Add an account record
    Add(AddArgs),

    /// List account records
    List(ListArgs),

    /// Show one account record by ID
    Show(ShowArgs),

    /// Show vault location and state
    Status(StatusArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Directory where the vault will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Do not write a config file pointing at the new vault
    #[arg(long)]
    pub no_config: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Account name (e.g. the service)
    #[arg(value_name = "NAME", required_unless_present = "json")]
    pub name: Option<String>,

    /// Login or username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Service URL
    #[arg(long)]
    pub url: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Extra field as KEY=VALUE (repeatable)
    #[arg(short, long, value_name = "KEY=VALUE")]
    pub field: Vec<String>,

    /// Store this JSON value verbatim instead of building a record
    #[arg(long, conflicts_with_all = ["name", "username", "url", "notes", "field"])]
    pub json: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT", conflicts_with = "json")]
    pub format: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Account ID (8 characters)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Unlock the vault and report on the account index
    #[arg(long)]
    pub unlock: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_json_conflicts_with_fields() {
        let result = Cli::try_parse_from(["sealbox", "add", "--json", "{}", "--url", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_requires_name_or_json() {
        assert!(Cli::try_parse_from(["sealbox", "add"]).is_err());
        assert!(Cli::try_parse_from(["sealbox", "add", "github"]).is_ok());
        assert!(Cli::try_parse_from(["sealbox", "add", "--json", "{}"]).is_ok());
    }
}
