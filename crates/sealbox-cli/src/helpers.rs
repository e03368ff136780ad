use dialoguer::Password;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::constants::PASSPHRASE_ENV;
use crate::errors::CliError;

/// Passphrase from `SEALBOX_PASSPHRASE`, if set and non-blank.
pub fn env_passphrase() -> Option<Zeroizing<String>> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(Zeroizing::new)
}

/// Prompt for the vault passphrase.
pub fn prompt_passphrase(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if !interactive {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ));
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation, or read it from the environment.
pub fn prompt_init_passphrase(interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(passphrase) = env_passphrase() {
        return Ok(passphrase);
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ));
    }
    Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Parse `KEY=VALUE` pairs into a JSON object, rejecting empty or duplicate keys.
pub fn parse_fields(fields: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut map = Map::new();
    for field in fields {
        let (key, value) = field.split_once('=').ok_or_else(|| {
            CliError::invalid_input(format!("Invalid field \"{}\": expected KEY=VALUE", field))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::invalid_input(format!(
                "Invalid field \"{}\": empty key",
                field
            )));
        }
        if map
            .insert(key.to_string(), Value::String(value.to_string()))
            .is_some()
        {
            return Err(CliError::invalid_input(format!(
                "Field \"{}\" given more than once",
                key
            )));
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields() {
        let map = parse_fields(&["pin=1234".to_string(), "note=a=b".to_string()]).unwrap();
        assert_eq!(map.get("pin"), Some(&Value::String("1234".to_string())));
        assert_eq!(map.get("note"), Some(&Value::String("a=b".to_string())));
    }

    #[test]
    fn test_parse_fields_rejects_bad_input() {
        assert!(parse_fields(&["novalue".to_string()]).is_err());
        assert!(parse_fields(&["=x".to_string()]).is_err());
        assert!(parse_fields(&["a=1".to_string(), "a=2".to_string()]).is_err());
    }
}
