use chrono::Utc;
use serde_json::{Map, Value};

use sealbox_core::AccountId;

use crate::app::open_unlocked;
use crate::cli::{AddArgs, Cli, ListArgs, ShowArgs};
use crate::errors::CliError;
use crate::helpers::parse_fields;
use crate::output::{
    account_json, accounts_json, parse_output_format, print_account, print_account_list,
};

/// Build the record to store from `add` arguments.
fn build_record(args: &AddArgs) -> anyhow::Result<Value> {
    if let Some(raw) = args.json.as_ref() {
        return serde_json::from_str(raw)
            .map_err(|e| CliError::invalid_input(format!("Invalid JSON: {}", e)).into());
    }

    let mut record = Map::new();
    if let Some(name) = args.name.as_ref() {
        record.insert("name".to_string(), Value::String(name.clone()));
    }
    for (key, value) in [
        ("username", &args.username),
        ("url", &args.url),
        ("notes", &args.notes),
    ] {
        if let Some(value) = value {
            record.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    let fields = parse_fields(&args.field)?;
    if !fields.is_empty() {
        record.insert("fields".to_string(), Value::Object(fields));
    }
    record.insert(
        "created_at".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    Ok(Value::Object(record))
}

pub async fn handle_add(cli: &Cli, args: &AddArgs) -> anyhow::Result<()> {
    let record = build_record(args)?;

    let (vault, _) = open_unlocked(cli, args.no_input).await?;
    let id = vault.add_account(record).await?;

    if cli.quiet {
        println!("{}", id);
    } else {
        println!("Added account {}", id);
    }
    Ok(())
}

pub async fn handle_list(cli: &Cli, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;

    let (vault, _) = open_unlocked(cli, args.no_input).await?;
    let index = vault.account_index().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&accounts_json(&index))?);
        return Ok(());
    }
    if index.is_empty() {
        if !cli.quiet {
            println!("No accounts stored.");
        }
        return Ok(());
    }
    print_account_list(&index, format);
    Ok(())
}

pub async fn handle_show(cli: &Cli, args: &ShowArgs) -> anyhow::Result<()> {
    let id: AccountId = args.id.parse()?;

    let (vault, _) = open_unlocked(cli, args.no_input).await?;
    let Some(record) = vault.account(&id).await? else {
        return Err(CliError::not_found(format!("No account with ID {}", id))
            .with_hint("Run `sealbox list` to see stored accounts.")
            .into());
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&account_json(&id, &record))?
        );
    } else {
        print_account(&id, &record);
    }
    Ok(())
}
