use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use omi_client::{BatchStatus, ClientConfig, CommitStatus, HttpTransport, OmiClient};
use omi_crypto::SigningKey;
use omi_types::{
    Address, AddressPrefix, DomainObject, IndividualIdentity, ObjectKind, OrganizationalIdentity,
    Recording, Work,
};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        config,
        url,
        key,
        format,
        ..
    } = cli;
    let settings = || load_config(config.as_deref(), url.clone(), key.clone());
    match command {
        Command::Keygen => cmd_keygen(format),
        Command::Address(args) => cmd_address(args, format),
        Command::Prefix(args) => cmd_prefix(args, format),
        Command::Set(args) => cmd_set(settings()?, args, format),
        Command::Get(args) => cmd_get(settings()?, args, format),
        Command::List(args) => cmd_list(settings()?, args, format),
        Command::Status(args) => cmd_status(settings()?, args, format),
    }
}

/// Config file (or defaults), then command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    url: Option<String>,
    key: Option<String>,
) -> anyhow::Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(url) = url {
        config.rest_url = url;
    }
    if let Some(key) = key {
        config.private_key = key;
    }
    config.validate()?;
    debug!(?config, "resolved client config");
    Ok(config)
}

/// Parse a plain JSON record of `kind`.
pub fn parse_record(kind: ObjectKind, text: &str) -> anyhow::Result<DomainObject> {
    let object = match kind {
        ObjectKind::Individual => serde_json::from_str::<IndividualIdentity>(text)?.into(),
        ObjectKind::Organization => serde_json::from_str::<OrganizationalIdentity>(text)?.into(),
        ObjectKind::Recording => serde_json::from_str::<Recording>(text)?.into(),
        ObjectKind::Work => serde_json::from_str::<Work>(text)?.into(),
    };
    Ok(object)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_record(object: &DomainObject) -> anyhow::Result<()> {
    println!(
        "{} {}  {}",
        object.kind().name().cyan(),
        object.natural_key().bold(),
        object.address().to_string().dimmed()
    );
    let record = match object {
        DomainObject::Individual(o) => serde_json::to_string_pretty(o)?,
        DomainObject::Organization(o) => serde_json::to_string_pretty(o)?,
        DomainObject::Recording(o) => serde_json::to_string_pretty(o)?,
        DomainObject::Work(o) => serde_json::to_string_pretty(o)?,
    };
    for line in record.lines() {
        println!("  {line}");
    }
    Ok(())
}

fn colored_status(status: CommitStatus) -> colored::ColoredString {
    match status {
        CommitStatus::Committed => status.as_str().green().bold(),
        CommitStatus::Pending => status.as_str().yellow(),
        CommitStatus::Invalid => status.as_str().red().bold(),
        CommitStatus::Unknown => status.as_str().dimmed(),
    }
}

fn cmd_keygen(format: OutputFormat) -> anyhow::Result<()> {
    let key = SigningKey::generate();
    let public = key.public_key().to_hex();
    match format {
        OutputFormat::Json => print_json(&json!({ "private_key": key.to_hex(), "public_key": public })),
        OutputFormat::Text => {
            println!("{} {}", "private key:".bold(), key.to_hex());
            println!("{} {}", "public key: ".bold(), public.cyan());
            Ok(())
        }
    }
}

fn cmd_address(args: AddressArgs, format: OutputFormat) -> anyhow::Result<()> {
    let address = Address::derive(&args.name, args.kind);
    match format {
        OutputFormat::Json => print_json(&json!({
            "kind": args.kind.name(),
            "key": args.name,
            "address": address,
        })),
        OutputFormat::Text => {
            println!("{address}");
            Ok(())
        }
    }
}

fn cmd_prefix(args: PrefixArgs, format: OutputFormat) -> anyhow::Result<()> {
    let prefix = AddressPrefix::for_kind(args.kind);
    match format {
        OutputFormat::Json => print_json(&json!({ "kind": args.kind.name(), "prefix": prefix.as_str() })),
        OutputFormat::Text => {
            println!("{prefix}");
            Ok(())
        }
    }
}

fn cmd_set(config: ClientConfig, args: SetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let object = parse_record(args.kind, &text)
        .with_context(|| format!("parsing {} as {}", args.file.display(), args.kind))?;
    let address = object.address();
    let client = OmiClient::new(config.clone())?;
    let status = client.set_object(object)?;

    let outcome = if args.wait {
        Some(status.wait_for_committed(config.wait_timeout(), config.check_timeout())?)
    } else {
        None
    };

    match format {
        OutputFormat::Json => print_json(&json!({
            "address": address,
            "batch_id": status.batch_id(),
            "link": status.link(),
            "status": outcome,
        }))?,
        OutputFormat::Text => {
            println!("{} {} batch submitted", "✓".green().bold(), args.kind.name());
            println!("  Address: {}", address.to_string().dimmed());
            println!("  Batch:   {}", status.batch_id().yellow());
            println!("  Status:  {}", status.link());
            if let Some(outcome) = outcome {
                println!("  Outcome: {}", colored_status(outcome));
            }
        }
    }
    if outcome == Some(CommitStatus::Invalid) {
        anyhow::bail!("batch {} was rejected by the ledger", status.batch_id());
    }
    Ok(())
}

fn cmd_get(config: ClientConfig, args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = OmiClient::new(config)?;
    let object = client.get_object(args.kind, &args.name)?;
    match format {
        OutputFormat::Json => print_json(&object),
        OutputFormat::Text => print_record(&object),
    }
}

fn cmd_list(config: ClientConfig, args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = OmiClient::new(config)?;
    let limit = args.limit.unwrap_or(usize::MAX);
    let objects = client
        .list_objects(args.kind)?
        .take(limit)
        .collect::<Result<Vec<_>, _>>()?;
    match format {
        OutputFormat::Json => print_json(&objects),
        OutputFormat::Text => {
            if objects.is_empty() {
                println!("No {} records.", args.kind.name());
            }
            for object in &objects {
                println!(
                    "{}  {}",
                    object.address().to_string().dimmed(),
                    object.natural_key().bold()
                );
            }
            Ok(())
        }
    }
}

fn cmd_status(config: ClientConfig, args: StatusArgs, format: OutputFormat) -> anyhow::Result<()> {
    let transport = HttpTransport::new(config.request_timeout())?;
    let handle = BatchStatus::new(
        Arc::new(transport),
        args.batch_id,
        args.link,
        config.poll_interval(),
    );
    let status = if args.wait {
        handle.wait_for_committed(config.wait_timeout(), config.check_timeout())?
    } else {
        handle.check(config.check_timeout())?
    };
    match format {
        OutputFormat::Json => print_json(&json!({ "batch_id": handle.batch_id(), "status": status })),
        OutputFormat::Text => {
            println!("{} {}", handle.batch_id().yellow(), colored_status(status));
            Ok(())
        }
    }
}
