use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use omi_types::ObjectKind;

#[derive(Parser)]
#[command(
    name = "omi",
    about = "OMI ledger client: register and look up music ownership records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with client settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger REST API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Hex private key used to sign writes (overrides the config file)
    #[arg(long, global = true)]
    pub key: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a new signing key pair
    Keygen,
    /// Print the state address of a record
    Address(AddressArgs),
    /// Print the address prefix shared by every record of a kind
    Prefix(PrefixArgs),
    /// Register or update a record from a JSON file
    Set(SetArgs),
    /// Fetch one record by name or title
    Get(GetArgs),
    /// List records of one kind
    List(ListArgs),
    /// Query the commit status of a submitted batch
    Status(StatusArgs),
}

#[derive(Args)]
pub struct AddressArgs {
    pub kind: ObjectKind,
    /// Name (identities) or title (recordings, works)
    pub name: String,
}

#[derive(Args)]
pub struct PrefixArgs {
    pub kind: ObjectKind,
}

#[derive(Args)]
pub struct SetArgs {
    pub kind: ObjectKind,
    pub file: PathBuf,
    /// Block until the batch leaves PENDING or the wait timeout passes
    #[arg(short, long)]
    pub wait: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub kind: ObjectKind,
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub kind: ObjectKind,
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Status link returned on submission
    pub link: String,
    pub batch_id: String,
    #[arg(short, long)]
    pub wait: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keygen() {
        let cli = Cli::try_parse_from(["omi", "keygen"]).unwrap();
        assert!(matches!(cli.command, Command::Keygen));
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_address() {
        let cli = Cli::try_parse_from(["omi", "address", "recording", "Song A"]).unwrap();
        if let Command::Address(args) = cli.command {
            assert_eq!(args.kind, ObjectKind::Recording);
            assert_eq!(args.name, "Song A");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_unknown_kind_fails() {
        assert!(Cli::try_parse_from(["omi", "prefix", "album"]).is_err());
    }

    #[test]
    fn parse_set_wait() {
        let cli = Cli::try_parse_from(["omi", "set", "work", "w.json", "--wait"]).unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.kind, ObjectKind::Work);
            assert_eq!(args.file, PathBuf::from("w.json"));
            assert!(args.wait);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list_limit() {
        let cli = Cli::try_parse_from(["omi", "list", "individuals", "-n", "5"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.kind, ObjectKind::Individual);
            assert_eq!(args.limit, Some(5));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_status() {
        let cli = Cli::try_parse_from(["omi", "status", "http://l/batch_status?id=1", "abc"]).unwrap();
        if let Command::Status(args) = cli.command {
            assert_eq!(args.batch_id, "abc");
            assert!(!args.wait);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "omi", "get", "organization", "Label X",
            "--url", "http://ledger:8008", "--format", "json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://ledger:8008"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }
}
