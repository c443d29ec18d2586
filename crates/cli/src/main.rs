//! `gstdesk` command-line entry point.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;

use gstdesk_client::MasterList;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "gstdesk", about = "GST invoice calculations from the command line", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recompute line amounts and totals of a stored invoice.
    Compute {
        #[arg(help = "Invoice record JSON file")]
        path: PathBuf,
    },
    /// Validate and submit an invoice against an in-memory store.
    Submit {
        #[arg(help = "Invoice record JSON file")]
        path: PathBuf,
    },
    /// List or search one master list from a snapshot file.
    Lookup {
        #[arg(help = "Master-list snapshot JSON file")]
        path: PathBuf,
        #[arg(value_enum)]
        list: ListArg,
        #[arg(help = "Case-insensitive search text")]
        query: Option<String>,
    },
    /// Format an amount in rupees and spell it out.
    Words {
        #[arg(value_parser = parse_decimal, allow_hyphen_values = true)]
        amount: Decimal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListArg {
    Products,
    Customers,
    Sellers,
}

impl From<ListArg> for MasterList {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Products => MasterList::Products,
            ListArg::Customers => MasterList::Customers,
            ListArg::Sellers => MasterList::Sellers,
        }
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|_| format!("invalid decimal amount '{raw}'"))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    gstdesk_observability::init();

    let config = CliConfig::from_env();
    config.log_ignored();

    match cli.command {
        Command::Compute { path } => print_json(&commands::compute(&read(&path)?)?),
        Command::Submit { path } => {
            let now = chrono::Local::now().naive_local();
            print_json(&commands::submit(&read(&path)?, &config, now)?)
        }
        Command::Lookup { path, list, query } => {
            let list = MasterList::from(list);
            let options = commands::lookup(&read(&path)?, list, query.as_deref(), &config)?;
            tracing::info!(module = %list, count = options.len(), "master list loaded");
            print_json(&options)
        }
        Command::Words { amount } => print_json(&commands::words(amount)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn lookup_takes_a_list_and_optional_query() {
        let cli = Cli::try_parse_from(["gstdesk", "lookup", "lists.json", "customers", "ravi"]).unwrap();
        match cli.command {
            Command::Lookup { path, list, query } => {
                assert_eq!(path, PathBuf::from("lists.json"));
                assert_eq!(MasterList::from(list), MasterList::Customers);
                assert_eq!(query.as_deref(), Some("ravi"));
            }
            _ => panic!("expected lookup"),
        }

        let cli = Cli::try_parse_from(["gstdesk", "lookup", "lists.json", "sellers"]).unwrap();
        assert!(matches!(cli.command, Command::Lookup { query: None, .. }));
    }

    #[test]
    fn unknown_lists_and_bad_amounts_are_rejected() {
        assert!(Cli::try_parse_from(["gstdesk", "lookup", "lists.json", "vendors"]).is_err());
        assert!(Cli::try_parse_from(["gstdesk", "words", "abc"]).is_err());
        assert!(Cli::try_parse_from(["gstdesk", "compute"]).is_err());
        assert!(Cli::try_parse_from(["gstdesk", "frobnicate"]).is_err());
    }

    #[test]
    fn words_parses_the_amount() {
        let cli = Cli::try_parse_from(["gstdesk", "words", "89090.50"]).unwrap();
        match cli.command {
            Command::Words { amount } => assert_eq!(amount, Decimal::new(8909050, 2)),
            _ => panic!("expected words"),
        }
    }
}
