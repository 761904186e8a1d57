//! # CLI Interface
//!
//! Defines the command-line argument structure for `tessera` using `clap`
//! derive. Every subcommand works offline: transactions come in and go out
//! as hex-encoded wire bytes.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Offline transaction tooling for Tessera ledgers.
///
/// Builds, inspects, signs and schedules transactions in the network wire
/// format without talking to a node. Output goes to stdout, logs to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    about = "Offline transaction tooling for Tessera ledgers",
    version,
    propagate_version = true
)]
pub struct TesseraCli {
    /// Client configuration file (JSON).
    ///
    /// Supplies the ledger, operator account, node accounts and fee
    /// defaults. Built-in testnet defaults are used when omitted.
    #[arg(long, short = 'c', global = true, env = "TESSERA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "TESSERA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `tessera` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a transaction and print a JSON summary.
    Inspect(InspectArgs),
    /// Compute or validate the checksum of an entity id.
    Checksum(ChecksumArgs),
    /// Generate a fresh Ed25519 key pair.
    Keygen,
    /// Build and freeze a node update.
    NodeUpdate(NodeUpdateArgs),
    /// Add a signature to a transaction.
    Sign(SignArgs),
    /// Reduce an unsigned transaction to a schedulable body.
    Schedule(InputArgs),
    /// Print version information and exit.
    Version,
}

/// Where to read transaction bytes from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Hex-encoded transaction bytes.
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,

    /// File holding hex-encoded transaction bytes.
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also verify every attached signature.
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for the `checksum` subcommand.
#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Entity id, `shard.realm.num` with an optional `-checksum` suffix.
    pub id: String,

    /// Ledger to checksum against. Defaults to the configured ledger.
    #[arg(long, short = 'n')]
    pub network: Option<String>,
}

/// Arguments for the `node-update` subcommand.
#[derive(Args, Debug)]
pub struct NodeUpdateArgs {
    /// Node to update.
    #[arg(long)]
    pub node_id: Option<u64>,

    /// New reward account.
    #[arg(long)]
    pub account_id: Option<String>,

    /// New node description.
    #[arg(long)]
    pub description: Option<String>,

    /// Gossip endpoint as `host:port`. Repeatable.
    #[arg(long = "gossip-endpoint")]
    pub gossip_endpoints: Vec<String>,

    /// Service endpoint as `host:port`. Repeatable.
    #[arg(long = "service-endpoint")]
    pub service_endpoints: Vec<String>,

    /// New admin key, hex Ed25519 public key.
    #[arg(long)]
    pub admin_key: Option<String>,

    /// Decline node rewards.
    #[arg(long)]
    pub decline_reward: Option<bool>,

    /// Transaction memo.
    #[arg(long, default_value = "")]
    pub memo: String,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Hex-encoded Ed25519 private key.
    ///
    /// **Prefer the environment variable**; command-line arguments end up
    /// in shell history.
    #[arg(long, env = "TESSERA_PRIVATE_KEY", hide_env_values = true)]
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        TesseraCli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_endpoints() {
        let cli = TesseraCli::try_parse_from([
            "tessera",
            "node-update",
            "--node-id",
            "1",
            "--gossip-endpoint",
            "10.0.0.1:50111",
            "--gossip-endpoint",
            "10.0.0.2:50111",
        ])
        .unwrap();
        match cli.command {
            Commands::NodeUpdate(args) => {
                assert_eq!(args.node_id, Some(1));
                assert_eq!(args.gossip_endpoints.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn inspect_requires_input() {
        assert!(TesseraCli::try_parse_from(["tessera", "inspect"]).is_err());
        assert!(TesseraCli::try_parse_from(["tessera", "inspect", "0a00", "--file", "x"]).is_err());
    }
}
