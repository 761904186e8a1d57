// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera CLI
//!
//! Entry point for the `tessera` binary. Parses CLI arguments, initializes
//! logging, loads the client configuration and runs one subcommand.
//!
//! - `inspect`     - decode a transaction and print a JSON summary
//! - `checksum`    - compute or validate an entity id checksum
//! - `keygen`      - generate an Ed25519 key pair
//! - `node-update` - build and freeze a node update
//! - `sign`        - add a signature to a transaction
//! - `schedule`    - reduce a transaction to a schedulable body
//! - `version`     - print build version information

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use std::net::Ipv4Addr;
use std::path::Path;

use tessera_sdk::{
    AccountId, AnyTransaction, ClientConfig, EntityId, Endpoint, LedgerId, NodeUpdate, PrivateKey, PublicKey,
    Transaction,
};

use cli::{ChecksumArgs, Commands, InputArgs, InspectArgs, NodeUpdateArgs, SignArgs, TesseraCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = TesseraCli::parse();
    logging::init_logging("tessera=info,tessera_sdk=warn", LogFormat::from_str_lossy(&cli.log_format));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect(args) => inspect(args),
        Commands::Checksum(args) => checksum(args, &config),
        Commands::Keygen => keygen(),
        Commands::NodeUpdate(args) => {
            let tx = build_node_update(&args, &config)?;
            println!("{}", hex::encode(tx.to_bytes()));
            Ok(())
        }
        Commands::Sign(args) => sign(args),
        Commands::Schedule(args) => schedule(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Loads the client config, or testnet defaults when no file is given.
fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config =
        ClientConfig::from_json(&json).with_context(|| format!("failed to load config file {}", path.display()))?;
    tracing::info!(path = %path.display(), ledger = %config.ledger_id, "loaded client config");
    Ok(config)
}

/// Reads hex transaction bytes from the argument or the file.
fn read_input(input: &InputArgs) -> Result<Vec<u8>> {
    let text = match (&input.hex, &input.file) {
        (Some(hex), _) => hex.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transaction file {}", path.display()))?,
        (None, None) => bail!("no transaction given"),
    };
    let text = text.trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text).context("transaction is not valid hex")
}

fn decode_input(input: &InputArgs) -> Result<AnyTransaction> {
    let bytes = read_input(input)?;
    let tx = tessera_sdk::from_bytes(&bytes).context("failed to decode transaction")?;
    tracing::info!(kind = %tx.kind(), bytes = bytes.len(), "decoded transaction");
    Ok(tx)
}

fn inspect(args: InspectArgs) -> Result<()> {
    let tx = decode_input(&args.input)?;
    let mut summary = serde_json::to_value(tx.summary())?;
    if args.verify {
        summary["signatures_valid"] = match tx.verify_signatures() {
            Ok(()) => json!(true),
            Err(err) => json!(err.to_string()),
        };
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn checksum(args: ChecksumArgs, config: &ClientConfig) -> Result<()> {
    let ledger = match &args.network {
        Some(network) => network.parse::<LedgerId>()?,
        None => config.ledger_id.clone(),
    };
    let id: EntityId = args.id.parse()?;

    if id.checksum().is_some() {
        id.validate_checksum(&ledger)?;
        tracing::info!(id = %args.id, %ledger, "checksum valid");
    }
    println!("{}", id.to_string_with_checksum(&ledger));
    Ok(())
}

fn keygen() -> Result<()> {
    let key = PrivateKey::generate();
    let out = json!({
        "private_key": key.to_hex(),
        "public_key": key.public_key().to_hex(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn sign(args: SignArgs) -> Result<()> {
    let key = PrivateKey::from_hex(args.key.trim()).context("invalid private key")?;
    let mut tx = decode_input(&args.input)?;
    tx.sign(&key)?;
    tracing::info!(signer = %key.public_key(), "signed transaction");
    println!("{}", hex::encode(tx.to_bytes()));
    Ok(())
}

fn schedule(args: InputArgs) -> Result<()> {
    let tx = decode_input(&args)?;
    let body = tx.schedule().context("transaction cannot be scheduled")?;
    let out = json!({
        "kind": body.kind(),
        "memo": body.memo(),
        "max_transaction_fee": body.max_transaction_fee(),
        "body": hex::encode(body.to_bytes()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Builds and freezes a node update using the config's operator and nodes.
fn build_node_update(args: &NodeUpdateArgs, config: &ClientConfig) -> Result<Transaction<NodeUpdate>> {
    let mut tx = Transaction::<NodeUpdate>::for_client(config);

    if let Some(node_id) = args.node_id {
        tx.set_node_id(node_id)?;
    }
    if let Some(account) = &args.account_id {
        let account: AccountId = account.parse()?;
        tx.set_account_id(account)?;
    }
    if let Some(description) = &args.description {
        tx.set_description(description.as_str())?;
    }
    for endpoint in &args.gossip_endpoints {
        tx.add_gossip_endpoint(parse_endpoint(endpoint)?)?;
    }
    for endpoint in &args.service_endpoints {
        tx.add_service_endpoint(parse_endpoint(endpoint)?)?;
    }
    if let Some(admin_key) = &args.admin_key {
        let key = PublicKey::from_hex(admin_key).context("invalid admin key")?;
        tx.set_admin_key(key)?;
    }
    if let Some(decline) = args.decline_reward {
        tx.set_decline_reward(decline)?;
    }
    tx.set_memo(args.memo.as_str())?;

    tx.freeze_with(config)
        .context("failed to freeze; is an operator account and node list configured?")?;
    if let Some(err) = tx.construction_error() {
        tracing::warn!(%err, "node update is incomplete and cannot be submitted as is");
    }
    Ok(tx)
}

/// Parses `host:port`, treating a dotted-quad host as IPv4.
fn parse_endpoint(s: &str) -> Result<Endpoint> {
    let (host, port) = s
        .rsplit_once(':')
        .with_context(|| format!("endpoint `{s}` must be host:port"))?;
    let port: u16 = port
        .parse()
        .with_context(|| format!("invalid port in endpoint `{s}`"))?;
    if host.is_empty() {
        bail!("endpoint `{s}` has no host");
    }
    Ok(match host.parse::<Ipv4Addr>() {
        Ok(ip) => Endpoint::ipv4(ip, port),
        Err(_) => Endpoint::domain(host, port),
    })
}

/// Prints version information to stdout.
fn print_version() {
    println!("tessera {}", env!("CARGO_PKG_VERSION"));
    println!("rustc   {}", option_env!("RUSTC_VERSION").unwrap_or("unknown"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tessera_sdk::TransactionKind;

    fn configured() -> ClientConfig {
        let mut config = ClientConfig::for_ledger(LedgerId::Testnet);
        config.operator_account_id = Some(AccountId::from_num(2));
        config.node_account_ids = vec![AccountId::from_num(3)];
        config
    }

    fn node_update_args() -> NodeUpdateArgs {
        NodeUpdateArgs {
            node_id: Some(1),
            account_id: None,
            description: Some("test".into()),
            gossip_endpoints: vec!["10.0.0.1:50111".into()],
            service_endpoints: vec!["node1.example.com:50211".into()],
            admin_key: Some(PrivateKey::generate().public_key().to_hex()),
            decline_reward: None,
            memo: String::new(),
        }
    }

    #[test]
    fn parses_ipv4_and_domain_endpoints() {
        assert_eq!(
            parse_endpoint("10.0.0.1:50111").unwrap(),
            Endpoint::ipv4(Ipv4Addr::new(10, 0, 0, 1), 50111)
        );
        assert_eq!(
            parse_endpoint("node1.example.com:443").unwrap(),
            Endpoint::domain("node1.example.com", 443)
        );
        assert!(parse_endpoint("node1.example.com").is_err());
        assert!(parse_endpoint(":443").is_err());
        assert!(parse_endpoint("host:99999").is_err());
    }

    #[test]
    fn builds_decodable_node_update() {
        let tx = build_node_update(&node_update_args(), &configured()).unwrap();
        assert!(tx.is_frozen());
        assert!(tx.construction_error().is_none());

        let decoded = tessera_sdk::from_bytes(&tx.to_bytes()).unwrap();
        assert_eq!(decoded.kind(), TransactionKind::NodeUpdate);
    }

    #[test]
    fn node_update_without_operator_fails() {
        let err = build_node_update(&node_update_args(), &ClientConfig::default()).unwrap_err();
        assert!(err.to_string().contains("failed to freeze"));
    }

    #[test]
    fn reads_hex_from_file() {
        let tx = build_node_update(&node_update_args(), &configured()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0x{}", hex::encode(tx.to_bytes())).unwrap();

        let input = InputArgs {
            hex: None,
            file: Some(file.path().to_path_buf()),
        };
        assert_eq!(read_input(&input).unwrap(), tx.to_bytes());
        assert_eq!(decode_input(&input).unwrap().kind(), TransactionKind::NodeUpdate);
    }

    #[test]
    fn loads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"ledger_id": "mainnet", "operator_account_id": "0.0.2", "node_account_ids": ["0.0.3"]}}"#
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.ledger_id, LedgerId::Mainnet);
        assert_eq!(config.node_account_ids, vec![AccountId::from_num(3)]);
        assert_eq!(load_config(None).unwrap(), ClientConfig::default());
    }

    #[test]
    fn rejects_invalid_hex() {
        let input = InputArgs {
            hex: Some("zz".into()),
            file: None,
        };
        assert!(read_input(&input).is_err());
    }
}
