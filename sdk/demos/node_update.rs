//! Walkthrough of a node update from draft to submission bytes.
//!
//! Builds an address-book update, freezes it for three nodes, collects the
//! old and new admin signatures, round-trips it through the wire format, and
//! shows what happens to an incomplete update.
//!
//! Run with:
//!   cargo run --example node_update

use std::net::Ipv4Addr;
use std::time::Instant;

use tessera_sdk::{
    from_bytes, AccountId, Endpoint, Key, LedgerId, NodeUpdate, PrivateKey, Timestamp, Transaction, TransactionId,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]==================================================={RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn failure(text: &str) {
    println!("{RED}  [!!] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.3} ms]{RESET}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let operator = AccountId::from_num(2);
    let old_admin = PrivateKey::generate();
    let new_admin = PrivateKey::generate();

    // -----------------------------------------------------------------------
    section(1, "Draft the update");
    // -----------------------------------------------------------------------
    let mut tx = Transaction::<NodeUpdate>::new();
    tx.set_checksum_validation(Some(LedgerId::Testnet))?
        .set_transaction_id(TransactionId::new(operator.clone(), Timestamp::now()))?
        .set_node_account_ids([3, 4, 5].map(AccountId::from_num))?
        .set_node_id(1)?
        .set_account_id("0.0.123-esxsf".parse()?)?
        .set_description("moved to eu-west")?
        .add_gossip_endpoint(Endpoint::ipv4(Ipv4Addr::new(10, 0, 0, 1), 50111))?
        .add_service_endpoint(Endpoint::domain("node1.example.com", 50211))?
        .set_admin_key(new_admin.public_key())?;
    info("transaction id", &tx.transaction_id().map(ToString::to_string).unwrap_or_default());
    success("checksum of 0.0.123-esxsf accepted on testnet");

    match tx.set_account_id("0.0.123-rmkykd".parse()?) {
        Ok(_) => failure("bad checksum slipped through"),
        Err(err) => failure(&err.to_string()),
    }

    // -----------------------------------------------------------------------
    section(2, "Freeze and sign");
    // -----------------------------------------------------------------------
    let start = Instant::now();
    tx.freeze()?;
    timing("freeze, 3 bodies", start.elapsed());

    let start = Instant::now();
    tx.sign(&old_admin)?.sign(&new_admin)?;
    timing("2 signers x 3 bodies", start.elapsed());

    let policy = Key::list([Key::from(old_admin.public_key()), Key::from(new_admin.public_key())]);
    info("signed by both admins", &tx.is_signed_by(&policy).to_string());

    if tx.set_memo("too late").is_err() {
        success("frozen envelope refused a memo change");
    }

    // -----------------------------------------------------------------------
    section(3, "Wire round trip");
    // -----------------------------------------------------------------------
    let bytes = tx.to_bytes();
    info("encoded size", &format!("{} bytes", bytes.len()));
    info("transaction hash", &hex_prefix(&tx.transaction_hash()?));

    let decoded = from_bytes(&bytes)?;
    decoded.verify_signatures()?;
    success("decoded and every signature verifies");
    println!("{DIM}{}{RESET}", serde_json::to_string_pretty(&decoded.summary())?);

    // -----------------------------------------------------------------------
    section(4, "Incomplete update");
    // -----------------------------------------------------------------------
    let mut partial = Transaction::<NodeUpdate>::new();
    partial
        .set_transaction_id(TransactionId::new(operator, Timestamp::now()))?
        .set_node_account_ids([AccountId::from_num(3)])?
        .set_description("no node id")?
        .freeze()?;
    success("froze without a node id");
    match partial.schedule() {
        Ok(_) => failure("incomplete update was scheduled"),
        Err(err) => failure(&format!("schedule refused: {err}")),
    }

    println!();
    Ok(())
}

fn hex_prefix(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().take(12).map(|b| format!("{b:02x}")).collect();
    format!("{hex}...")
}
