use regex::Regex;
use std::sync::OnceLock;

use crate::intent::{Action, ListType};

/// Tokens given literally on the command line may only contain word
/// characters, hyphens and dots
pub fn is_valid_token(token: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"^[\w.-]+$").expect("static token pattern"));
    pattern.is_match(token)
}

/// SHA-256 digests are 64 hex digits, either case
pub fn is_sha256(hash: &str) -> bool {
    hash.len() == 64 && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses the argument of `-a`
///
/// Only the actions an operator may name explicitly are accepted; the
/// infected-hosts feed and version are reachable through their own flags.
pub fn parse_action(name: &str) -> Option<Action> {
    match name {
        "ping" => Some(Action::Ping),
        "get" => Some(Action::Get),
        "add" => Some(Action::Add),
        "delete" => Some(Action::Delete),
        "lookup" => Some(Action::Lookup),
        "submit" => Some(Action::Submit),
        _ => None,
    }
}

/// Parses the argument of `-l`
pub fn parse_list(name: &str) -> Option<ListType> {
    match name {
        "allowlist" => Some(ListType::Allowlist),
        "blocklist" => Some(ListType::Blocklist),
        _ => None,
    }
}
