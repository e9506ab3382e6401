//! Argument resolution
//!
//! Turns command-line tokens into a validated [`Intent`]. Resolution happens
//! in two passes:
//!
//! 1. Flag pass: every flag group is interpreted on its own. Action flags
//!    claim the action, entity flags probe their argument, token and hash
//!    arguments are read from file or validated as literals.
//! 2. Completeness pass: the token requirement and per-action requirements
//!    are checked, then the closed [`Intent`] is assembled.
//!
//! Nothing here terminates the process. Every failure is a [`ResolveError`]
//! and the caller decides how to report it.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tracing::warn;

use crate::cli::Cli;
use crate::config::Settings;
use crate::intent::{Action, EntityType, InputMode, Intent, ListType, Transport};
use crate::probe::{self, Probe};
use crate::validation::{is_sha256, is_valid_token, parse_action, parse_list};

/// Classified resolution failure. The display text is the diagnostic shown
/// to the operator.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Malformed command line, or help requested
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(r#"Action must be one of "ping", "get", "add", "delete", "lookup" or "submit""#)]
    InvalidAction,

    #[error("action already specified")]
    ActionAlreadySpecified,

    #[error("server type already specified")]
    ServerTypeAlreadySpecified,

    #[error(r#""ip" requires an IP address or a readable file as an argument"#)]
    InvalidIp,

    #[error(r#"List must be one of "allowlist" or "blocklist""#)]
    InvalidList,

    #[error("list already specified")]
    ListAlreadySpecified,

    #[error(r#"argument to "-H" must be a SHA256 hash or a file containing one"#)]
    InvalidHash,

    #[error("invalid token specified")]
    InvalidToken,

    #[error(r#""submit" action requires a readable file as an argument"#)]
    SubmitUnreadable,

    #[error("no authorization token specified")]
    MissingToken,

    #[error("an action must be specified (-a, -p, -I, -H or -s)")]
    MissingAction,

    #[error("the lookup action requires a hash (-H or --hash)")]
    MissingHash,

    #[error("get, add and delete require a server type (-D, -i or -u)")]
    MissingServerType,

    #[error("get, add and delete require a list (-l)")]
    MissingList,

    #[error("the submit action requires a sample file (-s or --submit)")]
    MissingSample,

    #[error("IP, domain and url are mutually exclusive")]
    MutuallyExclusive,
}

impl ResolveError {
    /// Help output travels as a clap error but is not a failure
    pub fn is_informational(&self) -> bool {
        matches!(self, ResolveError::Usage(e) if !e.use_stderr())
    }
}

/// Resolves the full argument vector, program name included
///
/// An empty command line behaves like `-h`.
///
/// # Examples
///
/// ```
/// use atp::intent::{Action, InputMode};
/// use atp::resolve::resolve;
///
/// let intent = resolve(["atp", "-p"]).unwrap();
/// assert_eq!(intent.action(), Action::Ping);
/// assert_eq!(intent.input_mode(), InputMode::None);
/// assert!(intent.token().is_none());
/// ```
pub fn resolve<I, T>(args: I) -> Result<Intent, ResolveError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = parse_args(args)?;
    resolve_cli(&cli)
}

/// Parses the command line without interpreting it
pub fn parse_args<I, T>(args: I) -> Result<Cli, ResolveError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from("atp"));
    }
    if args.len() == 1 {
        args.push(OsString::from("-h"));
    }

    Ok(Cli::try_parse_from(args)?)
}

/// Resolves an already parsed command line
pub fn resolve_cli(cli: &Cli) -> Result<Intent, ResolveError> {
    let settings = Settings::from_cli(cli);
    let transport = Transport {
        base_uri: settings.base_uri(),
        api_version: settings.api_version.clone(),
        no_ssl_verify: cli.no_ssl_verify > 0,
        debug: cli.debug > 0,
    };

    // -v discards everything else
    if cli.version > 0 {
        return Ok(untargeted(Action::Version, None, transport));
    }

    let mut slot = ActionSlot::default();
    for name in &cli.action {
        let action = parse_action(name).ok_or(ResolveError::InvalidAction)?;
        slot.claim(action, Claim::Explicit)?;
    }
    for _ in 0..cli.ping {
        slot.claim(Action::Ping, Claim::Explicit)?;
    }
    for _ in 0..cli.infected_hosts {
        slot.claim(Action::InfectedHosts, Claim::Explicit)?;
    }

    let hash_value = match &cli.hash {
        Some(arg) => {
            slot.claim(Action::Lookup, Claim::Implied)?;
            Some(resolve_hash(arg)?)
        }
        None => None,
    };

    let sample = match &cli.submit {
        Some(arg) => {
            slot.claim(Action::Submit, Claim::Implied)?;
            match probe::readable_file(arg) {
                Probe::File(path) => Some(path),
                _ => return Err(ResolveError::SubmitUnreadable),
            }
        }
        None => None,
    };

    let list_type = resolve_list(&cli.list)?;
    let target = resolve_target(cli)?;

    let token = match &cli.token {
        Some(arg) => Some(resolve_token(arg)?),
        None => None,
    };

    let action = slot.action;
    if token.is_none() && action.map_or(true, Action::requires_token) {
        return Err(ResolveError::MissingToken);
    }
    let action = action.ok_or(ResolveError::MissingAction)?;

    if !action.is_list_action() && (target.is_some() || list_type.is_some()) {
        warn!("server type and list are ignored by the {} action", action);
    }

    let intent = match action {
        Action::Get | Action::Add | Action::Delete => {
            let target = target.ok_or(ResolveError::MissingServerType)?;
            let list_type = list_type.ok_or(ResolveError::MissingList)?;
            Intent {
                action,
                entity_type: Some(target.entity_type),
                list_type: Some(list_type),
                input_mode: target.input_mode,
                value: target.value,
                file_path: target.file_path,
                hash_value: None,
                token,
                transport,
            }
        }
        Action::Lookup => Intent {
            hash_value: Some(hash_value.ok_or(ResolveError::MissingHash)?),
            ..untargeted(action, token, transport)
        },
        Action::Submit => Intent {
            input_mode: InputMode::FileOfValues,
            file_path: Some(sample.ok_or(ResolveError::MissingSample)?),
            ..untargeted(action, token, transport)
        },
        Action::InfectedHosts => untargeted(action, token, transport),
        Action::Ping | Action::Version => untargeted(action, None, transport),
    };

    Ok(intent)
}

fn untargeted(action: Action, token: Option<String>, transport: Transport) -> Intent {
    Intent {
        action,
        entity_type: None,
        list_type: None,
        input_mode: InputMode::None,
        value: None,
        file_path: None,
        hash_value: None,
        token,
        transport,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    /// Named by -a, -p or -I
    Explicit,
    /// Follows from -H or -s
    Implied,
}

/// Holds the single action of an invocation
///
/// An implied claim may coincide with an explicit one for the same action
/// (`-a lookup -H <hash>`); any other second claim is an error.
#[derive(Debug, Default)]
struct ActionSlot {
    action: Option<Action>,
    implied: bool,
}

impl ActionSlot {
    fn claim(&mut self, action: Action, claim: Claim) -> Result<(), ResolveError> {
        match self.action {
            None => {
                self.action = Some(action);
                self.implied = claim == Claim::Implied;
                Ok(())
            }
            Some(current) if current == action && (self.implied || claim == Claim::Implied) => {
                self.implied = false;
                Ok(())
            }
            Some(_) => Err(ResolveError::ActionAlreadySpecified),
        }
    }
}

#[derive(Debug)]
struct Target {
    entity_type: EntityType,
    input_mode: InputMode,
    value: Option<String>,
    file_path: Option<PathBuf>,
}

impl Target {
    fn probe(entity_type: EntityType, arg: &str) -> Result<Self, ResolveError> {
        // bare flag: list contents
        if arg.is_empty() {
            return Ok(Self {
                entity_type,
                input_mode: InputMode::None,
                value: None,
                file_path: None,
            });
        }

        let probe = match entity_type {
            EntityType::Ip => probe::ip_or_file(arg),
            EntityType::Domain | EntityType::Url => probe::file_or_literal(arg),
        };

        match probe {
            Probe::Literal(value) => Ok(Self {
                entity_type,
                input_mode: InputMode::SingleValue,
                value: Some(value),
                file_path: None,
            }),
            Probe::File(path) => Ok(Self {
                entity_type,
                input_mode: InputMode::FileOfValues,
                value: None,
                file_path: Some(path),
            }),
            Probe::Invalid => Err(ResolveError::InvalidIp),
        }
    }
}

fn resolve_target(cli: &Cli) -> Result<Option<Target>, ResolveError> {
    let flags = [
        (EntityType::Domain, &cli.domain),
        (EntityType::Ip, &cli.ip),
        (EntityType::Url, &cli.url),
    ];

    let mut targets = Vec::new();
    for (entity_type, args) in flags {
        for arg in args {
            targets.push(Target::probe(entity_type, arg)?);
        }
    }

    let literals = targets.iter().filter(|t| t.value.is_some()).count();
    if literals > 1 {
        return Err(ResolveError::MutuallyExclusive);
    }
    if targets.len() > 1 {
        return Err(ResolveError::ServerTypeAlreadySpecified);
    }
    Ok(targets.pop())
}

fn resolve_list(args: &[String]) -> Result<Option<ListType>, ResolveError> {
    let mut lists = args
        .iter()
        .map(|name| parse_list(name).ok_or(ResolveError::InvalidList))
        .collect::<Result<Vec<_>, _>>()?;
    if lists.len() > 1 {
        return Err(ResolveError::ListAlreadySpecified);
    }
    Ok(lists.pop())
}

/// File first, then literal. File tokens are only required to be non-empty.
fn resolve_token(arg: &str) -> Result<String, ResolveError> {
    match probe::read_trimmed(arg) {
        Some(token) if !token.is_empty() => Ok(token),
        Some(_) => Err(ResolveError::InvalidToken),
        None if is_valid_token(arg) => Ok(arg.to_string()),
        None => Err(ResolveError::InvalidToken),
    }
}

fn resolve_hash(arg: &str) -> Result<String, ResolveError> {
    let hash = probe::read_trimmed(arg).unwrap_or_else(|| arg.to_string());
    // the hash becomes a path segment, so nothing but hex gets through
    if !is_sha256(&hash) {
        return Err(ResolveError::InvalidHash);
    }
    Ok(hash)
}
