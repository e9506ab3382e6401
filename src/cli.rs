//! Command-line grammar for the ATP Cloud client
//!
//! This module only describes the shape of the command line using the clap
//! framework. It does not decide what a combination of flags means; that is
//! the job of [`crate::resolve`], which turns a parsed [`Cli`] into an
//! [`crate::intent::Intent`].
//!
//! A few flags are collected as lists rather than single values:
//!
//! - `-a`, `-l`: so a second occurrence can be reported as "already specified"
//! - `-D`, `-i`, `-u`: their argument is optional, an occurrence without one
//!   is recorded as an empty string
//! - `-p`, `-I`: counted, each occurrence claims the action once
//!
//! # Exit codes
//!
//! Help and version exit 0, every other parse failure exits 1.

use clap::{ArgAction, Parser};

/// Default API host
pub const DEFAULT_HOST: &str = "api.sky.junipersecurity.net";

/// Default API version
///
/// `v2` still names the lists whitelist/blacklist, so with this default
/// `-a get -l allowlist -D example.com` requests `/whitelist/param/domain`.
/// Any other version keeps the allowlist/blocklist spelling.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Default product path segment
pub const DEFAULT_PRODUCT: &str = "skyatp";

/// Raw command line of the `atp` binary
///
/// # Examples
///
/// ```
/// use atp::cli::Cli;
/// use clap::Parser;
///
/// let cli = Cli::try_parse_from(["atp", "-a", "get", "-l", "allowlist", "-D"]).unwrap();
/// assert_eq!(cli.action, vec!["get".to_string()]);
/// assert_eq!(cli.domain, vec![String::new()]);
/// ```
#[derive(Parser, Debug)]
#[command(
    name = "atp",
    about = "Description: Interfaces to ATP Cloud API",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Action to perform - ping, get, add, delete, lookup, submit
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    pub action: Vec<String>,

    /// Turn on debug output - goes to STDERR
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,

    /// Domain or file with domains - used with get, add or delete actions
    #[arg(
        short = 'D',
        long = "domain",
        value_name = "DOMAIN|FILE",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub domain: Vec<String>,

    /// IP address or file with IPs - used with get, add or delete actions
    #[arg(
        short = 'i',
        long = "ip",
        value_name = "IP|FILE",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub ip: Vec<String>,

    /// Get the Infected Hosts feed
    #[arg(short = 'I', long = "ih", action = ArgAction::Count)]
    pub infected_hosts: u8,

    /// A SHA256 file hash - used with lookup action
    #[arg(short = 'H', long = "hash", value_name = "HASH|FILE")]
    pub hash: Option<String>,

    /// Turn off ssl certificate verification - INSECURE!
    #[arg(
        short = 'k',
        long = "no_ssl_verify",
        visible_alias = "no-ssl-verify",
        action = ArgAction::Count
    )]
    pub no_ssl_verify: u8,

    /// List to utilize - must be allowlist or blocklist, used with get, add or delete actions
    #[arg(short = 'l', long = "list", value_name = "LIST")]
    pub list: Vec<String>,

    /// Ping the API - If alive, the API should return "I am a potato." Alias for "-a ping"
    #[arg(short = 'p', long = "ping", action = ArgAction::Count)]
    pub ping: u8,

    /// Submit a malware sample for analysis
    #[arg(short = 's', long = "submit", value_name = "FILE")]
    pub submit: Option<String>,

    /// Authorization token
    #[arg(short = 't', long = "token", value_name = "STRING|FILE")]
    pub token: Option<String>,

    /// URL or file with URLs - used with get, add or delete actions
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL|FILE",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub url: Vec<String>,

    /// Shows the version
    #[arg(short = 'v', long = "version", action = ArgAction::Count)]
    pub version: u8,

    /// Prints this help
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    pub help: Option<bool>,

    /// API host
    #[arg(long = "host", env = "ATP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// API version
    #[arg(long = "api-version", env = "ATP_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// API product path segment
    #[arg(long = "product", env = "ATP_PRODUCT", default_value = DEFAULT_PRODUCT)]
    pub product: String,

    /// Full base URI, overrides --host, --api-version and --product for the request URL
    #[arg(long = "base-uri", env = "ATP_BASE_URI", value_name = "URI")]
    pub base_uri: Option<String>,
}
