//! The resolved description of a single API request
//!
//! An [`Intent`] is produced once by [`crate::resolve::resolve`] and consumed
//! once by the request compiler. It is never modified after resolution, so
//! its fields are only reachable through accessors.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// What the invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Ping,
    Get,
    Add,
    Delete,
    Lookup,
    Submit,
    InfectedHosts,
    Version,
}

impl Action {
    /// Ping and version are the only actions that work without a token
    pub fn requires_token(self) -> bool {
        !matches!(self, Action::Ping | Action::Version)
    }

    /// Actions that operate on an allow/block list entity
    pub fn is_list_action(self) -> bool {
        matches!(self, Action::Get | Action::Add | Action::Delete)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Ping => "ping",
            Action::Get => "get",
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Lookup => "lookup",
            Action::Submit => "submit",
            Action::InfectedHosts => "ih",
            Action::Version => "version",
        };
        f.write_str(name)
    }
}

/// Kind of indicator being managed, also called the server type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Domain,
    Ip,
    Url,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Domain => "domain",
            EntityType::Ip => "ip",
            EntityType::Url => "url",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Allowlist,
    Blocklist,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Allowlist => "allowlist",
            ListType::Blocklist => "blocklist",
        }
    }

    /// Name of the list as the given API version spells it. `v2` still uses
    /// whitelist/blacklist.
    pub fn api_name(self, api_version: &str) -> &'static str {
        match (api_version, self) {
            ("v2", ListType::Allowlist) => "whitelist",
            ("v2", ListType::Blocklist) => "blacklist",
            _ => self.as_str(),
        }
    }
}

/// One value on the command line, a file of values, or nothing at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    SingleValue,
    FileOfValues,
    None,
}

impl InputMode {
    /// Path segment the API uses for the mode. Requests without a value are
    /// sent as `param`.
    pub fn marker(self) -> &'static str {
        match self {
            InputMode::FileOfValues => "file",
            InputMode::SingleValue | InputMode::None => "param",
        }
    }
}

/// Connection settings carried alongside the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transport {
    pub base_uri: String,
    pub api_version: String,
    pub no_ssl_verify: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub(crate) action: Action,
    pub(crate) entity_type: Option<EntityType>,
    pub(crate) list_type: Option<ListType>,
    pub(crate) input_mode: InputMode,
    pub(crate) value: Option<String>,
    pub(crate) file_path: Option<PathBuf>,
    pub(crate) hash_value: Option<String>,
    #[serde(serialize_with = "redact")]
    pub(crate) token: Option<String>,
    pub(crate) transport: Transport,
}

fn redact<S: Serializer>(token: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match token {
        Some(_) => serializer.serialize_str("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}

impl Intent {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        self.entity_type
    }

    pub fn list_type(&self) -> Option<ListType> {
        self.list_type
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Literal domain, IP or URL in single-value mode
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// File of values, or the sample for submit
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn hash_value(&self) -> Option<&str> {
        self.hash_value.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}
