//! Compiles an [`Intent`] into the description of one HTTP request
//!
//! Nothing in this module touches the network. Files referenced by the
//! intent are read here so that an unreadable file fails before a
//! connection is opened.

use std::fmt;
use std::fs;
use std::path::Path;

use reqwest::Method;

use crate::http::ExecuteError;
use crate::intent::{Action, InputMode, Intent};

/// Path of the sample submission endpoint
pub const SUBMIT_PATH: &str = "/submission/sample";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldContent {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub content: FieldContent,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            FieldContent::Text(text) => write!(f, "{}={}", self.name, text),
            FieldContent::File { file_name, bytes } => {
                write!(f, "{}=<{}, {} bytes>", self.name, file_name, bytes.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Form(Vec<FormField>),
}

/// Method, path relative to the base URI, credential and body of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Body,
}

impl ApiRequest {
    /// Builds the request for `intent`
    ///
    /// # Errors
    ///
    /// Fails for the version action, which sends nothing, for a list action
    /// missing its server type or list, and when a list or sample file can no
    /// longer be read.
    pub fn from_intent(intent: &Intent) -> Result<Self, ExecuteError> {
        let action = intent.action();
        let path = request_path(intent)?;
        let method = match action {
            Action::Add => Method::PATCH,
            Action::Delete => Method::DELETE,
            Action::Submit => Method::POST,
            Action::Get | Action::Lookup | Action::InfectedHosts | Action::Ping => Method::GET,
            Action::Version => return Err(ExecuteError::NoRequest),
        };

        let body = match action {
            Action::Add | Action::Delete => match intent.input_mode() {
                InputMode::FileOfValues => Body::Form(vec![file_field(intent)?]),
                InputMode::SingleValue => Body::Form(vec![FormField {
                    name: "server",
                    content: FieldContent::Text(intent.value().unwrap_or_default().to_string()),
                }]),
                InputMode::None => Body::Empty,
            },
            Action::Submit => Body::Form(vec![file_field(intent)?]),
            _ => Body::Empty,
        };

        let bearer = if action.requires_token() {
            intent.token().map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            method,
            path,
            bearer,
            body,
        })
    }
}

fn request_path(intent: &Intent) -> Result<String, ExecuteError> {
    let action = intent.action();
    let path = match action {
        Action::Get | Action::Add | Action::Delete => {
            let (Some(list), Some(entity)) = (intent.list_type(), intent.entity_type()) else {
                return Err(ExecuteError::IncompleteIntent(action));
            };
            format!(
                "/{}/{}/{}",
                list.api_name(&intent.transport().api_version),
                intent.input_mode().marker(),
                entity.as_str()
            )
        }
        Action::InfectedHosts => "/infected_hosts".to_string(),
        Action::Lookup => match intent.hash_value() {
            Some(hash) => format!("/lookup/hash/{}", hash),
            None => return Err(ExecuteError::IncompleteIntent(action)),
        },
        Action::Ping => "/ping".to_string(),
        Action::Submit => SUBMIT_PATH.to_string(),
        Action::Version => return Err(ExecuteError::NoRequest),
    };
    Ok(path)
}

fn file_field(intent: &Intent) -> Result<FormField, ExecuteError> {
    let path = intent
        .file_path()
        .ok_or(ExecuteError::IncompleteIntent(intent.action()))?;
    let bytes = fs::read(path).map_err(|source| ExecuteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FormField {
        name: "file",
        content: FieldContent::File {
            file_name: file_name(path),
            bytes,
        },
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
