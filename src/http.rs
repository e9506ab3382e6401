//! HTTP client for the ATP Cloud API
//!
//! Sends exactly one request per invocation and classifies the outcome:
//! - 200 and 202 are successes and hand the body back
//! - every other status is an API error described by [`status_description`]
//! - connection, TLS and protocol failures are transport errors
//!
//! Nothing is retried.

use std::path::PathBuf;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::intent::{Action, Intent, Transport};
use crate::request::{ApiRequest, Body, FieldContent, FormField};

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the {0} action is missing its target")]
    IncompleteIntent(Action),

    #[error("the version action does not send a request")]
    NoRequest,

    #[error("failed to create HTTP client")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{status} received: {description}")]
    Status {
        status: u16,
        description: &'static str,
    },
}

/// Body of a successful exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Description of the status codes the API documents
pub fn status_description(status: u16) -> Option<&'static str> {
    match status {
        200 => Some("OK"),
        202 => Some("Accepted"),
        400 => Some("Bad request"),
        401 => Some("Invalid API key"),
        403 => Some("Access denied for this key"),
        404 => Some("Page not found"),
        413 => Some("Request entity too large"),
        422 => Some("Unprocessable entity"),
        429 => Some("Too many requests"),
        500 => Some("Internal server error"),
        503 => Some("Service unavailable"),
        _ => None,
    }
}

/// `"{status} received: {description}"`, with an empty description for
/// undocumented codes
pub fn status_line(status: u16) -> String {
    format!(
        "{} received: {}",
        status,
        status_description(status).unwrap_or_default()
    )
}

pub struct AtpClient {
    client: Client,
    base_uri: String,
}

impl AtpClient {
    /// Creates a client for the transport settings of an intent
    ///
    /// With `no_ssl_verify` certificates are not validated at all. With
    /// `debug` reqwest traces every read and write on the connection.
    pub fn new(transport: &Transport) -> Result<Self, ExecuteError> {
        if transport.no_ssl_verify {
            warn!("TLS certificate verification is disabled");
        }

        let client = ClientBuilder::new()
            .user_agent(concat!("atp/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(transport.no_ssl_verify)
            .connection_verbose(transport.debug)
            .build()
            .map_err(ExecuteError::Client)?;

        Ok(Self {
            client,
            base_uri: transport.base_uri.trim_end_matches('/').to_string(),
        })
    }

    /// Performs the exchange described by `request`
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ExecuteError> {
        let url = format!("{}{}", self.base_uri, request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method, &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Body::Form(fields) = request.body {
            for field in &fields {
                debug!("form data: {}", field);
            }
            builder = builder.multipart(into_form(fields));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        match status {
            200 | 202 => {
                debug!("{}", status_line(status));
                let body = response.bytes().await?.to_vec();
                Ok(ApiResponse { status, body })
            }
            _ => Err(ExecuteError::Status {
                status,
                description: status_description(status).unwrap_or_default(),
            }),
        }
    }
}

fn into_form(fields: Vec<FormField>) -> Form {
    fields.into_iter().fold(Form::new(), |form, field| match field.content {
        FieldContent::Text(text) => form.text(field.name, text),
        FieldContent::File { file_name, bytes } => {
            form.part(field.name, Part::bytes(bytes).file_name(file_name))
        }
    })
}

/// Compiles and sends the request for `intent`
pub async fn execute(intent: &Intent) -> Result<ApiResponse, ExecuteError> {
    let request = ApiRequest::from_intent(intent)?;
    let client = AtpClient::new(intent.transport())?;
    client.send(request).await
}
