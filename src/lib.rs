// atp: ATP Cloud threat-intelligence API client
// Exposes argument resolution and request execution as a library

pub mod cli;
pub mod config;
pub mod http;
pub mod intent;
pub mod probe;
pub mod request;
pub mod resolve;
pub mod validation;
