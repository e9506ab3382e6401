//! Disambiguation of free-form flag arguments
//!
//! Several flags accept either a literal value or the path of a file holding
//! values. Each probe tries the interpretations in a fixed order and returns
//! a tagged [`Probe`] instead of failing on the first mismatch.

use std::fs::{self, File};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use tracing::debug;

/// How a flag argument was interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The argument is the value itself
    Literal(String),
    /// The argument names a readable file
    File(PathBuf),
    /// Neither interpretation applies
    Invalid,
}

/// A path counts as a file only if it is a regular file that can be opened.
/// Missing paths, permission failures, over-long names and directories all
/// fall through to the next interpretation.
fn is_readable_file(path: &Path) -> bool {
    match File::open(path).and_then(|f| f.metadata()) {
        Ok(meta) => meta.is_file(),
        Err(e) => {
            debug!("{} is not a readable file: {}", path.display(), e);
            false
        }
    }
}

/// Domain and URL arguments: a readable file, otherwise the literal string
pub fn file_or_literal(arg: &str) -> Probe {
    let path = Path::new(arg);
    if is_readable_file(path) {
        Probe::File(path.to_path_buf())
    } else {
        Probe::Literal(arg.to_string())
    }
}

/// An address, optionally followed by `/prefix` or, for IPv4, `/netmask`
pub fn is_ip_or_network(arg: &str) -> bool {
    let (addr, suffix) = match arg.split_once('/') {
        Some((addr, suffix)) => (addr, Some(suffix)),
        None => (arg, None),
    };
    let Ok(addr) = addr.parse::<IpAddr>() else {
        return false;
    };
    let Some(suffix) = suffix else {
        return true;
    };

    if let Ok(prefix) = suffix.parse::<u8>() {
        let max = if addr.is_ipv4() { 32 } else { 128 };
        return prefix <= max;
    }
    match (addr, suffix.parse::<Ipv4Addr>()) {
        (IpAddr::V4(_), Ok(mask)) => {
            // contiguous leading ones only
            let host_bits = !u32::from(mask);
            host_bits & host_bits.wrapping_add(1) == 0
        }
        _ => false,
    }
}

/// IP arguments: an address or network literal first, then a readable file
pub fn ip_or_file(arg: &str) -> Probe {
    if is_ip_or_network(arg) {
        return Probe::Literal(arg.to_string());
    }
    let path = Path::new(arg);
    if is_readable_file(path) {
        Probe::File(path.to_path_buf())
    } else {
        Probe::Invalid
    }
}

/// Sample submission: the argument must be a readable file
pub fn readable_file(arg: &str) -> Probe {
    let path = Path::new(arg);
    if is_readable_file(path) {
        Probe::File(path.to_path_buf())
    } else {
        Probe::Invalid
    }
}

/// Contents of the file at `arg` with surrounding whitespace removed, or
/// `None` if it cannot be read as text
pub fn read_trimmed(arg: &str) -> Option<String> {
    let path = Path::new(arg);
    if !is_readable_file(path) {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents.trim().to_string()),
        Err(e) => {
            debug!("could not read {}: {}", path.display(), e);
            None
        }
    }
}
