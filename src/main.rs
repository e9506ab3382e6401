use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use atp::http::{execute, ApiResponse};
use atp::intent::{Action, Intent};
use atp::resolve::{parse_args, resolve_cli, ResolveError};

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => return report(e),
    };

    init_tracing(cli.debug > 0);

    let intent = match resolve_cli(&cli) {
        Ok(intent) => intent,
        Err(e) => return report(e),
    };

    if intent.transport().debug {
        if let Ok(dump) = serde_json::to_string_pretty(&intent) {
            debug!("resolved intent: {}", dump);
        }
    }

    if intent.action() == Action::Version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    finish(run(&intent), &mut io::stdout().lock())
}

/// A successful exchange writes its body and exits 0, anything else is a
/// one-line diagnostic and exit 1
fn finish<W: Write>(outcome: Result<ApiResponse>, out: &mut W) -> ExitCode {
    match outcome.and_then(|response| write_body(out, &response.body)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Help goes to stdout and succeeds, everything else is a one-line failure
fn report(err: ResolveError) -> ExitCode {
    let informational = err.is_informational();
    match err {
        ResolveError::Usage(e) => {
            let _ = e.print();
        }
        other => eprintln!("{}", other),
    }
    if informational {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(debug: bool) {
    // -d turns on the wire trace regardless of RUST_LOG
    let filter = if debug {
        EnvFilter::new("atp=debug,reqwest=trace,hyper=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(intent: &Intent) -> Result<ApiResponse> {
    // One request per invocation, no need for worker threads
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    Ok(runtime.block_on(execute(intent))?)
}

fn write_body<W: Write>(out: &mut W, body: &[u8]) -> Result<()> {
    out.write_all(body).context("Failed to write response body")?;
    if !body.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
