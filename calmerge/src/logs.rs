//! Log output setup.
//!
//! Diagnostics go to standard output, next to the results, without
//! timestamps or targets. Machine-readable output on stdout moves them to
//! standard error. `RUST_LOG` overrides the default level unless quiet mode
//! is on.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        "info"
    }
}

fn filter(quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new(default_directive(true));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    /// Stderr when JSON results go to stdout, stdout otherwise.
    pub fn for_output(json: bool, to_file: bool) -> Self {
        if json && !to_file {
            LogStream::Stderr
        } else {
            LogStream::Stdout
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(quiet: bool, stream: LogStream) {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter(quiet))
        .with_target(false)
        .without_time();

    let _ = match stream {
        LogStream::Stdout => builder
            .with_writer(std::io::stdout)
            .with_ansi(std::io::stdout().is_terminal())
            .try_init(),
        LogStream::Stderr => builder
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .try_init(),
    };
}
