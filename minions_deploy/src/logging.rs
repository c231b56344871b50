use std::io::IsTerminal;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Diagnostics go to stderr so stdout only carries the deployment output.
pub fn initialize(env_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}
