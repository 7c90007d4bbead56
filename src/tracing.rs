//! Tracing initialization.
//!
//! Logs always go to stderr: stdout carries MCP frames when serving and results
//! when querying.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn under_test_harness() -> bool {
    std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok()
}

/// Initialize tracing. Safe to call multiple times; only the first call counts.
///
/// `RUST_LOG` overrides the default level (`info`, or `debug` under a test harness).
pub fn init(format: LogFormat) {
    INIT.call_once(|| {
        let is_test = under_test_harness();
        let level = if is_test {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true);

        let result = match format {
            _ if is_test => builder.compact().with_test_writer().try_init(),
            LogFormat::Compact => builder.compact().with_writer(std::io::stderr).try_init(),
            LogFormat::Json => builder.json().with_writer(std::io::stderr).try_init(),
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
