//! Tracing setup.
//!
//! Filter directives come from `SENKYOKU_LOG` (default `info`). The viewer
//! logs to a file because it owns the terminal; batch commands use stderr.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "SENKYOKU_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_stderr() {
    fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Truncates `path` and logs into it.
pub fn init_file(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    #[test]
    fn crate_directive_parses() {
        assert!(EnvFilter::try_new("senkyoku_map=debug,warn").is_ok());
    }
}
