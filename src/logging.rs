// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tracing subscriber setup for the CLI.
//!
//! Filter directives come from `PARLEY_LOG`, then `RUST_LOG`, and default to `warn`. Output
//! goes to stderr so that JSON on stdout stays machine-readable.

use std::env;
use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PARLEY_LOG";
pub const DEFAULT_DIRECTIVES: &str = "warn";

#[derive(Debug)]
pub enum LoggingError {
    InvalidFilter {
        directives: String,
        source: ParseError,
    },
    SubscriberAlreadySet,
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter { directives, source } => {
                write!(f, "invalid log filter {directives:?}: {source}")
            }
            Self::SubscriberAlreadySet => write!(f, "tracing subscriber already initialized"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFilter { source, .. } => Some(source),
            Self::SubscriberAlreadySet => None,
        }
    }
}

fn pick_directives(parley_log: Option<String>, rust_log: Option<String>) -> String {
    [parley_log, rust_log]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_owned())
}

/// Installs a stderr `fmt` subscriber as the global default.
pub fn init_stderr() -> Result<(), LoggingError> {
    let directives = pick_directives(env::var(LOG_ENV).ok(), env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directives)
        .map_err(|source| LoggingError::InvalidFilter { directives, source })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::{pick_directives, DEFAULT_DIRECTIVES};

    #[test]
    fn own_variable_wins_over_rust_log() {
        assert_eq!(
            pick_directives(Some("parley=debug".into()), Some("info".into())),
            "parley=debug"
        );
        assert_eq!(pick_directives(None, Some("info".into())), "info");
        assert_eq!(pick_directives(Some("  ".into()), Some("trace".into())), "trace");
        assert_eq!(pick_directives(None, None), DEFAULT_DIRECTIVES);
    }
}
