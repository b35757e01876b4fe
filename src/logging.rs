use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FIELD_OVERLAY_LOG";
const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Installs the global fmt subscriber. Reads `FIELD_OVERLAY_LOG`, then `RUST_LOG`.
pub fn init() {
    init_with_filter(None);
}

/// Like [`init`], but an explicit directive (for example from the config file) wins
/// over the environment.
pub fn init_with_filter(directive: Option<&str>) {
    INIT.call_once(|| {
        let filter = resolve_filter(directive);
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_err()
        {
            tracing::debug!("global tracing subscriber already installed");
        }
    });
}

fn resolve_filter(directive: Option<&str>) -> EnvFilter {
    let from_env = || {
        std::env::var(LOG_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
    };
    let requested = directive
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .or_else(from_env);

    match requested {
        Some(value) => EnvFilter::try_new(&value).unwrap_or_else(|err| {
            eprintln!("invalid log filter {value:?}: {err}; using {DEFAULT_FILTER}");
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directive_is_used() {
        let filter = resolve_filter(Some("field_overlay=trace"));
        assert_eq!(filter.to_string(), "field_overlay=trace");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init();
        init_with_filter(Some("debug"));
    }
}
