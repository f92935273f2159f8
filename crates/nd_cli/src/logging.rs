use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber once. `RUST_LOG` overrides the default
/// `info` filter; `json` switches to one JSON object per line.
pub fn init_logging(json: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
        let result = if json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        if let Err(e) = result {
            eprintln!("Failed to initialise logging: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging(false);
        init_logging(true);
        tracing::info!("still logging");
    }
}
