pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "rental_core=info";

/// Initializes the global tracing subscriber from `RUST_LOG`, the crate default
/// directive, and `extra` (typically the configured log level), in that order.
pub fn init_tracing(extra: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for raw in std::iter::once(DEFAULT_DIRECTIVE).chain(extra) {
            match raw.parse::<Directive>() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => eprintln!("ignoring log directive `{}`: {}", raw, err),
            }
        }
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
