// Tracing setup - an EnvFilter behind a reload layer so `debug` can switch levels live

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Environment variable that overrides the quiet filter, e.g. `RPNCALC_LOG=info`.
pub const LOG_ENV: &str = "RPNCALC_LOG";

const QUIET_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "warn,rpncalc=debug,rpncalc_core=debug";

fn quiet_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(QUIET_FILTER))
}

/// Install the global subscriber. Log lines go to stderr so they never mix with results.
pub fn init(debug: bool) -> anyhow::Result<FilterHandle> {
    let initial = if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        quiet_filter()
    };
    let (filter, handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(handle)
}

pub fn set_debug(handle: &FilterHandle, enabled: bool) {
    let filter = if enabled {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        quiet_filter()
    };
    if let Err(e) = handle.reload(filter) {
        eprintln!("Cannot change the log level: {}", e);
    }
}
