use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostics go to stderr so they never mix with the narration on stdout.
/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "station_lookup=debug,info"
    } else {
        "station_lookup=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
