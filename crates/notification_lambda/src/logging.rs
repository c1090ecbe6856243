use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs a JSON subscriber writing to stdout, which the Lambda runtime
/// forwards to the function's log stream. `RUST_LOG` overrides the filter.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .without_time()
        .with_target(false)
        .try_init();

    if let Err(error) = installed {
        eprintln!("failed to install log subscriber: {error}");
    }
}
