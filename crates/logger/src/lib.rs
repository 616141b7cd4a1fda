use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Filter from `RUST_LOG`, falls back to `info` when unset or unparsable.
///
/// To see every register transfer of the drivers use:
/// `RUST_LOG=ambient_sensors=trace,info`
fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_regex(true)
        .try_from_env()
        .unwrap_or_else(|_| {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .parse_lossy("")
        })
}

/// Logs to journald when running as a systemd service, to stderr otherwise.
///
/// Follow the service with: `journalctl -fu ambient-monitor
/// --output-fields=CODE_FILE,CODE_LINE,MESSAGE -o cat`
pub fn setup() {
    let registry = tracing_subscriber::registry().with(ErrorLayer::default());

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    if !libsystemd::logging::connected_to_journal() {
        registry.with(stderr.with_filter(env_filter())).init();
        tracing::info!("Started logging to stderr");
        return;
    }

    match tracing_journald::layer() {
        Ok(journal) => {
            registry.with(journal.with_filter(env_filter())).init();
            tracing::info!("Started logging to journald");
        }
        Err(err) => {
            registry.with(stderr.with_filter(env_filter())).init();
            tracing::error!("Could not connect to journald, logging to stderr instead: {err}");
        }
    }
}

/// Safe to call from every test, only the first call installs anything.
pub fn setup_for_tests() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        color_eyre::install().unwrap();

        let test_writer = fmt::layer()
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .pretty()
            .with_filter(EnvFilter::from_default_env());
        tracing_subscriber::registry()
            .with(test_writer)
            .with(ErrorLayer::default())
            .init();
    })
}
