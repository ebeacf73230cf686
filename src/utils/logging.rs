use tracing::Level;

/// Install the global tracing subscriber for the relay process.
///
/// `level` comes from the `server.log_level` setting; unknown values fall
/// back to `info`. Uses `try_init` so tests can call this repeatedly.
pub fn init(level: &str) {
    let max = level.parse::<Level>().unwrap_or(Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_max_level(max)
        .with_target(false)
        .try_init();
}
