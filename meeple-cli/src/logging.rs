//! Logger setup for the binary.

use std::io::Write;

use log::LevelFilter;

/// Install `env_logger`.
///
/// Normal runs print bare messages at `info`, `--quiet` keeps only warnings
/// and errors, `--verbose` adds `debug` messages with timestamps and module
/// paths. `RUST_LOG`, when set, replaces the level filter.
pub(crate) fn init(quiet: bool, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // Library chatter from the HTTP stack stays out of normal output.
    builder.filter_module("reqwest", LevelFilter::Warn);
    builder.filter_module("hyper_util", LevelFilter::Warn);
    builder.filter_module("rustls", LevelFilter::Warn);

    if verbose {
        builder.format(|buf, record| {
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(
                buf,
                "{} {:<5} [{}] {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        });
    }

    builder.parse_env("RUST_LOG");
    builder.init();
}
