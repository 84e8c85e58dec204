//! Logging setup: a plain stderr `tracing_subscriber::fmt` subscriber,
//! filtered by a CLI-supplied verbosity level.

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Log verbosity: trace, debug, info, warn, or error.
    #[clap(long = "log-level", default_value = "warn", global = true)]
    pub level: String,
}

/// Installs a stderr `tracing` subscriber at the requested verbosity. The
/// core library crates (`catalog-model`, `ref-resolver`, `schema-differ`,
/// `codegen`) only emit events; only this binary ever installs a subscriber.
pub fn init(args: &LogArgs) {
    let filter = tracing_subscriber::EnvFilter::try_new(&args.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
