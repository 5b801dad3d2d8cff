use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "omp-prototools", version, about = "proto tool versions for your shell prompt")]
pub struct Args {
    /// Bypass cache and fetch fresh data from proto
    #[arg(long)]
    pub refresh: bool,

    /// Suppress output (useful for hooks that only warm the cache)
    #[arg(long)]
    pub silent: bool,

    /// Path to custom config file (overrides default location)
    #[arg(long, env = "PROTO_STATUSLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// proto binary to run
    #[arg(long = "proto-bin", env = "PROTO_STATUSLINE_BIN", default_value = crate::proto::DEFAULT_PROTO_BIN)]
    pub proto_bin: String,

    /// Seconds to wait for each proto invocation before giving up
    #[arg(long, env = "PROTO_STATUSLINE_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Debug mode: log to stderr and print a summary
    #[arg(long, env = "PROTO_STATUSLINE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }
}
