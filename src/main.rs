#[cfg(feature = "colors")]
use owo_colors::OwoColorize;
use std::time::Duration;

use proto_statusline::app::{StatusLine, StatusReport};
use proto_statusline::cli::Args;
use proto_statusline::config::{ConfigLoader, config_file_path};
use proto_statusline::context::ContextHasher;
use proto_statusline::proto::ProtoCli;

fn init_tracing(args: &Args) {
    if !args.debug {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn banner(text: &str) -> String {
    #[cfg(feature = "colors")]
    {
        text.bright_black().to_string()
    }
    #[cfg(not(feature = "colors"))]
    {
        text.to_string()
    }
}

fn print_debug(app: &StatusLine<ProtoCli>, report: &StatusReport) {
    eprintln!();
    eprintln!("{}", banner("=== Debug Information ==="));
    eprintln!("Config: {}", app.config_loader().path().display());
    eprintln!("Cache: {}", app.cache_store().path().display());
    match app.runner().resolve() {
        Ok(bin) => eprintln!("proto: {}", bin.display()),
        Err(err) => eprintln!("proto: {err}"),
    }
    eprintln!(
        "Source: {}",
        match report.source {
            Some(source) => format!("{source:?}"),
            None => "none".to_string(),
        }
    );
    eprintln!("Tools rendered: {}", report.tool_count);
    eprintln!("{}", banner("========================="));
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_tracing(&args);

    // Prompt segments must never fail loudly: any error below degrades to
    // empty output with exit code 0.
    let config_path = match config_file_path(args.config.as_deref()) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!("no config location: {err:#}");
            return;
        }
    };
    let hasher = match ContextHasher::from_env() {
        Ok(hasher) => Some(hasher),
        Err(err) => {
            tracing::debug!("cache disabled: {err:#}");
            None
        }
    };

    let runner = ProtoCli::new(&args.proto_bin, Duration::from_secs(args.timeout));
    let mut app = StatusLine::new(runner, ConfigLoader::new(config_path), hasher, args.refresh);
    let report = app.run().await;

    if !args.silent {
        print!("{}", report.output);
    }
    if args.debug {
        print_debug(&app, &report);
    }
}
