use anyhow::Context;
use clap::Parser;
use msems_processor::MsemsConverter;
use msems_processor::cli::{self, Args};
use std::process;
use tracing::debug;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    setup_logging(&args);

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let current_dir = std::env::current_dir().context("Could not determine current directory")?;
    let config = args.to_config(current_dir);

    let converter = MsemsConverter::new(config).context("Invalid configuration")?;
    let (dialect, metadata) = converter
        .detect(&args.file)
        .with_context(|| format!("Failed to read header of {}", args.file.display()))?;
    cli::report_file_type(args, dialect);

    let outcome = converter
        .convert_detected(&args.file, dialect, metadata)
        .with_context(|| format!("Failed to convert {}", args.file.display()))?;

    cli::report(args, &outcome);
    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("msems_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
