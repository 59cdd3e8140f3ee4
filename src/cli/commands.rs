use crate::cli::args::{Cli, Commands, RunArgs};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::{Pipeline, RunSummary};
use crate::utils::progress::ProgressReporter;
use tracing::{debug, info, warn};

pub fn run(cli: Cli) -> Result<RunSummary> {
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Process { run } => execute(&run, false, cli.quiet),
        Commands::Validate { run } => execute(&run, true, cli.quiet),
    }
}

fn execute(args: &RunArgs, validate_only: bool, quiet: bool) -> Result<RunSummary> {
    let mut config = PipelineConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    debug!("Effective configuration: {:?}", config);

    info!("Input directory: {}", config.input_dir.display());
    if validate_only {
        info!("Validation only - no output files will be written");
    } else {
        info!("Output directory: {}", config.output_dir.display());
    }

    let mut pipeline = Pipeline::new(&config)?.with_validate_only(validate_only);
    let files = pipeline.discover_files()?;

    let progress = ProgressReporter::new(files.len() as u64, "Preprocessing station files...", quiet);
    let summary = pipeline.run(Some(&progress))?;

    println!("\n{}", summary.generate_summary());
    if summary.has_failures() {
        warn!(
            "{} of {} files could not be processed",
            summary.failures.len(),
            summary.total_files
        );
    }

    if let Some(path) = &args.report_json {
        summary.write_json(path)?;
        info!("Wrote run report to {}", path.display());
    }

    Ok(summary)
}

/// Structured logging to stderr; `RUST_LOG` takes precedence over the flags
fn setup_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aq_preprocessor={}", log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}
