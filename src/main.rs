use crocon::cli::commands::{CliArgs, Commands};
use crocon::cli::handlers::{
    handle_batch, handle_convert, handle_envelope, handle_versions, EXIT_USAGE,
};
use crocon::{cache, CroconConfig, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let args = CliArgs::parse();

    let config = match CroconConfig::load(args.config.as_deref()).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(EXIT_USAGE);
        }
    };

    init_logging_from_args(&args, &config);

    debug!("crocon v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    if config.prewarm {
        if let Err(err) = cache::prewarm() {
            warn!(error = %err, "Failed to pre-warm resolver cache");
        }
    }

    let exit_code = match &args.command {
        Commands::Convert(convert_args) => handle_convert(convert_args, &config),
        Commands::Batch(batch_args) => handle_batch(batch_args, &config, args.quiet),
        Commands::Envelope(envelope_args) => handle_envelope(envelope_args),
        Commands::Versions(versions_args) => handle_versions(versions_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &CroconConfig) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = if let Some(level_str) = &args.log_level {
            parse_level(level_str)
        } else if args.verbose {
            Level::DEBUG
        } else if args.quiet {
            Level::ERROR
        } else {
            parse_level(&config.log_level)
        };

        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            filter = filter.add_directive(
                format!("crocon={}", level)
                    .parse()
                    .expect("level directive is valid"),
            );
        }

        let registry = tracing_subscriber::registry().with(filter);
        if config.log_json {
            registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .init();
        }
    });
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}
