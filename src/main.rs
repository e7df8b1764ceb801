// Entrypoint for the CLI application.
// - Parses arguments, resolves the configuration once and runs the requested
//   operations: note update first, then analysis, or `--show` on its own.
// - Only usage errors exit nonzero; everything else is reported and the
//   process ends normally.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ask_kamos::cli::Cli;
use ask_kamos::config::{Config, LogFormat};
use ask_kamos::session;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.has_work() {
        eprintln!("Error: Prompt is required unless updating note.");
        std::process::exit(1);
    }

    let config = Config::from_env()?.with_silent(cli.quiet);
    init_logging(&config);

    if cli.show {
        session::show_latest(&config);
        return Ok(());
    }

    if let Some(comment) = &cli.update_note {
        session::update_note(&config, comment, cli.next_prompt.as_deref());
    }

    if let Some(prompt) = cli.prompt_text() {
        session::run_analysis(
            &config,
            &prompt,
            &cli.analysis_options(),
            cli.reset_history(),
        );
    }

    Ok(())
}

/// Initialize tracing on stderr. Silent mode turns logging off entirely.
fn init_logging(config: &Config) {
    let env_filter = if config.silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
