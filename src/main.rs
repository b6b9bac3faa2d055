//! CLI entry point for `mailpost`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use mailpost::config;
use mailpost::dispatch::{self, Outcome, RunOptions};
use mailpost::transport::SmtpMailer;

#[derive(Parser)]
#[command(
    name = "mailpost",
    version,
    about = "Send a file as an email attachment, with filtering and size limits",
    disable_help_flag = true
)]
struct Cli {
    /// Print help
    #[arg(short = '?', long, action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// Debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default ./mailpost.toml, /etc/mailpost.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Config section (table) name
    #[arg(short, long, value_name = "SECTION", default_value = "general")]
    table: String,

    /// Override the recipient address
    #[arg(short, long, value_name = "ADDR")]
    mailto: Option<String>,

    /// Sleep before copy and dispatch (seconds)
    #[arg(short, long, value_name = "SECS", default_value_t = 0)]
    sleep: u64,

    /// Attachment file path
    #[arg(value_name = "FILE")]
    file: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut profile = config::load(cli.config.as_deref(), &cli.table)
        .context("cannot load configuration")?;
    if let Some(mailto) = &cli.mailto {
        profile.mail_to = mailto.clone();
    }
    config::validate(&profile)?;

    setup_logging(if cli.debug { "debug" } else { "info" }, &profile.log_file)?;

    tracing::debug!(args = ?std::env::args().collect::<Vec<_>>(), "invocation");
    tracing::debug!(profile = ?profile.redacted(), "effective configuration");

    let mailer = SmtpMailer::from_profile(&profile)?;
    let options = RunOptions {
        attachment_arg: cli.file,
        delay: Duration::from_secs(cli.sleep),
    };

    // A filter skip is a deliberate success: exit 0 either way. Fatal
    // errors propagate and exit non-zero.
    match dispatch::run(&profile, &options, &mailer)? {
        Outcome::Sent { .. } | Outcome::Skipped(_) => Ok(()),
    }
}

/// Set up tracing with either a stdout sink or the configured log file.
///
/// An unopenable log file is fatal. `RUST_LOG` overrides the level.
fn setup_logging(level: &str, log_file: &str) -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if log_file.is_empty() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
            .init();
        return Ok(());
    }

    let path = Path::new(log_file);

    // Fail fast: an unwritable log file aborts the run
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("log file '{}' has no file name", path.display()))?;
    let file_appender = tracing_appender::rolling::never(dir, name);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .init();
    Ok(())
}
