//! EDAC Monitor - watch memory error counters reported by `edac-util`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edac_monitor::config::{parse_duration, ConfigLoader, MonitorConfig, SinkKind};
use edac_monitor::monitor::{
    run_once, spawn_shutdown_handler, PollLoop, PollSettings, EXIT_EXECUTION_FAILED,
};
use edac_monitor::sink::{ConsoleSink, LogSink, TracingSink};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SinkArg {
    Syslog,
    Stderr,
    Tracing,
}

impl From<SinkArg> for SinkKind {
    fn from(arg: SinkArg) -> Self {
        match arg {
            SinkArg::Syslog => SinkKind::Syslog,
            SinkArg::Stderr => SinkKind::Stderr,
            SinkArg::Tracing => SinkKind::Tracing,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "edac-monitor",
    about = "Check EDAC memory error counters once, or poll them and alert via syslog",
    version
)]
struct Cli {
    /// Poll edac-util repeatedly and log errors to syslog.
    #[arg(long)]
    poll: bool,

    /// Time between polls (e.g. 10s, 5m).
    #[arg(long, value_parser = parse_duration)]
    delay: Option<Duration>,

    /// How often to log even if counters are 0 (0 disables).
    #[arg(long = "logzero", value_parser = parse_duration)]
    log_zero: Option<Duration>,

    /// Name or path of the edac-util binary to run.
    #[arg(long = "edacutil")]
    edac_util: Option<String>,

    /// Kill edac-util if it runs longer than this.
    #[arg(long, value_parser = parse_duration)]
    timeout: Option<Duration>,

    /// Where poll-mode messages go.
    #[arg(long, value_enum)]
    sink: Option<SinkArg>,

    /// Read settings from this TOML file instead of the default locations.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of the file configuration.
    fn merge_into(self, mut config: MonitorConfig) -> MonitorConfig {
        if self.poll {
            config.poll = true;
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if let Some(log_zero) = self.log_zero {
            config.log_zero = log_zero;
        }
        if let Some(edac_util) = self.edac_util {
            config.edac_util = edac_util;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = Some(timeout);
        }
        if let Some(sink) = self.sink {
            config.sink = sink.into();
        }
        config
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: Cli) -> Result<MonitorConfig, String> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let config = cli.merge_into(loader.load().map_err(|e| e.to_string())?);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn make_sink(config: &MonitorConfig) -> Result<Arc<dyn LogSink>, String> {
    match config.sink {
        #[cfg(unix)]
        SinkKind::Syslog => edac_monitor::sink::SyslogSink::connect(config.tag.clone())
            .map(|sink| Arc::new(sink) as Arc<dyn LogSink>)
            .map_err(|e| format!("Could not create logger: {e}")),
        #[cfg(not(unix))]
        SinkKind::Syslog => Err("Could not create logger: syslog is only available on Unix".to_string()),
        SinkKind::Stderr => Ok(Arc::new(ConsoleSink::auto())),
        SinkKind::Tracing => Ok(Arc::new(TracingSink)),
    }
}

async fn poll_forever(config: &MonitorConfig) -> ExitCode {
    let sink = match make_sink(config) {
        Ok(sink) => sink,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(EXIT_EXECUTION_FAILED);
        }
    };

    let settings = PollSettings {
        delay: config.delay,
        log_zero: config.log_zero,
        binary: config.edac_util.clone(),
    };
    tracing::info!(
        binary = %config.edac_util,
        delay = ?config.delay,
        log_zero = ?config.log_zero,
        sink = ?config.sink,
        "Starting EDAC poll loop"
    );

    let cancel = CancellationToken::new();
    spawn_shutdown_handler(cancel.clone());

    let mut poller = PollLoop::new(config.runner(), sink, settings);
    poller.run(cancel).await;
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(EXIT_EXECUTION_FAILED);
        }
    };

    if config.poll {
        return poll_forever(&config).await;
    }

    let sink = ConsoleSink::auto();
    let outcome = run_once(&config.runner(), &config.edac_util, &sink, config.log_zero).await;
    tracing::debug!(code = outcome.code(), "One-shot run finished");
    outcome.exit_code()
}
