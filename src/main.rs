//! Binary entry point for the System File Saver CLI.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::process;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use system_file_saver::{
    BackupError, BackupRun, ConfigError, ConfigOverrides, HostEnvironment, HostError, ListError,
    ListLoader, RunConfiguration, SaverConfig, SyncError, Syncer, locate_program, system_hostname,
};

mod cli;

use cli::{Cli, LogLevel};

/// Environment variable that replaces the log filter derived from the flags.
const LOG_ENV_VAR: &str = "SFS_LOG";

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    List(#[from] ListError),
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Backup(#[from] BackupError),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.effective_log_level());

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32, CliError> {
    let config = SaverConfig::load_without_cli_args()?.with_overrides(overrides_from(cli));
    config.validate()?;

    let rsync = locate_program(&config.rsync_bin, env::var_os("PATH").as_deref())?;
    debug!(rsync = %rsync, "found rsync");

    let host = host_environment(&config)?;
    let run_config = config.resolve(&host)?;
    debug!(?run_config, "resolved configuration");

    execute(run_config, &rsync)
}

fn execute(run_config: RunConfiguration, rsync: &Utf8Path) -> Result<i32, CliError> {
    let loader = ListLoader::new(run_config.input_file.clone());
    let entries = loader.entries()?;

    let syncer = Syncer::with_process_runner(rsync.as_str())?;
    let summary = BackupRun::new(run_config, syncer).execute(entries)?;
    Ok(summary.exit_code())
}

fn overrides_from(cli: Cli) -> ConfigOverrides {
    ConfigOverrides {
        input_file: cli.input_file,
        target_directory: cli.target_directory,
        hostname: cli.hostname,
        dry_run: cli.dry_run,
        itemize_changes: cli.itemize_changes,
        checksum: cli.checksum,
        delete_after: cli.delete_after,
    }
}

fn host_environment(config: &SaverConfig) -> Result<HostEnvironment, CliError> {
    let home = dirs::home_dir().and_then(|path| Utf8PathBuf::from_path_buf(path).ok());
    let hostname = match config.hostname {
        Some(_) => None,
        None => Some(system_hostname()?),
    };
    Ok(HostEnvironment { home, hostname })
}

fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level_directive(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

const fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
