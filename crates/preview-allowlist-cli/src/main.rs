use std::ffi::OsString;

use anyhow::Result;

use preview_allowlist_cli::cli::Cli;
use preview_allowlist_cli::config::{self, EnvFile, Settings};
use preview_allowlist_cli::output::{print_error, print_outcome};
use preview_allowlist_cli::{observability, sync};
use preview_allowlist_core::ReconcileError;

#[tokio::main]
async fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();
    let (cli, env_file) = config::parse_cli_from(&args).unwrap_or_else(|e| e.exit());
    observability::init_tracing_with_level(&cli.log_level);
    log_env_file(&env_file);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e}"));
        let code = e
            .downcast_ref::<ReconcileError>()
            .map_or(1, ReconcileError::exit_code);
        std::process::exit(code);
    }
}

fn log_env_file(env_file: &EnvFile) {
    match env_file {
        EnvFile::Loaded(path) => tracing::debug!(path = %path.display(), "Loaded env file"),
        EnvFile::Absent {
            path,
            explicit: true,
        } => tracing::warn!(path = %path.display(), "Env file not found"),
        EnvFile::Absent { .. } => {}
        EnvFile::Failed { path, error } => {
            tracing::warn!(path = %path.display(), error = %error, "Failed to load env file")
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    tracing::info!("Auth0 allow-list sync starting");

    let settings = Settings::from_args(&cli.connection, &cli.deploy)?;
    let outcome = sync(&settings, cli.dry_run).await?;
    print_outcome(&outcome, &settings.client_id, cli.format);
    Ok(())
}
